use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Timelike};
use rand::Rng;

use crate::error::WarpError;

/// Format of `git show --format=%ci`.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";
/// Format handed to `GIT_AUTHOR_DATE` / `GIT_COMMITTER_DATE` during a rewrite.
pub const REWRITE_FORMAT: &str = "%a %b %-d %H:%M:%S %Y %z";

pub const MAX_HOUR: u32 = 23;
pub const MAX_MINUTE: u32 = 59;
pub const MAX_SECOND: u32 = 59;

/// A commit timestamp as git displays it: local date and time plus UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    local: NaiveDateTime,
    offset: FixedOffset,
}

impl Timestamp {
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.local.date()
    }

    #[must_use]
    pub fn hour(&self) -> u32 {
        self.local.hour()
    }

    #[must_use]
    pub fn minute(&self) -> u32 {
        self.local.minute()
    }

    #[must_use]
    pub fn second(&self) -> u32 {
        self.local.second()
    }

    #[must_use]
    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    fn with_local(&self, local: NaiveDateTime) -> DateTime<FixedOffset> {
        DateTime::from_naive_utc_and_offset(local - self.offset, self.offset)
    }

    /// Render in the `%ci` display format.
    #[must_use]
    pub fn to_display(&self) -> String {
        self.with_local(self.local).format(DISPLAY_FORMAT).to_string()
    }
}

/// Parse a `%ci` timestamp such as `2024-01-02 13:45:12 +0100`.
///
/// # Errors
/// Returns [`WarpError::InvalidTimeFormat`] unless the input is exactly three
/// whitespace-separated tokens forming a valid date, time and offset.
pub fn parse(display: &str) -> Result<Timestamp, WarpError> {
    let tokens: Vec<&str> = display.split_whitespace().collect();
    let [date, time, offset] = tokens.as_slice() else {
        return Err(WarpError::invalid_time(
            display,
            format!("expected date, time and offset, found {} parts", tokens.len()),
        ));
    };
    let parsed = DateTime::parse_from_str(&format!("{date} {time} {offset}"), DISPLAY_FORMAT)
        .map_err(|err| WarpError::invalid_time(display, err.to_string()))?;
    Ok(Timestamp {
        local: parsed.naive_local(),
        offset: *parsed.offset(),
    })
}

/// Replace the supplied components of `timestamp` and format it for a rewrite.
/// `None` keeps the original component.
///
/// # Errors
/// Returns [`WarpError::InvalidTimeFormat`] for an override outside its range.
pub fn alter(
    timestamp: &Timestamp,
    hour: Option<u32>,
    minute: Option<u32>,
    second: Option<u32>,
) -> Result<String, WarpError> {
    let mut local = timestamp.local;
    if let Some(h) = hour {
        local = local
            .with_hour(h)
            .ok_or_else(|| WarpError::invalid_time(h.to_string(), "hour must be within 0..=23"))?;
    }
    if let Some(m) = minute {
        local = local.with_minute(m).ok_or_else(|| {
            WarpError::invalid_time(m.to_string(), "minute must be within 0..=59")
        })?;
    }
    if let Some(s) = second {
        local = local.with_second(s).ok_or_else(|| {
            WarpError::invalid_time(s.to_string(), "second must be within 0..=59")
        })?;
    }
    Ok(timestamp.with_local(local).format(REWRITE_FORMAT).to_string())
}

/// Uniform integer in `[low, high]`. Reversed bounds are swapped.
pub fn random_range<R: Rng + ?Sized>(rng: &mut R, low: u32, high: u32) -> u32 {
    let (low, high) = if low <= high { (low, high) } else { (high, low) };
    rng.gen_range(low..=high)
}

/// Validate a caller supplied hour.
///
/// # Errors
/// Returns [`WarpError::InvalidTimeFormat`] when `hour` is above 23.
pub fn check_hour(hour: u32) -> Result<u32, WarpError> {
    if hour > MAX_HOUR {
        return Err(WarpError::invalid_time(
            hour.to_string(),
            "hour must be within 0..=23",
        ));
    }
    Ok(hour)
}

/// Validate an inclusive hour window.
///
/// # Errors
/// Returns [`WarpError::InvalidTimeFormat`] for an hour above 23 or when
/// `earliest` is after `latest`.
pub fn check_hour_range(earliest: u32, latest: u32) -> Result<(u32, u32), WarpError> {
    let earliest = check_hour(earliest)?;
    let latest = check_hour(latest)?;
    if earliest > latest {
        return Err(WarpError::invalid_time(
            format!("{earliest}..{latest}"),
            "earliest hour is after latest hour",
        ));
    }
    Ok((earliest, latest))
}

/// How one time component is treated during a warp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Component {
    #[default]
    Keep,
    Fixed(u32),
    Random { low: u32, high: u32 },
}

impl Component {
    fn resolve<R: Rng + ?Sized>(self, rng: &mut R) -> Option<u32> {
        match self {
            Self::Keep => None,
            Self::Fixed(value) => Some(value),
            Self::Random { low, high } => Some(random_range(rng, low, high)),
        }
    }
}

/// Partial override of a timestamp's time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimestampSpec {
    pub hour: Component,
    pub minute: Component,
    pub second: Component,
}

impl TimestampSpec {
    /// Draw concrete overrides, in hour, minute, second order.
    pub fn resolve<R: Rng + ?Sized>(&self, rng: &mut R) -> (Option<u32>, Option<u32>, Option<u32>) {
        let hour = self.hour.resolve(rng);
        let minute = self.minute.resolve(rng);
        let second = self.second.resolve(rng);
        (hour, minute, second)
    }

    /// Resolve against `rng` and apply to `timestamp`.
    ///
    /// # Errors
    /// Returns [`WarpError::InvalidTimeFormat`] if a resolved value is out of range.
    pub fn apply<R: Rng + ?Sized>(
        &self,
        timestamp: &Timestamp,
        rng: &mut R,
    ) -> Result<String, WarpError> {
        let (hour, minute, second) = self.resolve(rng);
        alter(timestamp, hour, minute, second)
    }
}
