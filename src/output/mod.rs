pub mod json;
pub mod progress;
pub mod tab;

pub use json::to_json;
pub use progress::ProgressObserver;
pub use tab::{TabStyle, format_tab};

const SHORT_ID_LEN: usize = 7;

/// Abbreviated commit id for display.
#[must_use]
pub fn short_id(commit: &str) -> &str {
    commit.get(..SHORT_ID_LEN).unwrap_or(commit)
}
