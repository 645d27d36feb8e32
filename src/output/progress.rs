use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::types::{CommitChange, WarpMode};
use crate::warp::WarpObserver;

use super::short_id;

/// Progress bar on stderr, optionally echoing each change on stdout.
pub struct ProgressObserver {
    progress: Option<ProgressBar>,
    echo: bool,
}

impl ProgressObserver {
    #[must_use]
    pub fn new(echo: bool) -> Self {
        Self {
            progress: None,
            echo,
        }
    }
}

#[must_use]
pub fn echo_line(change: &CommitChange) -> String {
    format!(
        "{}: {} -> {}",
        short_id(&change.commit),
        change.before,
        change.after
    )
}

impl WarpObserver for ProgressObserver {
    fn on_start(&mut self, mode: WarpMode, total: usize) {
        let progress = ProgressBar::new(total as u64);
        let style =
            ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress.set_style(style);
        progress.enable_steady_tick(Duration::from_millis(100));
        progress.set_message(format!("{mode} in progress"));
        self.progress = Some(progress);
    }

    fn on_commit(&mut self, change: &CommitChange) {
        let Some(progress) = &self.progress else {
            return;
        };
        if self.echo {
            // suspend() prints even when the bar itself is hidden
            progress.suspend(|| println!("{}", echo_line(change)));
        }
        progress.inc(1);
    }

    fn on_finish(&mut self, succeeded: bool) {
        if let Some(progress) = self.progress.take() {
            if succeeded {
                progress.finish_and_clear();
            } else {
                progress.abandon_with_message("warp failed");
            }
        }
    }
}
