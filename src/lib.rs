#![forbid(unsafe_code)]
#![deny(warnings, clippy::all, clippy::pedantic)]

mod error;
mod git;
mod system;
mod time;
mod types;
mod warp;
pub mod output;

#[cfg(all(test, unix))]
mod test_support;

pub use error::WarpError;
pub use git::{
    DefaultGitRunner, GitRunner, backup_refs, commit_count, create_dummy_commit,
    discard_backup_refs, ensure_no_backup_refs, initialize, list_commits, read_dates,
    read_timestamp, rewrite_timestamp, rewrite_timestamps,
};
pub use system::{FixedPrompter, Prompter, StdinPrompter};
pub use time::{
    Component, DISPLAY_FORMAT, REWRITE_FORMAT, Timestamp, TimestampSpec, alter, check_hour,
    check_hour_range,
    parse as parse_timestamp, random_range,
};
pub use types::{
    CommitChange, RewriteStrategy, StripOutcome, StripSelection, WarpMode, WarpOptions,
    WarpReport,
};
pub use warp::{NoopObserver, Warp, WarpObserver};
