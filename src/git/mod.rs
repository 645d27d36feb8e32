mod output;
mod repo;
mod runner;

pub use repo::{
    backup_refs, commit_count, create_dummy_commit, discard_backup_refs, ensure_no_backup_refs,
    initialize, list_commits, read_dates, read_timestamp, rewrite_timestamp, rewrite_timestamps,
};
pub use runner::{DefaultGitRunner, GitRunner};
