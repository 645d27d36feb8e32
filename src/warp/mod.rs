use std::path::Path;

use rand::Rng;

use crate::error::WarpError;
use crate::git::{
    GitRunner, commit_count, ensure_no_backup_refs, list_commits, read_dates, rewrite_timestamp,
    rewrite_timestamps,
};
use crate::time::{
    self, Component, MAX_MINUTE, MAX_SECOND, Timestamp, TimestampSpec, check_hour, check_hour_range,
};
use crate::types::{
    CommitChange, RewriteStrategy, StripOutcome, StripSelection, WarpMode, WarpOptions, WarpReport,
};

/// Side channel for per-commit progress. Notified before each rewrite.
pub trait WarpObserver {
    fn on_start(&mut self, _mode: WarpMode, _total: usize) {}
    fn on_commit(&mut self, change: &CommitChange);
    fn on_finish(&mut self, _succeeded: bool) {}
}

pub struct NoopObserver;

impl WarpObserver for NoopObserver {
    fn on_commit(&mut self, _change: &CommitChange) {}
}

/// Bulk timestamp rewrites over every commit of one repository.
pub struct Warp<'a> {
    git: &'a dyn GitRunner,
    options: WarpOptions,
}

impl<'a> Warp<'a> {
    #[must_use]
    pub fn new(git: &'a dyn GitRunner, options: WarpOptions) -> Self {
        Self { git, options }
    }

    #[must_use]
    pub fn repo(&self) -> &Path {
        &self.options.repo
    }

    /// Give every commit a random time between `earliest:00:00` and `latest:59:59`.
    ///
    /// # Errors
    /// Rejects hours outside 0..=23 or `earliest > latest` before touching the
    /// repository, and existing `refs/original/` backups before rewriting
    /// anything; otherwise fails on the first git error.
    pub fn randomize<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        earliest: u32,
        latest: u32,
        observer: &mut dyn WarpObserver,
    ) -> Result<WarpReport, WarpError> {
        let (earliest, latest) = check_hour_range(earliest, latest)?;
        let spec = TimestampSpec {
            hour: Component::Random {
                low: earliest,
                high: latest,
            },
            minute: Component::Random {
                low: 0,
                high: MAX_MINUTE,
            },
            second: Component::Random {
                low: 0,
                high: MAX_SECOND,
            },
        };
        self.run(WarpMode::Randomize, observer, |ts| spec.apply(ts, rng))
    }

    /// Set every commit to `hour:00:00`.
    ///
    /// # Errors
    /// Rejects an hour outside 0..=23 before touching the repository; otherwise
    /// fails on the first git error.
    pub fn standardize(
        &self,
        hour: u32,
        observer: &mut dyn WarpObserver,
    ) -> Result<WarpReport, WarpError> {
        let hour = check_hour(hour)?;
        self.run(WarpMode::Standardize, observer, |ts| {
            time::alter(ts, Some(hour), Some(0), Some(0))
        })
    }

    /// Zero the selected components and keep the rest.
    ///
    /// # Errors
    /// Fails on the first git error. An empty selection never calls git.
    pub fn strip(
        &self,
        selection: StripSelection,
        observer: &mut dyn WarpObserver,
    ) -> Result<StripOutcome, WarpError> {
        if selection.is_empty() {
            return Ok(StripOutcome::NothingSelected);
        }
        let zero_if = |selected: bool| selected.then_some(0);
        let report = self.run(WarpMode::Strip, observer, |ts| {
            time::alter(
                ts,
                zero_if(selection.hours),
                zero_if(selection.minutes),
                zero_if(selection.seconds),
            )
        })?;
        Ok(StripOutcome::Warped(report))
    }

    fn run<F>(
        &self,
        mode: WarpMode,
        observer: &mut dyn WarpObserver,
        next: F,
    ) -> Result<WarpReport, WarpError>
    where
        F: FnMut(&Timestamp) -> Result<String, WarpError>,
    {
        let result = self.run_inner(mode, observer, next);
        observer.on_finish(result.is_ok());
        result
    }

    fn run_inner<F>(
        &self,
        mode: WarpMode,
        observer: &mut dyn WarpObserver,
        mut next: F,
    ) -> Result<WarpReport, WarpError>
    where
        F: FnMut(&Timestamp) -> Result<String, WarpError>,
    {
        let repo = self.repo();
        let WarpOptions {
            strategy, dry_run, ..
        } = self.options;

        ensure_no_backup_refs(self.git, repo)?;
        let commits_before = commit_count(self.git, repo)?;
        let commits = list_commits(self.git, repo)?;
        log::info!(
            "{mode}: {} commits in {}{}",
            commits.len(),
            repo.display(),
            if dry_run { " (dry run)" } else { "" }
        );
        observer.on_start(mode, commits.len());

        let mut changes = Vec::with_capacity(commits.len());
        let mut pending = Vec::new();
        for commit in commits {
            let (author, committer) = read_dates(self.git, repo, &commit)?;
            let parsed = time::parse(&committer)?;
            let after = next(&parsed)?;
            // filter-branch reports an identical commit as "unchanged", not rewritten
            let unchanged = after == time::alter(&parsed, None, None, None)?
                && after == time::alter(&time::parse(&author)?, None, None, None)?;
            let change = CommitChange {
                commit,
                before: parsed.to_display(),
                after,
            };
            observer.on_commit(&change);
            if unchanged {
                log::debug!("{} already at {}", change.commit, change.after);
            } else if !dry_run {
                match strategy {
                    RewriteStrategy::PerCommit => {
                        rewrite_timestamp(self.git, repo, &change.commit, &change.after)?;
                    }
                    RewriteStrategy::SinglePass => pending.push(change.clone()),
                }
            }
            changes.push(change);
        }
        rewrite_timestamps(self.git, repo, &pending)?;

        let commits_after = if dry_run {
            commits_before
        } else {
            commit_count(self.git, repo)?
        };
        if commits_after != commits_before {
            return Err(WarpError::CommitCountChanged {
                before: commits_before,
                after: commits_after,
            });
        }
        log::info!("{mode}: done, {commits_after} commits");

        Ok(WarpReport {
            mode,
            repo: repo.to_path_buf(),
            commits_before,
            commits_after,
            dry_run,
            changes,
        })
    }
}
