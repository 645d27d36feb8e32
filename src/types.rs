use std::path::PathBuf;

use serde::Serialize;

/// Before/after pair for one commit, as reported to observers and in output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitChange {
    pub commit: String,
    // `%ci` display format
    pub before: String,
    // format handed to the rewrite
    pub after: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WarpMode {
    Randomize,
    Standardize,
    Strip,
}

impl std::fmt::Display for WarpMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Randomize => "randomize",
            Self::Standardize => "standardize",
            Self::Strip => "strip",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WarpReport {
    pub mode: WarpMode,
    pub repo: PathBuf,
    pub commits_before: u64,
    pub commits_after: u64,
    pub dry_run: bool,
    pub changes: Vec<CommitChange>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RewriteStrategy {
    /// One full-history filter per commit.
    #[default]
    PerCommit,
    /// One filter pass covering every commit.
    SinglePass,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StripSelection {
    pub hours: bool,
    pub minutes: bool,
    pub seconds: bool,
}

impl StripSelection {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !(self.hours || self.minutes || self.seconds)
    }
}

#[derive(Debug, Clone)]
pub enum StripOutcome {
    NothingSelected,
    Warped(WarpReport),
}

#[derive(Debug, Clone, Default)]
pub struct WarpOptions {
    pub repo: PathBuf,
    pub strategy: RewriteStrategy,
    pub dry_run: bool,
}
