//! Recognized git output, matched with `LC_ALL=C` against git 2.x.
//!
//! Anything not listed here is treated as an error (stderr) or as
//! unrecognized output (rewrite completion).

/// Stderr line prefixes that are warnings or progress, never failures.
pub(crate) const BENIGN_STDERR_PREFIXES: &[&str] = &[
    "hint:",
    "warning:",
    "WARNING: Ref '",
    "WARNING: git-filter-branch",
    "Rewrite ",
    "Ref '",
    "Proceeding with filter-branch",
];

pub(crate) const INIT_CONFIRMATION: &str = "Initialized empty Git repository";

/// Either phrase in the output of `filter-branch` means the pass completed.
pub(crate) const REWRITE_SUCCESS_MARKERS: &[&str] = &["was rewritten", "remaining 0 predicted"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StderrKind {
    Clean,
    Benign,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RewriteOutcome {
    Completed,
    Unrecognized,
}

fn output_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split(['\n', '\r'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
}

fn is_benign(line: &str) -> bool {
    BENIGN_STDERR_PREFIXES
        .iter()
        .any(|prefix| line.starts_with(prefix))
}

pub(crate) fn classify_stderr(stderr: &str) -> StderrKind {
    let mut lines = output_lines(stderr).peekable();
    if lines.peek().is_none() {
        return StderrKind::Clean;
    }
    if lines.all(is_benign) {
        StderrKind::Benign
    } else {
        StderrKind::Error
    }
}

pub(crate) fn is_init_confirmation(stdout: &str) -> bool {
    stdout.trim_start().starts_with(INIT_CONFIRMATION)
}

/// filter-branch prints its progress and ref summary on different streams
/// depending on the git version, so both are searched.
pub(crate) fn rewrite_outcome(stdout: &str, stderr: &str) -> RewriteOutcome {
    let found = [stdout, stderr].iter().any(|text| {
        REWRITE_SUCCESS_MARKERS
            .iter()
            .any(|marker| text.contains(marker))
    });
    if found {
        RewriteOutcome::Completed
    } else {
        RewriteOutcome::Unrecognized
    }
}
