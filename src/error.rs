use std::path::PathBuf;
use std::process::ExitStatus;

#[derive(Debug)]
pub enum WarpError {
    Io {
        context: String,
        source: std::io::Error,
    },
    ExternalTool {
        args: Vec<String>,
        status: ExitStatus,
        stderr: String,
    },
    UnrecognizedOutput {
        args: Vec<String>,
        output: String,
    },
    RepositoryInit {
        path: PathBuf,
        output: String,
    },
    InvalidTimeFormat {
        value: String,
        reason: String,
    },
    InvalidCommitId {
        id: String,
    },
    CommitCountChanged {
        before: u64,
        after: u64,
    },
    BackupRefsPresent {
        refs: Vec<String>,
    },
}

impl WarpError {
    pub(crate) fn invalid_time(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTimeFormat {
            value: value.into(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for WarpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { context, source } => write!(f, "{context}: {source}"),
            Self::ExternalTool {
                args,
                status,
                stderr,
            } => {
                let command = args.join(" ");
                if stderr.is_empty() {
                    write!(f, "git {command} failed with status {status}")
                } else {
                    write!(f, "git {command} failed: {stderr}")
                }
            }
            Self::UnrecognizedOutput { args, output } => {
                write!(
                    f,
                    "unrecognized output from git {}: {output}",
                    args.join(" ")
                )
            }
            Self::RepositoryInit { path, output } => {
                write!(
                    f,
                    "failed to initialize repository {}: {output}",
                    path.display()
                )
            }
            Self::InvalidTimeFormat { value, reason } => {
                write!(f, "invalid time '{value}': {reason}")
            }
            Self::InvalidCommitId { id } => write!(f, "invalid commit id '{id}'"),
            Self::CommitCountChanged { before, after } => {
                write!(
                    f,
                    "unexpected commit count: {before} before, {after} after"
                )
            }
            Self::BackupRefsPresent { refs } => {
                write!(
                    f,
                    "existing filter-branch backups would be lost ({}); remove or move them first",
                    refs.join(", ")
                )
            }
        }
    }
}

impl std::error::Error for WarpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
