use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use crate::error::WarpError;

use super::output::{StderrKind, classify_stderr};

pub trait GitRunner {
    /// Run the `git` command within the given `repo` with `args`.
    ///
    /// # Errors
    /// Returns an error if the `git` process cannot be spawned or fails during execution.
    fn run_git(&self, repo: &Path, args: &[&str]) -> std::io::Result<Output>;
}

pub struct DefaultGitRunner {
    program: PathBuf,
}

impl DefaultGitRunner {
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for DefaultGitRunner {
    fn default() -> Self {
        Self::new("git")
    }
}

impl GitRunner for DefaultGitRunner {
    fn run_git(&self, repo: &Path, args: &[&str]) -> std::io::Result<Output> {
        // Output is matched against English messages, and filter-branch
        // otherwise sleeps on its deprecation notice.
        Command::new(&self.program)
            .arg("-C")
            .arg(repo)
            .args(args)
            .env("LC_ALL", "C")
            .env("FILTER_BRANCH_SQUELCH_WARNING", "1")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
    }
}

/// Both output streams of a git call that passed the stderr check.
#[derive(Debug, Clone, Default)]
pub(crate) struct GitOutput {
    pub(crate) stdout: String,
    pub(crate) stderr: String,
}

pub(crate) fn owned_args(args: &[&str]) -> Vec<String> {
    args.iter().map(|a| (*a).to_string()).collect()
}

/// Run git and return both streams, failing on a non-zero exit or on stderr
/// lines outside the benign allow-list.
pub(crate) fn run_captured(
    git: &dyn GitRunner,
    dir: &Path,
    args: &[&str],
) -> Result<GitOutput, WarpError> {
    log::debug!("git -C {} {}", dir.display(), args.join(" "));
    let output = git.run_git(dir, args).map_err(|source| WarpError::Io {
        context: format!("failed to launch git in {}", dir.display()),
        source,
    })?;
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !output.status.success() {
        return Err(WarpError::ExternalTool {
            args: owned_args(args),
            status: output.status,
            stderr: stderr.trim().to_string(),
        });
    }

    match classify_stderr(&stderr) {
        StderrKind::Clean => {}
        StderrKind::Benign => log::debug!("git stderr (benign): {}", stderr.trim()),
        StderrKind::Error => {
            return Err(WarpError::ExternalTool {
                args: owned_args(args),
                status: output.status,
                stderr: stderr.trim().to_string(),
            });
        }
    }

    Ok(GitOutput { stdout, stderr })
}

/// Run git and return its trimmed stdout.
pub(crate) fn run(git: &dyn GitRunner, dir: &Path, args: &[&str]) -> Result<String, WarpError> {
    run_captured(git, dir, args).map(|out| out.stdout.trim().to_string())
}
