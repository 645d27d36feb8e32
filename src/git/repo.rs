use std::fmt::Write as _;
use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use crate::error::WarpError;
use crate::types::CommitChange;

use super::GitRunner;
use super::output::{RewriteOutcome, is_init_confirmation, rewrite_outcome};
use super::runner::{owned_args, run, run_captured};

const DUMMY_FILE: &str = "dummy.txt";
const BACKUP_REFS: &str = "refs/original/";

/// Create `parent/name` as a fresh repository and return its path.
///
/// # Errors
/// Returns [`WarpError::RepositoryInit`] when git refuses or does not confirm the init.
pub fn initialize(git: &dyn GitRunner, parent: &Path, name: &str) -> Result<PathBuf, WarpError> {
    std::fs::create_dir_all(parent).map_err(|source| WarpError::Io {
        context: format!("failed to create {}", parent.display()),
        source,
    })?;
    let path = parent.join(name);
    let stdout = match run(git, parent, &["init", name]) {
        Ok(stdout) => stdout,
        Err(WarpError::ExternalTool { stderr, .. }) => {
            return Err(WarpError::RepositoryInit {
                path,
                output: stderr,
            });
        }
        Err(err) => return Err(err),
    };
    if !is_init_confirmation(&stdout) {
        return Err(WarpError::RepositoryInit {
            path,
            output: stdout,
        });
    }
    log::debug!("initialized repository {}", path.display());
    Ok(path)
}

/// Number of commits reachable from any ref; 0 when git cannot count them.
///
/// # Errors
/// Only when the count output is not a number or git cannot be launched.
pub fn commit_count(git: &dyn GitRunner, repo: &Path) -> Result<u64, WarpError> {
    let args = ["rev-list", "--all", "--count"];
    let stdout = match run(git, repo, &args) {
        Ok(stdout) => stdout,
        Err(WarpError::ExternalTool { stderr, .. }) => {
            log::debug!("no commits counted in {}: {stderr}", repo.display());
            return Ok(0);
        }
        Err(err) => return Err(err),
    };
    stdout
        .parse::<u64>()
        .map_err(|_| WarpError::UnrecognizedOutput {
            args: owned_args(&args),
            output: stdout.clone(),
        })
}

/// Full hashes of every commit, children before parents.
///
/// # Errors
/// Returns an error when git fails to list the history.
pub fn list_commits(git: &dyn GitRunner, repo: &Path) -> Result<Vec<String>, WarpError> {
    if commit_count(git, repo)? == 0 {
        return Ok(Vec::new());
    }
    let stdout = run(git, repo, &["log", "--all", "--topo-order", "--format=%H"])?;
    Ok(stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Display timestamp (`%ci`) of `commit`.
///
/// # Errors
/// Returns [`WarpError::ExternalTool`] when the commit does not exist.
pub fn read_timestamp(git: &dyn GitRunner, repo: &Path, commit: &str) -> Result<String, WarpError> {
    run(git, repo, &["show", "-s", "--format=%ci", commit])
}

/// Author (`%ai`) and committer (`%ci`) timestamps of `commit`.
///
/// # Errors
/// Returns [`WarpError::ExternalTool`] when the commit does not exist and
/// [`WarpError::UnrecognizedOutput`] unless git prints exactly two lines.
pub fn read_dates(
    git: &dyn GitRunner,
    repo: &Path,
    commit: &str,
) -> Result<(String, String), WarpError> {
    let args = ["show", "-s", "--format=%ai%n%ci", commit];
    let stdout = run(git, repo, &args)?;
    let mut lines = stdout.lines().map(str::trim);
    match (lines.next(), lines.next(), lines.next()) {
        (Some(author), Some(committer), None) => Ok((author.to_string(), committer.to_string())),
        _ => Err(WarpError::UnrecognizedOutput {
            args: owned_args(&args),
            output: stdout.clone(),
        }),
    }
}

/// Rewrite the author and committer date of one commit across the whole history.
///
/// # Errors
/// Fails on an invalid id or timestamp, a git failure, or output that does not
/// confirm the rewrite.
pub fn rewrite_timestamp(
    git: &dyn GitRunner,
    repo: &Path,
    commit: &str,
    new_timestamp: &str,
) -> Result<(), WarpError> {
    check_commit_id(commit)?;
    check_filter_value(new_timestamp)?;
    let script = [
        format!("if test \"$GIT_COMMIT\" = \"{commit}\""),
        "then".to_string(),
        format!("    GIT_AUTHOR_DATE='{new_timestamp}'"),
        format!("    GIT_COMMITTER_DATE='{new_timestamp}'"),
        "    export GIT_AUTHOR_DATE GIT_COMMITTER_DATE".to_string(),
        "fi".to_string(),
    ]
    .join("\n");
    log::debug!("rewriting {commit} to {new_timestamp}");
    filter_history(git, repo, &script)
}

/// Rewrite every listed commit in a single history pass.
///
/// # Errors
/// Same failure modes as [`rewrite_timestamp`].
pub fn rewrite_timestamps(
    git: &dyn GitRunner,
    repo: &Path,
    changes: &[CommitChange],
) -> Result<(), WarpError> {
    if changes.is_empty() {
        return Ok(());
    }
    let mut script = String::from("case \"$GIT_COMMIT\" in\n");
    for change in changes {
        check_commit_id(&change.commit)?;
        check_filter_value(&change.after)?;
        let _ = writeln!(
            script,
            "{commit}) GIT_AUTHOR_DATE='{ts}'; GIT_COMMITTER_DATE='{ts}' ;;",
            commit = change.commit,
            ts = change.after
        );
    }
    script.push_str("esac\nexport GIT_AUTHOR_DATE GIT_COMMITTER_DATE\n");
    log::debug!("rewriting {} commits in one pass", changes.len());
    filter_history(git, repo, &script)
}

fn filter_history(git: &dyn GitRunner, repo: &Path, script: &str) -> Result<(), WarpError> {
    ensure_no_backup_refs(git, repo)?;
    let args = [
        "filter-branch",
        "-f",
        "--env-filter",
        script,
        "--tag-name-filter",
        "cat",
        "--",
        "--all",
    ];
    let output = run_captured(git, repo, &args)?;
    if rewrite_outcome(&output.stdout, &output.stderr) == RewriteOutcome::Unrecognized {
        let mut text = output.stdout.trim().to_string();
        if !output.stderr.trim().is_empty() {
            text.push('\n');
            text.push_str(output.stderr.trim());
        }
        let shown: Vec<&str> = args
            .iter()
            .map(|&arg| if arg == script { "<env-filter>" } else { arg })
            .collect();
        return Err(WarpError::UnrecognizedOutput {
            args: owned_args(&shown),
            output: text,
        });
    }
    discard_backup_refs(git, repo)
}

/// Names of the refs under `refs/original/`.
///
/// # Errors
/// Returns an error when git cannot list refs.
pub fn backup_refs(git: &dyn GitRunner, repo: &Path) -> Result<Vec<String>, WarpError> {
    let refs = run(
        git,
        repo,
        &["for-each-ref", "--format=%(refname)", BACKUP_REFS],
    )?;
    Ok(refs
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}

/// Fail when `refs/original/` already holds backups. They would be counted
/// and enumerated as history, and discarded after the next rewrite.
///
/// # Errors
/// Returns [`WarpError::BackupRefsPresent`] listing the refs found.
pub fn ensure_no_backup_refs(git: &dyn GitRunner, repo: &Path) -> Result<(), WarpError> {
    let refs = backup_refs(git, repo)?;
    if refs.is_empty() {
        Ok(())
    } else {
        Err(WarpError::BackupRefsPresent { refs })
    }
}

/// Delete the `refs/original/` backups left by the rewrite that just ran so
/// they are not counted as extra history.
///
/// # Errors
/// Returns an error when the refs cannot be listed or deleted.
pub fn discard_backup_refs(git: &dyn GitRunner, repo: &Path) -> Result<(), WarpError> {
    for name in backup_refs(git, repo)? {
        run(git, repo, &["update-ref", "-d", &name])?;
    }
    Ok(())
}

/// Append a byte to a tracked file and commit it. Setup helper for tests and demos.
///
/// # Errors
/// Returns an error when the file cannot be written or git fails, and
/// [`WarpError::CommitCountChanged`] unless exactly one commit was added.
pub fn create_dummy_commit(git: &dyn GitRunner, repo: &Path) -> Result<(), WarpError> {
    let before = commit_count(git, repo)?;

    let dummy = repo.join(DUMMY_FILE);
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&dummy)
        .and_then(|mut file| file.write_all(b" "))
        .map_err(|source| WarpError::Io {
            context: format!("failed to write {}", dummy.display()),
            source,
        })?;
    run(git, repo, &["add", DUMMY_FILE])?;
    run(
        git,
        repo,
        &[
            "-c",
            "user.name=git-timewarp",
            "-c",
            "user.email=git-timewarp@localhost",
            "-c",
            "commit.gpgsign=false",
            "commit",
            "-q",
            "-m",
            "dummy commit",
        ],
    )?;

    let after = commit_count(git, repo)?;
    if after != before + 1 {
        return Err(WarpError::CommitCountChanged { before, after });
    }
    Ok(())
}

fn check_commit_id(id: &str) -> Result<(), WarpError> {
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(WarpError::InvalidCommitId { id: id.to_string() });
    }
    Ok(())
}

fn check_filter_value(value: &str) -> Result<(), WarpError> {
    if value.contains(['\'', '"', '\n', '\r', '\\', '$', '`']) {
        return Err(WarpError::invalid_time(
            value,
            "contains characters not allowed in a rewrite filter",
        ));
    }
    Ok(())
}
