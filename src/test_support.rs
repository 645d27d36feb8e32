use std::cell::{Cell, RefCell};
use std::io;
use std::os::unix::process::ExitStatusExt;
use std::path::Path;
use std::process::{ExitStatus, Output};

use chrono::DateTime;

use crate::git::GitRunner;
use crate::time::DISPLAY_FORMAT;

/// In-memory stand-in for a linear git history, newest commit first. Each
/// entry is `(hash, committer date, author date)` in `%ci` form.
///
/// Rewriting a commit gives it and every newer commit a fresh hash, the way
/// filter-branch does, and leaves a backup ref that inflates `--all` counts
/// until deleted.
pub(crate) struct FakeRepo {
    pub(crate) commits: RefCell<Vec<(String, String, String)>>,
    pub(crate) calls: RefCell<Vec<Vec<String>>>,
    pub(crate) backup: Cell<bool>,
    pub(crate) garble_rewrite: Cell<bool>,
    next_id: Cell<u64>,
}

impl FakeRepo {
    pub(crate) fn with_timestamps(timestamps: &[&str]) -> Self {
        let repo = Self {
            commits: RefCell::new(Vec::new()),
            calls: RefCell::new(Vec::new()),
            backup: Cell::new(false),
            garble_rewrite: Cell::new(false),
            next_id: Cell::new(1),
        };
        for ts in timestamps {
            let id = repo.fresh_id();
            repo.commits
                .borrow_mut()
                .push((id, (*ts).to_string(), (*ts).to_string()));
        }
        repo
    }

    pub(crate) fn empty() -> Self {
        Self::with_timestamps(&[])
    }

    pub(crate) fn timestamps(&self) -> Vec<String> {
        self.commits.borrow().iter().map(|(_, ts, _)| ts.clone()).collect()
    }

    pub(crate) fn author_timestamps(&self) -> Vec<String> {
        self.commits.borrow().iter().map(|(_, _, ts)| ts.clone()).collect()
    }

    pub(crate) fn set_author(&self, index: usize, ts: &str) {
        self.commits.borrow_mut()[index].2 = ts.to_string();
    }

    pub(crate) fn hashes(&self) -> Vec<String> {
        self.commits.borrow().iter().map(|(id, _, _)| id.clone()).collect()
    }

    pub(crate) fn calls_to(&self, command: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| call.first().is_some_and(|c| c == command))
            .count()
    }

    fn fresh_id(&self) -> String {
        let n = self.next_id.get();
        self.next_id.set(n + 1);
        format!("{:040x}", n * 0x9e37_79b9)
    }

    fn rewrite(&self, commit: &str, rewrite_ts: &str) -> bool {
        let parsed = DateTime::parse_from_str(rewrite_ts, "%a %b %d %H:%M:%S %Y %z")
            .expect("fake repo received a malformed rewrite date");
        let display = parsed.format(DISPLAY_FORMAT).to_string();
        let mut commits = self.commits.borrow_mut();
        let Some(index) = commits.iter().position(|(id, _, _)| id == commit) else {
            return false;
        };
        commits[index].1.clone_from(&display);
        commits[index].2 = display;
        for entry in commits.iter_mut().take(index + 1) {
            entry.0 = self.fresh_id();
        }
        true
    }

    fn filter_branch(&self, script: &str) -> Output {
        if self.garble_rewrite.get() {
            return ok("");
        }
        let mut rewritten = false;
        for line in script.lines() {
            if let Some(commit) = between(line, "if test \"$GIT_COMMIT\" = \"", "\"") {
                let ts = between(script, "GIT_AUTHOR_DATE='", "'").expect("date in filter");
                rewritten |= self.rewrite(commit, ts);
            } else if let Some((commit, rest)) = line.split_once(") GIT_AUTHOR_DATE='") {
                let ts = rest.split('\'').next().expect("date in case arm");
                rewritten |= self.rewrite(commit.trim(), ts);
            }
        }
        let total = self.commits.borrow().len();
        let progress =
            format!("\rRewrite abc ({total}/{total}) (0 seconds passed, remaining 0 predicted)\n");
        if rewritten {
            self.backup.set(true);
            ok(&format!("{progress}\nRef 'refs/heads/master' was rewritten\n"))
        } else {
            output(0, &progress, "WARNING: Ref 'refs/heads/master' is unchanged\n")
        }
    }
}

impl GitRunner for FakeRepo {
    fn run_git(&self, _repo: &Path, args: &[&str]) -> io::Result<Output> {
        self.calls
            .borrow_mut()
            .push(args.iter().map(|a| (*a).to_string()).collect());
        let out = match args {
            ["init", name] => ok(&format!("Initialized empty Git repository in /fake/{name}/.git/")),
            ["rev-list", "--all", "--count"] => {
                let len = self.commits.borrow().len();
                if len == 0 {
                    output(128, "", "fatal: bad revision '--all'\n")
                } else {
                    let count = if self.backup.get() { len * 2 } else { len };
                    ok(&format!("{count}\n"))
                }
            }
            ["log", "--all", "--topo-order", "--format=%H"] => ok(&(self.hashes().join("\n") + "\n")),
            ["show", "-s", "--format=%ci", commit] => {
                match self.commits.borrow().iter().find(|(id, _, _)| id == commit) {
                    Some((_, ts, _)) => ok(&format!("{ts}\n")),
                    None => output(128, "", &format!("fatal: bad object {commit}\n")),
                }
            }
            ["show", "-s", "--format=%ai%n%ci", commit] => {
                match self.commits.borrow().iter().find(|(id, _, _)| id == commit) {
                    Some((_, committed, authored)) => ok(&format!("{authored}\n{committed}\n")),
                    None => output(128, "", &format!("fatal: bad object {commit}\n")),
                }
            }
            ["filter-branch", "-f", "--env-filter", script, ..] => self.filter_branch(script),
            ["for-each-ref", ..] => {
                if self.backup.get() {
                    ok("refs/original/refs/heads/master\n")
                } else {
                    ok("")
                }
            }
            ["update-ref", "-d", _] => {
                self.backup.set(false);
                ok("")
            }
            ["add", _] => ok(""),
            [.., "commit", "-q", "-m", _] => {
                let id = self.fresh_id();
                let ts = "2024-05-06 14:15:16 +0200".to_string();
                self.commits.borrow_mut().insert(0, (id, ts.clone(), ts));
                ok("")
            }
            _ => output(1, "", "fatal: unsupported by fake\n"),
        };
        Ok(out)
    }
}

fn between<'a>(text: &'a str, start: &str, end: &str) -> Option<&'a str> {
    let rest = &text[text.find(start)? + start.len()..];
    Some(&rest[..rest.find(end)?])
}

pub(crate) fn output(code: i32, stdout: &str, stderr: &str) -> Output {
    Output {
        status: ExitStatus::from_raw(code << 8),
        stdout: stdout.as_bytes().to_vec(),
        stderr: stderr.as_bytes().to_vec(),
    }
}

pub(crate) fn ok(stdout: &str) -> Output {
    output(0, stdout, "")
}
