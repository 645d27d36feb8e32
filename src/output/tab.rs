use clap::ValueEnum;
use tabled::{
    Table,
    builder::Builder,
    settings::{Panel, Style},
};

use crate::types::WarpReport;

use super::short_id;

/// Border style of the change table.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum TabStyle {
    #[default]
    Rounded,
    Ascii,
    Psql,
    Markdown,
    /// No borders at all, for piping into other tools
    Plain,
}

impl TabStyle {
    fn decorate(self, table: &mut Table) {
        match self {
            Self::Rounded => table.with(Style::rounded()),
            Self::Ascii => table.with(Style::ascii()),
            Self::Psql => table.with(Style::psql()),
            Self::Markdown => table.with(Style::markdown()),
            Self::Plain => table.with(Style::blank()),
        };
    }
}

/// One row per commit with its short id and both timestamps, under a
/// heading naming the mode and repository.
#[must_use]
pub fn format_tab(report: &WarpReport, style: TabStyle) -> String {
    let mut builder = Builder::default();
    if report.changes.is_empty() {
        builder.push_record(["(no commits)"]);
    } else {
        builder.push_record(["Commit", "Before", "After"]);
        for change in &report.changes {
            builder.push_record([
                short_id(&change.commit).to_string(),
                change.before.clone(),
                change.after.clone(),
            ]);
        }
    }
    let mut table = builder.build();
    style.decorate(&mut table);
    table.with(Panel::header(heading(report)));
    table.to_string()
}

fn heading(report: &WarpReport) -> String {
    let suffix = if report.dry_run { ", dry run" } else { "" };
    format!(
        "{}: {} ({} commits{suffix})",
        report.mode,
        report.repo.display(),
        report.changes.len()
    )
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::types::{CommitChange, WarpMode};

    fn report(changes: Vec<CommitChange>) -> WarpReport {
        WarpReport {
            mode: WarpMode::Standardize,
            repo: PathBuf::from("/tmp/testrepo"),
            commits_before: 1,
            commits_after: 1,
            dry_run: false,
            changes,
        }
    }

    #[test]
    fn table_lists_short_ids_and_both_timestamps() {
        let out = format_tab(
            &report(vec![CommitChange {
                commit: "0123456789abcdef0123456789abcdef01234567".to_string(),
                before: "2024-01-02 13:45:12 +0100".to_string(),
                after: "Tue Jan 2 00:00:00 2024 +0100".to_string(),
            }]),
            TabStyle::Ascii,
        );
        assert!(out.contains("0123456 "), "{out}");
        assert!(!out.contains("0123456789abcdef"), "{out}");
        assert!(out.contains("2024-01-02 13:45:12 +0100"), "{out}");
        assert!(out.contains("Tue Jan 2 00:00:00 2024 +0100"), "{out}");
        assert!(out.contains("standardize: /tmp/testrepo (1 commits)"), "{out}");
    }

    #[test]
    fn empty_report_renders_placeholder() {
        let out = format_tab(&report(Vec::new()), TabStyle::Rounded);
        assert!(out.contains("(no commits)"), "{out}");
        assert!(out.contains("standardize: /tmp/testrepo (0 commits)"), "{out}");
    }

    #[test]
    fn plain_style_draws_no_borders() {
        let mut dry = report(Vec::new());
        dry.dry_run = true;
        let out = format_tab(&dry, TabStyle::Plain);
        assert!(out.contains("(0 commits, dry run)"), "{out}");
        assert!(!out.contains(['|', '+', '-', '─', '│']), "{out}");
    }
}
