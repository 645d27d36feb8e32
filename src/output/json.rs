use crate::types::WarpReport;

/// Serialize a report as pretty JSON.
///
/// # Errors
/// Returns an error if serialization fails.
pub fn to_json(report: &WarpReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use serde_json::Value;

    use super::*;
    use crate::types::{CommitChange, WarpMode};

    #[test]
    fn json_carries_mode_counts_and_changes() {
        let report = WarpReport {
            mode: WarpMode::Randomize,
            repo: PathBuf::from("/tmp/r"),
            commits_before: 2,
            commits_after: 2,
            dry_run: true,
            changes: vec![CommitChange {
                commit: "abc".to_string(),
                before: "2024-01-02 13:45:12 +0100".to_string(),
                after: "Tue Jan 2 18:01:02 2024 +0100".to_string(),
            }],
        };

        let value: Value = serde_json::from_str(&to_json(&report).unwrap()).unwrap();

        assert_eq!(value["mode"], "randomize");
        assert_eq!(value["commits_before"], 2);
        assert_eq!(value["dry_run"], true);
        assert_eq!(value["changes"][0]["after"], "Tue Jan 2 18:01:02 2024 +0100");
    }
}
