//! Structured reports handed back to the CLI shell.

use std::fmt::Write;

use serde::Serialize;

use crate::execute::{GroupOutcome, RunResult};
use crate::partition::{CommitGroup, CommitKind};

/// One group as shown in analyze-only mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportGroup {
    pub label: String,
    pub message: String,
    pub kind: CommitKind,
    pub member_paths: Vec<String>,
}

/// Ordered groups and messages for analyze-only mode.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub groups: Vec<ReportGroup>,
}

impl AnalysisReport {
    pub fn from_groups(groups: &[CommitGroup]) -> Self {
        Self {
            groups: groups
                .iter()
                .map(|g| ReportGroup {
                    label: g.label.clone(),
                    message: g.message.clone(),
                    kind: g.kind,
                    member_paths: g.members.clone(),
                })
                .collect(),
        }
    }

    pub fn file_count(&self) -> usize {
        self.groups.iter().map(|g| g.member_paths.len()).sum()
    }

    /// Plain-text rendering; identical input always renders identically.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} commit group(s) for {} file(s):",
            self.groups.len(),
            self.file_count()
        );

        for (idx, group) in self.groups.iter().enumerate() {
            let _ = writeln!(out);
            let _ = writeln!(out, "[{}] {}", idx + 1, group.message);
            for path in &group.member_paths {
                let _ = writeln!(out, "    {}", path);
            }
        }

        out
    }
}

impl RunResult {
    /// Per-group outcome lines followed by the final tally.
    pub fn render_text(&self) -> String {
        let mut out = String::new();

        for group in &self.groups {
            let _ = match &group.outcome {
                GroupOutcome::Committed { commit_id } => {
                    writeln!(out, "  [DONE] {} ({})", group.message, commit_id.short())
                }
                GroupOutcome::Failed { step, error } => {
                    writeln!(out, "  [FAIL] {} ({}): {}", group.message, step, error)
                }
                GroupOutcome::Skipped => writeln!(out, "  [SKIP] {}", group.message),
            };
        }

        let _ = writeln!(out);
        let _ = write!(
            out,
            "{} committed, {} failed, {} skipped",
            self.committed(),
            self.failed(),
            self.skipped()
        );
        if self.aborted {
            out.push_str(" (aborted)");
        }
        out.push('\n');

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execute::{FailureStep, GroupResult};
    use crate::git::CommitId;
    use pretty_assertions::assert_eq;

    fn commit_group(label: &str, message: &str, members: &[&str]) -> CommitGroup {
        let kind = match message.split(':').next() {
            Some("fix") => CommitKind::Fix,
            Some("refactor") => CommitKind::Refactor,
            Some("chore") => CommitKind::Chore,
            _ => CommitKind::Feat,
        };
        CommitGroup {
            label: label.to_string(),
            message: message.to_string(),
            kind,
            candidate: None,
            members: members.iter().map(|m| m.to_string()).collect(),
        }
    }

    #[test]
    fn test_render_analysis_text() {
        let report = AnalysisReport::from_groups(&[
            commit_group("Config", "feat: Add Config", &["config/db.ts", "config/api.ts"]),
            commit_group("Ui", "fix: Update Ui", &["ui/button.tsx"]),
        ]);

        assert_eq!(
            report.render_text(),
            "2 commit group(s) for 3 file(s):\n\
             \n\
             [1] feat: Add Config\n    config/db.ts\n    config/api.ts\n\
             \n\
             [2] fix: Update Ui\n    ui/button.tsx\n"
        );
    }

    #[test]
    fn test_analysis_json_shape() {
        let report = AnalysisReport::from_groups(&[
            commit_group("A", "feat: Add A", &["a/x.ts"]),
            commit_group("B", "refactor: Remove B", &["b/y.ts"]),
        ]);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["groups"][0]["label"], "A");
        assert_eq!(json["groups"][0]["message"], "feat: Add A");
        assert_eq!(json["groups"][0]["kind"], "feat");
        assert_eq!(json["groups"][0]["member_paths"][0], "a/x.ts");
        assert_eq!(json["groups"][1]["kind"], "refactor");
    }

    #[test]
    fn test_render_run_result_tally() {
        let result = RunResult {
            groups: vec![
                GroupResult {
                    label: "A".to_string(),
                    message: "feat: Add A".to_string(),
                    outcome: GroupOutcome::Committed {
                        commit_id: CommitId("0123456789".to_string()),
                    },
                },
                GroupResult {
                    label: "B".to_string(),
                    message: "fix: Update B".to_string(),
                    outcome: GroupOutcome::Failed {
                        step: FailureStep::Commit,
                        error: "hook rejected".to_string(),
                    },
                },
                GroupResult {
                    label: "C".to_string(),
                    message: "chore: Update C".to_string(),
                    outcome: GroupOutcome::Skipped,
                },
            ],
            aborted: true,
        };

        assert_eq!(
            result.render_text(),
            "  [DONE] feat: Add A (0123456)\n\
             \x20 [FAIL] fix: Update B (commit): hook rejected\n\
             \x20 [SKIP] chore: Update C\n\
             \n\
             1 committed, 1 failed, 1 skipped (aborted)\n"
        );
    }

    #[test]
    fn test_run_result_json_outcome_tags() {
        let result = RunResult {
            groups: vec![GroupResult {
                label: "A".to_string(),
                message: "feat: Add A".to_string(),
                outcome: GroupOutcome::Skipped,
            }],
            aborted: false,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["groups"][0]["outcome"]["status"], "skipped");
    }
}
