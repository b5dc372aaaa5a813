//! Partition execution: report, or stage and commit each group in order.
//!
//! Every commit is preceded by its own `stage_only(group members)`, so files
//! from one group can never leak into another group's commit. When a run ends,
//! normally or by abort, the staged set is cleared so unprocessed groups are
//! left as unstaged changes in the working tree.

pub mod review;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::{info, warn};

use crate::error::VcsError;
use crate::git::{CommitId, Vcs};
use crate::partition::CommitGroup;
use crate::report::AnalysisReport;

pub use review::{DialoguerReviewer, GroupReviewer, ReviewDecision};

/// How the partition is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RunMode {
    /// Report groups only; never touches the VCS.
    #[default]
    Analyze,
    Auto,
    Interactive,
}

impl FromStr for RunMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "analyze" | "analyze-only" => Ok(Self::Analyze),
            "auto" => Ok(Self::Auto),
            "interactive" => Ok(Self::Interactive),
            _ => Err(format!("Unknown mode: {}", s)),
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Analyze => write!(f, "analyze"),
            Self::Auto => write!(f, "auto"),
            Self::Interactive => write!(f, "interactive"),
        }
    }
}

/// What happens to the remaining groups after one fails to commit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    #[default]
    Continue,
    Abort,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "continue" => Ok(Self::Continue),
            "abort" => Ok(Self::Abort),
            _ => Err(format!("Unknown failure policy: {}", s)),
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Continue => write!(f, "continue"),
            Self::Abort => write!(f, "abort"),
        }
    }
}

/// Step at which a group failed to commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureStep {
    Stage,
    Commit,
    /// Anything else the repository reported, such as a missing identity.
    Repository,
}

impl From<&VcsError> for FailureStep {
    fn from(err: &VcsError) -> Self {
        if err.is_stage_error() {
            Self::Stage
        } else if err.is_commit_error() {
            Self::Commit
        } else {
            Self::Repository
        }
    }
}

impl fmt::Display for FailureStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stage => write!(f, "stage"),
            Self::Commit => write!(f, "commit"),
            Self::Repository => write!(f, "repository"),
        }
    }
}

/// Outcome of one group in an auto or interactive run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum GroupOutcome {
    Committed { commit_id: CommitId },
    Failed { step: FailureStep, error: String },
    Skipped,
}

impl GroupOutcome {
    fn failed(err: &VcsError) -> Self {
        Self::Failed {
            step: FailureStep::from(err),
            error: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupResult {
    pub label: String,
    /// Message actually used (the edited one, when edited interactively).
    pub message: String,
    pub outcome: GroupOutcome,
}

/// Ordered per-group results of an auto or interactive run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunResult {
    pub groups: Vec<GroupResult>,
    /// Set when the run stopped before every group was attempted.
    pub aborted: bool,
}

impl RunResult {
    pub fn committed(&self) -> usize {
        self.count(|o| matches!(o, GroupOutcome::Committed { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, GroupOutcome::Failed { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, GroupOutcome::Skipped))
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    fn count(&self, pred: impl Fn(&GroupOutcome) -> bool) -> usize {
        self.groups.iter().filter(|g| pred(&g.outcome)).count()
    }
}

/// Result of [`Executor::execute`] for the selected mode.
#[derive(Debug, Clone, PartialEq)]
pub enum Execution {
    Analysis(AnalysisReport),
    Run(RunResult),
}

/// Applies a partition to the VCS, one group at a time.
pub struct Executor<'a, V: Vcs + ?Sized> {
    vcs: &'a V,
    failure_policy: FailurePolicy,
}

impl<'a, V: Vcs + ?Sized> Executor<'a, V> {
    pub fn new(vcs: &'a V, failure_policy: FailurePolicy) -> Self {
        Self {
            vcs,
            failure_policy,
        }
    }

    /// Dispatch on `mode`. The reviewer is only consulted in interactive mode.
    pub fn execute<R: GroupReviewer + ?Sized>(
        &self,
        mode: RunMode,
        groups: &[CommitGroup],
        reviewer: &mut R,
    ) -> Execution {
        match mode {
            RunMode::Analyze => Execution::Analysis(self.analyze(groups)),
            RunMode::Auto => Execution::Run(self.run_auto(groups)),
            RunMode::Interactive => Execution::Run(self.run_interactive(groups, reviewer)),
        }
    }

    /// Build the report without any VCS call.
    pub fn analyze(&self, groups: &[CommitGroup]) -> AnalysisReport {
        AnalysisReport::from_groups(groups)
    }

    /// Commit every group with its synthesized message.
    pub fn run_auto(&self, groups: &[CommitGroup]) -> RunResult {
        let mut result = RunResult::default();

        for (idx, group) in groups.iter().enumerate() {
            let outcome = self.commit_group(group, &group.message);
            let failed = matches!(outcome, GroupOutcome::Failed { .. });
            result.groups.push(GroupResult {
                label: group.label.clone(),
                message: group.message.clone(),
                outcome,
            });

            if failed && self.failure_policy == FailurePolicy::Abort {
                skip_remaining(&mut result, &groups[idx + 1..]);
                break;
            }
        }

        self.clear_staging();
        result
    }

    /// Ask the reviewer about each group before committing it.
    pub fn run_interactive<R: GroupReviewer + ?Sized>(
        &self,
        groups: &[CommitGroup],
        reviewer: &mut R,
    ) -> RunResult {
        let mut result = RunResult::default();
        let total = groups.len();

        for (idx, group) in groups.iter().enumerate() {
            let message = match reviewer.review(group, idx + 1, total) {
                ReviewDecision::Accept => group.message.clone(),
                ReviewDecision::Edit(edited) => edited,
                ReviewDecision::Skip => {
                    let skipped = GroupResult {
                        label: group.label.clone(),
                        message: group.message.clone(),
                        outcome: GroupOutcome::Skipped,
                    };
                    reviewer.outcome(&skipped);
                    result.groups.push(skipped);
                    continue;
                }
                ReviewDecision::Abort => {
                    info!("Aborted before group {} of {}", idx + 1, total);
                    skip_remaining(&mut result, &groups[idx..]);
                    break;
                }
            };

            let outcome = self.commit_group(group, &message);
            let failed = matches!(outcome, GroupOutcome::Failed { .. });
            let group_result = GroupResult {
                label: group.label.clone(),
                message,
                outcome,
            };
            reviewer.outcome(&group_result);
            result.groups.push(group_result);

            if failed && self.failure_policy == FailurePolicy::Abort {
                skip_remaining(&mut result, &groups[idx + 1..]);
                break;
            }
        }

        self.clear_staging();
        result
    }

    /// Stage exactly the group's files, then commit them.
    fn commit_group(&self, group: &CommitGroup, message: &str) -> GroupOutcome {
        if let Err(e) = self.vcs.stage_only(&group.members) {
            warn!("Staging '{}' failed: {}", group.label, e);
            return GroupOutcome::failed(&e);
        }

        match self.vcs.commit(message) {
            Ok(commit_id) => {
                info!(
                    "Committed '{}' ({} files) as {}",
                    group.label,
                    group.members.len(),
                    commit_id.short()
                );
                GroupOutcome::Committed { commit_id }
            }
            Err(e) => {
                warn!("Commit for '{}' failed: {}", group.label, e);
                GroupOutcome::failed(&e)
            }
        }
    }

    fn clear_staging(&self) {
        if let Err(e) = self.vcs.stage_only(&[]) {
            warn!("Failed to clear the staged set after the run: {}", e);
        }
    }
}

fn skip_remaining(result: &mut RunResult, remaining: &[CommitGroup]) {
    result.aborted = true;
    result.groups.extend(remaining.iter().map(|group| GroupResult {
        label: group.label.clone(),
        message: group.message.clone(),
        outcome: GroupOutcome::Skipped,
    }));
}
