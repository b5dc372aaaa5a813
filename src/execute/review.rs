//! Operator review of each group in interactive mode.

use dialoguer::{Input, Select};
use tracing::debug;

use super::{GroupOutcome, GroupResult};
use crate::partition::CommitGroup;

/// Operator's choice for one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewDecision {
    /// Commit with the synthesized message.
    Accept,
    /// Commit with a replacement message.
    Edit(String),
    /// Leave this group's files uncommitted and move on.
    Skip,
    /// Stop; no further group is processed.
    Abort,
}

/// Source of interactive decisions.
///
/// This abstraction allows scripting the operator in tests.
#[cfg_attr(test, mockall::automock)]
pub trait GroupReviewer {
    /// Decide what to do with `group`, the `position`-th (1-based) of `total`.
    fn review(&mut self, group: &CommitGroup, position: usize, total: usize) -> ReviewDecision;

    /// Called once a reviewed group has been committed, failed, or skipped.
    fn outcome(&mut self, _result: &GroupResult) {}
}

const CHOICES: [&str; 4] = ["Accept", "Edit message", "Skip", "Abort"];

/// Terminal reviewer backed by dialoguer prompts.
///
/// A prompt that cannot be shown (no TTY, interrupted) counts as an abort.
#[derive(Debug, Default)]
pub struct DialoguerReviewer;

impl DialoguerReviewer {
    pub fn new() -> Self {
        Self
    }
}

impl GroupReviewer for DialoguerReviewer {
    fn review(&mut self, group: &CommitGroup, position: usize, total: usize) -> ReviewDecision {
        println!();
        println!("Group {}/{}: {}", position, total, group.label);
        println!("  Message: {}", group.message);
        for path in &group.members {
            println!("    {}", path);
        }

        let choice = match Select::new()
            .with_prompt("Commit this group?")
            .items(&CHOICES)
            .default(0)
            .interact()
        {
            Ok(choice) => choice,
            Err(e) => {
                debug!("Review prompt failed: {}", e);
                return ReviewDecision::Abort;
            }
        };

        match choice {
            0 => ReviewDecision::Accept,
            1 => match Input::<String>::new()
                .with_prompt("Commit message")
                .with_initial_text(group.message.clone())
                .interact_text()
            {
                Ok(message) if !message.trim().is_empty() => {
                    ReviewDecision::Edit(message.trim().to_string())
                }
                Ok(_) => ReviewDecision::Accept,
                Err(e) => {
                    debug!("Message prompt failed: {}", e);
                    ReviewDecision::Abort
                }
            },
            2 => ReviewDecision::Skip,
            _ => ReviewDecision::Abort,
        }
    }

    fn outcome(&mut self, result: &GroupResult) {
        match &result.outcome {
            GroupOutcome::Committed { commit_id } => {
                println!("  [DONE] {} ({})", result.message, commit_id.short());
            }
            GroupOutcome::Failed { step, error } => {
                eprintln!("  [FAIL] {} ({}): {}", result.message, step, error);
            }
            GroupOutcome::Skipped => println!("  [SKIP] {}", result.label),
        }
    }
}
