//! Conventional commit message synthesis for resolved groups.

use serde::Serialize;

use super::candidate::CandidateName;
use super::extract::ChangedFile;
use super::resolve::ResolvedGroup;
use crate::git::FileStatus;

/// Label of the fallback group holding files no candidate claimed.
pub const MISC_LABEL: &str = "Misc";

/// Conventional commit type derived from member statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitKind {
    Feat,
    Fix,
    Refactor,
    Chore,
}

impl CommitKind {
    /// All added → feat, all modified → fix, all deleted → refactor, otherwise chore.
    pub fn classify<I>(statuses: I) -> Self
    where
        I: IntoIterator<Item = FileStatus>,
    {
        let mut statuses = statuses.into_iter();
        let Some(first) = statuses.next() else {
            return Self::Chore;
        };
        if statuses.any(|s| s != first) {
            return Self::Chore;
        }

        match first {
            FileStatus::Added => Self::Feat,
            FileStatus::Modified => Self::Fix,
            FileStatus::Deleted => Self::Refactor,
        }
    }

    /// Message prefix, including the trailing space before the label.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Feat => "feat: Add ",
            Self::Fix => "fix: Update ",
            Self::Refactor => "refactor: Remove ",
            Self::Chore => "chore: Update ",
        }
    }
}

/// Final output group: a disjoint set of paths and the message to commit them with.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitGroup {
    pub label: String,
    pub message: String,
    pub kind: CommitKind,
    /// Tagged candidate name, absent for the misc group.
    pub candidate: Option<String>,
    pub members: Vec<String>,
}

impl CommitGroup {
    pub fn is_misc(&self) -> bool {
        self.candidate.is_none()
    }
}

/// Human-readable label: origin tag dropped, separators as spaces, sentence case.
pub fn clean_label(name: &CandidateName) -> String {
    let spaced = name
        .value
        .split('/')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    sentence_case(&spaced)
}

fn sentence_case(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Build the commit group for a resolved group.
pub fn synthesize(group: &ResolvedGroup, files: &[ChangedFile]) -> CommitGroup {
    let label = group
        .name
        .as_ref()
        .map(clean_label)
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| MISC_LABEL.to_string());

    let kind = CommitKind::classify(group.members.iter().map(|&idx| files[idx].status));
    let message = format!("{}{}", kind.prefix(), label);

    CommitGroup {
        label,
        message,
        kind,
        candidate: group.name.as_ref().map(ToString::to_string),
        members: group
            .members
            .iter()
            .map(|&idx| files[idx].path.clone())
            .collect(),
    }
}
