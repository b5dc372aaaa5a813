//! Version-control collaborator: staged changes, per-file diffs, staging and commits.

pub mod repository;

use std::fmt;

use serde::Serialize;

use crate::error::VcsError;

pub use repository::GitRepository;

/// Status of a pending file change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileStatus {
    Added,
    Modified,
    Deleted,
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileStatus::Added => write!(f, "Added"),
            FileStatus::Modified => write!(f, "Modified"),
            FileStatus::Deleted => write!(f, "Deleted"),
        }
    }
}

/// A pending change as reported by the VCS, before diff text is fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingChange {
    pub path: String,
    pub status: FileStatus,
}

impl PendingChange {
    pub fn new(path: impl Into<String>, status: FileStatus) -> Self {
        Self {
            path: path.into(),
            status,
        }
    }
}

/// Identifier of a commit created by [`Vcs::commit`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CommitId(pub String);

impl CommitId {
    /// Abbreviated form for display (first 7 characters).
    pub fn short(&self) -> &str {
        let end = self
            .0
            .char_indices()
            .nth(7)
            .map(|(i, _)| i)
            .unwrap_or(self.0.len());
        &self.0[..end]
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<git2::Oid> for CommitId {
    fn from(oid: git2::Oid) -> Self {
        Self(oid.to_string())
    }
}

/// Operations the partitioning engine needs from the version-control system.
///
/// This abstraction allows driving the executor against an in-memory fake in tests.
#[cfg_attr(test, mockall::automock)]
pub trait Vcs {
    /// List every staged change relative to HEAD.
    fn list_pending_changes(&self) -> Result<Vec<PendingChange>, VcsError>;

    /// Staged change body for a single path.
    fn get_diff(&self, path: &str) -> Result<String, VcsError>;

    /// Replace the staged set with the originally staged state of exactly `paths`.
    fn stage_only(&self, paths: &[String]) -> Result<(), VcsError>;

    /// Commit the current staged set.
    fn commit(&self, message: &str) -> Result<CommitId, VcsError>;
}
