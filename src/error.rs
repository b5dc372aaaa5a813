//! Error types for schisma modules using thiserror.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from the version-control collaborator.
#[derive(Error, Debug)]
pub enum VcsError {
    #[error("Failed to open repository: {0}")]
    OpenRepository(#[source] git2::Error),

    #[error("Bare repositories have no working tree to partition")]
    BareRepository,

    #[error("Failed to list staged changes: {0}")]
    Status(#[source] git2::Error),

    #[error("Failed to collect diff for '{path}': {source}")]
    Diff {
        path: String,
        #[source]
        source: git2::Error,
    },

    #[error("Failed to stage files: {0}")]
    Stage(#[source] git2::Error),

    #[error("Failed to create commit: {0}")]
    Commit(#[source] git2::Error),

    #[error("Git config error (missing user.name or user.email): {0}")]
    Signature(#[source] git2::Error),
}

impl VcsError {
    /// Whether the failure happened while replacing the staged set.
    pub fn is_stage_error(&self) -> bool {
        matches!(self, Self::Stage(_))
    }

    /// Whether the failure happened while writing the commit itself.
    pub fn is_commit_error(&self) -> bool {
        matches!(self, Self::Commit(_) | Self::Signature(_))
    }
}

/// Errors that stop a partitioning run before any group is produced.
#[derive(Error, Debug)]
pub enum PartitionError {
    #[error("No staged changes to partition (index matches HEAD)")]
    NoStagedChanges,

    #[error(transparent)]
    Vcs(#[from] VcsError),
}

/// Errors from loading a configuration file.
///
/// Invalid option values are not errors; they fall back to defaults.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {source}", path.display())]
    ParseFailed {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
