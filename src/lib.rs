//! schisma - A CLI tool that splits pending git changes into coherent conventional commits.
//!
//! # Overview
//!
//! schisma looks at every pending change in a working tree, proposes feature
//! groups from path structure and diff content, scores them, resolves overlaps
//! so each file lands in exactly one group, and synthesizes a conventional
//! commit message per group. The groups can be reported, committed
//! automatically, or reviewed one by one.

pub mod config;
pub mod error;
pub mod execute;
pub mod git;
pub mod partition;
pub mod report;

// Re-export commonly used types
pub use config::{PartitionConfig, RawConfig, Vocabularies, load_config};
pub use error::{ConfigError, PartitionError, VcsError};
pub use execute::{
    Execution, Executor, FailurePolicy, FailureStep, GroupOutcome, GroupResult, RunMode, RunResult,
};
pub use git::{CommitId, FileStatus, GitRepository, PendingChange, Vcs};
pub use partition::{ChangedFile, CommitGroup, CommitKind, Strategy, partition, partition_files};
pub use report::AnalysisReport;
