//! Splitting a pending change set into disjoint, described commit groups.
//!
//! Pipeline: extract → generate candidates → score & select → resolve → synthesize.
//! Everything after extraction is pure and deterministic.

pub mod candidate;
pub mod extract;
pub mod message;
pub mod resolve;
pub mod score;

use tracing::debug;

use crate::config::PartitionConfig;
use crate::error::PartitionError;
use crate::git::Vcs;

pub use candidate::{
    CandidateName, CandidateOrigin, CandidateSet, FeatureCandidate, Strategy, SymbolKind,
    generate_candidates,
};
pub use extract::{ChangedFile, extract_changes};
pub use message::{CommitGroup, CommitKind, MISC_LABEL, clean_label, synthesize};
pub use resolve::{ResolvedGroup, resolve};
pub use score::{ScoreBreakdown, ScoredCandidate, select};

/// Partition already-extracted files into commit groups.
///
/// The union of all group members equals `files` and no path appears twice.
/// At most `config.max_groups` groups come from candidates; a trailing `misc`
/// group holds whatever they did not claim.
pub fn partition_files(files: &[ChangedFile], config: &PartitionConfig) -> Vec<CommitGroup> {
    let candidates = generate_candidates(files, config.strategy, &config.vocabularies);
    let selected = select(candidates, files, config.max_groups);
    let resolved = resolve(&selected, files);

    let groups: Vec<CommitGroup> = resolved.iter().map(|g| synthesize(g, files)).collect();
    debug!("Partitioned {} files into {} groups", files.len(), groups.len());
    groups
}

/// Extract the pending changes from `vcs` and partition them.
pub fn partition<V: Vcs + ?Sized>(
    vcs: &V,
    config: &PartitionConfig,
) -> Result<Vec<CommitGroup>, PartitionError> {
    let files = extract_changes(vcs)?;
    Ok(partition_files(&files, config))
}
