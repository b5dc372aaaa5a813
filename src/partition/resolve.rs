//! Conflict resolution: every changed file ends up in exactly one group.
//!
//! Each file owns a single assignment slot that is written once, so groups
//! cannot overlap and every file lands either in a selected candidate or in
//! the trailing `misc` group.

use tracing::debug;

use super::candidate::CandidateName;
use super::extract::ChangedFile;
use super::score::ScoredCandidate;

/// A disjoint group of file indices, before message synthesis.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedGroup {
    /// Candidate the group came from; `None` for the misc fallback group.
    pub name: Option<CandidateName>,
    /// File indices in input order.
    pub members: Vec<usize>,
}

impl ResolvedGroup {
    pub fn is_misc(&self) -> bool {
        self.name.is_none()
    }
}

/// Assign every file to the best selected candidate containing it.
///
/// `selected` must be in selection order (score descending, discovery order on
/// ties); the first candidate containing a file therefore wins it. Candidates
/// left empty are dropped; unclaimed files form one `misc` group at the end.
pub fn resolve(selected: &[ScoredCandidate], files: &[ChangedFile]) -> Vec<ResolvedGroup> {
    let assignment: Vec<Option<usize>> = (0..files.len())
        .map(|file| selected.iter().position(|s| s.candidate.contains(file)))
        .collect();

    let mut groups: Vec<ResolvedGroup> = selected
        .iter()
        .enumerate()
        .filter_map(|(slot, s)| {
            let members: Vec<usize> = assignment
                .iter()
                .enumerate()
                .filter(|(_, owner)| **owner == Some(slot))
                .map(|(file, _)| file)
                .collect();

            if members.is_empty() {
                debug!("Dropping {}: all files claimed by higher-scoring groups", s.candidate.name);
                return None;
            }

            Some(ResolvedGroup {
                name: Some(s.candidate.name.clone()),
                members,
            })
        })
        .collect();

    let unassigned: Vec<usize> = assignment
        .iter()
        .enumerate()
        .filter(|(_, owner)| owner.is_none())
        .map(|(file, _)| file)
        .collect();

    if !unassigned.is_empty() {
        debug!("{} files fall back to misc", unassigned.len());
        groups.push(ResolvedGroup {
            name: None,
            members: unassigned,
        });
    }

    groups
}
