//! Candidate scoring and top-K selection.
//!
//! ```text
//! score = 0.4 * fileCount + 0.3 * coherence + 0.2 * specificity + 0.1 * coverage
//! ```

use std::cmp::Ordering;

use tracing::debug;

use super::candidate::{CandidateOrigin, CandidateSet, FeatureCandidate};
use super::extract::ChangedFile;

const FILE_COUNT_WEIGHT: f64 = 0.4;
const COHERENCE_WEIGHT: f64 = 0.3;
const SPECIFICITY_WEIGHT: f64 = 0.2;
const COVERAGE_WEIGHT: f64 = 0.1;

/// The four score components and their weighted total.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub file_count: usize,
    /// Leading path segments shared by every member (0 for singletons).
    pub coherence: usize,
    pub specificity: usize,
    /// Fraction of the run's files claimed by the candidate.
    pub coverage: f64,
    pub total: f64,
}

/// A candidate with its score and discovery position.
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub candidate: FeatureCandidate,
    pub breakdown: ScoreBreakdown,
    /// Position in generator emission order; breaks score ties.
    pub discovery: usize,
}

impl ScoredCandidate {
    pub fn score(&self) -> f64 {
        self.breakdown.total
    }

    /// Extension groups only count when their files share a directory.
    fn is_eligible(&self) -> bool {
        !(self.candidate.name.origin == CandidateOrigin::Extension
            && self.breakdown.coherence == 0)
    }
}

/// Number of leading path segments shared identically by every member.
pub fn coherence(candidate: &FeatureCandidate, files: &[ChangedFile]) -> usize {
    if candidate.file_count() < 2 {
        return 0;
    }

    let paths: Vec<Vec<&str>> = candidate
        .members()
        .iter()
        .map(|&idx| files[idx].segments().collect())
        .collect();

    let shortest = paths.iter().map(Vec::len).min().unwrap_or(0);
    let first = &paths[0];

    (0..shortest)
        .take_while(|&pos| paths.iter().all(|p| p[pos] == first[pos]))
        .count()
}

pub fn score_candidate(candidate: &FeatureCandidate, files: &[ChangedFile]) -> ScoreBreakdown {
    let file_count = candidate.file_count();
    let coherence = coherence(candidate, files);
    let specificity = candidate.name.specificity();
    let coverage = if files.is_empty() {
        0.0
    } else {
        file_count as f64 / files.len() as f64
    };

    let total = FILE_COUNT_WEIGHT * file_count as f64
        + COHERENCE_WEIGHT * coherence as f64
        + SPECIFICITY_WEIGHT * specificity as f64
        + COVERAGE_WEIGHT * coverage;

    ScoreBreakdown {
        file_count,
        coherence,
        specificity,
        coverage,
        total,
    }
}

/// Score every candidate, order by score descending (discovery order on ties),
/// and keep the top `max_groups`.
pub fn select(
    candidates: CandidateSet,
    files: &[ChangedFile],
    max_groups: usize,
) -> Vec<ScoredCandidate> {
    let mut scored: Vec<ScoredCandidate> = candidates
        .into_vec()
        .into_iter()
        .enumerate()
        .map(|(discovery, candidate)| ScoredCandidate {
            breakdown: score_candidate(&candidate, files),
            candidate,
            discovery,
        })
        .filter(ScoredCandidate::is_eligible)
        .collect();

    // Stable sort keeps discovery order for equal scores
    scored.sort_by(|a, b| b.score().partial_cmp(&a.score()).unwrap_or(Ordering::Equal));
    scored.truncate(max_groups);

    for (rank, s) in scored.iter().enumerate() {
        debug!(
            "Selected #{} {} score={:.3} files={} coherence={} specificity={}",
            rank + 1,
            s.candidate.name,
            s.score(),
            s.breakdown.file_count,
            s.breakdown.coherence,
            s.breakdown.specificity
        );
    }

    scored
}
