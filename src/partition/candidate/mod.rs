//! Feature candidates: hypotheses that a subset of changed files forms one group.
//!
//! Each sub-generator produces its own [`CandidateSet`]; sets are then merged by
//! tagged name, so a name emitted by both generators accumulates members from both.
//! Insertion order is preserved throughout and serves as the deterministic
//! tie-break for scoring.

pub mod content;
pub mod path;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use tracing::debug;

use super::extract::ChangedFile;
use crate::config::Vocabularies;

/// Which sub-generators run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strategy {
    Path,
    Content,
    #[default]
    Hybrid,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Content => "content",
            Self::Hybrid => "hybrid",
        }
    }

    fn uses_path(&self) -> bool {
        matches!(self, Self::Path | Self::Hybrid)
    }

    fn uses_content(&self) -> bool {
        matches!(self, Self::Content | Self::Hybrid)
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "path" => Ok(Self::Path),
            "content" => Ok(Self::Content),
            "hybrid" => Ok(Self::Hybrid),
            _ => Err(format!("Unknown strategy: {}", s)),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of declaration a symbol candidate was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Function,
    Type,
}

/// Where a candidate name came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CandidateOrigin {
    Path,
    Extension,
    Term,
    Symbol(SymbolKind),
}

impl CandidateOrigin {
    /// Prefix rendered in front of the value; path names are untagged.
    pub fn tag(&self) -> Option<&'static str> {
        match self {
            Self::Path => None,
            Self::Extension => Some("ext"),
            Self::Term => Some("term"),
            Self::Symbol(SymbolKind::Function) => Some("fn"),
            Self::Symbol(SymbolKind::Type) => Some("type"),
        }
    }
}

/// Tagged candidate identifier, e.g. `src/core`, `ext:rs`, `term:config`, `fn:parse`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CandidateName {
    pub origin: CandidateOrigin,
    pub value: String,
}

impl CandidateName {
    pub fn path(value: impl Into<String>) -> Self {
        Self {
            origin: CandidateOrigin::Path,
            value: value.into(),
        }
    }

    pub fn extension(value: impl Into<String>) -> Self {
        Self {
            origin: CandidateOrigin::Extension,
            value: value.into(),
        }
    }

    pub fn term(value: impl Into<String>) -> Self {
        Self {
            origin: CandidateOrigin::Term,
            value: value.into(),
        }
    }

    pub fn symbol(kind: SymbolKind, value: impl Into<String>) -> Self {
        Self {
            origin: CandidateOrigin::Symbol(kind),
            value: value.into(),
        }
    }

    /// Number of `/`-delimited segments in the value.
    pub fn specificity(&self) -> usize {
        self.value.split('/').filter(|s| !s.is_empty()).count()
    }
}

impl fmt::Display for CandidateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.origin.tag() {
            Some(tag) => write!(f, "{}:{}", tag, self.value),
            None => f.write_str(&self.value),
        }
    }
}

/// A named candidate and the files (indices into the run's file list) it claims.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureCandidate {
    pub name: CandidateName,
    members: Vec<usize>,
}

impl FeatureCandidate {
    /// Member file indices in first-insertion order.
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    pub fn file_count(&self) -> usize {
        self.members.len()
    }

    pub fn contains(&self, file: usize) -> bool {
        self.members.contains(&file)
    }
}

/// Insertion-ordered, name-keyed collection of candidates.
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    candidates: Vec<FeatureCandidate>,
    positions: HashMap<CandidateName, usize>,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `file` as a member of the candidate called `name`, creating it if new.
    pub fn add(&mut self, name: CandidateName, file: usize) {
        match self.positions.get(&name) {
            Some(&pos) => {
                let candidate = &mut self.candidates[pos];
                if !candidate.members.contains(&file) {
                    candidate.members.push(file);
                }
            }
            None => {
                self.positions.insert(name.clone(), self.candidates.len());
                self.candidates.push(FeatureCandidate {
                    name,
                    members: vec![file],
                });
            }
        }
    }

    /// Union `other` into this set; new names are appended in `other`'s order.
    pub fn merge(&mut self, other: CandidateSet) {
        for candidate in other.candidates {
            for file in candidate.members {
                self.add(candidate.name.clone(), file);
            }
        }
    }

    pub fn get(&self, name: &CandidateName) -> Option<&FeatureCandidate> {
        self.positions.get(name).map(|&pos| &self.candidates[pos])
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeatureCandidate> {
        self.candidates.iter()
    }

    pub fn into_vec(self) -> Vec<FeatureCandidate> {
        self.candidates
    }
}

/// Run the sub-generators selected by `strategy` and merge their output.
pub fn generate_candidates(
    files: &[ChangedFile],
    strategy: Strategy,
    vocabularies: &Vocabularies,
) -> CandidateSet {
    let mut set = CandidateSet::new();

    if strategy.uses_path() {
        set.merge(path::generate(files, &vocabularies.feature_segments));
    }
    if strategy.uses_content() {
        set.merge(content::generate(files, &vocabularies.domain_terms));
    }

    debug!(
        "Generated {} candidates from {} files (strategy={})",
        set.len(),
        files.len(),
        strategy
    );
    set
}
