//! Path-structure candidates: top-level segment, known feature directories, extension.

use super::{CandidateName, CandidateSet};
use crate::partition::extract::ChangedFile;

/// Generate path candidates for every file, in file order.
///
/// Per file the emission order is: top-level segment, each feature-vocabulary
/// directory from shallow to deep (named by the path truncated through it),
/// then the extension token.
pub fn generate(files: &[ChangedFile], feature_segments: &[String]) -> CandidateSet {
    let mut set = CandidateSet::new();

    for (idx, file) in files.iter().enumerate() {
        let segments: Vec<&str> = file.segments().collect();
        let Some((file_name, dirs)) = segments.split_last() else {
            continue;
        };

        // A root-level file is its own top-level segment
        let top = dirs.first().unwrap_or(file_name);
        set.add(CandidateName::path(*top), idx);

        for (depth, segment) in dirs.iter().enumerate() {
            if is_feature_segment(segment, feature_segments) {
                set.add(CandidateName::path(dirs[..=depth].join("/")), idx);
            }
        }

        if !file.extension.is_empty() {
            set.add(CandidateName::extension(file.extension.as_str()), idx);
        }
    }

    set
}

fn is_feature_segment(segment: &str, feature_segments: &[String]) -> bool {
    let segment = segment.to_lowercase();
    feature_segments.iter().any(|known| *known == segment)
}
