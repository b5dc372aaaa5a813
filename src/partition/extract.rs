//! Change descriptor extraction: pending changes into typed [`ChangedFile`] records.

use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::PartitionError;
use crate::git::{FileStatus, Vcs};

/// One pending modification, immutable once extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedFile {
    pub path: String,
    /// Change body for this file (empty for binary files).
    pub diff_text: String,
    pub status: FileStatus,
    /// Lowercase extension token, empty when the file has none.
    pub extension: String,
}

impl ChangedFile {
    pub fn new(path: impl Into<String>, status: FileStatus, diff_text: impl Into<String>) -> Self {
        let path = path.into();
        let extension = extension_of(&path);
        Self {
            path,
            diff_text: diff_text.into(),
            status,
            extension,
        }
    }

    /// `/`-delimited path segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.path.split('/').filter(|s| !s.is_empty())
    }
}

fn extension_of(path: &str) -> String {
    Path::new(path)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// Fetch the pending change set and the diff text of every file.
///
/// Fails with [`PartitionError::NoStagedChanges`] before any diff is fetched
/// when there is nothing pending. Duplicate paths keep their first occurrence.
pub fn extract_changes<V: Vcs + ?Sized>(vcs: &V) -> Result<Vec<ChangedFile>, PartitionError> {
    let pending = vcs.list_pending_changes()?;
    if pending.is_empty() {
        return Err(PartitionError::NoStagedChanges);
    }

    let mut seen: HashSet<String> = HashSet::with_capacity(pending.len());
    let mut files = Vec::with_capacity(pending.len());

    for change in pending {
        if !seen.insert(change.path.clone()) {
            warn!("Ignoring duplicate pending change for {}", change.path);
            continue;
        }

        let diff_text = vcs.get_diff(&change.path)?;
        files.push(ChangedFile::new(change.path, change.status, diff_text));
    }

    debug!("Extracted {} changed files", files.len());
    Ok(files)
}
