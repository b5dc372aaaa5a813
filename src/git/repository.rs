//! git2-backed [`Vcs`] implementation over the index of a working tree.
//!
//! Only staged changes are considered. The staged state of every path is
//! captured once, before the first index rewrite, and each group is staged
//! from that capture rather than from the working tree, so unstaged hunks and
//! untracked files never reach a commit.

use std::cell::OnceCell;
use std::path::Path;

use git2::{Commit, Delta, Diff, DiffFormat, DiffOptions, ErrorCode, Index, IndexEntry, Repository, Tree};
use tracing::debug;

use super::{CommitId, FileStatus, PendingChange, Vcs};
use crate::error::VcsError;

/// Maximum characters of diff text kept per file before truncation.
const MAX_FILE_DIFF_LENGTH: usize = 20_000;

/// Originally staged state of one path.
struct StagedEntry {
    path: String,
    /// The staged index entry, or `None` for a staged deletion.
    entry: Option<IndexEntry>,
}

/// A non-bare git repository whose staged changes are being partitioned.
pub struct GitRepository {
    repo: Repository,
    original_staging: OnceCell<Vec<StagedEntry>>,
}

impl GitRepository {
    /// Discover the repository containing `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, VcsError> {
        let repo = Repository::discover(path).map_err(VcsError::OpenRepository)?;
        Self::from_repository(repo)
    }

    pub fn from_repository(repo: Repository) -> Result<Self, VcsError> {
        if repo.is_bare() {
            return Err(VcsError::BareRepository);
        }
        Ok(Self {
            repo,
            original_staging: OnceCell::new(),
        })
    }

    /// Root of the working tree.
    pub fn workdir(&self) -> Option<&Path> {
        self.repo.workdir()
    }

    /// Resolve the HEAD tree, distinguishing an unborn branch from real failures.
    ///
    /// Returns `Ok(None)` for repos with no commits yet.
    fn head_tree(&self) -> Result<Option<Tree<'_>>, git2::Error> {
        let head_ref = match self.repo.head() {
            Ok(r) => r,
            Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        head_ref.peel_to_tree().map(Some)
    }

    /// HEAD commit, or `None` on an unborn branch.
    fn head_commit(&self) -> Result<Option<Commit<'_>>, git2::Error> {
        match self.repo.head() {
            Ok(r) => r.peel_to_commit().map(Some),
            Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Diff from HEAD to the index, optionally limited to one literal path.
    fn staged_diff(&self, path: Option<&str>) -> Result<Diff<'_>, git2::Error> {
        let head_tree = self.head_tree()?;
        let mut index = self.repo.index()?;
        index.read(false)?;

        let mut opts = DiffOptions::new();
        if let Some(path) = path {
            opts.pathspec(path).disable_pathspec_match(true);
        }

        self.repo
            .diff_tree_to_index(head_tree.as_ref(), Some(&index), Some(&mut opts))
    }

    /// Staged state captured on first use; later index rewrites do not change it.
    fn original_staging(&self) -> Result<&[StagedEntry], git2::Error> {
        if let Some(entries) = self.original_staging.get() {
            return Ok(entries.as_slice());
        }

        let diff = self.staged_diff(None)?;
        let index = self.repo.index()?;

        let mut entries = Vec::new();
        for delta in diff.deltas() {
            let Some(path) = delta.new_file().path().or_else(|| delta.old_file().path()) else {
                continue;
            };
            let entry = match delta.status() {
                Delta::Deleted => None,
                _ => match index.get_path(path, 0) {
                    Some(entry) => Some(entry),
                    None => continue,
                },
            };
            entries.push(StagedEntry {
                path: path.to_string_lossy().into_owned(),
                entry,
            });
        }

        debug!("Captured {} staged entries", entries.len());
        Ok(self.original_staging.get_or_init(|| entries).as_slice())
    }

    /// Reset `index` to the HEAD tree (empty on an unborn branch).
    fn reset_to_head(&self, index: &mut Index) -> Result<(), git2::Error> {
        match self.head_tree()? {
            Some(tree) => index.read_tree(&tree),
            None => index.clear(),
        }
    }
}

/// Put one path back into its originally staged state.
fn apply_staged(index: &mut Index, staged: &StagedEntry) -> Result<(), git2::Error> {
    match &staged.entry {
        Some(entry) => index.add(entry),
        None => {
            let path = Path::new(&staged.path);
            if index.get_path(path, 0).is_some() {
                index.remove_path(path)
            } else {
                Ok(())
            }
        }
    }
}

impl Vcs for GitRepository {
    fn list_pending_changes(&self) -> Result<Vec<PendingChange>, VcsError> {
        let diff = self.staged_diff(None).map_err(VcsError::Status)?;

        let mut changes: Vec<PendingChange> = diff
            .deltas()
            .filter_map(|delta| {
                let status = match delta.status() {
                    Delta::Added => FileStatus::Added,
                    Delta::Deleted => FileStatus::Deleted,
                    Delta::Unmodified | Delta::Ignored | Delta::Untracked | Delta::Unreadable => {
                        return None;
                    }
                    _ => FileStatus::Modified,
                };
                let path = delta
                    .new_file()
                    .path()
                    .or_else(|| delta.old_file().path())?
                    .to_string_lossy()
                    .to_string();
                Some(PendingChange { path, status })
            })
            .collect();

        changes.sort_by(|a, b| a.path.cmp(&b.path));
        changes.dedup_by(|a, b| a.path == b.path);

        debug!("Found {} staged changes", changes.len());
        Ok(changes)
    }

    fn get_diff(&self, path: &str) -> Result<String, VcsError> {
        let diff_failed = |source| VcsError::Diff {
            path: path.to_string(),
            source,
        };

        let diff = self.staged_diff(Some(path)).map_err(diff_failed)?;

        let mut text = String::new();
        let mut kept_chars = 0;
        let mut truncated = false;
        diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
            if truncated {
                return true;
            }

            // File and hunk headers carry paths, not change content
            let origin = line.origin();
            if !matches!(origin, '+' | '-' | ' ') {
                return true;
            }

            let content = String::from_utf8_lossy(line.content());
            let line_chars = content.chars().count() + 1;
            if kept_chars + line_chars > MAX_FILE_DIFF_LENGTH {
                truncated = true;
                return true;
            }

            text.push(origin);
            text.push_str(&content);
            kept_chars += line_chars;
            true
        })
        .map_err(diff_failed)?;

        if truncated {
            debug!("Diff for {} truncated at {} chars", path, kept_chars);
        }

        Ok(text)
    }

    fn stage_only(&self, paths: &[String]) -> Result<(), VcsError> {
        let original = self.original_staging().map_err(VcsError::Stage)?;
        let mut index = self.repo.index().map_err(VcsError::Stage)?;
        self.reset_to_head(&mut index).map_err(VcsError::Stage)?;

        for path in paths {
            match original.iter().find(|staged| staged.path == *path) {
                Some(staged) => apply_staged(&mut index, staged).map_err(VcsError::Stage)?,
                None => debug!("{} was not staged, leaving it out", path),
            }
        }

        index.write().map_err(VcsError::Stage)?;
        debug!("Staged {} paths", paths.len());
        Ok(())
    }

    fn commit(&self, message: &str) -> Result<CommitId, VcsError> {
        let mut index = self.repo.index().map_err(VcsError::Commit)?;
        let tree_id = index.write_tree().map_err(VcsError::Commit)?;
        let tree = self.repo.find_tree(tree_id).map_err(VcsError::Commit)?;

        let sig = self.repo.signature().map_err(VcsError::Signature)?;

        let parent = self.head_commit().map_err(VcsError::Commit)?;
        let parents: Vec<&Commit<'_>> = parent.iter().collect();

        let oid = self
            .repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .map_err(VcsError::Commit)?;

        Ok(CommitId::from(oid))
    }
}
