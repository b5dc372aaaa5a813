//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::path::Path;
use std::sync::Mutex;

use git2::{Oid, Repository, Signature};

use schisma::error::VcsError;
use schisma::git::{CommitId, FileStatus, PendingChange, Vcs};
use schisma::partition::ChangedFile;

/// Build a changed file for pure partitioning tests.
pub fn changed(path: &str, status: FileStatus, diff: &str) -> ChangedFile {
    ChangedFile::new(path, status, diff)
}

/// A test git repository builder for integration tests.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
}

impl TestRepo {
    /// Create a new empty git repository in a temp directory, with an identity configured.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let repo = Repository::init(dir.path()).expect("Failed to init git repo");
        {
            let mut config = repo.config().expect("Failed to open repo config");
            config
                .set_str("user.name", "Test User")
                .expect("Failed to set user.name");
            config
                .set_str("user.email", "test@example.com")
                .expect("Failed to set user.email");
        }
        Self { dir, repo }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Get the test signature for commits.
    fn signature(&self) -> Signature<'_> {
        Signature::now("Test User", "test@example.com").expect("Failed to create signature")
    }

    /// Write a file in the working tree, creating parent directories.
    pub fn write(&self, path: &str, content: &str) {
        let full = self.dir.path().join(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create directories");
        }
        std::fs::write(&full, content).expect("Failed to write file");
    }

    /// Delete a file from the working tree.
    pub fn remove(&self, path: &str) {
        std::fs::remove_file(self.dir.path().join(path)).expect("Failed to remove file");
    }

    /// Stage the working tree state of `path`, including a deletion.
    pub fn stage(&self, path: &str) {
        let mut index = self.repo.index().expect("Failed to get index");
        if self.dir.path().join(path).exists() {
            index.add_path(Path::new(path)).expect("Failed to add path");
        } else {
            index.remove_path(Path::new(path)).expect("Failed to remove path");
        }
        index.write().expect("Failed to write index");
    }

    /// Stage every working tree change without committing.
    pub fn stage_all(&self) {
        let mut index = self.repo.index().expect("Failed to get index");
        index
            .add_all(["*"], git2::IndexAddOption::DEFAULT, None)
            .expect("Failed to add files");
        index
            .update_all(["*"], None)
            .expect("Failed to update index");
        index.write().expect("Failed to write index");
    }

    /// Content of `path` as committed at HEAD.
    pub fn head_content(&self, path: &str) -> String {
        let tree = self
            .repo
            .head()
            .and_then(|h| h.peel_to_tree())
            .expect("Failed to resolve HEAD tree");
        let entry = tree.get_path(Path::new(path)).expect("Path not in HEAD");
        let blob = self.repo.find_blob(entry.id()).expect("Failed to find blob");
        String::from_utf8_lossy(blob.content()).into_owned()
    }

    /// Stage every working tree change and commit it. Returns the commit OID.
    pub fn commit_all(&self, message: &str) -> Oid {
        let sig = self.signature();

        self.stage_all();
        let mut index = self.repo.index().expect("Failed to get index");
        index.read(false).expect("Failed to read index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");

        // Get parent commit if exists
        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("Failed to create commit")
    }

    /// Commit messages from HEAD back to the root, newest first.
    pub fn log(&self) -> Vec<String> {
        let mut revwalk = self.repo.revwalk().expect("Failed to create revwalk");
        if revwalk.push_head().is_err() {
            return Vec::new();
        }
        revwalk
            .map(|oid| {
                let commit = self
                    .repo
                    .find_commit(oid.expect("Failed to walk"))
                    .expect("Failed to find commit");
                commit.message().unwrap_or_default().to_string()
            })
            .collect()
    }

    /// Paths changed by the commit with the given message, sorted.
    pub fn paths_in_commit(&self, message: &str) -> Vec<String> {
        let mut revwalk = self.repo.revwalk().expect("Failed to create revwalk");
        revwalk.push_head().expect("Failed to push HEAD");

        for oid in revwalk {
            let commit = self
                .repo
                .find_commit(oid.expect("Failed to walk"))
                .expect("Failed to find commit");
            if commit.message() != Some(message) {
                continue;
            }

            let tree = commit.tree().expect("Failed to get tree");
            let parent_tree = commit.parent(0).ok().and_then(|p| p.tree().ok());
            let diff = self
                .repo
                .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)
                .expect("Failed to diff commit");

            let mut paths: Vec<String> = diff
                .deltas()
                .filter_map(|d| d.new_file().path().or_else(|| d.old_file().path()))
                .map(|p| p.to_string_lossy().into_owned())
                .collect();
            paths.sort();
            return paths;
        }

        panic!("No commit with message {:?}", message);
    }
}

/// A recorded call against [`FakeVcs`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VcsCall {
    ListPendingChanges,
    GetDiff(String),
    StageOnly(Vec<String>),
    Commit(String),
}

/// In-memory VCS for driving the engine without a repository.
///
/// Features:
/// - Fixed pending change set with per-file diff text
/// - Call tracking for verification
/// - Error injection on commit (by message) and on staging (by path)
pub struct FakeVcs {
    changes: Vec<(PendingChange, String)>,
    calls: Mutex<Vec<VcsCall>>,
    staged: Mutex<Vec<String>>,
    commits: Mutex<Vec<(String, Vec<String>)>>,
    fail_commit_messages: Mutex<Vec<String>>,
    fail_stage_paths: Mutex<Vec<String>>,
}

impl FakeVcs {
    pub fn new(changes: &[(&str, FileStatus, &str)]) -> Self {
        Self {
            changes: changes
                .iter()
                .map(|(path, status, diff)| (PendingChange::new(*path, *status), diff.to_string()))
                .collect(),
            calls: Mutex::new(Vec::new()),
            staged: Mutex::new(Vec::new()),
            commits: Mutex::new(Vec::new()),
            fail_commit_messages: Mutex::new(Vec::new()),
            fail_stage_paths: Mutex::new(Vec::new()),
        }
    }

    // === Error injection methods ===

    /// Make `commit` fail whenever it is called with `message`.
    pub fn fail_commit(&self, message: &str) {
        self.fail_commit_messages.lock().unwrap().push(message.to_string());
    }

    /// Make `stage_only` fail whenever `path` is among the paths to stage.
    pub fn fail_stage(&self, path: &str) {
        self.fail_stage_paths.lock().unwrap().push(path.to_string());
    }

    // === Call verification methods ===

    pub fn calls(&self) -> Vec<VcsCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Successful commits as (message, staged paths at commit time).
    pub fn commits(&self) -> Vec<(String, Vec<String>)> {
        self.commits.lock().unwrap().clone()
    }

    pub fn staged(&self) -> Vec<String> {
        self.staged.lock().unwrap().clone()
    }

    fn record(&self, call: VcsCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Vcs for FakeVcs {
    fn list_pending_changes(&self) -> Result<Vec<PendingChange>, VcsError> {
        self.record(VcsCall::ListPendingChanges);
        Ok(self.changes.iter().map(|(change, _)| change.clone()).collect())
    }

    fn get_diff(&self, path: &str) -> Result<String, VcsError> {
        self.record(VcsCall::GetDiff(path.to_string()));
        Ok(self
            .changes
            .iter()
            .find(|(change, _)| change.path == path)
            .map(|(_, diff)| diff.clone())
            .unwrap_or_default())
    }

    fn stage_only(&self, paths: &[String]) -> Result<(), VcsError> {
        self.record(VcsCall::StageOnly(paths.to_vec()));

        let failing = self.fail_stage_paths.lock().unwrap();
        if let Some(path) = paths.iter().find(|p| failing.contains(p)) {
            return Err(VcsError::Stage(git2::Error::from_str(&format!(
                "cannot stage {}",
                path
            ))));
        }

        *self.staged.lock().unwrap() = paths.to_vec();
        Ok(())
    }

    fn commit(&self, message: &str) -> Result<CommitId, VcsError> {
        self.record(VcsCall::Commit(message.to_string()));

        if self
            .fail_commit_messages
            .lock()
            .unwrap()
            .iter()
            .any(|m| m == message)
        {
            return Err(VcsError::Commit(git2::Error::from_str("pre-commit hook failed")));
        }

        let mut commits = self.commits.lock().unwrap();
        commits.push((message.to_string(), self.staged.lock().unwrap().clone()));
        Ok(CommitId(format!("{:040x}", commits.len())))
    }
}
