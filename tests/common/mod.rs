//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use git2::{Oid, Repository, Signature};

use commitai::error::{GenerationError, ShellError};
use commitai::llm::CompletionBackend;
use commitai::{CommitCandidate, Git};

/// A test git repository builder for integration tests.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
}

impl TestRepo {
    /// Create a new empty git repository in a temp directory.
    ///
    /// Identity and signing are configured locally so `git commit` works
    /// regardless of the machine's global configuration.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let repo = Repository::init(dir.path()).expect("Failed to init git repo");
        {
            let mut config = repo.config().expect("Failed to open repo config");
            config.set_str("user.name", "Test User").expect("Failed to set user.name");
            config
                .set_str("user.email", "test@example.com")
                .expect("Failed to set user.email");
            config
                .set_bool("commit.gpgsign", false)
                .expect("Failed to disable signing");
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

    /// Write `content` to `name` and add it to the index.
    pub fn stage_file(&self, name: &str, content: &str) {
        std::fs::write(self.dir.path().join(name), content).expect("Failed to write test file");
        let mut index = self.repo.index().expect("Failed to get index");
        index.add_path(Path::new(name)).expect("Failed to add file");
        index.write().expect("Failed to write index");
    }

    /// Stage `name` with `content` and commit it. Returns the commit OID.
    pub fn commit_file(&self, name: &str, content: &str, message: &str) -> Oid {
        self.stage_file(name, content);

        let sig = self.signature();
        let mut index = self.repo.index().expect("Failed to get index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");

        // Get parent commit if exists
        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("Failed to create commit")
    }

    /// Full message of the commit HEAD points to.
    pub fn head_message(&self) -> String {
        let head = self.repo.head().expect("Failed to read HEAD");
        let commit = head.peel_to_commit().expect("HEAD is not a commit");
        commit.message().unwrap_or_default().to_string()
    }

    pub fn commit_count(&self) -> usize {
        let mut walk = self.repo.revwalk().expect("Failed to create revwalk");
        if walk.push_head().is_err() {
            return 0;
        }
        walk.count()
    }
}

/// A completion backend that replays canned responses in order.
///
/// Once the script runs out the last response is repeated.
pub struct ScriptedBackend {
    responses: Mutex<VecDeque<Result<Vec<String>, GenerationError>>>,
    last: Mutex<Option<Vec<String>>>,
    calls: AtomicUsize,
}

impl ScriptedBackend {
    pub fn new(responses: Vec<Result<Vec<String>, GenerationError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            last: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    /// A backend that always returns `text` as its single choice.
    pub fn always(text: &str) -> Self {
        Self::new(vec![Ok(vec![text.to_string()])])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionBackend for ScriptedBackend {
    async fn complete(&self, _prompt: &str) -> Result<Vec<String>, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(Ok(choices)) => {
                *self.last.lock().unwrap() = Some(choices.clone());
                Ok(choices)
            }
            Some(Err(e)) => Err(e),
            None => Ok(self.last.lock().unwrap().clone().unwrap_or_default()),
        }
    }
}

/// A git collaborator that serves a fixed diff and records commits.
pub struct StubGit {
    pub in_repository: bool,
    pub diff: String,
    pub fail_commit: bool,
    pub commits: Mutex<Vec<CommitCandidate>>,
}

impl StubGit {
    pub fn with_diff(diff: &str) -> Self {
        Self {
            in_repository: true,
            diff: diff.to_string(),
            fail_commit: false,
            commits: Mutex::new(Vec::new()),
        }
    }

    pub fn outside_repository() -> Self {
        Self {
            in_repository: false,
            ..Self::with_diff("")
        }
    }

    pub fn committed(&self) -> Vec<CommitCandidate> {
        self.commits.lock().unwrap().clone()
    }
}

#[async_trait]
impl Git for StubGit {
    async fn is_in_repository(&self) -> bool {
        self.in_repository
    }

    async fn staged_diff(&self) -> Result<String, ShellError> {
        Ok(self.diff.clone())
    }

    async fn commit(&self, candidate: &CommitCandidate) -> Result<String, ShellError> {
        if self.fail_commit {
            return Err(ShellError::NonZeroExit {
                operation: "commit".to_string(),
                code: 1,
                stderr: "pre-commit hook failed".to_string(),
            });
        }
        self.commits.lock().unwrap().push(candidate.clone());
        Ok(format!("[main 1a2b3c4] {}", candidate.subject))
    }
}

/// A staged diff used by session tests.
pub const SAMPLE_DIFF: &str = "diff --git a/src/lib.rs b/src/lib.rs
--- a/src/lib.rs
+++ b/src/lib.rs
@@ -1 +1,2 @@
 pub mod app;
+pub mod tui;
";

/// Build a `commit_messages` payload from subjects with empty bodies.
pub fn payload(subjects: &[&str]) -> String {
    serde_json::json!({ "commit_messages": subjects }).to_string()
}
