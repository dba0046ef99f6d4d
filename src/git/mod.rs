//! Git collaborator: repository detection, staged diff and commit.

pub mod diff;
pub mod executor;

use std::path::PathBuf;

use async_trait::async_trait;
use git2::Repository;
use tracing::debug;

use crate::commit::CommitCandidate;
use crate::error::ShellError;

/// Operations the session needs from git.
///
/// This abstraction allows replacing git with a stub in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Git: Send + Sync {
    /// Whether the working directory is inside a git repository. Never fails.
    async fn is_in_repository(&self) -> bool;

    /// Text of `git diff --staged`. Empty when nothing is staged.
    async fn staged_diff(&self) -> Result<String, ShellError>;

    /// Commit the staged changes with `candidate` as the message and
    /// return git's summary output.
    async fn commit(&self, candidate: &CommitCandidate) -> Result<String, ShellError>;
}

/// [`Git`] backed by `git2` for reads and the `git` binary for commits.
#[derive(Debug, Clone)]
pub struct SystemGit {
    workdir: PathBuf,
}

impl SystemGit {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }
}

#[async_trait]
impl Git for SystemGit {
    async fn is_in_repository(&self) -> bool {
        match Repository::discover(&self.workdir) {
            Ok(repo) => !repo.is_bare(),
            Err(e) => {
                debug!("No repository at {}: {}", self.workdir.display(), e);
                false
            }
        }
    }

    async fn staged_diff(&self) -> Result<String, ShellError> {
        let repo = Repository::discover(&self.workdir).map_err(ShellError::Repository)?;
        diff::staged_diff(&repo)
    }

    async fn commit(&self, candidate: &CommitCandidate) -> Result<String, ShellError> {
        executor::commit(&self.workdir, candidate).await
    }
}
