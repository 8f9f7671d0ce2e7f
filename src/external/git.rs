//! Git command abstractions
//!
//! Provides trait-based abstractions for the git operations the backport
//! protocol needs, enabling testable integrations through dependency
//! injection.

use super::command::{CommandError, CommandExecutor};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

pub type BranchName = String;

#[derive(Debug, Error)]
pub enum GitError {
    /// Cherry-pick stopped on a merge conflict; the working tree holds the
    /// conflicted state until a human resolves it.
    #[error("Cherry-pick conflict: {message}")]
    Conflict { message: String },
    #[error("Command execution error: {source}")]
    CommandError {
        #[from]
        source: CommandError,
    },
    #[error("Git command failed: {message}")]
    GitCommandFailed { message: String },
}

impl GitError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, GitError::Conflict { .. })
    }
}

/// Trait for the git operations used by a backport run
///
/// This abstraction enables testing the orchestration without touching an
/// actual repository, while preserving the exact command surface the
/// application issues.
#[async_trait]
pub trait GitRepository: Send + Sync {
    /// Checkout an existing ref (a release branch used as the backport base)
    async fn checkout(&self, reference: &str) -> Result<(), GitError>;

    /// Create a new branch from the current HEAD and switch to it
    async fn create_branch(&self, branch: &BranchName) -> Result<(), GitError>;

    /// Apply a commit or branch onto the current branch
    async fn cherry_pick(&self, source: &str) -> Result<(), GitError>;

    /// Continue an in-progress cherry-pick after conflicts were resolved
    async fn cherry_pick_continue(&self) -> Result<(), GitError>;

    /// Push a branch to a remote
    async fn push(&self, remote: &str, branch: &BranchName) -> Result<(), GitError>;
}

/// Real git CLI implementation
pub struct GitClient {
    executor: Arc<dyn CommandExecutor>,
}

impl GitClient {
    pub fn new(executor: Arc<dyn CommandExecutor>) -> Self {
        Self { executor }
    }

    async fn execute_git_command(&self, args: &[&str]) -> Result<String, GitError> {
        let output = self.executor.execute("git", args).await?;

        if !output.success() {
            return Err(GitError::GitCommandFailed {
                message: output.stderr.trim().to_string(),
            });
        }

        Ok(output.stdout.trim().to_string())
    }

    // Cherry-pick is the only operation where conflicts are an expected,
    // recoverable outcome. git signals them through free-text stderr (the
    // exit code is shared with other failures), so classification is a
    // substring match on "conflict".
    fn classify_cherry_pick_error(stderr: &str) -> GitError {
        if stderr.to_lowercase().contains("conflict") {
            GitError::Conflict {
                message: stderr.trim().to_string(),
            }
        } else {
            GitError::GitCommandFailed {
                message: stderr.trim().to_string(),
            }
        }
    }
}

#[async_trait]
impl GitRepository for GitClient {
    async fn checkout(&self, reference: &str) -> Result<(), GitError> {
        self.execute_git_command(&["checkout", reference]).await?;
        Ok(())
    }

    async fn create_branch(&self, branch: &BranchName) -> Result<(), GitError> {
        self.execute_git_command(&["checkout", "-b", branch]).await?;
        Ok(())
    }

    async fn cherry_pick(&self, source: &str) -> Result<(), GitError> {
        let output = self.executor.execute("git", &["cherry-pick", source]).await?;

        if !output.success() {
            return Err(Self::classify_cherry_pick_error(&output.stderr));
        }

        Ok(())
    }

    async fn cherry_pick_continue(&self) -> Result<(), GitError> {
        self.execute_git_command(&["cherry-pick", "--continue"]).await?;
        Ok(())
    }

    async fn push(&self, remote: &str, branch: &BranchName) -> Result<(), GitError> {
        self.execute_git_command(&["push", remote, branch]).await?;
        Ok(())
    }
}
