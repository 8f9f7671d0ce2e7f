//! External tool abstractions
//!
//! This module provides trait-based abstractions for the external CLI tools
//! a backport run drives (git and the GitHub CLI), enabling testable code
//! through dependency injection and mock implementations.

pub mod command;
pub mod git;
pub mod github;

pub use command::{CommandError, CommandExecutor, CommandOutput, ProcessCommandExecutor};
pub use git::{GitClient, GitError, GitRepository};
pub use github::{GitHubClient, GitHubError, GitHubOperations, PrConfig};
