// Backporter Library - Release-branch backport orchestration
// This exposes the core components for testing and integration

pub mod backport;
pub mod config;
pub mod external;
pub mod prompt;
pub mod store;
pub mod telemetry;

// Re-export key types for easy access
pub use backport::{
    api_endpoint_for, branch_name, compose_title, AttemptState, BackportAttempt, BackportRequest,
    BackportRunner, CrossCoverageTemplate, FormPayload, PrError, PullRequestSynthesizer,
};
pub use config::{config, init_config, BackporterConfig};
pub use external::{
    CommandError, CommandExecutor, GitClient, GitError, GitHubClient, GitHubError,
    GitHubOperations, GitRepository, PrConfig, ProcessCommandExecutor,
};
pub use prompt::{is_affirmative, StdinPrompt, UserPrompt};
pub use store::{resolve_repository, FileRepoStore, RepoStore, StoreError};
pub use telemetry::init_telemetry;
