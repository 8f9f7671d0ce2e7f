//! GitHub CLI abstractions
//!
//! Provides trait-based abstractions for the `gh` operations a backport run
//! issues, enabling testable GitHub integrations through dependency
//! injection.

use super::command::{CommandError, CommandExecutor};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Parameters for creating a pull request through the hosting CLI
#[derive(Debug, Clone)]
pub struct PrConfig {
    pub repository: String,
    pub title: String,
    pub body: String,
    pub head_branch: String,
    pub base_branch: String,
}

#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("GitHub CLI command failed: {message}")]
    CliFailed { message: String },
    #[error("Invalid response from GitHub CLI: {message}")]
    InvalidResponse { message: String },
    #[error("Command execution error: {source}")]
    CommandError {
        #[from]
        source: CommandError,
    },
}

/// Trait for GitHub operations
///
/// This abstraction enables testing GitHub integrations without the actual
/// CLI, while preserving the exact interface used by the application code.
#[async_trait]
pub trait GitHubOperations: Send + Sync {
    /// URL of the most recently closed pull request whose head branch equals
    /// `head`, or None when no such PR exists.
    async fn closed_pull_request_url(
        &self,
        repository: &str,
        head: &str,
    ) -> Result<Option<String>, GitHubError>;

    /// Create a pull request and return its URL
    async fn create_pull_request(&self, config: &PrConfig) -> Result<String, GitHubError>;
}

/// Real GitHub CLI implementation
pub struct GitHubClient {
    executor: Arc<dyn CommandExecutor>,
}

impl GitHubClient {
    pub fn new(executor: Arc<dyn CommandExecutor>) -> Self {
        Self { executor }
    }

    async fn execute_gh_command(&self, args: &[&str]) -> Result<String, GitHubError> {
        let output = self.executor.execute("gh", args).await?;

        if !output.success() {
            return Err(GitHubError::CliFailed {
                message: output.stderr.trim().to_string(),
            });
        }

        Ok(output.stdout)
    }
}

#[async_trait]
impl GitHubOperations for GitHubClient {
    async fn closed_pull_request_url(
        &self,
        repository: &str,
        head: &str,
    ) -> Result<Option<String>, GitHubError> {
        let args = [
            "pr", "list",
            "--repo", repository,
            "--state", "closed",
            "--head", head,
            "--json", "url",
        ];

        let output = self.execute_gh_command(&args).await?;

        let prs: Vec<serde_json::Value> = serde_json::from_str(&output)
            .map_err(|e| GitHubError::InvalidResponse {
                message: format!("Failed to parse PR list JSON: {}", e),
            })?;

        Ok(prs
            .first()
            .and_then(|pr| pr.get("url"))
            .and_then(|url| url.as_str())
            .map(|s| s.to_string()))
    }

    async fn create_pull_request(&self, config: &PrConfig) -> Result<String, GitHubError> {
        let args = [
            "pr", "create",
            "--repo", &config.repository,
            "--head", &config.head_branch,
            "--title", &config.title,
            "--body", &config.body,
            "--base", &config.base_branch,
        ];

        let output = self.execute_gh_command(&args).await?;
        Ok(output.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::super::command::{CommandError, CommandOutput};
    use super::*;

    // Simple mock for testing
    struct MockCommandExecutor {
        responses: std::collections::HashMap<String, Result<CommandOutput, CommandError>>,
    }

    impl MockCommandExecutor {
        fn new() -> Self {
            Self {
                responses: std::collections::HashMap::new(),
            }
        }

        fn expect_command(mut self, program: &str, args: &[&str], response: Result<CommandOutput, CommandError>) -> Self {
            let key = format!("{} {}", program, args.join(" "));
            self.responses.insert(key, response);
            self
        }
    }

    #[async_trait]
    impl CommandExecutor for MockCommandExecutor {
        async fn execute(&self, program: &str, args: &[&str]) -> Result<CommandOutput, CommandError> {
            let key = format!("{} {}", program, args.join(" "));
            self.responses.get(&key)
                .cloned()
                .unwrap_or(Err(CommandError::CommandNotFound {
                    command: program.to_string(),
                }))
        }
    }

    fn stdout_output(stdout: &str) -> Result<CommandOutput, CommandError> {
        Ok(CommandOutput {
            status_code: 0,
            stdout: stdout.to_string(),
            stderr: String::new(),
        })
    }

    #[tokio::test]
    async fn test_closed_pr_url_found() {
        let mock_executor = MockCommandExecutor::new()
            .expect_command(
                "gh",
                &["pr", "list", "--repo", "org/repo", "--state", "closed", "--head", "1.2", "--json", "url"],
                stdout_output(r#"[{"url":"https://github.com/org/repo/pull/7"}]"#),
            );

        let client = GitHubClient::new(Arc::new(mock_executor));
        let result = client.closed_pull_request_url("org/repo", "1.2").await;

        assert_eq!(result.unwrap(), Some("https://github.com/org/repo/pull/7".to_string()));
    }

    #[tokio::test]
    async fn test_closed_pr_url_empty_list() {
        let mock_executor = MockCommandExecutor::new()
            .expect_command(
                "gh",
                &["pr", "list", "--repo", "org/repo", "--state", "closed", "--head", "3.0", "--json", "url"],
                stdout_output("[]"),
            );

        let client = GitHubClient::new(Arc::new(mock_executor));
        let result = client.closed_pull_request_url("org/repo", "3.0").await;

        assert_eq!(result.unwrap(), None);
    }

    #[tokio::test]
    async fn test_closed_pr_url_invalid_json() {
        let mock_executor = MockCommandExecutor::new()
            .expect_command(
                "gh",
                &["pr", "list", "--repo", "org/repo", "--state", "closed", "--head", "1.2", "--json", "url"],
                stdout_output("not json"),
            );

        let client = GitHubClient::new(Arc::new(mock_executor));
        let result = client.closed_pull_request_url("org/repo", "1.2").await;

        assert!(matches!(result.unwrap_err(), GitHubError::InvalidResponse { .. }));
    }

    #[tokio::test]
    async fn test_create_pull_request_returns_url() {
        let mock_executor = MockCommandExecutor::new()
            .expect_command(
                "gh",
                &[
                    "pr", "create",
                    "--repo", "org/repo",
                    "--head", "cherry-pick-branch_1.2",
                    "--title", "Fix bug (1.2)",
                    "--body", "body",
                    "--base", "main",
                ],
                stdout_output("https://github.com/org/repo/pull/99\n"),
            );

        let client = GitHubClient::new(Arc::new(mock_executor));
        let config = PrConfig {
            repository: "org/repo".to_string(),
            title: "Fix bug (1.2)".to_string(),
            body: "body".to_string(),
            head_branch: "cherry-pick-branch_1.2".to_string(),
            base_branch: "main".to_string(),
        };
        let result = client.create_pull_request(&config).await;

        assert_eq!(result.unwrap(), "https://github.com/org/repo/pull/99");
    }

    #[tokio::test]
    async fn test_create_pull_request_failure() {
        let mock_executor = MockCommandExecutor::new()
            .expect_command(
                "gh",
                &[
                    "pr", "create",
                    "--repo", "org/repo",
                    "--head", "cherry-pick-branch_1.2",
                    "--title", "t",
                    "--body", "b",
                    "--base", "main",
                ],
                Ok(CommandOutput {
                    status_code: 1,
                    stdout: String::new(),
                    stderr: "pull request create failed: GraphQL: No commits between main and cherry-pick-branch_1.2".to_string(),
                }),
            );

        let client = GitHubClient::new(Arc::new(mock_executor));
        let config = PrConfig {
            repository: "org/repo".to_string(),
            title: "t".to_string(),
            body: "b".to_string(),
            head_branch: "cherry-pick-branch_1.2".to_string(),
            base_branch: "main".to_string(),
        };
        let result = client.create_pull_request(&config).await;

        assert!(matches!(result.unwrap_err(), GitHubError::CliFailed { .. }));
    }
}
