//! Per-version backport attempt state
//!
//! One `BackportAttempt` exists per target version, owned exclusively by
//! the runner and processed strictly one at a time. The machine only ever
//! moves forward or stops: every side-effecting step is irreversible, and
//! recovery from partial git state is left to the human operator.

use serde::{Deserialize, Serialize};
use tracing::info;

pub const BRANCH_PREFIX: &str = "cherry-pick-branch_";

/// Derived branch name for a target version: `cherry-pick-branch_<version>`.
pub fn branch_name(version: &str) -> String {
    format!("{}{}", BRANCH_PREFIX, version)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttemptState {
    NotStarted,
    BranchCreated,
    CherryPicking,
    ConflictPending,
    Pushed,
    PrCreated,
    Failed,
    Aborted,
}

impl AttemptState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            AttemptState::Pushed | AttemptState::PrCreated | AttemptState::Failed | AttemptState::Aborted
        )
    }
}

impl std::fmt::Display for AttemptState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            AttemptState::NotStarted => "not started",
            AttemptState::BranchCreated => "branch created",
            AttemptState::CherryPicking => "cherry-picking",
            AttemptState::ConflictPending => "conflict pending",
            AttemptState::Pushed => "pushed",
            AttemptState::PrCreated => "PR created",
            AttemptState::Failed => "failed",
            AttemptState::Aborted => "aborted",
        };
        write!(f, "{}", label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackportAttempt {
    pub version: String,
    pub branch: String,
    pub state: AttemptState,
    /// Surfaced message when the attempt ends in Failed.
    pub error: Option<String>,
}

impl BackportAttempt {
    pub fn new(version: &str) -> Self {
        Self {
            version: version.to_string(),
            branch: branch_name(version),
            state: AttemptState::NotStarted,
            error: None,
        }
    }

    pub fn advance(&mut self, state: AttemptState) {
        info!(
            version = %self.version,
            branch = %self.branch,
            from = %self.state,
            to = %state,
            "Backport attempt state transition"
        );
        self.state = state;
    }

    pub fn fail(&mut self, message: String) {
        self.advance(AttemptState::Failed);
        self.error = Some(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branch_name_derivation() {
        assert_eq!(branch_name("1.2"), "cherry-pick-branch_1.2");
        assert_eq!(branch_name("release-x"), "cherry-pick-branch_release-x");
    }

    #[test]
    fn test_new_attempt_starts_clean() {
        let attempt = BackportAttempt::new("1.2");
        assert_eq!(attempt.state, AttemptState::NotStarted);
        assert_eq!(attempt.branch, "cherry-pick-branch_1.2");
        assert!(attempt.error.is_none());
    }

    #[test]
    fn test_terminal_states() {
        assert!(AttemptState::Pushed.is_terminal());
        assert!(AttemptState::PrCreated.is_terminal());
        assert!(AttemptState::Failed.is_terminal());
        assert!(AttemptState::Aborted.is_terminal());
        assert!(!AttemptState::NotStarted.is_terminal());
        assert!(!AttemptState::ConflictPending.is_terminal());
    }

    #[test]
    fn test_fail_records_message() {
        let mut attempt = BackportAttempt::new("1.2");
        attempt.fail("push rejected".to_string());
        assert_eq!(attempt.state, AttemptState::Failed);
        assert_eq!(attempt.error.as_deref(), Some("push rejected"));
    }
}
