//! User interaction boundary
//!
//! The backport protocol pauses at three points for human input: the
//! per-version branch confirmation, the conflict-resolution confirmation,
//! and the original-PR URL. All three go through `UserPrompt` so the
//! orchestration can be driven by scripted answers in tests.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Failed to read user input: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for collecting a single line of user input
#[async_trait]
pub trait UserPrompt: Send + Sync {
    /// Display `message` and return the user's answer. An empty answer is
    /// valid and means "no"/"none" to every caller.
    async fn prompt(&self, message: &str) -> Result<String, PromptError>;
}

/// Real implementation reading from stdin
pub struct StdinPrompt;

#[async_trait]
impl UserPrompt for StdinPrompt {
    async fn prompt(&self, message: &str) -> Result<String, PromptError> {
        use std::io::Write;

        print!("{} ", message);
        std::io::stdout().flush()?;

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;
        Ok(input.trim().to_string())
    }
}

/// Interpret a free-text answer as yes/no. Anything but an explicit yes
/// (including an empty answer) is no.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affirmative_answers() {
        assert!(is_affirmative("y"));
        assert!(is_affirmative("Y"));
        assert!(is_affirmative("yes"));
        assert!(is_affirmative("  YES  "));
    }

    #[test]
    fn test_everything_else_is_no() {
        assert!(!is_affirmative(""));
        assert!(!is_affirmative("n"));
        assert!(!is_affirmative("no"));
        assert!(!is_affirmative("yep"));
        assert!(!is_affirmative("sure"));
    }
}
