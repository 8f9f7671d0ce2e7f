//! Backport orchestration
//!
//! Drives one attempt per target version, strictly sequentially: the
//! working tree supports a single checked-out branch, so an attempt is
//! fully resolved (Pushed, PrCreated, Failed, or Aborted) before the next
//! begins. A version's failure never aborts the remaining versions.

use crate::backport::attempt::{AttemptState, BackportAttempt};
use crate::backport::request::BackportRequest;
use crate::backport::synthesizer::PullRequestSynthesizer;
use crate::external::{GitError, GitRepository};
use crate::prompt::{is_affirmative, PromptError, UserPrompt};
use std::sync::Arc;
use tracing::{error, info, warn};

pub struct BackportRunner {
    git: Arc<dyn GitRepository>,
    prompt: Arc<dyn UserPrompt>,
    synthesizer: PullRequestSynthesizer,
    remote: String,
}

impl BackportRunner {
    pub fn new(
        git: Arc<dyn GitRepository>,
        prompt: Arc<dyn UserPrompt>,
        synthesizer: PullRequestSynthesizer,
        remote: String,
    ) -> Self {
        Self {
            git,
            prompt,
            synthesizer,
            remote,
        }
    }

    /// Run every attempt in the request, in list order. Returns the final
    /// attempt records for reporting.
    pub async fn run(&self, request: &BackportRequest) -> Result<Vec<BackportAttempt>, PromptError> {
        let mut attempts = Vec::with_capacity(request.versions.len());

        for version in &request.versions {
            let attempt = self.run_attempt(request, version).await?;
            attempts.push(attempt);
        }

        Ok(attempts)
    }

    async fn run_attempt(
        &self,
        request: &BackportRequest,
        version: &str,
    ) -> Result<BackportAttempt, PromptError> {
        let mut attempt = BackportAttempt::new(version);

        let answer = self
            .prompt
            .prompt(&format!("Create branch {}? [y/N]", attempt.branch))
            .await?;
        if !is_affirmative(&answer) {
            info!(version = %version, "Version skipped by user");
            println!("⏭️  Skipping version {}", version);
            return Ok(attempt);
        }

        if let Err(e) = self.create_branch(&mut attempt, version).await {
            let message = format!("Error creating branch {}: {}", attempt.branch, e);
            self.report_failure(&mut attempt, message);
            return Ok(attempt);
        }

        attempt.advance(AttemptState::CherryPicking);
        match self.git.cherry_pick(&request.cherry_pick_source).await {
            Ok(()) => {
                if let Err(e) = self.git.push(&self.remote, &attempt.branch).await {
                    let message = format!("Error pushing branch {}: {}", attempt.branch, e);
                    self.report_failure(&mut attempt, message);
                    return Ok(attempt);
                }
                attempt.advance(AttemptState::Pushed);
            }
            Err(e) if e.is_conflict() => {
                self.recover_from_conflict(&mut attempt).await?;
            }
            Err(e) => {
                let message = format!("Error creating branch {}: {}", attempt.branch, e);
                self.report_failure(&mut attempt, message);
                return Ok(attempt);
            }
        }

        if attempt.state == AttemptState::Pushed {
            println!("✅ Branch {} created and pushed successfully", attempt.branch);
            self.create_pull_request(request, &mut attempt).await?;
        }

        Ok(attempt)
    }

    async fn create_branch(&self, attempt: &mut BackportAttempt, version: &str) -> Result<(), GitError> {
        self.git.checkout(version).await?;
        self.git.create_branch(&attempt.branch).await?;
        attempt.advance(AttemptState::BranchCreated);
        Ok(())
    }

    /// Conflict recovery sub-protocol: pause for human resolution, then
    /// continue the cherry-pick and push, or abort cleanly. No re-poll, no
    /// automatic retry.
    async fn recover_from_conflict(&self, attempt: &mut BackportAttempt) -> Result<(), PromptError> {
        attempt.advance(AttemptState::ConflictPending);
        warn!(branch = %attempt.branch, "Cherry-pick conflict detected");
        println!(
            "⚠️  Conflict detected while cherry-picking into {}. Please resolve the conflicts and then continue.",
            attempt.branch
        );

        let answer = self
            .prompt
            .prompt(&format!("Have you resolved the conflicts in {}? [y/N]", attempt.branch))
            .await?;

        if !is_affirmative(&answer) {
            attempt.advance(AttemptState::Aborted);
            println!(
                "ℹ️  Please resolve the conflicts in {} and run 'git cherry-pick --continue' manually.",
                attempt.branch
            );
            return Ok(());
        }

        let resumed = async {
            self.git.cherry_pick_continue().await?;
            self.git.push(&self.remote, &attempt.branch).await
        }
        .await;

        match resumed {
            Ok(()) => attempt.advance(AttemptState::Pushed),
            Err(e) => {
                let message = format!("Error continuing cherry-pick in {}: {}", attempt.branch, e);
                self.report_failure(attempt, message);
            }
        }

        Ok(())
    }

    /// Pushed -> PrCreated | Failed, or terminal Pushed when the user
    /// supplies no original PR URL. Synthesis failure does not roll back
    /// the already-pushed branch.
    async fn create_pull_request(
        &self,
        request: &BackportRequest,
        attempt: &mut BackportAttempt,
    ) -> Result<(), PromptError> {
        let pr_url = self
            .prompt
            .prompt("Please provide the URL of the original PR:")
            .await?;
        if pr_url.trim().is_empty() {
            info!(branch = %attempt.branch, "No original PR URL supplied, leaving attempt at pushed");
            return Ok(());
        }

        match self
            .synthesizer
            .synthesize(&request.repository, pr_url.trim(), &attempt.branch, &request.versions)
            .await
        {
            Ok(created_url) => {
                attempt.advance(AttemptState::PrCreated);
                println!("✅ Pull request created successfully for branch {}: {}", attempt.branch, created_url);
            }
            Err(e) => {
                self.report_failure(attempt, format!("Error creating pull request: {}", e));
            }
        }

        Ok(())
    }

    fn report_failure(&self, attempt: &mut BackportAttempt, message: String) {
        error!(version = %attempt.version, branch = %attempt.branch, "{}", message);
        println!("❌ {}", message);
        attempt.fail(message);
    }
}
