use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;

mod backport;
mod config;
mod external;
mod prompt;
mod store;
mod telemetry;

use backport::{AttemptState, BackportRequest, BackportRunner, FormPayload, PullRequestSynthesizer};
use external::{GitClient, GitHubClient, ProcessCommandExecutor};
use prompt::StdinPrompt;
use store::{FileRepoStore, RepoStore};

#[derive(Parser)]
#[command(name = "backporter")]
#[command(about = "Backport a merged change across release branches")]
#[command(long_about = "Backporter replicates a merged fix onto release branches: it creates a \
                       cherry-pick branch per target version, pushes it, and opens a pull request \
                       that cross-references the sibling backport PRs. Start with 'backporter backport'.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a backport across one or more target versions
    Backport {
        /// Previously used repository to target (see 'backporter repos')
        #[arg(long, default_value = "", help = "Repository in owner/name form, from the saved list")]
        repo: String,
        /// New repository name; wins over --repo and is remembered
        #[arg(long, default_value = "", help = "Repository in owner/name form, added to the saved list")]
        new_repo: String,
        /// Versions to backport to, comma-separated
        #[arg(long, help = "Comma-separated release versions, e.g. '1.2,1.3'")]
        versions: String,
        /// Commit hash or branch name to cherry-pick
        #[arg(long, help = "Cherry-pick source: a commit hash or branch name")]
        cherry_pick: String,
    },
    /// List saved repository names
    Repos,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = config::config()?;
    telemetry::init_telemetry(&settings.observability.log_level)?;
    config::init_config()?;

    match cli.command {
        Commands::Backport { repo, new_repo, versions, cherry_pick } => {
            tokio::runtime::Runtime::new()?.block_on(async {
                backport_command(repo, new_repo, versions, cherry_pick).await
            })
        }
        Commands::Repos => repos_command(),
    }
}

async fn backport_command(
    repo: String,
    new_repo: String,
    versions: String,
    cherry_pick: String,
) -> Result<()> {
    let settings = config::config()?;
    let store = FileRepoStore::new(&settings.storage.saved_repos_path);

    let payload = FormPayload {
        repo_name: repo,
        new_repo_name: new_repo,
        versions,
        cherry_pick_branch: cherry_pick,
    };
    let request = BackportRequest::from_form(&payload, &store)?;

    println!("🍒 Backporting {} onto {} version(s) in {}", request.cherry_pick_source, request.versions.len(), request.repository);
    println!();

    let executor = Arc::new(ProcessCommandExecutor);
    let git = Arc::new(GitClient::new(executor.clone()));
    let github = Arc::new(GitHubClient::new(executor));
    let synthesizer = PullRequestSynthesizer::new(
        github,
        settings.cross_coverage_template(),
        settings.git.base_branch.clone(),
    );
    let runner = BackportRunner::new(
        git,
        Arc::new(StdinPrompt),
        synthesizer,
        settings.git.remote.clone(),
    );

    let attempts = runner.run(&request).await?;

    println!();
    println!("🎯 BACKPORT SUMMARY:");
    for attempt in &attempts {
        match attempt.state {
            AttemptState::PrCreated => {
                println!(" ✅ {}: PR created ({})", attempt.version, attempt.branch);
            }
            AttemptState::Pushed => {
                println!(" ✅ {}: pushed without PR ({})", attempt.version, attempt.branch);
            }
            AttemptState::Aborted => {
                println!(" ⏸️  {}: waiting on manual conflict resolution in {}", attempt.version, attempt.branch);
            }
            AttemptState::Failed => {
                println!(
                    " ❌ {}: {}",
                    attempt.version,
                    attempt.error.as_deref().unwrap_or("failed")
                );
            }
            AttemptState::NotStarted => {
                println!(" ⏭️  {}: skipped", attempt.version);
            }
            _ => {
                println!(" ❓ {}: ended in unexpected state '{}'", attempt.version, attempt.state);
            }
        }
    }

    Ok(())
}

fn repos_command() -> Result<()> {
    let settings = config::config()?;
    let store = FileRepoStore::new(&settings.storage.saved_repos_path);
    let repositories = store.load()?;

    if repositories.is_empty() {
        println!("📋 No saved repositories yet");
        println!("   💡 Add one with: backporter backport --new-repo owner/name --versions ... --cherry-pick ...");
        return Ok(());
    }

    println!("📋 Saved repositories:");
    for repository in repositories {
        println!("   → {}", repository);
    }

    Ok(())
}
