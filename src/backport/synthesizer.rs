//! Pull request synthesis
//!
//! Builds and submits the backport pull request: fetches the original PR's
//! title and body from the hosting REST API, collects the sibling
//! versions' already-closed PR URLs through the hosting CLI, injects a
//! cross-coverage section into the body, and opens the new PR. Submission
//! is the last step, so a failure anywhere leaves no partial PR behind.

use crate::external::{GitHubError, GitHubOperations, PrConfig};
use regex::Regex;
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum PrError {
    #[error("Failed to fetch pull request metadata from {url}: {reason}")]
    Fetch { url: String, reason: String },
    #[error("No closed pull request found for version {version}")]
    NoPrFound { version: String },
    #[error("Pull request creation failed: {message}")]
    Create { message: String },
    #[error(transparent)]
    GitHub(#[from] GitHubError),
}

/// Title and body of the original pull request, as returned by the hosting
/// REST API. A PR body may be null.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestData {
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
}

/// Derive the REST endpoint for a pull request from its web URL by the
/// fixed transformation: web host -> API host, `/pull/` -> `/pulls/`.
pub fn api_endpoint_for(pr_url: &str) -> String {
    pr_url
        .replacen("github.com", "api.github.com/repos", 1)
        .replacen("/pull/", "/pulls/", 1)
}

/// New PR title: the original title with the comma-joined target versions
/// appended in parentheses.
pub fn compose_title(original_title: &str, versions: &[String]) -> String {
    format!("{} ({})", original_title, versions.join(", "))
}

/// Cross-coverage section handling. The marker (a section heading plus a
/// trailing comment line) and the per-version link format are configurable
/// so the injection is reusable across body-format conventions.
#[derive(Debug, Clone)]
pub struct CrossCoverageTemplate {
    pub marker_heading: String,
    pub marker_end: String,
    pub link_template: String,
}

impl Default for CrossCoverageTemplate {
    fn default() -> Self {
        Self {
            marker_heading: "## 水平展開 | Cross-coverage".to_string(),
            marker_end: "<!-- If fixing a bug, search for similar features and describe if they need to be fixed as well -->".to_string(),
            link_template: "[release/{version}]({url})".to_string(),
        }
    }
}

impl CrossCoverageTemplate {
    fn render_link(&self, version: &str, url: &str) -> String {
        self.link_template
            .replace("{version}", version.trim())
            .replace("{url}", url)
    }

    fn render_block(&self, original_pr_url: &str, version_pr_urls: &[(String, String)]) -> String {
        let links = version_pr_urls
            .iter()
            .map(|(version, url)| self.render_link(version, url))
            .collect::<Vec<_>>()
            .join("\n");
        format!("{}\n\n{}", original_pr_url, links)
    }

    /// Insert the original PR URL and one link per sibling version
    /// immediately after the marker block. A body without the marker is
    /// returned unmodified. Re-running with the same sibling map is a
    /// no-op: the rendered block is searched for before inserting.
    pub fn inject(
        &self,
        body: &str,
        original_pr_url: &str,
        version_pr_urls: &[(String, String)],
    ) -> String {
        let block = self.render_block(original_pr_url, version_pr_urls);
        if body.contains(&block) {
            debug!("Cross-coverage section already present, leaving body unchanged");
            return body.to_string();
        }

        let pattern = format!(
            "(?s)({}.*?{})",
            regex::escape(&self.marker_heading),
            regex::escape(&self.marker_end)
        );
        let marker = match Regex::new(&pattern) {
            Ok(re) => re,
            Err(e) => {
                warn!(error = %e, "Cross-coverage marker pattern did not compile, leaving body unchanged");
                return body.to_string();
            }
        };

        if !marker.is_match(body) {
            warn!("Cross-coverage marker not found in PR body, leaving body unchanged");
            return body.to_string();
        }

        marker
            .replace(body, |caps: &regex::Captures| {
                format!("{}\n\n{}", &caps[1], block)
            })
            .into_owned()
    }
}

/// Builds the backport PR from the original PR and its sibling versions.
pub struct PullRequestSynthesizer {
    github: Arc<dyn GitHubOperations>,
    http: reqwest::Client,
    template: CrossCoverageTemplate,
    base_branch: String,
}

impl PullRequestSynthesizer {
    pub fn new(
        github: Arc<dyn GitHubOperations>,
        template: CrossCoverageTemplate,
        base_branch: String,
    ) -> Self {
        Self {
            github,
            http: reqwest::Client::new(),
            template,
            base_branch,
        }
    }

    /// Fetch the original PR's title and body over the hosting REST API.
    /// The request is unauthenticated; the API only needs a User-Agent.
    pub async fn fetch_pull_request_data(&self, pr_url: &str) -> Result<PullRequestData, PrError> {
        let api_url = api_endpoint_for(pr_url);
        debug!(url = %api_url, "Fetching original pull request metadata");

        let response = self
            .http
            .get(&api_url)
            .header(reqwest::header::USER_AGENT, "backporter")
            .send()
            .await
            .map_err(|e| PrError::Fetch {
                url: api_url.clone(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(PrError::Fetch {
                url: api_url,
                reason: format!("HTTP {}", response.status()),
            });
        }

        response.json::<PullRequestData>().await.map_err(|e| PrError::Fetch {
            url: api_url,
            reason: e.to_string(),
        })
    }

    /// Map each sibling version to the URL of its most recently closed PR.
    /// Keys are unique and keep the version-list order; a version without a
    /// closed PR aborts the whole PR step (no partial cross-linking).
    async fn fetch_version_pr_urls(
        &self,
        repository: &str,
        versions: &[String],
    ) -> Result<Vec<(String, String)>, PrError> {
        let mut urls: Vec<(String, String)> = Vec::new();

        for version in versions {
            if urls.iter().any(|(v, _)| v == version) {
                continue;
            }

            match self.github.closed_pull_request_url(repository, version).await? {
                Some(url) => urls.push((version.clone(), url)),
                None => {
                    return Err(PrError::NoPrFound {
                        version: version.clone(),
                    })
                }
            }
        }

        Ok(urls)
    }

    /// Compose and submit the backport PR. Returns the new PR's URL.
    pub async fn synthesize(
        &self,
        repository: &str,
        original_pr_url: &str,
        head_branch: &str,
        versions: &[String],
    ) -> Result<String, PrError> {
        let original = self.fetch_pull_request_data(original_pr_url).await?;
        let version_pr_urls = self.fetch_version_pr_urls(repository, versions).await?;

        let title = compose_title(&original.title, versions);
        let body = self.template.inject(
            original.body.as_deref().unwrap_or(""),
            original_pr_url,
            &version_pr_urls,
        );

        let config = PrConfig {
            repository: repository.to_string(),
            title,
            body,
            head_branch: head_branch.to_string(),
            base_branch: self.base_branch.clone(),
        };

        self.github
            .create_pull_request(&config)
            .await
            .map_err(|e| PrError::Create {
                message: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marked_body() -> String {
        [
            "## Summary",
            "Fixes the frobnicator.",
            "",
            "## 水平展開 | Cross-coverage",
            "<!-- 不具合修正の場合、報告された機能以外に同様の不具合がないか調査を行い、対応すべき機能を洗い出して記載する -->",
            "<!-- If fixing a bug, search for similar features and describe if they need to be fixed as well -->",
            "",
            "## Test Plan",
            "- [x] unit tests",
        ]
        .join("\n")
    }

    #[test]
    fn test_api_endpoint_derivation() {
        assert_eq!(
            api_endpoint_for("https://github.com/org/repo/pull/42"),
            "https://api.github.com/repos/org/repo/pulls/42"
        );
    }

    #[test]
    fn test_compose_title() {
        let versions = vec!["1.2".to_string(), "1.3".to_string()];
        assert_eq!(compose_title("Fix bug", &versions), "Fix bug (1.2, 1.3)");
    }

    #[test]
    fn test_inject_adds_urls_after_marker() {
        let template = CrossCoverageTemplate::default();
        let urls = vec![
            ("1.0".to_string(), "https://example.com/pr/1".to_string()),
            ("2.0".to_string(), "https://example.com/pr/2".to_string()),
        ];

        let result = template.inject(&marked_body(), "https://github.com/org/repo/pull/42", &urls);

        assert!(result.contains("https://github.com/org/repo/pull/42"));
        assert!(result.contains("[release/1.0](https://example.com/pr/1)"));
        assert!(result.contains("[release/2.0](https://example.com/pr/2)"));

        // Inserted after the marker block, before the next section.
        let marker_pos = result.find("describe if they need to be fixed as well").unwrap();
        let link_pos = result.find("[release/1.0]").unwrap();
        let next_section_pos = result.find("## Test Plan").unwrap();
        assert!(marker_pos < link_pos);
        assert!(link_pos < next_section_pos);
    }

    #[test]
    fn test_inject_without_marker_leaves_body_unchanged() {
        let template = CrossCoverageTemplate::default();
        let body = "## Summary\nNo cross-coverage section here.";
        let urls = vec![("1.0".to_string(), "https://example.com/pr/1".to_string())];

        assert_eq!(template.inject(body, "https://github.com/org/repo/pull/42", &urls), body);
    }

    #[test]
    fn test_inject_is_idempotent() {
        let template = CrossCoverageTemplate::default();
        let urls = vec![
            ("1.0".to_string(), "https://example.com/pr/1".to_string()),
            ("2.0".to_string(), "https://example.com/pr/2".to_string()),
        ];

        let once = template.inject(&marked_body(), "https://github.com/org/repo/pull/42", &urls);
        let twice = template.inject(&once, "https://github.com/org/repo/pull/42", &urls);

        assert_eq!(once, twice);
        assert_eq!(once.matches("[release/1.0]").count(), 1);
    }

    #[test]
    fn test_inject_with_custom_template() {
        let template = CrossCoverageTemplate {
            marker_heading: "## Backports".to_string(),
            marker_end: "<!-- list backport PRs below -->".to_string(),
            link_template: "* {version}: {url}".to_string(),
        };
        let body = "## Backports\n<!-- list backport PRs below -->\n";
        let urls = vec![("1.0".to_string(), "https://example.com/pr/1".to_string())];

        let result = template.inject(body, "https://github.com/org/repo/pull/42", &urls);
        assert!(result.contains("* 1.0: https://example.com/pr/1"));
    }
}
