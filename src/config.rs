use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::backport::CrossCoverageTemplate;

/// Main configuration structure for Backporter
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackporterConfig {
    /// Git settings
    pub git: GitConfig,
    /// Saved-state settings
    pub storage: StorageConfig,
    /// Cross-coverage section templates
    pub templates: TemplateConfig,
    /// Observability settings
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GitConfig {
    /// Remote the backport branches are pushed to
    pub remote: String,
    /// Base branch new pull requests target
    pub base_branch: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Path of the saved repository-name list
    pub saved_repos_path: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TemplateConfig {
    /// Heading that opens the cross-coverage section in a PR body
    pub marker_heading: String,
    /// Comment line that closes the marker block
    pub marker_end: String,
    /// Per-version link line; `{version}` and `{url}` are substituted
    pub link_template: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level
    pub log_level: String,
}

impl Default for BackporterConfig {
    fn default() -> Self {
        let template = CrossCoverageTemplate::default();
        Self {
            git: GitConfig {
                remote: "origin".to_string(),
                base_branch: "main".to_string(),
            },
            storage: StorageConfig {
                saved_repos_path: ".backporter/saved-repos.json".to_string(),
            },
            templates: TemplateConfig {
                marker_heading: template.marker_heading,
                marker_end: template.marker_end,
                link_template: template.link_template,
            },
            observability: ObservabilityConfig {
                log_level: "info".to_string(),
            },
        }
    }
}

impl BackporterConfig {
    /// Load configuration with precedence:
    /// 1. Default values
    /// 2. Configuration file (backporter.toml)
    /// 3. Environment variables (prefixed with BACKPORTER_)
    pub fn load() -> Result<Self> {
        let defaults = Self::default();

        let mut builder = Config::builder()
            .set_default("git.remote", defaults.git.remote)?
            .set_default("git.base_branch", defaults.git.base_branch)?
            .set_default("storage.saved_repos_path", defaults.storage.saved_repos_path)?
            .set_default("templates.marker_heading", defaults.templates.marker_heading)?
            .set_default("templates.marker_end", defaults.templates.marker_end)?
            .set_default("templates.link_template", defaults.templates.link_template)?
            .set_default("observability.log_level", defaults.observability.log_level)?;

        if Path::new("backporter.toml").exists() {
            builder = builder.add_source(File::with_name("backporter"));
        }

        builder = builder.add_source(
            Environment::with_prefix("BACKPORTER")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    pub fn cross_coverage_template(&self) -> CrossCoverageTemplate {
        CrossCoverageTemplate {
            marker_heading: self.templates.marker_heading.clone(),
            marker_end: self.templates.marker_end.clone(),
            link_template: self.templates.link_template.clone(),
        }
    }
}

/// Global configuration instance
static CONFIG: std::sync::LazyLock<Result<BackporterConfig, anyhow::Error>> =
    std::sync::LazyLock::new(BackporterConfig::load);

/// Get the global configuration
pub fn config() -> Result<&'static BackporterConfig> {
    CONFIG
        .as_ref()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))
}

/// Initialize configuration (called at startup)
pub fn init_config() -> Result<()> {
    let _config = config()?;
    tracing::info!("Configuration loaded successfully");
    Ok(())
}
