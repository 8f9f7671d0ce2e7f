//! Backport request construction
//!
//! The input boundary is a flat field-name → string-value payload (the
//! shape an input form submits); the CLI produces the same payload. The
//! request built from it is immutable for the lifetime of the run.

use crate::store::{resolve_repository, RepoStore, StoreError};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("No target versions given")]
    NoVersions,
    #[error("No cherry-pick source given")]
    NoCherryPickSource,
    #[error("Repository resolution failed: {0}")]
    Store(#[from] StoreError),
}

/// Raw submission payload: `repoName`, `newRepoName`, `versions`
/// (comma-separated), `cherryPickBranch`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormPayload {
    pub repo_name: String,
    pub new_repo_name: String,
    pub versions: String,
    pub cherry_pick_branch: String,
}

#[derive(Debug, Clone)]
pub struct BackportRequest {
    pub repository: String,
    pub versions: Vec<String>,
    pub cherry_pick_source: String,
}

impl BackportRequest {
    /// Build a request from a form payload, resolving the target repository
    /// against the persisted name list.
    pub fn from_form(payload: &FormPayload, store: &dyn RepoStore) -> Result<Self, RequestError> {
        let repository = resolve_repository(&payload.repo_name, &payload.new_repo_name, store)?;
        let versions = parse_versions(&payload.versions);

        if versions.is_empty() {
            return Err(RequestError::NoVersions);
        }
        if payload.cherry_pick_branch.trim().is_empty() {
            return Err(RequestError::NoCherryPickSource);
        }

        Ok(Self {
            repository,
            versions,
            cherry_pick_source: payload.cherry_pick_branch.trim().to_string(),
        })
    }
}

/// Comma-split and trim; empty segments are dropped, duplicates kept (each
/// is processed independently).
pub fn parse_versions(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .collect()
}
