//! Saved repository names
//!
//! The only long-lived state in the system: an append-only, ordered list of
//! repository names previously used, read when listing repositories and
//! written when a submission introduces a new name. Persistence is a JSON
//! file behind the `RepoStore` trait so the resolver depends on load/save
//! only, not on any storage technology.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Trait for the persisted repository-name list
pub trait RepoStore: Send + Sync {
    fn load(&self) -> Result<Vec<String>, StoreError>;
    fn save(&self, repositories: &[String]) -> Result<(), StoreError>;
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct SavedRepositories {
    repositories: Vec<String>,
}

/// JSON-file-backed store. A missing file reads as an empty list.
pub struct FileRepoStore {
    path: PathBuf,
}

impl FileRepoStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl RepoStore for FileRepoStore {
    fn load(&self) -> Result<Vec<String>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let contents = std::fs::read_to_string(&self.path)?;
        let saved: SavedRepositories = serde_json::from_str(&contents)?;
        Ok(saved.repositories)
    }

    fn save(&self, repositories: &[String]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let saved = SavedRepositories {
            repositories: repositories.to_vec(),
        };
        let contents = serde_json::to_string_pretty(&saved)?;
        std::fs::write(&self.path, contents)?;
        debug!(path = %self.path.display(), count = repositories.len(), "Saved repository list");
        Ok(())
    }
}

/// Resolve which repository a submission targets.
///
/// A non-empty (trimmed) new name wins and is appended to the persisted
/// list when absent; otherwise the selected existing name is used unchanged
/// and the store is not written. Repository-name syntax is not validated
/// here; an invalid name surfaces later as a command failure.
pub fn resolve_repository(
    selected: &str,
    new_name: &str,
    store: &dyn RepoStore,
) -> Result<String, StoreError> {
    let new_name = new_name.trim();
    if new_name.is_empty() {
        return Ok(selected.to_string());
    }

    let mut repositories = store.load()?;
    if !repositories.iter().any(|r| r == new_name) {
        repositories.push(new_name.to_string());
        store.save(&repositories)?;
    }

    Ok(new_name.to_string())
}
