//! Override store
//!
//! Owns the effective configuration of one editing session:
//! 1. Base documents (read-only, loaded once)
//! 2. Override document (the only writable artifact)
//! 3. Effective view = merge(base documents, override document)
//!
//! The effective view is recomputed on demand and never persisted.

mod config_set;

use json_override_tree::{Tree, TreeError};
use json_override_value::{diff, merge, to_ascii_json, JsonValue, ValueError};

pub use config_set::{ConfigSet, DocumentSource};

use crate::repository::{DocumentRepository, RepositoryError};

/// Name used when reporting problems with the override document
pub const OVERRIDE_DOCUMENT: &str = "overrides";

/// Errors from loading, viewing and updating configuration
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("configuration directory unavailable: {0}")]
    DirectoryUnavailable(#[source] RepositoryError),

    #[error("malformed document '{name}': {reason}")]
    MalformedDocument { name: String, reason: String },

    #[error("override document unavailable: {0}")]
    OverrideUnavailable(#[source] RepositoryError),

    #[error("failed to persist override document: {0}")]
    PersistFailure(String),

    #[error(transparent)]
    InvalidArgument(#[from] ValueError),

    /// Editing or navigating the projected tree failed
    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error("no value at path '{0}'")]
    UnknownPath(String),
}

/// Load every base document from the repository
pub fn load_base_documents<R>(repository: &R) -> Result<ConfigSet, StoreError>
where
    R: DocumentRepository + ?Sized,
{
    let raw = repository.list_documents().map_err(|e| match e {
        RepositoryError::EmptyContent(path) => StoreError::MalformedDocument {
            name: path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            reason: "document is empty".to_string(),
        },
        other => StoreError::DirectoryUnavailable(other),
    })?;
    let configs = ConfigSet::from_documents(raw)?;

    if configs.is_empty() {
        tracing::warn!("no base documents found");
    }
    tracing::debug!(documents = configs.len(), "loaded base documents");
    Ok(configs)
}

/// Load the override document, creating and persisting `{}` if absent
pub fn load_override_document<R>(repository: &mut R) -> Result<JsonValue, StoreError>
where
    R: DocumentRepository + ?Sized,
{
    let Some(bytes) = repository
        .read_artifact()
        .map_err(StoreError::OverrideUnavailable)?
    else {
        let empty = JsonValue::empty_object();
        let bytes = to_ascii_json(&empty).map_err(|e| StoreError::MalformedDocument {
            name: OVERRIDE_DOCUMENT.to_string(),
            reason: e.to_string(),
        })?;
        repository
            .write_artifact(&bytes)
            .map_err(StoreError::OverrideUnavailable)?;
        tracing::info!("initialised empty override document");
        return Ok(empty);
    };

    let value = JsonValue::from_slice(&bytes).map_err(|e| StoreError::MalformedDocument {
        name: OVERRIDE_DOCUMENT.to_string(),
        reason: e.to_string(),
    })?;
    if !value.is_object() {
        return Err(StoreError::MalformedDocument {
            name: OVERRIDE_DOCUMENT.to_string(),
            reason: format!("root is a {}, expected an object", value.kind_name()),
        });
    }
    Ok(value)
}

/// Write `overrides` to the repository as ASCII-safe JSON
pub fn persist_override_document<R>(
    repository: &mut R,
    overrides: &JsonValue,
) -> Result<(), StoreError>
where
    R: DocumentRepository + ?Sized,
{
    if !overrides.is_object() {
        return Err(StoreError::InvalidArgument(ValueError::InvalidArgument {
            operation: "persist",
            role: "overrides",
            found: overrides.kind_name(),
        }));
    }
    let bytes = to_ascii_json(overrides).map_err(|e| StoreError::PersistFailure(e.to_string()))?;
    repository
        .write_artifact(&bytes)
        .map_err(|e| StoreError::PersistFailure(e.to_string()))
}

/// Merge the base documents (keyed by name) with the override document
pub fn effective_view(configs: &ConfigSet, overrides: &JsonValue) -> Result<JsonValue, StoreError> {
    Ok(merge(&configs.to_value(), overrides)?)
}

/// Base documents plus the persisted override document
#[derive(Debug)]
pub struct OverrideStore<R> {
    repository: R,
    configs: ConfigSet,
    overrides: JsonValue,
}

impl<R: DocumentRepository> OverrideStore<R> {
    /// Load base documents and the override document
    pub fn open(mut repository: R) -> Result<Self, StoreError> {
        let configs = load_base_documents(&repository)?;
        let overrides = load_override_document(&mut repository)?;
        Ok(Self {
            repository,
            configs,
            overrides,
        })
    }

    pub fn configs(&self) -> &ConfigSet {
        &self.configs
    }

    pub fn overrides(&self) -> &JsonValue {
        &self.overrides
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn into_repository(self) -> R {
        self.repository
    }

    pub fn effective_view(&self) -> Result<JsonValue, StoreError> {
        effective_view(&self.configs, &self.overrides)
    }

    /// The overrides that are visible in the effective view
    pub fn diff(&self) -> Result<JsonValue, StoreError> {
        Ok(diff(&self.configs.to_value(), &self.effective_view()?)?)
    }

    /// Project the effective view into an editable tree
    pub fn tree(&self) -> Result<Tree, StoreError> {
        Ok(Tree::build(&self.effective_view()?))
    }

    /// Look up one value of the effective view by dot-separated path
    pub fn get(&self, path: &str) -> Result<JsonValue, StoreError> {
        self.effective_view()?
            .get(path)
            .cloned()
            .ok_or_else(|| StoreError::UnknownPath(path.to_string()))
    }

    /// Merge `patch` into the override document and persist it.
    ///
    /// The patch is applied to the effective view and the stored document
    /// becomes `diff(base, view)`, so keys introduced by the patch survive
    /// the intersection-only merge and values edited back to their base value
    /// drop out. The in-memory document only changes after a successful write.
    pub fn apply_override(&mut self, patch: &JsonValue) -> Result<&JsonValue, StoreError> {
        let base = self.configs.to_value();
        let view = merge(&base, &self.overrides)?;
        let updated = merge(&view, patch)?;
        let overrides = diff(&base, &updated)?;

        self.persist(overrides)?;
        Ok(&self.overrides)
    }

    /// Edit the leaf at `path` in the effective view and persist the result
    ///
    /// Returns the patch derived from the edit.
    pub fn apply_edit(&mut self, path: &str, value: &str) -> Result<JsonValue, StoreError> {
        let mut tree = self.tree()?;
        let leaf = tree
            .find(path)
            .ok_or_else(|| StoreError::UnknownPath(path.to_string()))?;
        let patch = tree.apply_edit(leaf, value)?;
        self.apply_override(&patch)?;
        Ok(patch)
    }

    /// Drop every override
    pub fn reset(&mut self) -> Result<(), StoreError> {
        self.persist(JsonValue::empty_object())
    }

    fn persist(&mut self, overrides: JsonValue) -> Result<(), StoreError> {
        persist_override_document(&mut self.repository, &overrides)?;
        tracing::debug!(%overrides, "persisted override document");
        self.overrides = overrides;
        Ok(())
    }
}
