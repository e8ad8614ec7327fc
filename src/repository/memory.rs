//! In-memory repository for tests and embedding

use std::collections::BTreeMap;
use std::path::PathBuf;

use super::{is_blank, DocumentRepository, RawDocument, RepositoryError};

const DOCUMENTS_LOCATION: &str = "memory://documents";
const ARTIFACT_LOCATION: &str = "memory://overrides.json";

/// Repository holding documents and the override artifact in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    documents: BTreeMap<String, Vec<u8>>,
    artifact: Option<Vec<u8>>,
    location_missing: bool,
    fail_writes: bool,
    writes: usize,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.documents.insert(name.into(), content.into());
        self
    }

    pub fn with_artifact(mut self, content: impl Into<Vec<u8>>) -> Self {
        self.artifact = Some(content.into());
        self
    }

    /// Make `list_documents` report the location as missing
    pub fn with_missing_location(mut self) -> Self {
        self.location_missing = true;
        self
    }

    /// Make every subsequent write fail
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    pub fn artifact(&self) -> Option<&[u8]> {
        self.artifact.as_deref()
    }

    /// Number of successful writes
    pub fn write_count(&self) -> usize {
        self.writes
    }
}

impl DocumentRepository for MemoryRepository {
    fn list_documents(&self) -> Result<Vec<RawDocument>, RepositoryError> {
        if self.location_missing {
            return Err(RepositoryError::LocationMissing(PathBuf::from(
                DOCUMENTS_LOCATION,
            )));
        }

        self.documents
            .iter()
            .map(|(name, content)| {
                if is_blank(content) {
                    return Err(RepositoryError::EmptyContent(PathBuf::from(format!(
                        "{}/{}",
                        DOCUMENTS_LOCATION, name
                    ))));
                }
                Ok(RawDocument {
                    name: name.clone(),
                    content: content.clone(),
                })
            })
            .collect()
    }

    fn read_artifact(&self) -> Result<Option<Vec<u8>>, RepositoryError> {
        Ok(self.artifact.clone().filter(|bytes| !is_blank(bytes)))
    }

    fn write_artifact(&mut self, bytes: &[u8]) -> Result<(), RepositoryError> {
        if self.fail_writes {
            return Err(RepositoryError::PermissionDenied(PathBuf::from(
                ARTIFACT_LOCATION,
            )));
        }
        self.artifact = Some(bytes.to_vec());
        self.writes += 1;
        Ok(())
    }
}
