//! Document repository
//!
//! The store never touches the filesystem directly. It reads base documents
//! and reads/writes the single override artifact through
//! [`DocumentRepository`], which reports missing locations, permission
//! problems and empty content as distinct errors.

mod fs;
mod memory;

use std::io;
use std::path::{Path, PathBuf};

pub use fs::FsRepository;
pub use memory::MemoryRepository;

/// Raw bytes of one base document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    /// Document name (file stem, e.g. "config_network")
    pub name: String,
    pub content: Vec<u8>,
}

/// Source of base documents and owner of the override artifact
pub trait DocumentRepository {
    /// Every base document matching the naming convention, sorted by name
    fn list_documents(&self) -> Result<Vec<RawDocument>, RepositoryError>;

    /// Contents of the override artifact, `None` if it does not exist yet
    fn read_artifact(&self) -> Result<Option<Vec<u8>>, RepositoryError>;

    /// Replace the override artifact; the previous content survives a failure
    fn write_artifact(&mut self, bytes: &[u8]) -> Result<(), RepositoryError>;
}

/// Errors reported by a [`DocumentRepository`]
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("location not found: {0}")]
    LocationMissing(PathBuf),

    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    #[error("empty or partial content: {0}")]
    EmptyContent(PathBuf),

    #[error("invalid document pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl RepositoryError {
    /// Classify an I/O failure at `path`
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => RepositoryError::LocationMissing(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => {
                RepositoryError::PermissionDenied(path.to_path_buf())
            }
            _ => RepositoryError::Io {
                path: path.to_path_buf(),
                source: err,
            },
        }
    }
}

/// Whether `bytes` carries no JSON text at all
pub(crate) fn is_blank(bytes: &[u8]) -> bool {
    bytes.iter().all(u8::is_ascii_whitespace)
}
