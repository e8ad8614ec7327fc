//! JSON override editor
//!
//! Shows configuration assembled from several base JSON documents and records
//! edits in a separate override document, leaving the base documents
//! untouched:
//! - [`repository`]: where base documents and the override document live
//! - [`store`]: loading, the effective view, applying and persisting overrides
//! - [`tree`]: editable projection of the effective view
//! - [`config`]: settings for the command-line tool
//! - [`generate`]: random sample documents

pub mod config;
pub mod generate;
pub mod repository;
pub mod store;

pub use json_override_tree as tree;
pub use json_override_value as value;

pub use config::{CliOverrides, EffectiveSettings, Settings};
pub use repository::{DocumentRepository, FsRepository, MemoryRepository, RepositoryError};
pub use store::{ConfigSet, OverrideStore, StoreError};
pub use tree::{NodeId, NodeKey, NodeKind, Tree, TreeError};
pub use value::{diff, merge, JsonValue, MergeMode, Scalar, ValueError};
