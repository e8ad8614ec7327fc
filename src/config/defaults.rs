//! Built-in defaults (layer 1)

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default directory holding `config*.json` documents
pub const DEFAULT_CONFIG_DIR: &str = "/tmp/configs";

/// Default override document location
pub const DEFAULT_OVERRIDE_FILE: &str = "/tmp/overrides.json";

/// Default naming convention for base documents
pub const DEFAULT_DOCUMENT_GLOB: &str = "config*.json";

/// Locations the override editor works with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Directory scanned for base documents
    pub config_dir: PathBuf,

    /// The override document
    pub override_file: PathBuf,

    /// File-name glob selecting base documents
    pub document_glob: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
            override_file: PathBuf::from(DEFAULT_OVERRIDE_FILE),
            document_glob: DEFAULT_DOCUMENT_GLOB.to_string(),
        }
    }
}
