//! Shared fixtures for filesystem-backed tests

use std::fs;
use std::path::PathBuf;

use json_override::FsRepository;
use tempfile::TempDir;

/// A temporary configuration directory plus override file location
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    /// Create a workspace holding the given `(file name, content)` documents
    pub fn with_documents(documents: &[(&str, &str)]) -> Self {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("configs")).unwrap();
        for (file_name, content) in documents {
            fs::write(dir.path().join("configs").join(file_name), content).unwrap();
        }
        Self { dir }
    }

    pub fn config_dir(&self) -> PathBuf {
        self.dir.path().join("configs")
    }

    pub fn override_file(&self) -> PathBuf {
        self.dir.path().join("overrides.json")
    }

    pub fn repository(&self) -> FsRepository {
        FsRepository::new(self.config_dir(), self.override_file(), "config*.json").unwrap()
    }

    pub fn read_overrides(&self) -> String {
        fs::read_to_string(self.override_file()).unwrap()
    }
}

/// Network document used across tests
pub const CONFIG_NETWORK: &str = r#"{
  "host": "localhost",
  "ports": ["80", "443", "8080"],
  "tls": {"enabled": "no", "cert": "server.pem"}
}"#;

/// UI document used across tests
pub const CONFIG_UI: &str = r#"{"theme": "dark", "font": {"family": "mono", "size": 12}}"#;

pub fn standard() -> Workspace {
    Workspace::with_documents(&[
        ("config_network.json", CONFIG_NETWORK),
        ("config_ui.json", CONFIG_UI),
        ("notes.json", "not even json"),
    ])
}
