//! Filesystem-backed repository
//!
//! Base documents are the files directly inside the configuration directory
//! whose names match the document glob (default `config*.json`). The override
//! artifact is a single file written atomically (write-then-rename).

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobMatcher};
use walkdir::WalkDir;

use super::{is_blank, DocumentRepository, RawDocument, RepositoryError};
use crate::config::Settings;

/// Repository over a configuration directory and an override file
#[derive(Debug, Clone)]
pub struct FsRepository {
    config_dir: PathBuf,
    override_file: PathBuf,
    matcher: GlobMatcher,
}

impl FsRepository {
    pub fn new(
        config_dir: impl Into<PathBuf>,
        override_file: impl Into<PathBuf>,
        document_glob: &str,
    ) -> Result<Self, RepositoryError> {
        let matcher = Glob::new(document_glob)
            .map_err(|e| RepositoryError::InvalidPattern {
                pattern: document_glob.to_string(),
                reason: e.to_string(),
            })?
            .compile_matcher();

        Ok(Self {
            config_dir: config_dir.into(),
            override_file: override_file.into(),
            matcher,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, RepositoryError> {
        Self::new(
            &settings.config_dir,
            &settings.override_file,
            &settings.document_glob,
        )
    }

    pub fn override_file(&self) -> &Path {
        &self.override_file
    }

    /// An existing override file must stay writable; the rename in
    /// `write_artifact` would otherwise replace a read-only file.
    fn ensure_writable(&self) -> Result<(), RepositoryError> {
        match fs::metadata(&self.override_file) {
            Ok(metadata) if metadata.permissions().readonly() => {
                Err(RepositoryError::PermissionDenied(self.override_file.clone()))
            }
            Ok(_) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(RepositoryError::from_io(&self.override_file, e)),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name: OsString = self.override_file.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl DocumentRepository for FsRepository {
    fn list_documents(&self) -> Result<Vec<RawDocument>, RepositoryError> {
        let metadata = fs::metadata(&self.config_dir)
            .map_err(|e| RepositoryError::from_io(&self.config_dir, e))?;
        if !metadata.is_dir() {
            return Err(RepositoryError::LocationMissing(self.config_dir.clone()));
        }

        let mut documents = Vec::new();
        let walker = WalkDir::new(&self.config_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| self.config_dir.clone());
                RepositoryError::from_io(&path, e.into())
            })?;

            if !entry.file_type().is_file() || !self.matcher.is_match(entry.file_name()) {
                continue;
            }

            let path = entry.path();
            let Some(name) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
                continue;
            };
            let content = fs::read(path).map_err(|e| RepositoryError::from_io(path, e))?;
            if is_blank(&content) {
                return Err(RepositoryError::EmptyContent(path.to_path_buf()));
            }

            tracing::debug!(document = %name, bytes = content.len(), "read base document");
            documents.push(RawDocument { name, content });
        }

        Ok(documents)
    }

    fn read_artifact(&self) -> Result<Option<Vec<u8>>, RepositoryError> {
        self.ensure_writable()?;
        match fs::read(&self.override_file) {
            Ok(bytes) if is_blank(&bytes) => {
                tracing::warn!(path = %self.override_file.display(), "override file is empty");
                Ok(None)
            }
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(RepositoryError::from_io(&self.override_file, e)),
        }
    }

    fn write_artifact(&mut self, bytes: &[u8]) -> Result<(), RepositoryError> {
        self.ensure_writable()?;
        let temp_path = self.temp_path();

        if let Err(e) = fs::write(&temp_path, bytes) {
            let _ = fs::remove_file(&temp_path);
            return Err(RepositoryError::from_io(&temp_path, e));
        }

        // Atomic rename
        if let Err(e) = fs::rename(&temp_path, &self.override_file) {
            let _ = fs::remove_file(&temp_path);
            return Err(RepositoryError::from_io(&self.override_file, e));
        }

        tracing::debug!(
            path = %self.override_file.display(),
            bytes = bytes.len(),
            "wrote override file"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn repo(dir: &TempDir) -> FsRepository {
        FsRepository::new(
            dir.path().join("configs"),
            dir.path().join("overrides.json"),
            "config*.json",
        )
        .unwrap()
    }

    #[test]
    fn test_lists_matching_documents_sorted() {
        let dir = TempDir::new().unwrap();
        let configs = dir.path().join("configs");
        fs::create_dir(&configs).unwrap();
        fs::write(configs.join("config_b.json"), b"{\"x\": 1}").unwrap();
        fs::write(configs.join("config_a.json"), b"{}").unwrap();
        fs::write(configs.join("other.json"), b"{}").unwrap();
        fs::write(configs.join("config_c.txt"), b"{}").unwrap();
        fs::create_dir(configs.join("config_dir.json")).unwrap();

        let documents = repo(&dir).list_documents().unwrap();
        let names: Vec<&str> = documents.iter().map(|d| d.name.as_str()).collect();

        assert_eq!(names, vec!["config_a", "config_b"]);
        assert_eq!(documents[1].content, b"{\"x\": 1}");
    }

    #[test]
    fn test_missing_directory() {
        let dir = TempDir::new().unwrap();

        let err = repo(&dir).list_documents().unwrap_err();

        assert!(matches!(err, RepositoryError::LocationMissing(_)));
    }

    #[test]
    fn test_directory_is_a_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("configs"), b"").unwrap();

        let err = repo(&dir).list_documents().unwrap_err();

        assert!(matches!(err, RepositoryError::LocationMissing(_)));
    }

    #[test]
    fn test_empty_document_reported() {
        let dir = TempDir::new().unwrap();
        let configs = dir.path().join("configs");
        fs::create_dir(&configs).unwrap();
        fs::write(configs.join("config_a.json"), b"  \n").unwrap();

        let err = repo(&dir).list_documents().unwrap_err();

        assert!(matches!(err, RepositoryError::EmptyContent(_)));
    }

    #[test]
    fn test_read_artifact_absent_or_empty() {
        let dir = TempDir::new().unwrap();
        let repo = repo(&dir);

        assert_eq!(repo.read_artifact().unwrap(), None);

        fs::write(repo.override_file(), b"").unwrap();
        assert_eq!(repo.read_artifact().unwrap(), None);
    }

    #[test]
    fn test_write_artifact_replaces_content() {
        let dir = TempDir::new().unwrap();
        let mut repo = repo(&dir);

        repo.write_artifact(b"{}\n").unwrap();
        repo.write_artifact(b"{\"a\":\"1\"}\n").unwrap();

        assert_eq!(repo.read_artifact().unwrap().unwrap(), b"{\"a\":\"1\"}\n");
        assert!(!repo.temp_path().exists());
    }

    fn make_read_only(path: &Path) {
        let mut permissions = fs::metadata(path).unwrap().permissions();
        permissions.set_readonly(true);
        fs::set_permissions(path, permissions).unwrap();
    }

    #[test]
    fn test_read_only_artifact_rejected_on_read() {
        let dir = TempDir::new().unwrap();
        let repo = repo(&dir);
        fs::write(repo.override_file(), b"{}\n").unwrap();
        make_read_only(repo.override_file());

        let err = repo.read_artifact().unwrap_err();

        assert!(matches!(err, RepositoryError::PermissionDenied(_)));
    }

    #[test]
    fn test_read_only_artifact_not_replaced() {
        let dir = TempDir::new().unwrap();
        let mut repo = repo(&dir);
        fs::write(repo.override_file(), b"{}\n").unwrap();
        make_read_only(repo.override_file());

        let err = repo.write_artifact(b"{\"a\":\"1\"}\n").unwrap_err();

        assert!(matches!(err, RepositoryError::PermissionDenied(_)));
        assert_eq!(fs::read(repo.override_file()).unwrap(), b"{}\n");
        assert!(!repo.temp_path().exists());
    }

    #[test]
    fn test_write_into_missing_directory() {
        let dir = TempDir::new().unwrap();
        let mut repo = FsRepository::new(
            dir.path().join("configs"),
            dir.path().join("absent/overrides.json"),
            "config*.json",
        )
        .unwrap();

        let err = repo.write_artifact(b"{}\n").unwrap_err();

        assert!(matches!(err, RepositoryError::LocationMissing(_)));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = FsRepository::new("/tmp", "/tmp/o.json", "config[.json").unwrap_err();
        assert!(matches!(err, RepositoryError::InvalidPattern { .. }));
    }
}
