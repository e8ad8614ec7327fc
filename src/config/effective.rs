//! Effective settings with provenance
//!
//! Each layer is converted to a [`JsonValue`] and the layers are folded with
//! [`merge_layers`], then deserialized back into [`Settings`].

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use json_override_value::{merge_layers, JsonValue, Object, Scalar};

use super::defaults::Settings;

/// Origin of a settings layer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SettingsOrigin {
    Builtin,
    File,
    Cli,
}

impl SettingsOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingsOrigin::Builtin => "builtin",
            SettingsOrigin::File => "file",
            SettingsOrigin::Cli => "cli",
        }
    }
}

/// A contributing settings layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsSource {
    pub origin: SettingsOrigin,

    /// File path (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// SHA-256 digest of raw file bytes (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config_dir: Option<PathBuf>,
    pub override_file: Option<PathBuf>,
}

impl CliOverrides {
    fn to_value(&self) -> JsonValue {
        let mut layer = Object::new();
        if let Some(dir) = &self.config_dir {
            layer.insert("config_dir".to_string(), path_value(dir));
        }
        if let Some(file) = &self.override_file {
            layer.insert("override_file".to_string(), path_value(file));
        }
        JsonValue::Object(layer)
    }

    fn is_empty(&self) -> bool {
        self.config_dir.is_none() && self.override_file.is_none()
    }
}

fn path_value(path: &Path) -> JsonValue {
    JsonValue::string(path.to_string_lossy())
}

/// Settings after layering, plus where they came from
#[derive(Debug, Clone)]
pub struct EffectiveSettings {
    pub settings: Settings,

    /// Contributing sources in precedence order
    pub sources: Vec<SettingsSource>,
}

/// Settings errors
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl EffectiveSettings {
    /// Get the default settings file path
    pub fn default_path() -> Option<PathBuf> {
        std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(".config/json-override/settings.toml"))
    }

    /// Build effective settings from layers
    ///
    /// An explicit `settings_file` must exist; without one the default
    /// location is used when present.
    pub fn build(settings_file: Option<&Path>, cli: &CliOverrides) -> Result<Self, SettingsError> {
        let mut layers = Vec::new();
        let mut sources = Vec::new();

        // Layer 1: Built-in defaults
        let defaults = serde_json::to_value(Settings::default())
            .map_err(|e| SettingsError::ParseError(e.to_string()))?;
        layers.push(JsonValue::from(defaults));
        sources.push(SettingsSource {
            origin: SettingsOrigin::Builtin,
            path: None,
            digest: None,
        });

        // Layer 2: Settings file
        let file = match settings_file {
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_path().filter(|path| path.exists()),
        };
        if let Some(path) = file {
            let (value, digest) = Self::load_toml_file(&path)?;
            layers.push(value);
            sources.push(SettingsSource {
                origin: SettingsOrigin::File,
                path: Some(path.to_string_lossy().to_string()),
                digest: Some(digest),
            });
        }

        // Layer 3: CLI flags
        if !cli.is_empty() {
            layers.push(cli.to_value());
            sources.push(SettingsSource {
                origin: SettingsOrigin::Cli,
                path: None,
                digest: None,
            });
        }

        let merged = merge_layers(layers).map_err(|e| SettingsError::ParseError(e.to_string()))?;
        let settings: Settings = serde_json::from_value(merged.into())
            .map_err(|e| SettingsError::ParseError(e.to_string()))?;

        Self::validate(&settings)?;
        tracing::debug!(?settings, layers = sources.len(), "resolved settings");

        Ok(Self { settings, sources })
    }

    /// Load and parse a TOML file, returning the value and digest
    fn load_toml_file(path: &Path) -> Result<(JsonValue, String), SettingsError> {
        let bytes = fs::read(path)
            .map_err(|e| SettingsError::IoError(format!("{}: {}", path.display(), e)))?;

        // Compute digest
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let digest = hex::encode(hasher.finalize());

        let contents = String::from_utf8(bytes)
            .map_err(|e| SettingsError::ParseError(format!("Invalid UTF-8: {}", e)))?;

        let toml_value: toml::Value = toml::from_str(&contents)
            .map_err(|e| SettingsError::ParseError(format!("TOML parse error: {}", e)))?;

        Ok((Self::toml_to_json(toml_value), digest))
    }

    /// Convert TOML Value to JSON Value
    fn toml_to_json(toml: toml::Value) -> JsonValue {
        match toml {
            toml::Value::String(s) => JsonValue::string(s),
            toml::Value::Integer(i) => JsonValue::Scalar(Scalar::Number(i.into())),
            toml::Value::Float(f) => serde_json::Number::from_f64(f)
                .map(|n| JsonValue::Scalar(Scalar::Number(n)))
                .unwrap_or(JsonValue::Scalar(Scalar::Null)),
            toml::Value::Boolean(b) => JsonValue::Scalar(Scalar::Bool(b)),
            toml::Value::Datetime(dt) => JsonValue::string(dt.to_string()),
            toml::Value::Array(arr) => {
                JsonValue::List(arr.into_iter().map(Self::toml_to_json).collect())
            }
            toml::Value::Table(table) => JsonValue::Object(
                table
                    .into_iter()
                    .map(|(k, v)| (k, Self::toml_to_json(v)))
                    .collect(),
            ),
        }
    }

    fn validate(settings: &Settings) -> Result<(), SettingsError> {
        if settings.document_glob.trim().is_empty() {
            return Err(SettingsError::ValidationError(
                "document_glob must not be empty".to_string(),
            ));
        }
        if settings.override_file.file_name().is_none() {
            return Err(SettingsError::ValidationError(format!(
                "override_file must name a file, got '{}'",
                settings.override_file.display()
            )));
        }
        Ok(())
    }
}
