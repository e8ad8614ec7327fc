//! Sample configuration generator
//!
//! Writes a randomly structured document that follows the base document
//! shape: `paramN` keys holding a string, a list of strings, or a flat
//! object of strings.

use std::fs;
use std::path::{Path, PathBuf};

use rand::Rng;
use thiserror::Error;

use json_override_value::{JsonValue, Object};

/// Errors from sample generation
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("output directory does not exist: {0}")]
    MissingDirectory(PathBuf),

    #[error("output file must have a .json extension: {0}")]
    NotJson(PathBuf),

    #[error("invalid parameter range ({min}, {max}): expected 0 < min < max")]
    InvalidRange { min: usize, max: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Inclusive `(min, max)` bounds for every generated count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamRange {
    min: usize,
    max: usize,
}

impl ParamRange {
    pub fn new(min: usize, max: usize) -> Result<Self, GenerateError> {
        if min == 0 || max <= min {
            return Err(GenerateError::InvalidRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> usize {
        self.min
    }

    pub fn max(&self) -> usize {
        self.max
    }

    fn sample<R: Rng>(&self, rng: &mut R) -> usize {
        rng.gen_range(self.min..=self.max)
    }
}

impl Default for ParamRange {
    fn default() -> Self {
        Self { min: 2, max: 5 }
    }
}

/// Build a random document
pub fn sample_document<R: Rng>(rng: &mut R, range: ParamRange) -> JsonValue {
    let params = range.sample(rng);
    let mut document = Object::new();

    for param in 1..=params {
        let value = match rng.gen_range(0..3) {
            0 => JsonValue::string("value"),
            1 => JsonValue::List(
                (1..=range.sample(rng))
                    .map(|i| JsonValue::string(format!("value{}", i)))
                    .collect(),
            ),
            _ => JsonValue::Object(
                (1..=range.sample(rng))
                    .map(|i| (format!("key{}", i), JsonValue::string(format!("value{}", i))))
                    .collect(),
            ),
        };
        document.insert(format!("param{}", param), value);
    }

    JsonValue::Object(document)
}

/// Write a random document to `path` (pretty-printed, newline-terminated)
pub fn generate(path: &Path, range: ParamRange) -> Result<JsonValue, GenerateError> {
    let parent = match path.parent() {
        Some(dir) if dir.as_os_str().is_empty() => Path::new("."),
        Some(dir) => dir,
        None => return Err(GenerateError::MissingDirectory(path.to_path_buf())),
    };
    if !parent.is_dir() {
        return Err(GenerateError::MissingDirectory(parent.to_path_buf()));
    }
    if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
        return Err(GenerateError::NotJson(path.to_path_buf()));
    }

    let document = sample_document(&mut rand::thread_rng(), range);
    let mut bytes = serde_json::to_vec_pretty(&document)?;
    bytes.push(b'\n');
    fs::write(path, bytes)?;

    tracing::debug!(path = %path.display(), "generated sample document");
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::TempDir;

    #[test]
    fn test_range_validation() {
        assert!(ParamRange::new(2, 5).is_ok());
        assert!(matches!(ParamRange::new(0, 5), Err(GenerateError::InvalidRange { .. })));
        assert!(matches!(ParamRange::new(3, 3), Err(GenerateError::InvalidRange { .. })));
        assert!(matches!(ParamRange::new(4, 2), Err(GenerateError::InvalidRange { .. })));
    }

    #[test]
    fn test_sample_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let range = ParamRange::new(2, 4).unwrap();

        for _ in 0..20 {
            let document = sample_document(&mut rng, range);
            let members = document.as_object().unwrap();

            assert!((2..=4).contains(&members.len()));
            for (key, value) in members {
                assert!(key.starts_with("param"));
                match value {
                    JsonValue::Scalar(_) => assert_eq!(value, &JsonValue::string("value")),
                    JsonValue::List(items) => {
                        assert!((2..=4).contains(&items.len()));
                        assert_eq!(items[0], JsonValue::string("value1"));
                    }
                    JsonValue::Object(map) => {
                        assert!((2..=4).contains(&map.len()));
                        assert_eq!(map.get("key1"), Some(&JsonValue::string("value1")));
                    }
                }
            }
        }
    }

    #[test]
    fn test_generate_writes_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config_sample.json");

        let document = generate(&path, ParamRange::default()).unwrap();
        let text = fs::read_to_string(&path).unwrap();

        assert!(text.ends_with("}\n"));
        assert!(text.contains("\n  \"param1\""));
        assert_eq!(JsonValue::from_slice(text.as_bytes()).unwrap(), document);
    }

    #[test]
    fn test_generate_rejects_bad_paths() {
        let dir = TempDir::new().unwrap();

        assert!(matches!(
            generate(&dir.path().join("missing/config.json"), ParamRange::default()),
            Err(GenerateError::MissingDirectory(_))
        ));
        assert!(matches!(
            generate(&dir.path().join("config.txt"), ParamRange::default()),
            Err(GenerateError::NotJson(_))
        ));
    }
}
