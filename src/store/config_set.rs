//! Base documents loaded for one session

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use json_override_value::{JsonValue, Object};

use super::StoreError;
use crate::repository::RawDocument;

/// Provenance of one base document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSource {
    pub name: String,

    /// SHA-256 digest of the raw document bytes
    pub digest: String,

    pub size: usize,
}

/// Base documents keyed by name; immutable once loaded
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigSet {
    documents: BTreeMap<String, JsonValue>,
    sources: Vec<DocumentSource>,
}

impl ConfigSet {
    /// Parse raw documents; every document root must be an object
    pub fn from_documents(raw: Vec<RawDocument>) -> Result<Self, StoreError> {
        let mut documents = BTreeMap::new();
        let mut sources = Vec::with_capacity(raw.len());

        for document in raw {
            let value = JsonValue::from_slice(&document.content).map_err(|e| {
                StoreError::MalformedDocument {
                    name: document.name.clone(),
                    reason: e.to_string(),
                }
            })?;
            if !value.is_object() {
                return Err(StoreError::MalformedDocument {
                    name: document.name,
                    reason: format!("root is a {}, expected an object", value.kind_name()),
                });
            }

            let mut hasher = Sha256::new();
            hasher.update(&document.content);
            sources.push(DocumentSource {
                name: document.name.clone(),
                digest: hex::encode(hasher.finalize()),
                size: document.content.len(),
            });
            documents.insert(document.name, value);
        }

        Ok(Self { documents, sources })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.documents.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Documents in load order, with digests
    pub fn sources(&self) -> &[DocumentSource] {
        &self.sources
    }

    /// The synthetic object `{ document name: document }`
    pub fn to_value(&self) -> JsonValue {
        JsonValue::Object(
            self.documents
                .iter()
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect::<Object>(),
        )
    }
}
