//! Tagged JSON value
//!
//! [`JsonValue`] is an explicit union of object, list and scalar. Objects are
//! kept in a key-sorted map, so iteration order is deterministic for every
//! consumer (tree projection, serialization, diffing).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::error::ValueError;

/// Object members, sorted by key
pub type Object = BTreeMap<String, JsonValue>;

/// A JSON leaf, keeping the kind it was read with
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

impl fmt::Display for Scalar {
    /// Strings render without quotes; other kinds render as JSON text.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => f.write_str("null"),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::String(s) => f.write_str(s),
        }
    }
}

/// A JSON document node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum JsonValue {
    Scalar(Scalar),
    List(Vec<JsonValue>),
    Object(Object),
}

impl Default for JsonValue {
    fn default() -> Self {
        JsonValue::empty_object()
    }
}

impl JsonValue {
    /// The empty object `{}`
    pub fn empty_object() -> Self {
        JsonValue::Object(Object::new())
    }

    /// A string scalar
    pub fn string(value: impl Into<String>) -> Self {
        JsonValue::Scalar(Scalar::String(value.into()))
    }

    /// Single-member object `{ key: value }`
    pub fn wrap(key: impl Into<String>, value: JsonValue) -> Self {
        let mut object = Object::new();
        object.insert(key.into(), value);
        JsonValue::Object(object)
    }

    /// Parse raw JSON bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Human-readable name of the value's tag, used in error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            JsonValue::Scalar(_) => "scalar",
            JsonValue::List(_) => "list",
            JsonValue::Object(_) => "object",
        }
    }

    pub fn is_object(&self) -> bool {
        matches!(self, JsonValue::Object(_))
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            JsonValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            JsonValue::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    /// Get a nested value by path (dot-separated)
    ///
    /// Numeric segments index into lists: `config_net.hosts.0`.
    /// An empty path resolves to the value itself.
    /// Object keys containing a `.` are not reachable through this lookup.
    pub fn get(&self, path: &str) -> Option<&JsonValue> {
        if path.is_empty() {
            return Some(self);
        }
        let mut current = self;
        for part in path.split('.') {
            current = match current {
                JsonValue::Object(map) => map.get(part)?,
                JsonValue::List(items) => items.get(part.parse::<usize>().ok()?)?,
                JsonValue::Scalar(_) => return None,
            };
        }
        Some(current)
    }
}

/// Borrow `value` as an object or fail with `InvalidArgument`
pub(crate) fn expect_object<'a>(
    operation: &'static str,
    role: &'static str,
    value: &'a JsonValue,
) -> Result<&'a Object, ValueError> {
    value.as_object().ok_or(ValueError::InvalidArgument {
        operation,
        role,
        found: value.kind_name(),
    })
}

impl From<Value> for JsonValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => JsonValue::Scalar(Scalar::Null),
            Value::Bool(b) => JsonValue::Scalar(Scalar::Bool(b)),
            Value::Number(n) => JsonValue::Scalar(Scalar::Number(n)),
            Value::String(s) => JsonValue::Scalar(Scalar::String(s)),
            Value::Array(items) => JsonValue::List(items.into_iter().map(JsonValue::from).collect()),
            Value::Object(map) => JsonValue::Object(
                map.into_iter()
                    .map(|(key, value)| (key, JsonValue::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<JsonValue> for Value {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Scalar(Scalar::Null) => Value::Null,
            JsonValue::Scalar(Scalar::Bool(b)) => Value::Bool(b),
            JsonValue::Scalar(Scalar::Number(n)) => Value::Number(n),
            JsonValue::Scalar(Scalar::String(s)) => Value::String(s),
            JsonValue::List(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            JsonValue::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<Scalar> for JsonValue {
    fn from(scalar: Scalar) -> Self {
        JsonValue::Scalar(scalar)
    }
}

impl From<&str> for JsonValue {
    fn from(value: &str) -> Self {
        JsonValue::string(value)
    }
}

impl From<String> for JsonValue {
    fn from(value: String) -> Self {
        JsonValue::string(value)
    }
}

impl fmt::Display for JsonValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonValue::Scalar(scalar) => write!(f, "{}", scalar),
            container => {
                let text = serde_json::to_string(&Value::from(container.clone()))
                    .map_err(|_| fmt::Error)?;
                f.write_str(&text)
            }
        }
    }
}
