//! Override merge logic
//!
//! Merge semantics:
//! - Objects: merge by key (recursive)
//! - Lists: REPLACE (patch wins entirely)
//! - Scalars: override (patch wins)
//! - Keys only in the patch: dropped under [`MergeMode::Intersect`],
//!   added under [`MergeMode::Union`]

use crate::error::ValueError;
use crate::value::{expect_object, JsonValue, Object};

/// How keys that exist only in the patch are treated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MergeMode {
    /// Only keys present in both base and patch are considered
    #[default]
    Intersect,
    /// Patch-only keys are added to the result
    Union,
}

/// Apply `patch` onto `base` considering only the keys they share.
///
/// A patch can change existing values but never introduce new keys. Both
/// arguments must be objects; the inputs are left untouched.
pub fn merge(base: &JsonValue, patch: &JsonValue) -> Result<JsonValue, ValueError> {
    merge_with(base, patch, MergeMode::Intersect)
}

/// Apply `patch` onto `base` with an explicit [`MergeMode`]
pub fn merge_with(
    base: &JsonValue,
    patch: &JsonValue,
    mode: MergeMode,
) -> Result<JsonValue, ValueError> {
    let base = expect_object("merge", "base", base)?;
    let patch = expect_object("merge", "patch", patch)?;
    Ok(JsonValue::Object(merge_objects(base, patch, mode)))
}

/// Merge several layers in order (first is base, last has highest precedence)
///
/// Layers are folded with [`MergeMode::Union`] starting from `{}`.
pub fn merge_layers<I>(layers: I) -> Result<JsonValue, ValueError>
where
    I: IntoIterator<Item = JsonValue>,
{
    layers
        .into_iter()
        .try_fold(JsonValue::empty_object(), |acc, layer| {
            merge_with(&acc, &layer, MergeMode::Union)
        })
}

fn merge_objects(base: &Object, patch: &Object, mode: MergeMode) -> Object {
    let mut merged: Object = base
        .iter()
        .map(|(key, base_value)| {
            let value = match (base_value, patch.get(key)) {
                // Both objects: recurse
                (JsonValue::Object(base_sub), Some(JsonValue::Object(patch_sub))) => {
                    JsonValue::Object(merge_objects(base_sub, patch_sub, mode))
                }
                // Lists, scalars and tag changes: patch wins
                (_, Some(patch_value)) => patch_value.clone(),
                (base_value, None) => base_value.clone(),
            };
            (key.clone(), value)
        })
        .collect();

    if mode == MergeMode::Union {
        for (key, patch_value) in patch {
            if !base.contains_key(key) {
                merged.insert(key.clone(), patch_value.clone());
            }
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn v(value: serde_json::Value) -> JsonValue {
        JsonValue::from(value)
    }

    #[test]
    fn test_scalar_override() {
        let result = merge(&v(json!({"timeout": 100})), &v(json!({"timeout": 200}))).unwrap();
        assert_eq!(result, v(json!({"timeout": 200})));
    }

    #[test]
    fn test_nested_precedence() {
        let base = v(json!({"a": {"b": {"c": 1, "d": 2}, "e": 3}}));
        let patch = v(json!({"a": {"b": {"c": 9}}}));

        let result = merge(&base, &patch).unwrap();

        assert_eq!(result, v(json!({"a": {"b": {"c": 9, "d": 2}, "e": 3}})));
    }

    #[test]
    fn test_empty_patch_is_identity() {
        let base = v(json!({"a": {"b": [1, 2]}, "c": "x"}));
        assert_eq!(merge(&base, &JsonValue::empty_object()).unwrap(), base);
    }

    #[test]
    fn test_patch_only_keys_are_dropped() {
        let base = v(json!({"a": {"b": 1}}));
        let patch = v(json!({"a": {"b": 2, "new": 3}, "other": 4}));

        let result = merge(&base, &patch).unwrap();

        assert_eq!(result, v(json!({"a": {"b": 2}})));
    }

    #[test]
    fn test_union_adds_patch_only_keys() {
        let base = v(json!({"a": {"b": 1}}));
        let patch = v(json!({"a": {"new": 3}, "other": 4}));

        let result = merge_with(&base, &patch, MergeMode::Union).unwrap();

        assert_eq!(result, v(json!({"a": {"b": 1, "new": 3}, "other": 4})));
    }

    #[test]
    fn test_list_replaced_wholesale() {
        let base = v(json!({"schemes": ["A", "B", "C"]}));
        let patch = v(json!({"schemes": ["X"]}));

        let result = merge(&base, &patch).unwrap();

        assert_eq!(result, v(json!({"schemes": ["X"]})));
    }

    #[test]
    fn test_non_object_patch_replaces_object() {
        let base = v(json!({"a": {"b": 1}}));
        let patch = v(json!({"a": "flat"}));

        assert_eq!(merge(&base, &patch).unwrap(), v(json!({"a": "flat"})));
    }

    #[test]
    fn test_inputs_untouched() {
        let base = v(json!({"a": {"b": 1}}));
        let patch = v(json!({"a": {"b": 2}}));
        let (base_before, patch_before) = (base.clone(), patch.clone());

        let _ = merge(&base, &patch).unwrap();

        assert_eq!(base, base_before);
        assert_eq!(patch, patch_before);
    }

    #[test]
    fn test_top_level_non_object_rejected() {
        let err = merge(&v(json!([1])), &JsonValue::empty_object()).unwrap_err();
        assert_eq!(
            err,
            ValueError::InvalidArgument {
                operation: "merge",
                role: "base",
                found: "list"
            }
        );
        assert!(merge(&JsonValue::empty_object(), &v(json!("x"))).is_err());
    }

    #[test]
    fn test_merge_layers() {
        let builtin = v(json!({"timeout": 100, "cache": {"mode": "off"}}));
        let file = v(json!({"cache": {"mode": "on"}}));
        let cli = v(json!({"timeout": 50, "extra": true}));

        let result = merge_layers(vec![builtin, file, cli]).unwrap();

        assert_eq!(
            result,
            v(json!({"timeout": 50, "cache": {"mode": "on"}, "extra": true}))
        );
    }
}
