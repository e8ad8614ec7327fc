//! Minimal patch computation
//!
//! `diff(original, altered)` keeps only the keys whose values changed, at the
//! deepest object level where they changed. Lists and scalars are recorded
//! whole; only objects are descended into.

use crate::error::ValueError;
use crate::value::{expect_object, JsonValue, Object};

/// Compute the override patch between two objects.
///
/// Iteration is driven by `altered`: keys missing from `original` are
/// recorded as full-value additions, keys missing from `altered` are ignored.
pub fn diff(original: &JsonValue, altered: &JsonValue) -> Result<JsonValue, ValueError> {
    let original = expect_object("diff", "original", original)?;
    let altered = expect_object("diff", "altered", altered)?;
    Ok(JsonValue::Object(diff_objects(original, altered)))
}

fn diff_objects(original: &Object, altered: &Object) -> Object {
    altered
        .iter()
        .filter_map(|(key, altered_value)| {
            let changed = match (original.get(key), altered_value) {
                (Some(original_value), _) if original_value == altered_value => return None,
                (Some(JsonValue::Object(original_sub)), JsonValue::Object(altered_sub)) => {
                    let sub = diff_objects(original_sub, altered_sub);
                    // Removed keys cannot be expressed as a patch
                    if sub.is_empty() {
                        return None;
                    }
                    JsonValue::Object(sub)
                }
                _ => altered_value.clone(),
            };
            Some((key.clone(), changed))
        })
        .collect()
}
