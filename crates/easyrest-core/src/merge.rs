//! Recursive structural merge used by partial updates.

use serde_json::{Map, Value};

/// Merge `patch` onto `base`, returning a new document.
///
/// Nested objects present on both sides are merged recursively. Any other
/// patch value, `null` included, replaces the base value. Keys that only
/// exist in `base` are kept as they are.
pub fn merge(patch: &Map<String, Value>, base: &Map<String, Value>) -> Map<String, Value> {
    let mut merged = base.clone();
    for (key, patch_value) in patch {
        let value = match (patch_value, base.get(key)) {
            (Value::Object(patch_child), Some(Value::Object(base_child))) => {
                Value::Object(merge(patch_child, base_child))
            }
            _ => patch_value.clone(),
        };
        merged.insert(key.clone(), value);
    }
    merged
}

/// [`merge`] over arbitrary JSON values.
///
/// When either side is not an object the patch wins outright.
pub fn merge_values(patch: &Value, base: &Value) -> Value {
    match (patch, base) {
        (Value::Object(patch), Value::Object(base)) => Value::Object(merge(patch, base)),
        _ => patch.clone(),
    }
}
