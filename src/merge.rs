//! Recursive merge-patch over untyped document trees.
//!
//! Follows RFC 7386 (JSON Merge Patch) semantics: a null in the patch
//! deletes the key, a non-map patch value replaces wholesale, and two maps
//! merge key by key.

use serde_json::{Map, Value};

/// Apply a merge patch to a document tree, returning the merged tree.
///
/// Neither input is modified. The function is total: any combination of
/// shapes produces a result.
///
/// - A non-map `patch` (scalar, sequence, or null) replaces the entire
///   `original`, whatever its shape. Sequences are opaque leaves and are
///   never merged element-wise.
/// - A map `patch` merges into `original` if it is a map, or into an empty
///   map otherwise. A null patch value removes the key; a value for an
///   existing key recurses; a value for a fresh key is inserted as-is.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use nodectl::merge::merge_patch;
///
/// let original = json!({"moniker": "node1", "p2p": {"seeds": "a", "pex": true}});
/// let patch = json!({"moniker": "node2", "p2p": {"seeds": null}});
/// assert_eq!(
///     merge_patch(&original, &patch),
///     json!({"moniker": "node2", "p2p": {"pex": true}}),
/// );
/// ```
pub fn merge_patch(original: &Value, patch: &Value) -> Value {
    let Value::Object(patch_map) = patch else {
        return patch.clone();
    };

    let mut result = match original {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    };

    for (key, patch_at) in patch_map {
        if patch_at.is_null() {
            result.remove(key);
        } else if let Some(original_at) = result.get(key) {
            let merged = merge_patch(original_at, patch_at);
            result.insert(key.clone(), merged);
        } else {
            result.insert(key.clone(), patch_at.clone());
        }
    }

    Value::Object(result)
}
