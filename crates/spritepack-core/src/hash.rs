//! Canonical hashing for cache keys.
//!
//! The content digest covers the packer configuration (canonicalized JSON,
//! so key order in the caller's hands cannot change the digest) followed by
//! every texture's raw bytes in [`crate::ordering`] order. Changing a single
//! byte of any input, or the configuration, changes the digest; stale cache
//! entries invalidate themselves without explicit versioning.

use serde_json::Value;

use crate::sprite::Texture;

/// Computes the BLAKE3 hash of a byte slice as lowercase hex.
pub fn blake3_hex(content: &[u8]) -> String {
    blake3::hash(content).to_hex().to_string()
}

/// Digest over a packer configuration and an ordered texture set.
///
/// The caller is responsible for sorting `textures` by the ordering policy;
/// the registry snapshot already does so. Each texture contributes its frame
/// key and contents, delimited so that shifting bytes between adjacent
/// textures cannot collide.
pub fn content_digest(config: &Value, textures: &[Texture]) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(canonicalize_json(config).as_bytes());
    for texture in textures {
        hasher.update(texture.path.as_bytes());
        hasher.update(&[0]);
        hasher.update(&texture.contents);
    }
    hasher.finalize().to_hex().to_string()
}

/// Canonicalizes a JSON value: lexicographically sorted object keys, no
/// whitespace between tokens.
pub fn canonicalize_json(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => Value::String(s.clone()).to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(canonicalize_json).collect();
            format!("[{}]", items.join(","))
        }
        Value::Object(obj) => {
            let mut keys: Vec<&String> = obj.keys().collect();
            keys.sort();
            let pairs: Vec<String> = keys
                .iter()
                .map(|k| {
                    format!(
                        "{}:{}",
                        Value::String((*k).clone()),
                        canonicalize_json(&obj[*k])
                    )
                })
                .collect();
            format!("{{{}}}", pairs.join(","))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn texture(path: &str, contents: &[u8]) -> Texture {
        Texture {
            path: path.to_string(),
            contents: contents.to_vec(),
        }
    }

    #[test]
    fn canonical_json_sorts_keys() {
        let value = json!({"b": 1, "a": {"d": 2, "c": [1, "x"]}});
        assert_eq!(
            canonicalize_json(&value),
            r#"{"a":{"c":[1,"x"],"d":2},"b":1}"#
        );
    }

    #[test]
    fn digest_is_stable_for_identical_inputs() {
        let config = json!({"packer": "multi-sheet"});
        let textures = vec![texture("g/a", b"aaa"), texture("g/b", b"bbb")];
        assert_eq!(
            content_digest(&config, &textures),
            content_digest(&config, &textures)
        );
    }

    #[test]
    fn digest_changes_on_single_byte_edit() {
        let config = json!({"packer": "multi-sheet"});
        let original = vec![texture("g/a", b"aaa"), texture("g/b", b"bbb")];
        let edited = vec![texture("g/a", b"aaa"), texture("g/b", b"bbc")];
        assert_ne!(
            content_digest(&config, &original),
            content_digest(&config, &edited)
        );
    }

    #[test]
    fn digest_changes_on_configuration_change() {
        let textures = vec![texture("g/a", b"aaa")];
        assert_ne!(
            content_digest(&json!({"packer": "multi-sheet"}), &textures),
            content_digest(&json!({"packer": "single-sheet"}), &textures)
        );
    }

    #[test]
    fn texture_boundaries_are_delimited() {
        let config = json!({});
        let joined = vec![texture("g/a", b"aabb")];
        let split = vec![texture("g/a", b"aa"), texture("g/b", b"bb")];
        assert_ne!(content_digest(&config, &joined), content_digest(&config, &split));
    }

    #[test]
    fn blake3_hex_is_64_chars() {
        assert_eq!(blake3_hex(b"content").len(), 64);
    }
}
