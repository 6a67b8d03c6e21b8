//! Content-addressed cache for pack results.
//!
//! One index document per group key (`<cacheDir>/<algorithm>/<key>.json`)
//! holds the content digest and a JSON rendering of the pack result in which
//! every binary field is externalized to a sibling file and replaced by a
//! `buffer:<name>` reference string; the sibling file carries that literal
//! name. Binary files are named by a hash of their own content, so identical
//! payloads deduplicate across writes.
//!
//! Read problems of any kind (missing document, unreadable JSON, dangling
//! buffer reference, digest mismatch) are cache misses, never errors: the
//! pipeline recomputes and overwrites. Writes land every binary file before
//! the index document (itself written via temp file + rename), so a crash
//! mid-write cannot leave a document referencing bytes that were never
//! written. Two processes packing the same key concurrently race benignly:
//! last writer wins.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;
use serde_json::{json, Value};
use spritepack_core::{blake3_hex, PackResult, SpriteImage};
use thiserror::Error;

const BUFFER_PREFIX: &str = "buffer:";

/// A binary payload externalized from a cache document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryFile {
    /// On-disk filename, also the `buffer:` reference target.
    pub name: String,
    /// Raw bytes.
    pub content: Vec<u8>,
}

/// Why a cache document failed to deserialize. Internal: every variant is
/// surfaced as a miss.
#[derive(Debug, Error)]
pub enum CacheFormatError {
    #[error("missing or mistyped field '{0}'")]
    MissingField(&'static str),

    #[error("expected a '{BUFFER_PREFIX}' reference, found '{0}'")]
    BadReference(String),

    #[error("cannot read referenced buffer file: {0}")]
    Io(#[from] io::Error),

    #[error("malformed frame map: {0}")]
    Json(#[from] serde_json::Error),
}

/// Render a pack result as a JSON document, externalizing binary fields.
///
/// `prefix` (the group key) namespaces the binary filenames. Identical
/// payloads are pushed to `files` once.
pub fn stringify(result: &PackResult, prefix: &str, files: &mut Vec<BinaryFile>) -> Result<Value> {
    let images: Vec<Value> = result
        .images
        .iter()
        .map(|image| image_to_value(image, prefix, files))
        .collect();

    Ok(json!({
        "frames": serde_json::to_value(&result.frames).context("frame map is not serializable")?,
        "images": images,
    }))
}

fn image_to_value(image: &SpriteImage, prefix: &str, files: &mut Vec<BinaryFile>) -> Value {
    let name = format!("{prefix}.{}", blake3_hex(&image.content));
    if !files.iter().any(|f| f.name == name) {
        files.push(BinaryFile {
            name: name.clone(),
            content: image.content.clone(),
        });
    }

    let source_set: serde_json::Map<String, Value> = image
        .source_set
        .iter()
        .map(|(variant, nested)| (variant.clone(), image_to_value(nested, prefix, files)))
        .collect();

    json!({
        "name": image.name,
        "extension": image.extension,
        "width": image.width,
        "height": image.height,
        "content": format!("{BUFFER_PREFIX}{name}"),
        "sourceSet": source_set,
    })
}

/// Rebuild a pack result from a cache document, resolving `buffer:`
/// references through `read`.
pub fn parse(
    value: &Value,
    read: &dyn Fn(&str) -> io::Result<Vec<u8>>,
) -> Result<PackResult, CacheFormatError> {
    let frames = value
        .get("frames")
        .ok_or(CacheFormatError::MissingField("frames"))?;
    let images = value
        .get("images")
        .and_then(Value::as_array)
        .ok_or(CacheFormatError::MissingField("images"))?;

    Ok(PackResult {
        frames: serde_json::from_value(frames.clone())?,
        images: images
            .iter()
            .map(|image| value_to_image(image, read))
            .collect::<Result<_, _>>()?,
    })
}

fn value_to_image(
    value: &Value,
    read: &dyn Fn(&str) -> io::Result<Vec<u8>>,
) -> Result<SpriteImage, CacheFormatError> {
    let field_str = |field: &'static str| {
        value
            .get(field)
            .and_then(Value::as_str)
            .ok_or(CacheFormatError::MissingField(field))
    };
    let field_u32 = |field: &'static str| {
        value
            .get(field)
            .and_then(Value::as_u64)
            .map(|v| v as u32)
            .ok_or(CacheFormatError::MissingField(field))
    };

    let reference = field_str("content")?;
    let buffer_name = reference
        .strip_prefix(BUFFER_PREFIX)
        .ok_or_else(|| CacheFormatError::BadReference(reference.to_string()))?;

    let mut source_set = BTreeMap::new();
    if let Some(variants) = value.get("sourceSet").and_then(Value::as_object) {
        for (variant, nested) in variants {
            source_set.insert(variant.clone(), value_to_image(nested, read)?);
        }
    }

    Ok(SpriteImage {
        name: field_str("name")?.to_string(),
        extension: field_str("extension")?.to_string(),
        width: field_u32("width")?,
        height: field_u32("height")?,
        content: read(buffer_name)?,
        source_set,
    })
}

/// Persistent, content-addressed store of pack results.
///
/// Constructed with `None` when caching is disabled: every `get` misses and
/// `put` is a no-op, so the pipeline recomputes each generation.
#[derive(Debug)]
pub struct SheetCache {
    dir: Option<PathBuf>,
}

impl SheetCache {
    /// `cache_dir` is the user-facing root; entries are namespaced per
    /// packing algorithm so switching algorithms cannot serve stale sheets.
    pub fn new(cache_dir: Option<&Path>, algorithm: &str) -> Self {
        Self {
            dir: cache_dir.map(|d| d.join(algorithm)),
        }
    }

    fn document_path(dir: &Path, key: &str) -> PathBuf {
        dir.join(format!("{key}.json"))
    }

    /// Look up the pack result for `key`, provided it was produced from
    /// exactly the content set identified by `digest`.
    pub fn get(&self, key: &str, digest: &str) -> Option<PackResult> {
        let dir = self.dir.as_deref()?;
        let path = Self::document_path(dir, key);

        let content = fs::read_to_string(&path).ok()?;
        let document: Value = match serde_json::from_str(&content) {
            Ok(document) => document,
            Err(err) => {
                debug!("cache miss for '{key}': unreadable document: {err}");
                return None;
            }
        };

        let stored = document.get("hash").and_then(Value::as_str)?;
        if stored != digest {
            debug!("cache miss for '{key}': digest changed");
            return None;
        }

        let data = document.get("data")?;
        match parse(data, &|name| fs::read(dir.join(name))) {
            Ok(result) => {
                debug!("cache hit for '{key}'");
                Some(result)
            }
            Err(err) => {
                debug!("cache miss for '{key}': {err}");
                None
            }
        }
    }

    /// Persist `result` under `key` for the content set `digest`.
    pub fn put(&self, key: &str, digest: &str, result: &PackResult) -> Result<()> {
        let Some(dir) = self.dir.as_deref() else {
            return Ok(());
        };
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create cache directory {}", dir.display()))?;

        let mut files = Vec::new();
        let data = stringify(result, key, &mut files)?;

        // Binary payloads land before the document that references them.
        for file in &files {
            fs::write(dir.join(&file.name), &file.content)
                .with_context(|| format!("failed to write cache buffer '{}'", file.name))?;
        }

        let document = json!({ "hash": digest, "data": data });
        let final_path = Self::document_path(dir, key);
        let temp_path = final_path.with_extension("json.tmp");
        fs::write(&temp_path, serde_json::to_string(&document)?)
            .with_context(|| format!("failed to write cache document for '{key}'"))?;
        fs::rename(&temp_path, &final_path)
            .with_context(|| format!("failed to commit cache document for '{key}'"))?;

        Ok(())
    }
}
