//! Sheet emission into the host build's asset output.
//!
//! The pipeline hands every packed sheet (and each of its alternate
//! encodings) to an [`AssetEmitter`], collecting the emitted pathname per
//! sheet. Emitted pathnames are embedded into sprite modules behind
//! [`PUBLIC_PATH_PLACEHOLDER`], which the host build substitutes with the
//! deployed public path at final emission time.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use spritepack_core::{blake3_hex, SpriteImage};

/// Placeholder prefixing every module's `source` until the host build knows
/// the deployed public path.
pub const PUBLIC_PATH_PLACEHOLDER: &str = "__SPRITEPACK_PUBLIC_PATH__";

/// Destination for packed sheet files.
pub trait AssetEmitter: Send + Sync {
    /// Write one sheet, returning the pathname it is reachable under.
    fn emit(&self, image: &SpriteImage) -> Result<String>;
}

/// Emits sheets as content-hashed files under an output directory.
///
/// Filenames embed a hash of the sheet bytes, so an existing file with the
/// same name already has the same content and is left untouched.
#[derive(Debug)]
pub struct FsEmitter {
    assets_dir: PathBuf,
}

impl FsEmitter {
    pub fn new(assets_dir: impl Into<PathBuf>) -> Self {
        Self {
            assets_dir: assets_dir.into(),
        }
    }
}

impl AssetEmitter for FsEmitter {
    fn emit(&self, image: &SpriteImage) -> Result<String> {
        let pathname = format!(
            "{}.{}{}",
            image.name,
            &blake3_hex(&image.content)[..8],
            image.extension
        );

        fs::create_dir_all(&self.assets_dir).with_context(|| {
            format!(
                "failed to create asset directory {}",
                self.assets_dir.display()
            )
        })?;
        let path = self.assets_dir.join(&pathname);
        if !path.exists() {
            fs::write(&path, &image.content)
                .with_context(|| format!("failed to emit sheet '{pathname}'"))?;
        }

        Ok(pathname)
    }
}

/// Emit every sheet and variant, returning `name + extension` -> pathname.
pub(crate) fn emit_images(
    emitter: &dyn AssetEmitter,
    images: &[SpriteImage],
) -> Result<BTreeMap<String, String>> {
    let mut paths = BTreeMap::new();
    for image in images {
        emit_one(emitter, image, &mut paths)?;
    }
    Ok(paths)
}

fn emit_one(
    emitter: &dyn AssetEmitter,
    image: &SpriteImage,
    paths: &mut BTreeMap<String, String>,
) -> Result<()> {
    let pathname = emitter.emit(image)?;
    paths.insert(image.path_key(), pathname);
    for variant in image.source_set.values() {
        emit_one(emitter, variant, paths)?;
    }
    Ok(())
}
