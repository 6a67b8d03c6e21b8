//! Rewriting an original resource into its sprite module.
//!
//! Given a group's pack output, every resource's frame is re-derived from
//! its `group/filename` key. A missing frame means the registry and packer
//! disagree about group membership, which is a sequencing bug upstream, so
//! the rewrite fails loudly instead of emitting a corrupt record.

use std::collections::BTreeMap;

use spritepack_core::{PackResult, ResourceInfo, SpriteData, SpriteImage, SpriteModule, SpritePackError};

use crate::emit::PUBLIC_PATH_PLACEHOLDER;

/// Compose the [`SpriteModule`] substituted for one original resource.
///
/// `paths` maps each sheet's `name + extension` to its emitted pathname, as
/// produced during sheet emission.
pub fn rewrite(
    info: &ResourceInfo,
    key: &str,
    result: &PackResult,
    paths: &BTreeMap<String, String>,
    scale_factor: f64,
) -> Result<SpriteModule, SpritePackError> {
    let frame_name = info.frame_name();
    let frame = result
        .frames
        .get(&frame_name)
        .ok_or_else(|| SpritePackError::FrameNotFound {
            frame: frame_name.clone(),
            key: key.to_string(),
        })?;

    let image =
        result
            .images
            .get(frame.sheet_index)
            .ok_or_else(|| SpritePackError::SheetNotFound {
                frame: frame_name.clone(),
                index: frame.sheet_index,
                count: result.images.len(),
            })?;

    image_to_module(info, key, &frame_name, frame, image, paths, scale_factor)
}

fn image_to_module(
    info: &ResourceInfo,
    key: &str,
    frame_name: &str,
    frame: &SpriteData,
    image: &SpriteImage,
    paths: &BTreeMap<String, String>,
    scale_factor: f64,
) -> Result<SpriteModule, SpritePackError> {
    let pathname =
        paths
            .get(&image.path_key())
            .ok_or_else(|| SpritePackError::SheetPathMissing {
                sheet: image.path_key(),
            })?;

    let mut source_set = BTreeMap::new();
    for (variant, nested) in &image.source_set {
        source_set.insert(
            variant.clone(),
            image_to_module(info, key, frame_name, frame, nested, paths, scale_factor)?,
        );
    }

    Ok(SpriteModule {
        name: info.filename.clone(),
        width: frame.width,
        height: frame.height,
        x: frame.x,
        y: frame.y,
        sheet_index: frame.sheet_index,
        key: key.to_string(),
        source: format!("{PUBLIC_PATH_PLACEHOLDER}/{pathname}"),
        group: info.group.clone(),
        frame_name: frame_name.to_string(),
        sprite_name: image.name.clone(),
        sprite_width: image.width,
        sprite_height: image.height,
        scale_factor,
        source_set,
    })
}
