//! Texture decoding and sheet composition shared by the packers.

use std::collections::BTreeMap;

use image::RgbaImage;
use spritepack_core::{PackResult, SpriteData, SpriteImage, Texture};

use crate::png::write_rgba_to_vec;
use crate::shelf::PackedSheet;
use crate::PackerError;

/// A texture decoded to pixels, ready for placement.
pub(crate) struct DecodedFrame {
    /// Frame key (`group/filename`).
    pub path: String,
    /// Filename part of the frame key.
    pub name: String,
    pub image: RgbaImage,
}

pub(crate) fn decode_textures(textures: &[Texture]) -> Result<Vec<DecodedFrame>, PackerError> {
    textures
        .iter()
        .map(|texture| {
            let image = image::load_from_memory(&texture.contents)
                .map_err(|source| PackerError::Decode {
                    frame: texture.path.clone(),
                    source,
                })?
                .into_rgba8();
            let name = texture
                .path
                .rsplit('/')
                .next()
                .unwrap_or(texture.path.as_str())
                .to_string();
            Ok(DecodedFrame {
                path: texture.path.clone(),
                name,
                image,
            })
        })
        .collect()
}

/// Composite placed frames into sheet images and assemble the pack output.
///
/// Sheet names follow the original-resource convention: a lone sheet takes
/// the group name, multiple sheets suffix `-0`, `-1`, and so on. The suffixes
/// also sort naturally, so sheet indices are stable for identical inputs.
pub(crate) fn build_result(
    group: &str,
    frames: &[DecodedFrame],
    sheets: &[PackedSheet],
) -> Result<PackResult, PackerError> {
    let mut frame_map = BTreeMap::new();
    let mut images = Vec::with_capacity(sheets.len());

    for (sheet_index, sheet) in sheets.iter().enumerate() {
        let name = if sheets.len() == 1 {
            group.to_string()
        } else {
            format!("{group}-{sheet_index}")
        };

        let mut canvas = RgbaImage::new(sheet.width, sheet.height);
        for placement in &sheet.placements {
            let frame = &frames[placement.index];
            image::imageops::replace(
                &mut canvas,
                &frame.image,
                i64::from(placement.x),
                i64::from(placement.y),
            );

            frame_map.insert(
                frame.path.clone(),
                SpriteData {
                    name: frame.name.clone(),
                    width: frame.image.width(),
                    height: frame.image.height(),
                    x: placement.x,
                    y: placement.y,
                    sheet_index,
                },
            );
        }

        let content = write_rgba_to_vec(sheet.width, sheet.height, canvas.as_raw())?;
        images.push(SpriteImage {
            name,
            extension: ".png".to_string(),
            width: sheet.width,
            height: sheet.height,
            content,
            source_set: BTreeMap::new(),
        });
    }

    Ok(PackResult {
        frames: frame_map,
        images,
    })
}
