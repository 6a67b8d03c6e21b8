//! Size-capped packer that splits large groups across sheets.
//!
//! Sheets are capped at [`MAX_SHEET_SIZE`] per side because oversized
//! textures may not display (or may jitter) on some devices; a group whose
//! frames exceed one sheet's capacity legitimately packs into several.

use spritepack_core::{PackResult, Texture};

use crate::frames::{build_result, decode_textures};
use crate::shelf::pack_shelves;
use crate::{Packer, PackerError};

/// Maximum sheet width/height in pixels.
pub const MAX_SHEET_SIZE: u32 = 2048;

/// The default packer: shelf packing with a maximum sheet dimension,
/// overflowing into additional `-0`, `-1`, ... suffixed sheets.
#[derive(Debug, Default)]
pub struct MultiSheetPacker;

impl Packer for MultiSheetPacker {
    fn name(&self) -> &'static str {
        "multi-sheet"
    }

    fn pack(&self, group: &str, textures: &[Texture]) -> Result<PackResult, PackerError> {
        if textures.is_empty() {
            return Err(PackerError::EmptyGroup(group.to_string()));
        }

        let frames = decode_textures(textures)?;
        for frame in &frames {
            if frame.image.width() > MAX_SHEET_SIZE || frame.image.height() > MAX_SHEET_SIZE {
                return Err(PackerError::FrameTooLarge {
                    frame: frame.path.clone(),
                    width: frame.image.width(),
                    height: frame.image.height(),
                    max: MAX_SHEET_SIZE,
                });
            }
        }

        let sizes: Vec<(u32, u32)> = frames
            .iter()
            .map(|f| (f.image.width(), f.image.height()))
            .collect();
        let sheets = pack_shelves(&sizes, MAX_SHEET_SIZE, Some(MAX_SHEET_SIZE));

        build_result(group, &frames, &sheets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests_support::png_texture;

    #[test]
    fn small_group_packs_into_one_sheet_named_after_group() {
        let textures = vec![
            png_texture("hud/a", 8, 8),
            png_texture("hud/b", 4, 4),
            png_texture("hud/c", 2, 6),
        ];
        let result = MultiSheetPacker.pack("hud", &textures).unwrap();
        assert_eq!(result.images.len(), 1);
        assert_eq!(result.images[0].name, "hud");
        assert_eq!(result.frames.len(), 3);
        assert!(result.frames.values().all(|f| f.sheet_index == 0));
    }

    #[test]
    fn oversized_group_splits_into_suffixed_sheets() {
        // Three 1100px-tall frames cannot share a 2048px sheet column-wise,
        // and 1100 + 1100 > 2048 forces a second sheet.
        let textures = vec![
            png_texture("bg/a", 2000, 1100),
            png_texture("bg/b", 2000, 1100),
            png_texture("bg/c", 2000, 1100),
        ];
        let result = MultiSheetPacker.pack("bg", &textures).unwrap();
        assert!(result.images.len() > 1);
        assert_eq!(result.images[0].name, "bg-0");
        assert_eq!(result.images[1].name, "bg-1");

        // Every frame's sheet_index addresses a real sheet.
        for frame in result.frames.values() {
            assert!(frame.sheet_index < result.images.len());
        }
    }

    #[test]
    fn frame_exceeding_cap_is_rejected() {
        let textures = vec![png_texture("bg/huge", 3000, 4)];
        let err = MultiSheetPacker.pack("bg", &textures).unwrap_err();
        assert!(matches!(err, PackerError::FrameTooLarge { width: 3000, .. }));
    }

    #[test]
    fn empty_group_is_rejected() {
        let err = MultiSheetPacker.pack("hud", &[]).unwrap_err();
        assert!(matches!(err, PackerError::EmptyGroup(_)));
    }

    #[test]
    fn identical_inputs_produce_identical_bytes() {
        let textures = vec![png_texture("hud/a", 8, 8), png_texture("hud/b", 4, 4)];
        let first = MultiSheetPacker.pack("hud", &textures).unwrap();
        let second = MultiSheetPacker.pack("hud", &textures).unwrap();
        assert_eq!(first, second);
    }
}
