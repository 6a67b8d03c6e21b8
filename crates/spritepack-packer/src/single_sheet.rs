//! Packer that always emits exactly one sheet.

use spritepack_core::{PackResult, Texture};

use crate::frames::{build_result, decode_textures};
use crate::shelf::pack_shelves;
use crate::{Packer, PackerError};

/// Packs every frame into a single sheet sized to its contents, regardless
/// of how large that sheet becomes.
#[derive(Debug, Default)]
pub struct SingleSheetPacker;

impl Packer for SingleSheetPacker {
    fn name(&self) -> &'static str {
        "single-sheet"
    }

    fn pack(&self, group: &str, textures: &[Texture]) -> Result<PackResult, PackerError> {
        if textures.is_empty() {
            return Err(PackerError::EmptyGroup(group.to_string()));
        }

        let frames = decode_textures(textures)?;
        let sizes: Vec<(u32, u32)> = frames
            .iter()
            .map(|f| (f.image.width(), f.image.height()))
            .collect();

        // Aim for a roughly square sheet: shelf width near sqrt of the total
        // frame area, but never narrower than the widest frame.
        let total_area: u64 = sizes.iter().map(|(w, h)| u64::from(*w) * u64::from(*h)).sum();
        let widest = sizes.iter().map(|(w, _)| *w).max().unwrap_or(1);
        let target = (total_area as f64).sqrt().ceil() as u32;
        let max_width = target.max(widest).max(1);

        let sheets = pack_shelves(&sizes, max_width, None);
        debug_assert_eq!(sheets.len(), 1);

        build_result(group, &frames, &sheets)
    }
}
