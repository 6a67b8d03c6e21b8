//! Sprite sheet data model.
//!
//! These types describe the output of packing a group of individually
//! authored textures into one or more composite sheets:
//!
//! - [`Texture`]: one original resource (frame key + raw bytes)
//! - [`SpriteData`]: the rectangle locating one texture inside a sheet
//! - [`SpriteImage`]: one packed sheet, with optional alternate encodings
//! - [`PackResult`]: everything a group's pack produced
//! - [`SpriteModule`]: the record substituted for an original resource
//!
//! All serialized field names are camelCase because the emitted records are
//! consumed as JSON by downstream presentation code.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One original image resource, immutable once read.
///
/// `path` is the frame key (`group/filename`, extension stripped) under which
/// the packer reports this texture's placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    /// Frame key: `group/filename` without the file extension.
    pub path: String,
    /// Raw file contents.
    pub contents: Vec<u8>,
}

/// Placement of one original texture within a packed sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpriteData {
    /// Original texture name (filename without extension).
    pub name: String,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// X offset within the sheet.
    pub x: u32,
    /// Y offset within the sheet.
    pub y: u32,
    /// Index into [`PackResult::images`] identifying the sheet holding this
    /// frame. Disambiguates when a group's output spans multiple sheets.
    #[serde(default)]
    pub sheet_index: usize,
}

/// One packed composite sheet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpriteImage {
    /// Sheet name. Multi-sheet output suffixes `-0`, `-1`, ...
    pub name: String,
    /// File extension including the leading dot (e.g. `.png`).
    pub extension: String,
    /// Sheet width in pixels.
    pub width: u32,
    /// Sheet height in pixels.
    pub height: u32,
    /// Encoded image bytes.
    pub content: Vec<u8>,
    /// Alternate encodings of the same sheet (e.g. a `webp` variant), keyed
    /// by variant name. Recursively shaped like the sheet itself.
    pub source_set: BTreeMap<String, SpriteImage>,
}

impl SpriteImage {
    /// The `name + extension` key used to address this sheet in emitted-path
    /// maps.
    pub fn path_key(&self) -> String {
        format!("{}{}", self.name, self.extension)
    }
}

/// The complete output of packing one group, shared by every resource in it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PackResult {
    /// Frame placements keyed by `group/filename`.
    pub frames: BTreeMap<String, SpriteData>,
    /// Packed sheets in deterministic order; [`SpriteData::sheet_index`]
    /// indexes into this sequence.
    pub images: Vec<SpriteImage>,
}

/// The rewritten record substituted for an original resource reference.
///
/// Combines the frame placement with metadata about the sheet it lives in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpriteModule {
    /// Original texture name (filename without extension).
    pub name: String,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// X offset within the sheet.
    pub x: u32,
    /// Y offset within the sheet.
    pub y: u32,
    /// Sheet index within the group's pack output.
    pub sheet_index: usize,
    /// Group key this resource was packed under.
    pub key: String,
    /// URL of the emitted sheet. Starts with a placeholder the host build
    /// substitutes with the deployed public path at final emission.
    pub source: String,
    /// Group (directory) name.
    pub group: String,
    /// Frame key (`group/filename`) used to look this module up.
    pub frame_name: String,
    /// Name of the sheet holding this frame.
    pub sprite_name: String,
    /// Full sheet width in pixels.
    pub sprite_width: u32,
    /// Full sheet height in pixels.
    pub sprite_height: u32,
    /// Display-scale correction factor recorded from configuration.
    pub scale_factor: f64,
    /// Modules for each alternate encoding of the sheet.
    pub source_set: BTreeMap<String, SpriteModule>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sprite_data_serializes_camel_case() {
        let data = SpriteData {
            name: "coin".to_string(),
            width: 32,
            height: 16,
            x: 4,
            y: 8,
            sheet_index: 2,
        };
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["sheetIndex"], 2);
        assert_eq!(json["name"], "coin");
    }

    #[test]
    fn sprite_data_sheet_index_defaults_to_zero() {
        let json = r#"{"name":"coin","width":1,"height":1,"x":0,"y":0}"#;
        let data: SpriteData = serde_json::from_str(json).unwrap();
        assert_eq!(data.sheet_index, 0);
    }

    #[test]
    fn sprite_image_path_key_joins_name_and_extension() {
        let image = SpriteImage {
            name: "betarea-0".to_string(),
            extension: ".png".to_string(),
            ..Default::default()
        };
        assert_eq!(image.path_key(), "betarea-0.png");
    }
}
