//! Sprite sheet packing algorithms.
//!
//! A packer is a pure function from an ordered set of textures to one or
//! more composite sheet images plus a frame map locating every input within
//! them. The pipeline selects an implementation once, at configuration time,
//! through [`packer_for`]; nothing else branches on packer identity.
//!
//! Two implementations are built in:
//!
//! - [`MultiSheetPacker`] (default): caps sheet dimensions and splits
//!   overflowing groups across several sheets
//! - [`SingleSheetPacker`]: always emits exactly one sheet, however large
//!
//! Both are deterministic: identical inputs in identical order produce
//! byte-identical output, which the content-addressed cache relies on.

pub mod png;
pub mod shelf;

mod frames;
mod multi_sheet;
mod single_sheet;

#[cfg(test)]
pub(crate) mod tests_support;

use serde::{Deserialize, Serialize};
use spritepack_core::{PackResult, Texture};
use thiserror::Error;

pub use multi_sheet::{MultiSheetPacker, MAX_SHEET_SIZE};
pub use png::PngError;
pub use single_sheet::SingleSheetPacker;

/// Errors from packing a group's textures.
#[derive(Debug, Error)]
pub enum PackerError {
    /// The group resolved to an empty texture set.
    #[error("group '{0}' has no textures to pack")]
    EmptyGroup(String),

    /// An input texture could not be decoded.
    #[error("cannot decode texture '{frame}': {source}")]
    Decode {
        /// Frame key of the unreadable texture.
        frame: String,
        #[source]
        source: image::ImageError,
    },

    /// An input texture exceeds the maximum sheet dimension.
    #[error("texture '{frame}' ({width}x{height}) exceeds the maximum sheet size {max}x{max}")]
    FrameTooLarge {
        /// Frame key of the oversized texture.
        frame: String,
        width: u32,
        height: u32,
        max: u32,
    },

    /// Sheet encoding failed.
    #[error("PNG encoding error: {0}")]
    Png(#[from] PngError),
}

/// A pluggable packing algorithm.
///
/// Implementations must be deterministic with respect to input order; the
/// caller hands textures pre-sorted by the ordering policy.
pub trait Packer: Send + Sync {
    /// Stable algorithm name, used to namespace the on-disk cache.
    fn name(&self) -> &'static str;

    /// Pack `textures` into sheets, keying frames by `group/filename`.
    fn pack(&self, group: &str, textures: &[Texture]) -> Result<PackResult, PackerError>;
}

/// Which built-in packer a session uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PackerAlgorithm {
    /// Sheet-size-capped packing that may split a group ([`MultiSheetPacker`]).
    #[default]
    MultiSheet,
    /// Single-sheet packing ([`SingleSheetPacker`]).
    SingleSheet,
}

impl PackerAlgorithm {
    /// Stable name, matching [`Packer::name`] of the selected implementation.
    pub fn as_str(self) -> &'static str {
        match self {
            PackerAlgorithm::MultiSheet => "multi-sheet",
            PackerAlgorithm::SingleSheet => "single-sheet",
        }
    }
}

impl std::fmt::Display for PackerAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Select the packer implementation for an algorithm.
pub fn packer_for(algorithm: PackerAlgorithm) -> &'static dyn Packer {
    match algorithm {
        PackerAlgorithm::MultiSheet => &MultiSheetPacker,
        PackerAlgorithm::SingleSheet => &SingleSheetPacker,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algorithm_names_match_selected_packers() {
        assert_eq!(
            packer_for(PackerAlgorithm::MultiSheet).name(),
            PackerAlgorithm::MultiSheet.as_str()
        );
        assert_eq!(
            packer_for(PackerAlgorithm::SingleSheet).name(),
            PackerAlgorithm::SingleSheet.as_str()
        );
    }

    #[test]
    fn algorithm_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&PackerAlgorithm::MultiSheet).unwrap(),
            "\"multi-sheet\""
        );
        let parsed: PackerAlgorithm = serde_json::from_str("\"single-sheet\"").unwrap();
        assert_eq!(parsed, PackerAlgorithm::SingleSheet);
    }

    #[test]
    fn default_algorithm_is_multi_sheet() {
        assert_eq!(PackerAlgorithm::default(), PackerAlgorithm::MultiSheet);
    }
}
