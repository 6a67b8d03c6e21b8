//! Error taxonomy for sprite packing.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by group tracking and module rewriting.
///
/// Recoverability follows a fixed policy: [`SpritePackError::PathParse`] is
/// skipped by callers (the resource simply is not packed), while the
/// remaining variants are hard failures. A group key collision would merge
/// unrelated directories into one sheet set; the lookup failures indicate an
/// internal sequencing bug and must never be papered over with defaults.
#[derive(Debug, Error)]
pub enum SpritePackError {
    /// The resource path does not match the `<group>/<filename>.<ext>` shape.
    #[error("cannot derive sprite group data from path '{path}'")]
    PathParse {
        /// Offending resource path.
        path: String,
    },

    /// Two distinct source directories resolved to the same group key.
    #[error(
        "directories '{first_dir}' and '{second_dir}' both resolve to group key '{key}'; \
         rename one of them or extend the key prefix vocabulary"
    )]
    GroupKeyCollision {
        /// The colliding key.
        key: String,
        /// Directory first registered under the key.
        first_dir: PathBuf,
        /// Directory that collided with it.
        second_dir: PathBuf,
    },

    /// A group key was queried that was never announced to the registry.
    #[error("group '{key}' not found in the texture registry")]
    GroupNotFound {
        /// The missing key.
        key: String,
    },

    /// A resource's frame is missing from its group's pack output.
    #[error("frame '{frame}' not found in pack output for group '{key}'")]
    FrameNotFound {
        /// The `group/filename` frame key.
        frame: String,
        /// The group key whose output was searched.
        key: String,
    },

    /// A frame references a sheet index outside the pack output.
    #[error("sheet index {index} for frame '{frame}' is out of range ({count} sheets)")]
    SheetNotFound {
        /// The `group/filename` frame key.
        frame: String,
        /// The out-of-range index.
        index: usize,
        /// Number of sheets the pack produced.
        count: usize,
    },

    /// The emitted-path map is missing a sheet the pack output references.
    #[error("no emitted path recorded for sheet '{sheet}'")]
    SheetPathMissing {
        /// The sheet's `name + extension` path key.
        sheet: String,
    },
}

impl SpritePackError {
    /// True for conditions callers recover from by skipping the resource.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SpritePackError::PathParse { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collision_message_names_both_directories() {
        let err = SpritePackError::GroupKeyCollision {
            key: "pc_main".to_string(),
            first_dir: PathBuf::from("/r/src/pc/main"),
            second_dir: PathBuf::from("/r/src/shared/pc/main"),
        };
        let message = err.to_string();
        assert!(message.contains("/r/src/pc/main"));
        assert!(message.contains("/r/src/shared/pc/main"));
        assert!(message.contains("pc_main"));
    }

    #[test]
    fn only_path_parse_is_recoverable() {
        assert!(SpritePackError::PathParse {
            path: "x".to_string()
        }
        .is_recoverable());
        assert!(!SpritePackError::GroupNotFound {
            key: "k".to_string()
        }
        .is_recoverable());
    }
}
