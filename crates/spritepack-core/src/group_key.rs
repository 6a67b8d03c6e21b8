//! Group key resolution from resource paths.
//!
//! Textures under the same directory pack into one sheet set; the directory
//! name becomes the grouping key. Because two roots can contain same-named
//! directories (`/pc/main/` and `/mobile/main/`), the key is optionally
//! prefixed with coarse disambiguator words found along the resource path.
//! The prefix vocabulary is configuration ([`KeyPrefixes`]); the load-bearing
//! contract is the registry's collision detection, not any particular
//! vocabulary.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

/// Matches the `<group>/<filename>.<ext>` tail of a resource path.
fn resource_path_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([^/]+)/([^/]+?)\.(\w+)$").unwrap())
}

/// Vocabulary of path substrings promoted into group key prefixes, with
/// optional normalization (e.g. `desktop` -> `pc`).
#[derive(Debug, Clone)]
pub struct KeyPrefixes {
    words: Vec<String>,
    normalize: Vec<(String, String)>,
}

impl Default for KeyPrefixes {
    fn default() -> Self {
        Self {
            words: [
                "pc",
                "mobile",
                "desktop",
                "portrait",
                "landscape",
                "lazy",
                "shared",
                "common",
                "locales",
            ]
            .iter()
            .map(|s| (*s).to_string())
            .collect(),
            normalize: vec![("desktop".to_string(), "pc".to_string())],
        }
    }
}

impl KeyPrefixes {
    /// A vocabulary with no disambiguator words; keys are the bare group
    /// directory name.
    pub fn none() -> Self {
        Self {
            words: Vec::new(),
            normalize: Vec::new(),
        }
    }

    /// A custom vocabulary without normalization rules.
    pub fn new(words: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            words: words.into_iter().map(Into::into).collect(),
            normalize: Vec::new(),
        }
    }

    /// Collect the vocabulary words occurring in `relative_path`, in order of
    /// appearance, case-insensitively, normalized and deduplicated.
    fn matches_in(&self, relative_path: &str) -> Vec<String> {
        let haystack = relative_path.to_lowercase();
        let mut hits: Vec<(usize, &str)> = Vec::new();
        for word in &self.words {
            for (pos, _) in haystack.match_indices(word.as_str()) {
                hits.push((pos, word.as_str()));
            }
        }
        hits.sort();

        let mut out: Vec<String> = Vec::new();
        for (_, word) in hits {
            let normalized = self
                .normalize
                .iter()
                .find(|(from, _)| from == word)
                .map_or(word, |(_, to)| to.as_str());
            if !out.iter().any(|w| w == normalized) {
                out.push(normalized.to_string());
            }
        }
        out
    }
}

/// Everything derivable from a single resource path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceInfo {
    /// Stable grouping key: disambiguator prefixes + group, joined by `_`.
    pub key: String,
    /// Group (directory) name.
    pub group: String,
    /// Filename without extension.
    pub filename: String,
    /// File extension without the dot.
    pub extension: String,
    /// Directory containing the resource, used for key collision detection.
    pub dirname: PathBuf,
}

impl ResourceInfo {
    /// Parse a resource path into its grouping parts.
    ///
    /// Returns `None` when the path does not match the expected
    /// `<group>/<filename>.<ext>` shape. Pure; referentially transparent for
    /// a given path string.
    ///
    /// `root_context` is stripped before prefix matching so that directories
    /// above the project root (a user's `/Desktop/`, say) cannot leak
    /// vocabulary words into the key.
    pub fn parse(resource_path: &str, root_context: &str, prefixes: &KeyPrefixes) -> Option<Self> {
        let captures = resource_path_regex().captures(resource_path)?;
        let group = captures[1].to_string();
        let filename = captures[2].to_string();
        let extension = captures[3].to_string();

        let relative = resource_path
            .strip_prefix(root_context)
            .unwrap_or(resource_path);

        let mut parts = prefixes.matches_in(relative);
        if !parts.iter().any(|p| p == &group) {
            parts.push(group.clone());
        }

        let dirname = Path::new(resource_path)
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        Some(Self {
            key: parts.join("_"),
            group,
            filename,
            extension,
            dirname,
        })
    }

    /// The `group/filename` key addressing this resource's frame in a
    /// [`crate::PackResult`].
    pub fn frame_name(&self) -> String {
        format!("{}/{}", self.group, self.filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_group_filename_extension() {
        let info = ResourceInfo::parse(
            "/project/src/assets/pc/betarea/FW_PaysBets_5x.png",
            "/project",
            &KeyPrefixes::default(),
        )
        .unwrap();
        assert_eq!(info.group, "betarea");
        assert_eq!(info.filename, "FW_PaysBets_5x");
        assert_eq!(info.extension, "png");
        assert_eq!(info.frame_name(), "betarea/FW_PaysBets_5x");
        assert_eq!(info.key, "pc_betarea");
    }

    #[test]
    fn rejects_paths_without_expected_shape() {
        assert!(ResourceInfo::parse("noextension", "", &KeyPrefixes::default()).is_none());
        assert!(ResourceInfo::parse("file.png", "", &KeyPrefixes::default()).is_none());
    }

    #[test]
    fn same_directory_yields_same_key() {
        let prefixes = KeyPrefixes::default();
        let a = ResourceInfo::parse("/r/src/mobile/main/a.png", "/r", &prefixes).unwrap();
        let b = ResourceInfo::parse("/r/src/mobile/main/b.png", "/r", &prefixes).unwrap();
        assert_eq!(a.key, b.key);
        assert_eq!(a.key, "mobile_main");
    }

    #[test]
    fn prefixes_disambiguate_same_named_groups() {
        let prefixes = KeyPrefixes::default();
        let pc = ResourceInfo::parse("/r/src/pc/main/a.png", "/r", &prefixes).unwrap();
        let mobile = ResourceInfo::parse("/r/src/mobile/main/a.png", "/r", &prefixes).unwrap();
        assert_ne!(pc.key, mobile.key);
    }

    #[test]
    fn desktop_normalizes_to_pc() {
        let info = ResourceInfo::parse(
            "/r/src/desktop/hud/icon.png",
            "/r",
            &KeyPrefixes::default(),
        )
        .unwrap();
        assert_eq!(info.key, "pc_hud");
    }

    #[test]
    fn root_context_is_excluded_from_prefix_matching() {
        // "Desktop" in the root must not contribute a prefix.
        let info = ResourceInfo::parse(
            "/home/me/Desktop/proj/src/betarea/a.png",
            "/home/me/Desktop/proj",
            &KeyPrefixes::default(),
        )
        .unwrap();
        assert_eq!(info.key, "betarea");
    }

    #[test]
    fn duplicate_prefix_words_collapse() {
        let info = ResourceInfo::parse(
            "/r/src/pc/common/pc/hud/icon.png",
            "/r",
            &KeyPrefixes::default(),
        )
        .unwrap();
        assert_eq!(info.key, "pc_common_hud");
    }

    #[test]
    fn empty_vocabulary_uses_bare_group() {
        let info =
            ResourceInfo::parse("/r/src/pc/hud/icon.png", "/r", &KeyPrefixes::none()).unwrap();
        assert_eq!(info.key, "hud");
    }
}
