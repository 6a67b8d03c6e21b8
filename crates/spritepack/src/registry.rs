//! Per-generation texture tracking.
//!
//! The registry records, per group key, the set of filenames *expected*
//! (seen during the discovery pass) versus *arrived* (content already read).
//! Set-size equality between the two is the authoritative completeness
//! signal for a group; the session's grace-period delay only tolerates host
//! scheduling limits and never substitutes for this check.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Mutex;

use log::warn;
use spritepack_core::{
    compare_file_names, KeyPrefixes, ResourceInfo, SpritePackError, Texture,
};

#[derive(Debug, Default)]
struct Inner {
    expected: HashMap<String, HashSet<String>>,
    arrived: HashMap<String, HashMap<String, Texture>>,
    dirs: HashMap<String, PathBuf>,
}

/// Tracks expected and arrived textures for every group in one build
/// generation. All state is owned by the session; nothing survives into the
/// next generation.
#[derive(Debug)]
pub struct TextureRegistry {
    prefixes: KeyPrefixes,
    inner: Mutex<Inner>,
}

impl TextureRegistry {
    pub fn new(prefixes: KeyPrefixes) -> Self {
        Self {
            prefixes,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Record that a resource exists, before its content is available.
    ///
    /// Unparsable paths are skipped with a warning; they are not packable
    /// resources. Two different directories resolving to the same group key
    /// is fatal: merging them would corrupt both groups' sheets.
    pub fn announce_expected(
        &self,
        resource_path: &str,
        root_context: &str,
    ) -> Result<(), SpritePackError> {
        let Some(info) = ResourceInfo::parse(resource_path, root_context, &self.prefixes) else {
            warn!("skipping '{resource_path}': not a <group>/<filename>.<ext> path");
            return Ok(());
        };

        let mut inner = self.inner.lock().expect("registry lock poisoned");
        if let Some(first_dir) = inner.dirs.get(&info.key) {
            if *first_dir != info.dirname {
                return Err(SpritePackError::GroupKeyCollision {
                    key: info.key,
                    first_dir: first_dir.clone(),
                    second_dir: info.dirname,
                });
            }
        } else {
            inner.dirs.insert(info.key.clone(), info.dirname.clone());
        }

        inner
            .expected
            .entry(info.key)
            .or_default()
            .insert(info.filename);
        Ok(())
    }

    /// Record a resource's content. Returns true iff the group is now
    /// complete: every expected filename has arrived.
    pub fn announce_arrived(
        &self,
        resource_path: &str,
        root_context: &str,
        contents: Vec<u8>,
    ) -> Result<bool, SpritePackError> {
        let info = ResourceInfo::parse(resource_path, root_context, &self.prefixes).ok_or_else(
            || SpritePackError::PathParse {
                path: resource_path.to_string(),
            },
        )?;

        let mut inner = self.inner.lock().expect("registry lock poisoned");
        let expected = inner
            .expected
            .get(&info.key)
            .map(HashSet::len)
            .ok_or_else(|| SpritePackError::GroupNotFound {
                key: info.key.clone(),
            })?;

        let texture = Texture {
            path: info.frame_name(),
            contents,
        };
        let arrived = inner.arrived.entry(info.key).or_default();
        arrived.insert(info.filename, texture);

        Ok(arrived.len() == expected)
    }

    /// True iff the group has been announced and all expected textures have
    /// arrived.
    pub fn is_complete(&self, key: &str) -> bool {
        let inner = self.inner.lock().expect("registry lock poisoned");
        match inner.expected.get(key) {
            Some(expected) => {
                inner.arrived.get(key).map_or(0, HashMap::len) == expected.len()
            }
            None => false,
        }
    }

    /// All arrived textures for a group, sorted by the ordering policy.
    pub fn snapshot(&self, key: &str) -> Result<Vec<Texture>, SpritePackError> {
        let inner = self.inner.lock().expect("registry lock poisoned");
        let arrived = inner
            .arrived
            .get(key)
            .ok_or_else(|| SpritePackError::GroupNotFound {
                key: key.to_string(),
            })?;

        let mut names: Vec<&String> = arrived.keys().collect();
        names.sort_by(|a, b| compare_file_names(a, b));
        Ok(names
            .into_iter()
            .map(|name| arrived[name].clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> TextureRegistry {
        TextureRegistry::new(KeyPrefixes::default())
    }

    #[test]
    fn completeness_is_exact_set_equality() {
        let reg = registry();
        for name in ["a", "b", "c"] {
            reg.announce_expected(&format!("/r/src/betarea/{name}.png"), "/r")
                .unwrap();
        }

        assert!(!reg.is_complete("betarea"));
        assert!(!reg
            .announce_arrived("/r/src/betarea/a.png", "/r", b"a".to_vec())
            .unwrap());
        assert!(!reg
            .announce_arrived("/r/src/betarea/c.png", "/r", b"c".to_vec())
            .unwrap());
        assert!(!reg.is_complete("betarea"));
        assert!(reg
            .announce_arrived("/r/src/betarea/b.png", "/r", b"b".to_vec())
            .unwrap());
        assert!(reg.is_complete("betarea"));
    }

    #[test]
    fn colliding_directories_fail_loudly() {
        let reg = registry();
        reg.announce_expected("/r/src/pc/main/a.png", "/r").unwrap();
        let err = reg
            .announce_expected("/r/src/other/pc/main/b.png", "/r")
            .unwrap_err();
        assert!(matches!(err, SpritePackError::GroupKeyCollision { .. }));
    }

    #[test]
    fn same_directory_does_not_collide() {
        let reg = registry();
        reg.announce_expected("/r/src/pc/main/a.png", "/r").unwrap();
        reg.announce_expected("/r/src/pc/main/b.png", "/r").unwrap();
    }

    #[test]
    fn unparsable_paths_are_skipped_on_discovery() {
        let reg = registry();
        reg.announce_expected("not-a-resource", "/r").unwrap();
        assert!(!reg.is_complete("not-a-resource"));
    }

    #[test]
    fn arrival_without_discovery_is_an_error() {
        let reg = registry();
        let err = reg
            .announce_arrived("/r/src/betarea/a.png", "/r", b"a".to_vec())
            .unwrap_err();
        assert!(matches!(err, SpritePackError::GroupNotFound { .. }));
    }

    #[test]
    fn duplicate_announcements_do_not_inflate_counts() {
        let reg = registry();
        reg.announce_expected("/r/src/betarea/a.png", "/r").unwrap();
        reg.announce_expected("/r/src/betarea/a.png", "/r").unwrap();
        assert!(reg
            .announce_arrived("/r/src/betarea/a.png", "/r", b"a".to_vec())
            .unwrap());
    }

    #[test]
    fn snapshot_is_sorted_by_ordering_policy() {
        let reg = registry();
        for name in ["img2", "img10", "img1"] {
            reg.announce_expected(&format!("/r/src/anim/{name}.png"), "/r")
                .unwrap();
            reg.announce_arrived(
                &format!("/r/src/anim/{name}.png"),
                "/r",
                name.as_bytes().to_vec(),
            )
            .unwrap();
        }
        let textures = reg.snapshot("anim").unwrap();
        let paths: Vec<&str> = textures.iter().map(|t| t.path.as_str()).collect();
        assert_eq!(paths, vec!["anim/img1", "anim/img2", "anim/img10"]);
    }

    #[test]
    fn snapshot_of_unknown_group_is_an_error() {
        let err = registry().snapshot("ghost").unwrap_err();
        assert!(matches!(err, SpritePackError::GroupNotFound { .. }));
    }
}
