//! Session configuration.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use spritepack_core::{KeyPrefixes, SpriteImage};
use spritepack_packer::PackerAlgorithm;

/// Post-processing applied to packer output before caching, e.g. lossy
/// recompression or generating a `webp` source set.
pub type OptimizationHook =
    Arc<dyn Fn(Vec<SpriteImage>) -> anyhow::Result<Vec<SpriteImage>> + Send + Sync>;

/// Options recognized by a [`crate::BuildSession`].
#[derive(Clone)]
pub struct SessionConfig {
    /// Which built-in packing algorithm to use.
    pub packer: PackerAlgorithm,
    /// Recorded into every emitted module for display-scale correction
    /// (0.5 when source art is authored at double size).
    pub scale_factor: f64,
    /// Grace period absorbing host-scheduler limits on concurrent
    /// compilation units. Tunable, not a correctness mechanism: completeness
    /// is always re-validated against the expected/arrived sets.
    pub wait_for: Duration,
    /// Root of the persistent cache. `None` disables caching entirely.
    pub cache_dir: Option<PathBuf>,
    /// Vocabulary of path substrings promoted into group key prefixes.
    pub key_prefixes: KeyPrefixes,
    /// Optional hook applied to packer output before caching.
    pub optimization: Option<OptimizationHook>,
    /// Cache-key stand-in for the hook: closures cannot be hashed, so hosts
    /// must change this tag when the hook's behavior changes.
    pub optimization_tag: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            packer: PackerAlgorithm::default(),
            scale_factor: 1.0,
            wait_for: Duration::from_millis(1000),
            cache_dir: None,
            key_prefixes: KeyPrefixes::default(),
            optimization: None,
            optimization_tag: String::new(),
        }
    }
}

impl SessionConfig {
    /// The configuration slice that participates in the content digest.
    ///
    /// Scale factor is excluded: it only annotates emitted modules and does
    /// not affect packed pixels.
    pub(crate) fn digest_value(&self) -> Value {
        json!({
            "packer": self.packer.as_str(),
            "optimization": self.optimization_tag,
        })
    }
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("packer", &self.packer)
            .field("scale_factor", &self.scale_factor)
            .field("wait_for", &self.wait_for)
            .field("cache_dir", &self.cache_dir)
            .field("key_prefixes", &self.key_prefixes)
            .field("optimization", &self.optimization.as_ref().map(|_| "<hook>"))
            .field("optimization_tag", &self.optimization_tag)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_value_tracks_packer_and_tag() {
        let config = SessionConfig::default();
        let mut other = SessionConfig::default();
        other.packer = PackerAlgorithm::SingleSheet;
        assert_ne!(config.digest_value(), other.digest_value());

        let mut tagged = SessionConfig::default();
        tagged.optimization_tag = "webp-v2".to_string();
        assert_ne!(config.digest_value(), tagged.digest_value());
    }

    #[test]
    fn digest_value_ignores_scale_factor() {
        let config = SessionConfig::default();
        let mut scaled = SessionConfig::default();
        scaled.scale_factor = 0.5;
        assert_eq!(config.digest_value(), scaled.digest_value());
    }
}
