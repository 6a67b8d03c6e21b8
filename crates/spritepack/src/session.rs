//! The per-generation build session.
//!
//! A [`BuildSession`] owns every piece of packing state for one build
//! generation: the texture registry, the completion broadcaster, the pack
//! task coordinator, and the cache handle. Hosts construct one session at
//! generation start, call [`BuildSession::announce_expected`] once per
//! resource during the discovery pass and [`BuildSession::resolve`] once per
//! resource when its content is available, and drop the session at
//! generation end. Nothing is process-global, so state cannot leak between
//! generations.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use log::info;
use serde_json::Value;
use spritepack_core::{content_digest, PackResult, ResourceInfo, SpriteModule, SpritePackError};
use spritepack_packer::{packer_for, PackerAlgorithm};

use crate::broadcast::CompletionBroadcaster;
use crate::cache::SheetCache;
use crate::config::{OptimizationHook, SessionConfig};
use crate::coordinator::{PackTaskCoordinator, PackTaskError};
use crate::emit::{emit_images, AssetEmitter, FsEmitter};
use crate::registry::TextureRegistry;
use crate::rewrite::rewrite;

/// Everything one group's pack task produces: the pack result plus the
/// emitted pathname per sheet.
#[derive(Debug, Clone)]
pub struct PackOutput {
    pub result: PackResult,
    /// Sheet `name + extension` -> emitted pathname.
    pub paths: BTreeMap<String, String>,
}

/// One build generation's packing pipeline.
pub struct BuildSession {
    config: SessionConfig,
    registry: Arc<TextureRegistry>,
    broadcaster: Arc<CompletionBroadcaster>,
    coordinator: PackTaskCoordinator<PackOutput>,
    cache: Arc<SheetCache>,
    emitter: Arc<dyn AssetEmitter>,
}

impl BuildSession {
    pub fn new(config: SessionConfig, emitter: Arc<dyn AssetEmitter>) -> Self {
        let cache = SheetCache::new(config.cache_dir.as_deref(), config.packer.as_str());
        let registry = TextureRegistry::new(config.key_prefixes.clone());
        Self {
            registry: Arc::new(registry),
            broadcaster: Arc::new(CompletionBroadcaster::new()),
            coordinator: PackTaskCoordinator::new(),
            cache: Arc::new(cache),
            emitter,
            config,
        }
    }

    /// Session writing sheets to `assets_dir` on the local filesystem.
    pub fn with_assets_dir(config: SessionConfig, assets_dir: impl Into<PathBuf>) -> Self {
        Self::new(config, Arc::new(FsEmitter::new(assets_dir)))
    }

    /// The session's registry, for host integrations that need to inspect
    /// group state.
    pub fn registry(&self) -> &TextureRegistry {
        &self.registry
    }

    /// Discovery hook: record that a resource exists, before its content is
    /// available. Called once per resource during an early pass over the
    /// module graph.
    pub fn announce_expected(
        &self,
        resource_path: &str,
        root_context: &str,
    ) -> Result<(), SpritePackError> {
        self.registry.announce_expected(resource_path, root_context)
    }

    /// Resolve hook: record a resource's content and return the sprite
    /// module to substitute for it.
    ///
    /// Suspends until the resource's whole group has arrived and been
    /// packed. The group's pack work runs once no matter how many resources
    /// resolve concurrently; failures propagate to every resolver of the
    /// group.
    pub async fn resolve(
        &self,
        resource_path: &str,
        root_context: &str,
        contents: Vec<u8>,
    ) -> Result<SpriteModule> {
        let info = ResourceInfo::parse(resource_path, root_context, &self.config.key_prefixes)
            .ok_or_else(|| SpritePackError::PathParse {
                path: resource_path.to_string(),
            })?;
        let key = info.key.clone();

        let handle = self.coordinator.get_or_start(&key, || {
            let task = PackTask {
                key: key.clone(),
                group: info.group.clone(),
                registry: Arc::clone(&self.registry),
                broadcaster: Arc::clone(&self.broadcaster),
                cache: Arc::clone(&self.cache),
                emitter: Arc::clone(&self.emitter),
                digest_config: self.config.digest_value(),
                algorithm: self.config.packer,
                optimization: self.config.optimization.clone(),
            };
            async move { task.run().await.map_err(PackTaskError::from) }
        });

        // Grace period: the host may cap how many units are in flight, so
        // later units might not even have been discovered yet. Completeness
        // is still decided by the registry's set equality, never by time.
        tokio::time::sleep(self.config.wait_for).await;

        if self
            .registry
            .announce_arrived(resource_path, root_context, contents)?
        {
            self.broadcaster.announce(&key);
        }

        let output = handle.await;

        // Evict on success and failure alike: a later resolve for this key
        // must start a fresh pack, never replay a settled result.
        self.coordinator.finish(&key);

        let output = output.with_context(|| format!("pack task for group '{key}' failed"))?;

        Ok(rewrite(
            &info,
            &key,
            &output.result,
            &output.paths,
            self.config.scale_factor,
        )?)
    }
}

impl std::fmt::Debug for BuildSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildSession")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Owned inputs for one group's pack task; detached from the session so the
/// future is `'static` and shareable through the coordinator.
struct PackTask {
    key: String,
    group: String,
    registry: Arc<TextureRegistry>,
    broadcaster: Arc<CompletionBroadcaster>,
    cache: Arc<SheetCache>,
    emitter: Arc<dyn AssetEmitter>,
    digest_config: Value,
    algorithm: PackerAlgorithm,
    optimization: Option<OptimizationHook>,
}

impl PackTask {
    async fn run(self) -> Result<PackOutput> {
        self.broadcaster
            .wait_until(&self.key, || self.registry.is_complete(&self.key))
            .await;
        let started = Instant::now();

        let textures = self.registry.snapshot(&self.key)?;
        let digest = content_digest(&self.digest_config, &textures);

        let packed = match self.cache.get(&self.key, &digest) {
            Some(result) => result,
            None => {
                let mut result = packer_for(self.algorithm)
                    .pack(&self.group, &textures)
                    .with_context(|| format!("packing group '{}' failed", self.key))?;
                if let Some(hook) = &self.optimization {
                    result.images =
                        hook(std::mem::take(&mut result.images)).context("optimization hook failed")?;
                }
                self.cache.put(&self.key, &digest, &result)?;
                result
            }
        };

        let paths = emit_images(self.emitter.as_ref(), &packed.images)?;

        info!(
            "{}: packed {} textures into {} sheet(s) in {}ms",
            self.key,
            textures.len(),
            packed.images.len(),
            started.elapsed().as_millis()
        );

        Ok(PackOutput {
            result: packed,
            paths,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unparsable_path_is_a_recoverable_resolve_error() {
        let session = BuildSession::with_assets_dir(SessionConfig::default(), "/tmp/unused");
        let err = session
            .resolve("not-a-resource", "/r", b"x".to_vec())
            .await
            .unwrap_err();

        let parse = err.downcast_ref::<SpritePackError>().unwrap();
        assert!(parse.is_recoverable());
    }

    #[test]
    fn collision_surfaces_through_the_session() {
        let session = BuildSession::with_assets_dir(SessionConfig::default(), "/tmp/unused");
        session
            .announce_expected("/r/src/pc/main/a.png", "/r")
            .unwrap();
        let err = session
            .announce_expected("/r/src/other/pc/main/b.png", "/r")
            .unwrap_err();
        assert!(matches!(err, SpritePackError::GroupKeyCollision { .. }));
    }
}
