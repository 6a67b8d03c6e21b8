//! Sprite sheet packing pipeline for asynchronous builds.
//!
//! Many independent compilation units discover and resolve image resources
//! out of order; this crate accumulates them per group, decides exactly when
//! a group is complete, packs each complete group at most once per build
//! generation, caches packed output by content, and rewrites every original
//! resource into a lookup record pointing into its packed sheet.
//!
//! The entry point is [`BuildSession`]: one per build generation, owning all
//! mutable state. Host integrations call
//! [`announce_expected`](BuildSession::announce_expected) during an early
//! discovery pass and [`resolve`](BuildSession::resolve) when each
//! resource's content is read; `resolve` suspends until the whole group has
//! arrived and been packed, then returns the resource's
//! [`SpriteModule`](spritepack_core::SpriteModule).
//!
//! # Modules
//!
//! - [`broadcast`]: per-key completion notification
//! - [`cache`]: content-addressed persistence of pack results
//! - [`config`]: session options
//! - [`coordinator`]: at-most-one pack task per group key
//! - [`emit`]: sheet emission into the host's asset output
//! - [`registry`]: expected/arrived texture tracking per group
//! - [`rewrite`]: module composition from pack output
//! - [`session`]: the build session tying everything together

pub mod broadcast;
pub mod cache;
pub mod config;
pub mod coordinator;
pub mod emit;
pub mod registry;
pub mod rewrite;
pub mod session;

// Re-export commonly used types at the crate root
pub use broadcast::CompletionBroadcaster;
pub use cache::SheetCache;
pub use config::{OptimizationHook, SessionConfig};
pub use coordinator::{PackTaskCoordinator, PackTaskError};
pub use emit::{AssetEmitter, FsEmitter, PUBLIC_PATH_PLACEHOLDER};
pub use registry::TextureRegistry;
pub use rewrite::rewrite;
pub use session::{BuildSession, PackOutput};

pub use spritepack_core::{
    KeyPrefixes, PackResult, ResourceInfo, SpriteData, SpriteImage, SpriteModule, SpritePackError,
    Texture,
};
pub use spritepack_packer::{Packer, PackerAlgorithm, PackerError};
