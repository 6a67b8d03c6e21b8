//! Sprite packing core library.
//!
//! This crate provides the data model and pure algorithms shared by the
//! sprite packing pipeline: resource path parsing into group keys,
//! deterministic filename ordering, and canonical content hashing for cache
//! keys. It performs no I/O and holds no build state; see the `spritepack`
//! crate for the session pipeline and `spritepack-packer` for the packing
//! algorithms.
//!
//! # Modules
//!
//! - [`error`]: error taxonomy for group tracking and rewriting
//! - [`group_key`]: resource path -> group key resolution
//! - [`hash`]: canonical JSON and content digests
//! - [`ordering`]: deterministic filename comparison
//! - [`sprite`]: texture, frame, sheet, and module types

pub mod error;
pub mod group_key;
pub mod hash;
pub mod ordering;
pub mod sprite;

// Re-export commonly used types at the crate root
pub use error::SpritePackError;
pub use group_key::{KeyPrefixes, ResourceInfo};
pub use hash::{blake3_hex, canonicalize_json, content_digest};
pub use ordering::{compare_file_names, sort_file_names};
pub use sprite::{PackResult, SpriteData, SpriteImage, SpriteModule, Texture};
