//! Manifest, lockfile, and registry payload models for ostinato.
//!
//! Everything the Packagist ecosystem serializes is modeled here with
//! tolerant decoding: the public registry emits heterogeneous shapes
//! (maps that arrive as empty arrays, `dist` as a bare URL string in
//! historical records, `autoload` as a string when empty), and a decode
//! failure on one package must never abort a whole run.
//!
//! Serialization is deterministic: maps are `BTreeMap`-backed and the
//! pretty printer uses a fixed 4-space indent, so two runs over the same
//! inputs produce byte-identical documents.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod hash;
pub mod json;
pub mod lock;
pub mod manifest;
pub mod registry;
pub mod types;

pub use error::{LockError, ManifestError};
pub use hash::content_hash;
pub use json::to_json_pretty;
pub use lock::{
    ALTERNATE_LOCKFILE, CANONICAL_LOCKFILE, LockedPackage, Lockfile, LockfileName, find_lock_path,
};
pub use manifest::{MANIFEST_FILE, Manifest};
pub use registry::{PackageDocument, VersionMetadata};
pub use types::{Author, AutoloadConfig, DistInfo, SourceInfo};
