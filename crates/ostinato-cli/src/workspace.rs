//! Project workspace paths.
//!
//! The working directory is threaded explicitly through every command;
//! the process CWD is never mutated.

use ostinato_manifest::{LockfileName, MANIFEST_FILE, Manifest, find_lock_path};
use std::path::{Path, PathBuf};

/// Paths of the project being operated on.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Create a workspace rooted at `dir`.
    pub fn new(dir: &Path) -> Self {
        let root = std::path::absolute(dir).unwrap_or_else(|_| dir.to_path_buf());
        Self { root }
    }

    /// Path of `composer.json`.
    #[must_use]
    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE)
    }

    /// Path of the vendor tree.
    #[must_use]
    pub fn vendor_dir(&self) -> PathBuf {
        self.root.join("vendor")
    }

    /// Load the project manifest.
    pub fn load_manifest(&self) -> anyhow::Result<Manifest> {
        Ok(Manifest::load(&self.manifest_path())?)
    }

    /// The lockfile to read, if any exists.
    #[must_use]
    pub fn existing_lock_path(&self) -> Option<PathBuf> {
        find_lock_path(&self.root)
    }

    /// The lockfile path to write: an existing lockfile keeps its name,
    /// otherwise `name` picks the filename.
    #[must_use]
    pub fn lock_write_path(&self, name: LockfileName) -> PathBuf {
        self.existing_lock_path()
            .unwrap_or_else(|| self.root.join(name.file_name()))
    }
}
