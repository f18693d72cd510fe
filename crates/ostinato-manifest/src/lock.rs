//! Lockfile model and on-disk naming policy.
//!
//! Two filenames are recognized. `composer.lock` is the canonical name of
//! the wider ecosystem; `ostinato.lock` is this tool's own. Because our
//! content hash is not byte-compatible with the canonical tool, fresh
//! resolves write `ostinato.lock` by default so a canonical lockfile is
//! never clobbered, and reads prefer `ostinato.lock` when both exist.

use crate::error::LockError;
use crate::json::{lenient_flag_map, lenient_funding, lenient_string_list, lenient_string_map,
    to_json_pretty};
use crate::types::{Author, AutoloadConfig, DistInfo, SourceInfo, lenient_autoload, lenient_dist};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Canonical ecosystem lockfile name.
pub const CANONICAL_LOCKFILE: &str = "composer.lock";

/// This tool's lockfile name.
pub const ALTERNATE_LOCKFILE: &str = "ostinato.lock";

const LOCK_README: [&str; 3] = [
    "This file locks the dependencies of your project to a known state",
    "Read more about it at https://getcomposer.org/doc/01-basic-usage.md#installing-dependencies",
    "This file is @generated automatically",
];

/// Which lockfile name to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockfileName {
    /// `ostinato.lock` (default for fresh resolves).
    #[default]
    Alternate,
    /// `composer.lock`.
    Canonical,
}

impl LockfileName {
    /// The filename for this choice.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Alternate => ALTERNATE_LOCKFILE,
            Self::Canonical => CANONICAL_LOCKFILE,
        }
    }
}

/// Locate the lockfile to read in `dir`, preferring the alternate name.
#[must_use]
pub fn find_lock_path(dir: &Path) -> Option<PathBuf> {
    for name in [ALTERNATE_LOCKFILE, CANONICAL_LOCKFILE] {
        let candidate = dir.join(name);
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    None
}

/// The lockfile document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lockfile {
    /// Usage banner.
    #[serde(
        rename = "_readme",
        default,
        deserialize_with = "lenient_string_list"
    )]
    pub readme: Vec<String>,

    /// Fingerprint of the manifest's require sets.
    #[serde(rename = "content-hash", default)]
    pub content_hash: String,

    /// Locked production packages, sorted by name.
    #[serde(default)]
    pub packages: Vec<LockedPackage>,

    /// Locked dev packages, sorted by name.
    #[serde(rename = "packages-dev", default)]
    pub packages_dev: Vec<LockedPackage>,

    /// Package aliases (registry echo).
    #[serde(default)]
    pub aliases: Vec<Value>,

    /// Minimum stability setting.
    #[serde(rename = "minimum-stability", default = "default_stability")]
    pub minimum_stability: String,

    /// Per-package stability flags.
    #[serde(
        rename = "stability-flags",
        default,
        deserialize_with = "lenient_flag_map"
    )]
    pub stability_flags: BTreeMap<String, u8>,

    /// Prefer stable versions.
    #[serde(rename = "prefer-stable", default)]
    pub prefer_stable: bool,

    /// Prefer lowest versions.
    #[serde(rename = "prefer-lowest", default)]
    pub prefer_lowest: bool,

    /// Platform requirements.
    #[serde(default, deserialize_with = "lenient_string_map")]
    pub platform: BTreeMap<String, String>,

    /// Dev platform requirements.
    #[serde(
        rename = "platform-dev",
        default,
        deserialize_with = "lenient_string_map"
    )]
    pub platform_dev: BTreeMap<String, String>,

    /// Plugin API version.
    #[serde(rename = "plugin-api-version", default = "default_plugin_api")]
    pub plugin_api_version: String,
}

fn default_stability() -> String {
    "stable".to_string()
}

fn default_plugin_api() -> String {
    "2.6.0".to_string()
}

impl Lockfile {
    /// Create a fresh lockfile with the banner and given content hash.
    #[must_use]
    pub fn new(content_hash: impl Into<String>) -> Self {
        Self {
            readme: LOCK_README.iter().map(ToString::to_string).collect(),
            content_hash: content_hash.into(),
            packages: Vec::new(),
            packages_dev: Vec::new(),
            aliases: Vec::new(),
            minimum_stability: default_stability(),
            stability_flags: BTreeMap::new(),
            prefer_stable: false,
            prefer_lowest: false,
            platform: BTreeMap::new(),
            platform_dev: BTreeMap::new(),
            plugin_api_version: default_plugin_api(),
        }
    }

    /// Load a lockfile from disk.
    ///
    /// # Errors
    ///
    /// [`LockError::Decode`] on read or parse failure.
    pub fn load(path: &Path) -> Result<Self, LockError> {
        let decode_err = |message: String| LockError::Decode {
            path: path.to_path_buf(),
            message,
        };
        let data = fs::read(path).map_err(|e| decode_err(e.to_string()))?;
        sonic_rs::from_slice(&data).map_err(|e| decode_err(e.to_string()))
    }

    /// Save the lockfile as indented JSON, injecting the banner when the
    /// document has none yet.
    ///
    /// # Errors
    ///
    /// [`LockError::Write`] on serialization or I/O failure.
    pub fn save(&mut self, path: &Path) -> Result<(), LockError> {
        if self.readme.is_empty() {
            self.readme = LOCK_README.iter().map(ToString::to_string).collect();
        }
        let write_err = |message: String| LockError::Write {
            path: path.to_path_buf(),
            message,
        };
        let mut body = to_json_pretty(self).map_err(|e| write_err(e.to_string()))?;
        body.push('\n');
        fs::write(path, body).map_err(|e| write_err(e.to_string()))
    }

    /// All locked packages, optionally including the dev set.
    #[must_use]
    pub fn all_packages(&self, include_dev: bool) -> Vec<&LockedPackage> {
        let mut all: Vec<&LockedPackage> = self.packages.iter().collect();
        if include_dev {
            all.extend(self.packages_dev.iter());
        }
        all
    }

    /// Whether the resolved set contains `name` (main or dev).
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.packages.iter().chain(&self.packages_dev).any(|p| p.name == name)
    }
}

/// Persisted record of one installed package.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LockedPackage {
    /// Package name (`vendor/name`).
    pub name: String,

    /// Locked version string as published.
    pub version: String,

    /// Source repository.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceInfo>,

    /// Distribution archive.
    #[serde(
        default,
        deserialize_with = "lenient_dist",
        skip_serializing_if = "Option::is_none"
    )]
    pub dist: Option<DistInfo>,

    /// Requirements.
    #[serde(
        default,
        deserialize_with = "lenient_string_map",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub require: BTreeMap<String, String>,

    /// Dev requirements.
    #[serde(
        rename = "require-dev",
        default,
        deserialize_with = "lenient_string_map",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub require_dev: BTreeMap<String, String>,

    /// Package type.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub package_type: Option<String>,

    /// Autoload configuration.
    #[serde(
        default,
        deserialize_with = "lenient_autoload",
        skip_serializing_if = "AutoloadConfig::is_empty"
    )]
    pub autoload: AutoloadConfig,

    /// Download notification URL.
    #[serde(
        rename = "notification-url",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub notification_url: Option<String>,

    /// License identifier(s).
    #[serde(
        default,
        deserialize_with = "lenient_string_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub license: Vec<String>,

    /// Authors.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<Author>,

    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Homepage URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,

    /// Keywords.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,

    /// Publication timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,

    /// Support links.
    #[serde(
        default,
        deserialize_with = "lenient_string_map",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub support: BTreeMap<String, String>,

    /// Funding links.
    #[serde(
        default,
        deserialize_with = "lenient_funding",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub funding: Vec<BTreeMap<String, String>>,
}
