//! The `composer.json` manifest model.

use crate::error::ManifestError;
use crate::json::{lenient_string_list, lenient_string_map, to_json_pretty};
use crate::types::{Author, AutoloadConfig, lenient_autoload};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Manifest filename in the working directory.
pub const MANIFEST_FILE: &str = "composer.json";

/// A parsed `composer.json`.
///
/// Decoding is tolerant where the ecosystem is sloppy: `require` maps
/// that arrive as empty arrays, `autoload` as a non-object, PSR values as
/// bare strings. Anything the model does not understand is dropped rather
/// than failing the load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Package name (`vendor/name`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Human description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Package type (`library`, `project`, ...).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub package_type: Option<String>,

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

    /// Production requirements: name to constraint string.
    #[serde(
        default,
        deserialize_with = "lenient_string_map",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub require: BTreeMap<String, String>,

    /// Development requirements.
    #[serde(
        rename = "require-dev",
        default,
        deserialize_with = "lenient_string_map",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub require_dev: BTreeMap<String, String>,

    /// Autoload configuration.
    #[serde(
        default,
        deserialize_with = "lenient_autoload",
        skip_serializing_if = "AutoloadConfig::is_empty"
    )]
    pub autoload: AutoloadConfig,

    /// Dev-only autoload configuration.
    #[serde(
        rename = "autoload-dev",
        default,
        deserialize_with = "lenient_autoload",
        skip_serializing_if = "AutoloadConfig::is_empty"
    )]
    pub autoload_dev: AutoloadConfig,

    /// Extra repositories.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub repositories: Vec<Repository>,

    /// Tool configuration (free-form).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub config: BTreeMap<String, Value>,

    /// Script hooks (free-form; executed by an external collaborator).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub scripts: BTreeMap<String, Value>,

    /// Extra metadata (free-form).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, Value>,
}

/// A configured package repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// Repository type (`composer`, `vcs`, ...).
    #[serde(rename = "type", default)]
    pub repo_type: String,
    /// Repository URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Manifest {
    /// Load a manifest from a file.
    ///
    /// # Errors
    ///
    /// [`ManifestError::Missing`] when the file does not exist,
    /// [`ManifestError::Decode`] on read or parse failure.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let data = fs::read(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ManifestError::Missing {
                    path: path.to_path_buf(),
                }
            } else {
                ManifestError::Decode {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
            }
        })?;
        Self::from_slice(&data).map_err(|message| ManifestError::Decode {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Parse a manifest from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns the decoder message on malformed JSON.
    pub fn from_slice(data: &[u8]) -> Result<Self, String> {
        sonic_rs::from_slice(data).map_err(|e| e.to_string())
    }

    /// Save the manifest as indented JSON.
    ///
    /// # Errors
    ///
    /// [`ManifestError::Write`] on serialization or I/O failure.
    pub fn save(&self, path: &Path) -> Result<(), ManifestError> {
        let write_err = |message: String| ManifestError::Write {
            path: path.to_path_buf(),
            message,
        };
        let mut body = to_json_pretty(self).map_err(|e| write_err(e.to_string()))?;
        body.push('\n');
        fs::write(path, body).map_err(|e| write_err(e.to_string()))
    }
}
