//! Registry payload model (Packagist `p2` metadata documents).

use crate::json::{lenient_funding, lenient_string_list, lenient_string_map};
use crate::types::{Author, AutoloadConfig, DistInfo, SourceInfo, lenient_autoload, lenient_dist};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A per-package metadata document from `{base}/p2/{name}.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageDocument {
    /// Package name to version list.
    #[serde(default)]
    pub packages: BTreeMap<String, Vec<VersionMetadata>>,
}

impl PackageDocument {
    /// Versions listed for `name`, if any.
    #[must_use]
    pub fn versions(&self, name: &str) -> &[VersionMetadata] {
        self.packages.get(name).map_or(&[], Vec::as_slice)
    }
}

/// Full metadata for one published version.
///
/// Field shapes are lenient throughout; see the module docs of
/// [`crate::json`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VersionMetadata {
    /// Package name.
    #[serde(default)]
    pub name: String,

    /// Version string as published (may carry a `v` prefix).
    #[serde(default)]
    pub version: String,

    /// Registry-normalized version, when present.
    #[serde(
        rename = "version_normalized",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub version_normalized: Option<String>,

    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Keywords.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,

    /// Homepage URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,

    /// Package type.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub package_type: Option<String>,

    /// License identifier(s); string or list in the wild.
    #[serde(
        default,
        deserialize_with = "lenient_string_list",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub license: Vec<String>,

    /// Authors.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<Author>,

    /// Source repository.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceInfo>,

    /// Distribution archive; object, string, or missing in the wild.
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

    /// Replaced packages: name to version expression (`self.version`, `*`,
    /// or a concrete version).
    #[serde(
        default,
        deserialize_with = "lenient_string_map",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub replace: BTreeMap<String, String>,

    /// Provided virtual packages.
    #[serde(
        default,
        deserialize_with = "lenient_string_map",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub provide: BTreeMap<String, String>,

    /// Autoload configuration.
    #[serde(
        default,
        deserialize_with = "lenient_autoload",
        skip_serializing_if = "AutoloadConfig::is_empty"
    )]
    pub autoload: AutoloadConfig,

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

    /// Download notification URL.
    #[serde(
        rename = "notification-url",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub notification_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{
        "packages": {
            "acme/log": [
                {
                    "name": "acme/log",
                    "version": "v1.2.3",
                    "license": "MIT",
                    "dist": {"type": "zip", "url": "https://x/log.zip", "shasum": "ff"},
                    "require": {"php": ">=8.0"},
                    "replace": {"acme/log-core": "self.version"},
                    "autoload": {"psr-4": {"Acme\\Log\\": "src/"}}
                },
                {
                    "name": "acme/log",
                    "version": "dev-main",
                    "dist": "https://x/main.zip",
                    "require": [],
                    "autoload": ""
                }
            ]
        }
    }"#;

    #[test]
    fn document_parses_heterogeneous_shapes() {
        let doc: PackageDocument = sonic_rs::from_str(DOC).unwrap();
        let versions = doc.versions("acme/log");
        assert_eq!(versions.len(), 2);

        let tagged = &versions[0];
        assert_eq!(tagged.version, "v1.2.3");
        assert_eq!(tagged.license, vec!["MIT"]);
        assert_eq!(tagged.dist.as_ref().unwrap().shasum.as_deref(), Some("ff"));
        assert_eq!(tagged.replace["acme/log-core"], "self.version");

        let dev = &versions[1];
        assert!(dev.dist.is_none(), "string dist is unusable");
        assert!(dev.require.is_empty());
        assert!(dev.autoload.is_empty());
    }

    #[test]
    fn unknown_package_yields_empty_slice() {
        let doc: PackageDocument = sonic_rs::from_str(DOC).unwrap();
        assert!(doc.versions("other/pkg").is_empty());
    }
}
