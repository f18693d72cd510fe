//! Shared model types: authors, source/dist records, autoload configuration.

use crate::json::lenient_psr_map;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A package author.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Author name.
    #[serde(default)]
    pub name: String,
    /// Email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Homepage URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    /// Role in the project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Source repository record (git/svn).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInfo {
    /// Source type (usually `git`).
    #[serde(rename = "type", default)]
    pub source_type: String,
    /// Repository URL.
    #[serde(default)]
    pub url: String,
    /// Commit reference.
    #[serde(default)]
    pub reference: String,
}

/// Distribution archive record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistInfo {
    /// Archive type (usually `zip`).
    #[serde(rename = "type", default)]
    pub dist_type: String,
    /// Download URL.
    #[serde(default)]
    pub url: String,
    /// Commit reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// SHA-256 digest of the archive, when the registry provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shasum: Option<String>,
}

/// Deserialize `dist`, which may be an object, a bare URL string, or
/// null. Only the object form is usable; everything else becomes absent.
pub(crate) fn lenient_dist<'de, D>(deserializer: D) -> Result<Option<DistInfo>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Object(_) => Ok(serde_json::from_value(value).ok()),
        _ => Ok(None),
    }
}

/// Autoload configuration of a manifest or registry record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoloadConfig {
    /// PSR-4 namespace prefix to path(s).
    #[serde(
        rename = "psr-4",
        default,
        deserialize_with = "lenient_psr_map",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub psr4: BTreeMap<String, Vec<String>>,

    /// PSR-0 namespace prefix to path(s).
    #[serde(
        rename = "psr-0",
        default,
        deserialize_with = "lenient_psr_map",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub psr0: BTreeMap<String, Vec<String>>,

    /// Directories and files to scan into the classmap.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classmap: Vec<String>,

    /// Files included eagerly on every request.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,

    /// Paths excluded from classmap generation.
    #[serde(
        rename = "exclude-from-classmap",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub exclude_from_classmap: Vec<String>,
}

impl AutoloadConfig {
    /// Whether no autoload rules are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.psr4.is_empty()
            && self.psr0.is_empty()
            && self.classmap.is_empty()
            && self.files.is_empty()
            && self.exclude_from_classmap.is_empty()
    }
}

/// Deserialize an `autoload` field whose value may be any non-object
/// shape (historical registry records carry a string when empty). Drops
/// to an empty configuration instead of failing.
pub(crate) fn lenient_autoload<'de, D>(deserializer: D) -> Result<AutoloadConfig, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Object(_) => Ok(serde_json::from_value(value).unwrap_or_default()),
        _ => Ok(AutoloadConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "lenient_dist")]
        dist: Option<DistInfo>,
        #[serde(default, deserialize_with = "lenient_autoload")]
        autoload: AutoloadConfig,
    }

    #[test]
    fn dist_object() {
        let p: Probe = serde_json::from_str(
            r#"{"dist": {"type": "zip", "url": "https://x/a.zip", "shasum": "abc"}}"#,
        )
        .unwrap();
        let dist = p.dist.unwrap();
        assert_eq!(dist.dist_type, "zip");
        assert_eq!(dist.shasum.as_deref(), Some("abc"));
    }

    #[test]
    fn dist_string_or_null_is_absent() {
        let p: Probe = serde_json::from_str(r#"{"dist": "https://x/a.zip"}"#).unwrap();
        assert!(p.dist.is_none());
        let p: Probe = serde_json::from_str(r#"{"dist": null}"#).unwrap();
        assert!(p.dist.is_none());
    }

    #[test]
    fn autoload_string_is_empty_config() {
        let p: Probe = serde_json::from_str(r#"{"autoload": ""}"#).unwrap();
        assert!(p.autoload.is_empty());
    }

    #[test]
    fn autoload_object_parses() {
        let p: Probe =
            serde_json::from_str(r#"{"autoload": {"psr-4": {"Acme\\": "src/"}}}"#).unwrap();
        assert_eq!(p.autoload.psr4["Acme\\"], vec!["src/"]);
    }
}
