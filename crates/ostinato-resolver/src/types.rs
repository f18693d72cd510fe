//! Resolver output types and errors.

use ostinato_manifest::VersionMetadata;
use ostinato_registry::RegistryError;
use semver::Version;
use std::collections::BTreeMap;
use thiserror::Error;

/// A package pinned to a concrete version.
#[derive(Debug, Clone)]
pub struct ResolvedPackage {
    /// Package name (`vendor/name`).
    pub name: String,
    /// Selected version, parsed for comparison.
    pub version: Version,
    /// Full registry metadata of the selected version.
    pub metadata: VersionMetadata,
}

impl ResolvedPackage {
    /// The version string as published (may carry a `v` prefix).
    #[must_use]
    pub fn version_str(&self) -> &str {
        &self.metadata.version
    }
}

/// The result of a resolution pass: one entry per name, sorted by name.
pub type Resolution = BTreeMap<String, ResolvedPackage>;

/// Errors aborting a resolution pass.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The registry lists no usable versions for a package.
    #[error("no installable versions found for '{name}'")]
    NoVersions {
        /// Package name.
        name: String,
    },

    /// No candidate satisfied enough of the accumulated constraints.
    #[error("cannot satisfy constraints for '{name}': {}", constraints.join(", "))]
    Infeasible {
        /// Package name.
        name: String,
        /// The constraint ledger at the point of failure.
        constraints: Vec<String>,
    },

    /// The registry failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}
