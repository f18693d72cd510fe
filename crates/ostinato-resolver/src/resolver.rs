//! The sequential resolution walk.

use crate::config::ResolverConfig;
use crate::selection::select_version;
use crate::source::MetadataSource;
use crate::types::{Resolution, ResolveError, ResolvedPackage};
use futures::future::BoxFuture;
use ostinato_core::{Constraint, is_virtual_name, parse_version};
use ostinato_manifest::VersionMetadata;
use semver::Version;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, warn};

/// A single resolution pass over a root requirement map.
///
/// All mutable state lives here and the walk is recursive and
/// sequential, so the resolved set, constraint ledger, and replacement
/// registry need no synchronization. A resolver is consumed by
/// [`Resolver::resolve`]; run a fresh one per pass.
pub struct Resolver<S> {
    source: S,
    config: ResolverConfig,
    /// One entry per resolved name.
    resolved: BTreeMap<String, ResolvedPackage>,
    /// Constraint ledger: every constraint string seen per name, in
    /// encounter order.
    constraints: BTreeMap<String, Vec<String>>,
    /// Replaced name to the replacing package's version string.
    replaced: BTreeMap<String, String>,
    /// Names whose disjunctive constraints have been expanded.
    expanded: BTreeSet<String>,
}

impl<S: MetadataSource> Resolver<S> {
    /// Create a resolver with the default configuration.
    pub fn new(source: S) -> Self {
        Self::with_config(source, ResolverConfig::default())
    }

    /// Create a resolver with an explicit configuration.
    pub fn with_config(source: S, config: ResolverConfig) -> Self {
        Self {
            source,
            config,
            resolved: BTreeMap::new(),
            constraints: BTreeMap::new(),
            replaced: BTreeMap::new(),
            expanded: BTreeSet::new(),
        }
    }

    /// Resolve the transitive closure of `roots`.
    ///
    /// Root iteration order does not affect the result: every recorded
    /// entry satisfies the full ledger for its name (or a fallback the
    /// policy admits), regardless of the order edges were seen.
    ///
    /// # Errors
    ///
    /// Any [`ResolveError`] aborts the pass.
    pub async fn resolve(
        mut self,
        roots: &BTreeMap<String, String>,
    ) -> Result<Resolution, ResolveError> {
        for (name, constraint) in roots {
            if is_virtual_name(name) {
                debug!(package = %name, "skipping virtual root");
                continue;
            }
            self.resolve_one(name.clone(), constraint.clone()).await?;
        }

        // Finalization: anything a resolved package replaces must not
        // appear in the result, even if it was resolved before the
        // replacement was registered.
        let Self {
            mut resolved,
            replaced,
            ..
        } = self;
        resolved.retain(|name, _| !replaced.contains_key(name));

        info!(packages = resolved.len(), "resolution complete");
        Ok(resolved)
    }

    fn resolve_one(
        &mut self,
        name: String,
        constraint: String,
    ) -> BoxFuture<'_, Result<(), ResolveError>> {
        Box::pin(async move {
            if is_virtual_name(&name) {
                return Ok(());
            }

            self.append_constraint(&name, &constraint);

            // A replaced name is satisfied (or tolerated) by its
            // replacer; it is never resolved on its own.
            if let Some(replacing) = self.replaced.get(&name) {
                match (Constraint::parse(&constraint), parse_version(replacing)) {
                    (Ok(c), Ok(v)) if c.matches(&v) => {
                        debug!(package = %name, version = %replacing,
                            "requirement satisfied by replacement");
                    }
                    _ => {
                        warn!(package = %name, version = %replacing, constraint = %constraint,
                            "replacement does not satisfy requirement; tolerating");
                    }
                }
                return Ok(());
            }

            if let Some(current) = self.resolved.get(&name) {
                let holds = match Constraint::parse(&constraint) {
                    Ok(c) => c.matches(&current.version),
                    Err(e) => {
                        warn!(package = %name, constraint = %constraint, error = %e,
                            "ignoring malformed requirement on resolved package");
                        true
                    }
                };
                if holds {
                    return Ok(());
                }
                info!(package = %name, current = %current.version, constraint = %constraint,
                    "current choice invalidated; re-selecting against full ledger");
            } else {
                debug!(package = %name, constraint = %constraint, "resolving");
            }

            let document = self.source.get_package(&name).await?;
            let versions = document.versions(&name).to_vec();
            let (version, metadata) = self.select(&name, &versions)?;
            self.record_and_recurse(&name, version, metadata).await
        })
    }

    /// Record a selection, register its `replace` section, and walk its
    /// requirements.
    async fn record_and_recurse(
        &mut self,
        name: &str,
        version: Version,
        metadata: VersionMetadata,
    ) -> Result<(), ResolveError> {
        info!(package = %name, version = %metadata.version, "resolved");

        self.process_replace(name, &metadata);

        let requires: Vec<(String, String)> = metadata
            .require
            .iter()
            .map(|(dep, c)| (dep.clone(), c.clone()))
            .collect();

        self.resolved.insert(
            name.to_string(),
            ResolvedPackage {
                name: name.to_string(),
                version,
                metadata,
            },
        );

        for (dep, dep_constraint) in requires {
            if is_virtual_name(&dep) || self.replaced.contains_key(&dep) {
                continue;
            }
            self.resolve_one(dep, dep_constraint).await?;
        }

        Ok(())
    }

    /// Register the `replace` declarations of a selected version.
    ///
    /// `self.version` and `*` rewrite to the replacing package's own
    /// version string; entries for already-resolved names stay in the
    /// resolved map until finalization removes them.
    fn process_replace(&mut self, name: &str, metadata: &VersionMetadata) {
        for (replaced_name, expr) in &metadata.replace {
            let version_str = if expr == "self.version" || expr == "*" {
                metadata.version.clone()
            } else {
                expr.clone()
            };
            debug!(package = %name, replaces = %replaced_name, version = %version_str,
                "registering replacement");
            self.replaced.insert(replaced_name.clone(), version_str);
        }
    }

    /// Append a constraint to the ledger for `name`.
    ///
    /// Disjunctive constraints on flagged names are split into one entry
    /// per disjunct so grouped-by-major selection can fire.
    fn append_constraint(&mut self, name: &str, constraint: &str) {
        let expand = self.config.expands_disjunctions(name);
        let entry = self.constraints.entry(name.to_string()).or_default();

        if expand
            && let Ok(parsed) = Constraint::parse(constraint)
            && parsed.is_disjunctive()
        {
            debug!(package = %name, constraint = %constraint, "expanding disjunction");
            for disjunct in parsed.disjunct_strings() {
                entry.push(disjunct.to_string());
            }
            self.expanded.insert(name.to_string());
        } else {
            entry.push(constraint.to_string());
        }
    }

    fn select(
        &self,
        name: &str,
        versions: &[VersionMetadata],
    ) -> Result<(Version, VersionMetadata), ResolveError> {
        let ledger = self.constraints.get(name).map_or(&[][..], Vec::as_slice);
        select_version(
            name,
            versions,
            ledger,
            self.expanded.contains(name),
            &self.config,
        )
    }
}
