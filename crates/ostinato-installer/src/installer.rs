//! Install orchestration: resolve, fetch, verify, extract, lock.

use crate::error::InstallError;
use crate::extract::extract_zip;
use crate::progress::{InstallPhase, ProgressSender, emit};
use futures::StreamExt;
use ostinato_manifest::{
    DistInfo, LockedPackage, Lockfile, Manifest, VersionMetadata, content_hash,
};
use ostinato_registry::RegistryClient;
use ostinato_resolver::{Resolution, Resolver, ResolverConfig};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Default number of concurrent package installs.
const DEFAULT_CONCURRENCY: usize = 8;

/// The package installer.
///
/// One concurrent task runs per package. Tasks never write to the same
/// package subdirectory (the vendor tree is partitioned by name), so no
/// inter-task locking is needed.
pub struct Installer {
    registry: RegistryClient,
    vendor_dir: PathBuf,
    resolver_config: ResolverConfig,
    max_concurrent: usize,
    events: Option<ProgressSender>,
}

impl std::fmt::Debug for Installer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Installer")
            .field("vendor_dir", &self.vendor_dir)
            .field("max_concurrent", &self.max_concurrent)
            .finish_non_exhaustive()
    }
}

impl Installer {
    /// Create an installer writing into `vendor_dir`.
    #[must_use]
    pub fn new(registry: RegistryClient, vendor_dir: impl Into<PathBuf>) -> Self {
        Self {
            registry,
            vendor_dir: vendor_dir.into(),
            resolver_config: ResolverConfig::default(),
            max_concurrent: DEFAULT_CONCURRENCY,
            events: None,
        }
    }

    /// Override the resolver configuration.
    #[must_use]
    pub fn with_resolver_config(mut self, config: ResolverConfig) -> Self {
        self.resolver_config = config;
        self
    }

    /// Attach a progress event channel.
    #[must_use]
    pub fn with_events(mut self, events: ProgressSender) -> Self {
        self.events = Some(events);
        self
    }

    /// Override the concurrency bound.
    #[must_use]
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    /// Resolve the manifest and install the result, producing a fresh
    /// lockfile.
    ///
    /// The dev partition comes from two resolve passes: the main set
    /// first, then main plus dev; whatever only the second pass pulls in
    /// is a dev package.
    ///
    /// # Errors
    ///
    /// The first error captured from any stage aborts the install.
    pub async fn install(
        &self,
        manifest: &Manifest,
        include_dev: bool,
    ) -> Result<Lockfile, InstallError> {
        info!(dev = include_dev, "resolving dependencies");

        let main = self.resolve_pass(&manifest.require).await?;

        let (resolution, dev_names) = if include_dev && !manifest.require_dev.is_empty() {
            let mut combined = manifest.require.clone();
            for (name, constraint) in &manifest.require_dev {
                combined
                    .entry(name.clone())
                    .or_insert_with(|| constraint.clone());
            }
            let full = self.resolve_pass(&combined).await?;
            let dev_names: BTreeSet<String> = full
                .keys()
                .filter(|name| !main.contains_key(*name))
                .cloned()
                .collect();
            (full, dev_names)
        } else {
            (main, BTreeSet::new())
        };

        info!(packages = resolution.len(), dev = dev_names.len(), "resolved");

        std::fs::create_dir_all(&self.vendor_dir)
            .map_err(|e| InstallError::io(&self.vendor_dir, &e))?;

        let records = self.install_resolved(&resolution).await?;

        let mut lock = Lockfile::new(content_hash(&manifest.require, &manifest.require_dev));
        for record in records {
            if dev_names.contains(&record.name) {
                lock.packages_dev.push(record);
            } else {
                lock.packages.push(record);
            }
        }
        // Deterministic lock order regardless of task completion order.
        lock.packages.sort_by(|a, b| a.name.cmp(&b.name));
        lock.packages_dev.sort_by(|a, b| a.name.cmp(&b.name));

        info!(
            main = lock.packages.len(),
            dev = lock.packages_dev.len(),
            "install complete"
        );
        Ok(lock)
    }

    /// Install from an existing lockfile, skipping resolution entirely.
    ///
    /// Packages whose vendor directory already exists are treated as
    /// installed and skipped, making this path idempotent.
    ///
    /// # Errors
    ///
    /// The first error captured from any package task aborts the install.
    pub async fn install_from_lock(
        &self,
        lock: &Lockfile,
        include_dev: bool,
    ) -> Result<(), InstallError> {
        std::fs::create_dir_all(&self.vendor_dir)
            .map_err(|e| InstallError::io(&self.vendor_dir, &e))?;

        let packages = lock.all_packages(include_dev);
        info!(packages = packages.len(), "installing from lockfile");

        let mut pending = Vec::new();
        for package in packages {
            if self.vendor_dir.join(&package.name).is_dir() {
                debug!(package = %package.name, "already installed; skipping");
                continue;
            }
            pending.push(package);
        }

        self.run_batch(pending.into_iter().map(|package| async move {
            emit(self.events.as_ref(), &package.name, InstallPhase::Queued);
            self.fetch_verify_extract(&package.name, package.dist.as_ref())
                .await?;
            emit(self.events.as_ref(), &package.name, InstallPhase::Recorded);
            Ok(())
        }))
        .await?;

        Ok(())
    }

    async fn resolve_pass(
        &self,
        roots: &BTreeMap<String, String>,
    ) -> Result<Resolution, InstallError> {
        let resolver =
            Resolver::with_config(self.registry.clone(), self.resolver_config.clone());
        Ok(resolver.resolve(roots).await?)
    }

    /// Install every resolved package concurrently, collecting lock
    /// records.
    async fn install_resolved(
        &self,
        resolution: &Resolution,
    ) -> Result<Vec<LockedPackage>, InstallError> {
        self.run_batch(resolution.values().map(|package| async move {
            emit(self.events.as_ref(), &package.name, InstallPhase::Queued);
            let metadata = &package.metadata;
            self.fetch_verify_extract(&package.name, metadata.dist.as_ref())
                .await?;
            emit(self.events.as_ref(), &package.name, InstallPhase::Recorded);
            Ok(locked_record(metadata))
        }))
        .await
    }

    /// Drive a batch of per-package futures with bounded concurrency.
    ///
    /// Every task runs to completion, but the first captured error wins.
    async fn run_batch<T, F>(
        &self,
        tasks: impl Iterator<Item = F>,
    ) -> Result<Vec<T>, InstallError>
    where
        F: Future<Output = Result<T, InstallError>>,
    {
        let mut stream =
            futures::stream::iter(tasks).buffer_unordered(self.max_concurrent);

        let mut results = Vec::new();
        let mut first_error: Option<InstallError> = None;
        while let Some(result) = stream.next().await {
            match result {
                Ok(value) => results.push(value),
                Err(error) => {
                    warn!(error = %error, "package install failed");
                    first_error.get_or_insert(error);
                }
            }
        }

        match first_error {
            Some(error) => Err(error),
            None => Ok(results),
        }
    }

    /// Download, verify, and extract one package into the vendor tree,
    /// emitting phase events and mapping failures to `Failed`.
    async fn fetch_verify_extract(
        &self,
        name: &str,
        dist: Option<&DistInfo>,
    ) -> Result<(), InstallError> {
        let result = self.fetch_verify_extract_inner(name, dist).await;
        if let Err(error) = &result {
            emit(
                self.events.as_ref(),
                name,
                InstallPhase::Failed { kind: error.kind() },
            );
        }
        result
    }

    async fn fetch_verify_extract_inner(
        &self,
        name: &str,
        dist: Option<&DistInfo>,
    ) -> Result<(), InstallError> {
        let dist = dist
            .filter(|d| !d.url.is_empty())
            .ok_or_else(|| InstallError::MissingDist {
                name: name.to_string(),
            })?;

        emit(self.events.as_ref(), name, InstallPhase::Downloading);
        let data = self.registry.download(&dist.url).await?;

        emit(self.events.as_ref(), name, InstallPhase::Verifying);
        if let Some(expected) = dist.shasum.as_deref().filter(|s| !s.is_empty()) {
            let actual = sha256_hex(&data);
            if actual != expected {
                return Err(InstallError::ChecksumMismatch {
                    name: name.to_string(),
                    expected: expected.to_string(),
                    actual,
                });
            }
        }

        emit(self.events.as_ref(), name, InstallPhase::Extracting);
        let target = self.vendor_dir.join(name);
        let package_name = name.to_string();
        let files = tokio::task::spawn_blocking(move || {
            extract_zip(&package_name, &data, &target)
        })
        .await
        .map_err(|e| InstallError::ArchiveInvalid {
            name: name.to_string(),
            message: format!("extraction task failed: {e}"),
        })??;

        debug!(package = %name, files, "extracted");
        Ok(())
    }
}

/// Lower a resolved version's metadata into a lockfile record.
fn locked_record(metadata: &VersionMetadata) -> LockedPackage {
    LockedPackage {
        name: metadata.name.clone(),
        version: metadata.version.clone(),
        source: metadata.source.clone(),
        dist: metadata.dist.clone(),
        require: metadata.require.clone(),
        require_dev: metadata.require_dev.clone(),
        package_type: metadata.package_type.clone(),
        autoload: metadata.autoload.clone(),
        notification_url: metadata.notification_url.clone(),
        license: metadata.license.clone(),
        authors: metadata.authors.clone(),
        description: metadata.description.clone(),
        homepage: metadata.homepage.clone(),
        keywords: metadata.keywords.clone(),
        time: metadata.time.clone(),
        support: metadata.support.clone(),
        funding: metadata.funding.clone(),
    }
}

fn sha256_hex(data: &[u8]) -> String {
    use std::fmt::Write;
    Sha256::digest(data)
        .iter()
        .fold(String::with_capacity(64), |mut out, b| {
            let _ = write!(out, "{b:02x}");
            out
        })
}
