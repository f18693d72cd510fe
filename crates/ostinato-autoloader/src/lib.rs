//! Autoload index generation and PHP glue emission for ostinato.
//!
//! Walks the project manifest and every locked package's manifest
//! (preferring the richer on-disk `vendor/{name}/composer.json` over the
//! lock's echoed copy), accumulates PSR-4/PSR-0/classmap/files indices,
//! and writes the loader glue the PHP runtime consumes. All output is
//! byte-stable across runs: maps are sorted and paths are relativized
//! against the vendor root with forward slashes.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

mod php;
pub mod scanner;

pub use scanner::{build_classmap, extract_class_name};

use ostinato_manifest::{
    AutoloadConfig, Lockfile, MANIFEST_FILE, Manifest, to_json_pretty,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Errors from autoload generation.
#[derive(Debug, Error)]
pub enum AutoloadError {
    /// Filesystem failure.
    #[error("I/O error at {path}: {message}")]
    Io {
        /// Affected path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Serialization failure.
    #[error("failed to encode {what}: {message}")]
    Encode {
        /// What was being encoded.
        what: String,
        /// Encoder message.
        message: String,
    },
}

impl AutoloadError {
    fn io(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

/// Accumulated autoload indices for the whole install.
#[derive(Debug, Default)]
struct AutoloadIndex {
    /// PSR-4 prefix to absolute paths.
    psr4: BTreeMap<String, Vec<PathBuf>>,
    /// PSR-0 prefix to absolute paths.
    psr0: BTreeMap<String, Vec<PathBuf>>,
    /// Directories (or files) to scan into the classmap.
    classmap: Vec<PathBuf>,
    /// Files included eagerly.
    files: Vec<PathBuf>,
}

impl AutoloadIndex {
    fn add_config(&mut self, config: &AutoloadConfig, base: &Path) {
        for (namespace, paths) in &config.psr4 {
            let entry = self.psr4.entry(namespace.clone()).or_default();
            for path in paths {
                push_unique(entry, base.join(path));
            }
        }
        for (namespace, paths) in &config.psr0 {
            let entry = self.psr0.entry(namespace.clone()).or_default();
            for path in paths {
                push_unique(entry, base.join(path));
            }
        }
        for dir in &config.classmap {
            push_unique(&mut self.classmap, base.join(dir));
        }
        for file in &config.files {
            push_unique(&mut self.files, base.join(file));
        }
    }
}

fn push_unique(list: &mut Vec<PathBuf>, path: PathBuf) {
    if !list.contains(&path) {
        list.push(path);
    }
}

#[derive(Serialize)]
struct InstalledJson {
    packages: Vec<InstalledJsonPackage>,
    dev: bool,
    #[serde(rename = "dev-package-names")]
    dev_package_names: Vec<String>,
}

#[derive(Serialize)]
struct InstalledJsonPackage {
    name: String,
    version: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    package_type: Option<String>,
}

/// The autoload glue generator. Strictly sequential.
#[derive(Debug)]
pub struct Generator {
    vendor_dir: PathBuf,
}

impl Generator {
    /// Create a generator for a vendor directory.
    #[must_use]
    pub fn new(vendor_dir: impl Into<PathBuf>) -> Self {
        let vendor_dir = vendor_dir.into();
        let vendor_dir = std::path::absolute(&vendor_dir).unwrap_or(vendor_dir);
        Self { vendor_dir }
    }

    /// Generate every glue file for the locked set.
    ///
    /// # Errors
    ///
    /// Fails on filesystem or serialization errors; a missing package
    /// manifest on disk is not an error (the lock echo is used instead).
    pub fn generate(&self, lock: &Lockfile, manifest: &Manifest) -> Result<(), AutoloadError> {
        info!("generating autoload files");

        let mut index = AutoloadIndex::default();

        // Project manifest rules resolve against the project root.
        let project_root = self
            .vendor_dir
            .parent()
            .map_or_else(|| self.vendor_dir.clone(), Path::to_path_buf);
        index.add_config(&manifest.autoload, &project_root);
        index.add_config(&manifest.autoload_dev, &project_root);

        // Installed packages: the on-disk manifest carries richer data
        // than the lock echo, so prefer it when present.
        for package in lock.packages.iter().chain(&lock.packages_dev) {
            let package_dir = self.vendor_dir.join(&package.name);
            match Manifest::load(&package_dir.join(MANIFEST_FILE)) {
                Ok(package_manifest) => {
                    index.add_config(&package_manifest.autoload, &package_dir);
                }
                Err(_) => {
                    debug!(package = %package.name, "using lock echo for autoload config");
                    index.add_config(&package.autoload, &package_dir);
                }
            }
        }

        let composer_dir = self.vendor_dir.join("composer");
        fs::create_dir_all(&composer_dir).map_err(|e| AutoloadError::io(&composer_dir, &e))?;

        self.write_classmap(&composer_dir, &index)?;
        self.write_autoload_php(&index)?;
        self.write(&self.vendor_dir.join("ClassLoader.php"), php::CLASS_LOADER)?;
        self.write_installed_json(&composer_dir, lock)?;
        self.write(
            &composer_dir.join("InstalledVersions.php"),
            php::INSTALLED_VERSIONS,
        )?;
        self.write(
            &composer_dir.join("platform_check.php"),
            php::PLATFORM_CHECK,
        )?;

        // Only Symfony Runtime projects get the runtime entrypoint.
        if lock.contains("symfony/runtime") {
            self.write(
                &self.vendor_dir.join("autoload_runtime.php"),
                php::RUNTIME_AUTOLOAD,
            )?;
        }

        info!("autoload files generated");
        Ok(())
    }

    /// Emit `vendor/autoload.php`.
    fn write_autoload_php(&self, index: &AutoloadIndex) -> Result<(), AutoloadError> {
        let mut out = String::from(
            "<?php\n\n// autoload.php @generated by ostinato\n\n\
             require_once __DIR__ . '/ClassLoader.php';\n\n\
             if (file_exists(__DIR__ . '/composer/InstalledVersions.php')) {\n    \
             require_once __DIR__ . '/composer/InstalledVersions.php';\n}\n\
             if (file_exists(__DIR__ . '/composer/platform_check.php')) {\n    \
             require_once __DIR__ . '/composer/platform_check.php';\n}\n\n\
             $loader = new \\Composer\\Autoload\\ClassLoader();\n\n\
             if (file_exists(__DIR__ . '/composer/autoload_classmap.php')) {\n    \
             $classMap = require __DIR__ . '/composer/autoload_classmap.php';\n    \
             if ($classMap) {\n        $loader->addClassMap($classMap);\n    }\n}\n\n\
             // PSR-4 autoloading\n",
        );

        for (namespace, paths) in &index.psr4 {
            for path in paths {
                let _ = writeln!(
                    out,
                    "$loader->addPsr4('{}', __DIR__ . '{}');",
                    php::escape_namespace(namespace),
                    self.vendor_relative(path)
                );
            }
        }

        out.push_str("\n// PSR-0 autoloading\n");
        for (namespace, paths) in &index.psr0 {
            for path in paths {
                let _ = writeln!(
                    out,
                    "$loader->add('{}', __DIR__ . '{}');",
                    php::escape_namespace(namespace),
                    self.vendor_relative(path)
                );
            }
        }

        out.push_str("\n$loader->register();\n");

        let bootstrap = self.bootstrap_files();
        if !bootstrap.is_empty() {
            out.push_str("\n// Bootstrap files\n");
            for file in &bootstrap {
                let rel = self.vendor_relative(file);
                let _ = writeln!(
                    out,
                    "if (file_exists(__DIR__ . '{rel}')) {{ require_once __DIR__ . '{rel}'; }}"
                );
            }
        }

        if !index.files.is_empty() {
            out.push_str("\n// Autoload files\n");
            for file in &index.files {
                let rel = self.vendor_relative(file);
                let _ = writeln!(
                    out,
                    "if (file_exists(__DIR__ . '{rel}')) {{ require_once __DIR__ . '{rel}'; }}"
                );
            }
        }

        out.push_str("\nreturn $loader;\n");
        self.write(&self.vendor_dir.join("autoload.php"), &out)
    }

    /// Emit `vendor/composer/autoload_classmap.php` by scanning every
    /// collected classmap directory.
    fn write_classmap(
        &self,
        composer_dir: &Path,
        index: &AutoloadIndex,
    ) -> Result<(), AutoloadError> {
        let classmap = build_classmap(&index.classmap);

        let mut out =
            String::from("<?php\n\n// autoload_classmap.php @generated by ostinato\n\nreturn array(\n");
        for (class, path) in &classmap {
            let _ = writeln!(
                out,
                "    '{}' => dirname(__DIR__) . '{}',",
                php::escape_namespace(class),
                self.vendor_relative(path)
            );
        }
        out.push_str(");\n");

        self.write(&composer_dir.join("autoload_classmap.php"), &out)
    }

    /// Emit `vendor/composer/installed.json`.
    fn write_installed_json(
        &self,
        composer_dir: &Path,
        lock: &Lockfile,
    ) -> Result<(), AutoloadError> {
        let installed = InstalledJson {
            packages: lock
                .packages
                .iter()
                .chain(&lock.packages_dev)
                .map(|p| InstalledJsonPackage {
                    name: p.name.clone(),
                    version: p.version.clone(),
                    package_type: p.package_type.clone(),
                })
                .collect(),
            dev: true,
            dev_package_names: lock.packages_dev.iter().map(|p| p.name.clone()).collect(),
        };

        let mut body = to_json_pretty(&installed).map_err(|e| AutoloadError::Encode {
            what: "installed.json".to_string(),
            message: e.to_string(),
        })?;
        body.push('\n');

        let path = composer_dir.join("installed.json");
        fs::write(&path, body).map_err(|e| AutoloadError::io(&path, &e))
    }

    /// Well-known polyfill bootstrap files that must load eagerly even
    /// though their packages predate `files` autoload declarations.
    fn bootstrap_files(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();

        let symfony_dir = self.vendor_dir.join("symfony");
        if let Ok(entries) = fs::read_dir(&symfony_dir) {
            let mut polyfills: Vec<PathBuf> = entries
                .filter_map(Result::ok)
                .filter(|e| {
                    e.file_name()
                        .to_string_lossy()
                        .starts_with("polyfill-")
                })
                .map(|e| e.path().join("bootstrap.php"))
                .filter(|p| p.is_file())
                .collect();
            polyfills.sort();
            files.extend(polyfills);
        }

        for known in [
            "symfony/deprecation-contracts/function.php",
            "symfony/string/Resources/functions.php",
        ] {
            let path = self.vendor_dir.join(known);
            if path.is_file() {
                files.push(path);
            }
        }

        files
    }

    /// Render a path relative to the vendor root, forward-slashed, with
    /// a leading `/` ready for `__DIR__` concatenation.
    fn vendor_relative(&self, path: &Path) -> String {
        let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        let rel = relative_to(&self.vendor_dir, &absolute);
        if rel.as_os_str().is_empty() {
            String::new()
        } else {
            format!("/{}", rel.to_string_lossy().replace('\\', "/"))
        }
    }

    fn write(&self, path: &Path, content: &str) -> Result<(), AutoloadError> {
        fs::write(path, content).map_err(|e| AutoloadError::io(path, &e))
    }
}

/// Compute `target` relative to `base` (both absolute), walking up with
/// `..` where needed.
fn relative_to(base: &Path, target: &Path) -> PathBuf {
    let base_parts: Vec<Component<'_>> = base.components().collect();
    let target_parts: Vec<Component<'_>> = target.components().collect();

    let common = base_parts
        .iter()
        .zip(&target_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut rel = PathBuf::new();
    for _ in common..base_parts.len() {
        rel.push("..");
    }
    for part in &target_parts[common..] {
        rel.push(part);
    }
    rel
}
