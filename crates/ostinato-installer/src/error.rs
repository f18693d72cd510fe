//! Error types for install operations.

use ostinato_manifest::LockError;
use ostinato_registry::RegistryError;
use ostinato_resolver::ResolveError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors aborting an install.
#[derive(Debug, Error)]
pub enum InstallError {
    /// The package has no usable dist archive.
    #[error("no distribution URL for package '{name}'")]
    MissingDist {
        /// Package name.
        name: String,
    },

    /// The downloaded archive does not match its recorded digest.
    #[error("checksum mismatch for '{name}': expected {expected}, got {actual}")]
    ChecksumMismatch {
        /// Package name.
        name: String,
        /// Digest recorded in the metadata.
        expected: String,
        /// Digest of the downloaded bytes.
        actual: String,
    },

    /// The payload is not a readable ZIP archive.
    #[error("invalid archive for '{name}': {message}")]
    ArchiveInvalid {
        /// Package name.
        name: String,
        /// Reader message.
        message: String,
    },

    /// Filesystem failure while extracting or preparing the vendor tree.
    #[error("I/O error at {path}: {message}")]
    ExtractIo {
        /// Affected path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Registry failure (metadata fetch or download).
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Resolution failure.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Lockfile failure.
    #[error(transparent)]
    Lock(#[from] LockError),
}

impl InstallError {
    /// Create an extraction I/O error with path context.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        Self::ExtractIo {
            path: path.into(),
            message: err.to_string(),
        }
    }

    /// Short label of the error kind, used in progress events.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::MissingDist { .. } => "missing-dist",
            Self::ChecksumMismatch { .. } => "checksum-mismatch",
            Self::ArchiveInvalid { .. } => "archive-invalid",
            Self::ExtractIo { .. } => "extract-io",
            Self::Registry(_) => "registry",
            Self::Resolve(_) => "resolve",
            Self::Lock(_) => "lock",
        }
    }
}
