//! Error types for manifest and lockfile I/O.

use std::path::PathBuf;
use thiserror::Error;

/// Errors when loading or saving `composer.json`.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// No manifest at the expected path.
    #[error("composer.json not found at {path}")]
    Missing {
        /// Path that was probed.
        path: PathBuf,
    },

    /// The manifest could not be read or parsed.
    #[error("failed to decode manifest at {path}: {message}")]
    Decode {
        /// Manifest path.
        path: PathBuf,
        /// Decoder message.
        message: String,
    },

    /// The manifest could not be written.
    #[error("failed to write manifest at {path}: {message}")]
    Write {
        /// Manifest path.
        path: PathBuf,
        /// Writer message.
        message: String,
    },
}

/// Errors when loading or saving a lockfile.
#[derive(Debug, Error)]
pub enum LockError {
    /// The lockfile could not be read or parsed.
    #[error("failed to decode lockfile at {path}: {message}")]
    Decode {
        /// Lockfile path.
        path: PathBuf,
        /// Decoder message.
        message: String,
    },

    /// The lockfile could not be written.
    #[error("failed to write lockfile at {path}: {message}")]
    Write {
        /// Lockfile path.
        path: PathBuf,
        /// Writer message.
        message: String,
    },
}
