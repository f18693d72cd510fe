//! Error types for registry operations.

use thiserror::Error;

/// Errors from the registry client.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The registry has no such package (HTTP 404).
    #[error("package '{name}' not found on the registry")]
    NotFound {
        /// Package name.
        name: String,
    },

    /// Network failure or server-side error.
    #[error("registry transport error for {url}: {message}")]
    Transport {
        /// Request URL.
        url: String,
        /// Error message.
        message: String,
    },

    /// The metadata document was not valid JSON.
    #[error("failed to decode registry response for '{name}': {message}")]
    Decode {
        /// Package name.
        name: String,
        /// Decoder message.
        message: String,
    },

    /// An archive download returned a non-200 status.
    #[error("download of {url} failed: HTTP {status}")]
    DownloadHttp {
        /// Download URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },
}

impl RegistryError {
    /// Create a transport error.
    #[must_use]
    pub fn transport(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            url: url.into(),
            message: message.into(),
        }
    }
}
