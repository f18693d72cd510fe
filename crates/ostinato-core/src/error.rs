//! Error types for version and constraint handling.

use thiserror::Error;

/// Error when parsing a version string.
#[derive(Debug, Clone, Error)]
pub enum VersionError {
    /// The string is not a valid semantic version.
    #[error("invalid version string '{input}': {message}")]
    Parse {
        /// The offending input.
        input: String,
        /// Parser message.
        message: String,
    },

    /// The string names a dev branch (`dev-*`).
    ///
    /// This is a non-fatal signal: the resolver uses it to skip dev
    /// versions during candidate selection. It is never surfaced to users.
    #[error("dev version '{0}' ignored")]
    DevVersion(String),
}

impl VersionError {
    /// Create a parse error with context.
    #[must_use]
    pub fn parse(input: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            input: input.into(),
            message: message.into(),
        }
    }

    /// Whether this error marks a skipped dev version rather than a failure.
    #[must_use]
    pub const fn is_dev_version(&self) -> bool {
        matches!(self, Self::DevVersion(_))
    }
}

/// Error when parsing a constraint string.
#[derive(Debug, Clone, Error)]
#[error("invalid constraint '{input}': {message}")]
pub struct ConstraintError {
    /// The offending input.
    pub input: String,
    /// Parser message.
    pub message: String,
}

impl ConstraintError {
    /// Create a new constraint error.
    #[must_use]
    pub fn new(input: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            message: message.into(),
        }
    }
}
