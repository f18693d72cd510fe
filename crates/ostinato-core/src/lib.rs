//! Core types for the ostinato package manager.
//!
//! This crate provides the pieces shared by every other ostinato crate:
//! - Composer-compatible version parsing and comparison
//! - Version constraint parsing and evaluation
//! - Virtual/platform package name classification
//! - Error types for version and constraint handling

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod constraint;
pub mod error;
pub mod platform;
pub mod version;

pub use constraint::Constraint;
pub use error::{ConstraintError, VersionError};
pub use platform::is_virtual_name;
pub use version::parse_version;

// Re-export the version type used throughout the workspace.
pub use semver::Version;
