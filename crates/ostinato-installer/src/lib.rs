//! Parallel package installer for ostinato.
//!
//! Takes a resolved set (or an existing lockfile), downloads each
//! package's dist archive concurrently, verifies integrity, extracts into
//! the vendor tree with the archive's leading path component stripped,
//! and produces deterministic lockfile records.
//!
//! Per-package lifecycle:
//!
//! ```text
//! Queued -> Downloading -> Verifying -> Extracting -> Recorded
//!                |             |            |
//!              Failed        Failed       Failed
//! ```
//!
//! The first failure aborts the batch; in-flight tasks may finish, but
//! the first captured error is returned. Partial vendor state is not
//! rolled back; installing from the lock is idempotent per package
//! directory.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

mod error;
mod extract;
mod installer;
mod progress;

pub use error::InstallError;
pub use installer::Installer;
pub use progress::{InstallEvent, InstallPhase, ProgressSender};
