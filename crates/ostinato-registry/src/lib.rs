//! Packagist registry client for ostinato.
//!
//! Two operations, both buffered in memory:
//! - [`RegistryClient::get_package`] fetches the per-package metadata
//!   document from `{base}/p2/{name}.json`.
//! - [`RegistryClient::download`] fetches a distribution archive.
//!
//! A single timeout applies to both; retry policy is the caller's
//! problem.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

mod client;
mod error;

pub use client::{DEFAULT_REGISTRY_URL, RegistryClient, RegistryConfig};
pub use error::RegistryError;
