//! Dependency resolver for ostinato.
//!
//! Turns a root `name -> constraint` requirement map into a single
//! `name -> version` assignment covering the transitive closure, honoring
//! `replace` rewrites, virtual packages, and disjunctive constraints.
//!
//! The walk is strictly sequential: all shared state (resolved set,
//! constraint ledger, replacement registry) lives in one owned structure
//! threaded through the recursion, so no synchronization is needed.
//! Network access goes through the [`MetadataSource`] trait so tests can
//! inject fixtures instead of a live registry.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

mod config;
mod resolver;
mod selection;
mod source;
mod types;

pub use config::ResolverConfig;
pub use resolver::Resolver;
pub use source::MetadataSource;
pub use types::{Resolution, ResolveError, ResolvedPackage};
