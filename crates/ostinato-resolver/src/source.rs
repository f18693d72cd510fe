//! Metadata source abstraction.

use async_trait::async_trait;
use ostinato_manifest::PackageDocument;
use ostinato_registry::{RegistryClient, RegistryError};

/// Provider of per-package metadata documents.
///
/// The production implementation is [`RegistryClient`]; tests implement
/// this over in-memory fixtures.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Fetch the metadata document for a package.
    async fn get_package(&self, name: &str) -> Result<PackageDocument, RegistryError>;
}

#[async_trait]
impl MetadataSource for RegistryClient {
    async fn get_package(&self, name: &str) -> Result<PackageDocument, RegistryError> {
        RegistryClient::get_package(self, name).await
    }
}
