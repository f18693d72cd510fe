//! HTTP client for Packagist-compatible registries.

use crate::error::RegistryError;
use bytes::Bytes;
use ostinato_manifest::PackageDocument;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Default public registry.
pub const DEFAULT_REGISTRY_URL: &str = "https://repo.packagist.org";

/// Registry client configuration.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Registry base URL.
    pub base_url: Url,
    /// Timeout applied to every request.
    pub timeout: Duration,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_REGISTRY_URL).expect("valid default URL"),
            timeout: Duration::from_secs(30),
        }
    }
}

impl RegistryConfig {
    /// Configuration pointing at a custom base URL (used by tests).
    #[must_use]
    pub fn with_base_url(base_url: Url) -> Self {
        Self {
            base_url,
            ..Self::default()
        }
    }
}

/// A Packagist metadata and archive client.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    config: RegistryConfig,
    http: reqwest::Client,
}

impl Default for RegistryClient {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

impl RegistryClient {
    /// Create a client with the given configuration.
    #[must_use]
    pub fn new(config: RegistryConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("reqwest client construction only fails on TLS misconfiguration");
        Self { config, http }
    }

    /// The configured base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.config.base_url
    }

    /// Fetch the metadata document for `name` from `{base}/p2/{name}.json`.
    ///
    /// # Errors
    ///
    /// [`RegistryError::NotFound`] on 404, [`RegistryError::Transport`] on
    /// network or server failure, [`RegistryError::Decode`] on malformed
    /// JSON.
    pub async fn get_package(&self, name: &str) -> Result<PackageDocument, RegistryError> {
        let url = self
            .config
            .base_url
            .join(&format!("p2/{name}.json"))
            .map_err(|e| RegistryError::transport(name, e.to_string()))?;

        debug!(package = %name, url = %url, "fetching package metadata");

        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| RegistryError::transport(url.as_str(), e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(RegistryError::NotFound {
                name: name.to_string(),
            });
        }
        if !status.is_success() {
            return Err(RegistryError::transport(
                url.as_str(),
                format!("HTTP {}", status.as_u16()),
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| RegistryError::transport(url.as_str(), e.to_string()))?;

        let document: PackageDocument =
            sonic_rs::from_slice(&body).map_err(|e| RegistryError::Decode {
                name: name.to_string(),
                message: e.to_string(),
            })?;

        info!(
            package = %name,
            versions = document.versions(name).len(),
            "fetched package metadata"
        );

        Ok(document)
    }

    /// Download an archive, buffering it in memory.
    ///
    /// # Errors
    ///
    /// [`RegistryError::DownloadHttp`] on a non-200 status,
    /// [`RegistryError::Transport`] on network failure.
    pub async fn download(&self, url: &str) -> Result<Bytes, RegistryError> {
        debug!(url = %url, "downloading archive");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| RegistryError::transport(url, e.to_string()))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(RegistryError::DownloadHttp {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| RegistryError::transport(url, e.to_string()))?;

        debug!(url = %url, bytes = body.len(), "archive downloaded");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> RegistryClient {
        let base = Url::parse(&server.uri()).unwrap();
        RegistryClient::new(RegistryConfig::with_base_url(base))
    }

    #[tokio::test]
    async fn get_package_parses_document() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/p2/acme/log.json"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"packages": {"acme/log": [{"name": "acme/log", "version": "1.0.0"}]}}"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let doc = client.get_package("acme/log").await.unwrap();
        assert_eq!(doc.versions("acme/log").len(), 1);
    }

    #[tokio::test]
    async fn missing_package_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/p2/acme/ghost.json"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.get_package("acme/ghost").await.unwrap_err();
        assert!(matches!(err, RegistryError::NotFound { name } if name == "acme/ghost"));
    }

    #[tokio::test]
    async fn server_error_is_transport() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/p2/acme/flaky.json"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.get_package("acme/flaky").await.unwrap_err();
        assert!(matches!(err, RegistryError::Transport { .. }));
    }

    #[tokio::test]
    async fn malformed_json_is_decode() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/p2/acme/broken.json"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("{not json", "application/json"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.get_package("acme/broken").await.unwrap_err();
        assert!(matches!(err, RegistryError::Decode { .. }));
    }

    #[tokio::test]
    async fn download_rejects_non_200() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/dist/a.zip"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let url = format!("{}/dist/a.zip", server.uri());
        let err = client.download(&url).await.unwrap_err();
        assert!(matches!(err, RegistryError::DownloadHttp { status: 403, .. }));
    }

    #[tokio::test]
    async fn download_buffers_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/dist/a.zip"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PKzip-bytes".to_vec()))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let url = format!("{}/dist/a.zip", server.uri());
        let body = client.download(&url).await.unwrap();
        assert_eq!(&body[..], b"PKzip-bytes");
    }
}
