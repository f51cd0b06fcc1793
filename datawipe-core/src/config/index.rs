//! Search-index configuration.

use crate::error::WipeError;
use std::time::Duration;
use url::Url;

/// Where the search index accepts document operations, and which cluster to
/// scope them to.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Document endpoint that accepts selection-based deletes
    pub document_endpoint: Url,
    /// Index (cluster) name sent as the `cluster` parameter
    pub index_name: String,
    /// Connect timeout for the HTTP client
    pub connect_timeout: Duration,
    /// Whole-request timeout; selection deletes over large indexes are slow
    pub request_timeout: Duration,
}

impl IndexConfig {
    /// Default index name.
    pub const DEFAULT_INDEX_NAME: &'static str = "danswer_index";

    /// Creates a config for an explicit document endpoint.
    pub fn new(document_endpoint: Url, index_name: impl Into<String>) -> Self {
        Self {
            document_endpoint,
            index_name: index_name.into(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(60),
        }
    }

    /// Derives the document endpoint from the index host and port:
    /// `http://<host>:<port>/document/v1/default/<index>/docid`.
    ///
    /// # Errors
    /// Returns a configuration error if host or index name do not form a
    /// valid URL.
    pub fn for_host(host: &str, port: u16, index_name: &str) -> crate::Result<Self> {
        let endpoint = format!(
            "http://{}:{}/document/v1/default/{}/docid",
            host, port, index_name
        );
        let document_endpoint = Url::parse(&endpoint).map_err(|e| {
            WipeError::configuration(format!("Invalid index endpoint {}: {}", endpoint, e))
        })?;
        Ok(Self::new(document_endpoint, index_name))
    }

    /// Builder method to set the request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Validates the index configuration.
    ///
    /// # Errors
    /// Returns error if the endpoint is not http(s), the index name is
    /// empty, or a timeout is zero.
    pub fn validate(&self) -> crate::Result<()> {
        if !matches!(self.document_endpoint.scheme(), "http" | "https") {
            return Err(WipeError::configuration(
                "Index document endpoint must use http:// or https://",
            ));
        }

        if self.index_name.trim().is_empty() {
            return Err(WipeError::configuration("index name cannot be empty"));
        }

        if self.connect_timeout.is_zero() || self.request_timeout.is_zero() {
            return Err(WipeError::configuration(
                "index timeouts must be greater than 0",
            ));
        }

        Ok(())
    }
}
