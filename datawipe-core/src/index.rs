//! Search-index wipe.
//!
//! Deletes every document in one index cluster with a single selection-based
//! `DELETE` request. There is no retry and no dry-run; a non-2xx answer is
//! returned as [`WipeError::IndexStatus`].

use crate::Result;
use crate::config::IndexConfig;
use crate::error::WipeError;
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

/// Longest response body excerpt kept in an error.
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Response body of a selection delete. Every field is optional because the
/// service only fills them in for some requests.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeletionResponse {
    #[serde(default)]
    document_count: Option<u64>,
    #[serde(default)]
    continuation: Option<String>,
}

/// Removes all documents from the configured index cluster.
#[derive(Debug, Clone)]
pub struct IndexWiper {
    client: reqwest::Client,
    endpoint: Url,
    index_name: String,
}

impl IndexWiper {
    /// Builds the HTTP client for `config`.
    ///
    /// # Errors
    /// Returns a configuration error if `config` fails validation or the
    /// client cannot be constructed.
    pub fn new(config: &IndexConfig) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .user_agent(concat!("datawipe/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| {
                WipeError::configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            endpoint: config.document_endpoint.clone(),
            index_name: config.index_name.clone(),
        })
    }

    /// Query parameters sent with the delete: a match-all selection scoped
    /// to the configured cluster.
    pub fn deletion_query(&self) -> [(&'static str, &str); 2] {
        [("selection", "true"), ("cluster", self.index_name.as_str())]
    }

    /// Deletes every document in the cluster.
    ///
    /// # Errors
    /// - [`WipeError::IndexUnreachable`] if the request could not be sent
    /// - [`WipeError::IndexStatus`] if the index answered with a non-2xx status
    pub async fn wipe(&self) -> Result<()> {
        debug!(
            endpoint = %self.endpoint,
            cluster = %self.index_name,
            "Deleting all documents from search index"
        );

        let response = self
            .client
            .delete(self.endpoint.clone())
            .query(&self.deletion_query())
            .send()
            .await
            .map_err(|e| WipeError::IndexUnreachable {
                context: format!("DELETE {}", self.endpoint),
                source: e,
            })?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(WipeError::IndexStatus {
                status,
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let summary: DeletionResponse = serde_json::from_str(&body).unwrap_or_default();
        if let Some(count) = summary.document_count {
            debug!(documents = count, "Index reported deleted documents");
        }
        if summary.continuation.is_some() {
            info!(
                cluster = %self.index_name,
                "Index returned a continuation token; some documents may remain"
            );
        }

        Ok(())
    }
}
