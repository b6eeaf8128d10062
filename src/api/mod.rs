//! Data fetcher for the extension server's `dag` endpoint.
//!
//! [`DagSource`] is the seam the panel factory depends on; [`HttpDagSource`]
//! is the production implementation and [`StaticDagSource`] serves a list
//! already in memory (offline input, tests).

use async_trait::async_trait;

use crate::config::ApiConfig;
use crate::error::FetchError;
use crate::model::NodeDescriptor;

/// Path of the graph endpoint, relative to the API base.
pub const DAG_ENDPOINT: &str = "dag";

/// Anything that can produce the pipeline node list.
#[async_trait]
pub trait DagSource: Send + Sync {
    /// Fetch the node list once. Implementations must not retry.
    async fn fetch_dag(&self) -> Result<Vec<NodeDescriptor>, FetchError>;
}

/// Fetches the node list over HTTP with a single GET.
#[cfg(not(target_arch = "wasm32"))]
pub struct HttpDagSource {
    client: reqwest::Client,
    api: ApiConfig,
}

#[cfg(not(target_arch = "wasm32"))]
impl HttpDagSource {
    pub fn new(api: ApiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api,
        }
    }

    /// Use an existing client (shared connection pool, custom timeouts).
    pub fn with_client(client: reqwest::Client, api: ApiConfig) -> Self {
        Self { client, api }
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[async_trait]
impl DagSource for HttpDagSource {
    async fn fetch_dag(&self) -> Result<Vec<NodeDescriptor>, FetchError> {
        let url = self.api.endpoint(DAG_ENDPOINT)?;
        tracing::debug!(url = %url, "requesting pipeline graph");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })?;
        let nodes: Vec<NodeDescriptor> =
            serde_json::from_str(&body).map_err(|e| FetchError::Decode {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        tracing::debug!(url = %url, nodes = nodes.len(), "pipeline graph received");
        Ok(nodes)
    }
}

/// Serves a node list that is already in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticDagSource {
    nodes: Vec<NodeDescriptor>,
}

impl StaticDagSource {
    pub fn new(nodes: Vec<NodeDescriptor>) -> Self {
        Self { nodes }
    }
}

#[async_trait]
impl DagSource for StaticDagSource {
    async fn fetch_dag(&self) -> Result<Vec<NodeDescriptor>, FetchError> {
        Ok(self.nodes.clone())
    }
}
