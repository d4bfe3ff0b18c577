//! Pinecone REST API client.
//!
//! Split the way the API is split: [`PineconeClient`] talks to the control
//! plane (index lifecycle), and [`PineconeIndex`] is a data plane handle
//! bound to one index host (upsert/query/stats). The host is resolved once
//! when the handle is created, at service startup.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use ragchat_core::{
    IndexStats, PineconeConfig, QueryMatch, RagChatError, Result, VectorIndex, VectorRecord,
};

/// REST API version header value.
const API_VERSION: &str = "2025-01";

/// Vectors per upsert request.
const UPSERT_BATCH_SIZE: usize = 100;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Control plane client for index lifecycle operations.
pub struct PineconeClient {
    http: Client,
    api_key: String,
    base_url: String,
}

/// Description of an index as returned by the control plane.
#[derive(Debug, Clone, Deserialize)]
pub struct IndexDescription {
    /// Index name.
    pub name: String,

    /// Index dimension.
    #[serde(default)]
    pub dimension: usize,

    /// Distance metric.
    #[serde(default)]
    pub metric: String,

    /// Data plane host, without scheme.
    #[serde(default)]
    pub host: Option<String>,
}

impl PineconeClient {
    /// Create a client from configuration, resolving the API key from the
    /// config or the environment.
    pub fn from_config(config: &PineconeConfig) -> Result<Self> {
        let api_key = config.resolve_api_key()?;

        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| RagChatError::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// List all indexes.
    pub async fn list_indexes(&self) -> Result<Vec<IndexDescription>> {
        let response = self
            .http
            .get(format!("{}/indexes", self.base_url))
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
            .send()
            .await
            .map_err(|e| RagChatError::http(e.to_string()))?;

        let list: IndexList = read_json(response, "list indexes").await?;
        Ok(list.indexes)
    }

    /// Create a serverless index with the configured name, metric, cloud
    /// and region.
    pub async fn create_index(&self, config: &PineconeConfig, dimension: usize) -> Result<()> {
        info!("Creating index '{}'", config.index_name);

        let request = CreateIndexRequest {
            name: &config.index_name,
            dimension,
            metric: &config.metric,
            spec: IndexSpec {
                serverless: ServerlessSpec {
                    cloud: &config.cloud,
                    region: &config.region,
                },
            },
        };

        let response = self
            .http
            .post(format!("{}/indexes", self.base_url))
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| RagChatError::http(e.to_string()))?;

        check_status(response, "create index").await?;
        Ok(())
    }

    /// Delete an index by name.
    pub async fn delete_index(&self, name: &str) -> Result<()> {
        info!("Deleting index '{}'", name);

        let response = self
            .http
            .delete(format!("{}/indexes/{}", self.base_url, name))
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
            .send()
            .await
            .map_err(|e| RagChatError::http(e.to_string()))?;

        if response.status().as_u16() == 404 {
            return Err(RagChatError::IndexNotFound {
                name: name.to_string(),
            });
        }
        check_status(response, "delete index").await?;
        Ok(())
    }

    /// Describe an index by name.
    pub async fn describe_index(&self, name: &str) -> Result<IndexDescription> {
        let response = self
            .http
            .get(format!("{}/indexes/{}", self.base_url, name))
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
            .send()
            .await
            .map_err(|e| RagChatError::http(e.to_string()))?;

        if response.status().as_u16() == 404 {
            return Err(RagChatError::IndexNotFound {
                name: name.to_string(),
            });
        }
        read_json(response, "describe index").await
    }

    /// Create the configured index if it does not already exist.
    ///
    /// Creation failure is logged as a warning, not returned.
    pub async fn ensure_index(&self, config: &PineconeConfig, dimension: usize) -> Result<()> {
        let existing = self.list_indexes().await?;
        if existing.iter().any(|i| i.name == config.index_name) {
            return Ok(());
        }

        if let Err(e) = self.create_index(config, dimension).await {
            warn!("Index creation warning: {}", e);
        }
        Ok(())
    }

    /// Resolve a data plane handle for the named index.
    pub async fn index(&self, name: &str) -> Result<PineconeIndex> {
        let description = self.describe_index(name).await?;
        let host = description.host.ok_or_else(|| {
            RagChatError::vector_index(format!("Index '{}' has no host yet", name))
        })?;

        Ok(PineconeIndex {
            http: self.http.clone(),
            api_key: self.api_key.clone(),
            base_url: format!("https://{}", host),
        })
    }
}

/// Data plane handle bound to a single index host.
pub struct PineconeIndex {
    http: Client,
    api_key: String,
    base_url: String,
}

impl PineconeIndex {
    async fn post_json<B, R>(&self, path: &str, body: &B, context: &str) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
            .json(body)
            .send()
            .await
            .map_err(|e| RagChatError::http(e.to_string()))?;

        read_json(response, context).await
    }
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    async fn upsert(&self, records: &[VectorRecord]) -> Result<usize> {
        let mut upserted = 0;

        for batch in records.chunks(UPSERT_BATCH_SIZE) {
            let request = UpsertRequest { vectors: batch };
            let response: UpsertResponse = self
                .post_json("/vectors/upsert", &request, "upsert")
                .await
                .map_err(|e| RagChatError::vector_index(e.to_string()))?;
            upserted += response.upserted_count;

            debug!("Upserted batch of {} vectors", batch.len());
        }

        Ok(upserted)
    }

    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<QueryMatch>> {
        let request = QueryRequest {
            vector,
            top_k,
            include_metadata: true,
        };
        let response: QueryResponse = self
            .post_json("/query", &request, "query")
            .await
            .map_err(|e| RagChatError::vector_index(e.to_string()))?;

        Ok(response.matches)
    }

    async fn stats(&self) -> Result<IndexStats> {
        self.post_json("/describe_index_stats", &serde_json::json!({}), "index stats")
            .await
            .map_err(|e| RagChatError::vector_index(e.to_string()))
    }
}

async fn check_status(response: reqwest::Response, context: &str) -> Result<()> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(RagChatError::vector_index(format!(
        "{} request failed with status {}: {}",
        context, status, body
    )))
}

async fn read_json<R: DeserializeOwned>(response: reqwest::Response, context: &str) -> Result<R> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(RagChatError::vector_index(format!(
            "{} request failed with status {}: {}",
            context, status, body
        )));
    }

    response
        .json()
        .await
        .map_err(|e| RagChatError::vector_index(format!("Failed to decode {} response: {}", context, e)))
}

// Wire types

#[derive(Deserialize)]
struct IndexList {
    #[serde(default)]
    indexes: Vec<IndexDescription>,
}

#[derive(Serialize)]
struct CreateIndexRequest<'a> {
    name: &'a str,
    dimension: usize,
    metric: &'a str,
    spec: IndexSpec<'a>,
}

#[derive(Serialize)]
struct IndexSpec<'a> {
    serverless: ServerlessSpec<'a>,
}

#[derive(Serialize)]
struct ServerlessSpec<'a> {
    cloud: &'a str,
    region: &'a str,
}

#[derive(Serialize)]
struct UpsertRequest<'a> {
    vectors: &'a [VectorRecord],
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpsertResponse {
    #[serde(default)]
    upserted_count: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}
