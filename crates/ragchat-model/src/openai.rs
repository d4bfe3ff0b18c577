//! OpenAI API client for embeddings and chat completions.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use ragchat_core::{ChatMessage, ChatModel, Embedder, OpenAiConfig, RagChatError, Result};

/// Request timeout; chat completions can take a while.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Client for the OpenAI REST API.
///
/// One handle serves both embedding generation and chat completion, so it
/// implements both [`Embedder`] and [`ChatModel`]. Construct it once at
/// startup and share it via `Arc`.
pub struct OpenAiClient {
    http: Client,
    api_key: String,
    base_url: String,
    embedding_model: String,
    embedding_dimension: usize,
    chat_model: String,
}

impl OpenAiClient {
    /// Create a client from configuration, resolving the API key from the
    /// config or the environment.
    pub fn from_config(config: &OpenAiConfig) -> Result<Self> {
        let api_key = config.resolve_api_key()?;

        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| RagChatError::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            embedding_model: config.embedding_model.clone(),
            embedding_dimension: config.embedding_dimension,
            chat_model: config.chat_model.clone(),
        })
    }

    /// List model IDs available to this API key. Used as a connectivity
    /// check.
    pub async fn list_models(&self) -> Result<Vec<String>> {
        let response = self
            .http
            .get(format!("{}/models", self.base_url))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| RagChatError::http(e.to_string()))?;

        let list: ModelList = Self::read_json(response, "models").await?;
        Ok(list.data.into_iter().map(|m| m.id).collect())
    }

    async fn post_json<B, R>(&self, path: &str, body: &B, context: &str) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| RagChatError::http(e.to_string()))?;

        Self::read_json(response, context).await
    }

    /// Check the status and decode the body, keeping the error body text
    /// when the API rejects the request.
    async fn read_json<R: DeserializeOwned>(response: reqwest::Response, context: &str) -> Result<R> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RagChatError::http(format!(
                "{} request failed with status {}: {}",
                context, status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| RagChatError::http(format!("Failed to decode {} response: {}", context, e)))
    }
}

#[async_trait]
impl Embedder for OpenAiClient {
    async fn embed_documents(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!("Embedding batch of {} texts", texts.len());

        let request = EmbeddingRequest {
            model: &self.embedding_model,
            input: texts,
        };
        let response: EmbeddingResponse = self
            .post_json("/embeddings", &request, "embeddings")
            .await
            .map_err(|e| RagChatError::embedding(e.to_string()))?;

        if response.data.len() != texts.len() {
            return Err(RagChatError::embedding(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                response.data.len()
            )));
        }

        // The API documents response order as input order; sort by the
        // returned index so a reordered response cannot mispair vectors.
        let mut data = response.data;
        data.sort_by_key(|d| d.index);

        Ok(data.into_iter().map(|d| d.embedding).collect())
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        let embeddings = self.embed_documents(&[text]).await?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| RagChatError::embedding("No embedding returned"))
    }

    fn dimension(&self) -> usize {
        self.embedding_dimension
    }
}

#[async_trait]
impl ChatModel for OpenAiClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let request = ChatRequest {
            model: &self.chat_model,
            messages,
        };
        let response: ChatResponse = self
            .post_json("/chat/completions", &request, "chat completion")
            .await
            .map_err(|e| RagChatError::chat(e.to_string()))?;

        response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| RagChatError::chat("No completion choices returned"))
    }
}

// Wire types

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[derive(Deserialize)]
struct ModelList {
    data: Vec<ModelInfo>,
}

#[derive(Deserialize)]
struct ModelInfo {
    id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_request_shape() {
        let request = EmbeddingRequest {
            model: "text-embedding-3-small",
            input: &["first chunk", "second chunk"],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "text-embedding-3-small");
        assert_eq!(json["input"][1], "second chunk");
    }

    #[test]
    fn test_embedding_response_decodes() {
        let json = r#"{
            "object": "list",
            "data": [
                {"object": "embedding", "embedding": [0.1, 0.2], "index": 1},
                {"object": "embedding", "embedding": [0.3, 0.4], "index": 0}
            ],
            "model": "text-embedding-3-small"
        }"#;
        let mut response: EmbeddingResponse = serde_json::from_str(json).unwrap();
        response.data.sort_by_key(|d| d.index);
        assert_eq!(response.data[0].embedding, vec![0.3, 0.4]);
        assert_eq!(response.data[1].embedding, vec![0.1, 0.2]);
    }

    #[test]
    fn test_chat_request_shape() {
        let messages = [ChatMessage::system("be helpful"), ChatMessage::user("hi")];
        let request = ChatRequest {
            model: "gpt-4o-mini",
            messages: &messages,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hi");
    }

    #[test]
    fn test_chat_response_decodes() {
        let json = r#"{
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "Hello!"}}
            ]
        }"#;
        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.choices[0].message.content, "Hello!");
    }

    #[test]
    fn test_from_config_with_configured_key() {
        let config = OpenAiConfig {
            api_key: Some("sk-test".to_string()),
            ..Default::default()
        };
        let client = OpenAiClient::from_config(&config).unwrap();
        assert_eq!(client.dimension(), 1536);
        assert_eq!(client.base_url, "https://api.openai.com/v1");
    }
}
