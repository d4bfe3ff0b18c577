//! Configuration types for the ragchat service.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{RagChatError, Result};
use crate::traits::ChunkConfig;

/// Main configuration for the ragchat service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RagChatConfig {
    /// Hosted model API configuration.
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Vector index configuration.
    #[serde(default)]
    pub pinecone: PineconeConfig,

    /// Chunking configuration.
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// Assistant behavior configuration.
    #[serde(default)]
    pub assistant: AssistantConfig,

    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
}

/// Hosted model API (embeddings + chat completions) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// API key. Falls back to the OPENAI_API_KEY environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// API base URL.
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,

    /// Embedding model name.
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Dimension of the embedding model's output.
    #[serde(default = "default_embedding_dimension")]
    pub embedding_dimension: usize,

    /// Chat completion model name.
    #[serde(default = "default_chat_model")]
    pub chat_model: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_openai_base_url(),
            embedding_model: default_embedding_model(),
            embedding_dimension: default_embedding_dimension(),
            chat_model: default_chat_model(),
        }
    }
}

impl OpenAiConfig {
    /// Resolve the API key from config or environment.
    pub fn resolve_api_key(&self) -> Result<String> {
        resolve_key(self.api_key.as_deref(), "OPENAI_API_KEY")
    }
}

/// Vector index (Pinecone) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PineconeConfig {
    /// API key. Falls back to the PINECONE_API_KEY environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Control plane base URL.
    #[serde(default = "default_pinecone_base_url")]
    pub base_url: String,

    /// Index name.
    #[serde(default = "default_index_name")]
    pub index_name: String,

    /// Distance metric.
    #[serde(default = "default_metric")]
    pub metric: String,

    /// Serverless cloud provider.
    #[serde(default = "default_cloud")]
    pub cloud: String,

    /// Serverless region.
    #[serde(default = "default_region")]
    pub region: String,
}

impl Default for PineconeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_pinecone_base_url(),
            index_name: default_index_name(),
            metric: default_metric(),
            cloud: default_cloud(),
            region: default_region(),
        }
    }
}

impl PineconeConfig {
    /// Resolve the API key from config or environment.
    pub fn resolve_api_key(&self) -> Result<String> {
        resolve_key(self.api_key.as_deref(), "PINECONE_API_KEY")
    }
}

/// Chunking configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Target chunk length in characters.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Overlap in characters between consecutive hard-split windows.
    #[serde(default = "default_overlap")]
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            overlap: default_overlap(),
        }
    }
}

impl From<&ChunkingConfig> for ChunkConfig {
    fn from(config: &ChunkingConfig) -> Self {
        ChunkConfig::new(config.chunk_size, config.overlap)
    }
}

/// Assistant behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Persona the assistant represents. When set, the assistant answers in
    /// the first person as this persona.
    #[serde(default)]
    pub persona: Option<String>,

    /// Number of matches retrieved per question.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            persona: None,
            top_k: default_top_k(),
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address for the HTTP server.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Directory served at the root path.
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            static_dir: default_static_dir(),
        }
    }
}

// Default value functions

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_embedding_dimension() -> usize {
    1536
}

fn default_chat_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_pinecone_base_url() -> String {
    "https://api.pinecone.io".to_string()
}

fn default_index_name() -> String {
    "ragchat-index".to_string()
}

fn default_metric() -> String {
    "cosine".to_string()
}

fn default_cloud() -> String {
    "aws".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_chunk_size() -> usize {
    500
}

fn default_overlap() -> usize {
    100
}

fn default_top_k() -> usize {
    3
}

fn default_bind_address() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

fn resolve_key(configured: Option<&str>, env_var: &str) -> Result<String> {
    if let Some(key) = configured {
        if !key.is_empty() {
            return Ok(key.to_string());
        }
    }
    match std::env::var(env_var) {
        Ok(key) if !key.is_empty() => Ok(key),
        _ => Err(RagChatError::missing_credential(env_var)),
    }
}

impl RagChatConfig {
    /// Load configuration from file.
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content).map_err(|e| RagChatError::Config {
            message: format!("Failed to parse config: {}", e),
        })?;
        Ok(config)
    }

    /// Load configuration from default paths.
    pub fn load_default() -> Result<Self> {
        // Try user config first
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("ragchat").join("config.toml");
            if user_config.exists() {
                return Self::load(&user_config);
            }
        }

        // Try local config
        let local_config = PathBuf::from("ragchat.toml");
        if local_config.exists() {
            return Self::load(&local_config);
        }

        // Return defaults
        Ok(Self::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RagChatConfig::default();
        assert_eq!(config.openai.embedding_model, "text-embedding-3-small");
        assert_eq!(config.openai.embedding_dimension, 1536);
        assert_eq!(config.openai.chat_model, "gpt-4o-mini");
        assert_eq!(config.pinecone.metric, "cosine");
        assert_eq!(config.chunking.chunk_size, 500);
        assert_eq!(config.chunking.overlap, 100);
        assert_eq!(config.assistant.top_k, 3);
    }

    #[test]
    fn test_chunking_config_conversion() {
        let chunking = ChunkingConfig {
            chunk_size: 800,
            overlap: 200,
        };
        let config = ChunkConfig::from(&chunking);
        assert_eq!(config.chunk_size, 800);
        assert_eq!(config.overlap, 200);
    }

    #[test]
    fn test_partial_config_parses() {
        let config: RagChatConfig = toml::from_str(
            r#"
            [chunking]
            chunk_size = 1000

            [assistant]
            persona = "Alex"
            "#,
        )
        .unwrap();
        assert_eq!(config.chunking.chunk_size, 1000);
        assert_eq!(config.chunking.overlap, 100);
        assert_eq!(config.assistant.persona.as_deref(), Some("Alex"));
        assert_eq!(config.server.bind_address, "0.0.0.0:8000");
    }

    #[test]
    fn test_resolve_key_prefers_config() {
        let openai = OpenAiConfig {
            api_key: Some("sk-test".to_string()),
            ..Default::default()
        };
        assert_eq!(openai.resolve_api_key().unwrap(), "sk-test");
    }
}
