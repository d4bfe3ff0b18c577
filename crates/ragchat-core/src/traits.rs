//! Core traits defining the interfaces between components.
//!
//! Client handles implementing these traits are constructed at startup and
//! passed into the service explicitly; there are no process-wide singletons.

use async_trait::async_trait;

use crate::error::{RagChatError, Result};
use crate::types::{ChatMessage, IndexStats, QueryMatch, VectorRecord};

/// Embedding model trait.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a batch of document texts, one vector per input, in order.
    async fn embed_documents(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    /// Embed a single query text.
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>>;

    /// Get the embedding dimension.
    fn dimension(&self) -> usize;
}

/// Vector index trait (data plane operations).
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Upsert records into the index. Returns the number of vectors written.
    async fn upsert(&self, records: &[VectorRecord]) -> Result<usize>;

    /// Query the index for the `top_k` nearest vectors, with metadata.
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<QueryMatch>>;

    /// Get index statistics.
    async fn stats(&self) -> Result<IndexStats>;
}

/// Chat completion model trait.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Generate a completion for the given conversation.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String>;
}

/// Chunking configuration.
#[derive(Debug, Clone, Copy)]
pub struct ChunkConfig {
    /// Target chunk length in characters.
    pub chunk_size: usize,

    /// Characters shared between consecutive hard-split windows.
    pub overlap: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            overlap: 100,
        }
    }
}

impl ChunkConfig {
    /// Create a config, without validating.
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        Self {
            chunk_size,
            overlap,
        }
    }

    /// Validate the configuration.
    ///
    /// `chunk_size` must be at least 1 and `overlap` strictly smaller than
    /// `chunk_size`, so the hard-split stride `chunk_size - overlap` is
    /// always positive.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(RagChatError::invalid_configuration(
                "chunk_size must be a positive integer",
            ));
        }
        if self.overlap >= self.chunk_size {
            return Err(RagChatError::invalid_configuration(format!(
                "overlap ({}) must be smaller than chunk_size ({})",
                self.overlap, self.chunk_size
            )));
        }
        Ok(())
    }
}

/// Chunking strategy trait.
pub trait Chunker: Send + Sync {
    /// Split text into an ordered sequence of chunks.
    fn chunk(&self, text: &str, config: &ChunkConfig) -> Result<Vec<String>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_config_default() {
        let config = ChunkConfig::default();
        assert_eq!(config.chunk_size, 500);
        assert_eq!(config.overlap, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_chunk_config_rejects_zero_size() {
        let config = ChunkConfig::new(0, 0);
        assert!(matches!(
            config.validate(),
            Err(RagChatError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_chunk_config_rejects_overlap_at_or_above_size() {
        assert!(ChunkConfig::new(100, 100).validate().is_err());
        assert!(ChunkConfig::new(100, 150).validate().is_err());
        assert!(ChunkConfig::new(100, 99).validate().is_ok());
    }
}
