//! Mock model implementations for testing without API access.

use async_trait::async_trait;

use ragchat_core::{ChatMessage, ChatModel, Embedder, RagChatError, Result};

/// A mock embedder producing deterministic vectors from a text hash.
pub struct MockEmbedder {
    dimension: usize,
}

impl MockEmbedder {
    /// Create a mock embedder with the default dimension.
    pub fn new() -> Self {
        Self { dimension: 1536 }
    }

    /// Create a mock embedder with a custom dimension.
    pub fn with_dimension(dimension: usize) -> Self {
        Self { dimension }
    }
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Embedder for MockEmbedder {
    async fn embed_documents(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        // Deterministic embeddings based on a text hash
        Ok(texts
            .iter()
            .map(|text| {
                let hash = text.bytes().fold(0u64, |acc, b| acc.wrapping_add(b as u64));
                let mut embedding = vec![0.0f32; self.dimension];
                for (i, v) in embedding.iter_mut().enumerate() {
                    *v = ((hash.wrapping_mul(i as u64 + 1)) as f32 % 1000.0) / 1000.0 - 0.5;
                }
                // L2 normalize
                let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
                if norm > 0.0 {
                    for x in &mut embedding {
                        *x /= norm;
                    }
                }
                embedding
            })
            .collect())
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        let results = self.embed_documents(&[text]).await?;
        results
            .into_iter()
            .next()
            .ok_or_else(|| RagChatError::embedding("No embedding returned"))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// A mock chat model returning a canned reply.
pub struct MockChatModel {
    reply: String,
}

impl MockChatModel {
    /// Create a mock that replies with the given text.
    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

#[async_trait]
impl ChatModel for MockChatModel {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        if messages.is_empty() {
            return Err(RagChatError::chat("No messages provided"));
        }
        Ok(self.reply.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_embedder_dimensions() {
        let embedder = MockEmbedder::with_dimension(64);
        let embeddings = embedder
            .embed_documents(&["Hello world", "Rust is great"])
            .await
            .unwrap();

        assert_eq!(embeddings.len(), 2);
        assert_eq!(embeddings[0].len(), 64);

        // Check L2 normalization
        let norm: f32 = embeddings[0].iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 0.01);
    }

    #[tokio::test]
    async fn test_deterministic_embeddings() {
        let embedder = MockEmbedder::new();

        let e1 = embedder.embed_query("consistent input").await.unwrap();
        let e2 = embedder.embed_query("consistent input").await.unwrap();
        assert_eq!(e1, e2);
    }

    #[tokio::test]
    async fn test_different_texts_different_embeddings() {
        let embedder = MockEmbedder::new();

        let e1 = embedder.embed_query("hello").await.unwrap();
        let e2 = embedder.embed_query("world").await.unwrap();
        assert_ne!(e1, e2);
    }

    #[tokio::test]
    async fn test_mock_chat_model() {
        let chat = MockChatModel::with_reply("canned answer");
        let reply = chat
            .complete(&[ChatMessage::user("anything")])
            .await
            .unwrap();
        assert_eq!(reply, "canned answer");
    }

    #[tokio::test]
    async fn test_mock_chat_model_rejects_empty_conversation() {
        let chat = MockChatModel::with_reply("canned answer");
        assert!(chat.complete(&[]).await.is_err());
    }
}
