//! Core domain types for the ragchat service.

use serde::{Deserialize, Serialize};

/// Metadata stored alongside each vector in the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorMetadata {
    /// The chunk text, stored so retrieval can reconstruct context.
    pub text: String,

    /// Originating document filename.
    pub filename: String,
}

/// A vector ready for upsert into the index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorRecord {
    /// Vector identifier, `{filename}-{chunk_index}`.
    pub id: String,

    /// Embedding values.
    pub values: Vec<f32>,

    /// Chunk metadata.
    pub metadata: VectorMetadata,
}

impl VectorRecord {
    /// Build a record for the `chunk_index`-th chunk of `filename`.
    pub fn new(filename: &str, chunk_index: usize, text: &str, values: Vec<f32>) -> Self {
        Self {
            id: format!("{}-{}", filename, chunk_index),
            values,
            metadata: VectorMetadata {
                text: text.to_string(),
                filename: filename.to_string(),
            },
        }
    }
}

/// A single match returned by a vector index query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryMatch {
    /// Vector identifier.
    pub id: String,

    /// Similarity score (higher is better for cosine).
    pub score: f32,

    /// Metadata, present when the query asked for it.
    #[serde(default)]
    pub metadata: Option<VectorMetadata>,
}

/// Statistics reported by the vector index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStats {
    /// Total number of vectors stored.
    #[serde(default)]
    pub total_vector_count: u64,

    /// Index dimension.
    #[serde(default)]
    pub dimension: usize,

    /// Fraction of index capacity in use.
    #[serde(default)]
    pub index_fullness: f32,
}

/// A retrieval-augmented answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    /// The generated response text.
    pub response: String,

    /// Unique source filenames that contributed context, first-seen order.
    pub sources: Vec<String>,
}

/// Message role in a chat conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A chat message sent to or received from the chat model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message role.
    pub role: Role,

    /// Message content.
    pub content: String,
}

impl ChatMessage {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_record_id() {
        let record = VectorRecord::new("resume.txt", 3, "some chunk", vec![0.1, 0.2]);
        assert_eq!(record.id, "resume.txt-3");
        assert_eq!(record.metadata.filename, "resume.txt");
        assert_eq!(record.metadata.text, "some chunk");
    }

    #[test]
    fn test_role_serialization() {
        let msg = ChatMessage::system("hello");
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"role":"system","content":"hello"}"#);
    }

    #[test]
    fn test_index_stats_camel_case() {
        let json = r#"{"totalVectorCount": 42, "dimension": 1536, "indexFullness": 0.0}"#;
        let stats: IndexStats = serde_json::from_str(json).unwrap();
        assert_eq!(stats.total_vector_count, 42);
        assert_eq!(stats.dimension, 1536);
    }

    #[test]
    fn test_query_match_without_metadata() {
        let json = r#"{"id": "a-0", "score": 0.9}"#;
        let m: QueryMatch = serde_json::from_str(json).unwrap();
        assert!(m.metadata.is_none());
    }
}
