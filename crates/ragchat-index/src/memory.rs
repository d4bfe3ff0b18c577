//! In-memory vector index.
//!
//! Cosine-similarity index over a plain map, for tests and offline runs.
//! Implements the same [`VectorIndex`] trait as the remote client.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use ragchat_core::{
    IndexStats, QueryMatch, RagChatError, Result, VectorIndex, VectorRecord,
};

/// In-process vector index with cosine scoring.
pub struct MemoryIndex {
    dimension: usize,
    vectors: RwLock<HashMap<String, VectorRecord>>,
}

impl MemoryIndex {
    /// Create an empty index with the given dimension.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            vectors: RwLock::new(HashMap::new()),
        }
    }

    fn cosine(a: &[f32], b: &[f32]) -> f32 {
        let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }
        dot / (norm_a * norm_b)
    }

    fn lock_err() -> RagChatError {
        RagChatError::internal("Memory index lock poisoned")
    }
}

#[async_trait]
impl VectorIndex for MemoryIndex {
    async fn upsert(&self, records: &[VectorRecord]) -> Result<usize> {
        let mut vectors = self.vectors.write().map_err(|_| Self::lock_err())?;
        for record in records {
            vectors.insert(record.id.clone(), record.clone());
        }
        Ok(records.len())
    }

    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<QueryMatch>> {
        let vectors = self.vectors.read().map_err(|_| Self::lock_err())?;

        let mut matches: Vec<QueryMatch> = vectors
            .values()
            .map(|record| QueryMatch {
                id: record.id.clone(),
                score: Self::cosine(vector, &record.values),
                metadata: Some(record.metadata.clone()),
            })
            .collect();

        matches.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        matches.truncate(top_k);

        Ok(matches)
    }

    async fn stats(&self) -> Result<IndexStats> {
        let vectors = self.vectors.read().map_err(|_| Self::lock_err())?;
        Ok(IndexStats {
            total_vector_count: vectors.len() as u64,
            dimension: self.dimension,
            index_fullness: 0.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, values: Vec<f32>) -> VectorRecord {
        VectorRecord {
            id: id.to_string(),
            values,
            metadata: ragchat_core::VectorMetadata {
                text: format!("text for {}", id),
                filename: "doc.txt".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_upsert_and_stats() {
        let index = MemoryIndex::new(3);
        let count = index
            .upsert(&[record("a-0", vec![1.0, 0.0, 0.0]), record("a-1", vec![0.0, 1.0, 0.0])])
            .await
            .unwrap();
        assert_eq!(count, 2);

        let stats = index.stats().await.unwrap();
        assert_eq!(stats.total_vector_count, 2);
        assert_eq!(stats.dimension, 3);
    }

    #[tokio::test]
    async fn test_upsert_replaces_existing_id() {
        let index = MemoryIndex::new(2);
        index.upsert(&[record("a-0", vec![1.0, 0.0])]).await.unwrap();
        index.upsert(&[record("a-0", vec![0.0, 1.0])]).await.unwrap();

        let stats = index.stats().await.unwrap();
        assert_eq!(stats.total_vector_count, 1);
    }

    #[tokio::test]
    async fn test_query_ranks_by_cosine() {
        let index = MemoryIndex::new(2);
        index
            .upsert(&[
                record("aligned", vec![1.0, 0.0]),
                record("orthogonal", vec![0.0, 1.0]),
                record("diagonal", vec![1.0, 1.0]),
            ])
            .await
            .unwrap();

        let matches = index.query(&[1.0, 0.0], 2).await.unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].id, "aligned");
        assert!((matches[0].score - 1.0).abs() < 1e-6);
        assert_eq!(matches[1].id, "diagonal");
        assert!(matches[0].metadata.is_some());
    }

    #[tokio::test]
    async fn test_query_empty_index() {
        let index = MemoryIndex::new(2);
        let matches = index.query(&[1.0, 0.0], 5).await.unwrap();
        assert!(matches.is_empty());
    }
}
