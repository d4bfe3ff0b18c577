//! The ingestion and chat service.
//!
//! All client handles are injected at construction and owned by the
//! service; startup code builds them once and the HTTP layer and CLI share
//! the same service object.

use std::sync::Arc;

use tracing::info;

use ragchat_chunk::SentenceChunker;
use ragchat_core::{
    Answer, ChatModel, ChunkConfig, Chunker, Embedder, IndexStats, RagChatConfig, RagChatError,
    Result, VectorIndex, VectorRecord,
};
use ragchat_index::{PineconeClient, PineconeIndex};
use ragchat_model::OpenAiClient;
use ragchat_query::{AnswerConfig, AnswerEngine};

/// Retrieval-augmented chat service over injected component handles.
pub struct RagChatService<E, V, C> {
    /// Embedding model.
    embedder: Arc<E>,

    /// Vector index.
    index: Arc<V>,

    /// Chunker.
    chunker: SentenceChunker,

    /// Answer engine.
    engine: AnswerEngine<E, V, C>,

    /// Chunking parameters.
    chunk_config: ChunkConfig,

    /// Answering parameters.
    answer_config: AnswerConfig,
}

/// The service over live API clients.
pub type LiveService = RagChatService<OpenAiClient, PineconeIndex, OpenAiClient>;

impl<E, V, C> RagChatService<E, V, C>
where
    E: Embedder,
    V: VectorIndex,
    C: ChatModel,
{
    /// Create a service from component handles and configuration.
    pub fn new(embedder: Arc<E>, index: Arc<V>, chat: Arc<C>, config: &RagChatConfig) -> Self {
        let engine = AnswerEngine::new(embedder.clone(), index.clone(), chat);

        Self {
            embedder,
            index,
            chunker: SentenceChunker::new(),
            engine,
            chunk_config: ChunkConfig::from(&config.chunking),
            answer_config: AnswerConfig {
                top_k: config.assistant.top_k,
                persona: config.assistant.persona.clone(),
            },
        }
    }

    /// Ingest one document: decode, chunk, embed, upsert.
    ///
    /// Returns the number of chunks written to the index. Vector ids are
    /// `{filename}-{chunk_index}` so re-uploading a file overwrites its
    /// previous vectors.
    pub async fn upload_document(&self, filename: &str, bytes: &[u8]) -> Result<usize> {
        let text = std::str::from_utf8(bytes).map_err(|_| RagChatError::UnsupportedDocument {
            name: filename.to_string(),
            reason: "file is not valid UTF-8 text".to_string(),
        })?;

        let chunks = self.chunker.chunk(text, &self.chunk_config)?;
        if chunks.is_empty() {
            info!("Document '{}' produced no chunks", filename);
            return Ok(0);
        }

        let chunk_refs: Vec<&str> = chunks.iter().map(String::as_str).collect();
        let embeddings = self.embedder.embed_documents(&chunk_refs).await?;

        let records: Vec<VectorRecord> = chunks
            .iter()
            .zip(embeddings)
            .enumerate()
            .map(|(i, (text, values))| VectorRecord::new(filename, i, text, values))
            .collect();

        let count = self.index.upsert(&records).await?;

        info!("Ingested '{}' as {} chunks", filename, records.len());

        Ok(count)
    }

    /// Answer a question from the indexed documents.
    pub async fn chat(&self, message: &str) -> Result<Answer> {
        self.engine.ask(message, &self.answer_config).await
    }

    /// Get the answer engine, for retrieval without generation.
    pub fn engine(&self) -> &AnswerEngine<E, V, C> {
        &self.engine
    }

    /// Get index statistics.
    pub async fn index_stats(&self) -> Result<IndexStats> {
        self.index.stats().await
    }
}

/// Build the live service: construct both API clients, make sure the index
/// exists, and resolve its data plane host.
pub async fn connect(config: &RagChatConfig) -> Result<LiveService> {
    let openai = Arc::new(OpenAiClient::from_config(&config.openai)?);

    let pinecone = PineconeClient::from_config(&config.pinecone)?;
    pinecone
        .ensure_index(&config.pinecone, config.openai.embedding_dimension)
        .await?;
    let index = Arc::new(pinecone.index(&config.pinecone.index_name).await?);

    Ok(RagChatService::new(
        openai.clone(),
        index,
        openai,
        config,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ragchat_index::MemoryIndex;
    use ragchat_model::{MockChatModel, MockEmbedder};

    fn mock_service() -> RagChatService<MockEmbedder, MemoryIndex, MockChatModel> {
        let config = RagChatConfig::default();
        RagChatService::new(
            Arc::new(MockEmbedder::with_dimension(64)),
            Arc::new(MemoryIndex::new(64)),
            Arc::new(MockChatModel::with_reply("It was a compiler project.")),
            &config,
        )
    }

    #[tokio::test]
    async fn test_upload_and_chat_round_trip() {
        let service = mock_service();

        let text = "I spent last year building a compiler. It lowers a typed \
                    AST to bytecode. The register allocator was the hard part.";
        let count = service
            .upload_document("projects.txt", text.as_bytes())
            .await
            .unwrap();
        assert!(count >= 1);

        let stats = service.index_stats().await.unwrap();
        assert_eq!(stats.total_vector_count, count as u64);

        let answer = service.chat("What did you build?").await.unwrap();
        assert_eq!(answer.response, "It was a compiler project.");
        assert_eq!(answer.sources, vec!["projects.txt"]);
    }

    #[tokio::test]
    async fn test_upload_rejects_non_utf8() {
        let service = mock_service();

        let err = service
            .upload_document("image.png", &[0xFF, 0xFE, 0x00, 0x80])
            .await
            .unwrap_err();
        assert!(matches!(err, RagChatError::UnsupportedDocument { .. }));
    }

    #[tokio::test]
    async fn test_upload_empty_document_is_a_noop() {
        let service = mock_service();

        let count = service.upload_document("empty.txt", b"").await.unwrap();
        assert_eq!(count, 0);

        let stats = service.index_stats().await.unwrap();
        assert_eq!(stats.total_vector_count, 0);
    }

    #[tokio::test]
    async fn test_reupload_overwrites_vectors() {
        let service = mock_service();

        service
            .upload_document("doc.txt", b"First version of the document.")
            .await
            .unwrap();
        service
            .upload_document("doc.txt", b"Second version of the document.")
            .await
            .unwrap();

        // Same id scheme, so the second upload replaced the first.
        let stats = service.index_stats().await.unwrap();
        assert_eq!(stats.total_vector_count, 1);
    }
}
