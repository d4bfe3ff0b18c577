//! Answer engine: retrieve relevant chunks and generate a response.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use ragchat_core::{Answer, ChatMessage, ChatModel, Embedder, QueryMatch, Result, VectorIndex};

use crate::prompt::{build_context, system_prompt};

/// Configuration for answering a question.
#[derive(Debug, Clone)]
pub struct AnswerConfig {
    /// Number of matches retrieved as context.
    pub top_k: usize,

    /// Persona the assistant represents, if any.
    pub persona: Option<String>,
}

impl Default for AnswerConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            persona: None,
        }
    }
}

/// Retrieval-augmented answer engine.
///
/// Embeds the question, queries the vector index, assembles the retrieved
/// chunks into a context block, and asks the chat model to answer from it.
pub struct AnswerEngine<E, V, C> {
    /// Embedding model.
    embedder: Arc<E>,

    /// Vector index.
    index: Arc<V>,

    /// Chat model.
    chat: Arc<C>,
}

impl<E, V, C> AnswerEngine<E, V, C>
where
    E: Embedder,
    V: VectorIndex,
    C: ChatModel,
{
    /// Create a new answer engine.
    pub fn new(embedder: Arc<E>, index: Arc<V>, chat: Arc<C>) -> Self {
        Self {
            embedder,
            index,
            chat,
        }
    }

    /// Answer a question using retrieved context.
    pub async fn ask(&self, message: &str, config: &AnswerConfig) -> Result<Answer> {
        let start = Instant::now();

        info!("Answering: {:?}", message);

        let query_embedding = self.embedder.embed_query(message).await?;
        let matches = self.index.query(&query_embedding, config.top_k).await?;

        debug!("Retrieved {} matches", matches.len());

        let (context, sources) = build_context(&matches);
        let messages = [
            ChatMessage::system(system_prompt(config.persona.as_deref(), &context)),
            ChatMessage::user(message),
        ];

        let response = self.chat.complete(&messages).await?;

        info!(
            "Answered in {}ms using {} sources",
            start.elapsed().as_millis(),
            sources.len()
        );

        Ok(Answer { response, sources })
    }

    /// Retrieve matches for a query without generating an answer.
    pub async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<QueryMatch>> {
        let query_embedding = self.embedder.embed_query(query).await?;
        self.index.query(&query_embedding, top_k).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ragchat_core::VectorRecord;
    use ragchat_index::MemoryIndex;
    use ragchat_model::{MockChatModel, MockEmbedder};

    async fn seeded_engine() -> AnswerEngine<MockEmbedder, MemoryIndex, MockChatModel> {
        let embedder = Arc::new(MockEmbedder::with_dimension(64));
        let index = Arc::new(MemoryIndex::new(64));
        let chat = Arc::new(MockChatModel::with_reply("Based on the documents, yes."));

        let texts = [
            ("projects.txt", "I built a distributed search engine."),
            ("projects.txt", "I also maintain an open source parser."),
            ("bio.txt", "Based in Amsterdam, working on infrastructure."),
        ];
        for (i, (filename, text)) in texts.into_iter().enumerate() {
            let values = embedder.embed_documents(&[text]).await.unwrap().remove(0);
            let record = VectorRecord::new(filename, i, text, values);
            index.upsert(&[record]).await.unwrap();
        }

        AnswerEngine::new(embedder, index, chat)
    }

    #[tokio::test]
    async fn test_ask_returns_answer_with_sources() {
        let engine = seeded_engine().await;

        let answer = engine
            .ask("What did you build?", &AnswerConfig::default())
            .await
            .unwrap();

        assert_eq!(answer.response, "Based on the documents, yes.");
        assert!(!answer.sources.is_empty());
        assert!(answer.sources.len() <= 2, "sources must be deduplicated");
        for source in &answer.sources {
            assert!(source.ends_with(".txt"));
        }
    }

    #[tokio::test]
    async fn test_ask_with_empty_index_still_answers() {
        let embedder = Arc::new(MockEmbedder::with_dimension(8));
        let index = Arc::new(MemoryIndex::new(8));
        let chat = Arc::new(MockChatModel::with_reply("I don't know."));
        let engine = AnswerEngine::new(embedder, index, chat);

        let answer = engine
            .ask("Anything?", &AnswerConfig::default())
            .await
            .unwrap();
        assert_eq!(answer.response, "I don't know.");
        assert!(answer.sources.is_empty());
    }

    #[tokio::test]
    async fn test_retrieve_respects_top_k() {
        let engine = seeded_engine().await;

        let matches = engine.retrieve("parser", 2).await.unwrap();
        assert_eq!(matches.len(), 2);
        assert!(matches[0].score >= matches[1].score);
    }
}
