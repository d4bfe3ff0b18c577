//! ragchat-query - Retrieval and answer engine
//!
//! This crate turns a user question into a retrieval-augmented answer:
//! embed the question, query the vector index, assemble the retrieved
//! chunks into a context block with their sources, and ask the chat model
//! to answer from that context.
//!
//! # Example
//!
//! ```rust,ignore
//! use ragchat_query::{AnswerConfig, AnswerEngine};
//! use std::sync::Arc;
//!
//! let engine = AnswerEngine::new(Arc::new(embedder), Arc::new(index), Arc::new(chat));
//! let answer = engine.ask("What did I work on?", &AnswerConfig::default()).await?;
//! ```

mod engine;
mod prompt;

pub use engine::{AnswerConfig, AnswerEngine};
pub use prompt::{build_context, system_prompt};

// Re-export for convenience
pub use ragchat_core::{Answer, QueryMatch};
