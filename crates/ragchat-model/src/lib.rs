//! ragchat-model - Hosted model API client
//!
//! This crate wraps the OpenAI REST API for the two model calls the service
//! makes: batched embedding generation and chat completion. It also ships
//! mock implementations so the rest of the workspace can be tested without
//! network access.

mod mock;
mod openai;

pub use mock::{MockChatModel, MockEmbedder};
pub use openai::OpenAiClient;

// Re-export the traits for convenience
pub use ragchat_core::{ChatModel, Embedder};
