//! ragchat-index - Managed vector index client
//!
//! This crate talks to the Pinecone REST API: the control plane for index
//! lifecycle (list/create/delete/describe) and the data plane for vector
//! operations (upsert/query/stats). An in-memory cosine index backs tests
//! and offline runs.

mod memory;
mod pinecone;

pub use memory::MemoryIndex;
pub use pinecone::{IndexDescription, PineconeClient, PineconeIndex};

// Re-export the trait for convenience
pub use ragchat_core::VectorIndex;
