//! ragchat-chunk - Sentence-based text chunking
//!
//! This crate splits document text into overlapping, approximately
//! fixed-size chunks for embedding. Chunks break at sentence boundaries
//! where possible, with a hard character-window fallback for text that has
//! no usable punctuation.
//!
//! # Example
//!
//! ```rust
//! use ragchat_chunk::SentenceChunker;
//! use ragchat_core::{ChunkConfig, Chunker};
//!
//! let chunker = SentenceChunker::new();
//! let chunks = chunker.chunk("Hello world. This is a test.", &ChunkConfig::default()).unwrap();
//! assert_eq!(chunks.len(), 1);
//! ```

mod chunker;
mod sentence;

pub use chunker::SentenceChunker;
pub use sentence::split_sentences;

// Re-export types for convenience
pub use ragchat_core::{ChunkConfig, Chunker};
