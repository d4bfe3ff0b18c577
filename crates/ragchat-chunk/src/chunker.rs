//! Sentence-based text chunker.
//!
//! Two passes: greedily pack whole sentences into chunks of roughly
//! `chunk_size` characters, then hard-split any chunk that still exceeds
//! 1.5x `chunk_size` (punctuation-free input) into overlapping character
//! windows.

use ragchat_core::{ChunkConfig, Chunker, Result};
use tracing::debug;

use crate::sentence::split_sentences;

/// Chunker that prefers sentence boundaries and falls back to hard
/// character windows for oversized chunks.
///
/// Overlap is applied only within the hard-split fallback; on the
/// sentence-packed path each chunk starts strictly after the previous one
/// ends. All lengths are counted in characters, not bytes.
pub struct SentenceChunker;

impl SentenceChunker {
    /// Create a new sentence chunker.
    pub fn new() -> Self {
        Self
    }

    /// Greedily accumulate sentences into chunks, joined by single spaces.
    ///
    /// A chunk closes when appending the next sentence would push it past
    /// `chunk_size`; the joining space is not counted in that check. Closed
    /// chunks are trimmed, and a chunk that trims to nothing is dropped.
    fn pack_sentences(&self, text: &str, chunk_size: usize) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current = String::new();
        let mut current_len = 0;

        for sentence in split_sentences(text) {
            let sentence_len = sentence.chars().count();

            if !current.is_empty() && current_len + sentence_len > chunk_size {
                Self::push_trimmed(&mut chunks, &current);
                current.clear();
                current.push_str(sentence);
                current_len = sentence_len;
            } else if current.is_empty() {
                current.push_str(sentence);
                current_len = sentence_len;
            } else {
                current.push(' ');
                current.push_str(sentence);
                current_len += 1 + sentence_len;
            }
        }

        if !current.is_empty() {
            Self::push_trimmed(&mut chunks, &current);
        }

        chunks
    }

    fn push_trimmed(chunks: &mut Vec<String>, chunk: &str) {
        let trimmed = chunk.trim();
        if !trimmed.is_empty() {
            chunks.push(trimmed.to_string());
        }
    }

    /// Slice an oversized chunk into raw character windows of `chunk_size`,
    /// each window starting `chunk_size - overlap` after the previous one.
    /// Windows are not trimmed.
    fn hard_split(&self, chunk: &str, config: &ChunkConfig, output: &mut Vec<String>) {
        let chars: Vec<char> = chunk.chars().collect();
        let stride = config.chunk_size - config.overlap;

        let mut start = 0;
        while start < chars.len() {
            let end = (start + config.chunk_size).min(chars.len());
            output.push(chars[start..end].iter().collect());
            start += stride;
        }
    }
}

impl Default for SentenceChunker {
    fn default() -> Self {
        Self::new()
    }
}

impl Chunker for SentenceChunker {
    fn chunk(&self, text: &str, config: &ChunkConfig) -> Result<Vec<String>> {
        config.validate()?;

        if text.is_empty() {
            return Ok(Vec::new());
        }

        let packed = self.pack_sentences(text, config.chunk_size);

        // Chunks over 1.5x chunk_size get hard-split; the comparison is kept
        // in integers (len > 1.5 * chunk_size <=> 2 * len > 3 * chunk_size).
        let mut output = Vec::with_capacity(packed.len());
        for chunk in packed {
            if chunk.chars().count() * 2 > config.chunk_size * 3 {
                self.hard_split(&chunk, config, &mut output);
            } else {
                output.push(chunk);
            }
        }

        debug!("Split text into {} chunks", output.len());

        Ok(output)
    }
}
