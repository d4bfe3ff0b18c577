//! Sentence boundary detection.
//!
//! A sentence ends at `.`, `!` or `?` followed by one or more whitespace
//! characters. The terminal punctuation stays attached to the sentence; the
//! whitespace separator is discarded. Implemented as a single forward scan
//! rather than a regex.

/// Split text into sentences.
///
/// The remainder after the last boundary is the final sentence, so text
/// without any boundary punctuation comes back as one sentence. Punctuation
/// at the very end of input (with nothing after it) does not open a new
/// sentence.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut iter = text.char_indices().peekable();

    while let Some((idx, ch)) = iter.next() {
        if !matches!(ch, '.' | '!' | '?') {
            continue;
        }

        // Only punctuation followed by whitespace is a boundary.
        match iter.peek() {
            Some(&(_, next)) if next.is_whitespace() => {}
            _ => continue,
        }

        sentences.push(&text[start..idx + ch.len_utf8()]);

        // Consume the whitespace run; the next sentence starts at the first
        // non-whitespace character, if any.
        start = text.len();
        while let Some(&(next_idx, next_ch)) = iter.peek() {
            if next_ch.is_whitespace() {
                iter.next();
            } else {
                start = next_idx;
                break;
            }
        }
    }

    if start < text.len() {
        sentences.push(&text[start..]);
    }

    sentences
}
