//! Text processing: cleaning extracted text and splitting it into word chunks.

pub mod chunker;
pub mod cleaner;

pub use chunker::{DEFAULT_CHUNK_SIZE, chunk_words};
pub use cleaner::clean_text;

use serde::Serialize;

/// A contiguous run of words taken from the input text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chunk {
    /// Position of the chunk within the text
    pub index: usize,
    /// Number of words in the chunk
    pub word_count: usize,
    /// The words, joined by single spaces
    pub text: String,
}

impl Chunk {
    /// Create a new chunk from its words.
    pub fn new(index: usize, words: &[&str]) -> Self {
        Self {
            index,
            word_count: words.len(),
            text: words.join(" "),
        }
    }
}

/// Number of whitespace-delimited words in `text`.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_creation() {
        let chunk = Chunk::new(2, &["Hello", "world"]);
        assert_eq!(chunk.index, 2);
        assert_eq!(chunk.word_count, 2);
        assert_eq!(chunk.text, "Hello world");
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("   \n\t "), 0);
        assert_eq!(word_count("one  two\nthree\tfour"), 4);
    }
}
