//! Word-count chunking for summarization.

use super::Chunk;

/// Default chunk size in words.
pub const DEFAULT_CHUNK_SIZE: usize = 300;

/// Split text into consecutive chunks of `chunk_size` words.
///
/// Every chunk except the last holds exactly `chunk_size` words; the last
/// holds the remainder. Text with no words yields no chunks. A `chunk_size`
/// of zero is treated as one.
pub fn chunk_words(text: &str, chunk_size: usize) -> Vec<Chunk> {
    let words: Vec<&str> = text.split_whitespace().collect();

    words
        .chunks(chunk_size.max(1))
        .enumerate()
        .map(|(index, group)| Chunk::new(index, group))
        .collect()
}

/// Split text into space-joined chunks of `chunk_size` words.
pub fn split_into_chunks(text: &str, chunk_size: usize) -> Vec<String> {
    chunk_words(text, chunk_size)
        .into_iter()
        .map(|chunk| chunk.text)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn words(n: usize) -> String {
        (0..n).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_chunk_empty_text() {
        assert!(chunk_words("", DEFAULT_CHUNK_SIZE).is_empty());
        assert!(split_into_chunks("   \n\n   ", DEFAULT_CHUNK_SIZE).is_empty());
    }

    #[test]
    fn test_chunk_short_text() {
        let chunks = split_into_chunks("Hello world.  How are\nyou?", DEFAULT_CHUNK_SIZE);
        assert_eq!(chunks, vec!["Hello world. How are you?"]);
    }

    #[test]
    fn test_chunk_601_words() {
        let chunks = chunk_words(&words(601), 300);
        let sizes: Vec<usize> = chunks.iter().map(|c| c.word_count).collect();
        assert_eq!(sizes, vec![300, 300, 1]);
        assert_eq!(chunks[2].text, "w600");
        assert_eq!(chunks[1].index, 1);
    }

    #[test]
    fn test_exact_multiple() {
        let chunks = split_into_chunks("a b c d e f", 3);
        assert_eq!(chunks, vec!["a b c", "d e f"]);
    }

    #[test]
    fn test_zero_chunk_size() {
        let chunks = split_into_chunks("a b c", 0);
        assert_eq!(chunks, vec!["a", "b", "c"]);
    }

    proptest! {
        #[test]
        fn prop_chunks_partition_words(input in "[a-z \\n\\t]{0,400}", size in 1usize..40) {
            let original: Vec<&str> = input.split_whitespace().collect();
            let chunks = chunk_words(&input, size);

            let rejoined: Vec<&str> = chunks
                .iter()
                .flat_map(|c| c.text.split(' '))
                .collect();
            prop_assert_eq!(rejoined, original.clone());

            prop_assert_eq!(chunks.len(), original.len().div_ceil(size));
            if let Some((last, full)) = chunks.split_last() {
                prop_assert!(full.iter().all(|c| c.word_count == size));
                prop_assert!(last.word_count >= 1 && last.word_count <= size);
            }
        }
    }
}
