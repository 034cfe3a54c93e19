//! PDF text extraction

use lopdf::Document;
use std::io::Read;
use std::path::Path;

use crate::error::{Result, WordsmithError};
use crate::text::clean_text;

const NO_TEXT_MESSAGE: &str = "The PDF does not contain extractable text.";

/// Extract and clean the text of a PDF read from `reader`.
///
/// Pages are visited in document order. A page whose text cannot be
/// extracted contributes nothing.
pub fn extract_text(mut reader: impl Read) -> Result<String> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| WordsmithError::Extraction(format!("Failed to read PDF: {}", e)))?;

    let doc = Document::load_mem(&bytes)
        .map_err(|e| WordsmithError::Extraction(format!("Failed to parse PDF: {}", e)))?;

    let pages = doc.get_pages();
    log::debug!("PDF has {} page(s)", pages.len());

    let page_texts = pages.keys().map(|&page_num| match doc.extract_text(&[page_num]) {
        Ok(text) => Some(text),
        Err(e) => {
            log::debug!("No text extracted from page {}: {}", page_num, e);
            None
        }
    });

    join_pages(page_texts)
}

/// Extract and clean the text of the PDF at `path`.
pub fn extract_text_from_path(path: &Path) -> Result<String> {
    let file = std::fs::File::open(path).map_err(|e| {
        WordsmithError::Extraction(format!("Failed to open {}: {}", path.display(), e))
    })?;
    extract_text(std::io::BufReader::new(file))
}

/// Join per-page texts with newlines and clean the result.
fn join_pages(pages: impl IntoIterator<Item = Option<String>>) -> Result<String> {
    let mut extracted = String::new();

    for text in pages.into_iter().flatten() {
        if !text.is_empty() {
            extracted.push_str(&text);
            extracted.push('\n');
        }
    }

    let cleaned = clean_text(&extracted);
    if cleaned.is_empty() {
        return Err(WordsmithError::Extraction(NO_TEXT_MESSAGE.to_string()));
    }

    Ok(cleaned)
}
