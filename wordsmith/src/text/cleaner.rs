//! Text cleaning for extracted document text.

/// Clean raw extracted text.
///
/// This function:
/// - Collapses runs of whitespace (spaces, newlines, tabs) into a single space
/// - Removes every character outside printable ASCII
/// - Trims leading and trailing whitespace
///
/// Whitespace separates tokens before anything is removed, so dropping a
/// character can never leave two spaces next to each other. The result is a
/// fixed point: `clean_text(&clean_text(x)) == clean_text(x)`.
pub fn clean_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for word in text.split_whitespace() {
        let start = result.len();
        if start > 0 {
            result.push(' ');
        }

        let mut kept = false;
        for c in word.chars().filter(|c| is_printable_ascii(*c)) {
            result.push(c);
            kept = true;
        }

        // Token was entirely non-ASCII
        if !kept {
            result.truncate(start);
        }
    }

    result
}

/// Printable ASCII range, space through tilde.
fn is_printable_ascii(c: char) -> bool {
    matches!(c, ' '..='~')
}
