//! Utility functions for string processing.
//!
//! Offsets in this crate are character offsets (Unicode scalar values), which is
//! what the browser page counts in. The regex engine hands back byte offsets, so
//! the conversions live here.

/// Split a query into whitespace-delimited terms, dropping empty ones.
///
/// `"fox  "` yields `["fox"]`, never `["fox", "", ""]`.
pub fn split_terms(query: &str) -> Vec<&str> {
    query.split_whitespace().collect()
}

/// Number of characters in `text`.
#[inline]
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte position of the `char_idx`-th character, or `text.len()` past the end.
pub fn char_to_byte(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map_or(text.len(), |(byte, _)| byte)
}

/// First `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    &text[..char_to_byte(text, max_chars)]
}

/// Convert ascending byte offsets into character offsets with a single pass.
///
/// Offsets must be ascending and on character boundaries (regex matches are).
pub fn byte_offsets_to_chars(text: &str, byte_offsets: impl IntoIterator<Item = usize>) -> Vec<usize> {
    let mut out = Vec::new();
    let mut chars = text.char_indices().enumerate().peekable();
    let mut last_char = 0usize;

    for target in byte_offsets {
        while let Some(&(char_idx, (byte, _))) = chars.peek() {
            if byte >= target {
                break;
            }
            last_char = char_idx + 1;
            chars.next();
        }
        out.push(last_char);
    }

    out
}

/// Neutralize text for embedding in HTML.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    push_escaped_html(&mut out, text);
    out
}

/// Append `text` to `out` with HTML metacharacters replaced by entities.
pub fn push_escaped_html(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}
