//! Unicode utilities for text processing.
//!
//! Provides helpers for character-based windows over UTF-8 text, input
//! validation, and grapheme-safe truncation for display.

use crate::error::{ExtractionError, Result};
use unicode_segmentation::UnicodeSegmentation;

/// Finds a valid UTF-8 character boundary at or before the given position.
///
/// # Examples
///
/// ```
/// use yearline::io::find_char_boundary;
///
/// let s = "Hello 世界";
/// assert_eq!(find_char_boundary(s, 6), 6); // Before '世'
/// assert_eq!(find_char_boundary(s, 7), 6); // Middle of '世', backs up
/// ```
#[must_use]
pub const fn find_char_boundary(s: &str, pos: usize) -> usize {
    if pos >= s.len() {
        return s.len();
    }
    let bytes = s.as_bytes();
    let mut boundary = pos;
    // UTF-8 continuation bytes start with 10xxxxxx (0x80-0xBF)
    while boundary > 0 && (bytes[boundary] & 0xC0) == 0x80 {
        boundary -= 1;
    }
    boundary
}

/// Returns the text around `start..end` widened by `before` characters on
/// the left and `after` characters on the right, clipped to the text.
///
/// `start` and `end` are byte offsets on character boundaries. Widening
/// counts Unicode scalar values, never bytes, so the window is always a
/// valid slice.
///
/// # Examples
///
/// ```
/// use yearline::io::char_window;
///
/// let text = "In 1916, Dulles had problems.";
/// assert_eq!(char_window(text, 3, 7, 3, 4), "In 1916, Du");
/// assert_eq!(char_window(text, 3, 7, 100, 0), "In 1916");
/// ```
#[must_use]
pub fn char_window(text: &str, start: usize, end: usize, before: usize, after: usize) -> &str {
    let start = find_char_boundary(text, start.min(text.len()));
    let end = find_char_boundary(text, end.min(text.len())).max(start);

    let window_start = text[..start]
        .char_indices()
        .rev()
        .take(before)
        .last()
        .map_or(start, |(i, _)| i);

    let window_end = text[end..]
        .char_indices()
        .nth(after)
        .map_or(text.len(), |(i, _)| end + i);

    &text[window_start..window_end]
}

/// Checks that text carries no binary data.
///
/// # Errors
///
/// Returns [`ExtractionError::InvalidInput`] at the first NUL byte.
pub fn check_text(text: &str) -> Result<()> {
    if let Some(offset) = text.find('\0') {
        return Err(ExtractionError::InvalidInput {
            offset,
            reason: "NUL byte in text (binary data?)".to_string(),
        }
        .into());
    }
    Ok(())
}

/// Validates raw bytes as plain text.
///
/// # Errors
///
/// Returns [`ExtractionError::InvalidInput`] for invalid UTF-8 (with the
/// offset of the first bad byte) or embedded NUL bytes.
pub fn validate_text(bytes: &[u8]) -> Result<&str> {
    let text = std::str::from_utf8(bytes).map_err(ExtractionError::from)?;
    check_text(text)?;
    Ok(text)
}

/// Truncates a string at a grapheme cluster boundary.
///
/// Returns at most `max_graphemes` grapheme clusters.
#[must_use]
pub fn truncate_graphemes(s: &str, max_graphemes: usize) -> &str {
    let mut end_byte = 0;

    for (count, grapheme) in s.graphemes(true).enumerate() {
        if count >= max_graphemes {
            break;
        }
        end_byte += grapheme.len();
    }

    &s[..end_byte]
}
