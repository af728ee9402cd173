//! UTF-8-safe string truncation utilities
//!
//! Clip content is arbitrary user text, so every length limit in the
//! pipeline counts characters and slices on character boundaries.

/// Safely truncate a string to a maximum number of CHARACTERS (not bytes).
///
/// Never panics, even when the limit falls inside a multi-byte character.
///
/// # Examples
/// ```
/// # use mark_clipper::utils::string_utils::safe_truncate_chars;
/// assert_eq!(safe_truncate_chars("Hello, World!", 5), "Hello");
/// assert_eq!(safe_truncate_chars("héllo wörld", 7), "héllo w");
/// assert_eq!(safe_truncate_chars("Hi", 100), "Hi");
/// ```
#[inline]
pub fn safe_truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        None => s,
        Some((byte_idx, _)) => &s[..byte_idx],
    }
}

/// Find a safe byte index for truncation, preferring word boundaries.
///
/// Returns the byte index of the last whitespace or `boundary_chars`
/// character within the first `max_chars` characters. Falls back to the
/// `max_chars`-th character when no boundary exists, or to the string length
/// when the string is shorter than `max_chars`.
///
/// # Examples
/// ```
/// # use mark_clipper::utils::string_utils::safe_truncate_boundary;
/// let text = "Hello, wonderful world of Unicode!";
/// let idx = safe_truncate_boundary(text, 20, " ,;:");
/// assert_eq!(&text[..idx], "Hello, wonderful");
/// ```
pub fn safe_truncate_boundary(s: &str, max_chars: usize, boundary_chars: &str) -> usize {
    let max_byte_idx = s
        .char_indices()
        .nth(max_chars)
        .map(|(idx, _)| idx)
        .unwrap_or(s.len());

    if max_byte_idx == s.len() {
        return max_byte_idx;
    }

    s[..max_byte_idx]
        .rfind(|c: char| c.is_whitespace() || boundary_chars.contains(c))
        .unwrap_or(max_byte_idx)
}

/// Length of a string in characters
#[inline]
#[must_use]
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}
