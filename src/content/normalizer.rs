//! Heading and inline-format normalization for the rich-text editor.
//!
//! The editor recognizes exactly one heading level plus normal paragraph
//! text, and one tag per inline format. Every heading is flattened to
//! `CANONICAL_HEADING` and format synonyms are renamed:
//!
//! | from | to |
//! |---|---|
//! | `h1`–`h6` | `h2` |
//! | `b` | `strong` |
//! | `i` | `em` |
//! | `ins` | `u` |
//! | `strike`, `del` | `s` |
//!
//! Only tag names change; attributes, lists, links and blockquotes pass
//! through untouched. Every target name maps to itself, so normalizing twice
//! is the same as normalizing once.
//!
//! Expects sanitized input, where any `<` in text is already escaped.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::utils::CANONICAL_HEADING;

/// Start or end tag whose name may need renaming
static RENAMABLE_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<(/?)(h[1-6]|b|i|ins|strike|del)(\s[^>]*)?>")
        .expect("RENAMABLE_TAG_RE: hardcoded regex is valid")
});

/// Canonical name for a renamable tag
fn canonical_name(tag: &str) -> &'static str {
    match tag.to_ascii_lowercase().as_str() {
        "b" => "strong",
        "i" => "em",
        "ins" => "u",
        "strike" | "del" => "s",
        // h1-h6, the only other names the regex matches
        _ => CANONICAL_HEADING,
    }
}

/// Flatten headings and rename format synonyms
///
/// # Example
/// ```
/// # use mark_clipper::content::normalizer::normalize_html;
/// assert_eq!(normalize_html("<h1>A</h1><b>B</b>"), "<h2>A</h2><strong>B</strong>");
/// ```
#[must_use]
pub fn normalize_html(html: &str) -> String {
    let normalized: Cow<'_, str> = RENAMABLE_TAG_RE.replace_all(html, |caps: &Captures| {
        let closing = &caps[1];
        let tag = &caps[2];
        let attrs = caps.get(3).map_or("", |m| m.as_str());
        let name = canonical_name(tag);
        if tag == name {
            caps[0].to_string()
        } else {
            format!("<{closing}{name}{attrs}>")
        }
    });
    normalized.into_owned()
}

/// Whether `html` is already in normalized form
#[must_use]
pub fn is_normalized(html: &str) -> bool {
    RENAMABLE_TAG_RE
        .captures_iter(html)
        .all(|caps| canonical_name(&caps[2]) == &caps[2])
}
