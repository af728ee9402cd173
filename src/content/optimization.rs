//! Final cleanup pass over normalized clip HTML.
//!
//! Sanitizing often leaves shells behind: a `<strong>` whose only child was a
//! stripped image, a paragraph that held a script. These are removed here,
//! and long runs of line breaks are shortened so a clip does not render with
//! a screen of blank space.

use std::sync::LazyLock;

use fancy_regex::{Captures, Regex};

use crate::utils::string_utils::safe_truncate_boundary;

/// Each pass can expose another empty element one level up
const MAX_OPTIMIZE_PASSES: usize = 8;

/// Inline formatting element with only whitespace inside
static EMPTY_INLINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(strong|em|u|s|span|code|mark|sub|sup|small|kbd|q)\b[^>]*>(\s*)</\1>")
        .expect("EMPTY_INLINE_RE: hardcoded regex is valid")
});

static EMPTY_PARAGRAPH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<p\b[^>]*>\s*</p>").expect("EMPTY_PARAGRAPH_RE: hardcoded regex is valid")
});

static BREAK_RUN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:<br\s*/?>\s*){3,}").expect("BREAK_RUN_RE: hardcoded regex is valid")
});

/// Remove empty formatting shells and collapse break runs
///
/// # Example
/// ```
/// # use mark_clipper::content::optimization::optimize_html;
/// assert_eq!(
///     optimize_html("<p><strong><em></em></strong></p><p>Text</p>"),
///     "<p>Text</p>"
/// );
/// ```
#[must_use]
pub fn optimize_html(html: &str) -> String {
    let mut result = html.to_string();

    for _ in 0..MAX_OPTIMIZE_PASSES {
        let before = result.len();
        // The shell goes; a space it held still separates the words around it
        result = EMPTY_INLINE_RE
            .replace_all(&result, |caps: &Captures<'_>| {
                if caps.get(2).is_some_and(|m| !m.as_str().is_empty()) {
                    " "
                } else {
                    ""
                }
            })
            .to_string();
        result = EMPTY_PARAGRAPH_RE.replace_all(&result, "").to_string();
        if result.len() == before {
            break;
        }
    }

    result = BREAK_RUN_RE.replace_all(&result, "<br><br>").to_string();
    result.trim().to_string()
}

/// Short preview of `text`, cut on a word boundary
///
/// Appends an ellipsis only when something was cut.
#[must_use]
pub fn content_preview(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    let cut = safe_truncate_boundary(text, max_chars, ",.;:!?");
    if cut >= text.len() {
        return text.to_string();
    }
    format!("{}…", text[..cut].trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removes_nested_empty_inline_elements() {
        assert_eq!(optimize_html("<p>a<strong><em></em></strong>b</p>"), "<p>ab</p>");
    }

    #[test]
    fn test_whitespace_inside_removed_element_still_separates_words() {
        assert_eq!(optimize_html("<p>hello<span> </span>world</p>"), "<p>hello world</p>");
        assert_eq!(optimize_html("<p>a<strong><em>\n </em></strong>b</p>"), "<p>a b</p>");
    }

    #[test]
    fn test_keeps_elements_with_content() {
        let html = "<p><strong>bold</strong> <em>it</em></p>";
        assert_eq!(optimize_html(html), html);
    }

    #[test]
    fn test_mismatched_tags_are_not_paired() {
        let html = "<strong></em>";
        assert_eq!(optimize_html(html), html);
    }

    #[test]
    fn test_removes_empty_paragraph_left_by_removed_inline() {
        assert_eq!(optimize_html("<p><span></span></p><p>x</p>"), "<p>x</p>");
    }

    #[test]
    fn test_break_runs_collapse_to_two() {
        assert_eq!(
            optimize_html("<p>a<br><br/>\n<br><br>b</p>"),
            "<p>a<br><br>b</p>"
        );
        assert_eq!(optimize_html("<p>a<br><br>b</p>"), "<p>a<br><br>b</p>");
    }

    #[test]
    fn test_similar_names_are_not_confused() {
        // <s> must not match the start of <span> or <sub>
        let html = "<span>x</span><sub>2</sub>";
        assert_eq!(optimize_html(html), html);
    }

    #[test]
    fn test_preview_cuts_on_word_boundary() {
        assert_eq!(content_preview("The quick brown fox", 12), "The quick…");
        assert_eq!(content_preview("  short  ", 50), "short");
    }

    #[test]
    fn test_preview_multibyte() {
        assert_eq!(content_preview("héllo wörld again", 9), "héllo…");
    }
}
