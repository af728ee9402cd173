//! Regex-based sanitization.
//!
//! Works on the raw string without building a tree, so it handles input the
//! DOM strategy gives up on and runs where no DOM is available. It applies
//! the same allow-list in one left-to-right pass over the markup tokens:
//! - comments, CDATA, doctypes and processing instructions are removed
//! - a start tag of an element dropped with its content skips everything up
//!   to its closing tag (or the end of input, as in a browser)
//! - allowed tags are rebuilt from their filtered attributes; other tags are
//!   removed
//! - text between tokens has any stray `<` or `>` escaped, so removed markup
//!   can never reassemble into a tag
//!
//! Tags inside quoted attribute values belong to the attribute, never to the
//! document. Allowed tags are balanced: closers with no open element are
//! dropped, and elements still open at the end are closed.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use html_escape::decode_html_entities;
use regex::Regex;

use crate::errors::ContentResult;

use super::allow_list::{AllowList, DROP_WITH_CONTENT, is_block_element, is_void_element};
use super::dom::{push_escaped_attribute, separate_words};
use super::{SanitizeStrategy, SanitizedHtml};

/// Closing tag matchers for the elements removed with their content
static DROP_CLOSE_RES: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    DROP_WITH_CONTENT
        .iter()
        .map(|&tag| {
            let re = Regex::new(&format!(r"(?i)</{tag}\s*>"))
                .expect("DROP_CLOSE_RES: hardcoded regex is valid");
            (tag, re)
        })
        .collect()
});

/// One markup token: comment, CDATA, doctype, processing instruction or tag.
/// Quoted attribute values may contain `>` and `<`.
static MARKUP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?P<skip>(?s:<!--.*?(?:-->|\z))|(?s:<!\[CDATA\[.*?(?:\]\]>|\z))",
        r"|(?i:<!doctype[^>]*>)|<\?[^>]*>)",
        r#"|<(?P<close>/?)(?P<name>[a-zA-Z][a-zA-Z0-9-]*)(?P<attrs>(?:[^>"']|"[^"]*"|'[^']*')*)>"#,
    ))
    .expect("MARKUP_RE: hardcoded regex is valid")
});

/// One attribute inside a tag: bare, double-quoted, single-quoted or unquoted
static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([^\s"'>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
        .expect("ATTR_RE: hardcoded regex is valid")
});

/// Sanitizer that never builds a tree
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexSanitizer;

impl SanitizeStrategy for RegexSanitizer {
    fn name(&self) -> &'static str {
        "regex"
    }

    fn sanitize(&self, html: &str, allow_list: AllowList) -> ContentResult<SanitizedHtml> {
        let mut removed = BTreeSet::new();
        let output = rebuild_tags(html, allow_list, &mut removed);

        Ok(SanitizedHtml {
            html: output,
            removed_tags: removed.into_iter().collect(),
            strategy: self.name(),
        })
    }
}

/// Byte offset just past the closing tag of a dropped `tag`, or end of input
fn end_of_dropped_block(html: &str, from: usize, tag: &str) -> usize {
    DROP_CLOSE_RES
        .iter()
        .find(|(name, _)| *name == tag)
        .and_then(|(_, re)| re.find_at(html, from))
        .map_or(html.len(), |m| m.end())
}

/// Tokenize into markup and text, rebuilding only allowed tags
fn rebuild_tags(html: &str, allow_list: AllowList, removed: &mut BTreeSet<String>) -> String {
    let mut output = String::with_capacity(html.len());
    let mut open: Vec<String> = Vec::new();
    let mut pos = 0;

    while let Some(caps) = MARKUP_RE.captures_at(html, pos) {
        let Some(whole) = caps.get(0) else {
            break;
        };
        push_escaped_text(&mut output, &html[pos..whole.start()]);
        pos = whole.end();

        if caps.name("skip").is_some() {
            continue;
        }
        let (Some(close), Some(name), Some(attrs)) =
            (caps.name("close"), caps.name("name"), caps.name("attrs"))
        else {
            continue;
        };
        let closing = !close.as_str().is_empty();
        let tag = name.as_str().to_ascii_lowercase();

        if allow_list.drops_content(&tag) {
            removed.insert(tag.clone());
            // Void elements such as `embed` have no content to skip
            if !closing && !is_void_element(&tag) {
                pos = end_of_dropped_block(html, pos, &tag);
            }
            continue;
        }

        if !allow_list.allows_tag(&tag) {
            removed.insert(tag.clone());
            if closing && is_block_element(&tag) {
                separate_words(&mut output);
            }
            continue;
        }

        if closing {
            if let Some(index) = open.iter().rposition(|t| *t == tag) {
                for inner in open.drain(index..).rev() {
                    push_closing_tag(&mut output, &inner);
                }
            }
            continue;
        }

        output.push('<');
        output.push_str(&tag);
        for (name, value) in filtered_attributes(&tag, attrs.as_str(), allow_list) {
            output.push(' ');
            output.push_str(&name);
            output.push_str("=\"");
            push_escaped_attribute(&mut output, &value);
            output.push('"');
        }
        output.push('>');

        if !is_void_element(&tag) {
            open.push(tag);
        }
    }

    push_escaped_text(&mut output, &html[pos..]);
    for tag in open.iter().rev() {
        push_closing_tag(&mut output, tag);
    }
    output
}

fn push_closing_tag(output: &mut String, tag: &str) {
    output.push_str("</");
    output.push_str(tag);
    output.push('>');
}

/// Parse, filter, de-duplicate (first wins) and sort a tag's attributes
fn filtered_attributes(tag: &str, raw: &str, allow_list: AllowList) -> Vec<(String, String)> {
    let mut attrs: Vec<(String, String)> = Vec::new();

    for caps in ATTR_RE.captures_iter(raw) {
        let name = caps[1].to_ascii_lowercase();
        if attrs.iter().any(|(existing, _)| *existing == name) {
            continue;
        }
        let value = caps
            .get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))
            .map(|m| decode_html_entities(m.as_str()).into_owned())
            .unwrap_or_default();

        if allow_list.allows_attribute(tag, &name, &value) {
            attrs.push((name, value));
        }
    }

    attrs.sort_by(|a, b| a.0.cmp(&b.0));
    attrs
}

/// Append text, escaping angle brackets that did not form a tag
fn push_escaped_text(output: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            c => output.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sanitize(html: &str) -> SanitizedHtml {
        RegexSanitizer.sanitize(html, AllowList::new(false)).unwrap()
    }

    #[test]
    fn test_removes_script_keeps_text() {
        let result = sanitize("<script>alert(1)</script><p>Safe</p>");
        assert_eq!(result.html, "<p>Safe</p>");
        assert_eq!(result.removed_tags, vec!["script"]);
    }

    #[test]
    fn test_unclosed_script_runs_to_end() {
        let result = sanitize("<p>Before</p><script>alert(1)");
        assert_eq!(result.html, "<p>Before</p>");
    }

    #[test]
    fn test_split_tag_trick_does_not_reassemble() {
        let result = sanitize("<scr<script>x</script>ipt>alert(1)</script><p>ok</p>");
        assert!(!result.html.contains("<script"));
        assert!(!result.html.contains("<scr"));
        assert!(result.html.contains("<p>ok</p>"));
    }

    #[test]
    fn test_strips_event_handlers_in_any_quote_style() {
        let result = sanitize(r#"<p onclick="a()" onload='b()' onerror=c()>Hi</p>"#);
        assert_eq!(result.html, "<p>Hi</p>");
    }

    #[test]
    fn test_quoted_gt_inside_attribute() {
        let result = sanitize(r#"<a title="a > b" href="/x">link</a>"#);
        assert_eq!(result.html, r#"<a href="/x" title="a &gt; b">link</a>"#);
    }

    #[test]
    fn test_dangerous_href_removed() {
        let result = sanitize(r#"<a href="  javascript:alert(1)">x</a>"#);
        assert_eq!(result.html, "<a>x</a>");
    }

    #[test]
    fn test_removes_doctype_comment_and_xml_declaration() {
        let result = sanitize(r#"<?xml version="1.0"?><!DOCTYPE html><!-- c --><p>Body</p>"#);
        assert_eq!(result.html, "<p>Body</p>");
    }

    #[test]
    fn test_stray_angle_brackets_are_escaped() {
        let result = sanitize("<p>1 < 2 and 3 > 2</p>");
        assert_eq!(result.html, "<p>1 &lt; 2 and 3 &gt; 2</p>");
    }

    #[test]
    fn test_uppercase_tags_are_lowercased() {
        let result = sanitize("<P CLASS=\"x\">Hi</P>");
        assert_eq!(result.html, r#"<p class="x">Hi</p>"#);
    }

    #[test]
    fn test_duplicate_attributes_first_wins() {
        let result = sanitize(r#"<p id="a" id="b">x</p>"#);
        assert_eq!(result.html, r#"<p id="a">x</p>"#);
    }

    #[test]
    fn test_void_closing_tag_dropped() {
        let result = sanitize("<p>a<br></br>b</p>");
        assert_eq!(result.html, "<p>a<br>b</p>");
    }

    #[test]
    fn test_script_inside_attribute_value_keeps_following_content() {
        let result = sanitize(r#"<p title="<script>">Important</p><p>More text</p>"#);
        assert_eq!(result.html, "<p>Important</p><p>More text</p>");

        let result = sanitize(r#"<a href="/x" title="<script>">link</a> after"#);
        assert_eq!(result.html, r#"<a href="/x" title="&lt;script&gt;">link</a> after"#);
    }

    #[test]
    fn test_comment_inside_attribute_value_is_not_a_comment() {
        let result = sanitize(r#"<a title="<!--" href="/x">one</a><p>two</p>"#);
        assert_eq!(result.html, r#"<a href="/x" title="&lt;!--">one</a><p>two</p>"#);
    }

    #[test]
    fn test_void_embed_does_not_swallow_following_content() {
        let result = sanitize(r#"<embed src="x.swf"><p>after</p>"#);
        assert_eq!(result.html, "<p>after</p>");
        assert_eq!(result.removed_tags, vec!["embed"]);
    }

    #[test]
    fn test_stray_closing_tags_are_dropped() {
        let result = sanitize("</div></div></li><p>x</p>");
        assert_eq!(result.html, "<p>x</p>");
    }

    #[test]
    fn test_unclosed_tags_are_closed_in_order() {
        let result = sanitize("<blockquote><p>Some <em>cut");
        assert_eq!(result.html, "<blockquote><p>Some <em>cut</em></p></blockquote>");
    }

    #[test]
    fn test_misnested_closer_closes_inner_elements() {
        let result = sanitize("<p><strong>bold</p>after");
        assert_eq!(result.html, "<p><strong>bold</strong></p>after");
    }
}
