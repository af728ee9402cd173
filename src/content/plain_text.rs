//! Plain-text rendition of clip HTML for search indexes and text fallbacks.
//!
//! Block boundaries become newlines, every other tag disappears, entities are
//! decoded, and whitespace is collapsed so the result has no blank lines.
//!
//! Two strategies share the final whitespace pass:
//! - `DomTextExtractor` walks a parsed tree, which handles deeply nested and
//!   malformed markup correctly
//! - `ScanTextExtractor` works on the string alone and needs no DOM

use std::sync::LazyLock;

use ego_tree::NodeRef;
use html_escape::decode_html_entities;
use log::warn;
use regex::Regex;
use scraper::Html;
use scraper::node::Node;

use crate::content::sanitizer::allow_list::is_block_element;
use crate::errors::{ContentError, ContentResult};
use crate::utils::MAX_NESTING_DEPTH;

/// Elements whose text is never user-visible
const HIDDEN_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "noscript", "template", "iframe", "object", "head", "title",
];

static HIDDEN_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)<(?:script|style|noscript|template|iframe|object|head|title)\b[^>]*>.*?</(?:script|style|noscript|template|iframe|object|head|title)\s*>",
    )
    .expect("HIDDEN_BLOCK_RE: hardcoded regex is valid")
});

static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?(?:-->|\z)").expect("COMMENT_RE: hardcoded regex is valid"));

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<(/?)([a-zA-Z][a-zA-Z0-9-]*)(?:[^>"']|"[^"]*"|'[^']*')*>|<![^>]*>|<\?[^>]*>"#)
        .expect("TAG_RE: hardcoded regex is valid")
});

static INLINE_WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\S\n]+").expect("INLINE_WHITESPACE_RE: hardcoded regex is valid"));

/// One way of turning HTML into text
pub trait TextExtractStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Extract text with newline-separated blocks
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Parse` when the strategy cannot handle the markup.
    fn extract(&self, html: &str) -> ContentResult<String>;
}

/// Extractor backed by a parsed HTML tree
#[derive(Debug, Clone, Copy, Default)]
pub struct DomTextExtractor;

impl TextExtractStrategy for DomTextExtractor {
    fn name(&self) -> &'static str {
        "dom"
    }

    fn extract(&self, html: &str) -> ContentResult<String> {
        let document = Html::parse_fragment(html);
        let mut raw = String::with_capacity(html.len());
        for child in document.root_element().children() {
            collect_text(child, 0, &mut raw)?;
        }
        Ok(collapse_text_lines(&raw))
    }
}

fn collect_text(node: NodeRef<'_, Node>, depth: usize, out: &mut String) -> ContentResult<()> {
    if depth > MAX_NESTING_DEPTH {
        return Err(ContentError::Parse(format!(
            "element nesting exceeds {MAX_NESTING_DEPTH} levels"
        )));
    }

    match node.value() {
        // The parser has already decoded entities
        Node::Text(text) => out.push_str(text),
        Node::Element(element) => {
            let tag = element.name();
            if HIDDEN_TEXT_ELEMENTS.contains(&tag) {
                return Ok(());
            }
            let block = is_block_element(tag);
            if block {
                out.push('\n');
            }
            for child in node.children() {
                collect_text(child, depth + 1, out)?;
            }
            if block {
                out.push('\n');
            }
        }
        _ => {}
    }
    Ok(())
}

/// Extractor that scans the string without parsing it
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanTextExtractor;

impl TextExtractStrategy for ScanTextExtractor {
    fn name(&self) -> &'static str {
        "scan"
    }

    fn extract(&self, html: &str) -> ContentResult<String> {
        let without_hidden = HIDDEN_BLOCK_RE.replace_all(html, "");
        let without_comments = COMMENT_RE.replace_all(&without_hidden, "");

        let mut raw = String::with_capacity(without_comments.len());
        let mut last = 0;
        for caps in TAG_RE.captures_iter(&without_comments) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            raw.push_str(&without_comments[last..whole.start()]);
            last = whole.end();

            let is_block = caps
                .get(2)
                .is_some_and(|name| is_block_element(&name.as_str().to_ascii_lowercase()));
            if is_block {
                raw.push('\n');
            }
        }
        raw.push_str(&without_comments[last..]);

        Ok(collapse_text_lines(&decode_html_entities(&raw)))
    }
}

/// Collapse whitespace so each non-empty line holds single-spaced text
///
/// Every `\n` is a potential line break; lines are trimmed and blank lines
/// dropped.
#[must_use]
pub fn collapse_text_lines(raw: &str) -> String {
    let spaced = INLINE_WHITESPACE_RE.replace_all(raw, " ");
    spaced
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Strategy-selecting text extractor
pub struct PlainTextExtractor {
    primary: Box<dyn TextExtractStrategy>,
    fallback: Option<Box<dyn TextExtractStrategy>>,
}

impl PlainTextExtractor {
    /// Build an extractor for an environment with or without a DOM
    #[must_use]
    pub fn new(dom_parsing: bool) -> Self {
        if dom_parsing {
            Self {
                primary: Box::new(DomTextExtractor),
                fallback: Some(Box::new(ScanTextExtractor)),
            }
        } else {
            Self {
                primary: Box::new(ScanTextExtractor),
                fallback: None,
            }
        }
    }

    #[must_use]
    pub fn primary_strategy(&self) -> &'static str {
        self.primary.name()
    }

    /// Plain text for `html`; never contains markup
    ///
    /// Falls back to scanning when the DOM pass fails, and to an empty string
    /// if every strategy fails.
    #[must_use]
    pub fn extract(&self, html: &str) -> String {
        if html.trim().is_empty() {
            return String::new();
        }

        match self.primary.extract(html) {
            Ok(text) => text,
            Err(e) => {
                warn!(
                    "{} text extraction failed ({}), falling back",
                    self.primary.name(),
                    e
                );
                self.fallback
                    .as_ref()
                    .and_then(|fallback| fallback.extract(html).ok())
                    .unwrap_or_default()
            }
        }
    }
}

impl Default for PlainTextExtractor {
    fn default() -> Self {
        Self::new(true)
    }
}

impl std::fmt::Debug for PlainTextExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlainTextExtractor")
            .field("primary", &self.primary.name())
            .field("fallback", &self.fallback.as_ref().map(|s| s.name()))
            .finish()
    }
}
