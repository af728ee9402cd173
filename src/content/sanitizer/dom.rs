//! DOM-based sanitization.
//!
//! Parses the fragment with html5ever (through scraper), which repairs
//! malformed markup the same way a browser would, then re-serializes only the
//! allowed parts of the tree.

use std::collections::BTreeSet;

use ego_tree::NodeRef;
use html_escape::encode_text;
use scraper::Html;
use scraper::node::{Element, Node};

use crate::errors::{ContentError, ContentResult};
use crate::utils::MAX_NESTING_DEPTH;

use super::allow_list::{AllowList, is_block_element, is_void_element};
use super::{SanitizeStrategy, SanitizedHtml};

/// Sanitizer backed by a parsed HTML tree
#[derive(Debug, Clone, Copy, Default)]
pub struct DomSanitizer;

impl SanitizeStrategy for DomSanitizer {
    fn name(&self) -> &'static str {
        "dom"
    }

    fn sanitize(&self, html: &str, allow_list: AllowList) -> ContentResult<SanitizedHtml> {
        let document = Html::parse_fragment(html);

        // Fragment parsing wraps content in a root <html> element
        let root = document.root_element();

        let mut serializer = FilteringSerializer {
            allow_list,
            output: String::with_capacity(html.len()),
            removed: BTreeSet::new(),
        };
        for child in root.children() {
            serializer.visit(child, 0)?;
        }

        Ok(SanitizedHtml {
            html: serializer.output,
            removed_tags: serializer.removed.into_iter().collect(),
            strategy: self.name(),
        })
    }
}

/// Serializes a subtree, skipping everything the allow-list rejects
struct FilteringSerializer {
    allow_list: AllowList,
    output: String,
    removed: BTreeSet<String>,
}

impl FilteringSerializer {
    fn visit(&mut self, node: NodeRef<'_, Node>, depth: usize) -> ContentResult<()> {
        if depth > MAX_NESTING_DEPTH {
            return Err(ContentError::Parse(format!(
                "element nesting exceeds {MAX_NESTING_DEPTH} levels"
            )));
        }

        match node.value() {
            Node::Text(text) => {
                self.output.push_str(&encode_text(&**text));
            }
            Node::Element(element) => self.visit_element(node, element, depth)?,
            // Comments, doctypes and processing instructions never survive
            _ => {}
        }
        Ok(())
    }

    fn visit_element(
        &mut self,
        node: NodeRef<'_, Node>,
        element: &Element,
        depth: usize,
    ) -> ContentResult<()> {
        let tag = element.name();

        if self.allow_list.drops_content(tag) {
            self.removed.insert(tag.to_string());
            return Ok(());
        }

        if !self.allow_list.allows_tag(tag) {
            // Unwrap: drop the markup, keep what is inside
            self.removed.insert(tag.to_string());
            for child in node.children() {
                self.visit(child, depth + 1)?;
            }
            if is_block_element(tag) {
                separate_words(&mut self.output);
            }
            return Ok(());
        }

        self.output.push('<');
        self.output.push_str(tag);

        let mut attrs: Vec<(&str, &str)> = element
            .attrs()
            .filter(|(name, value)| self.allow_list.allows_attribute(tag, name, value))
            .collect();
        attrs.sort_by(|a, b| a.0.cmp(b.0));

        for (name, value) in attrs {
            self.output.push(' ');
            self.output.push_str(name);
            self.output.push_str("=\"");
            push_escaped_attribute(&mut self.output, value);
            self.output.push('"');
        }
        self.output.push('>');

        if is_void_element(tag) {
            return Ok(());
        }

        for child in node.children() {
            self.visit(child, depth + 1)?;
        }

        self.output.push_str("</");
        self.output.push_str(tag);
        self.output.push('>');
        Ok(())
    }
}

/// Escape an attribute value for a double-quoted context
pub(crate) fn push_escaped_attribute(output: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '"' => output.push_str("&quot;"),
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            c => output.push(c),
        }
    }
}

/// Keep text from two unwrapped blocks from running together
pub(crate) fn separate_words(output: &mut String) {
    match output.chars().last() {
        None | Some('>') => {}
        Some(c) if c.is_whitespace() => {}
        Some(_) => output.push(' '),
    }
}
