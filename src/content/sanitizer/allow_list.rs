//! Element and attribute allow-lists shared by both sanitizer strategies

/// Elements kept in normal mode
const PERMISSIVE_TAGS: &[&str] = &[
    "p", "br", "hr", "div", "span", "h1", "h2", "h3", "h4", "h5", "h6", "strong", "b", "em",
    "i", "u", "s", "strike", "del", "ins", "mark", "sub", "sup", "small", "code", "pre", "kbd",
    "blockquote", "q", "cite", "ul", "ol", "li", "dl", "dt", "dd", "a", "img", "table", "thead",
    "tbody", "tfoot", "tr", "th", "td", "caption", "figure", "figcaption",
];

/// Elements kept in strict mode: what the editor can represent directly
const STRICT_TAGS: &[&str] = &[
    "p", "br", "h1", "h2", "h3", "h4", "h5", "h6", "strong", "b", "em", "i", "u", "s", "strike",
    "del", "ins", "code", "pre", "blockquote", "ul", "ol", "li", "a",
];

/// Elements dropped together with everything inside them
pub(crate) const DROP_WITH_CONTENT: &[&str] = &[
    "script", "style", "iframe", "frame", "frameset", "object", "embed", "applet", "noscript",
    "template",
];

/// Elements that never have a closing tag
pub(crate) const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Elements that start a new line of text when rendered
pub(crate) const BLOCK_ELEMENTS: &[&str] = &[
    "p", "div", "br", "li", "h1", "h2", "h3", "h4", "h5", "h6", "blockquote", "pre", "tr",
    "ul", "ol", "table", "hr", "dl", "dt", "dd", "figure", "figcaption", "section", "article",
    "header", "footer", "main", "aside", "nav", "address",
];

const GLOBAL_ATTRIBUTES: &[&str] = &["id", "class"];

/// Attributes holding a URL that must pass the scheme check
const URL_ATTRIBUTES: &[&str] = &["href", "src", "cite"];

/// Schemes that can execute or smuggle content when rendered
pub(crate) const DANGEROUS_SCHEMES: &[&str] =
    &["javascript:", "data:", "vbscript:", "file:", "about:"];

fn element_attributes(tag: &str) -> &'static [&'static str] {
    match tag {
        "a" => &["href", "title", "target", "rel"],
        "img" => &["src", "alt", "width", "height", "title"],
        "td" | "th" => &["colspan", "rowspan"],
        "ol" => &["start"],
        "blockquote" | "q" => &["cite"],
        _ => &[],
    }
}

/// Allow-list tier applied by a sanitization pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllowList {
    strict: bool,
}

impl AllowList {
    #[must_use]
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    /// Whether the element survives (its markup is kept)
    #[must_use]
    pub fn allows_tag(&self, tag: &str) -> bool {
        let tags = if self.strict { STRICT_TAGS } else { PERMISSIVE_TAGS };
        tags.contains(&tag)
    }

    /// Whether the element is removed along with its content
    #[must_use]
    pub fn drops_content(&self, tag: &str) -> bool {
        DROP_WITH_CONTENT.contains(&tag)
    }

    /// Whether `name="value"` may stay on `tag`
    ///
    /// `name` must already be lowercase.
    #[must_use]
    pub fn allows_attribute(&self, tag: &str, name: &str, value: &str) -> bool {
        if name.starts_with("on") {
            return false;
        }
        if !GLOBAL_ATTRIBUTES.contains(&name) && !element_attributes(tag).contains(&name) {
            return false;
        }
        if URL_ATTRIBUTES.contains(&name) && has_dangerous_scheme(value) {
            return false;
        }
        true
    }
}

#[must_use]
pub(crate) fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

#[must_use]
pub(crate) fn is_block_element(tag: &str) -> bool {
    BLOCK_ELEMENTS.contains(&tag)
}

/// Check a URL for a scheme that must not reach a rendering context
///
/// Browsers ignore embedded whitespace and control characters when parsing a
/// scheme (`java\tscript:`), and schemes are case-insensitive, so both are
/// stripped before comparing. Entity-encoded schemes are decoded first.
#[must_use]
pub fn has_dangerous_scheme(url: &str) -> bool {
    let decoded = html_escape::decode_html_entities(url);
    let compact: String = decoded
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .flat_map(char::to_lowercase)
        .collect();
    DANGEROUS_SCHEMES
        .iter()
        .any(|scheme| compact.starts_with(scheme))
}
