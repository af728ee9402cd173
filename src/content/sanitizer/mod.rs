//! Tag/attribute sanitization for captured HTML.
//!
//! Two interchangeable strategies implement the same allow-list policy:
//! - `DomSanitizer` walks an html5ever tree (via scraper) and re-serializes it
//! - `RegexSanitizer` tokenizes with regexes and needs no DOM at all
//!
//! A `Sanitizer` picks its strategies once, from the `dom_parsing` capability
//! flag. With a DOM the regex strategy is kept as the recovery path; without
//! one it is the only path.

pub mod allow_list;
pub mod dom;
pub mod regex_strategy;

use log::{debug, warn};

use crate::errors::{ContentError, ContentResult};
use crate::utils::string_utils::char_len;

pub use allow_list::{AllowList, has_dangerous_scheme};
pub use dom::DomSanitizer;
pub use regex_strategy::RegexSanitizer;

/// Output of one sanitization pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedHtml {
    /// Sanitized markup
    pub html: String,
    /// Sorted, de-duplicated names of elements that were removed or unwrapped
    pub removed_tags: Vec<String>,
    /// Name of the strategy that produced `html`
    pub strategy: &'static str,
}

/// One way of applying the allow-list policy
pub trait SanitizeStrategy: Send + Sync {
    /// Short name used in logs and results
    fn name(&self) -> &'static str;

    /// Filter `html` down to what `allow_list` permits
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Parse` when the strategy cannot handle the
    /// markup. Callers are expected to try another strategy.
    fn sanitize(&self, html: &str, allow_list: AllowList) -> ContentResult<SanitizedHtml>;
}

/// Strategy-selecting sanitizer
pub struct Sanitizer {
    primary: Box<dyn SanitizeStrategy>,
    fallback: Option<Box<dyn SanitizeStrategy>>,
}

impl Sanitizer {
    /// Build a sanitizer for an environment with or without a DOM
    #[must_use]
    pub fn new(dom_parsing: bool) -> Self {
        if dom_parsing {
            Self::with_strategies(Box::new(DomSanitizer), Some(Box::new(RegexSanitizer)))
        } else {
            Self::with_strategies(Box::new(RegexSanitizer), None)
        }
    }

    /// Build a sanitizer from explicit strategies
    #[must_use]
    pub fn with_strategies(
        primary: Box<dyn SanitizeStrategy>,
        fallback: Option<Box<dyn SanitizeStrategy>>,
    ) -> Self {
        Self { primary, fallback }
    }

    /// Name of the strategy tried first
    #[must_use]
    pub fn primary_strategy(&self) -> &'static str {
        self.primary.name()
    }

    /// Sanitize `html` under the permissive or strict allow-list
    ///
    /// Empty input sanitizes to empty output.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::InputTooLarge` when `html` has more than
    /// `max_length` characters. Strategy failures are recovered through the
    /// fallback strategy and only surface if every strategy fails.
    pub fn sanitize(
        &self,
        html: &str,
        strict: bool,
        max_length: usize,
    ) -> ContentResult<SanitizedHtml> {
        let length = char_len(html);
        if length > max_length {
            return Err(ContentError::InputTooLarge {
                length,
                max: max_length,
            });
        }

        if html.trim().is_empty() {
            return Ok(SanitizedHtml {
                html: String::new(),
                removed_tags: Vec::new(),
                strategy: self.primary.name(),
            });
        }

        let allow_list = AllowList::new(strict);
        match self.primary.sanitize(html, allow_list) {
            Ok(result) => Ok(result),
            Err(e) => match &self.fallback {
                Some(fallback) => {
                    warn!(
                        "{} sanitizer failed ({}), retrying with {}",
                        self.primary.name(),
                        e,
                        fallback.name()
                    );
                    let result = fallback.sanitize(html, allow_list)?;
                    debug!(
                        "{} sanitizer recovered {} chars",
                        fallback.name(),
                        result.html.len()
                    );
                    Ok(result)
                }
                None => Err(e),
            },
        }
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new(true)
    }
}

impl std::fmt::Debug for Sanitizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sanitizer")
            .field("primary", &self.primary.name())
            .field("fallback", &self.fallback.as_ref().map(|s| s.name()))
            .finish()
    }
}
