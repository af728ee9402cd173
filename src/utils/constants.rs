//! Shared configuration constants for the content pipeline
//!
//! This module contains default values and limits used throughout the
//! codebase to ensure consistency and avoid magic numbers.

/// Default maximum input size: 100,000 characters
///
/// Captured clips are page fragments, not whole documents. Anything above
/// this is almost always a capture mistake (a whole page grabbed with
/// inline assets) and is rejected by the sanitizer.
pub const DEFAULT_MAX_LENGTH: usize = 100_000;

/// Default translation cache capacity: 100 entries
pub const DEFAULT_CACHE_CAPACITY: usize = 100;

/// Default translation cache entry lifetime: 30 minutes
pub const DEFAULT_CACHE_MAX_AGE_SECS: u64 = 30 * 60;

/// Maximum element nesting depth accepted by the DOM strategies
///
/// Legitimate clipped fragments rarely exceed 20 levels. Deeper trees
/// are handed to the regex strategies, which do not recurse.
pub const MAX_NESTING_DEPTH: usize = 100;

/// The one heading level the rich-text editor understands
pub const CANONICAL_HEADING: &str = "h2";

/// Display string used when a clip has no html, text or title
pub const DEFAULT_PLACEHOLDER: &str = "No content available";

/// Category sentinel meaning "uncategorized"
pub const DEFAULT_CATEGORY: &str = "default";
