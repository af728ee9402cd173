//! Core configuration types for the content pipeline

use serde::{Deserialize, Serialize};

use crate::utils::{
    DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_MAX_AGE_SECS, DEFAULT_MAX_LENGTH, DEFAULT_PLACEHOLDER,
};

/// Per-call options recognized by every pipeline operation
///
/// Keys are camelCase on the wire so the options object sent by the web
/// client deserializes unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentOptions {
    /// Allow the plain-text display tier (default: true)
    pub fallback_to_plain_text: bool,

    /// Log each tier's outcome (default: true)
    ///
    /// Diagnostic only; never changes what is returned.
    pub log_errors: bool,

    /// Hand raw HTML to the editor untouched (default: true)
    pub preserve_formatting: bool,

    /// Use the strict tag allow-list (default: false)
    pub strict_mode: bool,

    /// Serve and store translations through the cache (default: true)
    pub use_cache: bool,

    /// Maximum input length in characters (default: 100,000)
    pub max_length: usize,
}

impl Default for ContentOptions {
    fn default() -> Self {
        Self {
            fallback_to_plain_text: true,
            log_errors: true,
            preserve_formatting: true,
            strict_mode: false,
            use_cache: true,
            max_length: DEFAULT_MAX_LENGTH,
        }
    }
}

impl ContentOptions {
    /// Create options with every default
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Strict allow-list, everything else default
    #[must_use]
    pub fn strict() -> Self {
        Self {
            strict_mode: true,
            ..Self::default()
        }
    }

    /// Bypass the cache entirely (reads and writes)
    #[must_use]
    pub fn uncached() -> Self {
        Self {
            use_cache: false,
            ..Self::default()
        }
    }

    /// Silence per-tier diagnostics
    #[must_use]
    pub fn quiet() -> Self {
        Self {
            log_errors: false,
            ..Self::default()
        }
    }
}

/// Construction-time configuration for a content pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Maximum number of cached translations before LRU eviction
    pub(crate) cache_capacity: usize,

    /// Lifetime of a cached translation in seconds
    pub(crate) cache_max_age_secs: u64,

    /// Whether an HTML DOM implementation is available
    ///
    /// When false the sanitizer and extractor run their regex strategies only.
    pub(crate) dom_parsing: bool,

    /// Final display fallback when a clip has nothing to show
    pub(crate) placeholder: String,

    /// Options applied when a caller does not pass its own
    pub(crate) defaults: ContentOptions,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            cache_max_age_secs: DEFAULT_CACHE_MAX_AGE_SECS,
            dom_parsing: true,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            defaults: ContentOptions::default(),
        }
    }
}
