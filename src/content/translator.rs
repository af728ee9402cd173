//! Clip HTML translation: sanitize, normalize, optimize.
//!
//! `HtmlTranslator` is the production pipeline. It reads and writes the
//! shared `TranslationCache` when the caller allows it and reports every
//! outcome, including input errors, as a `ProcessingResult` instead of an
//! `Err`, so the strategy selector can move on to its next tier.

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, warn};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use crate::config::{ContentOptions, PipelineConfig};
use crate::errors::{ContentError, ContentResult};
use crate::utils::string_utils::char_len;
use crate::utils::safe_truncate_chars;

use super::normalizer::normalize_html;
use super::optimization::optimize_html;
use super::sanitizer::Sanitizer;
use super::translation_cache::{CacheStats, TranslationCache};

/// Where a piece of returned content came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentSource {
    /// Fresh output of the full pipeline
    Processed,
    /// Pipeline output served from the translation cache
    Cached,
    /// Output of the legacy strict regex translation
    Translated,
    /// Captured HTML returned untouched (editor only)
    RawHtml,
    /// Captured plain text
    PlainText,
    Title,
    Placeholder,
}

impl ContentSource {
    /// Whether content from this source has been through the sanitizer
    #[must_use]
    pub fn is_sanitized_html(self) -> bool {
        matches!(
            self,
            ContentSource::Processed | ContentSource::Cached | ContentSource::Translated
        )
    }
}

impl std::fmt::Display for ContentSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ContentSource::Processed => "processed",
            ContentSource::Cached => "cached",
            ContentSource::Translated => "translated",
            ContentSource::RawHtml => "raw_html",
            ContentSource::PlainText => "plain_text",
            ContentSource::Title => "title",
            ContentSource::Placeholder => "placeholder",
        };
        f.write_str(name)
    }
}

/// Measurements for one translation. Lengths are in characters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProcessingStats {
    pub original_length: usize,
    pub processed_length: usize,
    pub time_taken_ms: u64,
    pub removed_tags: Vec<String>,
}

/// Outcome of one pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessingResult {
    pub content: String,
    pub source: ContentSource,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub stats: ProcessingStats,
}

impl ProcessingResult {
    #[must_use]
    pub fn success(
        content: String,
        source: ContentSource,
        original_length: usize,
        removed_tags: Vec<String>,
        time_taken_ms: u64,
    ) -> Self {
        let processed_length = char_len(&content);
        Self {
            content,
            source,
            success: true,
            error: None,
            stats: ProcessingStats {
                original_length,
                processed_length,
                time_taken_ms,
                removed_tags,
            },
        }
    }

    #[must_use]
    pub fn failure(error: &ContentError, original_length: usize, time_taken_ms: u64) -> Self {
        Self {
            content: String::new(),
            source: ContentSource::Processed,
            success: false,
            error: Some(error.to_string()),
            stats: ProcessingStats {
                original_length,
                processed_length: 0,
                time_taken_ms,
                removed_tags: Vec::new(),
            },
        }
    }

    /// Successful and non-empty
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.success && !self.content.trim().is_empty()
    }
}

/// The translation seam used by `ContentStrategy`
///
/// Implemented by `HtmlTranslator`; tests substitute failing implementations
/// to exercise the fallback tiers.
pub trait ClipTranslator: Send + Sync {
    /// Full pipeline, through the cache when `options.use_cache` is set
    fn process(&self, html: &str, options: &ContentOptions) -> ProcessingResult;

    /// Legacy strict translation: regex sanitizer only, oversized input
    /// truncated rather than rejected, never cached
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Translation` when nothing survives.
    fn translate_legacy(&self, html: &str, options: &ContentOptions) -> ContentResult<String>;
}

/// Production translator
#[derive(Clone)]
pub struct HtmlTranslator {
    sanitizer: Arc<Sanitizer>,
    legacy: Arc<Sanitizer>,
    cache: Arc<Mutex<TranslationCache>>,
}

impl HtmlTranslator {
    #[must_use]
    pub fn new(config: &PipelineConfig) -> Self {
        Self::with_cache(
            Sanitizer::new(config.dom_parsing()),
            Arc::new(Mutex::new(TranslationCache::from_config(config))),
        )
    }

    /// Build around an existing (possibly shared) cache
    #[must_use]
    pub fn with_cache(sanitizer: Sanitizer, cache: Arc<Mutex<TranslationCache>>) -> Self {
        Self {
            sanitizer: Arc::new(sanitizer),
            legacy: Arc::new(Sanitizer::new(false)),
            cache,
        }
    }

    /// Handle to the shared cache
    #[must_use]
    pub fn cache(&self) -> &Arc<Mutex<TranslationCache>> {
        &self.cache
    }

    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.lock().stats()
    }

    fn translate(&self, html: &str, options: &ContentOptions) -> ContentResult<(String, Vec<String>)> {
        let sanitized = self
            .sanitizer
            .sanitize(html, options.strict_mode, options.max_length)?;
        let content = optimize_html(&normalize_html(&sanitized.html));

        if content.trim().is_empty() {
            return Err(ContentError::Translation(
                "no content survived sanitization".to_string(),
            ));
        }
        Ok((content, sanitized.removed_tags))
    }

    /// Run `process` on the blocking pool
    ///
    /// A failed join (the task panicked or the runtime is shutting down)
    /// degrades to running synchronously on the current thread.
    pub async fn process_async(&self, html: &str, options: &ContentOptions) -> ProcessingResult {
        let html = Arc::<str>::from(html);
        let task_html = Arc::clone(&html);
        let task_options = options.clone();
        let translator = self.clone();

        match tokio::task::spawn_blocking(move || translator.process(&task_html, &task_options))
            .await
        {
            Ok(result) => result,
            Err(e) => {
                warn!("Translation task failed to join ({e}), processing inline");
                self.process(&html, options)
            }
        }
    }

    /// Spawn a task that sweeps expired entries every `period`
    ///
    /// Must be called from within a tokio runtime. Abort the returned handle
    /// to stop the sweeps.
    pub fn spawn_cache_cleanup(&self, period: Duration) -> JoinHandle<()> {
        let cache = Arc::clone(&self.cache);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                let removed = cache.lock().cleanup();
                if removed > 0 {
                    debug!("Periodic cache cleanup removed {removed} entries");
                }
            }
        })
    }
}

impl ClipTranslator for HtmlTranslator {
    fn process(&self, html: &str, options: &ContentOptions) -> ProcessingResult {
        let start = Instant::now();
        let original_length = char_len(html);
        let elapsed_ms = || u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        if html.trim().is_empty() {
            return ProcessingResult::failure(&ContentError::EmptyInput, original_length, 0);
        }
        // Checked before the cache: an entry stored under a larger limit must not leak through
        if original_length > options.max_length {
            let e = ContentError::InputTooLarge {
                length: original_length,
                max: options.max_length,
            };
            debug!("Rejected clip HTML before translation: {e}");
            return ProcessingResult::failure(&e, original_length, elapsed_ms());
        }

        let key = TranslationCache::cache_key(html, options.strict_mode);
        if options.use_cache {
            if let Some(mut cached) = self.cache.lock().get(key) {
                cached.source = ContentSource::Cached;
                cached.stats.time_taken_ms = elapsed_ms();
                return cached;
            }
        }

        match self.translate(html, options) {
            Ok((content, removed_tags)) => {
                let result = ProcessingResult::success(
                    content,
                    ContentSource::Processed,
                    original_length,
                    removed_tags,
                    elapsed_ms(),
                );
                if options.use_cache {
                    self.cache.lock().set(key, result.clone());
                }
                result
            }
            Err(e) => {
                if e.is_input_error() {
                    debug!("Translation of {original_length} chars rejected: {e}");
                } else {
                    warn!("Translation of {original_length} chars failed: {e}");
                }
                ProcessingResult::failure(&e, original_length, elapsed_ms())
            }
        }
    }

    fn translate_legacy(&self, html: &str, options: &ContentOptions) -> ContentResult<String> {
        if html.trim().is_empty() {
            return Err(ContentError::EmptyInput);
        }

        let mut bounded = safe_truncate_chars(html, options.max_length);
        if bounded.len() < html.len() {
            debug!(
                "Legacy translation truncated input to {} chars",
                options.max_length
            );
            bounded = trim_partial_tag(bounded);
        }

        let sanitized = self.legacy.sanitize(bounded, true, options.max_length)?;
        let content = normalize_html(&sanitized.html);
        if content.trim().is_empty() {
            return Err(ContentError::Translation(
                "legacy translation produced no content".to_string(),
            ));
        }
        Ok(content)
    }
}

/// Drop a tag that truncation cut in half, so it is not shown as text
fn trim_partial_tag(html: &str) -> &str {
    match (html.rfind('<'), html.rfind('>')) {
        (Some(open), Some(close)) if open > close => &html[..open],
        (Some(open), None) => &html[..open],
        _ => html,
    }
}

impl Default for HtmlTranslator {
    fn default() -> Self {
        Self::new(&PipelineConfig::default())
    }
}

impl std::fmt::Debug for HtmlTranslator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HtmlTranslator")
            .field("sanitizer", &self.sanitizer)
            .field("cache", &self.cache_stats())
            .finish()
    }
}
