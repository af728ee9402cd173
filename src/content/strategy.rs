//! Content strategy selection: what to show for a clip, per caller intent.
//!
//! Display walks one ordered chain of tiers and returns the first non-empty
//! success:
//!
//! 1. `Pipeline` - full translation of `html_raw`, through the cache
//! 2. `LegacyTranslation` - strict regex-only translation of `html_raw`
//! 3. `PlainText` - `text_plain`, when the caller allows it
//! 4. `Title`
//! 5. `Placeholder` - always succeeds
//!
//! The chain cannot come up empty, and no tier returns `html_raw` without
//! sanitizing it first. Editing and search have their own, shorter rules.

use std::sync::Arc;

use log::warn;
use rayon::prelude::*;
use serde::Serialize;

use crate::clip::Clip;
use crate::config::{ContentOptions, PipelineConfig};
use crate::errors::{ContentError, ContentResult};

use super::plain_text::PlainTextExtractor;
use super::quality::{QualityAssessment, QualitySignals};
use super::translator::{ClipTranslator, ContentSource, HtmlTranslator};

/// Content chosen for a clip, with its provenance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayContent {
    pub content: String,
    pub source: ContentSource,
}

impl DisplayContent {
    fn new(content: impl Into<String>, source: ContentSource) -> Self {
        Self {
            content: content.into(),
            source,
        }
    }

    /// Whether `content` is sanitized HTML that may be rendered as markup
    ///
    /// Everything else must be rendered as text.
    #[must_use]
    pub fn is_trusted_html(&self) -> bool {
        self.source.is_sanitized_html()
    }
}

/// One step of the display fallback chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DisplayTier {
    Pipeline,
    LegacyTranslation,
    PlainText,
    Title,
    Placeholder,
}

const DISPLAY_CHAIN: [DisplayTier; 5] = [
    DisplayTier::Pipeline,
    DisplayTier::LegacyTranslation,
    DisplayTier::PlainText,
    DisplayTier::Title,
    DisplayTier::Placeholder,
];

impl DisplayTier {
    fn name(self) -> &'static str {
        match self {
            DisplayTier::Pipeline => "pipeline",
            DisplayTier::LegacyTranslation => "legacy_translation",
            DisplayTier::PlainText => "plain_text",
            DisplayTier::Title => "title",
            DisplayTier::Placeholder => "placeholder",
        }
    }

    /// `None` when the tier does not apply to this clip
    fn attempt(
        self,
        strategy: &ContentStrategy,
        clip: &Clip,
        options: &ContentOptions,
    ) -> Option<ContentResult<DisplayContent>> {
        match self {
            DisplayTier::Pipeline => {
                let html = clip.usable_html()?;
                let result = strategy.translator.process(html, options);
                Some(if result.is_usable() {
                    Ok(DisplayContent::new(result.content, result.source))
                } else {
                    Err(ContentError::Translation(
                        result
                            .error
                            .unwrap_or_else(|| "pipeline produced no content".to_string()),
                    ))
                })
            }
            DisplayTier::LegacyTranslation => {
                let html = clip.usable_html()?;
                Some(
                    strategy
                        .translator
                        .translate_legacy(html, options)
                        .map(|content| DisplayContent::new(content, ContentSource::Translated)),
                )
            }
            DisplayTier::PlainText => {
                if !options.fallback_to_plain_text {
                    return None;
                }
                let text = clip.usable_text()?;
                Some(Ok(DisplayContent::new(text, ContentSource::PlainText)))
            }
            DisplayTier::Title => {
                let title = clip.usable_title()?;
                Some(Ok(DisplayContent::new(title, ContentSource::Title)))
            }
            DisplayTier::Placeholder => Some(Ok(DisplayContent::new(
                &*strategy.placeholder,
                ContentSource::Placeholder,
            ))),
        }
    }
}

/// Picks the right content for each caller intent
#[derive(Clone)]
pub struct ContentStrategy {
    translator: Arc<dyn ClipTranslator>,
    extractor: Arc<PlainTextExtractor>,
    placeholder: Arc<str>,
    defaults: ContentOptions,
}

impl ContentStrategy {
    /// Build the production strategy with its own translator and cache
    #[must_use]
    pub fn new(config: &PipelineConfig) -> Self {
        Self::with_translator(config, Arc::new(HtmlTranslator::new(config)))
    }

    /// Build around a caller-supplied translator
    #[must_use]
    pub fn with_translator(config: &PipelineConfig, translator: Arc<dyn ClipTranslator>) -> Self {
        Self {
            translator,
            extractor: Arc::new(PlainTextExtractor::new(config.dom_parsing())),
            placeholder: Arc::from(config.placeholder()),
            defaults: config.defaults().clone(),
        }
    }

    /// Options used by callers that have none of their own
    #[must_use]
    pub fn defaults(&self) -> &ContentOptions {
        &self.defaults
    }

    /// Render-safe content for display; never empty
    pub fn get_display_content(&self, clip: &Clip, options: &ContentOptions) -> DisplayContent {
        for tier in DISPLAY_CHAIN {
            match tier.attempt(self, clip, options) {
                None => {}
                Some(Ok(resolved)) if !resolved.content.trim().is_empty() => {
                    if options.log_errors {
                        tracing::debug!(
                            clip_id = %clip.id,
                            tier = tier.name(),
                            source = %resolved.source,
                            "display content resolved"
                        );
                    }
                    return resolved;
                }
                Some(Ok(_)) => {
                    if options.log_errors {
                        tracing::debug!(clip_id = %clip.id, tier = tier.name(), "tier produced empty content");
                    }
                }
                Some(Err(e)) => {
                    if options.log_errors {
                        tracing::warn!(
                            clip_id = %clip.id,
                            tier = tier.name(),
                            error = %e,
                            "display tier failed, falling back"
                        );
                    }
                }
            }
        }

        // Unreachable unless the placeholder is blank, which config validation rejects
        DisplayContent::new(&*self.placeholder, ContentSource::Placeholder)
    }

    /// Display content for many clips, in input order
    pub fn get_display_content_batch(
        &self,
        clips: &[Clip],
        options: &ContentOptions,
    ) -> Vec<DisplayContent> {
        clips
            .par_iter()
            .map(|clip| self.get_display_content(clip, options))
            .collect()
    }

    /// `get_display_content` on the blocking pool
    pub async fn get_display_content_async(
        &self,
        clip: Clip,
        options: ContentOptions,
    ) -> DisplayContent {
        let strategy = self.clone();
        let task_clip = clip.clone();
        let task_options = options.clone();

        match tokio::task::spawn_blocking(move || {
            strategy.get_display_content(&task_clip, &task_options)
        })
        .await
        {
            Ok(display) => display,
            Err(e) => {
                warn!("Display task failed to join ({e}), resolving inline");
                self.get_display_content(&clip, &options)
            }
        }
    }

    /// Content to load into the rich-text editor
    ///
    /// With `preserve_formatting` the captured HTML is handed over untouched;
    /// the editor applies its own schema. Otherwise it is translated first.
    /// Clips without HTML edit their plain text, which may be empty.
    pub fn get_edit_content(&self, clip: &Clip, options: &ContentOptions) -> DisplayContent {
        if let Some(html) = clip.usable_html() {
            if options.preserve_formatting {
                return DisplayContent::new(html, ContentSource::RawHtml);
            }

            for tier in [DisplayTier::Pipeline, DisplayTier::LegacyTranslation] {
                match tier.attempt(self, clip, options) {
                    Some(Ok(display)) if !display.content.trim().is_empty() => return display,
                    Some(Err(e)) if options.log_errors => {
                        tracing::warn!(clip_id = %clip.id, tier = tier.name(), error = %e, "edit translation failed");
                    }
                    _ => {}
                }
            }
        }

        DisplayContent::new(
            clip.text_plain.clone().unwrap_or_default(),
            ContentSource::PlainText,
        )
    }

    /// Markup-free text for search indexing
    ///
    /// Uses the first non-empty of: text extracted from `html_raw`,
    /// `text_plain`, title.
    #[must_use]
    pub fn get_searchable_content(&self, clip: &Clip) -> String {
        if let Some(html) = clip.usable_html() {
            let text = self.extractor.extract(html);
            if !text.is_empty() {
                return text;
            }
        }
        if let Some(text) = clip.usable_text() {
            return text.trim().to_string();
        }
        clip.title.trim().to_string()
    }

    /// Score a clip's completeness
    ///
    /// The translation check bypasses the cache so assessing a clip never
    /// changes cache state.
    #[must_use]
    pub fn assess_content_quality(&self, clip: &Clip) -> QualityAssessment {
        let options = ContentOptions {
            use_cache: false,
            log_errors: false,
            ..self.defaults.clone()
        };
        let translation_ok = clip
            .usable_html()
            .is_some_and(|html| self.translator.process(html, &options).is_usable());

        QualityAssessment::from_signals(QualitySignals {
            has_html: clip.usable_html().is_some(),
            has_text: clip.usable_text().is_some(),
            has_title: clip.usable_title().is_some(),
            translation_ok,
        })
    }
}

impl Default for ContentStrategy {
    fn default() -> Self {
        Self::new(&PipelineConfig::default())
    }
}

impl std::fmt::Debug for ContentStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentStrategy")
            .field("extractor", &self.extractor)
            .field("placeholder", &self.placeholder)
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strategy() -> ContentStrategy {
        ContentStrategy::default()
    }

    #[test]
    fn test_display_prefers_processed_html() {
        let clip = Clip::new()
            .with_title("T")
            .with_html("<h1>Head</h1><p>Body</p>")
            .with_text("Body");
        let display = strategy().get_display_content(&clip, &ContentOptions::default());
        assert_eq!(display.source, ContentSource::Processed);
        assert_eq!(display.content, "<h2>Head</h2><p>Body</p>");
        assert!(display.is_trusted_html());
    }

    #[test]
    fn test_display_falls_to_plain_text_when_html_is_all_unsafe() {
        let clip = Clip::new()
            .with_html("<script>alert(1)</script>")
            .with_text("Readable text");
        let display = strategy().get_display_content(&clip, &ContentOptions::default());
        assert_eq!(display.source, ContentSource::PlainText);
        assert_eq!(display.content, "Readable text");
        assert!(!display.is_trusted_html());
    }

    #[test]
    fn test_plain_text_tier_can_be_disabled() {
        let clip = Clip::new().with_title("Title").with_text("Text");
        let options = ContentOptions {
            fallback_to_plain_text: false,
            ..ContentOptions::default()
        };
        let display = strategy().get_display_content(&clip, &options);
        assert_eq!(display.source, ContentSource::Title);
        assert_eq!(display.content, "Title");
    }

    #[test]
    fn test_empty_clip_gets_placeholder() {
        let display = strategy().get_display_content(&Clip::new(), &ContentOptions::default());
        assert_eq!(display.source, ContentSource::Placeholder);
        assert_eq!(display.content, "No content available");
    }

    #[test]
    fn test_oversized_html_uses_legacy_translation() {
        let clip = Clip::new().with_html("<p>Some long paragraph</p>");
        let options = ContentOptions {
            max_length: 10,
            ..ContentOptions::default()
        };
        let display = strategy().get_display_content(&clip, &options);
        assert_eq!(display.source, ContentSource::Translated);
        assert_eq!(display.content, "<p>Some lo</p>");
    }

    #[test]
    fn test_truncated_legacy_markup_is_balanced() {
        let clip = Clip::new().with_html("<blockquote><p>Some long quoted text</p></blockquote>");
        let options = ContentOptions {
            max_length: 20,
            ..ContentOptions::default()
        };
        let display = strategy().get_display_content(&clip, &options);
        assert_eq!(display.source, ContentSource::Translated);
        assert!(display.is_trusted_html());
        assert_eq!(display.content, "<blockquote><p>Some </p></blockquote>");
    }

    #[test]
    fn test_second_display_is_cached() {
        let strategy = strategy();
        let clip = Clip::new().with_html("<p>x</p>");
        let options = ContentOptions::default();
        assert_eq!(
            strategy.get_display_content(&clip, &options).source,
            ContentSource::Processed
        );
        assert_eq!(
            strategy.get_display_content(&clip, &options).source,
            ContentSource::Cached
        );
    }

    #[test]
    fn test_edit_returns_raw_html_verbatim() {
        let html = "<h1 onclick=\"x()\">Raw</h1>";
        let clip = Clip::new().with_html(html);
        let edit = strategy().get_edit_content(&clip, &ContentOptions::default());
        assert_eq!(edit.source, ContentSource::RawHtml);
        assert_eq!(edit.content, html);
    }

    #[test]
    fn test_edit_without_preserve_formatting_translates() {
        let clip = Clip::new().with_html("<h1 onclick=\"x()\">Raw</h1>");
        let options = ContentOptions {
            preserve_formatting: false,
            ..ContentOptions::default()
        };
        let edit = strategy().get_edit_content(&clip, &options);
        assert_eq!(edit.source, ContentSource::Processed);
        assert_eq!(edit.content, "<h2>Raw</h2>");
    }

    #[test]
    fn test_edit_without_html_uses_text_even_if_empty() {
        let edit = strategy().get_edit_content(&Clip::new(), &ContentOptions::default());
        assert_eq!(edit.source, ContentSource::PlainText);
        assert_eq!(edit.content, "");
    }

    #[test]
    fn test_searchable_content_has_no_markup() {
        let clip = Clip::new()
            .with_title("T")
            .with_html("<h1>Title</h1><p>Body &amp; more</p>");
        assert_eq!(strategy().get_searchable_content(&clip), "Title\nBody & more");
    }

    #[test]
    fn test_searchable_content_falls_back_to_text_then_title() {
        let strategy = strategy();
        let with_text = Clip::new().with_title("T").with_text("  words ");
        assert_eq!(strategy.get_searchable_content(&with_text), "words");
        let title_only = Clip::new().with_title("Only title");
        assert_eq!(strategy.get_searchable_content(&title_only), "Only title");
    }

    #[test]
    fn test_quality_does_not_touch_cache() {
        let config = PipelineConfig::default();
        let translator = Arc::new(HtmlTranslator::new(&config));
        let strategy = ContentStrategy::with_translator(&config, translator.clone());
        let clip = Clip::new()
            .with_title("T")
            .with_html("<p>x</p>")
            .with_text("x");

        let assessment = strategy.assess_content_quality(&clip);
        assert_eq!(assessment.score, 100);
        let stats = translator.cache_stats();
        assert_eq!(stats.size, 0);
        assert_eq!(stats.hits + stats.misses, 0);
    }

    #[test]
    fn test_batch_preserves_order() {
        let clips: Vec<Clip> = (0..20)
            .map(|i| Clip::new().with_title(format!("clip {i}")))
            .collect();
        let results = strategy().get_display_content_batch(&clips, &ContentOptions::quiet());
        let titles: Vec<&str> = results.iter().map(|d| d.content.as_str()).collect();
        let expected: Vec<String> = (0..20).map(|i| format!("clip {i}")).collect();
        assert_eq!(titles, expected);
    }
}
