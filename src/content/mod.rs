//! The clip content pipeline
//!
//! `sanitizer`, `normalizer` and `optimization` are the translation stages;
//! `translator` runs them through the `translation_cache`. `strategy` decides
//! what each caller gets, falling back through plain text, title and a
//! placeholder. `quality` and `validator` are read-only diagnostics.

pub mod normalizer;
pub mod optimization;
pub mod plain_text;
pub mod quality;
pub mod sanitizer;
pub mod strategy;
pub mod translation_cache;
pub mod translator;
pub mod validator;

pub use normalizer::{is_normalized, normalize_html};
pub use optimization::{content_preview, optimize_html};
pub use plain_text::{PlainTextExtractor, TextExtractStrategy};
pub use quality::{QualityAssessment, QualityBand};
pub use sanitizer::{AllowList, SanitizeStrategy, SanitizedHtml, Sanitizer};
pub use strategy::{ContentStrategy, DisplayContent};
pub use translation_cache::{CacheStats, TranslationCache};
pub use translator::{
    ClipTranslator, ContentSource, HtmlTranslator, ProcessingResult, ProcessingStats,
};
pub use validator::{
    IssueType, Severity, ValidationIssue, ValidationOptions, ValidationReport,
    validate_clip_content,
};
