pub mod clip;
pub mod config;
pub mod content;
pub mod errors;
pub mod utils;

pub use clip::{Clip, ThemeName};
pub use config::{ContentOptions, PipelineConfig, PipelineConfigBuilder};
pub use content::{
    ClipTranslator, ContentSource, ContentStrategy, DisplayContent, HtmlTranslator,
    ProcessingResult, QualityAssessment, QualityBand, Sanitizer, TranslationCache,
    ValidationOptions, ValidationReport, normalize_html, validate_clip_content,
};
pub use errors::{ContentError, ContentResult};
