//! Loading pipeline configuration and clip records from JSON

use std::io::Write;

use mark_clipper::{
    Clip, ContentError, ContentOptions, ContentStrategy, PipelineConfig, ThemeName,
};
use tempfile::NamedTempFile;

#[test]
fn test_config_file_round_trip() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "cache_capacity": 10,
            "cache_max_age_secs": 5,
            "dom_parsing": false,
            "placeholder": "Nothing here",
            "defaults": {{ "strictMode": true, "fallbackToPlainText": false }}
        }}"#
    )
    .unwrap();

    let config = PipelineConfig::from_file(file.path()).unwrap();
    assert_eq!(config.cache_capacity(), 10);
    assert_eq!(config.cache_max_age().as_secs(), 5);
    assert!(!config.dom_parsing());
    assert_eq!(config.placeholder(), "Nothing here");
    assert!(config.defaults().strict_mode);
    assert!(!config.defaults().fallback_to_plain_text);
    assert!(config.defaults().preserve_formatting);

    let strategy = ContentStrategy::new(&config);
    let display = strategy.get_display_content(&Clip::new(), strategy.defaults());
    assert_eq!(display.content, "Nothing here");
}

#[test]
fn test_missing_config_file_is_io_error() {
    let err = PipelineConfig::from_file("/nonexistent/mark-clipper.json").unwrap_err();
    assert!(matches!(err, ContentError::Io(_)));
    assert!(!err.is_input_error());
}

#[test]
fn test_malformed_config_is_json_error() {
    let err = PipelineConfig::from_json_str("{ not json").unwrap_err();
    assert!(matches!(err, ContentError::Json(_)));
}

#[test]
fn test_content_options_use_camel_case_keys() {
    let options: ContentOptions = serde_json::from_str(
        r#"{"fallbackToPlainText": false, "logErrors": false, "preserveFormatting": false,
            "strictMode": true, "useCache": false, "maxLength": 500}"#,
    )
    .unwrap();
    assert!(!options.fallback_to_plain_text);
    assert!(!options.log_errors);
    assert!(!options.preserve_formatting);
    assert!(options.strict_mode);
    assert!(!options.use_cache);
    assert_eq!(options.max_length, 500);

    let defaults: ContentOptions = serde_json::from_str("{}").unwrap();
    assert_eq!(defaults, ContentOptions::default());
}

#[test]
fn test_clip_from_storage_row() {
    let clip: Clip = serde_json::from_str(
        r#"{
            "id": "6f1c2a1e-6d0e-4c4f-9a55-0b7c3c1d2e3f",
            "title": null,
            "html_raw": "<p>Hi</p>",
            "text_plain": null,
            "theme_name": "retro-neon",
            "category": null,
            "created_at": "2026-01-02T03:04:05Z"
        }"#,
    )
    .unwrap();

    assert_eq!(clip.title, "");
    assert_eq!(clip.html_raw.as_deref(), Some("<p>Hi</p>"));
    assert_eq!(clip.theme_name, ThemeName::Default);
    assert_eq!(clip.category, "default");
    assert!(clip.is_uncategorized());
    assert!(clip.created_at.is_some());
    assert!(clip.updated_at.is_none());
}
