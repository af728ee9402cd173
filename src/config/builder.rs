//! Fluent builder for `PipelineConfig`
//!
//! Every field has a default, so the builder can be finished at any point;
//! `build()` is where the limits are validated.

use std::path::Path;

use crate::errors::{ContentError, ContentResult};
use crate::utils::{
    DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_MAX_AGE_SECS, DEFAULT_PLACEHOLDER,
};

use super::types::{ContentOptions, PipelineConfig};

pub struct PipelineConfigBuilder {
    pub(crate) cache_capacity: usize,
    pub(crate) cache_max_age_secs: u64,
    pub(crate) dom_parsing: bool,
    pub(crate) placeholder: String,
    pub(crate) defaults: ContentOptions,
}

impl Default for PipelineConfigBuilder {
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

impl PipelineConfig {
    /// Create a builder for configuring a `PipelineConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Start a builder from this configuration, to override a few fields
    #[must_use]
    pub fn into_builder(self) -> PipelineConfigBuilder {
        PipelineConfigBuilder {
            cache_capacity: self.cache_capacity,
            cache_max_age_secs: self.cache_max_age_secs,
            dom_parsing: self.dom_parsing,
            placeholder: self.placeholder,
            defaults: self.defaults,
        }
    }

    /// Parse and validate a JSON configuration document
    ///
    /// Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Json` for malformed JSON and
    /// `ContentError::InvalidConfig` when a limit is out of range.
    pub fn from_json_str(json: &str) -> ContentResult<Self> {
        let config: PipelineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Io` if the file cannot be read, otherwise the
    /// same errors as [`PipelineConfig::from_json_str`].
    pub fn from_file(path: impl AsRef<Path>) -> ContentResult<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&json)
    }

    /// Check limits that serde cannot express
    ///
    /// # Errors
    ///
    /// Returns `ContentError::InvalidConfig` naming the first bad field.
    pub fn validate(&self) -> ContentResult<()> {
        if self.cache_capacity == 0 {
            return Err(ContentError::InvalidConfig(
                "cache_capacity must be greater than zero".to_string(),
            ));
        }
        if self.defaults.max_length == 0 {
            return Err(ContentError::InvalidConfig(
                "defaults.maxLength must be greater than zero".to_string(),
            ));
        }
        if self.placeholder.trim().is_empty() {
            return Err(ContentError::InvalidConfig(
                "placeholder must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl PipelineConfigBuilder {
    #[must_use]
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Set how long a cached translation stays valid
    ///
    /// A value of 0 makes every entry expire immediately, which effectively
    /// disables cache hits while still exercising the cache path.
    #[must_use]
    pub fn cache_max_age_secs(mut self, secs: u64) -> Self {
        self.cache_max_age_secs = secs;
        self
    }

    /// Declare whether a DOM implementation is available
    ///
    /// Selects the sanitizer and extractor strategies once, at construction.
    #[must_use]
    pub fn dom_parsing(mut self, available: bool) -> Self {
        self.dom_parsing = available;
        self
    }

    #[must_use]
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    #[must_use]
    pub fn defaults(mut self, defaults: ContentOptions) -> Self {
        self.defaults = defaults;
        self
    }

    #[must_use]
    pub fn max_length(mut self, max_length: usize) -> Self {
        self.defaults.max_length = max_length;
        self
    }

    #[must_use]
    pub fn strict_mode(mut self, strict: bool) -> Self {
        self.defaults.strict_mode = strict;
        self
    }

    #[must_use]
    pub fn use_cache(mut self, use_cache: bool) -> Self {
        self.defaults.use_cache = use_cache;
        self
    }

    /// Finish the builder
    ///
    /// # Errors
    ///
    /// Returns `ContentError::InvalidConfig` when capacity or max length is
    /// zero, or the placeholder is blank.
    pub fn build(self) -> ContentResult<PipelineConfig> {
        let config = PipelineConfig {
            cache_capacity: self.cache_capacity,
            cache_max_age_secs: self.cache_max_age_secs,
            dom_parsing: self.dom_parsing,
            placeholder: self.placeholder,
            defaults: self.defaults,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults_are_valid() {
        let config = PipelineConfig::builder().build().unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = PipelineConfig::builder().cache_capacity(0).build().unwrap_err();
        assert!(matches!(err, ContentError::InvalidConfig(_)));
    }

    #[test]
    fn test_blank_placeholder_rejected() {
        let err = PipelineConfig::builder().placeholder("  ").build().unwrap_err();
        assert!(err.to_string().contains("placeholder"));
    }

    #[test]
    fn test_json_uses_defaults_for_missing_keys() {
        let config = PipelineConfig::from_json_str(
            r#"{"cache_capacity": 5, "defaults": {"strictMode": true}}"#,
        )
        .unwrap();
        assert_eq!(config.cache_capacity(), 5);
        assert!(config.defaults().strict_mode);
        assert!(config.defaults().use_cache);
        assert_eq!(config.placeholder(), DEFAULT_PLACEHOLDER);
    }

    #[test]
    fn test_json_zero_max_length_rejected() {
        let err = PipelineConfig::from_json_str(r#"{"defaults": {"maxLength": 0}}"#).unwrap_err();
        assert!(matches!(err, ContentError::InvalidConfig(_)));
    }

    #[test]
    fn test_into_builder_overrides() {
        let config = PipelineConfig::default()
            .into_builder()
            .dom_parsing(false)
            .strict_mode(true)
            .build()
            .unwrap();
        assert!(!config.dom_parsing());
        assert!(config.defaults().strict_mode);
        assert_eq!(config.cache_capacity(), DEFAULT_CACHE_CAPACITY);
    }
}
