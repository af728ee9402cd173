//! Error types for the content pipeline
//!
//! Errors stay inside the pipeline: the strategy selector turns every one of
//! them into a fallback tier, and the translator reports them as a failed
//! `ProcessingResult`. They only reach callers through configuration loading
//! and the command-line front end.

use thiserror::Error;

/// Result type alias for pipeline operations
pub type ContentResult<T> = Result<T, ContentError>;

/// Error types for content processing
#[derive(Debug, Error)]
pub enum ContentError {
    /// Nothing to process
    #[error("Input is empty")]
    EmptyInput,

    /// Input exceeds the configured maximum length
    #[error("Input too large: {length} characters (maximum {max})")]
    InputTooLarge { length: usize, max: usize },

    /// DOM-based pass could not handle the markup
    #[error("HTML parse failed: {0}")]
    Parse(String),

    /// Sanitize/normalize pipeline produced no usable output
    #[error("Translation failed: {0}")]
    Translation(String),

    /// Configuration rejected by validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ContentError {
    /// Whether the error came from the input itself rather than the pipeline
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ContentError::EmptyInput | ContentError::InputTooLarge { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_too_large_message() {
        let err = ContentError::InputTooLarge {
            length: 12,
            max: 10,
        };
        assert_eq!(
            err.to_string(),
            "Input too large: 12 characters (maximum 10)"
        );
        assert!(err.is_input_error());
    }

    #[test]
    fn test_pipeline_errors_are_not_input_errors() {
        assert!(ContentError::EmptyInput.is_input_error());
        assert!(!ContentError::Parse("depth".into()).is_input_error());
        assert!(!ContentError::Translation("empty".into()).is_input_error());
    }
}
