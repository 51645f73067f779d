// src/error.rs

//! Unified error handling for the exporter.

use std::fmt;

use thiserror::Error;

/// Result type alias for exporter operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Page structure did not match what the extractor expects
    #[error("Extract error for {context}: {message}")]
    Extract { context: String, message: String },

    /// A single record field could not be parsed
    #[error("Malformed {field} '{value}'")]
    Field { field: &'static str, value: String },

    /// Full-combo descriptor missing from the lamp table
    #[error("Unknown full combo descriptor '{0}'")]
    UnknownLamp(String),

    /// Difficulty index missing from the difficulty table
    #[error("Unknown difficulty index '{0}'")]
    UnknownDifficulty(String),

    /// Kamaitachi rejected or lost a score import
    #[error("Kamaitachi import error: {0}")]
    Import(String),

    /// Another export run holds the run guard
    #[error("An export run is already in progress")]
    RunInProgress,
}

impl AppError {
    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an extraction error with context.
    pub fn extract(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Extract {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Create a Kamaitachi import error.
    pub fn import(message: impl Into<String>) -> Self {
        Self::Import(message.into())
    }

    /// Create a malformed field error.
    pub fn field(field: &'static str, value: impl Into<String>) -> Self {
        Self::Field {
            field,
            value: value.into(),
        }
    }

    /// Whether the error concerns the content of one record rather than
    /// the page it came from.
    pub fn is_record_level(&self) -> bool {
        matches!(
            self,
            Self::Field { .. } | Self::UnknownLamp(_) | Self::UnknownDifficulty(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_level_classification() {
        assert!(AppError::UnknownLamp("x".into()).is_record_level());
        assert!(AppError::UnknownDifficulty("9".into()).is_record_level());
        assert!(AppError::field("score", "abc").is_record_level());
        assert!(!AppError::extract("listing", "no table").is_record_level());
        assert!(!AppError::RunInProgress.is_record_level());
    }

    #[test]
    fn test_display() {
        let err = AppError::field("timestamp", "yesterday");
        assert_eq!(err.to_string(), "Malformed timestamp 'yesterday'");
    }
}
