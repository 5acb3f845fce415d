//! Error types for query building operations

use thiserror::Error;

/// Errors that can occur while assembling SQL text
#[derive(Debug, Error)]
pub enum QueryBuilderError {
    /// Entity metadata is missing something the statement needs
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A combinator or list builder was handed nothing to work with
    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl QueryBuilderError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn empty_input(msg: impl Into<String>) -> Self {
        Self::EmptyInput(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, QueryBuilderError>;
