//! Error types for the pipeline

use thiserror::Error;

/// Pipeline-wide error type
#[derive(Error, Debug)]
pub enum CineError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Source error ({source_name}): {message}")]
    Source { source_name: String, message: String },
}

impl CineError {
    pub fn api(msg: impl Into<String>) -> Self {
        CineError::Api(msg.into())
    }

    pub fn network(msg: impl Into<String>) -> Self {
        CineError::Network(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        CineError::Parse(msg.into())
    }

    pub fn source(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        CineError::Source {
            source_name: source_name.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for pipeline operations
pub type CineResult<T> = Result<T, CineError>;
