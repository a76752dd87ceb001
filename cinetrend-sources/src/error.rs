//! Error types for the source clients

use cinetrend_core::CineError;
use thiserror::Error;

/// Errors that can occur while talking to an external source
#[derive(Debug, Error)]
pub enum SourceError {
    /// HTTP request failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// API returned an error response
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from API
        message: String,
    },

    /// Failed to parse a response body
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Page scraping produced nothing usable
    #[error("Scrape failed: {0}")]
    ScrapeFailed(String),

    /// Language model call failed
    #[error("Completion failed: {0}")]
    CompletionFailed(String),
}

impl From<SourceError> for CineError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::RequestFailed(msg) => CineError::network(msg),
            SourceError::ApiError { status, message } => {
                CineError::api(format!("status {}: {}", status, message))
            }
            SourceError::ParseError(msg) | SourceError::ScrapeFailed(msg) => CineError::parse(msg),
            SourceError::CompletionFailed(msg) => CineError::source("llm", msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_errors_map_onto_pipeline_errors() {
        assert!(matches!(
            CineError::from(SourceError::RequestFailed("timeout".to_string())),
            CineError::Network(_)
        ));
        assert!(matches!(
            CineError::from(SourceError::ApiError {
                status: 503,
                message: "busy".to_string()
            }),
            CineError::Api(msg) if msg.contains("503")
        ));
        assert!(matches!(
            CineError::from(SourceError::ScrapeFailed("no tiles".to_string())),
            CineError::Parse(_)
        ));
        assert!(matches!(
            CineError::from(SourceError::CompletionFailed("rate limited".to_string())),
            CineError::Source { source_name, .. } if source_name == "llm"
        ));
    }
}
