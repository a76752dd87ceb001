//! Error types for scoring configuration

use thiserror::Error;

use cinetrend_core::RatingSource;

pub type Result<T> = std::result::Result<T, ScoringError>;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("Invalid weight for {source_name}: {weight}")]
    InvalidWeight { source_name: RatingSource, weight: f64 },

    #[error("Invalid fallback for {source_name}: {fallback} (expected 0 - 100)")]
    InvalidFallback {
        source_name: RatingSource,
        fallback: f64,
    },

    #[error("Rating source listed twice: {0}")]
    DuplicateSource(RatingSource),

    #[error("Total weight is not finite: {0}")]
    NonFiniteTotal(f64),
}
