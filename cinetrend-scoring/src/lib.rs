//! Rating normalization and Trending Score computation
//!
//! This crate turns heterogeneous raw ratings into one ranking signal.
//!
//! ## Features
//! - Parse percent, fraction, comma-separated and plain numeric ratings
//! - Rescale each rating from its native scale onto 0 - 100
//! - Blend normalized ratings with fixed weights and fallback values

pub mod error;
pub mod normalize;
pub mod scorer;

pub use error::{Result, ScoringError};
pub use normalize::{NativeScale, NormalizedRating, RawValue, normalize, scale_for};
pub use scorer::{NormalizedRatings, Scorer, WeightEntry, WeightProfile};
