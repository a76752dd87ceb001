//! Core types for the CineTrend pipeline
//!
//! This crate defines the shared data structures used across the workspace,
//! including the movie record schema, raw rating fields, and the source
//! abstractions the enrichment pipeline calls out to.

pub mod error;
pub mod rating;
pub mod record;
pub mod source;

pub use error::{CineError, CineResult};
pub use rating::{RatingSource, RawRatings};
pub use record::{
    Field, MovieDetails, MovieRecord, RatingsReport, RecordSet, SentimentSummary, TitleKey,
    TitleListing, TrendPoint,
};
pub use source::{
    DetailSource, KeywordSource, RatingsSource, SentimentSource, TitleDiscovery, TrendSource,
};
