//! Abstractions over the external collaborators the pipeline calls
//!
//! Each trait maps one inbound source. `Ok(None)` / an empty collection
//! means the source has no data for the title; `Err` means the source
//! itself failed (network, API, parse).

use async_trait::async_trait;

use crate::error::CineResult;
use crate::record::{MovieDetails, RatingsReport, SentimentSummary, TitleListing, TrendPoint};

/// Finds the titles a refresh cycle works on
#[async_trait]
pub trait TitleDiscovery: Send + Sync {
    async fn discover(&self) -> CineResult<Vec<TitleListing>>;
}

/// Per-title descriptive details
#[async_trait]
pub trait DetailSource: Send + Sync {
    async fn details(&self, listing: &TitleListing) -> CineResult<Option<MovieDetails>>;
}

/// Rating map, credits, awards and poster keyed by title
#[async_trait]
pub trait RatingsSource: Send + Sync {
    async fn lookup(&self, title: &str) -> CineResult<Option<RatingsReport>>;
}

/// Free-text sentiment overview keyed by title; `None` means pending
#[async_trait]
pub trait SentimentSource: Send + Sync {
    async fn summarize(&self, title: &str) -> CineResult<Option<SentimentSummary>>;
}

/// Time-indexed relative search interest keyed by title
#[async_trait]
pub trait TrendSource: Send + Sync {
    async fn interest(&self, title: &str) -> CineResult<Vec<TrendPoint>>;
}

/// Related search terms keyed by title
#[async_trait]
pub trait KeywordSource: Send + Sync {
    async fn keywords(&self, title: &str) -> CineResult<Vec<String>>;
}
