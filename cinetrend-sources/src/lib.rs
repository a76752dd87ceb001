//! Clients for the external movie metadata sources
//!
//! This crate provides clients for:
//! - Rotten Tomatoes: title discovery and detail page scraping
//! - OMDb: ratings, cast, awards and poster
//! - OpenAI: sentiment overview via chat completions
//! - Wikimedia: daily pageviews as a search-interest proxy
//! - SerpApi: related search keywords
//!
//! Each client implements the matching `cinetrend_core` source trait.

pub mod error;
pub mod http;
pub mod keywords;
pub mod omdb;
pub mod pageviews;
pub mod rotten_tomatoes;
pub mod sentiment;
pub mod types;
pub mod unconfigured;

pub use error::SourceError;
pub use keywords::{SerpApiClient, DEFAULT_KEYWORD_COUNT};
pub use omdb::OmdbClient;
pub use pageviews::{PageviewsClient, DEFAULT_TREND_DAYS};
pub use rotten_tomatoes::{RottenTomatoesClient, DEFAULT_BROWSE_URL};
pub use sentiment::{SentimentClient, DEFAULT_SENTIMENT_MODEL};
pub use unconfigured::Unconfigured;
