//! Stand-in for a source whose API key is not configured

use async_trait::async_trait;
use cinetrend_core::{
    CineResult, KeywordSource, RatingsReport, RatingsSource, SentimentSource, SentimentSummary,
    TrendPoint, TrendSource,
};
use tracing::debug;

/// Reports "no data" for every title
#[derive(Debug, Clone)]
pub struct Unconfigured {
    name: &'static str,
}

impl Unconfigured {
    pub fn new(name: &'static str) -> Self {
        Self { name }
    }
}

#[async_trait]
impl RatingsSource for Unconfigured {
    async fn lookup(&self, title: &str) -> CineResult<Option<RatingsReport>> {
        debug!("{} not configured, skipping ratings for {}", self.name, title);
        Ok(None)
    }
}

#[async_trait]
impl SentimentSource for Unconfigured {
    async fn summarize(&self, title: &str) -> CineResult<Option<SentimentSummary>> {
        debug!("{} not configured, skipping sentiment for {}", self.name, title);
        Ok(None)
    }
}

#[async_trait]
impl TrendSource for Unconfigured {
    async fn interest(&self, title: &str) -> CineResult<Vec<TrendPoint>> {
        debug!("{} not configured, skipping trend for {}", self.name, title);
        Ok(Vec::new())
    }
}

#[async_trait]
impl KeywordSource for Unconfigured {
    async fn keywords(&self, title: &str) -> CineResult<Vec<String>> {
        debug!("{} not configured, skipping keywords for {}", self.name, title);
        Ok(Vec::new())
    }
}
