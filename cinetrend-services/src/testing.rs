//! In-memory sources for unit tests

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use cinetrend_core::{
    CineError, CineResult, DetailSource, KeywordSource, MovieDetails, RatingSource, RatingsReport,
    RatingsSource, RawRatings, SentimentSource, SentimentSummary, TitleDiscovery, TitleKey,
    TitleListing, TrendPoint, TrendSource,
};

/// Scriptable stand-in for every source trait
#[derive(Default)]
pub struct StubSource {
    listings: Vec<TitleListing>,
    ratings: HashMap<TitleKey, RawRatings>,
    trends: HashMap<TitleKey, Vec<TrendPoint>>,
    failing_ratings: HashSet<TitleKey>,
    failing_details: HashSet<TitleKey>,
    failing_discovery: bool,
    no_enrichment: bool,
    pub discover_calls: AtomicUsize,
}

impl StubSource {
    pub fn with_listings(mut self, titles: &[&str]) -> Self {
        self.listings = titles.iter().map(|t| TitleListing::new(*t, None)).collect();
        self
    }

    pub fn with_rating(mut self, title: &str, source: RatingSource, value: &str) -> Self {
        self.ratings
            .entry(TitleKey::new(title))
            .or_default()
            .set(source, value);
        self
    }

    pub fn with_trend(mut self, title: &str, points: Vec<TrendPoint>) -> Self {
        self.trends.insert(TitleKey::new(title), points);
        self
    }

    pub fn failing_ratings(mut self, title: &str) -> Self {
        self.failing_ratings.insert(TitleKey::new(title));
        self
    }

    pub fn failing_details(mut self, title: &str) -> Self {
        self.failing_details.insert(TitleKey::new(title));
        self
    }

    pub fn failing_discovery(mut self) -> Self {
        self.failing_discovery = true;
        self
    }

    /// Sentiment pending, no trend, no keywords
    pub fn without_enrichment(mut self) -> Self {
        self.no_enrichment = true;
        self
    }

    pub fn discover_count(&self) -> usize {
        self.discover_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TitleDiscovery for StubSource {
    async fn discover(&self) -> CineResult<Vec<TitleListing>> {
        self.discover_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_discovery {
            return Err(CineError::network("browse page unreachable"));
        }
        Ok(self.listings.clone())
    }
}

#[async_trait]
impl DetailSource for StubSource {
    async fn details(&self, listing: &TitleListing) -> CineResult<Option<MovieDetails>> {
        if self.failing_details.contains(&listing.key()) {
            return Err(CineError::parse("unexpected markup"));
        }
        Ok(Some(MovieDetails {
            genres: vec!["Drama".to_string()],
            director: Some(format!("{} Director", listing.title)),
            release_streaming: NaiveDate::from_ymd_opt(2024, 10, 1),
            ..MovieDetails::default()
        }))
    }
}

#[async_trait]
impl RatingsSource for StubSource {
    async fn lookup(&self, title: &str) -> CineResult<Option<RatingsReport>> {
        let key = TitleKey::new(title);
        if self.failing_ratings.contains(&key) {
            return Err(CineError::api("status 500"));
        }
        Ok(self.ratings.get(&key).map(|ratings| RatingsReport {
            ratings: ratings.clone(),
            cast: vec![format!("{} Lead", title)],
            ..RatingsReport::default()
        }))
    }
}

#[async_trait]
impl SentimentSource for StubSource {
    async fn summarize(&self, title: &str) -> CineResult<Option<SentimentSummary>> {
        if self.no_enrichment {
            return Ok(None);
        }
        Ok(Some(SentimentSummary {
            main_actor: Some(format!("{} Lead", title)),
            summary: "Mostly positive".to_string(),
        }))
    }
}

#[async_trait]
impl TrendSource for StubSource {
    async fn interest(&self, title: &str) -> CineResult<Vec<TrendPoint>> {
        if self.no_enrichment {
            return Ok(Vec::new());
        }
        if let Some(points) = self.trends.get(&TitleKey::new(title)) {
            return Ok(points.clone());
        }
        Ok(NaiveDate::from_ymd_opt(2024, 8, 16)
            .map(|date| TrendPoint {
                date,
                views: 100,
                interest: 100,
            })
            .into_iter()
            .collect())
    }
}

#[async_trait]
impl KeywordSource for StubSource {
    async fn keywords(&self, title: &str) -> CineResult<Vec<String>> {
        if self.no_enrichment {
            return Ok(Vec::new());
        }
        Ok(vec![format!("{} cast", title.to_lowercase())])
    }
}
