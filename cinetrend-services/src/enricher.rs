//! Enricher
//!
//! Runs the per-title enrichment stages in order: ratings, Trending Score,
//! sentiment, trend and keywords. A failing source marks only its own field
//! unavailable; the batch always runs to the end.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use cinetrend_core::{
    Field, KeywordSource, MovieRecord, RatingsSource, RecordSet, SentimentSource, TrendSource,
};
use cinetrend_scoring::Scorer;
use tracing::{debug, info, instrument, warn};

use crate::pacer::Pacer;

/// One enrichment stage that calls out to a source
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Ratings,
    Sentiment,
    Trend,
    Keywords,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Ratings => "ratings",
            Stage::Sentiment => "sentiment",
            Stage::Trend => "trend",
            Stage::Keywords => "keywords",
        };
        f.write_str(name)
    }
}

/// The sources an [`Enricher`] calls
#[derive(Clone)]
pub struct EnrichmentSources {
    pub ratings: Arc<dyn RatingsSource>,
    pub sentiment: Arc<dyn SentimentSource>,
    pub trend: Arc<dyn TrendSource>,
    pub keywords: Arc<dyn KeywordSource>,
}

/// Stages whose source errored for one record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordOutcome {
    pub failed: Vec<Stage>,
}

impl RecordOutcome {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Totals over one enrichment pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichmentStats {
    pub processed: usize,
    pub failures: BTreeMap<Stage, usize>,
}

impl EnrichmentStats {
    pub fn failures_for(&self, stage: Stage) -> usize {
        self.failures.get(&stage).copied().unwrap_or(0)
    }

    pub fn total_failures(&self) -> usize {
        self.failures.values().sum()
    }

    fn record(&mut self, outcome: &RecordOutcome) {
        self.processed += 1;
        for stage in &outcome.failed {
            *self.failures.entry(*stage).or_insert(0) += 1;
        }
    }
}

/// Fills the enrichment fields of discovered records
pub struct Enricher {
    sources: EnrichmentSources,
    scorer: Scorer,
    trend_pacer: Pacer,
}

impl Enricher {
    pub fn new(sources: EnrichmentSources, scorer: Scorer, trend_pacer: Pacer) -> Self {
        Self {
            sources,
            scorer,
            trend_pacer,
        }
    }

    /// Enrich every record in set order
    pub async fn enrich(&self, records: &mut RecordSet) -> EnrichmentStats {
        let mut stats = EnrichmentStats::default();

        for key in records.keys() {
            let Some(record) = records.get_mut(&key) else {
                continue;
            };
            let outcome = self.enrich_record(record).await;
            stats.record(&outcome);
        }

        info!(
            "Enriched {} records ({} source failures)",
            stats.processed,
            stats.total_failures()
        );
        stats
    }

    /// Run every stage for one record
    #[instrument(skip_all, fields(title = %record.title))]
    pub async fn enrich_record(&self, record: &mut MovieRecord) -> RecordOutcome {
        let mut outcome = RecordOutcome::default();
        let title = record.title.clone();

        record.ratings = match self.sources.ratings.lookup(&title).await {
            Ok(report) => Field::from_option(report),
            Err(e) => {
                warn!("Ratings lookup failed for {}: {}", title, e);
                outcome.failed.push(Stage::Ratings);
                Field::Unavailable
            }
        };

        record.trending_score = self.scorer.score_field(&record.ratings);
        debug!("Trending score for {}: {:?}", title, record.trending_score);

        record.sentiment = match self.sources.sentiment.summarize(&title).await {
            Ok(Some(summary)) => Field::Available(summary),
            Ok(None) => Field::Pending,
            Err(e) => {
                warn!("Sentiment lookup failed for {}: {}", title, e);
                outcome.failed.push(Stage::Sentiment);
                Field::Unavailable
            }
        };

        self.trend_pacer.acquire().await;
        record.trend = match self.sources.trend.interest(&title).await {
            Ok(points) if points.is_empty() => Field::Unavailable,
            Ok(points) => Field::Available(points),
            Err(e) => {
                warn!("Trend lookup failed for {}: {}", title, e);
                outcome.failed.push(Stage::Trend);
                Field::Unavailable
            }
        };

        record.keywords = match self.sources.keywords.keywords(&title).await {
            Ok(keywords) if keywords.is_empty() => Field::Unavailable,
            Ok(keywords) => Field::Available(keywords),
            Err(e) => {
                warn!("Keyword lookup failed for {}: {}", title, e);
                outcome.failed.push(Stage::Keywords);
                Field::Unavailable
            }
        };

        outcome
    }
}
