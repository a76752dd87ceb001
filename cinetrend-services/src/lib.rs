//! Pipeline services for CineTrend
//!
//! This crate wires the source clients into the refresh pipeline: pacing,
//! enrichment, the snapshot cache and catalog queries over the result.

pub mod catalog;
pub mod config;
pub mod enricher;
pub mod pacer;
pub mod refresh;
pub mod snapshot_cache;

#[cfg(test)]
mod testing;

pub use catalog::{CatalogQuery, ScoreBand, SortKey};
pub use config::{AppConfig, ConfigError};
pub use enricher::{EnrichmentSources, EnrichmentStats, Enricher, RecordOutcome, Stage};
pub use pacer::{Pacer, PacerStats};
pub use refresh::{ListingMemo, Origin, RefreshError, Refresher};
pub use snapshot_cache::{CacheError, FreshnessWindow, SnapshotCache, SNAPSHOT_FILE};
