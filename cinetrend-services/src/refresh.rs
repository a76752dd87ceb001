//! Refresh pipeline: discovery, details, enrichment and snapshot

use std::fmt;
use std::sync::Arc;

use cinetrend_core::{
    CineError, DetailSource, Field, RecordSet, TitleDiscovery, TitleListing,
};
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

use crate::enricher::Enricher;
use crate::snapshot_cache::{CacheError, SnapshotCache};

#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    #[error("Discovery returned no titles")]
    NoData,
    #[error("Discovery failed: {0}")]
    Discovery(#[source] CineError),
    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Where a record set handed out by [`Refresher::ensure_fresh`] came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Cache,
    Refreshed,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Cache => f.write_str("cache"),
            Origin::Refreshed => f.write_str("refresh"),
        }
    }
}

/// Titles found by the last successful discovery
#[derive(Debug, Default)]
pub struct ListingMemo {
    listings: RwLock<Option<Vec<TitleListing>>>,
}

impl ListingMemo {
    pub async fn get(&self) -> Option<Vec<TitleListing>> {
        self.listings.read().await.clone()
    }

    pub async fn store(&self, listings: Vec<TitleListing>) {
        *self.listings.write().await = Some(listings);
    }

    pub async fn invalidate(&self) {
        *self.listings.write().await = None;
    }
}

/// Drives one refresh cycle end to end
pub struct Refresher {
    discovery: Arc<dyn TitleDiscovery>,
    details: Arc<dyn DetailSource>,
    enricher: Enricher,
    cache: SnapshotCache,
    listings: ListingMemo,
}

impl Refresher {
    pub fn new(
        discovery: Arc<dyn TitleDiscovery>,
        details: Arc<dyn DetailSource>,
        enricher: Enricher,
        cache: SnapshotCache,
    ) -> Self {
        Self {
            discovery,
            details,
            enricher,
            cache,
            listings: ListingMemo::default(),
        }
    }

    pub fn cache(&self) -> &SnapshotCache {
        &self.cache
    }

    async fn listings(&self) -> Result<Vec<TitleListing>, RefreshError> {
        if let Some(listings) = self.listings.get().await {
            info!("Reusing {} memoized titles", listings.len());
            return Ok(listings);
        }

        let listings = self
            .discovery
            .discover()
            .await
            .map_err(RefreshError::Discovery)?;

        if !listings.is_empty() {
            self.listings.store(listings.clone()).await;
        }
        Ok(listings)
    }

    /// Discover, enrich and snapshot a full record set
    ///
    /// Zero discovered titles is fatal and leaves the snapshot untouched.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<RecordSet, RefreshError> {
        let listings = self.listings().await?;
        if listings.is_empty() {
            warn!("Discovery found no titles; keeping the existing snapshot");
            return Err(RefreshError::NoData);
        }

        let mut records = RecordSet::from_listings(listings);
        info!("Refreshing {} titles", records.len());

        for record in records.iter_mut() {
            let listing = TitleListing::new(record.title.clone(), record.url.clone());
            record.details = match self.details.details(&listing).await {
                Ok(details) => Field::from_option(details),
                Err(e) => {
                    warn!("Detail lookup failed for {}: {}", record.title, e);
                    Field::Unavailable
                }
            };
        }

        let stats = self.enricher.enrich(&mut records).await;
        if stats.total_failures() > 0 {
            warn!("Enrichment finished with failures: {:?}", stats.failures);
        }

        self.cache.save(&records)?;
        Ok(records)
    }

    /// Serve the snapshot while it is fresh, otherwise refresh
    #[instrument(skip(self))]
    pub async fn ensure_fresh(&self) -> Result<(RecordSet, Origin), RefreshError> {
        if self.cache.is_valid() {
            match self.cache.load() {
                Ok(records) => return Ok((records, Origin::Cache)),
                Err(CacheError::Corrupt { path, message }) => {
                    warn!("Regenerating corrupt snapshot {}: {}", path.display(), message);
                }
                Err(CacheError::Missing(_)) => {}
                Err(e) => return Err(e.into()),
            }
        }

        let records = self.refresh().await?;
        Ok((records, Origin::Refreshed))
    }

    /// Forget memoized titles and refresh
    pub async fn force_refresh(&self) -> Result<RecordSet, RefreshError> {
        self.listings.invalidate().await;
        self.refresh().await
    }
}
