//! Trending Score computation
//!
//! Every configured source contributes either its normalized rating or its
//! fallback value, so a record is always scored over the full weight set.
//! Weights are divided by their total once, at construction.

use std::collections::{BTreeMap, HashSet};

use cinetrend_core::{Field, RatingSource, RatingsReport, RawRatings};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, ScoringError};
use crate::normalize::{NormalizedRating, normalize, scale_for};

/// Fallback (normalized) used for a source with no data
pub const DEFAULT_FALLBACK: f64 = 60.0;

fn default_fallback() -> f64 {
    DEFAULT_FALLBACK
}

/// Weight and fallback of one rating source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    pub source: RatingSource,
    pub weight: f64,
    #[serde(default = "default_fallback")]
    pub fallback: f64,
}

impl WeightEntry {
    pub fn new(source: RatingSource, weight: f64, fallback: f64) -> Self {
        Self {
            source,
            weight,
            fallback,
        }
    }
}

/// The set of weighted sources a [`Scorer`] blends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightProfile {
    pub entries: Vec<WeightEntry>,
}

impl Default for WeightProfile {
    fn default() -> Self {
        Self {
            entries: vec![
                WeightEntry::new(RatingSource::Imdb, 0.35, DEFAULT_FALLBACK),
                WeightEntry::new(RatingSource::RottenTomatoes, 0.40, DEFAULT_FALLBACK),
                WeightEntry::new(RatingSource::Metacritic, 0.15, DEFAULT_FALLBACK),
                WeightEntry::new(RatingSource::ImdbVotes, 0.02, DEFAULT_FALLBACK),
                WeightEntry::new(RatingSource::Metascore, 0.10, DEFAULT_FALLBACK),
            ],
        }
    }
}

/// Normalized ratings of one record; a missing source is absent
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedRatings {
    values: BTreeMap<RatingSource, NormalizedRating>,
}

impl NormalizedRatings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize every raw field against its source's native scale
    pub fn from_raw(raw: &RawRatings) -> Self {
        let mut ratings = Self::new();
        for source in RatingSource::ALL {
            let normalized = raw.get(source).and_then(|value| normalize(value, scale_for(source)));
            ratings.set(source, normalized);
        }
        ratings
    }

    pub fn with(mut self, source: RatingSource, rating: Option<NormalizedRating>) -> Self {
        self.set(source, rating);
        self
    }

    pub fn set(&mut self, source: RatingSource, rating: Option<NormalizedRating>) {
        match rating {
            Some(rating) => {
                self.values.insert(source, rating);
            }
            None => {
                self.values.remove(&source);
            }
        }
    }

    pub fn get(&self, source: RatingSource) -> Option<NormalizedRating> {
        self.values.get(&source).copied()
    }
}

#[derive(Debug, Clone)]
struct EffectiveWeight {
    source: RatingSource,
    weight: f64,
    fallback: f64,
}

/// Blends normalized ratings into one Trending Score
#[derive(Debug, Clone)]
pub struct Scorer {
    weights: Vec<EffectiveWeight>,
}

impl Default for Scorer {
    fn default() -> Self {
        // The default profile always validates
        Self::from_valid_profile(&WeightProfile::default())
    }
}

impl Scorer {
    /// Validate a profile and build a scorer from it
    pub fn new(profile: &WeightProfile) -> Result<Self> {
        let mut seen = HashSet::new();
        for entry in &profile.entries {
            if !seen.insert(entry.source) {
                return Err(ScoringError::DuplicateSource(entry.source));
            }
            if !entry.weight.is_finite() || entry.weight < 0.0 {
                return Err(ScoringError::InvalidWeight {
                    source_name: entry.source,
                    weight: entry.weight,
                });
            }
            if !entry.fallback.is_finite() || !(0.0..=100.0).contains(&entry.fallback) {
                return Err(ScoringError::InvalidFallback {
                    source_name: entry.source,
                    fallback: entry.fallback,
                });
            }
        }

        let total: f64 = profile.entries.iter().map(|e| e.weight).sum();
        if !total.is_finite() {
            return Err(ScoringError::NonFiniteTotal(total));
        }
        Ok(Self::from_valid_profile(profile))
    }

    fn from_valid_profile(profile: &WeightProfile) -> Self {
        let total: f64 = profile.entries.iter().map(|e| e.weight).sum();
        if total <= 0.0 {
            debug!("Weight profile has no positive weight; scores are undefined");
            return Self { weights: Vec::new() };
        }

        let weights = profile
            .entries
            .iter()
            .filter(|e| e.weight > 0.0)
            .map(|e| EffectiveWeight {
                source: e.source,
                weight: e.weight / total,
                fallback: e.fallback,
            })
            .collect();

        Self { weights }
    }

    /// Weighted score over every configured source, rounded to one decimal
    ///
    /// Returns `None` when no source carries weight.
    pub fn score(&self, ratings: &NormalizedRatings) -> Option<f64> {
        if self.weights.is_empty() {
            return None;
        }

        let total: f64 = self
            .weights
            .iter()
            .map(|w| {
                let value = ratings
                    .get(w.source)
                    .map(|r| r.value())
                    .unwrap_or(w.fallback);
                value * w.weight
            })
            .sum();

        Some(round_score(total))
    }

    /// Normalize raw rating strings and score them
    pub fn score_raw(&self, raw: &RawRatings) -> Option<f64> {
        self.score(&NormalizedRatings::from_raw(raw))
    }

    /// Score a record's ratings field; anything but `Available` scores
    /// entirely from fallbacks
    pub fn score_field(&self, ratings: &Field<RatingsReport>) -> Option<f64> {
        match ratings.as_available() {
            Some(report) => self.score_raw(&report.ratings),
            None => self.score(&NormalizedRatings::new()),
        }
    }

    /// Score of a record with no ratings at all
    pub fn fallback_score(&self) -> Option<f64> {
        self.score(&NormalizedRatings::new())
    }
}

fn round_score(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
