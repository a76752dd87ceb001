//! Movie record schema
//!
//! A [`MovieRecord`] is created by the discovery step with every enrichment
//! field [`Field::Pending`]. Each enrichment stage moves its own field to
//! [`Field::Available`] or [`Field::Unavailable`]; nothing downstream ever
//! sees a bare null.

use std::fmt;

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::rating::RawRatings;

/// Case-normalized identity key of a record
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TitleKey(String);

impl TitleKey {
    /// Trim, collapse inner whitespace and lower-case a title
    pub fn new(title: &str) -> Self {
        let normalized = title
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        Self(normalized)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TitleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// State of one enrichment field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Field<T> {
    /// Not produced yet
    Pending,
    /// Produced by its source
    Available(T),
    /// The source had no data or failed
    Unavailable,
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Field::Pending
    }
}

impl<T> Field<T> {
    pub fn as_available(&self) -> Option<&T> {
        match self {
            Field::Available(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Field::Available(_))
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Field::Unavailable)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Field::Pending)
    }

    /// `Some(v)` becomes `Available(v)`, `None` becomes `Unavailable`
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(value) => Field::Available(value),
            None => Field::Unavailable,
        }
    }
}

/// A title found by the discovery step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleListing {
    pub title: String,
    /// Absolute URL of the title's detail page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl TitleListing {
    pub fn new(title: impl Into<String>, url: Option<String>) -> Self {
        Self {
            title: title.into(),
            url,
        }
    }

    pub fn key(&self) -> TitleKey {
        TitleKey::new(&self.title)
    }
}

/// Descriptive fields scraped from a title's detail page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieDetails {
    #[serde(default)]
    pub genres: Vec<String>,
    pub synopsis: Option<String>,
    pub director: Option<String>,
    /// Content rating such as "PG-13"
    pub content_rating: Option<String>,
    pub release_theaters: Option<NaiveDate>,
    pub release_streaming: Option<NaiveDate>,
    pub runtime: Option<String>,
    pub box_office: Option<String>,
}

/// Everything the ratings lookup returns for one title
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingsReport {
    pub ratings: RawRatings,
    #[serde(default)]
    pub cast: Vec<String>,
    pub awards: Option<String>,
    pub poster_url: Option<String>,
}

/// Language-model sentiment overview for a title
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentSummary {
    /// Lead actor the overview was asked about
    pub main_actor: Option<String>,
    pub summary: String,
}

/// One day of relative search interest
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    /// Raw page views for the day
    pub views: u64,
    /// Views relative to the series peak (0 - 100)
    pub interest: u8,
}

/// A fully or partially enriched movie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub details: Field<MovieDetails>,
    #[serde(default)]
    pub ratings: Field<RatingsReport>,
    #[serde(default)]
    pub sentiment: Field<SentimentSummary>,
    #[serde(default)]
    pub trend: Field<Vec<TrendPoint>>,
    #[serde(default)]
    pub keywords: Field<Vec<String>>,
    /// Composite score (0 - 100); `None` when no weights are configured
    pub trending_score: Option<f64>,
}

impl MovieRecord {
    /// A freshly discovered record with every enrichment field pending
    pub fn new(listing: TitleListing) -> Self {
        Self {
            title: listing.title,
            url: listing.url,
            details: Field::Pending,
            ratings: Field::Pending,
            sentiment: Field::Pending,
            trend: Field::Pending,
            keywords: Field::Pending,
            trending_score: None,
        }
    }

    pub fn key(&self) -> TitleKey {
        TitleKey::new(&self.title)
    }

    pub fn details(&self) -> Option<&MovieDetails> {
        self.details.as_available()
    }

    pub fn cast(&self) -> &[String] {
        self.ratings
            .as_available()
            .map(|r| r.cast.as_slice())
            .unwrap_or_default()
    }

    pub fn genres(&self) -> &[String] {
        self.details()
            .map(|d| d.genres.as_slice())
            .unwrap_or_default()
    }
}

/// Ordered set of records keyed by [`TitleKey`]
///
/// Iteration follows insertion (discovery) order. Serialized as a plain list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<MovieRecord>", into = "Vec<MovieRecord>")]
pub struct RecordSet {
    records: IndexMap<TitleKey, MovieRecord>,
}

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from discovered listings, dropping duplicate titles
    pub fn from_listings(listings: impl IntoIterator<Item = TitleListing>) -> Self {
        let mut set = Self::new();
        for listing in listings {
            set.insert(MovieRecord::new(listing));
        }
        set
    }

    /// Insert a record; returns `false` (and keeps the existing record) when
    /// the key is already present
    pub fn insert(&mut self, record: MovieRecord) -> bool {
        let key = record.key();
        if self.records.contains_key(&key) {
            return false;
        }
        self.records.insert(key, record);
        true
    }

    pub fn get(&self, key: &TitleKey) -> Option<&MovieRecord> {
        self.records.get(key)
    }

    pub fn get_mut(&mut self, key: &TitleKey) -> Option<&mut MovieRecord> {
        self.records.get_mut(key)
    }

    pub fn get_by_title(&self, title: &str) -> Option<&MovieRecord> {
        self.get(&TitleKey::new(title))
    }

    pub fn keys(&self) -> Vec<TitleKey> {
        self.records.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MovieRecord> {
        self.records.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut MovieRecord> {
        self.records.values_mut()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl From<Vec<MovieRecord>> for RecordSet {
    fn from(records: Vec<MovieRecord>) -> Self {
        let mut set = RecordSet::new();
        for record in records {
            set.insert(record);
        }
        set
    }
}

impl From<RecordSet> for Vec<MovieRecord> {
    fn from(set: RecordSet) -> Self {
        set.records.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_key_normalization() {
        assert_eq!(TitleKey::new("  The   Substance "), TitleKey::new("the substance"));
        assert_eq!(TitleKey::new("ALIEN: Romulus").as_str(), "alien: romulus");
    }

    #[test]
    fn test_record_set_drops_duplicate_titles() {
        let set = RecordSet::from_listings(vec![
            TitleListing::new("Alpha", Some("https://example.com/m/alpha".to_string())),
            TitleListing::new("ALPHA ", None),
            TitleListing::new("Beta", None),
        ]);

        assert_eq!(set.len(), 2);
        let alpha = set.get_by_title("alpha").unwrap();
        assert_eq!(alpha.url.as_deref(), Some("https://example.com/m/alpha"));
        assert_eq!(
            set.iter().map(|r| r.title.as_str()).collect::<Vec<_>>(),
            vec!["Alpha", "Beta"]
        );
    }

    #[test]
    fn test_new_record_is_pending() {
        let record = MovieRecord::new(TitleListing::new("Alpha", None));
        assert!(record.details.is_pending());
        assert!(record.ratings.is_pending());
        assert!(record.sentiment.is_pending());
        assert!(record.trend.is_pending());
        assert!(record.keywords.is_pending());
        assert!(record.trending_score.is_none());
        assert!(record.cast().is_empty());
    }

    #[test]
    fn test_field_serde_shape() {
        let available: Field<Vec<String>> = Field::Available(vec!["alpha cast".to_string()]);
        let json = serde_json::to_value(&available).unwrap();
        assert_eq!(json["status"], "available");
        assert_eq!(json["value"][0], "alpha cast");

        let unavailable: Field<Vec<String>> = Field::Unavailable;
        let json = serde_json::to_string(&unavailable).unwrap();
        assert_eq!(json, r#"{"status":"unavailable"}"#);
        let parsed: Field<Vec<String>> = serde_json::from_str(&json).unwrap();
        assert!(parsed.is_unavailable());
    }

    #[test]
    fn test_record_set_serializes_as_list() {
        let mut set = RecordSet::from_listings(vec![TitleListing::new("Alpha", None)]);
        set.get_mut(&TitleKey::new("alpha")).unwrap().trending_score = Some(78.6);

        let json = serde_json::to_value(&set).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["title"], "Alpha");
        assert_eq!(json[0]["trending_score"], 78.6);

        let parsed: RecordSet = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, set);
    }
}
