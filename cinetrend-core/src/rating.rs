//! Rating sources and their raw, unnormalized values

use std::fmt;

use serde::{Deserialize, Serialize};

/// A rating signal that feeds the Trending Score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingSource {
    /// IMDb user rating, "8.1" or "8.1/10"
    Imdb,
    /// Rotten Tomatoes tomatometer, "93%"
    RottenTomatoes,
    /// Metacritic as reported in the ratings list, "67/100"
    Metacritic,
    /// Metascore as a bare number, "67"
    Metascore,
    /// IMDb vote count, "1,234,567"
    ImdbVotes,
}

impl RatingSource {
    pub const ALL: [RatingSource; 5] = [
        RatingSource::Imdb,
        RatingSource::RottenTomatoes,
        RatingSource::Metacritic,
        RatingSource::Metascore,
        RatingSource::ImdbVotes,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RatingSource::Imdb => "IMDb",
            RatingSource::RottenTomatoes => "Rotten Tomatoes",
            RatingSource::Metacritic => "Metacritic",
            RatingSource::Metascore => "Metascore",
            RatingSource::ImdbVotes => "IMDb Votes",
        }
    }
}

impl fmt::Display for RatingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raw rating strings as returned by the ratings lookup
///
/// Each field is `None` when the upstream source reported nothing (or a
/// placeholder such as "N/A").
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRatings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imdb_rating: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotten_tomatoes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metacritic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metascore: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imdb_votes: Option<String>,
}

impl RawRatings {
    /// Raw value reported for a source, if any
    pub fn get(&self, source: RatingSource) -> Option<&str> {
        let value = match source {
            RatingSource::Imdb => &self.imdb_rating,
            RatingSource::RottenTomatoes => &self.rotten_tomatoes,
            RatingSource::Metacritic => &self.metacritic,
            RatingSource::Metascore => &self.metascore,
            RatingSource::ImdbVotes => &self.imdb_votes,
        };
        value.as_deref()
    }

    /// Set a source's raw value, replacing any previous one
    pub fn set(&mut self, source: RatingSource, value: impl Into<String>) {
        let slot = match source {
            RatingSource::Imdb => &mut self.imdb_rating,
            RatingSource::RottenTomatoes => &mut self.rotten_tomatoes,
            RatingSource::Metacritic => &mut self.metacritic,
            RatingSource::Metascore => &mut self.metascore,
            RatingSource::ImdbVotes => &mut self.imdb_votes,
        };
        *slot = Some(value.into());
    }

    pub fn is_empty(&self) -> bool {
        RatingSource::ALL.iter().all(|s| self.get(*s).is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_and_set() {
        let mut ratings = RawRatings::default();
        assert!(ratings.is_empty());

        ratings.set(RatingSource::RottenTomatoes, "90%");
        ratings.set(RatingSource::ImdbVotes, "12,345");

        assert_eq!(ratings.get(RatingSource::RottenTomatoes), Some("90%"));
        assert_eq!(ratings.get(RatingSource::ImdbVotes), Some("12,345"));
        assert_eq!(ratings.get(RatingSource::Imdb), None);
        assert!(!ratings.is_empty());
    }

    #[test]
    fn test_source_serde_names() {
        let json = serde_json::to_string(&RatingSource::RottenTomatoes).unwrap();
        assert_eq!(json, "\"rotten_tomatoes\"");

        let parsed: RatingSource = serde_json::from_str("\"imdb_votes\"").unwrap();
        assert_eq!(parsed, RatingSource::ImdbVotes);
    }
}
