//! Catalog queries over an enriched record set

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use cinetrend_core::{MovieRecord, RecordSet};

/// Ordering of query results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Highest first, unscored last
    #[default]
    TrendingScore,
    /// Alphabetical, case-insensitive
    Title,
    /// Newest streaming release first, undated last
    StreamingRelease,
    /// Newest theatrical release first, undated last
    TheaterRelease,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "score" | "trending" | "trending-score" => Ok(SortKey::TrendingScore),
            "title" => Ok(SortKey::Title),
            "streaming" | "streaming-release" => Ok(SortKey::StreamingRelease),
            "theaters" | "theater-release" => Ok(SortKey::TheaterRelease),
            other => Err(format!("unknown sort key '{}'", other)),
        }
    }
}

/// Coarse bucket of a Trending Score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    High,
    Medium,
    Low,
    Unscored,
}

impl ScoreBand {
    /// High above 75, Medium from 60 to 75, Low below 60
    pub fn of(score: Option<f64>) -> Self {
        match score {
            Some(s) if s > 75.0 => ScoreBand::High,
            Some(s) if s >= 60.0 => ScoreBand::Medium,
            Some(s) if s.is_finite() => ScoreBand::Low,
            _ => ScoreBand::Unscored,
        }
    }
}

impl fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ScoreBand::High => "high",
            ScoreBand::Medium => "medium",
            ScoreBand::Low => "low",
            ScoreBand::Unscored => "unscored",
        };
        f.write_str(label)
    }
}

/// Search, filter, sort and limit over a record set
#[derive(Debug, Clone, Default)]
pub struct CatalogQuery {
    pub search: Option<String>,
    pub genres: Vec<String>,
    /// Inclusive streaming release window
    pub released_between: Option<(NaiveDate, NaiveDate)>,
    pub sort: SortKey,
    pub limit: Option<usize>,
}

impl CatalogQuery {
    pub fn apply<'a>(&self, records: &'a RecordSet) -> Vec<&'a MovieRecord> {
        let needle = self
            .search
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());

        let mut matched: Vec<&MovieRecord> = records
            .iter()
            .filter(|r| needle.as_deref().map_or(true, |n| matches_search(r, n)))
            .filter(|r| self.matches_genres(r))
            .filter(|r| self.matches_release_window(r))
            .collect();

        matched.sort_by(|a, b| compare(self.sort, a, b));

        if let Some(limit) = self.limit {
            matched.truncate(limit);
        }
        matched
    }

    fn matches_genres(&self, record: &MovieRecord) -> bool {
        if self.genres.is_empty() {
            return true;
        }
        record.genres().iter().any(|genre| {
            self.genres
                .iter()
                .any(|wanted| wanted.eq_ignore_ascii_case(genre))
        })
    }

    fn matches_release_window(&self, record: &MovieRecord) -> bool {
        let Some((start, end)) = self.released_between else {
            return true;
        };
        record
            .details()
            .and_then(|d| d.release_streaming)
            .is_some_and(|date| date >= start && date <= end)
    }
}

/// Case-insensitive substring over title, director, genres and cast
fn matches_search(record: &MovieRecord, needle: &str) -> bool {
    let hit = |text: &str| text.to_lowercase().contains(needle);

    hit(&record.title)
        || record
            .details()
            .and_then(|d| d.director.as_deref())
            .is_some_and(hit)
        || record.genres().iter().any(|g| hit(g))
        || record.cast().iter().any(|c| hit(c))
}

/// `Some` before `None`; among `Some`, larger first
fn descending_present<T: PartialOrd>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare(sort: SortKey, a: &MovieRecord, b: &MovieRecord) -> Ordering {
    match sort {
        SortKey::TrendingScore => descending_present(a.trending_score, b.trending_score),
        SortKey::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        SortKey::StreamingRelease => descending_present(
            a.details().and_then(|d| d.release_streaming),
            b.details().and_then(|d| d.release_streaming),
        ),
        SortKey::TheaterRelease => descending_present(
            a.details().and_then(|d| d.release_theaters),
            b.details().and_then(|d| d.release_theaters),
        ),
    }
}

#[cfg(test)]
mod tests {
    use cinetrend_core::{Field, MovieDetails, RatingsReport, TitleListing};

    use super::*;

    fn record(title: &str, score: Option<f64>, genre: &str, streaming: Option<(i32, u32, u32)>) -> MovieRecord {
        let mut record = MovieRecord::new(TitleListing::new(title, None));
        record.trending_score = score;
        record.details = Field::Available(MovieDetails {
            genres: vec![genre.to_string()],
            director: Some(format!("{} Director", title)),
            release_streaming: streaming.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            ..MovieDetails::default()
        });
        record.ratings = Field::Available(RatingsReport {
            cast: vec![format!("{} Star", title)],
            ..RatingsReport::default()
        });
        record
    }

    fn catalog() -> RecordSet {
        let mut set = RecordSet::new();
        set.insert(record("Beta", Some(60.0), "Comedy", Some((2024, 9, 1))));
        set.insert(record("Alpha", Some(78.6), "Horror", Some((2024, 10, 15))));
        set.insert(record("Gamma", None, "Horror", None));
        set.insert(record("Delta", Some(45.0), "Drama", Some((2023, 1, 5))));
        set
    }

    fn titles(records: Vec<&MovieRecord>) -> Vec<&str> {
        records.into_iter().map(|r| r.title.as_str()).collect()
    }

    #[test]
    fn test_sort_by_score_unscored_last() {
        let set = catalog();
        let result = CatalogQuery::default().apply(&set);
        assert_eq!(titles(result), vec!["Alpha", "Beta", "Delta", "Gamma"]);
    }

    #[test]
    fn test_sort_by_title_and_release() {
        let set = catalog();
        let by_title = CatalogQuery {
            sort: SortKey::Title,
            ..CatalogQuery::default()
        };
        assert_eq!(titles(by_title.apply(&set)), vec!["Alpha", "Beta", "Delta", "Gamma"]);

        let by_release = CatalogQuery {
            sort: SortKey::StreamingRelease,
            ..CatalogQuery::default()
        };
        assert_eq!(titles(by_release.apply(&set)), vec!["Alpha", "Beta", "Delta", "Gamma"]);
    }

    #[test]
    fn test_search_covers_director_and_cast() {
        let set = catalog();
        let query = |s: &str| CatalogQuery {
            search: Some(s.to_string()),
            sort: SortKey::Title,
            ..CatalogQuery::default()
        };
        assert_eq!(titles(query("GAMMA").apply(&set)), vec!["Gamma"]);
        assert_eq!(titles(query("beta director").apply(&set)), vec!["Beta"]);
        assert_eq!(titles(query("delta star").apply(&set)), vec!["Delta"]);
        assert_eq!(titles(query("horror").apply(&set)), vec!["Alpha", "Gamma"]);
        assert_eq!(query("   ").apply(&set).len(), 4);
    }

    #[test]
    fn test_genre_and_release_filters() {
        let set = catalog();
        let horror = CatalogQuery {
            genres: vec!["horror".to_string()],
            ..CatalogQuery::default()
        };
        assert_eq!(titles(horror.apply(&set)), vec!["Alpha", "Gamma"]);

        let window = CatalogQuery {
            released_between: Some((
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(),
            )),
            ..CatalogQuery::default()
        };
        assert_eq!(titles(window.apply(&set)), vec!["Beta"]);
    }

    #[test]
    fn test_limit() {
        let set = catalog();
        let query = CatalogQuery {
            limit: Some(2),
            ..CatalogQuery::default()
        };
        assert_eq!(titles(query.apply(&set)), vec!["Alpha", "Beta"]);
    }

    #[test]
    fn test_score_bands() {
        assert_eq!(ScoreBand::of(Some(78.6)), ScoreBand::High);
        assert_eq!(ScoreBand::of(Some(75.0)), ScoreBand::Medium);
        assert_eq!(ScoreBand::of(Some(60.0)), ScoreBand::Medium);
        assert_eq!(ScoreBand::of(Some(59.9)), ScoreBand::Low);
        assert_eq!(ScoreBand::of(None), ScoreBand::Unscored);
    }

    #[test]
    fn test_parse_sort_key() {
        assert_eq!("title".parse::<SortKey>(), Ok(SortKey::Title));
        assert_eq!("Streaming".parse::<SortKey>(), Ok(SortKey::StreamingRelease));
        assert!("rating".parse::<SortKey>().is_err());
    }
}
