//! OMDb ratings lookup

use std::time::Duration;

use async_trait::async_trait;
use cinetrend_core::{CineResult, RatingSource, RatingsReport, RatingsSource, RawRatings};
use reqwest::Client;
use tracing::{debug, instrument};

use crate::error::SourceError;
use crate::http::{build_client, get_text, API_USER_AGENT};
use crate::types::OmdbResponse;

const OMDB_BASE_URL: &str = "https://www.omdbapi.com/";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// OMDb API client
#[derive(Debug, Clone)]
pub struct OmdbClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OmdbClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: build_client(API_USER_AGENT, REQUEST_TIMEOUT),
            api_key: api_key.into(),
            base_url: OMDB_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Look up a title by exact name; `None` when OMDb does not know it
    #[instrument(skip(self))]
    pub async fn fetch(&self, title: &str) -> Result<Option<RatingsReport>, SourceError> {
        let url = format!(
            "{}?t={}&apikey={}",
            self.base_url,
            urlencoding::encode(title),
            urlencoding::encode(&self.api_key)
        );

        let Some(body) = get_text(&self.client, &url).await? else {
            return Ok(None);
        };

        parse_response(&body)
    }
}

#[async_trait]
impl RatingsSource for OmdbClient {
    async fn lookup(&self, title: &str) -> CineResult<Option<RatingsReport>> {
        Ok(self.fetch(title).await?)
    }
}

/// Turn an OMDb JSON body into a report
pub fn parse_response(body: &str) -> Result<Option<RatingsReport>, SourceError> {
    let response: OmdbResponse = serde_json::from_str(body)
        .map_err(|e| SourceError::ParseError(format!("OMDb response: {}", e)))?;

    if !response.is_success() {
        let message = response.error.unwrap_or_else(|| "unknown error".to_string());
        if message.to_lowercase().contains("not found") {
            debug!("OMDb has no entry: {}", message);
            return Ok(None);
        }
        return Err(SourceError::ApiError {
            status: 200,
            message,
        });
    }

    let mut ratings = RawRatings::default();
    for rating in &response.ratings {
        let source = match rating.source.as_str() {
            "Rotten Tomatoes" => RatingSource::RottenTomatoes,
            "Metacritic" => RatingSource::Metacritic,
            "Internet Movie Database" => RatingSource::Imdb,
            _ => continue,
        };
        if let Some(value) = present(Some(&rating.value)) {
            ratings.set(source, value);
        }
    }

    // The top-level imdbRating wins over the "8.1/10" list entry
    if let Some(value) = present(response.imdb_rating.as_ref()) {
        ratings.set(RatingSource::Imdb, value);
    }
    if let Some(value) = present(response.metascore.as_ref()) {
        ratings.set(RatingSource::Metascore, value);
    }
    if let Some(value) = present(response.imdb_votes.as_ref()) {
        ratings.set(RatingSource::ImdbVotes, value);
    }

    let cast = present(response.actors.as_ref())
        .map(|actors| {
            actors
                .split(',')
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Ok(Some(RatingsReport {
        ratings,
        cast,
        awards: present(response.awards.as_ref()),
        poster_url: present(response.poster.as_ref()),
    }))
}

/// OMDb reports missing values as "N/A"
fn present(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("n/a"))
        .map(str::to_string)
}
