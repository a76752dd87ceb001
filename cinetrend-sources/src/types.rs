//! Wire types of the JSON APIs

use serde::Deserialize;

/// OMDb `?t=` response
///
/// On failure OMDb answers `{"Response": "False", "Error": "..."}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OmdbResponse {
    #[serde(default)]
    pub response: String,
    pub error: Option<String>,
    pub title: Option<String>,
    #[serde(default)]
    pub ratings: Vec<OmdbRating>,
    pub metascore: Option<String>,
    #[serde(rename = "imdbRating")]
    pub imdb_rating: Option<String>,
    #[serde(rename = "imdbVotes")]
    pub imdb_votes: Option<String>,
    pub actors: Option<String>,
    pub awards: Option<String>,
    pub poster: Option<String>,
}

impl OmdbResponse {
    pub fn is_success(&self) -> bool {
        self.response.eq_ignore_ascii_case("true")
    }
}

/// One entry of OMDb's `Ratings` array
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OmdbRating {
    pub source: String,
    pub value: String,
}

/// SerpApi Google search response (only the fields keywords come from)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SerpApiResponse {
    #[serde(default)]
    pub related_searches: Vec<RelatedSearch>,
    #[serde(default)]
    pub related_questions: Vec<RelatedQuestion>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelatedSearch {
    pub query: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelatedQuestion {
    pub question: Option<String>,
}

/// Wikimedia per-article pageviews response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageviewsResponse {
    #[serde(default)]
    pub items: Vec<PageviewsItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageviewsItem {
    /// `YYYYMMDDHH`
    pub timestamp: String,
    pub views: u64,
}
