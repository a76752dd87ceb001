//! Related search keywords via SerpApi

use std::time::Duration;

use async_trait::async_trait;
use cinetrend_core::{CineResult, KeywordSource};
use reqwest::Client;
use tracing::{debug, instrument};

use crate::error::SourceError;
use crate::http::{build_client, get_text, API_USER_AGENT};
use crate::types::SerpApiResponse;

const SERPAPI_BASE_URL: &str = "https://serpapi.com/search.json";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

pub const DEFAULT_KEYWORD_COUNT: usize = 5;

/// SerpApi Google search client
#[derive(Debug, Clone)]
pub struct SerpApiClient {
    client: Client,
    api_key: String,
    base_url: String,
    count: usize,
}

impl SerpApiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: build_client(API_USER_AGENT, REQUEST_TIMEOUT),
            api_key: api_key.into(),
            base_url: SERPAPI_BASE_URL.to_string(),
            count: DEFAULT_KEYWORD_COUNT,
        }
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[instrument(skip(self))]
    pub async fn fetch(&self, title: &str) -> Result<Vec<String>, SourceError> {
        let query = format!("{} movie", title);
        let url = format!(
            "{}?engine=google&q={}&gl=us&hl=en&api_key={}",
            self.base_url,
            urlencoding::encode(&query),
            urlencoding::encode(&self.api_key)
        );

        let Some(body) = get_text(&self.client, &url).await? else {
            return Ok(Vec::new());
        };

        let keywords = parse_keywords(&body, self.count)?;
        debug!("{} keywords for {}", keywords.len(), title);
        Ok(keywords)
    }
}

#[async_trait]
impl KeywordSource for SerpApiClient {
    async fn keywords(&self, title: &str) -> CineResult<Vec<String>> {
        Ok(self.fetch(title).await?)
    }
}

/// Related searches, falling back to related questions, capped at `count`
pub fn parse_keywords(body: &str, count: usize) -> Result<Vec<String>, SourceError> {
    let response: SerpApiResponse = serde_json::from_str(body)
        .map_err(|e| SourceError::ParseError(format!("SerpApi response: {}", e)))?;

    if let Some(error) = response.error {
        return Err(SourceError::ApiError {
            status: 200,
            message: error,
        });
    }

    let candidates: Vec<Option<String>> = if response.related_searches.is_empty() {
        response
            .related_questions
            .into_iter()
            .map(|q| q.question)
            .collect()
    } else {
        response
            .related_searches
            .into_iter()
            .map(|s| s.query)
            .collect()
    };

    Ok(candidates
        .into_iter()
        .flatten()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .take(count)
        .collect())
}
