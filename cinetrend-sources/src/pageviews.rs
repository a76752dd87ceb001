//! Wikimedia pageviews as a search-interest series

use std::time::Duration;

use async_trait::async_trait;
use chrono::{Days, NaiveDate, Utc};
use cinetrend_core::{CineResult, TrendPoint, TrendSource};
use reqwest::Client;
use tracing::{debug, instrument};

use crate::error::SourceError;
use crate::http::{build_client, get_text, API_USER_AGENT};
use crate::types::{PageviewsItem, PageviewsResponse};

const PAGEVIEWS_BASE_URL: &str =
    "https://wikimedia.org/api/rest_v1/metrics/pageviews/per-article/en.wikipedia.org/all-access/user";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub const DEFAULT_TREND_DAYS: u32 = 90;

/// Daily English Wikipedia pageviews client
#[derive(Debug, Clone)]
pub struct PageviewsClient {
    client: Client,
    base_url: String,
    days: u32,
}

impl Default for PageviewsClient {
    fn default() -> Self {
        Self::new(DEFAULT_TREND_DAYS)
    }
}

impl PageviewsClient {
    pub fn new(days: u32) -> Self {
        Self {
            client: build_client(API_USER_AGENT, REQUEST_TIMEOUT),
            base_url: PAGEVIEWS_BASE_URL.to_string(),
            days,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn series_url(&self, article: &str, start: NaiveDate, end: NaiveDate) -> String {
        format!(
            "{}/{}/daily/{}/{}",
            self.base_url,
            urlencoding::encode(article),
            start.format("%Y%m%d"),
            end.format("%Y%m%d")
        )
    }

    /// Daily interest over the configured window ending today
    ///
    /// Empty when no candidate article exists.
    #[instrument(skip(self))]
    pub async fn fetch(&self, title: &str) -> Result<Vec<TrendPoint>, SourceError> {
        let end = Utc::now().date_naive();
        let start = end
            .checked_sub_days(Days::new(u64::from(self.days)))
            .unwrap_or(end);

        for article in article_candidates(title) {
            let url = self.series_url(&article, start, end);
            match get_text(&self.client, &url).await? {
                Some(body) => return parse_pageviews(&body),
                None => debug!("No pageviews for article {}", article),
            }
        }

        Ok(Vec::new())
    }
}

#[async_trait]
impl TrendSource for PageviewsClient {
    async fn interest(&self, title: &str) -> CineResult<Vec<TrendPoint>> {
        Ok(self.fetch(title).await?)
    }
}

/// Wikipedia article names to try, most specific first
pub fn article_candidates(title: &str) -> Vec<String> {
    let article = title.split_whitespace().collect::<Vec<_>>().join("_");
    if article.is_empty() {
        return Vec::new();
    }
    vec![format!("{}_(film)", article), article]
}

/// Parse a pageviews body into points scaled against the series peak
pub fn parse_pageviews(body: &str) -> Result<Vec<TrendPoint>, SourceError> {
    let response: PageviewsResponse = serde_json::from_str(body)
        .map_err(|e| SourceError::ParseError(format!("pageviews response: {}", e)))?;
    Ok(to_trend_points(&response.items))
}

fn to_trend_points(items: &[PageviewsItem]) -> Vec<TrendPoint> {
    let peak = items.iter().map(|i| i.views).max().unwrap_or(0);

    items
        .iter()
        .filter_map(|item| {
            let date = item
                .timestamp
                .get(..8)
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y%m%d").ok())?;
            let interest = if peak == 0 {
                0
            } else {
                ((item.views as f64 * 100.0 / peak as f64).round() as u64).min(100) as u8
            };
            Some(TrendPoint {
                date,
                views: item.views,
                interest,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_candidates() {
        assert_eq!(
            article_candidates("Alien: Romulus"),
            vec!["Alien:_Romulus_(film)", "Alien:_Romulus"]
        );
        assert!(article_candidates("   ").is_empty());
    }

    #[test]
    fn test_parse_pageviews_scales_to_peak() {
        let body = r#"{"items": [
            {"project": "en.wikipedia", "article": "Alpha_(film)", "timestamp": "2024081600", "views": 500},
            {"project": "en.wikipedia", "article": "Alpha_(film)", "timestamp": "2024081700", "views": 2000},
            {"project": "en.wikipedia", "article": "Alpha_(film)", "timestamp": "2024081800", "views": 1000},
            {"project": "en.wikipedia", "article": "Alpha_(film)", "timestamp": "garbage", "views": 10}
        ]}"#;

        let points = parse_pageviews(body).unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(points[0].date, NaiveDate::from_ymd_opt(2024, 8, 16).unwrap());
        assert_eq!(points[0].interest, 25);
        assert_eq!(points[1].interest, 100);
        assert_eq!(points[2].interest, 50);
        assert_eq!(points[2].views, 1000);
    }

    #[test]
    fn test_parse_pageviews_all_zero() {
        let body = r#"{"items": [{"timestamp": "2024081600", "views": 0}]}"#;
        let points = parse_pageviews(body).unwrap();
        assert_eq!(points[0].interest, 0);
    }

    #[test]
    fn test_series_url() {
        let client = PageviewsClient::new(30);
        let url = client.series_url(
            "Alien:_Romulus_(film)",
            NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 7, 31).unwrap(),
        );
        assert!(url.ends_with("/Alien%3A_Romulus_%28film%29/daily/20240701/20240731"));
    }
}
