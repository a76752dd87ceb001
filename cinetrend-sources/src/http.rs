//! Shared HTTP plumbing for the source clients

use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::error::SourceError;

/// Browser-like user agent for page scraping
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Identifying user agent for APIs that ask for one (Wikimedia)
pub const API_USER_AGENT: &str = "cinetrend/0.1 (movie trend research)";

/// Build a client with a request timeout and user agent
pub fn build_client(user_agent: &str, timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// GET a URL as text; `Ok(None)` on 404
pub async fn get_text(client: &Client, url: &str) -> Result<Option<String>, SourceError> {
    debug!("GET {}", url);

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| SourceError::RequestFailed(e.to_string()))?;

    if response.status() == StatusCode::NOT_FOUND {
        return Ok(None);
    }

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(SourceError::ApiError {
            status: status.as_u16(),
            message: body.chars().take(200).collect(),
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| SourceError::RequestFailed(e.to_string()))?;

    Ok(Some(body))
}
