//! Rotten Tomatoes scraping: title discovery and detail pages

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use cinetrend_core::{CineResult, DetailSource, MovieDetails, TitleDiscovery, TitleListing};
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument};
use url::Url;

use crate::error::SourceError;
use crate::http::{build_client, get_text, BROWSER_USER_AGENT};

/// Certified-fresh, popular-first "movies at home" listing
pub const DEFAULT_BROWSE_URL: &str =
    "https://www.rottentomatoes.com/browse/movies_at_home/critics:certified_fresh~sort:popular";

const SITE_ROOT: &str = "https://www.rottentomatoes.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Rotten Tomatoes browse and detail page client
#[derive(Debug, Clone)]
pub struct RottenTomatoesClient {
    client: Client,
    browse_url: String,
    site_root: String,
}

impl Default for RottenTomatoesClient {
    fn default() -> Self {
        Self::new(DEFAULT_BROWSE_URL)
    }
}

impl RottenTomatoesClient {
    pub fn new(browse_url: impl Into<String>) -> Self {
        Self {
            client: build_client(BROWSER_USER_AGENT, REQUEST_TIMEOUT),
            browse_url: browse_url.into(),
            site_root: SITE_ROOT.to_string(),
        }
    }

    /// Scrape the browse page for titles
    #[instrument(skip(self))]
    pub async fn fetch_listings(&self) -> Result<Vec<TitleListing>, SourceError> {
        let html = get_text(&self.client, &self.browse_url)
            .await?
            .ok_or_else(|| SourceError::ScrapeFailed(format!("{} returned 404", self.browse_url)))?;

        let listings = parse_listings(&html, &self.browse_url);
        info!("Discovered {} titles from {}", listings.len(), self.browse_url);
        Ok(listings)
    }

    /// Scrape one title's detail page; `None` when the page does not exist
    #[instrument(skip(self), fields(title = %listing.title))]
    pub async fn fetch_details(
        &self,
        listing: &TitleListing,
    ) -> Result<Option<MovieDetails>, SourceError> {
        let url = listing
            .url
            .clone()
            .unwrap_or_else(|| format!("{}/m/{}", self.site_root, slug(&listing.title)));

        match get_text(&self.client, &url).await? {
            Some(html) => Ok(Some(parse_details(&html))),
            None => {
                debug!("No detail page at {}", url);
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl TitleDiscovery for RottenTomatoesClient {
    async fn discover(&self) -> CineResult<Vec<TitleListing>> {
        Ok(self.fetch_listings().await?)
    }
}

#[async_trait]
impl DetailSource for RottenTomatoesClient {
    async fn details(&self, listing: &TitleListing) -> CineResult<Option<MovieDetails>> {
        Ok(self.fetch_details(listing).await?)
    }
}

/// URL slug Rotten Tomatoes uses for a title: "Alien: Romulus" -> "alien_romulus"
pub fn slug(title: &str) -> String {
    title
        .to_lowercase()
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_alphanumeric())
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn non_empty(text: String) -> Option<String> {
    let text = text.trim().to_string();
    (!text.is_empty()).then_some(text)
}

/// Extract titles and detail URLs from a browse page
pub fn parse_listings(html: &str, page_url: &str) -> Vec<TitleListing> {
    let document = Html::parse_document(html);
    let base = Url::parse(page_url).ok();

    let mut listings = Vec::new();

    if let (Some(tile_selector), Some(small_selector), Some(title_selector)) = (
        Selector::parse(r#"a[data-qa="discovery-media-list-item-caption"]"#).ok(),
        Selector::parse("span.p--small").ok(),
        Selector::parse(r#"[data-qa="discovery-media-list-item-title"]"#).ok(),
    ) {
        for tile in document.select(&tile_selector) {
            let title = tile
                .select(&small_selector)
                .next()
                .or_else(|| tile.select(&title_selector).next())
                .map(element_text)
                .and_then(non_empty);

            let Some(title) = title else {
                continue;
            };

            let url = tile
                .value()
                .attr("href")
                .and_then(|href| absolute_url(base.as_ref(), href));

            listings.push(TitleListing::new(title, url));
        }
    }

    if listings.is_empty() {
        // Older markup: bare title spans without caption anchors
        if let Some(selector) = Selector::parse(r#"span[data-qa="discovery-media-list-item-title"]"#).ok() {
            for span in document.select(&selector) {
                if let Some(title) = non_empty(element_text(span)) {
                    listings.push(TitleListing::new(title, None));
                }
            }
        }
    }

    listings
}

fn absolute_url(base: Option<&Url>, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    match base {
        Some(base) => base.join(href).ok().map(|u| u.to_string()),
        None => Url::parse(href).ok().map(|u| u.to_string()),
    }
}

/// Extract descriptive fields from a title's detail page
pub fn parse_details(html: &str) -> MovieDetails {
    let document = Html::parse_document(html);

    let synopsis = Selector::parse("div.synopsis-wrap rt-text").ok().and_then(|selector| {
        let texts: Vec<String> = document.select(&selector).map(element_text).collect();
        // The first rt-text is the "Synopsis" label
        texts.into_iter().nth(1).and_then(non_empty)
    });

    let director = Selector::parse("div.category-wrap rt-link")
        .ok()
        .and_then(|selector| document.select(&selector).next().map(element_text))
        .and_then(non_empty);

    let labelled = labelled_values(&document);
    let lookup = |label: &str| -> Option<String> {
        labelled
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v.clone())
    };

    let mut genres = Vec::new();
    if let Some(selector) = Selector::parse(r#"rt-link[href*="genres"]"#).ok() {
        for link in document.select(&selector) {
            if let Some(genre) = non_empty(element_text(link)) {
                let genre = genre.trim_end_matches(',').trim().to_string();
                if !genre.is_empty() && !genres.contains(&genre) {
                    genres.push(genre);
                }
            }
        }
    }

    MovieDetails {
        genres,
        synopsis,
        director,
        content_rating: lookup("Rating"),
        release_theaters: lookup("Release Date (Theaters)").and_then(|d| parse_release_date(&d)),
        release_streaming: lookup("Release Date (Streaming)").and_then(|d| parse_release_date(&d)),
        runtime: lookup("Runtime"),
        box_office: lookup("Box Office (Gross USA)"),
    }
}

/// Pairs of (label, value) where a label `rt-text` is followed by its value
fn labelled_values(document: &Html) -> Vec<(String, String)> {
    let Some(selector) = Selector::parse("rt-text").ok() else {
        return Vec::new();
    };

    let texts: Vec<String> = document.select(&selector).map(element_text).collect();
    texts
        .windows(2)
        .map(|pair| (pair[0].clone(), pair[1].clone()))
        .filter(|(_, value)| !value.is_empty())
        .collect()
}

/// Parse "Jul 19, 2024, Wide" or "July 19, 2024" into a date
pub fn parse_release_date(text: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = text.split(',').map(str::trim).collect();
    if parts.len() < 2 {
        return None;
    }
    let date = format!("{}, {}", parts[0], parts[1]);

    ["%b %d, %Y", "%B %d, %Y"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(&date, format).ok())
}
