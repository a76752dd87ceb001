//! Application configuration from the environment

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use cinetrend_scoring::{Scorer, WeightProfile};
use cinetrend_sources::{
    DEFAULT_BROWSE_URL, DEFAULT_KEYWORD_COUNT, DEFAULT_SENTIMENT_MODEL, DEFAULT_TREND_DAYS,
};

use crate::pacer::DEFAULT_TREND_INTERVAL_MS;
use crate::snapshot_cache::FreshnessWindow;

pub const DEFAULT_CACHE_DIR: &str = "data_cache";

/// Runtime configuration of the pipeline
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub omdb_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub serpapi_api_key: Option<String>,
    pub cache_dir: PathBuf,
    pub browse_url: String,
    pub freshness: FreshnessWindow,
    pub trend_interval_ms: u64,
    pub trend_days: u32,
    pub keyword_count: usize,
    pub sentiment_model: String,
    pub weights: WeightProfile,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            omdb_api_key: None,
            openai_api_key: None,
            serpapi_api_key: None,
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            browse_url: DEFAULT_BROWSE_URL.to_string(),
            freshness: FreshnessWindow::SameDay,
            trend_interval_ms: DEFAULT_TREND_INTERVAL_MS,
            trend_days: DEFAULT_TREND_DAYS,
            keyword_count: DEFAULT_KEYWORD_COUNT,
            sentiment_model: DEFAULT_SENTIMENT_MODEL.to_string(),
            weights: WeightProfile::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Reads:
    /// - OMDB_API_KEY, OPENAI_API_KEY, SERPAPI_API_KEY (optional)
    /// - CINETREND_CACHE_DIR, CINETREND_BROWSE_URL, CINETREND_FRESHNESS
    /// - CINETREND_TREND_INTERVAL_MS, CINETREND_TREND_DAYS, CINETREND_KEYWORD_COUNT
    /// - CINETREND_SENTIMENT_MODEL
    /// - CINETREND_WEIGHTS: JSON array of {"source", "weight", "fallback"}
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let weights = match get("CINETREND_WEIGHTS") {
            Some(json) => {
                let profile: WeightProfile =
                    serde_json::from_str(&json).map_err(|e| ConfigError::InvalidJson {
                        field: "CINETREND_WEIGHTS".to_string(),
                        error: e.to_string(),
                    })?;
                Scorer::new(&profile).map_err(|e| ConfigError::InvalidValue {
                    field: "CINETREND_WEIGHTS".to_string(),
                    error: e.to_string(),
                })?;
                profile
            }
            None => defaults.weights,
        };

        Ok(Self {
            omdb_api_key: get("OMDB_API_KEY"),
            openai_api_key: get("OPENAI_API_KEY"),
            serpapi_api_key: get("SERPAPI_API_KEY"),
            cache_dir: get("CINETREND_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_dir),
            browse_url: get("CINETREND_BROWSE_URL").unwrap_or(defaults.browse_url),
            freshness: parse_or("CINETREND_FRESHNESS", get("CINETREND_FRESHNESS"), defaults.freshness)?,
            trend_interval_ms: parse_or(
                "CINETREND_TREND_INTERVAL_MS",
                get("CINETREND_TREND_INTERVAL_MS"),
                defaults.trend_interval_ms,
            )?,
            trend_days: parse_or("CINETREND_TREND_DAYS", get("CINETREND_TREND_DAYS"), defaults.trend_days)?,
            keyword_count: parse_or(
                "CINETREND_KEYWORD_COUNT",
                get("CINETREND_KEYWORD_COUNT"),
                defaults.keyword_count,
            )?,
            sentiment_model: get("CINETREND_SENTIMENT_MODEL").unwrap_or(defaults.sentiment_model),
            weights,
        })
    }

    /// Scorer for the configured weight profile
    pub fn scorer(&self) -> Result<Scorer, ConfigError> {
        Scorer::new(&self.weights).map_err(|e| ConfigError::InvalidValue {
            field: "CINETREND_WEIGHTS".to_string(),
            error: e.to_string(),
        })
    }
}

fn parse_or<T>(field: &str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            field: field.to_string(),
            error: format!("'{}': {}", raw, e),
        }),
        None => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid JSON in {field}: {error}")]
    InvalidJson { field: String, error: String },

    #[error("Invalid value for {field}: {error}")]
    InvalidValue { field: String, error: String },
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use cinetrend_core::RatingSource;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert!(config.omdb_api_key.is_none());
        assert_eq!(config.cache_dir, PathBuf::from("data_cache"));
        assert_eq!(config.freshness, FreshnessWindow::SameDay);
        assert_eq!(config.trend_interval_ms, 1000);
        assert_eq!(config.trend_days, 90);
        assert_eq!(config.keyword_count, 5);
        assert_eq!(config.sentiment_model, "gpt-4o-mini");
        assert_eq!(config.weights, WeightProfile::default());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("OMDB_API_KEY", "omdb-key"),
            ("SERPAPI_API_KEY", "  "),
            ("CINETREND_CACHE_DIR", "/tmp/cinetrend"),
            ("CINETREND_FRESHNESS", "6h"),
            ("CINETREND_TREND_INTERVAL_MS", "250"),
            ("CINETREND_KEYWORD_COUNT", "3"),
            (
                "CINETREND_WEIGHTS",
                r#"[{"source": "imdb", "weight": 1.0, "fallback": 50.0}]"#,
            ),
        ])
        .unwrap();

        assert_eq!(config.omdb_api_key.as_deref(), Some("omdb-key"));
        assert!(config.serpapi_api_key.is_none());
        assert_eq!(config.cache_dir, PathBuf::from("/tmp/cinetrend"));
        assert_eq!(
            config.freshness,
            FreshnessWindow::MaxAge(Duration::from_secs(6 * 3600))
        );
        assert_eq!(config.trend_interval_ms, 250);
        assert_eq!(config.keyword_count, 3);
        assert_eq!(config.weights.entries.len(), 1);
        assert_eq!(config.weights.entries[0].source, RatingSource::Imdb);
        assert_eq!(config.scorer().unwrap().fallback_score(), Some(50.0));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            load(&[("CINETREND_TREND_DAYS", "ninety")]),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            load(&[("CINETREND_FRESHNESS", "weekly")]),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            load(&[("CINETREND_FRESHNESS", "5124095576030432h")]),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            load(&[("CINETREND_WEIGHTS", "not json")]),
            Err(ConfigError::InvalidJson { .. })
        ));
        assert!(matches!(
            load(&[("CINETREND_WEIGHTS", r#"[{"source": "imdb", "weight": -1.0}]"#)]),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
