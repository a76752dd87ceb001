//! CineTrend command-line front end
//!
//! Refreshes the movie snapshot, reports cache status and prints the
//! ranked catalog.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use cinetrend_core::{KeywordSource, MovieRecord, RatingsSource, RecordSet, SentimentSource};
use cinetrend_services::{
    AppConfig, CacheError, CatalogQuery, EnrichmentSources, Enricher, Pacer, Refresher,
    ScoreBand, SnapshotCache, SortKey,
};
use cinetrend_sources::{
    OmdbClient, PageviewsClient, RottenTomatoesClient, SentimentClient, SerpApiClient,
    Unconfigured,
};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "cinetrend",
    about = "Aggregate movie ratings, sentiment and search interest into a Trending Score"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Refresh the snapshot if it is stale
    Refresh {
        /// Rediscover titles and refresh even if the snapshot is fresh
        #[arg(long, default_value_t = false)]
        force: bool,
    },
    /// Show snapshot location, age and validity
    Status,
    /// Print the catalog, refreshing first when the snapshot is stale
    Show(ShowArgs),
    /// Delete the snapshot so the next run refreshes
    Invalidate,
}

#[derive(Args, Debug)]
struct ShowArgs {
    /// score, title, streaming or theaters
    #[arg(long, default_value = "score")]
    sort: SortKey,

    /// Case-insensitive match on title, director, genre or cast
    #[arg(long)]
    search: Option<String>,

    /// Keep titles in any of these genres (repeatable)
    #[arg(long = "genre")]
    genres: Vec<String>,

    /// Earliest streaming release (YYYY-MM-DD)
    #[arg(long, requires = "to")]
    from: Option<NaiveDate>,

    /// Latest streaming release (YYYY-MM-DD)
    #[arg(long, requires = "from")]
    to: Option<NaiveDate>,

    #[arg(long)]
    limit: Option<usize>,

    /// Print JSON instead of a table
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Use the snapshot even if it is stale
    #[arg(long, default_value_t = false)]
    allow_stale: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    if let Err(e) = dotenvy::from_filename(".env.local") {
        // Not an error if the file doesn't exist
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env.local: {}", e);
        }
    }

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,cinetrend_services=debug")),
        )
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env().context("Invalid configuration")?;

    match cli.command {
        Command::Refresh { force } => run_refresh(&config, force).await,
        Command::Status => run_status(&config),
        Command::Show(args) => run_show(&config, args).await,
        Command::Invalidate => {
            let cache = open_cache(&config)?;
            cache.invalidate().context("Failed to invalidate snapshot")?;
            println!("Removed {}", cache.path().display());
            Ok(())
        }
    }
}

fn open_cache(config: &AppConfig) -> Result<SnapshotCache> {
    SnapshotCache::new(&config.cache_dir, config.freshness)
        .with_context(|| format!("Failed to open cache dir {}", config.cache_dir.display()))
}

fn build_refresher(config: &AppConfig) -> Result<Refresher> {
    let rotten_tomatoes = Arc::new(RottenTomatoesClient::new(config.browse_url.clone()));

    let ratings: Arc<dyn RatingsSource> = match &config.omdb_api_key {
        Some(key) => Arc::new(OmdbClient::new(key.clone())),
        None => {
            warn!("OMDB_API_KEY not set; ratings will be unavailable");
            Arc::new(Unconfigured::new("omdb"))
        }
    };

    let sentiment: Arc<dyn SentimentSource> = match &config.openai_api_key {
        Some(key) => Arc::new(SentimentClient::new(key.clone()).with_model(&config.sentiment_model)),
        None => {
            warn!("OPENAI_API_KEY not set; sentiment will stay pending");
            Arc::new(Unconfigured::new("openai"))
        }
    };

    let keywords: Arc<dyn KeywordSource> = match &config.serpapi_api_key {
        Some(key) => Arc::new(SerpApiClient::new(key.clone()).with_count(config.keyword_count)),
        None => {
            warn!("SERPAPI_API_KEY not set; keywords will be unavailable");
            Arc::new(Unconfigured::new("serpapi"))
        }
    };

    let sources = EnrichmentSources {
        ratings,
        sentiment,
        trend: Arc::new(PageviewsClient::new(config.trend_days)),
        keywords,
    };

    let scorer = config.scorer().context("Invalid weight profile")?;
    let enricher = Enricher::new(sources, scorer, Pacer::for_trends(config.trend_interval_ms));

    Ok(Refresher::new(
        rotten_tomatoes.clone(),
        rotten_tomatoes,
        enricher,
        open_cache(config)?,
    ))
}

async fn run_refresh(config: &AppConfig, force: bool) -> Result<()> {
    let refresher = build_refresher(config)?;

    let records = if force {
        refresher.force_refresh().await.context("Refresh failed")?
    } else {
        let (records, origin) = refresher.ensure_fresh().await.context("Refresh failed")?;
        info!("Snapshot served from {}", origin);
        records
    };

    println!(
        "{} titles in {}",
        records.len(),
        refresher.cache().path().display()
    );
    Ok(())
}

fn run_status(config: &AppConfig) -> Result<()> {
    let cache = open_cache(config)?;

    println!("Snapshot:  {}", cache.path().display());
    println!("Window:    {}", cache.window());

    match cache.last_updated()? {
        Some(updated) => println!("Updated:   {}", updated.format("%Y-%m-%d %H:%M:%S")),
        None => println!("Updated:   never"),
    }
    println!("Valid:     {}", cache.is_valid());

    match cache.load() {
        Ok(records) => println!("Titles:    {}", records.len()),
        Err(CacheError::Missing(_)) => {}
        Err(e) => println!("Titles:    unreadable ({})", e),
    }
    Ok(())
}

async fn load_records(config: &AppConfig, allow_stale: bool) -> Result<RecordSet> {
    if allow_stale {
        let cache = open_cache(config)?;
        match cache.load() {
            Ok(records) => return Ok(records),
            Err(CacheError::Missing(_)) => info!("No snapshot yet; refreshing"),
            Err(e) => warn!("Ignoring unusable snapshot: {}", e),
        }
    }

    let refresher = build_refresher(config)?;
    let (records, origin) = refresher.ensure_fresh().await.context("Refresh failed")?;
    info!("Catalog served from {}", origin);
    Ok(records)
}

async fn run_show(config: &AppConfig, args: ShowArgs) -> Result<()> {
    let records = load_records(config, args.allow_stale).await?;

    let query = CatalogQuery {
        search: args.search,
        genres: args.genres,
        released_between: args.from.zip(args.to),
        sort: args.sort,
        limit: args.limit,
    };
    let results = query.apply(&records);

    if args.json {
        let json = serde_json::to_string_pretty(&results).context("Failed to encode catalog")?;
        println!("{}", json);
    } else {
        print_table(&results);
    }
    Ok(())
}

fn print_table(records: &[&MovieRecord]) {
    println!(
        "{:<40} {:>6} {:<9} {:<12} {:<30}",
        "Title", "Score", "Band", "Streaming", "Genres"
    );
    for record in records {
        let score = record
            .trending_score
            .map(|s| format!("{:.1}", s))
            .unwrap_or_else(|| "-".to_string());
        let streaming = record
            .details()
            .and_then(|d| d.release_streaming)
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());

        println!(
            "{:<40} {:>6} {:<9} {:<12} {:<30}",
            truncate(&record.title, 40),
            score,
            ScoreBand::of(record.trending_score).to_string(),
            streaming,
            truncate(&record.genres().join(", "), 30)
        );
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('~');
    cut
}
