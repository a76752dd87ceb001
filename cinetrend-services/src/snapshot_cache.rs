//! Snapshot Cache
//!
//! Persists the enriched record set as one JSON file. Freshness comes from
//! the file's modification time.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Local};
use cinetrend_core::RecordSet;
use tracing::{debug, info, warn};

/// Snapshot file name inside the cache directory
pub const SNAPSHOT_FILE: &str = "movie_data_cache.json";

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("No snapshot at {0}")]
    Missing(PathBuf),
    #[error("Corrupt snapshot at {path}: {message}")]
    Corrupt { path: PathBuf, message: String },
    #[error("Cache I/O error: {0}")]
    Io(#[from] io::Error),
}

/// How long a snapshot stays valid after it is written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FreshnessWindow {
    /// Valid until local midnight
    #[default]
    SameDay,
    /// Valid for a fixed age
    MaxAge(Duration),
}

impl FreshnessWindow {
    /// Whether a snapshot written at `written` is still fresh at `now`
    ///
    /// A modification time ahead of the clock counts as written now.
    pub fn contains(&self, written: DateTime<Local>, now: DateTime<Local>) -> bool {
        let written = written.min(now);
        match self {
            FreshnessWindow::SameDay => written.date_naive() == now.date_naive(),
            FreshnessWindow::MaxAge(max_age) => now
                .signed_duration_since(written)
                .to_std()
                .is_ok_and(|age| age <= *max_age),
        }
    }
}

impl fmt::Display for FreshnessWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FreshnessWindow::SameDay => f.write_str("same-day"),
            FreshnessWindow::MaxAge(age) => write!(f, "{}h", age.as_secs() / 3600),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid freshness window '{0}': expected 'same-day' or '<hours>h'")]
pub struct ParseFreshnessError(pub String);

impl FromStr for FreshnessWindow {
    type Err = ParseFreshnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().to_lowercase();
        if value == "same-day" || value == "sameday" {
            return Ok(FreshnessWindow::SameDay);
        }

        let seconds = value
            .strip_suffix('h')
            .and_then(|h| h.trim().parse::<u64>().ok())
            .filter(|h| *h > 0)
            .and_then(|h| h.checked_mul(3600))
            .ok_or_else(|| ParseFreshnessError(s.to_string()))?;

        Ok(FreshnessWindow::MaxAge(Duration::from_secs(seconds)))
    }
}

/// File-backed snapshot of the last refresh
#[derive(Debug, Clone)]
pub struct SnapshotCache {
    dir: PathBuf,
    path: PathBuf,
    window: FreshnessWindow,
}

impl SnapshotCache {
    /// Open a cache in `dir`, creating the directory if needed
    pub fn new(dir: impl AsRef<Path>, window: FreshnessWindow) -> Result<Self, CacheError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        let path = dir.join(SNAPSHOT_FILE);

        info!("Snapshot cache at {} ({})", path.display(), window);
        Ok(Self { dir, path, window })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn window(&self) -> FreshnessWindow {
        self.window
    }

    /// Modification time of the snapshot; `None` when there is none
    pub fn last_updated(&self) -> Result<Option<DateTime<Local>>, CacheError> {
        match fs::metadata(&self.path) {
            Ok(metadata) => Ok(Some(DateTime::<Local>::from(metadata.modified()?))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Local::now())
    }

    /// True iff a snapshot exists and its modification time is inside the
    /// freshness window relative to `now`
    pub fn is_valid_at(&self, now: DateTime<Local>) -> bool {
        match self.last_updated() {
            Ok(Some(written)) => self.window.contains(written, now),
            Ok(None) => false,
            Err(e) => {
                warn!("Cannot stat snapshot {}: {}", self.path.display(), e);
                false
            }
        }
    }

    pub fn load(&self) -> Result<RecordSet, CacheError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(CacheError::Missing(self.path.clone()));
            }
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                return Err(self.corrupt(e.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let records: RecordSet =
            serde_json::from_str(&contents).map_err(|e| self.corrupt(e.to_string()))?;

        debug!("Loaded {} records from {}", records.len(), self.path.display());
        Ok(records)
    }

    /// Replace the snapshot with `records`
    ///
    /// Writes a sibling temp file and renames it over the snapshot, so a
    /// reader sees either the old set or the new one.
    pub fn save(&self, records: &RecordSet) -> Result<(), CacheError> {
        let json = serde_json::to_vec_pretty(records).map_err(io::Error::other)?;

        let tmp_path = self
            .dir
            .join(format!("{}.tmp-{}", SNAPSHOT_FILE, std::process::id()));

        let written = (|| -> io::Result<()> {
            let mut file = File::create(&tmp_path)?;
            file.write_all(&json)?;
            file.sync_all()?;
            fs::rename(&tmp_path, &self.path)
        })();

        if let Err(e) = written {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        info!("Saved {} records to {}", records.len(), self.path.display());
        Ok(())
    }

    /// Remove the snapshot; a missing snapshot is not an error
    pub fn invalidate(&self) -> Result<(), CacheError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!("Invalidated snapshot {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn corrupt(&self, message: String) -> CacheError {
        CacheError::Corrupt {
            path: self.path.clone(),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration as ChronoDuration, TimeZone};
    use cinetrend_core::{Field, TitleListing};

    use super::*;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("cinetrend-cache-{}", uuid::Uuid::new_v4()))
    }

    fn sample_records() -> RecordSet {
        let mut records = RecordSet::from_listings(vec![
            TitleListing::new("Alpha", None),
            TitleListing::new("Beta", None),
        ]);
        for record in records.iter_mut() {
            record.keywords = Field::Unavailable;
            record.trending_score = Some(60.0);
        }
        records
    }

    #[test]
    fn test_validity_lifecycle() {
        let dir = temp_dir();
        let cache = SnapshotCache::new(&dir, FreshnessWindow::SameDay).unwrap();

        assert!(!cache.is_valid());
        assert!(cache.last_updated().unwrap().is_none());

        cache.save(&sample_records()).unwrap();
        assert!(cache.is_valid());

        let tomorrow = Local::now() + ChronoDuration::days(1);
        assert!(!cache.is_valid_at(tomorrow));

        cache.invalidate().unwrap();
        assert!(!cache.is_valid());
        cache.invalidate().unwrap();

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_save_then_load() {
        let dir = temp_dir();
        let cache = SnapshotCache::new(&dir, FreshnessWindow::SameDay).unwrap();
        let records = sample_records();

        cache.save(&records).unwrap();
        let loaded = cache.load().unwrap();
        assert_eq!(loaded, records);

        // No temp files left behind
        let entries: Vec<_> = fs::read_dir(&dir).unwrap().collect();
        assert_eq!(entries.len(), 1);

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_load_missing_and_corrupt() {
        let dir = temp_dir();
        let cache = SnapshotCache::new(&dir, FreshnessWindow::SameDay).unwrap();

        assert!(matches!(cache.load(), Err(CacheError::Missing(_))));

        fs::write(cache.path(), "{ not json").unwrap();
        assert!(matches!(cache.load(), Err(CacheError::Corrupt { .. })));

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_max_age_window() {
        let dir = temp_dir();
        let window = FreshnessWindow::MaxAge(Duration::from_secs(6 * 3600));
        let cache = SnapshotCache::new(&dir, window).unwrap();
        cache.save(&sample_records()).unwrap();

        let now = Local::now();
        assert!(cache.is_valid_at(now + ChronoDuration::hours(5)));
        assert!(!cache.is_valid_at(now + ChronoDuration::hours(7)));

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_same_day_window_crosses_midnight() {
        let written = Local.with_ymd_and_hms(2024, 8, 16, 23, 50, 0).unwrap();
        let later_same_day = Local.with_ymd_and_hms(2024, 8, 16, 23, 59, 0).unwrap();
        let next_day = Local.with_ymd_and_hms(2024, 8, 17, 0, 5, 0).unwrap();

        assert!(FreshnessWindow::SameDay.contains(written, later_same_day));
        assert!(!FreshnessWindow::SameDay.contains(written, next_day));
    }

    #[test]
    fn test_future_modification_time_is_fresh() {
        let now = Local::now();
        let ahead = now + ChronoDuration::days(1);

        assert!(FreshnessWindow::SameDay.contains(ahead, now));
        assert!(FreshnessWindow::MaxAge(Duration::from_secs(3600)).contains(ahead, now));
    }

    #[test]
    fn test_parse_freshness_window() {
        assert_eq!("same-day".parse(), Ok(FreshnessWindow::SameDay));
        assert_eq!(
            " 12h ".parse(),
            Ok(FreshnessWindow::MaxAge(Duration::from_secs(12 * 3600)))
        );
        assert!("0h".parse::<FreshnessWindow>().is_err());
        assert!("weekly".parse::<FreshnessWindow>().is_err());
        assert_eq!(
            "5124095576030432h".parse::<FreshnessWindow>(),
            Err(ParseFreshnessError("5124095576030432h".to_string()))
        );
        assert_eq!(FreshnessWindow::MaxAge(Duration::from_secs(7200)).to_string(), "2h");
    }
}
