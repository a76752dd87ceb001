//! Fixed spacing between successive trend lookups

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// Default spacing between trend lookups
pub const DEFAULT_TREND_INTERVAL_MS: u64 = 1000;

#[derive(Debug, Default)]
struct PaceState {
    last_call: Option<Instant>,
    calls: u64,
    waits: u64,
}

/// Sleeps out whatever is left of the interval since the previous call
#[derive(Debug)]
pub struct Pacer {
    interval: Duration,
    name: String,
    state: Mutex<PaceState>,
}

impl Pacer {
    pub fn new(interval: Duration, name: &str) -> Self {
        Self {
            interval,
            name: name.to_string(),
            state: Mutex::new(PaceState::default()),
        }
    }

    pub fn for_trends(interval_ms: u64) -> Self {
        Self::new(Duration::from_millis(interval_ms), "trends")
    }

    /// Return once `interval` has passed since the previous call
    ///
    /// The first call returns immediately.
    pub async fn acquire(&self) {
        let mut state = self.state.lock().await;
        state.calls += 1;

        if let Some(last_call) = state.last_call {
            let remaining = self.interval.saturating_sub(last_call.elapsed());
            if !remaining.is_zero() {
                state.waits += 1;
                debug!("[{}] call #{} waits {:?}", self.name, state.calls, remaining);
                tokio::time::sleep(remaining).await;
            }
        }

        state.last_call = Some(Instant::now());
    }

    pub async fn stats(&self) -> PacerStats {
        let state = self.state.lock().await;
        PacerStats {
            calls: state.calls,
            waits: state.waits,
        }
    }
}

/// Call counters of a [`Pacer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacerStats {
    pub calls: u64,
    /// Calls that had to sleep
    pub waits: u64,
}
