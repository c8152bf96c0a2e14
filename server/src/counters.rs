//! Process-wide request counters
//!
//! One atomic counter pair, incremented per handled request and drained
//! periodically by the telemetry loop. This is the only piece of mutable
//! global state in the backend.

use std::sync::atomic::{AtomicU64, Ordering};

/// The single process-wide instance. Initialized at program start, drained
/// by the telemetry loop in `main`.
pub static REQUEST_COUNTERS: RequestCounters = RequestCounters::new();

/// Counts game-API and website requests since the last drain.
#[derive(Debug)]
pub struct RequestCounters {
    game_api: AtomicU64,
    website: AtomicU64,
}

impl RequestCounters {
    pub const fn new() -> Self {
        Self {
            game_api: AtomicU64::new(0),
            website: AtomicU64::new(0),
        }
    }

    pub fn record_game_api(&self) {
        self.game_api.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_website(&self) {
        self.website.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns `(game_api, website)` counts accumulated since the previous
    /// drain, resetting both to zero. Each increment lands in exactly one
    /// drain; the two counters are swapped independently, not as a pair.
    pub fn drain_and_reset(&self) -> (u64, u64) {
        (
            self.game_api.swap(0, Ordering::Relaxed),
            self.website.swap(0, Ordering::Relaxed),
        )
    }
}

impl Default for RequestCounters {
    fn default() -> Self {
        Self::new()
    }
}
