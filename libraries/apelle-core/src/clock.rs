//! Wall-clock abstraction
//!
//! Playback positions are extrapolated locally from server instants, so the
//! engine needs "now" as a wall-clock instant. [`SystemClock`] anchors the
//! wall clock once and then advances it with the tokio clock: it is
//! monotonic, and pausing or advancing tokio time in tests moves it too.

use chrono::{DateTime, Duration, Utc};
use std::fmt::Debug;

/// Source of the current instant
pub trait Clock: Send + Sync + Debug {
    /// The current instant
    fn now(&self) -> DateTime<Utc>;
}

/// Clock following the tokio time driver, anchored to the system time
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    wall_anchor: DateTime<Utc>,
    anchor: tokio::time::Instant,
}

impl SystemClock {
    /// Anchor a new clock at the current system time
    pub fn new() -> Self {
        Self {
            wall_anchor: Utc::now(),
            anchor: tokio::time::Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        let elapsed =
            Duration::from_std(self.anchor.elapsed()).unwrap_or_else(|_| Duration::zero());
        self.wall_anchor + elapsed
    }
}

/// Time elapsed from `starts_at` to `now`, clamped at zero.
///
/// A negative result only means the local clock is behind the server's.
pub fn elapsed_since(starts_at: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    (now - starts_at).max(Duration::zero())
}
