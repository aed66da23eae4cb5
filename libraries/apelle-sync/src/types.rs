//! Core types for queue synchronization

use std::time::Duration;

/// Live playback state of the current song
///
/// Published by the current-song simulator on every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Playhead {
    /// Elapsed time in the song
    pub position: chrono::Duration,

    /// Whether the song is stopped, either by the server or by reaching its end
    pub stopped: bool,
}

/// Why a subscription stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionEnd {
    /// The server deleted the queue
    QueueDeleted,

    /// The server closed the event stream
    StreamClosed,

    /// The subscription was cancelled locally
    Cancelled,
}

/// Configuration for queue synchronization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncConfig {
    /// Interval between playhead recomputations (default: 250ms)
    pub tick: Duration,

    /// Advance the queue when the current song ends (default: false)
    pub autoplay: bool,
}

impl SyncConfig {
    /// Set the playhead recomputation interval
    #[must_use]
    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    /// Set the autoplay policy
    #[must_use]
    pub fn with_autoplay(mut self, autoplay: bool) -> Self {
        self.autoplay = autoplay;
        self
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(250),
            autoplay: false,
        }
    }
}
