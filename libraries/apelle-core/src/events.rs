//! Queue events
//!
//! Messages pushed by the server to every subscriber of a queue. Each event
//! is either an authoritative replacement of some part of the queue state
//! or a targeted removal.
//!
//! On the wire events are JSON objects discriminated by `kind`. A kind this
//! client does not know is a protocol drift and decodes to
//! [`ApelleError::UnknownEventKind`], which callers must treat as fatal.

use crate::error::{ApelleError, Result};
use crate::types::{CurrentSongSnapshot, QueueSnapshot, QueuedSongSummary, SongId, StateVersion};
use serde::{Deserialize, Serialize};

/// Events received over a queue subscription
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum QueueEvent {
    /// After receiving this event a client must assume the whole queue is
    /// in the provided state
    #[serde(rename = "queue-state")]
    FullQueueState {
        /// The new queue state
        queue: QueueSnapshot,
    },

    /// Authoritative state of the current song
    #[serde(rename = "current-song-state")]
    CurrentSongState {
        /// The new current song; absent means nothing is playing
        #[serde(default)]
        current: Option<CurrentSongSnapshot>,
        /// If present, the new version of the player state
        #[serde(default, rename = "player_state_id")]
        state_version: Option<StateVersion>,
    },

    /// Authoritative state of the queued songs
    #[serde(rename = "queued-songs-state")]
    QueuedSongsState {
        /// The songs in the queue
        queue: Vec<QueuedSongSummary>,
    },

    /// A single song left the queue; nothing else changed
    #[serde(rename = "queued-song-delete")]
    QueuedSongDeleted {
        /// The song to remove
        deleted_id: SongId,
    },

    /// The queue was deleted. This also closes the event stream.
    #[serde(rename = "queue-delete")]
    QueueDeleted,
}

impl QueueEvent {
    /// Every `kind` discriminant this client understands
    pub const KINDS: [&'static str; 5] = [
        "queue-state",
        "current-song-state",
        "queued-songs-state",
        "queued-song-delete",
        "queue-delete",
    ];

    /// Wire discriminant of this event
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::FullQueueState { .. } => "queue-state",
            Self::CurrentSongState { .. } => "current-song-state",
            Self::QueuedSongsState { .. } => "queued-songs-state",
            Self::QueuedSongDeleted { .. } => "queued-song-delete",
            Self::QueueDeleted => "queue-delete",
        }
    }

    /// Decode an event from its JSON form.
    ///
    /// Unknown kinds are reported separately from malformed bodies so the
    /// caller can tell protocol drift from a broken message.
    pub fn from_json(data: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(data)?;

        if let Some(kind) = value.get("kind").and_then(serde_json::Value::as_str) {
            if !Self::KINDS.contains(&kind) {
                return Err(ApelleError::UnknownEventKind(kind.to_string()));
            }
        }

        Ok(serde_json::from_value(value)?)
    }
}
