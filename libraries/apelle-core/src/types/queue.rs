/// Queue domain types
use crate::types::{CurrentSongSnapshot, QueueId, QueuedSongSummary, StateVersion};
use serde::{Deserialize, Serialize};

/// Full server-authoritative state of one queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueSnapshot {
    /// Unique ID of the queue
    pub id: QueueId,

    /// Human-shareable code of the queue
    pub code: String,

    /// The current playing song, if any
    #[serde(default)]
    pub current: Option<CurrentSongSnapshot>,

    /// The songs in the queue, in the order the server sent them
    #[serde(rename = "queue")]
    pub queued_songs: Vec<QueuedSongSummary>,

    /// Version of the player state, for optimistic concurrency
    #[serde(rename = "player_state_id")]
    pub state_version: StateVersion,
}
