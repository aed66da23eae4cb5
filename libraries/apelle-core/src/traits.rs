//! Collaborator contracts
//!
//! The reconciliation engine never talks to the network directly. It goes
//! through these traits, implemented over HTTP by `apelle-client` and by
//! mocks in tests.

use crate::error::Result;
use crate::events::QueueEvent;
use crate::types::{QueueId, QueueSnapshot, QueuedSongDetail, SongId, StateVersion};
use async_trait::async_trait;
use futures_util::Stream;
use std::pin::Pin;

/// Live sequence of events for one queue
pub type EventStream = Pin<Box<dyn Stream<Item = Result<QueueEvent>> + Send>>;

/// Request/response operations on a queue
#[async_trait]
pub trait QueueApi: Send + Sync {
    /// Fetch the full state of a queue
    ///
    /// # Errors
    /// `NotFound` if the queue does not exist
    async fn fetch_queue(&self, queue_id: QueueId) -> Result<QueueSnapshot>;

    /// Fetch the full data of a song queued in a queue
    ///
    /// # Errors
    /// `NotFound` if the song is not in the queue
    async fn fetch_song(&self, queue_id: QueueId, song_id: SongId) -> Result<QueuedSongDetail>;

    /// Move the queue to its next song, provided the player state is still
    /// at `expected`
    ///
    /// # Errors
    /// `PreconditionFailed` if somebody else changed the player first
    async fn advance_queue(&self, queue_id: QueueId, expected: StateVersion) -> Result<()>;
}

/// Source of live queue events
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Open a subscription to the events of a queue.
    ///
    /// The stream ends when the subscriber drops it or after a
    /// `QueueDeleted` event.
    async fn subscribe(&self, queue_id: QueueId) -> Result<EventStream>;
}
