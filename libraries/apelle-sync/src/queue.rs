//! Queue aggregate
//!
//! Owns the reconciled view of one queue: the ordered queued songs and the
//! optional current song.
//!
//! ```text
//!            init(snapshot)             apply(QueueDeleted)
//!  created ─────────────────► active ─────────────────────► deleted
//!                              │  ▲
//!                              └──┘ apply(other events)
//! ```
//!
//! Queued songs are always kept sorted by likes (descending), then by the
//! instant they were queued (ascending). The order the server sends them in
//! is not used.

use crate::cache::SongCache;
use crate::current::CurrentSong;
use crate::queued::QueuedSong;
use crate::types::SyncConfig;
use apelle_core::{
    ApelleError, Clock, CurrentSongSnapshot, QueueApi, QueueEvent, QueueId, QueueSnapshot,
    QueuedSongSummary, Result, StateVersion, SystemClock,
};
use futures_util::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

/// Local, continuously updated view of a queue
pub struct Queue {
    id: QueueId,
    code: String,
    state_version: StateVersion,
    current: Option<CurrentSong>,
    queued: Vec<QueuedSong>,
    autoplay: bool,
    deleted: bool,

    /// Natural end of the current song, if it can still happen
    ended: Option<oneshot::Receiver<()>>,

    api: Arc<dyn QueueApi>,
    cache: SongCache,
    clock: Arc<dyn Clock>,
    tick: std::time::Duration,
}

impl Queue {
    /// Create an empty, uninitialized queue.
    pub fn new(
        id: QueueId,
        api: Arc<dyn QueueApi>,
        cache: SongCache,
        config: &SyncConfig,
    ) -> Self {
        Self {
            id,
            code: String::new(),
            state_version: StateVersion::UNKNOWN,
            current: None,
            queued: Vec::new(),
            autoplay: config.autoplay,
            deleted: false,
            ended: None,
            api,
            cache,
            clock: Arc::new(SystemClock::new()),
            tick: config.tick,
        }
    }

    /// Use `clock` to extrapolate song positions
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Load the full state of the queue.
    pub async fn init(&mut self, snapshot: QueueSnapshot) -> Result<()> {
        if snapshot.id != self.id {
            return Err(ApelleError::invariant(format!(
                "snapshot of queue {} applied to queue {}",
                snapshot.id, self.id
            )));
        }

        self.code = snapshot.code;
        self.state_version = snapshot.state_version;
        self.update_current(snapshot.current);
        self.update_queued(snapshot.queued_songs).await?;

        debug!(
            queue = %self.id,
            code = %self.code,
            queued = self.queued.len(),
            playing = self.current.is_some(),
            "Queue state loaded"
        );
        Ok(())
    }

    /// Apply a server event.
    pub async fn apply(&mut self, event: QueueEvent) -> Result<()> {
        if self.deleted {
            debug!(queue = %self.id, kind = event.kind(), "Ignoring event on deleted queue");
            return Ok(());
        }

        match event {
            QueueEvent::FullQueueState { queue } => self.init(queue).await,
            QueueEvent::CurrentSongState {
                current,
                state_version,
            } => {
                if let Some(state_version) = state_version {
                    self.state_version = state_version;
                }
                self.update_current(current);
                Ok(())
            }
            QueueEvent::QueuedSongsState { queue } => self.update_queued(queue).await,
            QueueEvent::QueuedSongDeleted { deleted_id } => {
                self.queued.retain(|song| song.id() != deleted_id);
                Ok(())
            }
            QueueEvent::QueueDeleted => {
                info!(queue = %self.id, "Queue deleted");
                self.deleted = true;
                Ok(())
            }
        }
    }

    /// Replace the current song.
    ///
    /// The previous song is always destroyed, even if the new snapshot
    /// carries the same id.
    pub fn update_current(&mut self, snapshot: Option<CurrentSongSnapshot>) {
        if let Some(mut previous) = self.current.take() {
            previous.destroy();
        }
        self.ended = None;

        if let Some(snapshot) = snapshot {
            let (tx, rx) = oneshot::channel();
            self.current = Some(CurrentSong::init(
                snapshot,
                self.clock.clone(),
                self.tick,
                Some(tx),
            ));
            self.ended = Some(rx);
        }
    }

    /// Wait for the current song to reach its end.
    ///
    /// Never resolves if there is no playing song. Cancel safe.
    pub async fn song_ended(&mut self) {
        if let Some(ended) = self.ended.as_mut() {
            let result = ended.await;
            self.ended = None;
            if result.is_ok() {
                return;
            }
        }
        std::future::pending::<()>().await;
    }

    /// React to the natural end of the current song.
    ///
    /// With autoplay on, asks the server to move to the next song. The
    /// request is conditioned on the last known state version; if another
    /// client already advanced the queue the server rejects it, which is
    /// expected and ignored.
    pub async fn on_song_ended(&mut self) -> Result<()> {
        if !self.autoplay || self.deleted {
            return Ok(());
        }

        info!(queue = %self.id, state = %self.state_version, "Advancing to next song");
        match self.api.advance_queue(self.id, self.state_version).await {
            Ok(()) => Ok(()),
            Err(ApelleError::PreconditionFailed) => {
                warn!(queue = %self.id, "Queue already advanced by someone else");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Stop all timers.
    pub fn destroy(&mut self) {
        if let Some(current) = self.current.as_mut() {
            current.destroy();
        }
        self.ended = None;
    }

    /// Merge a new list of queued songs, keeping entities with the same id
    async fn update_queued(&mut self, summaries: Vec<QueuedSongSummary>) -> Result<()> {
        let mut previous: HashMap<_, _> = self
            .queued
            .drain(..)
            .map(|song| (song.id(), song))
            .collect();

        let mut queued: Vec<QueuedSong> = Vec::with_capacity(summaries.len());
        for summary in summaries {
            if let Some(song) = queued.iter_mut().find(|s| s.id() == summary.id) {
                warn!(queue = %self.id, song = %summary.id, "Duplicate song in queue");
                song.refresh(summary);
                continue;
            }

            let song = match previous.remove(&summary.id) {
                Some(mut song) => {
                    song.refresh(summary);
                    song
                }
                None => QueuedSong::from_summary(summary),
            };
            queued.push(song);
        }

        if !previous.is_empty() {
            debug!(queue = %self.id, removed = previous.len(), "Dropped queued songs");
        }

        // Stable, so equal keys keep the server order
        queued.sort_by(QueuedSong::play_order);
        self.queued = queued;

        let (id, api, cache) = (self.id, &*self.api, &self.cache);
        join_all(
            self.queued
                .iter_mut()
                .map(|song| song.hydrate(id, api, cache)),
        )
        .await
        .into_iter()
        .collect()
    }

    pub fn id(&self) -> QueueId {
        self.id
    }

    /// Human-shareable code of the queue
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Last observed player state version
    pub fn state_version(&self) -> StateVersion {
        self.state_version
    }

    pub fn current(&self) -> Option<&CurrentSong> {
        self.current.as_ref()
    }

    /// Queued songs, in play order
    pub fn queue(&self) -> &[QueuedSong] {
        &self.queued
    }

    pub fn autoplay(&self) -> bool {
        self.autoplay
    }

    /// Enable or disable advancing the queue on natural song ends
    pub fn set_autoplay(&mut self, autoplay: bool) {
        self.autoplay = autoplay;
    }

    /// Whether the server deleted the queue
    pub fn is_deleted(&self) -> bool {
        self.deleted
    }
}

impl std::fmt::Debug for Queue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Queue")
            .field("id", &self.id)
            .field("code", &self.code)
            .field("state_version", &self.state_version)
            .field("current", &self.current)
            .field("queued", &self.queued)
            .field("autoplay", &self.autoplay)
            .field("deleted", &self.deleted)
            .finish_non_exhaustive()
    }
}
