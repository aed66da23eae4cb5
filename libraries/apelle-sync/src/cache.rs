//! Song detail cache
//!
//! Song details never change once a song is queued, so entries are only ever
//! inserted. The same song can carry different per-queue data, hence the
//! `(song, queue)` key.

use apelle_core::{QueueId, SongDetail, SongId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared cache of hydrated song details.
///
/// Cloning is cheap and every clone sees the same entries, so one cache can
/// be handed to every queue of a process.
#[derive(Debug, Clone, Default)]
pub struct SongCache {
    entries: Arc<RwLock<HashMap<(SongId, QueueId), SongDetail>>>,
}

impl SongCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the details of `song` in `queue`
    pub async fn get(&self, song: SongId, queue: QueueId) -> Option<SongDetail> {
        self.entries.read().await.get(&(song, queue)).cloned()
    }

    /// Store the details of `song` in `queue` unless already present.
    ///
    /// Returns `true` if the entry was inserted.
    pub async fn insert(&self, song: SongId, queue: QueueId, detail: SongDetail) -> bool {
        let mut entries = self.entries.write().await;
        if entries.contains_key(&(song, queue)) {
            return false;
        }
        entries.insert((song, queue), detail);
        true
    }

    /// Number of cached entries
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the cache is empty
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
