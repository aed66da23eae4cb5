//! Queued songs
//!
//! A queued song arrives as a short summary; its duration, kind, url and
//! thumbnails are hydrated lazily through the [`SongCache`].

use crate::cache::SongCache;
use apelle_core::{
    QueueApi, QueueId, QueuedSongSummary, Result, SongDetail, SongId, SongKind, Thumbnail,
};
use chrono::{DateTime, Duration, Utc};
use std::cmp::Ordering;
use tracing::debug;
use url::Url;

/// A song waiting in a queue
#[derive(Debug, Clone, PartialEq)]
pub struct QueuedSong {
    id: SongId,
    name: String,
    queued_at: DateTime<Utc>,
    likes: u16,
    user_likes: u16,
    /// Hydrated data, `None` until known
    detail: Option<SongDetail>,
}

impl QueuedSong {
    /// Create a song from its summary and hydrate it.
    pub async fn init(
        queue: QueueId,
        summary: QueuedSongSummary,
        api: &dyn QueueApi,
        cache: &SongCache,
    ) -> Result<Self> {
        let mut song = Self::from_summary(summary);
        song.hydrate(queue, api, cache).await?;
        Ok(song)
    }

    /// Refresh the summary fields and hydrate again.
    ///
    /// # Panics
    ///
    /// If `summary` describes another song.
    pub async fn update(
        &mut self,
        queue: QueueId,
        summary: QueuedSongSummary,
        api: &dyn QueueApi,
        cache: &SongCache,
    ) -> Result<()> {
        self.refresh(summary);
        self.hydrate(queue, api, cache).await
    }

    /// Fill in the song details, fetching them only on a cache miss.
    pub async fn hydrate(
        &mut self,
        queue: QueueId,
        api: &dyn QueueApi,
        cache: &SongCache,
    ) -> Result<()> {
        if let Some(detail) = cache.get(self.id, queue).await {
            self.detail = Some(detail);
            return Ok(());
        }

        debug!(song = %self.id, queue = %queue, "Hydrating song");
        let fetched = api.fetch_song(queue, self.id).await?;

        // Another hydration may have won the race; both hold the same data
        cache.insert(self.id, queue, fetched.detail.clone()).await;
        self.detail = Some(fetched.detail);
        Ok(())
    }

    /// Unhydrated song built from its summary
    pub(crate) fn from_summary(summary: QueuedSongSummary) -> Self {
        Self {
            id: summary.id,
            name: summary.name,
            queued_at: summary.queued_at,
            likes: summary.likes,
            user_likes: summary.user_likes,
            detail: None,
        }
    }

    /// Overwrite the summary fields, keeping the hydrated data
    pub(crate) fn refresh(&mut self, summary: QueuedSongSummary) {
        assert_eq!(self.id, summary.id, "queued song updated with another song");

        self.name = summary.name;
        self.queued_at = summary.queued_at;
        self.likes = summary.likes;
        self.user_likes = summary.user_likes;
    }

    /// Queue order: most liked first, then first queued first
    pub fn play_order(&self, other: &Self) -> Ordering {
        other
            .likes
            .cmp(&self.likes)
            .then_with(|| self.queued_at.cmp(&other.queued_at))
    }

    pub fn id(&self) -> SongId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn queued_at(&self) -> DateTime<Utc> {
        self.queued_at
    }

    pub fn likes(&self) -> u16 {
        self.likes
    }

    /// Likes given to this song by the current user
    pub fn user_likes(&self) -> u16 {
        self.user_likes
    }

    /// Whether the details have been fetched
    pub fn is_hydrated(&self) -> bool {
        self.detail.is_some()
    }

    pub fn duration(&self) -> Option<Duration> {
        self.detail.as_ref().map(|d| d.duration)
    }

    pub fn kind(&self) -> Option<SongKind> {
        self.detail.as_ref().map(|d| d.kind)
    }

    pub fn url(&self) -> Option<&Url> {
        self.detail.as_ref().and_then(|d| d.url.as_ref())
    }

    pub fn thumbnails(&self) -> Option<&[Thumbnail]> {
        self.detail.as_ref().and_then(|d| d.thumbnails.as_deref())
    }
}
