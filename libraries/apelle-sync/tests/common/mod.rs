//! Shared mocks and fixtures for synchronization tests

#![allow(dead_code)]

use apelle_core::{
    CurrentSongSnapshot, EventSource, EventStream, QueueApi, QueueEvent, QueueId, QueueSnapshot,
    QueuedSongDetail, QueuedSongSummary, Result, SongDetail, SongId, SongKind, StateVersion,
    Thumbnail,
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use futures_util::stream;
use mockall::mock;
use tokio::sync::mpsc;

mock! {
    pub Api {}

    #[async_trait]
    impl QueueApi for Api {
        async fn fetch_queue(&self, queue_id: QueueId) -> Result<QueueSnapshot>;
        async fn fetch_song(&self, queue_id: QueueId, song_id: SongId) -> Result<QueuedSongDetail>;
        async fn advance_queue(&self, queue_id: QueueId, expected: StateVersion) -> Result<()>;
    }
}

mock! {
    pub Events {}

    #[async_trait]
    impl EventSource for Events {
        async fn subscribe(&self, queue_id: QueueId) -> Result<EventStream>;
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("apelle_sync=debug")
        .with_test_writer()
        .try_init();
}

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

/// Summary of a song queued `minutes` after the base time
pub fn summary(name: &str, likes: u16, minutes: i64) -> QueuedSongSummary {
    QueuedSongSummary {
        id: SongId::generate(),
        name: name.to_string(),
        queued_at: base_time() + Duration::minutes(minutes),
        likes,
        user_likes: 0,
    }
}

/// Details every mocked fetch returns: 3 minutes long, one thumbnail
pub fn detail() -> SongDetail {
    SongDetail {
        duration: Duration::minutes(3),
        kind: SongKind::Youtube,
        url: Some("https://www.youtube.com/watch?v=dQw4w9WgXcQ".parse().unwrap()),
        thumbnails: Some(vec![Thumbnail {
            width: 120,
            height: 90,
            url: "https://i.ytimg.com/vi/dQw4w9WgXcQ/default.jpg".parse().unwrap(),
        }]),
    }
}

pub fn detail_for(song_id: SongId) -> QueuedSongDetail {
    QueuedSongDetail {
        summary: QueuedSongSummary {
            id: song_id,
            name: "Song".to_string(),
            queued_at: base_time(),
            likes: 0,
            user_likes: 0,
        },
        detail: detail(),
    }
}

/// Song started `elapsed` seconds before `now`
pub fn playing(now: DateTime<Utc>, elapsed: i64, duration: i64) -> CurrentSongSnapshot {
    CurrentSongSnapshot {
        id: SongId::generate(),
        name: "Playing".to_string(),
        duration: Duration::seconds(duration),
        kind: SongKind::Youtube,
        url: None,
        thumbnails: None,
        stopped: false,
        starts_at: now - Duration::seconds(elapsed),
        position: Duration::zero(),
    }
}

/// Song paused at `position` seconds
pub fn paused(position: i64, duration: i64) -> CurrentSongSnapshot {
    CurrentSongSnapshot {
        id: SongId::generate(),
        name: "Paused".to_string(),
        duration: Duration::seconds(duration),
        kind: SongKind::Youtube,
        url: None,
        thumbnails: None,
        stopped: true,
        starts_at: base_time(),
        position: Duration::seconds(position),
    }
}

pub fn snapshot(
    id: QueueId,
    current: Option<CurrentSongSnapshot>,
    queued_songs: Vec<QueuedSongSummary>,
) -> QueueSnapshot {
    QueueSnapshot {
        id,
        code: "party".to_string(),
        current,
        queued_songs,
        state_version: StateVersion::generate(),
    }
}

/// Api whose song fetches always succeed, expecting exactly `fetches` of them
pub fn api_with_fetches(fetches: usize) -> MockApi {
    let mut api = MockApi::new();
    api.expect_fetch_song()
        .times(fetches)
        .returning(|_, id| Ok(detail_for(id)));
    api
}

/// Event stream fed by the returned sender; ends when the sender is dropped
pub fn channel_stream() -> (mpsc::UnboundedSender<Result<QueueEvent>>, EventStream) {
    let (tx, rx) = mpsc::unbounded_channel();
    let events = stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|event| (event, rx))
    });
    (tx, Box::pin(events))
}

pub fn ids(queue: &[apelle_sync::QueuedSong]) -> Vec<SongId> {
    queue.iter().map(|song| song.id()).collect()
}
