/// Song domain types
use crate::types::SongId;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// Where a song is played from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SongKind {
    /// A video hosted on Youtube
    Youtube,
}

impl SongKind {
    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Youtube => "Youtube",
        }
    }
}

impl std::fmt::Display for SongKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A preview image of a song
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnail {
    /// Width in pixels
    pub width: u32,

    /// Height in pixels
    pub height: u32,

    /// Where the image is served from
    pub url: Url,
}

/// The song currently being played in a queue
///
/// `starts_at` is meaningful only while playing, `position` only while
/// stopped. A playing song's position must always be derived from
/// `starts_at`, never trusted as sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentSongSnapshot {
    /// Unique id of the song
    pub id: SongId,

    /// Name of the song
    pub name: String,

    /// Duration of the song
    #[serde(with = "crate::iso8601::duration")]
    pub duration: Duration,

    /// Source of the song
    pub kind: SongKind,

    /// Eventual public url of the song
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<Url>,

    /// Available thumbnails for the song
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnails: Option<Vec<Thumbnail>>,

    /// If the song is currently stopped
    pub stopped: bool,

    /// Moment at which the song should have started to reach the current position
    pub starts_at: DateTime<Utc>,

    /// Position in the song when stopped
    #[serde(with = "crate::iso8601::duration")]
    pub position: Duration,
}

/// Short form of a song waiting in a queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedSongSummary {
    /// Unique id of the song
    pub id: SongId,

    /// Name of the song
    pub name: String,

    /// The moment this song was added to the queue
    pub queued_at: DateTime<Utc>,

    /// The number of likes this song received
    pub likes: u16,

    /// The number of likes this song received by the calling user
    pub user_likes: u16,
}

/// Data a queued song gains when hydrated
///
/// Immutable once the song exists, so it can be cached for the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongDetail {
    /// Duration of the song
    #[serde(with = "crate::iso8601::duration")]
    pub duration: Duration,

    /// Source of the song
    pub kind: SongKind,

    /// Eventual public url of the song
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<Url>,

    /// Available thumbnails for the song
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnails: Option<Vec<Thumbnail>>,
}

/// Full form of a song waiting in a queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuedSongDetail {
    /// Fields shared with the short form
    #[serde(flatten)]
    pub summary: QueuedSongSummary,

    /// Fields only present in the full form
    #[serde(flatten)]
    pub detail: SongDetail,
}
