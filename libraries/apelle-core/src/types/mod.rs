mod ids;
mod queue;
mod song;

pub use ids::{QueueId, SongId, StateVersion};
pub use queue::QueueSnapshot;
pub use song::{
    CurrentSongSnapshot, QueuedSongDetail, QueuedSongSummary, SongDetail, SongKind, Thumbnail,
};
