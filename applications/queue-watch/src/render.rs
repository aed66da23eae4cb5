/// Log output for the followed queue
use apelle_sync::Queue;
use chrono::Duration;
use tracing::info;

/// Format a duration as `m:ss`, or `h:mm:ss` past one hour
pub fn format_duration(duration: Duration) -> String {
    let total = duration.num_seconds().max(0);
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

/// Log the current song and the queued songs, in play order
pub fn log_queue(queue: &Queue) {
    match queue.current() {
        Some(song) => info!(
            queue = %queue.code(),
            song = %song.name(),
            position = %format_duration(song.position()),
            duration = %format_duration(song.duration()),
            stopped = song.stopped(),
            "Now playing"
        ),
        None => info!(queue = %queue.code(), "Nothing playing"),
    }

    for (index, song) in queue.queue().iter().enumerate() {
        info!(
            queue = %queue.code(),
            rank = index + 1,
            song = %song.name(),
            likes = song.likes(),
            duration = %song.duration().map(format_duration).unwrap_or_else(|| "?".to_string()),
            "Queued"
        );
    }
}
