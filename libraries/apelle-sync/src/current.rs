//! Current-song playback simulator
//!
//! The server only tells when a playing song started. The position is
//! extrapolated locally by a background task that recomputes it on every
//! tick and stops itself when the song reaches its end.
//!
//! ```text
//!  init(playing) ──► tick ──► tick ──► ... ──► position >= duration
//!                                                  │
//!                                   stopped = true, end signal sent once
//!
//!  init(stopped) ──► position from the snapshot, no task
//! ```

use crate::types::Playhead;
use apelle_core::clock::elapsed_since;
use apelle_core::{Clock, CurrentSongSnapshot, SongId, SongKind, Thumbnail};
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use url::Url;

/// The song currently playing on a queue.
///
/// Every snapshot builds a fresh instance; nothing is patched in place.
/// Dropping the song cancels its timer.
#[derive(Debug)]
pub struct CurrentSong {
    id: SongId,
    name: String,
    duration: Duration,
    kind: SongKind,
    url: Option<Url>,
    thumbnails: Option<Vec<Thumbnail>>,
    starts_at: DateTime<Utc>,
    playhead: watch::Receiver<Playhead>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl CurrentSong {
    /// Build the simulator for `snapshot`.
    ///
    /// A playing song spawns its tick task, so this must be called inside a
    /// tokio runtime. `on_ended` receives a single message when the song
    /// reaches its end, always from the task and never from `init` itself.
    /// A stopped song never ends and drops `on_ended` right away.
    pub fn init(
        snapshot: CurrentSongSnapshot,
        clock: Arc<dyn Clock>,
        tick: std::time::Duration,
        on_ended: Option<oneshot::Sender<()>>,
    ) -> Self {
        let cancel = CancellationToken::new();

        let (playhead, task) = if snapshot.stopped {
            let (_, rx) = watch::channel(Playhead {
                position: snapshot.position,
                stopped: true,
            });
            (rx, None)
        } else {
            let (tx, rx) = watch::channel(Playhead {
                position: elapsed_since(snapshot.starts_at, clock.now()).min(snapshot.duration),
                stopped: false,
            });
            let task = tokio::spawn(run_playhead(
                snapshot.id,
                snapshot.starts_at,
                snapshot.duration,
                clock,
                tick,
                tx,
                on_ended,
                cancel.clone(),
            ));
            (rx, Some(task))
        };

        debug!(
            song = %snapshot.id,
            name = %snapshot.name,
            stopped = snapshot.stopped,
            "Current song initialized"
        );

        Self {
            id: snapshot.id,
            name: snapshot.name,
            duration: snapshot.duration,
            kind: snapshot.kind,
            url: snapshot.url,
            thumbnails: snapshot.thumbnails,
            starts_at: snapshot.starts_at,
            playhead,
            cancel,
            task,
        }
    }

    /// Cancel the tick task, if any. Safe to call any number of times.
    pub fn destroy(&mut self) {
        if !self.cancel.is_cancelled() {
            self.cancel.cancel();
            debug!(song = %self.id, "Current song destroyed");
        }
        self.task = None;
    }

    /// Whether a tick task is still recomputing the position
    pub fn is_ticking(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    pub fn id(&self) -> SongId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn kind(&self) -> SongKind {
        self.kind
    }

    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    pub fn thumbnails(&self) -> Option<&[Thumbnail]> {
        self.thumbnails.as_deref()
    }

    /// Instant at which the song would have started to be at its position
    pub fn starts_at(&self) -> DateTime<Utc> {
        self.starts_at
    }

    /// Position as of the last tick
    pub fn position(&self) -> Duration {
        self.playhead.borrow().position
    }

    /// Whether the song is stopped
    pub fn stopped(&self) -> bool {
        self.playhead.borrow().stopped
    }

    /// Subscribe to playhead updates.
    ///
    /// The channel closes when the tick task ends.
    pub fn watch(&self) -> watch::Receiver<Playhead> {
        self.playhead.clone()
    }
}

impl Drop for CurrentSong {
    fn drop(&mut self) {
        self.destroy();
    }
}

async fn run_playhead(
    id: SongId,
    starts_at: DateTime<Utc>,
    duration: Duration,
    clock: Arc<dyn Clock>,
    tick: std::time::Duration,
    playhead: watch::Sender<Playhead>,
    on_ended: Option<oneshot::Sender<()>>,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => return,
            _ = interval.tick() => {}
        }

        let position = elapsed_since(starts_at, clock.now());
        if position < duration {
            playhead.send_replace(Playhead {
                position,
                stopped: false,
            });
            continue;
        }

        playhead.send_replace(Playhead {
            position: duration,
            stopped: true,
        });
        info!(song = %id, "Current song reached its end");

        if let Some(on_ended) = on_ended {
            // The receiver is gone if nobody is waiting for the end
            let _ = on_ended.send(());
        }
        return;
    }
}
