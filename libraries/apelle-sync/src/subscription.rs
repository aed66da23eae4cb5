//! Subscription driver
//!
//! Runs the whole life of a synchronized queue: load the snapshot, follow
//! the event stream, react to natural song ends, and tear everything down
//! when the queue is deleted, the stream closes or the caller cancels.

use crate::cache::SongCache;
use crate::queue::Queue;
use crate::types::{SubscriptionEnd, SyncConfig};
use apelle_core::{Clock, EventSource, QueueApi, QueueId, Result, SystemClock};
use futures_util::StreamExt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// A subscription to the state of one queue
pub struct QueueSubscription {
    queue_id: QueueId,
    api: Arc<dyn QueueApi>,
    events: Arc<dyn EventSource>,
    cache: SongCache,
    config: SyncConfig,
    clock: Arc<dyn Clock>,
    cancel: CancellationToken,
}

impl QueueSubscription {
    pub fn new(
        queue_id: QueueId,
        api: Arc<dyn QueueApi>,
        events: Arc<dyn EventSource>,
        cache: SongCache,
        config: SyncConfig,
    ) -> Self {
        Self {
            queue_id,
            api,
            events,
            cache,
            config,
            clock: Arc::new(SystemClock::new()),
            cancel: CancellationToken::new(),
        }
    }

    /// Use `clock` to extrapolate song positions
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Token that stops the subscription when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run until the queue is deleted, the stream ends or the token is
    /// cancelled.
    ///
    /// `observer` sees the queue once it is loaded and subscribed, then
    /// after every change. Timers are stopped before returning, whatever
    /// the outcome.
    pub async fn run<F>(self, mut observer: F) -> Result<SubscriptionEnd>
    where
        F: FnMut(&Queue),
    {
        let mut queue = Queue::new(
            self.queue_id,
            self.api.clone(),
            self.cache.clone(),
            &self.config,
        )
        .with_clock(self.clock.clone());

        let result = tokio::select! {
            biased;
            () = self.cancel.cancelled() => Ok(SubscriptionEnd::Cancelled),
            result = self.follow(&mut queue, &mut observer) => result,
        };

        queue.destroy();
        info!(queue = %self.queue_id, outcome = ?result, "Subscription stopped");
        result
    }

    async fn follow<F>(&self, queue: &mut Queue, observer: &mut F) -> Result<SubscriptionEnd>
    where
        F: FnMut(&Queue),
    {
        let snapshot = self.api.fetch_queue(self.queue_id).await?;
        queue.init(snapshot).await?;

        let mut events = self.events.subscribe(self.queue_id).await?;
        info!(queue = %self.queue_id, code = %queue.code(), "Subscribed to queue");
        observer(queue);

        loop {
            tokio::select! {
                event = events.next() => {
                    let Some(event) = event else {
                        return Ok(SubscriptionEnd::StreamClosed);
                    };
                    let event = event?;
                    debug!(queue = %self.queue_id, kind = event.kind(), "Applying event");

                    queue.apply(event).await?;
                    observer(queue);

                    if queue.is_deleted() {
                        return Ok(SubscriptionEnd::QueueDeleted);
                    }
                }
                () = queue.song_ended() => {
                    queue.on_song_ended().await?;
                    observer(queue);
                }
            }
        }
    }
}
