//! Apelle - Queue Synchronization
//!
//! Keeps a local, continuously updated view of a shared Apelle queue from a
//! full snapshot plus the stream of server events.
//!
//! This crate provides:
//! - Queue aggregate with identity-preserving merges and like-based ordering
//! - Current-song simulator extrapolating the playback position locally
//! - Lazy hydration of queued songs through a shared cache
//! - Optional autoplay, advancing the queue when a song ends
//! - A subscription driver tying it all to an event stream
//!
//! # Architecture
//!
//! `apelle-sync` never touches the network itself. The server is reached
//! through the [`QueueApi`](apelle_core::QueueApi) and
//! [`EventSource`](apelle_core::EventSource) traits, implemented over HTTP by
//! `apelle-client` and by mocks in tests.
//!
//! # Example
//!
//! ```rust,no_run
//! use apelle_core::{EventSource, QueueApi, QueueId};
//! use apelle_sync::{QueueSubscription, SongCache, SyncConfig};
//! use std::sync::Arc;
//!
//! async fn follow(
//!     id: QueueId,
//!     api: Arc<dyn QueueApi>,
//!     events: Arc<dyn EventSource>,
//! ) -> apelle_core::Result<()> {
//!     let subscription = QueueSubscription::new(
//!         id,
//!         api,
//!         events,
//!         SongCache::new(),
//!         SyncConfig::default().with_autoplay(true),
//!     );
//!
//!     let end = subscription
//!         .run(|queue| {
//!             if let Some(song) = queue.current() {
//!                 println!("{} at {}s", song.name(), song.position().num_seconds());
//!             }
//!             println!("{} songs queued", queue.queue().len());
//!         })
//!         .await?;
//!
//!     println!("Stopped: {:?}", end);
//!     Ok(())
//! }
//! ```

mod cache;
mod current;
mod queue;
mod queued;
mod subscription;
pub mod types;

// Public exports
pub use cache::SongCache;
pub use current::CurrentSong;
pub use queue::Queue;
pub use queued::QueuedSong;
pub use subscription::QueueSubscription;
pub use types::{Playhead, SubscriptionEnd, SyncConfig};
