//! Apelle Core
//!
//! Domain types, events and collaborator contracts shared by Apelle queue
//! clients.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `QueueSnapshot`, `CurrentSongSnapshot`, `QueuedSongSummary`, ...
//! - **Events**: the closed `QueueEvent` sum type pushed by the server
//! - **Collaborator Traits**: `QueueApi`, `EventSource`
//! - **Time**: the `Clock` abstraction and ISO-8601 durations
//! - **Error Handling**: unified `ApelleError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use apelle_core::QueueEvent;
//!
//! let event = QueueEvent::from_json(r#"{"kind":"queue-delete"}"#).unwrap();
//! assert_eq!(event, QueueEvent::QueueDeleted);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod clock;
pub mod error;
pub mod events;
pub mod iso8601;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use clock::{Clock, SystemClock};
pub use error::{ApelleError, Result};
pub use events::QueueEvent;
pub use traits::{EventSource, EventStream, QueueApi};

pub use types::{
    CurrentSongSnapshot, QueueId, QueueSnapshot, QueuedSongDetail, QueuedSongSummary, SongDetail,
    SongId, SongKind, StateVersion, Thumbnail,
};
