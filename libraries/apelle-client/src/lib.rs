//! Apelle Client
//!
//! HTTP client library for the Apelle queue API.
//!
//! # Features
//!
//! - **Queues**: Fetch a queue by id or shareable code, fetch queued songs
//! - **Playback**: Conditionally advance the queue to the next song
//! - **Events**: Subscribe to the server-sent event stream of a queue
//!
//! # Example
//!
//! ```ignore
//! use apelle_client::{ApelleClient, ClientConfig};
//! use futures_util::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ApelleClient::new(ClientConfig::new("https://apelle.example.com"))?;
//!
//!     let queue = client.queues().get_queue_by_code("party").await?;
//!     println!("Queue {} is at state {}", queue.code, queue.state_version);
//!
//!     let mut events = client.queues().events(queue.id).await?;
//!     while let Some(event) = events.next().await {
//!         println!("{:?}", event?);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod events;
mod queues;
mod types;

// Re-export main types
pub use client::ApelleClient;
pub use error::{ClientError, Result};
pub use events::SseDecoder;
pub use types::{ClientConfig, Credentials};

// Re-export sub-clients for direct use if needed
pub use queues::QueuesClient;
