//! Main Apelle server client.

use crate::error::{ClientError, Result};
use crate::queues::QueuesClient;
use crate::types::ClientConfig;
use apelle_core::{
    ApelleError, EventSource, EventStream, QueueApi, QueueId, QueueSnapshot, QueuedSongDetail,
    SongId, StateVersion,
};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Main client for interacting with an Apelle server.
///
/// Besides its own methods, the client implements the [`QueueApi`] and
/// [`EventSource`] collaborator contracts, so it can drive a synchronized
/// queue directly.
///
/// # Example
///
/// ```ignore
/// use apelle_client::{ApelleClient, ClientConfig};
///
/// let client = ApelleClient::new(ClientConfig::new("https://apelle.example.com"))?;
///
/// let queue = client.queues().get_queue_by_code("party").await?;
/// println!("Queue {} has {} songs", queue.code, queue.queued_songs.len());
/// ```
#[derive(Debug, Clone)]
pub struct ApelleClient {
    http: Client,
    config: ClientConfig,
}

impl ApelleClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        // Validate URL
        if config.url.is_empty() {
            return Err(ClientError::InvalidUrl("URL cannot be empty".into()));
        }

        // Parse and normalize URL
        let url = config.url.trim_end_matches('/').to_string();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }
        url::Url::parse(&url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;

        let normalized_config = ClientConfig {
            url,
            credentials: config.credentials,
        };

        // No overall timeout: the event stream stays open indefinitely
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("Apelle/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        debug!(url = %normalized_config.url, "Created Apelle client");

        Ok(Self {
            http,
            config: normalized_config,
        })
    }

    /// Get the server URL.
    pub fn url(&self) -> &str {
        &self.config.url
    }

    /// Get a client for queue operations.
    pub fn queues(&self) -> QueuesClient<'_> {
        QueuesClient::new(
            &self.http,
            &self.config.url,
            self.config.credentials.as_ref(),
        )
    }
}

#[async_trait]
impl QueueApi for ApelleClient {
    async fn fetch_queue(&self, queue: QueueId) -> apelle_core::Result<QueueSnapshot> {
        self.queues().get_queue(queue).await.map_err(ApelleError::from)
    }

    async fn fetch_song(
        &self,
        queue: QueueId,
        song: SongId,
    ) -> apelle_core::Result<QueuedSongDetail> {
        self.queues()
            .get_queued_song(queue, song)
            .await
            .map_err(ApelleError::from)
    }

    async fn advance_queue(
        &self,
        queue: QueueId,
        expected: StateVersion,
    ) -> apelle_core::Result<()> {
        self.queues()
            .next(queue, expected)
            .await
            .map_err(ApelleError::from)
    }
}

#[async_trait]
impl EventSource for ApelleClient {
    async fn subscribe(&self, queue: QueueId) -> apelle_core::Result<EventStream> {
        self.queues().events(queue).await.map_err(ApelleError::from)
    }
}
