//! Queue operations for the Apelle server.

use crate::error::{ClientError, Result};
use crate::events::event_stream;
use crate::types::Credentials;
use apelle_core::{EventStream, QueueId, QueueSnapshot, QueuedSongDetail, SongId, StateVersion};
use reqwest::header::{ACCEPT, IF_MATCH};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

/// Queue client for the Apelle server.
pub struct QueuesClient<'a> {
    http: &'a Client,
    base_url: &'a str,
    credentials: Option<&'a Credentials>,
}

impl<'a> QueuesClient<'a> {
    pub(crate) fn new(
        http: &'a Client,
        base_url: &'a str,
        credentials: Option<&'a Credentials>,
    ) -> Self {
        Self {
            http,
            base_url,
            credentials,
        }
    }

    /// Get the full state of a queue.
    pub async fn get_queue(&self, queue_id: QueueId) -> Result<QueueSnapshot> {
        let url = format!("{}/api/v1/queues/i/{}", self.base_url, queue_id);
        debug!(url = %url, queue = %queue_id, "Fetching queue");

        let response = self.authed(self.http.get(&url)).send().await?;
        let queue: QueueSnapshot =
            parse_json(check_status(response, "Queue", &queue_id.to_string()).await?).await?;

        debug!(
            queue = %queue.id,
            code = %queue.code,
            queued = queue.queued_songs.len(),
            playing = queue.current.is_some(),
            "Fetched queue"
        );

        Ok(queue)
    }

    /// Get the full state of a queue from its shareable code.
    pub async fn get_queue_by_code(&self, code: &str) -> Result<QueueSnapshot> {
        let url = format!(
            "{}/api/v1/queues/c/{}",
            self.base_url,
            urlencoding::encode(code)
        );
        debug!(url = %url, code = %code, "Fetching queue by code");

        let response = self.authed(self.http.get(&url)).send().await?;
        parse_json(check_status(response, "Queue", code).await?).await
    }

    /// Get the full data of a queued song.
    pub async fn get_queued_song(
        &self,
        queue_id: QueueId,
        song_id: SongId,
    ) -> Result<QueuedSongDetail> {
        let url = format!(
            "{}/api/v1/queues/i/{}/queue/{}",
            self.base_url, queue_id, song_id
        );
        debug!(url = %url, queue = %queue_id, song = %song_id, "Fetching queued song");

        let response = self.authed(self.http.get(&url)).send().await?;
        parse_json(check_status(response, "Song", &song_id.to_string()).await?).await
    }

    /// Move the queue to the next song.
    ///
    /// The call is conditioned on the player state still being at
    /// `expected`; otherwise the server answers `412` and this returns
    /// [`ClientError::PreconditionFailed`].
    pub async fn next(&self, queue_id: QueueId, expected: StateVersion) -> Result<()> {
        let url = format!("{}/api/v1/queues/i/{}/next", self.base_url, queue_id);
        debug!(url = %url, queue = %queue_id, expected = %expected, "Advancing queue");

        let response = self
            .authed(self.http.post(&url))
            .header(IF_MATCH, format!("\"{}\"", expected))
            .send()
            .await?;
        check_status(response, "Queue", &queue_id.to_string()).await?;

        info!(queue = %queue_id, "Queue advanced");
        Ok(())
    }

    /// Ask the server to broadcast the whole queue state on the event stream.
    pub async fn push_sync_event(&self, queue_id: QueueId) -> Result<()> {
        let url = format!(
            "{}/api/v1/queues/i/{}/push_sync_event",
            self.base_url, queue_id
        );
        debug!(url = %url, queue = %queue_id, "Requesting sync event");

        let response = self.authed(self.http.post(&url)).send().await?;
        check_status(response, "Queue", &queue_id.to_string()).await?;
        Ok(())
    }

    /// Open the event stream of a queue.
    pub async fn events(&self, queue_id: QueueId) -> Result<EventStream> {
        let url = format!("{}/api/v1/queues/i/{}/events", self.base_url, queue_id);
        debug!(url = %url, queue = %queue_id, "Opening event stream");

        let response = self
            .authed(self.http.get(&url))
            .header(ACCEPT, "text/event-stream")
            .send()
            .await?;
        let response = check_status(response, "Queue", &queue_id.to_string()).await?;

        info!(queue = %queue_id, "Event stream opened");
        Ok(event_stream(response))
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        match self.credentials {
            Some(c) => request.basic_auth(&c.username, Some(&c.password)),
            None => request,
        }
    }
}

/// Map non-success statuses to errors, passing successful responses through.
async fn check_status(response: Response, entity: &'static str, id: &str) -> Result<Response> {
    let status = response.status();

    if status.is_success() {
        Ok(response)
    } else if status == StatusCode::NOT_FOUND {
        Err(ClientError::NotFound {
            entity,
            id: id.to_string(),
        })
    } else if status == StatusCode::PRECONDITION_FAILED {
        Err(ClientError::PreconditionFailed)
    } else {
        let error_text = response.text().await.unwrap_or_default();
        Err(ClientError::ServerError {
            status: status.as_u16(),
            message: error_text,
        })
    }
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| ClientError::ParseError(e.to_string()))
}

// URL encoding helper
mod urlencoding {
    pub fn encode(s: &str) -> String {
        url::form_urlencoded::byte_serialize(s.as_bytes()).collect()
    }
}
