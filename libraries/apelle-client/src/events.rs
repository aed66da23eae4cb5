//! Server-sent events decoding.
//!
//! The server pushes queue events as `text/event-stream`. Each frame carries
//! one JSON-encoded [`QueueEvent`] in its `data:` lines.

use apelle_core::{ApelleError, EventStream, QueueEvent};
use futures_util::{stream, StreamExt};
use tracing::{debug, warn};

/// Incremental `text/event-stream` decoder.
///
/// Feed it raw body chunks; it returns the data payload of every frame
/// completed by the chunk. Chunks may split lines, or even UTF-8 sequences,
/// anywhere.
#[derive(Debug, Default)]
pub struct SseDecoder {
    /// Bytes of the line being received
    line: Vec<u8>,
    /// `data:` lines of the frame being received
    data: Vec<String>,
}

impl SseDecoder {
    /// Create an empty decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume a chunk of the body, returning the completed payloads.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut frames = Vec::new();

        for &byte in chunk {
            if byte != b'\n' {
                self.line.push(byte);
                continue;
            }

            if self.line.last() == Some(&b'\r') {
                self.line.pop();
            }
            let line = String::from_utf8_lossy(&self.line).into_owned();
            self.line.clear();

            if let Some(frame) = self.process_line(&line) {
                frames.push(frame);
            }
        }

        frames
    }

    fn process_line(&mut self, line: &str) -> Option<String> {
        if line.is_empty() {
            if self.data.is_empty() {
                return None;
            }
            let frame = self.data.join("\n");
            self.data.clear();
            return Some(frame);
        }

        // Comment, used as keep-alive
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        if field == "data" {
            self.data.push(value.to_string());
        }
        // `event`, `id` and `retry` carry nothing we use

        None
    }
}

/// Turn a `text/event-stream` response into a stream of queue events.
///
/// Frames that are not valid events are logged and skipped; an unknown
/// event kind is passed through as an error so the subscriber can fail.
pub(crate) fn event_stream(response: reqwest::Response) -> EventStream {
    let mut decoder = SseDecoder::new();

    let events = response
        .bytes_stream()
        .map(move |chunk| match chunk {
            Ok(bytes) => decoder
                .push(&bytes)
                .into_iter()
                .filter_map(|data| decode_frame(&data))
                .collect::<Vec<_>>(),
            Err(e) => vec![Err(ApelleError::transport(e.to_string()))],
        })
        .flat_map(stream::iter);

    Box::pin(events)
}

fn decode_frame(data: &str) -> Option<apelle_core::Result<QueueEvent>> {
    match QueueEvent::from_json(data) {
        Ok(event) => {
            debug!(kind = event.kind(), "Received queue event");
            Some(Ok(event))
        }
        Err(ApelleError::Serialization(e)) => {
            warn!(error = %e, data = %data, "Dropping malformed event frame");
            None
        }
        Err(e) => Some(Err(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_single_frame() {
        let mut decoder = SseDecoder::new();
        let frames = decoder.push(b"data: {\"kind\":\"queue-delete\"}\n\n");
        assert_eq!(frames, vec!["{\"kind\":\"queue-delete\"}".to_string()]);
    }

    #[test]
    fn joins_multiline_data() {
        let mut decoder = SseDecoder::new();
        let frames = decoder.push(b"data: first\ndata: second\n\n");
        assert_eq!(frames, vec!["first\nsecond".to_string()]);
    }

    #[test]
    fn handles_frames_split_across_chunks() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"data: {\"ki").is_empty());
        assert!(decoder.push(b"nd\":\"queue-delete\"}\r\n").is_empty());
        let frames = decoder.push(b"\r\n");
        assert_eq!(frames, vec!["{\"kind\":\"queue-delete\"}".to_string()]);
    }

    #[test]
    fn handles_utf8_split_across_chunks() {
        let mut decoder = SseDecoder::new();
        let bytes = "data: caffè\n\n".as_bytes();
        let split = bytes.iter().position(|&b| b == 0xC3).unwrap() + 1;
        assert!(decoder.push(&bytes[..split]).is_empty());
        assert_eq!(decoder.push(&bytes[split..]), vec!["caffè".to_string()]);
    }

    #[test]
    fn ignores_comments_and_other_fields() {
        let mut decoder = SseDecoder::new();
        let frames = decoder.push(b": keep-alive\n\nevent: message\nid: 7\nretry: 100\ndata:x\n\n");
        assert_eq!(frames, vec!["x".to_string()]);
    }

    #[test]
    fn blank_lines_without_data_dispatch_nothing() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"\n\n\n").is_empty());
    }

    #[test]
    fn malformed_frames_are_dropped() {
        assert!(decode_frame("{\"kind\":\"queued-song-delete\"}").is_none());
        assert!(decode_frame("not json").is_none());
    }

    #[test]
    fn oversized_durations_are_dropped() {
        let frame = r#"{"kind":"queued-songs-state","queue":[]}"#;
        assert!(decode_frame(frame).is_some());

        let frame = r#"{"kind":"current-song-state","current":{"id":"67e55044-10b1-426f-9247-bb680e5fe0c8","name":"x","duration":"PT9999999999999H","kind":"Youtube","stopped":true,"starts_at":"2024-05-01T12:00:00Z","position":"PT0S"}}"#;
        assert!(decode_frame(frame).is_none());
    }

    #[test]
    fn unknown_kinds_are_passed_through() {
        let result = decode_frame("{\"kind\":\"queue-renamed\"}").unwrap();
        assert!(matches!(result, Err(ApelleError::UnknownEventKind(_))));
    }
}
