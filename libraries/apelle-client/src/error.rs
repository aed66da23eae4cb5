//! Error types for the Apelle client.

use apelle_core::ApelleError;
use thiserror::Error;

/// Errors that can occur when interacting with an Apelle server.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error response
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// The requested queue or song does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The `If-Match` state version did not match the server's
    #[error("Precondition failed")]
    PreconditionFailed,

    /// Invalid server URL
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse server response
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

impl From<ClientError> for ApelleError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::NotFound { entity, id } => ApelleError::not_found(entity, id),
            ClientError::PreconditionFailed => ApelleError::PreconditionFailed,
            ClientError::ServerError { status, message } => {
                ApelleError::ServerError { status, message }
            }
            other => ApelleError::transport(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precondition_failed_maps_to_core() {
        let err: ApelleError = ClientError::PreconditionFailed.into();
        assert!(matches!(err, ApelleError::PreconditionFailed));
    }

    #[test]
    fn not_found_keeps_entity_and_id() {
        let err: ApelleError = ClientError::NotFound {
            entity: "Queue",
            id: "abc".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Queue not found: abc");
    }

    #[test]
    fn parse_errors_become_transport_errors() {
        let err: ApelleError = ClientError::ParseError("bad json".to_string()).into();
        assert!(matches!(err, ApelleError::Transport(ref m) if m.contains("bad json")));
    }
}
