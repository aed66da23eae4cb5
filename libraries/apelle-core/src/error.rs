/// Core error types for Apelle queue clients
use thiserror::Error;

/// Result type alias using `ApelleError`
pub type Result<T> = std::result::Result<T, ApelleError>;

/// Core error type for Apelle queue clients
#[derive(Error, Debug)]
pub enum ApelleError {
    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// The state version presented on a mutating call was stale
    #[error("Precondition failed: the queue state changed")]
    PreconditionFailed,

    /// A logic defect: the local state broke one of its own invariants
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// The server sent an event this client does not know
    #[error("Unknown event kind: {0}")]
    UnknownEventKind(String),

    /// Network or stream failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Server returned an unexpected response
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl ApelleError {
    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Create an invariant violation error
    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Whether the error reveals a defect rather than a runtime condition
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::InvariantViolation(_) | Self::UnknownEventKind(_))
    }
}
