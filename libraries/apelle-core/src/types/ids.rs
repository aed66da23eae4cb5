/// ID types for Apelle entities
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Wrap an existing UUID
            pub const fn new(id: Uuid) -> Self {
                Self(id)
            }

            /// Generate a new random ID
            pub fn generate() -> Self {
                Self(Uuid::new_v4())
            }

            /// Get the inner UUID
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_id! {
    /// Queue identifier
    QueueId
}

uuid_id! {
    /// Song identifier
    ///
    /// The same song can be queued in several queues; pair it with a
    /// [`QueueId`] when the per-queue view of the song matters.
    SongId
}

uuid_id! {
    /// Opaque token identifying the player state of a queue.
    ///
    /// Presented back to the server on mutating calls; a mismatch means
    /// somebody else changed the player first.
    StateVersion
}

impl StateVersion {
    /// Version reported before any state has been observed
    pub const UNKNOWN: Self = Self(Uuid::nil());
}
