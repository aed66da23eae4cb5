//! Types for configuring the Apelle client.

use serde::{Deserialize, Serialize};

/// Configuration for connecting to an Apelle server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the server (e.g., "https://apelle.example.com")
    pub url: String,
    /// Credentials sent with every request, if any
    #[serde(default)]
    pub credentials: Option<Credentials>,
}

impl ClientConfig {
    /// Create a new client config with just the URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            credentials: None,
        }
    }

    /// Create a config using HTTP basic authentication.
    pub fn with_credentials(
        url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            credentials: Some(Credentials {
                username: username.into(),
                password: password.into(),
            }),
        }
    }
}

/// HTTP basic credentials.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
