/// Watcher configuration
use crate::error::{Result, WatchError};
use apelle_client::ClientConfig;
use apelle_sync::SyncConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File read when no `--config` is given, if it exists
pub const DEFAULT_CONFIG_FILE: &str = "apelle-watch.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WatchConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_sync")]
    pub sync: SyncSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_url")]
    pub url: String,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SyncSettings {
    /// Playhead refresh interval, in milliseconds
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    #[serde(default)]
    pub autoplay: bool,
}

impl WatchConfig {
    /// Load configuration from file and environment
    ///
    /// `path` must exist when given; otherwise [`DEFAULT_CONFIG_FILE`] is
    /// read if present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let config_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if config_path.exists() {
                    settings = settings.add_source(config::File::from(config_path));
                }
            }
        }

        // Override with environment variables (APELLE_SERVER__URL, APELLE_SYNC__TICK_MS, ...)
        settings = settings.add_source(
            config::Environment::with_prefix("APELLE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        Ok(settings.build()?.try_deserialize()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.url.trim().is_empty() {
            return Err(WatchError::Config(
                "Server URL is required (set APELLE_SERVER__URL)".to_string(),
            ));
        }

        if self.sync.tick_ms == 0 {
            return Err(WatchError::Config(
                "Tick interval must be greater than zero".to_string(),
            ));
        }

        if self.server.password.is_some() && self.server.username.is_none() {
            return Err(WatchError::Config(
                "A password was given without a username".to_string(),
            ));
        }

        Ok(())
    }

    pub fn client_config(&self) -> ClientConfig {
        match &self.server.username {
            Some(username) => ClientConfig::with_credentials(
                self.server.url.clone(),
                username.clone(),
                self.server.password.clone().unwrap_or_default(),
            ),
            None => ClientConfig::new(self.server.url.clone()),
        }
    }

    pub fn sync_config(&self) -> SyncConfig {
        SyncConfig::default()
            .with_tick(Duration::from_millis(self.sync.tick_ms))
            .with_autoplay(self.sync.autoplay)
    }
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        url: default_url(),
        username: None,
        password: None,
    }
}

fn default_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_sync() -> SyncSettings {
    SyncSettings {
        tick_ms: default_tick_ms(),
        autoplay: false,
    }
}

fn default_tick_ms() -> u64 {
    250
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            sync: default_sync(),
        }
    }
}
