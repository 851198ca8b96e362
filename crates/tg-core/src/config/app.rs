//! Daemon configuration

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use super::serde_utils::duration_secs;
use super::ScreenSlot;
use crate::error::ConfigError;

/// Top-level configuration for the termgate daemon
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,

    /// Listener settings
    pub server: ServerConfig,

    /// Ordered screen slots, one screen set is built from these per session
    pub screens: Vec<ScreenSlot>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            server: ServerConfig::default(),
            screens: vec![ScreenSlot::default_login()],
        }
    }
}

impl AppConfig {
    /// Prepare every strategy backend declared by the screen slots
    ///
    /// Must run once at startup, before the config is shared between sessions.
    pub fn prepare(&mut self) -> Result<(), ConfigError> {
        if self.server.tick_interval.is_zero() {
            return Err(ConfigError::Invalid(
                "server.tick_interval must be at least one second".to_string(),
            ));
        }

        for slot in &mut self.screens {
            if slot.id.is_empty() {
                return Err(ConfigError::MissingField("screens.id".to_string()));
            }
            slot.prepare()?;
        }
        Ok(())
    }
}

/// SSH listener configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Path to the Ed25519 host key, generated when missing
    pub host_key_path: PathBuf,

    /// How long shutdown waits for sessions to close, in seconds
    #[serde(deserialize_with = "duration_secs::deserialize")]
    pub shutdown_timeout: Duration,

    /// Clock tick period for each session, in seconds
    #[serde(deserialize_with = "duration_secs::deserialize")]
    pub tick_interval: Duration,

    /// Capacity of each session's event channel
    pub event_buffer: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 2222,
            host_key_path: PathBuf::from(".ssh/term_info_ed25519"),
            shutdown_timeout: Duration::from_secs(5),
            tick_interval: Duration::from_secs(1),
            event_buffer: 64,
        }
    }
}

impl ServerConfig {
    /// Get the listen address (host:port)
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
