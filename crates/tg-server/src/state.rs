//! Shared server state

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use tg_core::config::AppConfig;

use crate::session::SessionRegistry;

/// State shared by every connection of the daemon
pub struct ServerState {
    /// Prepared configuration, read-only once the server is running
    pub config: AppConfig,
    /// Live sessions
    pub sessions: Arc<SessionRegistry>,
}

impl ServerState {
    /// Create server state; sessions are cancelled together with `cancel`
    pub fn new(config: AppConfig, cancel: &CancellationToken) -> Self {
        Self {
            config,
            sessions: Arc::new(SessionRegistry::new(cancel)),
        }
    }
}
