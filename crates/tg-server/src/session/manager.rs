//! Registry of live sessions

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use dashmap::DashMap;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

use tg_core::time;
use tg_protocol::SessionId;

/// Tracks every running session so shutdown can wait for them
pub struct SessionRegistry {
    /// Sessions indexed by session ID
    sessions: DashMap<SessionId, SessionInfo>,
    next_id: AtomicU64,
    /// Parent of every session's token
    cancel: CancellationToken,
    /// Signalled whenever a session deregisters
    deregistered: Notify,
}

/// What the registry knows about a session
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub id: SessionId,
    pub peer: Option<SocketAddr>,
    pub opened_at: DateTime<Local>,
}

/// Registration of one session; deregisters on drop
pub struct SessionTicket {
    id: SessionId,
    cancel: CancellationToken,
    registry: Arc<SessionRegistry>,
}

impl SessionTicket {
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Token cancelled when the registry shuts down
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

impl Drop for SessionTicket {
    fn drop(&mut self) {
        if let Some((_, info)) = self.registry.sessions.remove(&self.id) {
            let open_for = time::now().signed_duration_since(info.opened_at);
            tracing::debug!(
                session = %self.id,
                peer = ?info.peer,
                seconds = open_for.num_seconds(),
                "Session deregistered"
            );
        }
        self.registry.deregistered.notify_waiters();
    }
}

impl SessionRegistry {
    /// Create a registry whose sessions are cancelled along with `parent`
    pub fn new(parent: &CancellationToken) -> Self {
        Self {
            sessions: DashMap::new(),
            next_id: AtomicU64::new(1),
            cancel: parent.child_token(),
            deregistered: Notify::new(),
        }
    }

    /// Allocate an id and register a new session
    pub fn register(self: &Arc<Self>, peer: Option<SocketAddr>) -> SessionTicket {
        let id = SessionId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.sessions.insert(
            id,
            SessionInfo {
                id,
                peer,
                opened_at: time::now(),
            },
        );
        tracing::debug!(session = %id, ?peer, "Session registered");

        SessionTicket {
            id,
            cancel: self.cancel.child_token(),
            registry: Arc::clone(self),
        }
    }

    /// List all sessions
    pub fn list(&self) -> Vec<SessionInfo> {
        self.sessions.iter().map(|r| r.value().clone()).collect()
    }

    /// Number of active sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Cancel every session and wait up to `timeout` for them to deregister
    ///
    /// Returns how many sessions were still registered when the wait ended.
    pub async fn shutdown(&self, timeout: Duration) -> usize {
        self.cancel.cancel();

        let drained = async {
            loop {
                let notified = self.deregistered.notified();
                if self.sessions.is_empty() {
                    break;
                }
                notified.await;
            }
        };

        match tokio::time::timeout(timeout, drained).await {
            Ok(()) => {
                tracing::info!("All sessions closed");
                0
            }
            Err(_) => {
                let stuck = self.list();
                tracing::warn!(
                    "Shutdown timed out after {:?} with {} session(s) still open",
                    timeout,
                    stuck.len()
                );
                for info in &stuck {
                    tracing::warn!(
                        session = %info.id,
                        peer = ?info.peer,
                        opened_at = %time::format_clock(&info.opened_at),
                        "Abandoning session"
                    );
                }
                stuck.len()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Arc<SessionRegistry> {
        Arc::new(SessionRegistry::new(&CancellationToken::new()))
    }

    #[test]
    fn test_register_allocates_unique_ids() {
        let registry = registry();
        let a = registry.register(None);
        let b = registry.register(None);
        assert_ne!(a.id(), b.id());
        assert_eq!(registry.len(), 2);
        assert!(registry.list().iter().any(|info| info.id == a.id()));
    }

    #[test]
    fn test_ticket_drop_deregisters() {
        let registry = registry();
        let peer: SocketAddr = "127.0.0.1:4022".parse().unwrap();
        let ticket = registry.register(Some(peer));
        assert_eq!(registry.list()[0].peer, Some(peer));

        drop(ticket);
        assert!(registry.is_empty());
        assert!(registry.list().is_empty());
    }

    #[tokio::test]
    async fn test_shutdown_cancels_and_waits() {
        let registry = registry();
        let ticket = registry.register(None);
        let token = ticket.cancel_token();

        tokio::spawn(async move {
            token.cancelled().await;
            drop(ticket);
        });

        assert_eq!(registry.shutdown(Duration::from_secs(5)).await, 0);
        assert!(registry.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_times_out() {
        let registry = registry();
        let _stuck = registry.register(None);
        assert_eq!(registry.shutdown(Duration::from_secs(5)).await, 1);
    }

    #[test]
    fn test_parent_cancellation_reaches_sessions() {
        let parent = CancellationToken::new();
        let registry = Arc::new(SessionRegistry::new(&parent));
        let ticket = registry.register(None);
        parent.cancel();
        assert!(ticket.cancel_token().is_cancelled());
    }
}
