//! Transport trait

use async_trait::async_trait;
use tg_protocol::Output;

use crate::error::SessionError;
use crate::types::Event;

/// Connection between a session and its remote terminal
#[async_trait]
pub trait Transport: Send {
    /// Wait for the next input event
    ///
    /// Returns `None` once the remote end has gone away.
    async fn next_event(&mut self) -> Option<Event>;

    /// Write output to the terminal
    async fn send(&mut self, output: Output) -> Result<(), SessionError>;

    /// End the remote session
    async fn close(&mut self);
}
