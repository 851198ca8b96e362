//! Session driver
//!
//! Runs one session from its first screen to close: pulls events from the
//! transport, forwards them to the active screen, performs the effects the
//! screen asks for, applies its transitions through the navigator and sends
//! the rendered frame back whenever it changed.

use std::fmt;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use tg_core::traits::{Effect, FollowUp, Navigation, TransitionKind, TransitionRequest, Transport};
use tg_core::{Event, SessionError, SizingContext};
use tg_protocol::{Output, SessionId};

use super::ticker::spawn_ticker;
use crate::navigator::Navigator;

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// A screen requested to quit
    Quit,
    /// The remote end went away
    Disconnected,
    /// There was no screen to show
    Exhausted,
    /// The server is shutting down
    Shutdown,
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CloseReason::Quit => "quit",
            CloseReason::Disconnected => "disconnected",
            CloseReason::Exhausted => "no more screens",
            CloseReason::Shutdown => "shutdown",
        };
        f.write_str(s)
    }
}

/// Lifecycle of a driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Uninitialized,
    Running,
    Closed(CloseReason),
}

struct TickSource {
    tx: mpsc::Sender<Event>,
    period: Duration,
}

/// Drives a single session
pub struct SessionDriver<T> {
    id: SessionId,
    navigator: Navigator,
    transport: T,
    sizing: SizingContext,
    state: DriverState,
    cancel: CancellationToken,
    /// Cancelled when the remote end hangs up
    hangup: CancellationToken,
    ticks: Option<TickSource>,
    alt_screen: bool,
    /// Last frame sent to the terminal
    shown: Option<String>,
}

impl<T: Transport> SessionDriver<T> {
    /// Create a driver; nothing happens until [`run`](Self::run)
    pub fn new(
        id: SessionId,
        navigator: Navigator,
        transport: T,
        sizing: SizingContext,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            id,
            navigator,
            transport,
            sizing,
            state: DriverState::Uninitialized,
            cancel,
            hangup: CancellationToken::new(),
            ticks: None,
            alt_screen: false,
            shown: None,
        }
    }

    /// End the session as disconnected once `hangup` is cancelled, without
    /// handling events still queued
    pub fn with_hangup(mut self, hangup: CancellationToken) -> Self {
        self.hangup = hangup;
        self
    }

    /// Feed clock ticks into the session's event channel while it runs
    pub fn with_ticker(mut self, tx: mpsc::Sender<Event>, period: Duration) -> Self {
        self.ticks = Some(TickSource { tx, period });
        self
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Current terminal size as last reported
    pub fn sizing(&self) -> SizingContext {
        self.sizing
    }

    /// Run the session until it closes
    pub async fn run(&mut self) -> CloseReason {
        // The source's sender is dropped here, the ticker keeps a weak one
        let _ticker = self
            .ticks
            .take()
            .map(|source| spawn_ticker(&source.tx, source.period));

        tracing::info!(session = %self.id, sizing = %self.sizing, "Session started");

        let reason = match self.drive().await {
            Ok(reason) => reason,
            Err(SessionError::Exhausted) => CloseReason::Exhausted,
            Err(e) => {
                tracing::debug!(session = %self.id, "Transport failed: {}", e);
                CloseReason::Disconnected
            }
        };

        self.close(reason).await;
        reason
    }

    async fn drive(&mut self) -> Result<CloseReason, SessionError> {
        let follow_up = self
            .navigator
            .go_to_first(self.sizing)
            .ok_or(SessionError::Exhausted)?;
        self.state = DriverState::Running;

        self.send(Output::EnterAltScreen).await?;
        self.alt_screen = true;
        self.perform(follow_up).await?;
        self.draw().await?;

        loop {
            let event = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Ok(CloseReason::Shutdown),
                _ = self.hangup.cancelled() => return Ok(CloseReason::Disconnected),
                event = self.transport.next_event() => event,
            };

            let Some(event) = event else {
                return Ok(CloseReason::Disconnected);
            };

            if let Some(reason) = self.dispatch(event).await? {
                return Ok(reason);
            }
        }
    }

    /// Handle one event; returns a reason when the session must end
    async fn dispatch(&mut self, event: Event) -> Result<Option<CloseReason>, SessionError> {
        if let Event::Resize(sizing) = event {
            self.sizing = sizing;
            // The terminal may have reflowed, so the next frame always goes out
            self.shown = None;
        }

        let screen = self
            .navigator
            .active_mut()
            .ok_or(SessionError::Exhausted)?;
        let reaction = screen.handle_event(&event);

        self.perform(reaction.follow_up).await?;

        if let Some(request) = reaction.transition {
            if let Some(reason) = self.apply(request).await? {
                return Ok(Some(reason));
            }
        }

        self.draw().await?;
        Ok(None)
    }

    async fn apply(
        &mut self,
        request: TransitionRequest,
    ) -> Result<Option<CloseReason>, SessionError> {
        tracing::debug!(session = %self.id, kind = ?request.kind, "Transition requested");

        let follow_up = match request.kind {
            TransitionKind::Quit => return Ok(Some(CloseReason::Quit)),
            TransitionKind::Next => self
                .navigator
                .advance(request.sizing)
                .ok_or(SessionError::Exhausted)?,
            TransitionKind::Prev => match self.navigator.retreat(request.sizing) {
                Some(follow_up) => follow_up,
                None => return Ok(None),
            },
        };

        self.perform(follow_up).await?;
        Ok(None)
    }

    async fn perform(&mut self, follow_up: FollowUp) -> Result<(), SessionError> {
        for effect in follow_up.into_effects() {
            let output = match effect {
                Effect::Bell => Output::Bell,
                Effect::SetTitle(title) => Output::SetTitle(title),
            };
            self.send(output).await?;
        }
        Ok(())
    }

    async fn draw(&mut self) -> Result<(), SessionError> {
        let Some(frame) = self.navigator.active().map(|screen| screen.render()) else {
            return Ok(());
        };
        if self.shown.as_ref() == Some(&frame) {
            return Ok(());
        }
        self.shown = Some(frame.clone());
        self.send(Output::Draw(frame)).await
    }

    /// Send output, skipping anything the terminal encoding rejects
    async fn send(&mut self, output: Output) -> Result<(), SessionError> {
        match self.transport.send(output).await {
            Err(SessionError::Encode(e)) => {
                tracing::warn!(session = %self.id, "Dropping output: {}", e);
                Ok(())
            }
            other => other,
        }
    }

    async fn close(&mut self, reason: CloseReason) {
        if self.alt_screen {
            if let Err(e) = self.transport.send(Output::LeaveAltScreen).await {
                tracing::debug!(session = %self.id, "Failed to leave alt screen: {}", e);
            }
            self.alt_screen = false;
        }
        self.transport.close().await;
        self.state = DriverState::Closed(reason);

        tracing::info!(session = %self.id, reason = %reason, "Session closed");
    }
}
