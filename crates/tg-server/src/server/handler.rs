//! SSH client handler implementation
//!
//! Implements the russh server handler. Every connection gets one session:
//! the PTY size comes from `pty-req`, a `shell` request starts the session
//! driver, and channel data is decoded into key events for it.
//!
//! Handler callbacks run inside the russh session loop, which also carries
//! the driver's output. They never wait on the driver: decoded input goes
//! into an unbounded queue and a pump task moves it into the session's
//! bounded event channel.

use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::BytesMut;
use russh::server::{Auth, Handler, Msg, Session};
use russh::{Channel, ChannelId, CryptoVec, MethodSet, Pty};
use tokio::sync::mpsc;
use tokio_util::codec::Decoder;
use tokio_util::sync::CancellationToken;

use tg_core::{Event, SizingContext};
use tg_protocol::InputCodec;

use crate::navigator::Navigator;
use crate::screens::build_screen_set;
use crate::server::transport::ChannelTransport;
use crate::session::SessionDriver;
use crate::state::ServerState;

/// Written to shells requested without a terminal
pub const NO_PTY_MESSAGE: &str = "no active terminal, skipping\r\n";

/// Handler for a single SSH client connection
pub struct ClientHandler {
    /// Shared server state
    state: Arc<ServerState>,
    /// Peer address of the connecting client
    peer_addr: Option<SocketAddr>,
    /// Codec for decoding key presses
    codec: InputCodec,
    /// Buffer for incoming data
    buffer: BytesMut,
    /// Terminal size from the PTY request
    pty: Option<SizingContext>,
    /// Link to the running session
    session: Option<SessionLink>,
}

/// Handler side of a running session; dropping it hangs the session up
struct SessionLink {
    input: mpsc::UnboundedSender<Event>,
    hangup: CancellationToken,
}

impl Drop for SessionLink {
    fn drop(&mut self) {
        self.hangup.cancel();
    }
}

impl ClientHandler {
    /// Create a new client handler
    pub fn new(state: Arc<ServerState>, peer_addr: Option<SocketAddr>) -> Self {
        Self {
            state,
            peer_addr,
            codec: InputCodec::new(),
            buffer: BytesMut::with_capacity(256),
            pty: None,
            session: None,
        }
    }

    /// Queue an event for the session; a gone session drops the link
    fn forward(&mut self, event: Event) {
        let Some(link) = &self.session else {
            return;
        };
        if link.input.send(event).is_err() {
            tracing::debug!(peer = ?self.peer_addr, "Session ended, dropping input");
            self.session = None;
        }
    }


    fn start_session(&mut self, channel: ChannelId, sizing: SizingContext, session: &mut Session) {
        let server = &self.state.config.server;
        let (tx, rx) = mpsc::channel(server.event_buffer.max(1));
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let hangup = CancellationToken::new();

        let ticket = self.state.sessions.register(self.peer_addr);
        let navigator = Navigator::new(build_screen_set(&self.state.config.screens));
        let transport = ChannelTransport::new(rx, session.handle(), channel);

        let mut driver = SessionDriver::new(
            ticket.id(),
            navigator,
            transport,
            sizing,
            ticket.cancel_token(),
        )
        .with_ticker(tx.clone(), server.tick_interval)
        .with_hangup(hangup.clone());

        self.session = Some(SessionLink {
            input: input_tx,
            hangup,
        });

        tokio::spawn(pump_input(input_rx, tx));

        tokio::spawn(async move {
            // Deregisters when the driver is done
            let _ticket = ticket;
            driver.run().await;
        });
    }
}

#[async_trait]
impl Handler for ClientHandler {
    type Error = anyhow::Error;

    /// The login screen is the gate, so the SSH layer lets everyone in
    async fn auth_none(&mut self, user: &str) -> Result<Auth, Self::Error> {
        tracing::info!(peer = ?self.peer_addr, user, "Accepted connection");
        Ok(Auth::Accept)
    }

    async fn channel_open_session(
        &mut self,
        channel: Channel<Msg>,
        _session: &mut Session,
    ) -> Result<bool, Self::Error> {
        tracing::debug!("Channel opened: {:?}", channel.id());
        Ok(true)
    }

    #[allow(clippy::too_many_arguments)]
    async fn pty_request(
        &mut self,
        channel: ChannelId,
        term: &str,
        col_width: u32,
        row_height: u32,
        _pix_width: u32,
        _pix_height: u32,
        _modes: &[(Pty, u32)],
        session: &mut Session,
    ) -> Result<(), Self::Error> {
        let sizing = SizingContext::from_pty(col_width, row_height);
        tracing::debug!(term, %sizing, "PTY requested");
        self.pty = Some(sizing);
        session.channel_success(channel);
        Ok(())
    }

    async fn shell_request(
        &mut self,
        channel: ChannelId,
        session: &mut Session,
    ) -> Result<(), Self::Error> {
        let Some(sizing) = self.pty else {
            tracing::info!(peer = ?self.peer_addr, "Shell requested without a PTY");
            session.data(channel, CryptoVec::from_slice(NO_PTY_MESSAGE.as_bytes()));
            session.eof(channel);
            session.close(channel);
            return Ok(());
        };

        if self.session.is_some() {
            tracing::warn!(peer = ?self.peer_addr, "Session already running on this connection");
            session.channel_failure(channel);
            return Ok(());
        }

        session.channel_success(channel);
        self.start_session(channel, sizing, session);
        Ok(())
    }

    /// Handle incoming data on a channel
    async fn data(
        &mut self,
        channel: ChannelId,
        data: &[u8],
        _session: &mut Session,
    ) -> Result<(), Self::Error> {
        tracing::trace!("Received {} bytes on channel {:?}", data.len(), channel);

        self.buffer.extend_from_slice(data);

        loop {
            match self.codec.decode(&mut self.buffer) {
                Ok(Some(key)) => self.forward(Event::Key(key)),
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!("Input decode error: {}", e);
                    // Clear buffer on error to try to recover
                    self.buffer.clear();
                    break;
                }
            }
        }

        Ok(())
    }

    async fn window_change_request(
        &mut self,
        _channel: ChannelId,
        col_width: u32,
        row_height: u32,
        _pix_width: u32,
        _pix_height: u32,
        _session: &mut Session,
    ) -> Result<(), Self::Error> {
        let sizing = SizingContext::from_pty(col_width, row_height);
        self.pty = Some(sizing);
        self.forward(Event::Resize(sizing));
        Ok(())
    }

    async fn channel_eof(
        &mut self,
        channel: ChannelId,
        _session: &mut Session,
    ) -> Result<(), Self::Error> {
        tracing::debug!("Channel EOF: {:?}", channel);
        self.session = None;
        Ok(())
    }

    async fn channel_close(
        &mut self,
        channel: ChannelId,
        _session: &mut Session,
    ) -> Result<(), Self::Error> {
        tracing::debug!("Channel closed: {:?}", channel);
        self.session = None;
        Ok(())
    }
}

/// Move queued input into the session's event channel until either side ends
async fn pump_input(mut input: mpsc::UnboundedReceiver<Event>, events: mpsc::Sender<Event>) {
    while let Some(event) = input.recv().await {
        if events.send(event).await.is_err() {
            break;
        }
    }
}

/// Configuration for the SSH server
#[derive(Clone)]
pub struct SshConfig {
    /// russh server configuration
    pub ssh_config: Arc<russh::server::Config>,
}

impl SshConfig {
    /// Create a new server configuration with the given host key
    pub fn new(host_key: russh_keys::key::KeyPair) -> Self {
        let mut config = russh::server::Config::default();
        config.keys.push(host_key);
        config.methods = MethodSet::NONE;
        config.auth_rejection_time = std::time::Duration::from_secs(1);
        config.auth_rejection_time_initial = Some(std::time::Duration::from_secs(0));

        Self {
            ssh_config: Arc::new(config),
        }
    }
}
