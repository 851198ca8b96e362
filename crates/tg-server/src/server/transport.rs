//! Transport over an SSH channel

use async_trait::async_trait;
use bytes::BytesMut;
use russh::server::Handle;
use russh::{ChannelId, CryptoVec};
use tokio::sync::mpsc;
use tokio_util::codec::Encoder;

use tg_core::traits::Transport;
use tg_core::{Event, SessionError};
use tg_protocol::{Output, OutputCodec};

/// Session transport backed by an SSH channel
///
/// Input events arrive through `events`, fed by the connection handler.
/// Output goes through the output codec and is written to the channel.
pub struct ChannelTransport {
    events: mpsc::Receiver<Event>,
    handle: Handle,
    channel: ChannelId,
    codec: OutputCodec,
    buffer: BytesMut,
}

impl ChannelTransport {
    pub fn new(events: mpsc::Receiver<Event>, handle: Handle, channel: ChannelId) -> Self {
        Self {
            events,
            handle,
            channel,
            codec: OutputCodec::new(),
            buffer: BytesMut::with_capacity(4096),
        }
    }
}

#[async_trait]
impl Transport for ChannelTransport {
    async fn next_event(&mut self) -> Option<Event> {
        self.events.recv().await
    }

    async fn send(&mut self, output: Output) -> Result<(), SessionError> {
        self.buffer.clear();
        self.codec.encode(output, &mut self.buffer)?;

        self.handle
            .data(self.channel, CryptoVec::from_slice(&self.buffer))
            .await
            .map_err(|_| SessionError::TransportClosed)
    }

    async fn close(&mut self) {
        self.events.close();
        let _ = self.handle.eof(self.channel).await;
        if self.handle.close(self.channel).await.is_err() {
            tracing::debug!("Channel {:?} already closed", self.channel);
        }
    }
}
