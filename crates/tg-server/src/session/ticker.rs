//! Per-session clock ticker

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use tg_core::{time, Event};

/// Stops the ticker task when dropped
pub struct TickerGuard {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl Drop for TickerGuard {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.handle.abort();
    }
}

/// Spawn a task pushing `Event::Tick` into `tx` every `period`
///
/// The task only holds a weak sender so it never keeps a finished session's
/// channel open. Ticks are dropped while the channel is full.
pub fn spawn_ticker(tx: &mpsc::Sender<Event>, period: Duration) -> TickerGuard {
    let weak = tx.downgrade();
    let cancel = CancellationToken::new();
    let token = cancel.clone();

    let handle = tokio::spawn(async move {
        let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = interval.tick() => {
                    let Some(tx) = weak.upgrade() else {
                        break;
                    };
                    match tx.try_send(Event::Tick(time::now())) {
                        Ok(()) => {}
                        Err(mpsc::error::TrySendError::Full(_)) => {
                            tracing::trace!("Event channel full, dropping tick");
                        }
                        Err(mpsc::error::TrySendError::Closed(_)) => break,
                    }
                }
            }
        }

        tracing::trace!("Ticker stopped");
    });

    TickerGuard { cancel, handle }
}
