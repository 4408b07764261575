// src/coordinator/handle.rs

use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time;
use tracing::trace;

use super::{WaitOutcome, WaiterId};

/// Messages from handles into the coordinator task.
#[derive(Debug)]
pub enum CoordinatorMessage {
    Changed { path: PathBuf },
    Join {
        id: WaiterId,
        reply: oneshot::Sender<WaitOutcome>,
    },
    Leave { id: WaiterId },
    Shutdown,
}

/// Cloneable entry point into a running coordinator.
///
/// All interaction goes through message passing; no coordinator state is
/// shared with callers.
#[derive(Clone)]
pub struct CoordinatorHandle {
    tx: mpsc::UnboundedSender<CoordinatorMessage>,
    next_waiter: Arc<AtomicU64>,
}

impl fmt::Debug for CoordinatorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoordinatorHandle")
            .field("closed", &self.tx.is_closed())
            .finish_non_exhaustive()
    }
}

impl CoordinatorHandle {
    /// Create a handle together with the receiving end the coordinator task
    /// consumes.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<CoordinatorMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = Self {
            tx,
            next_waiter: Arc::new(AtomicU64::new(1)),
        };
        (handle, rx)
    }

    /// Report one raw filesystem change.
    pub fn on_event(&self, path: PathBuf) {
        if let Err(err) = self.tx.send(CoordinatorMessage::Changed { path }) {
            trace!(dropped = ?err.0, "coordinator closed; dropping change");
        }
    }

    /// Park until the next debounce cycle completes, `timeout` elapses, or the
    /// coordinator shuts down.
    ///
    /// Dropping the returned future before it resolves deregisters the
    /// waiter without affecting anyone else.
    pub async fn wait_for_change(&self, timeout: Duration) -> WaitOutcome {
        let id = WaiterId(self.next_waiter.fetch_add(1, Ordering::Relaxed));
        let (reply_tx, mut reply_rx) = oneshot::channel();

        if self
            .tx
            .send(CoordinatorMessage::Join {
                id,
                reply: reply_tx,
            })
            .is_err()
        {
            return WaitOutcome::Closed;
        }

        let mut departure = Departure {
            id,
            tx: Some(self.tx.clone()),
        };

        match time::timeout(timeout, &mut reply_rx).await {
            Ok(Ok(outcome)) => {
                departure.resolved();
                outcome
            }
            Ok(Err(_)) => {
                departure.resolved();
                WaitOutcome::Closed
            }
            Err(_) => {
                // A release racing with the timeout still wins.
                reply_rx.close();
                match reply_rx.try_recv() {
                    Ok(outcome) => {
                        departure.resolved();
                        outcome
                    }
                    Err(_) => WaitOutcome::TimedOut,
                }
            }
        }
    }

    /// Release every parked waiter with `Closed` and stop the coordinator.
    pub fn shutdown(&self) {
        let _ = self.tx.send(CoordinatorMessage::Shutdown);
    }

    /// Whether the coordinator task has stopped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Sends `Leave` for a waiter that stops waiting without being released.
struct Departure {
    id: WaiterId,
    tx: Option<mpsc::UnboundedSender<CoordinatorMessage>>,
}

impl Departure {
    fn resolved(&mut self) {
        self.tx = None;
    }
}

impl Drop for Departure {
    fn drop(&mut self) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(CoordinatorMessage::Leave { id: self.id });
        }
    }
}
