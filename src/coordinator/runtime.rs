// src/coordinator/runtime.rs

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, Instant};
use tracing::{debug, info};

use super::core::CoordinatorCore;
use super::handle::{CoordinatorHandle, CoordinatorMessage};
use super::{CoordinatorCommand, CoordinatorEvent, WaitOutcome, WaiterId};
use crate::watch::EventFilter;

/// Async shell around [`CoordinatorCore`].
///
/// A single task owns the core and the reply channel of every parked waiter.
/// It processes handle messages and deadline expiry strictly one at a time,
/// feeds them to the core, and executes the release commands that come back.
pub struct Coordinator {
    core: CoordinatorCore,
    rx: mpsc::UnboundedReceiver<CoordinatorMessage>,
    replies: HashMap<WaiterId, oneshot::Sender<WaitOutcome>>,
}

impl fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coordinator")
            .field("core", &self.core)
            .field("parked", &self.replies.len())
            .finish_non_exhaustive()
    }
}

enum Next {
    Message(Option<CoordinatorMessage>),
    Deadline,
}

impl Coordinator {
    pub fn new(core: CoordinatorCore, rx: mpsc::UnboundedReceiver<CoordinatorMessage>) -> Self {
        Self {
            core,
            rx,
            replies: HashMap::new(),
        }
    }

    /// Main loop.
    ///
    /// Waits for the next message, or for the debounce deadline when one is
    /// pending. Returns once the core stops (shutdown, or every handle
    /// dropped).
    pub async fn run(mut self) {
        debug!("change coordinator started");

        loop {
            let next = match self.core.deadline() {
                Some(deadline) => {
                    // Queued messages are handled before a due deadline, so
                    // anything sent before expiry takes part in this cycle.
                    tokio::select! {
                        biased;
                        msg = self.rx.recv() => Next::Message(msg),
                        () = time::sleep_until(deadline) => Next::Deadline,
                    }
                }
                None => Next::Message(self.rx.recv().await),
            };

            let event = match next {
                Next::Message(msg) => self.accept(msg),
                Next::Deadline => CoordinatorEvent::DeadlineElapsed,
            };

            let step = self.core.step(event, Instant::now());

            for command in step.commands {
                self.execute_command(command);
            }

            if !step.keep_running {
                break;
            }
        }

        // Anyone still parked (or queued behind the shutdown) sees their reply
        // sender dropped, which resolves as `Closed`.
        self.rx.close();
        info!(cycles = self.core.cycle(), "change coordinator stopped");
    }

    /// Translate a handle message into a core event, tracking reply channels.
    fn accept(&mut self, msg: Option<CoordinatorMessage>) -> CoordinatorEvent {
        match msg {
            Some(CoordinatorMessage::Changed { path }) => CoordinatorEvent::FileChanged { path },
            Some(CoordinatorMessage::Join { id, reply }) => {
                self.replies.insert(id, reply);
                CoordinatorEvent::WaiterJoined { id }
            }
            Some(CoordinatorMessage::Leave { id }) => {
                self.replies.remove(&id);
                CoordinatorEvent::WaiterLeft { id }
            }
            Some(CoordinatorMessage::Shutdown) => CoordinatorEvent::Shutdown,
            None => {
                debug!("all coordinator handles dropped");
                CoordinatorEvent::Shutdown
            }
        }
    }

    fn execute_command(&mut self, command: CoordinatorCommand) {
        match command {
            CoordinatorCommand::Release { waiters, outcome } => {
                for id in waiters {
                    if let Some(reply) = self.replies.remove(&id) {
                        // The waiter may have given up in the meantime.
                        let _ = reply.send(outcome);
                    }
                }
            }
        }
    }
}

/// Spawn a coordinator task and return a handle to it.
///
/// Must be called from within a Tokio runtime.
pub fn spawn_coordinator(window: Duration, filter: EventFilter) -> CoordinatorHandle {
    let (handle, rx) = CoordinatorHandle::channel();
    let core = CoordinatorCore::new(window, filter);
    tokio::spawn(Coordinator::new(core, rx).run());
    handle
}
