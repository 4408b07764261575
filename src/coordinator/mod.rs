// src/coordinator/mod.rs

//! Change notification coordinator.
//!
//! Turns a bursty, unordered stream of filesystem change paths into debounced
//! "reload" broadcasts, and hands each broadcast to every long-poll request
//! that is parked at the time it fires.
//!
//! The pure state machine lives in [`core`] and is driven one occurrence at a
//! time. The async shell in [`runtime`] owns the core and the reply channels of
//! parked waiters, and is reachable only through a [`CoordinatorHandle`].
//!
//! ```text
//! watcher ──on_event──►┐
//! request ──join/leave─┼──► mpsc ──► Coordinator (single task) ──► oneshot per waiter
//! ctrl-c  ──shutdown──►┘                 │
//!                                        └── sleep_until(deadline) only while Pending
//! ```

use std::fmt;
use std::path::PathBuf;

pub mod core;
pub mod debounce;
pub mod handle;
pub mod runtime;

pub use self::core::CoordinatorCore;
pub use debounce::DebounceState;
pub use handle::{CoordinatorHandle, CoordinatorMessage};
pub use runtime::{spawn_coordinator, Coordinator};

/// Identity of one parked `wait_for_change` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WaiterId(pub u64);

impl fmt::Display for WaiterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}", self.0)
    }
}

/// How a `wait_for_change` call was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// A debounce cycle completed while the caller was registered.
    Changed,
    /// The caller's own timeout elapsed first.
    TimedOut,
    /// The coordinator has shut down.
    Closed,
}

/// Occurrences processed by the core, strictly one at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoordinatorEvent {
    /// Something under the watched root changed.
    FileChanged { path: PathBuf },
    /// A long-poll request started waiting.
    WaiterJoined { id: WaiterId },
    /// A long-poll request stopped waiting (timeout or cancellation).
    WaiterLeft { id: WaiterId },
    /// The debounce deadline reported by the core has been reached.
    DeadlineElapsed,
    /// The change source is gone; release everyone and stop.
    Shutdown,
}

/// Command produced by the core, executed by the async shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoordinatorCommand {
    /// Resolve these waiters with `outcome`.
    Release {
        waiters: Vec<WaiterId>,
        outcome: WaitOutcome,
    },
}

/// Result of feeding one event to the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreStep {
    pub commands: Vec<CoordinatorCommand>,
    /// Whether the shell loop should keep running.
    pub keep_running: bool,
}

impl CoreStep {
    fn proceed() -> Self {
        Self {
            commands: Vec::new(),
            keep_running: true,
        }
    }

    fn release(waiters: Vec<WaiterId>, outcome: WaitOutcome, keep_running: bool) -> Self {
        let commands = if waiters.is_empty() {
            Vec::new()
        } else {
            vec![CoordinatorCommand::Release { waiters, outcome }]
        };
        Self {
            commands,
            keep_running,
        }
    }
}
