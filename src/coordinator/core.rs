// src/coordinator/core.rs

//! Pure coordinator state machine.
//!
//! [`CoordinatorCore`] consumes [`CoordinatorEvent`]s together with the
//! current time and produces a [`CoreStep`] describing which waiters the
//! shell must release. It holds no channels and performs no IO, so every
//! ordering question (late joiners, bursts, stale wake-ups, shutdown) can be
//! unit tested deterministically.

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, trace};

use super::debounce::DebounceState;
use super::{CoordinatorEvent, CoreStep, WaitOutcome, WaiterId};
use crate::watch::EventFilter;

/// Debounce + broadcast state.
///
/// Owns:
/// - the debounce deadline (`Idle` or a single `Pending` deadline)
/// - the set of waiters registered for the current cycle
/// - the ignorable-path filter applied to incoming changes
#[derive(Debug)]
pub struct CoordinatorCore {
    debounce: DebounceState,
    window: Duration,
    filter: EventFilter,
    waiters: HashSet<WaiterId>,
    cycle: u64,
    closed: bool,
}

impl CoordinatorCore {
    pub fn new(window: Duration, filter: EventFilter) -> Self {
        Self {
            debounce: DebounceState::Idle,
            window,
            filter,
            waiters: HashSet::new(),
            cycle: 0,
            closed: false,
        }
    }

    /// When the shell must wake up to fire a broadcast; `None` while idle.
    pub fn deadline(&self) -> Option<Instant> {
        self.debounce.deadline()
    }

    pub fn debounce_state(&self) -> DebounceState {
        self.debounce
    }

    pub fn waiter_count(&self) -> usize {
        self.waiters.len()
    }

    /// Number of broadcasts committed so far.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Handle a single event, updating state and returning the commands for
    /// the shell.
    pub fn step(&mut self, event: CoordinatorEvent, now: Instant) -> CoreStep {
        if self.closed {
            return match event {
                CoordinatorEvent::WaiterJoined { id } => {
                    CoreStep::release(vec![id], WaitOutcome::Closed, false)
                }
                _ => CoreStep::release(Vec::new(), WaitOutcome::Closed, false),
            };
        }

        match event {
            CoordinatorEvent::FileChanged { path } => self.handle_change(&path, now),
            CoordinatorEvent::WaiterJoined { id } => {
                self.waiters.insert(id);
                trace!(waiter = %id, waiting = self.waiters.len(), "waiter joined");
                CoreStep::proceed()
            }
            CoordinatorEvent::WaiterLeft { id } => {
                if self.waiters.remove(&id) {
                    trace!(waiter = %id, waiting = self.waiters.len(), "waiter left");
                }
                CoreStep::proceed()
            }
            CoordinatorEvent::DeadlineElapsed => self.handle_deadline(now),
            CoordinatorEvent::Shutdown => self.handle_shutdown(),
        }
    }

    fn handle_change(&mut self, path: &Path, now: Instant) -> CoreStep {
        if self.filter.is_ignorable(path) {
            debug!(?path, "ignoring change");
            return CoreStep::proceed();
        }

        let rearmed = self.debounce.is_pending();
        self.debounce.arm(now, self.window);
        debug!(?path, rearmed, "change recorded; debounce armed");
        CoreStep::proceed()
    }

    fn handle_deadline(&mut self, now: Instant) -> CoreStep {
        if !self.debounce.fire_if_due(now) {
            // Deadline moved by a later change, or nothing pending.
            return CoreStep::proceed();
        }

        self.cycle += 1;
        let released: Vec<WaiterId> = self.waiters.drain().collect();
        info!(
            cycle = self.cycle,
            waiters = released.len(),
            "change settled; broadcasting reload"
        );
        CoreStep::release(released, WaitOutcome::Changed, true)
    }

    fn handle_shutdown(&mut self) -> CoreStep {
        self.closed = true;
        self.debounce = DebounceState::Idle;
        let released: Vec<WaiterId> = self.waiters.drain().collect();
        info!(
            waiters = released.len(),
            "change source closed; releasing waiters"
        );
        CoreStep::release(released, WaitOutcome::Closed, false)
    }
}
