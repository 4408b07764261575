// src/coordinator/debounce.rs

use std::time::Duration;

use tokio::time::Instant;

/// Debounce timer state.
///
/// `Idle` has no deadline at all, so the shell schedules no wake-up while
/// nothing is pending. At most one deadline exists at any instant: arming
/// while `Pending` replaces the previous deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DebounceState {
    #[default]
    Idle,
    Pending(Instant),
}

impl DebounceState {
    /// (Re)arm the deadline to `now + window`.
    pub fn arm(&mut self, now: Instant, window: Duration) {
        *self = DebounceState::Pending(now + window);
    }

    pub fn deadline(&self) -> Option<Instant> {
        match self {
            DebounceState::Idle => None,
            DebounceState::Pending(deadline) => Some(*deadline),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, DebounceState::Pending(_))
    }

    /// Consume the deadline if it has been reached, returning to `Idle`.
    ///
    /// Returns false (and leaves the state untouched) when idle or when the
    /// deadline was pushed back after the wake-up was scheduled.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match *self {
            DebounceState::Pending(deadline) if deadline <= now => {
                *self = DebounceState::Idle;
                true
            }
            _ => false,
        }
    }
}
