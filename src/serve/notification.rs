// src/serve/notification.rs

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use tracing::debug;

use super::state::AppState;
use crate::coordinator::WaitOutcome;

/// Route the injected script long-polls.
pub const NOTIFICATION_PATH: &str = "/notification";

/// Hold the request until the next reload broadcast, the poll timeout, or
/// coordinator shutdown.
///
/// If the client disconnects, the handler future is dropped and the waiter
/// deregisters itself.
pub(crate) async fn hold_notification(State(state): State<Arc<AppState>>) -> StatusCode {
    debug!("holding notification request");
    let outcome = state.coordinator.wait_for_change(state.poll_timeout).await;
    let status = status_for(outcome);
    debug!(?outcome, status = status.as_u16(), "reporting notification");
    status
}

/// HTTP status reported for each wait outcome.
pub fn status_for(outcome: WaitOutcome) -> StatusCode {
    match outcome {
        WaitOutcome::Changed => StatusCode::OK,
        WaitOutcome::TimedOut => StatusCode::REQUEST_TIMEOUT,
        WaitOutcome::Closed => StatusCode::SERVICE_UNAVAILABLE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcomes_map_to_long_poll_statuses() {
        assert_eq!(status_for(WaitOutcome::Changed), StatusCode::OK);
        assert_eq!(status_for(WaitOutcome::TimedOut), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(status_for(WaitOutcome::Closed), StatusCode::SERVICE_UNAVAILABLE);
    }
}
