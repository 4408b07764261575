// src/serve/state.rs

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::config::ServeTarget;
use crate::coordinator::CoordinatorHandle;
use crate::fs::FileSystem;

/// State shared by all request handlers.
pub struct AppState {
    /// Source of served bytes.
    pub fs: Arc<dyn FileSystem>,
    /// What request paths resolve against.
    pub target: ServeTarget,
    /// Entry point into the change coordinator for long-poll requests.
    pub coordinator: CoordinatorHandle,
    /// How long a `/notification` request is held before answering 408.
    pub poll_timeout: Duration,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("target", &self.target)
            .field("poll_timeout", &self.poll_timeout)
            .finish_non_exhaustive()
    }
}
