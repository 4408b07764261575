// src/serve/mod.rs

//! HTTP surface.
//!
//! - `GET /notification`: long-poll endpoint backed by the change coordinator.
//! - everything else: static content from the serve target, with the reload
//!   script injected into HTML.

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

pub mod content;
pub mod inject;
pub mod notification;
pub mod resolve;
pub mod state;

pub use inject::{injection_point, inject_reload_script, RELOAD_SCRIPT};
pub use notification::NOTIFICATION_PATH;
pub use state::AppState;

/// Build the application router.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(NOTIFICATION_PATH, get(notification::hold_notification))
        .fallback(content::serve_content)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
