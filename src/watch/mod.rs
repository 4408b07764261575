// src/watch/mod.rs

//! File watching and change filtering.
//!
//! This module is responsible for:
//! - Wiring up a cross-platform filesystem watcher (`notify`) on the serve
//!   target and forwarding raw change paths to the change coordinator.
//! - Deciding which change paths are ignorable (hidden files, user globs).
//!
//! It does **not** debounce or talk to HTTP clients; that is the
//! coordinator's job.

pub mod filter;
pub mod path_utils;
pub mod watcher;

pub use filter::EventFilter;
pub use watcher::{spawn_watcher, WatcherHandle};
