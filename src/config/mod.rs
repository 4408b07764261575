// src/config/mod.rs

//! Run configuration.
//!
//! There is no config file: everything comes from the command line. This
//! module turns [`CliArgs`](crate::cli::CliArgs) into a validated
//! [`ReloaderConfig`] and classifies the serve target.

pub mod loader;
pub mod model;

pub use loader::{from_cli_args, resolve_target};
pub use model::{
    ReloaderConfig, ServeTarget, DEFAULT_DEBOUNCE, DEFAULT_LISTEN, DEFAULT_POLL_TIMEOUT,
};
