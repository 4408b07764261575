// src/errors.rs

//! Crate-wide error type and result alias.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReloaderError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Cannot serve {path:?}: {reason}")]
    InvalidTarget { path: PathBuf, reason: String },

    #[error("Invalid ignore pattern: {0}")]
    Pattern(#[from] globset::Error),

    #[error("Cannot watch for changes: {0}")]
    WatchInit(#[from] notify::Error),

    #[error("Cannot listen on {address}: {source}")]
    Listen {
        address: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ReloaderError>;
