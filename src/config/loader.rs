// src/config/loader.rs

use std::path::Path;
use std::time::Duration;

use tracing::debug;

use crate::cli::CliArgs;
use crate::config::model::{ReloaderConfig, ServeTarget};
use crate::errors::{ReloaderError, Result};
use crate::fs::FileSystem;
use crate::watch::EventFilter;

/// Build a validated [`ReloaderConfig`] from parsed CLI arguments.
///
/// - The target must exist; it is canonicalized and classified as a
///   directory or a single file.
/// - Ignore globs must compile.
/// - The debounce window and poll timeout must be non-zero.
pub fn from_cli_args(args: &CliArgs, fs: &dyn FileSystem) -> Result<ReloaderConfig> {
    if args.debounce_ms == 0 {
        return Err(ReloaderError::Config(
            "--debounce-ms must be greater than zero".to_string(),
        ));
    }
    if args.poll_timeout == 0 {
        return Err(ReloaderError::Config(
            "--poll-timeout must be greater than zero".to_string(),
        ));
    }

    let target = resolve_target(&args.target, fs)?;
    let filter = EventFilter::new(target.root_dir(), args.hidden, &args.ignore)?;

    let config = ReloaderConfig {
        target,
        listen: args.listen,
        debounce: Duration::from_millis(args.debounce_ms),
        poll_timeout: Duration::from_secs(args.poll_timeout),
        filter,
    };
    debug!(?config, "resolved configuration");

    Ok(config)
}

/// Canonicalize `path` and decide whether it is served as a directory tree or
/// as a single file.
pub fn resolve_target(path: &Path, fs: &dyn FileSystem) -> Result<ServeTarget> {
    if !fs.exists(path) {
        return Err(ReloaderError::InvalidTarget {
            path: path.to_path_buf(),
            reason: "no such file or directory".to_string(),
        });
    }

    let canonical = fs.canonicalize(path)?;

    if fs.is_dir(&canonical) {
        Ok(ServeTarget::directory(canonical))
    } else if fs.is_file(&canonical) {
        Ok(ServeTarget::file(canonical))
    } else {
        Err(ReloaderError::InvalidTarget {
            path: path.to_path_buf(),
            reason: "not a regular file or directory".to_string(),
        })
    }
}
