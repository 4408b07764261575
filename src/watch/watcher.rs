// src/watch/watcher.rs

use std::ffi::OsString;
use std::path::Path;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

use crate::config::ServeTarget;
use crate::coordinator::CoordinatorHandle;
use crate::errors::Result;

/// Handle for the filesystem watcher.
///
/// Keeps the underlying `RecommendedWatcher` alive. Dropping this handle
/// stops file watching, which ends the event stream and shuts the
/// coordinator down.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Spawn a filesystem watcher on `target` that reports every change path to
/// `coordinator`.
///
/// - Directory targets are watched recursively.
/// - Single-file targets watch the parent directory non-recursively and only
///   forward events naming that file, so saves that replace the file via a
///   rename keep being seen.
///
/// Watch errors after startup are logged and watching continues. When the
/// event stream ends the coordinator is shut down.
pub fn spawn_watcher(target: &ServeTarget, coordinator: CoordinatorHandle) -> Result<WatcherHandle> {
    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<notify::Result<Event>>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| {
            // Only fails once the forwarding task is gone.
            let _ = event_tx.send(res);
        },
        Config::default(),
    )?;

    let (watch_path, mode) = match target {
        ServeTarget::Directory(root) => (root.as_path(), RecursiveMode::Recursive),
        ServeTarget::File { dir, .. } => (dir.as_path(), RecursiveMode::NonRecursive),
    };
    watcher.watch(watch_path, mode)?;

    info!(path = ?watch_path, ?mode, "file watcher started");

    let only: Option<OsString> = target
        .single_file()
        .and_then(Path::file_name)
        .map(|name| name.to_os_string());

    tokio::spawn(async move {
        while let Some(res) = event_rx.recv().await {
            match res {
                Ok(event) => forward_event(event, only.as_deref(), &coordinator),
                Err(err) => warn!(error = %err, "file watch error; continuing"),
            }
        }
        info!("file watcher stream ended; shutting down change coordinator");
        coordinator.shutdown();
    });

    Ok(WatcherHandle { _inner: watcher })
}

/// Forward the paths of one notify event.
///
/// Access events are dropped: serving a file reads it, and reads must not
/// trigger reloads.
fn forward_event(event: Event, only: Option<&std::ffi::OsStr>, coordinator: &CoordinatorHandle) {
    if event.kind.is_access() {
        trace!(?event, "ignoring access event");
        return;
    }

    debug!(kind = ?event.kind, paths = ?event.paths, "received notify event");

    for path in event.paths {
        if let Some(name) = only {
            if path.file_name() != Some(name) {
                continue;
            }
        }
        coordinator.on_event(path);
    }
}
