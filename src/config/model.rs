// src/config/model.rs

use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::watch::EventFilter;

/// Quiet period after the last qualifying change before a reload is broadcast.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(250);

/// How long a `/notification` request is parked before it is answered 408.
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(60);

/// Fixed local address the server listens on unless told otherwise.
pub const DEFAULT_LISTEN: SocketAddr = SocketAddr::new(
    std::net::IpAddr::V4(Ipv4Addr::LOCALHOST),
    8000,
);

/// What the server serves and watches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServeTarget {
    /// A directory tree; `/` maps to its `index.html`.
    Directory(PathBuf),
    /// A single file; `/` maps to the file and other paths resolve against
    /// its parent directory.
    File { file: PathBuf, dir: PathBuf },
}

impl ServeTarget {
    pub fn directory(root: impl Into<PathBuf>) -> Self {
        ServeTarget::Directory(root.into())
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        let file = path.into();
        let dir = match file.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        ServeTarget::File { file, dir }
    }

    /// Directory that request paths are resolved against.
    pub fn root_dir(&self) -> &Path {
        match self {
            ServeTarget::Directory(root) => root,
            ServeTarget::File { dir, .. } => dir,
        }
    }

    /// The served file, for single-file targets.
    pub fn single_file(&self) -> Option<&Path> {
        match self {
            ServeTarget::Directory(_) => None,
            ServeTarget::File { file, .. } => Some(file),
        }
    }
}

/// Fully resolved configuration for one run.
#[derive(Debug, Clone)]
pub struct ReloaderConfig {
    pub target: ServeTarget,
    pub listen: SocketAddr,
    pub debounce: Duration,
    pub poll_timeout: Duration,
    pub filter: EventFilter,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_target_resolves_against_parent() {
        let target = ServeTarget::file("/srv/site/page.html");
        assert_eq!(target.root_dir(), Path::new("/srv/site"));
        assert_eq!(target.single_file(), Some(Path::new("/srv/site/page.html")));
    }

    #[test]
    fn bare_file_name_resolves_against_cwd() {
        let target = ServeTarget::file("page.html");
        assert_eq!(target.root_dir(), Path::new("."));
    }
}
