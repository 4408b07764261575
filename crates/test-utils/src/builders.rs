#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use reloader::config::{ServeTarget, DEFAULT_DEBOUNCE, DEFAULT_POLL_TIMEOUT};
use reloader::coordinator::{spawn_coordinator, CoordinatorHandle};
use reloader::fs::RealFileSystem;
use reloader::serve::{create_router, AppState};
use reloader::types::HiddenFilePolicy;
use reloader::watch::EventFilter;
use tempfile::TempDir;

/// Builder for a site on disk served by a real coordinator and router.
///
/// Files live in `<tempdir>/site`; the temp directory itself is the site's
/// parent, so tests can place files just outside the served root.
pub struct SiteBuilder {
    dir: TempDir,
    root: PathBuf,
    single_file: Option<PathBuf>,
    debounce: Duration,
    poll_timeout: Duration,
    hidden: HiddenFilePolicy,
    ignore: Vec<String>,
}

impl SiteBuilder {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let root = dir
            .path()
            .canonicalize()
            .expect("canonical temp dir")
            .join("site");
        fs::create_dir_all(&root).expect("create site root");
        Self {
            dir,
            root,
            single_file: None,
            debounce: DEFAULT_DEBOUNCE,
            poll_timeout: DEFAULT_POLL_TIMEOUT,
            hidden: HiddenFilePolicy::Ignore,
            ignore: Vec::new(),
        }
    }

    /// Write a file at `rel` under the site root.
    pub fn with_file(self, rel: &str, content: impl AsRef<[u8]>) -> Self {
        write_file(&self.root.join(rel), content.as_ref());
        self
    }

    /// Serve only `rel` (a single-file target) instead of the whole root.
    pub fn single_file(mut self, rel: &str) -> Self {
        self.single_file = Some(self.root.join(rel));
        self
    }

    pub fn debounce(mut self, window: Duration) -> Self {
        self.debounce = window;
        self
    }

    pub fn poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }

    pub fn hidden(mut self, policy: HiddenFilePolicy) -> Self {
        self.hidden = policy;
        self
    }

    pub fn ignore(mut self, glob: &str) -> Self {
        self.ignore.push(glob.to_string());
        self
    }

    /// Spawn the coordinator and build the router.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn build(self) -> TestSite {
        let target = match self.single_file {
            Some(file) => ServeTarget::file(file),
            None => ServeTarget::directory(self.root.clone()),
        };
        let filter = EventFilter::new(target.root_dir(), self.hidden, &self.ignore)
            .expect("valid ignore globs in test site");
        let coordinator = spawn_coordinator(self.debounce, filter);

        let state = Arc::new(AppState {
            fs: Arc::new(RealFileSystem),
            target: target.clone(),
            coordinator: coordinator.clone(),
            poll_timeout: self.poll_timeout,
        });

        TestSite {
            _dir: self.dir,
            root: self.root,
            target,
            coordinator,
            router: create_router(state),
        }
    }
}

impl Default for SiteBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running site; the files are removed when it is dropped.
pub struct TestSite {
    _dir: TempDir,
    pub root: PathBuf,
    pub target: ServeTarget,
    pub coordinator: CoordinatorHandle,
    pub router: Router,
}

impl TestSite {
    /// Absolute path of `rel` under the site root. `..` reaches outside it.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    /// Rewrite a file without reporting a change.
    pub fn write(&self, rel: &str, content: impl AsRef<[u8]>) {
        write_file(&self.path(rel), content.as_ref());
    }

    /// Simulate an edit: rewrite the file and report the change.
    pub fn touch(&self, rel: &str, content: impl AsRef<[u8]>) {
        self.write(rel, content);
        self.coordinator.on_event(self.path(rel));
    }

    /// Report a change for `rel` without touching content.
    pub fn notify(&self, rel: impl AsRef<Path>) {
        self.coordinator.on_event(self.root.join(rel));
    }
}

fn write_file(path: &Path, content: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dirs");
    }
    fs::write(path, content).expect("write test file");
}
