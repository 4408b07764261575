// src/watch/filter.rs

use std::fmt;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::types::HiddenFilePolicy;
use crate::watch::path_utils::{base_name_starts_with, relative_str};

/// Decides whether a raw change path should be dropped before it reaches the
/// debounce logic.
///
/// Two independent rules apply:
/// - the hidden file policy, checked against the base name only;
/// - optional ignore globs, checked against the path relative to the serve
///   root (e.g. `"build/out.js"`). Paths outside the root are never
///   glob-ignored.
#[derive(Clone)]
pub struct EventFilter {
    root: PathBuf,
    hidden: HiddenFilePolicy,
    ignore_set: Option<GlobSet>,
}

impl fmt::Debug for EventFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventFilter")
            .field("root", &self.root)
            .field("hidden", &self.hidden)
            .field("ignore_globs", &self.ignore_set.as_ref().map(GlobSet::len))
            .finish()
    }
}

impl EventFilter {
    /// Build a filter rooted at `root`.
    ///
    /// An empty `ignore` list compiles to no glob set at all.
    pub fn new(
        root: impl Into<PathBuf>,
        hidden: HiddenFilePolicy,
        ignore: &[String],
    ) -> Result<Self, globset::Error> {
        let ignore_set = if ignore.is_empty() {
            None
        } else {
            Some(build_globset(ignore)?)
        };

        Ok(Self {
            root: root.into(),
            hidden,
            ignore_set,
        })
    }

    /// Returns true if a change to `path` must not trigger a reload.
    pub fn is_ignorable(&self, path: &Path) -> bool {
        if self.hidden == HiddenFilePolicy::Ignore
            && base_name_starts_with(path, HiddenFilePolicy::MARKER)
        {
            return true;
        }

        if let Some(ignore) = &self.ignore_set {
            if let Some(rel) = relative_str(&self.root, path) {
                return ignore.is_match(&rel);
            }
        }

        false
    }
}

/// Build a GlobSet from simple string patterns.
fn build_globset(patterns: &[String]) -> Result<GlobSet, globset::Error> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        builder.add(Glob::new(pat)?);
    }
    builder.build()
}
