// src/serve/resolve.rs

use std::path::{Component, Path, PathBuf};

use percent_encoding::percent_decode_str;

use crate::config::ServeTarget;

/// File served for `/` and for paths ending in `/` on directory targets.
pub const INDEX_FILE: &str = "index.html";

/// Map a request path (as found in the URI, still percent-encoded) onto a
/// file under the serve target.
///
/// Returns `None` for paths that are not valid UTF-8 once decoded or that
/// try to leave the root (`..`, absolute or prefixed components).
pub fn resolve_request_path(target: &ServeTarget, url_path: &str) -> Option<PathBuf> {
    let decoded = percent_decode_str(url_path).decode_utf8().ok()?;
    let relative = decoded.trim_start_matches('/');

    if relative.is_empty() {
        return Some(match target {
            ServeTarget::Directory(root) => root.join(INDEX_FILE),
            ServeTarget::File { file, .. } => file.clone(),
        });
    }

    let mut path = target.root_dir().to_path_buf();
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => path.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    if relative.ends_with('/') {
        path.push(INDEX_FILE);
    }

    Some(path)
}
