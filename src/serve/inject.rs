// src/serve/inject.rs

//! Reload script injection.
//!
//! The insertion point is found with a plain case-insensitive search, not an
//! HTML parser: a closing tag inside a comment or a script string will be
//! picked if it comes first.

use std::sync::LazyLock;

use regex::bytes::Regex;

/// Script spliced into every HTML response. It long-polls `/notification`
/// and reloads the page on 200.
pub const RELOAD_SCRIPT: &str = include_str!("reload.html");

static BODY_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</body[ \t\n]*>").expect("static regex"));
static HTML_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</html[ \t\n]*>").expect("static regex"));

/// Byte offset at which to insert the reload script.
///
/// First `</body>`, else first `</html>`, else the end of the document.
pub fn injection_point(content: &[u8]) -> usize {
    BODY_CLOSE
        .find(content)
        .or_else(|| HTML_CLOSE.find(content))
        .map(|m| m.start())
        .unwrap_or(content.len())
}

/// Copy `content` with the reload script spliced in at [`injection_point`].
pub fn inject_reload_script(content: &[u8]) -> Vec<u8> {
    let at = injection_point(content);
    let mut out = Vec::with_capacity(content.len() + RELOAD_SCRIPT.len());
    out.extend_from_slice(&content[..at]);
    out.extend_from_slice(RELOAD_SCRIPT.as_bytes());
    out.extend_from_slice(&content[at..]);
    out
}
