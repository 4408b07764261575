// src/serve/content.rs

//! Static content serving.
//!
//! Files are read fresh on every request. HTML responses get the reload
//! script spliced in; everything else is handed to [`ServeFile`], which
//! answers conditional and `Range` requests (media seeking) itself.

use std::path::Path;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tracing::{debug, error, warn};

use super::inject::{inject_reload_script, RELOAD_SCRIPT};
use super::resolve::resolve_request_path;
use super::state::AppState;

/// Serve the file a request path resolves to.
pub(crate) async fn serve_content(State(state): State<Arc<AppState>>, request: Request) -> Response {
    let url_path = request.uri().path().to_owned();

    let Some(path) = resolve_request_path(&state.target, &url_path) else {
        warn!(url = %url_path, "rejecting unresolvable request path");
        return not_found(&format!("invalid path {url_path:?}"));
    };

    let fs = Arc::clone(&state.fs);
    let read_path = path.clone();
    let content = match tokio::task::spawn_blocking(move || fs.read(&read_path)).await {
        Ok(Ok(content)) => content,
        Ok(Err(err)) => {
            let message = format!("{err:#}");
            warn!(?path, error = %message, "cannot read requested file");
            return not_found(&message);
        }
        Err(err) => {
            error!(?path, error = %err, "file read task failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response();
        }
    };

    if is_html(&path, &content) {
        debug!(?path, bytes = content.len(), "serving html");
        return (
            [(header::CONTENT_TYPE, "text/html")],
            inject_reload_script(&content),
        )
            .into_response();
    }

    debug!(?path, bytes = content.len(), "serving blob");
    match ServeFile::new(&path).oneshot(request).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}

/// 404 with the error text, followed by the reload script so that the page
/// reloads once the missing file appears.
fn not_found(message: &str) -> Response {
    let mut body = escape_html(message);
    body.push_str(RELOAD_SCRIPT);
    (
        StatusCode::NOT_FOUND,
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        body,
    )
        .into_response()
}

/// A response is HTML if its file has an `.html`/`.htm` extension or its
/// bytes sniff as HTML.
pub fn is_html(path: &Path, content: &[u8]) -> bool {
    let by_extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm"))
        .unwrap_or(false);

    by_extension || sniff_html(content)
}

/// Tag signatures that mark a document as HTML when they open it.
const HTML_SIGNATURES: &[&[u8]] = &[
    b"<!DOCTYPE HTML",
    b"<HTML",
    b"<HEAD",
    b"<SCRIPT",
    b"<IFRAME",
    b"<H1",
    b"<DIV",
    b"<FONT",
    b"<TABLE",
    b"<A",
    b"<STYLE",
    b"<TITLE",
    b"<B",
    b"<BODY",
    b"<BR",
    b"<P",
    b"<!--",
];

/// How much of a document is looked at when sniffing.
const SNIFF_LEN: usize = 512;

/// Content sniffing for HTML: skip leading whitespace, then look for a known
/// tag signature (case-insensitive) followed by a space or `>`.
pub fn sniff_html(content: &[u8]) -> bool {
    let head = &content[..content.len().min(SNIFF_LEN)];
    let start = head
        .iter()
        .position(|b| !matches!(b, b'\t' | b'\n' | 0x0c | b'\r' | b' '))
        .unwrap_or(head.len());
    let head = &head[start..];

    HTML_SIGNATURES.iter().any(|sig| {
        head.len() > sig.len()
            && head[..sig.len()].eq_ignore_ascii_case(sig)
            && matches!(head[sig.len()], b' ' | b'>')
    })
}

/// Escape text for inclusion in an HTML body.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_extension_wins_regardless_of_content() {
        assert!(is_html(Path::new("/site/page.HTML"), b"plain text"));
        assert!(is_html(Path::new("/site/old.htm"), b""));
    }

    #[test]
    fn sniffs_html_without_extension() {
        assert!(is_html(Path::new("/site/page"), b"  \n<!doctype html>\n<p>x"));
        assert!(sniff_html(b"<html lang=\"en\">"));
        assert!(sniff_html(b"<!-- comment -->"));
        assert!(sniff_html(b"<p>para"));
    }

    #[test]
    fn non_html_is_not_sniffed() {
        assert!(!is_html(Path::new("/site/app.js"), b"console.log('<html>')"));
        assert!(!sniff_html(b"<htmlx>"));
        assert!(!sniff_html(b"<html"));
        assert!(!sniff_html(b"{\"a\": 1}"));
        assert!(!sniff_html(b""));
    }

    #[test]
    fn escapes_markup_in_error_text() {
        assert_eq!(
            escape_html(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&#34;x&#34;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
    }
}
