// tests/http_endpoints.rs

use reloader_test_utils::builders::{SiteBuilder, TestSite};
use reloader_test_utils::init_tracing;

use std::error::Error;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use tokio::time::{sleep, Duration, Instant};
use tower::ServiceExt;

use reloader::serve::RELOAD_SCRIPT;

type TestResult = Result<(), Box<dyn Error>>;

const INDEX: &str = "<html><head><title>t</title></head><body><h1>Hi</h1></body></html>";

fn site() -> SiteBuilder {
    SiteBuilder::new()
        .with_file("index.html", INDEX)
        .with_file("css/main.css", "body { color: red }")
        .with_file("notes.txt", "<p>looks like html</p>")
}

async fn get(site: &TestSite, uri: &str) -> Result<Response, Box<dyn Error>> {
    let request = Request::builder().uri(uri).body(Body::empty())?;
    Ok(site.router.clone().oneshot(request).await?)
}

async fn body_string(response: Response) -> Result<String, Box<dyn Error>> {
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    Ok(String::from_utf8(bytes.to_vec())?)
}

fn content_type(response: &Response) -> &str {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

#[tokio::test]
async fn root_serves_index_with_script_before_body_close() -> TestResult {
    init_tracing();
    let site = site().build();

    let response = get(&site, "/").await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(content_type(&response), "text/html");

    let body = body_string(response).await?;
    let expected = INDEX.replace("</body>", &format!("{RELOAD_SCRIPT}</body>"));
    assert_eq!(body, expected);
    Ok(())
}

#[tokio::test]
async fn non_html_is_served_verbatim_with_guessed_type() -> TestResult {
    init_tracing();
    let site = site().build();

    let response = get(&site, "/css/main.css").await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(content_type(&response), "text/css");
    assert_eq!(body_string(response).await?, "body { color: red }");
    Ok(())
}

#[tokio::test]
async fn byte_ranges_are_honoured_for_media() -> TestResult {
    init_tracing();
    let clip: Vec<u8> = (0..1000u32).map(|i| (i % 251) as u8).collect();
    let site = site().with_file("media/clip.bin", &clip).build();

    let request = Request::builder()
        .uri("/media/clip.bin")
        .header(header::RANGE, "bytes=0-9")
        .body(Body::empty())?;
    let response = site.router.clone().oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(
        response.headers().get(header::CONTENT_RANGE).map(|v| v.to_str()).transpose()?,
        Some("bytes 0-9/1000")
    );
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    assert_eq!(bytes.as_ref(), &clip[..10]);
    Ok(())
}

#[tokio::test]
async fn sniffed_html_gets_script_even_without_html_extension() -> TestResult {
    init_tracing();
    let site = site().build();

    let response = get(&site, "/notes.txt").await?;
    assert_eq!(content_type(&response), "text/html");
    let body = body_string(response).await?;
    assert!(body.starts_with("<p>looks like html</p><script>"));
    Ok(())
}

#[tokio::test]
async fn missing_file_is_404_with_error_text_and_script() -> TestResult {
    init_tracing();
    let site = site().build();

    let response = get(&site, "/nope.html").await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(content_type(&response), "text/html; charset=utf-8");

    let body = body_string(response).await?;
    assert!(body.contains("nope.html"));
    assert!(body.to_lowercase().contains("no such file"));
    assert!(body.ends_with(RELOAD_SCRIPT));
    Ok(())
}

#[tokio::test]
async fn paths_escaping_the_root_are_404() -> TestResult {
    init_tracing();
    let site = site().build();
    site.write("../secret.txt", "top secret contents");

    let response = get(&site, "/%2e%2e/secret.txt").await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(!body_string(response).await?.contains("top secret contents"));
    Ok(())
}

#[tokio::test]
async fn single_file_target_serves_file_at_root() -> TestResult {
    init_tracing();
    let site = site()
        .with_file("page.html", "<body>page</body>")
        .single_file("page.html")
        .build();

    let body = body_string(get(&site, "/").await?).await?;
    assert!(body.starts_with("<body>page<script>"));

    let response = get(&site, "/css/main.css").await?;
    assert_eq!(response.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn content_is_read_fresh_on_each_request() -> TestResult {
    init_tracing();
    let site = site().build();

    site.write("css/main.css", "body { color: blue }");
    let body = body_string(get(&site, "/css/main.css").await?).await?;
    assert_eq!(body, "body { color: blue }");
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn notification_answers_200_after_debounced_change() -> TestResult {
    init_tracing();
    let site = site().build();

    let router = site.router.clone();
    let held = tokio::spawn(async move {
        let request = Request::builder()
            .uri("/notification")
            .body(Body::empty())
            .expect("request");
        let response = router.oneshot(request).await.expect("infallible");
        (response.status(), Instant::now())
    });
    sleep(Duration::from_millis(1)).await;

    let touched = Instant::now();
    site.touch("css/main.css", "body { color: green }");
    sleep(Duration::from_millis(50)).await;
    let second = Instant::now();
    site.touch("index.html", INDEX);

    let (status, at) = held.await?;
    assert_eq!(status, StatusCode::OK);
    assert!(at - touched >= Duration::from_millis(300));
    assert!(at - second >= Duration::from_millis(250));
    assert!(at - second < Duration::from_millis(300));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn notification_answers_408_after_poll_timeout() -> TestResult {
    init_tracing();
    let site = site().build();

    let started = Instant::now();
    let response = get(&site, "/notification").await?;
    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    assert!(Instant::now() - started >= Duration::from_secs(60));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn ignored_changes_do_not_resolve_notification() -> TestResult {
    init_tracing();
    let site = site()
        .poll_timeout(Duration::from_secs(2))
        .ignore("build/**")
        .build();

    let router = site.router.clone();
    let held = tokio::spawn(async move {
        let request = Request::builder()
            .uri("/notification")
            .body(Body::empty())
            .expect("request");
        router.oneshot(request).await.expect("infallible").status()
    });
    sleep(Duration::from_millis(1)).await;

    site.notify(".index.html.swp");
    site.notify("build/bundle.js");

    assert_eq!(held.await?, StatusCode::REQUEST_TIMEOUT);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn notification_after_shutdown_is_503() -> TestResult {
    init_tracing();
    let site = site().build();
    site.coordinator.shutdown();

    let response = get(&site, "/notification").await?;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    Ok(())
}
