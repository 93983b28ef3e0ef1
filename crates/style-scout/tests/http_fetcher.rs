//! End-to-end tests of the reqwest-backed fetcher against a mock server.

use std::time::Duration;

use style_scout::*;
use wiremock::matchers::{header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// `set_body_string` forces `text/plain`, so bodies go through `set_body_raw`.
fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/html; charset=utf-8")
}

fn css(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/css")
}

#[tokio::test]
async fn analyzes_page_with_linked_stylesheet() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(header_exists("user-agent"))
        .respond_with(html(
            r#"<html><head>
                <link rel="stylesheet" href="/assets/main.css">
                <link href="https://fonts.googleapis.com/css2?family=Work+Sans:wght@400" rel="preconnect">
            </head><body></body></html>"#,
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/assets/main.css"))
        .respond_with(css(
            "body{background-color:#fafafa;color:#1c1c1c;font-family:\"Work Sans\",sans-serif} h1{font-size:clamp(2rem,4vw,3rem)} .cta{color:#e63946}",
        ))
        .mount(&server)
        .await;

    let analyzer = Analyzer::with_http(AnalyzerConfig::default());
    let profile = analyzer.analyze(&format!("{}/", server.uri())).await;

    assert!(profile.error.is_none(), "unexpected error: {:?}", profile.error);
    assert_eq!(profile.colors, vec!["#fafafa", "#1c1c1c", "#e63946"]);
    assert_eq!(profile.labeled_colors.text.as_deref(), Some("#1c1c1c"));
    assert_eq!(profile.labeled_colors.accent.as_deref(), Some("#e63946"));
    assert_eq!(profile.fonts, vec!["Work Sans"]);
    assert_eq!(profile.font_sizes.h1.as_deref(), Some("clamp(2rem,4vw,3rem)"));
}

#[tokio::test]
async fn http_error_surfaces_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let analyzer = Analyzer::with_http(AnalyzerConfig::default());
    let profile = analyzer.analyze(&server.uri()).await;

    assert_eq!(profile.error.as_deref(), Some("HTTP 503"));
    assert!(profile.colors.is_empty());
}

#[tokio::test]
async fn page_timeout_is_a_fetch_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(html("<p>slow</p>").set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let config = AnalyzerConfig {
        page_timeout: Duration::from_millis(200),
        ..AnalyzerConfig::default()
    };
    let profile = Analyzer::with_http(config).analyze(&server.uri()).await;

    assert_eq!(profile.error.as_deref(), Some("Fetch failed: request timed out"));
}

#[tokio::test]
async fn slow_stylesheet_is_skipped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<link rel="stylesheet" href="/slow.css"><style>a{color:#336699}</style>"#,
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/slow.css"))
        .respond_with(css("a{color:#ff0000}").set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let config = AnalyzerConfig {
        stylesheet_timeout: Duration::from_millis(200),
        ..AnalyzerConfig::default()
    };
    let profile = Analyzer::with_http(config).analyze(&server.uri()).await;

    assert!(profile.error.is_none());
    assert_eq!(profile.colors, vec!["#336699"]);
}

#[tokio::test]
async fn redirect_cap_is_enforced() {
    let server = MockServer::start().await;
    for hop in 0..5 {
        Mock::given(method("GET"))
            .and(path(format!("/hop{hop}")))
            .respond_with(
                ResponseTemplate::new(302).insert_header("location", format!("/hop{}", hop + 1).as_str()),
            )
            .mount(&server)
            .await;
    }

    let fetcher = HttpFetcher::new();
    let options = FetchOptions {
        timeout: Duration::from_secs(5),
        max_redirects: 2,
        headers: Vec::new(),
        max_body_bytes: None,
    };
    let result = fetcher.fetch(&format!("{}/hop0", server.uri()), &options).await;

    assert_eq!(result.unwrap_err(), FetchError::TooManyRedirects);
}

#[tokio::test]
async fn body_reading_stops_at_cap() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(css(&"x".repeat(10_000)))
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new();
    let options = FetchOptions {
        timeout: Duration::from_secs(5),
        max_redirects: 0,
        headers: vec![("Accept".to_string(), "text/css".to_string())],
        max_body_bytes: Some(1_000),
    };
    let resp = fetcher.fetch(&server.uri(), &options).await.unwrap();

    assert_eq!(resp.status, 200);
    assert_eq!(resp.body.len(), 1_000);
    assert_eq!(resp.content_type(), Some("text/css"));
}
