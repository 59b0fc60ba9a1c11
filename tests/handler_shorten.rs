mod common;

use axum::http::StatusCode;
use quicklink::application::rate_limiter::RateLimitConfig;
use quicklink::domain::repositories::LinkRepository;
use serde_json::{Value, json};
use std::time::Duration;

#[tokio::test]
async fn test_shorten_creates_link_with_normalized_url() {
    let app = common::TestApp::new();

    let response = app
        .server
        .post("/api/shorten")
        .json(&json!({ "url": "example.com/a" }))
        .await;

    response.assert_status_ok();

    let body = response.json::<Value>();
    let slug = body["slug"].as_str().unwrap();

    assert_eq!(slug.len(), 6);
    assert!(slug.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_eq!(body["original_url"], "https://example.com/a");
    assert_eq!(body["short_url"], format!("{}/{}", common::BASE_URL, slug));
    assert_eq!(body["cached"], false);
    assert_eq!(body["source"], "created");
    assert!(body["id"].is_i64());
    assert!(body["created_at"].is_string());
}

#[tokio::test]
async fn test_shorten_same_url_twice_returns_same_slug() {
    let app = common::TestApp::new();

    let first = app
        .server
        .post("/api/shorten")
        .json(&json!({ "url": "example.com/a" }))
        .await
        .json::<Value>();

    let response = app
        .server
        .post("/api/shorten")
        .json(&json!({ "url": "https://example.com/a" }))
        .await;

    response.assert_status_ok();

    let second = response.json::<Value>();
    assert_eq!(second["slug"], first["slug"]);
    assert_eq!(second["cached"], true);
    assert_eq!(second["source"], "cache");
    assert!(second.get("id").is_none());
}

#[tokio::test]
async fn test_shorten_existing_link_from_store_populates_cache() {
    let app = common::TestApp::new();
    app.insert_link("stored", "https://example.com/stored").await;

    let response = app
        .server
        .post("/api/shorten")
        .json(&json!({ "url": "https://example.com/stored" }))
        .await;

    response.assert_status_ok();

    let body = response.json::<Value>();
    assert_eq!(body["slug"], "stored");
    assert_eq!(body["cached"], false);
    assert_eq!(body["source"], "store");
    assert_eq!(
        app.cache.peek_slug("https://example.com/stored").as_deref(),
        Some("stored")
    );
    assert_eq!(
        app.cache.peek_url("stored").as_deref(),
        Some("https://example.com/stored")
    );
}

#[tokio::test]
async fn test_shorten_empty_url() {
    let app = common::TestApp::new();

    for payload in [json!({ "url": "" }), json!({ "url": "   " }), json!({})] {
        let response = app.server.post("/api/shorten").json(&payload).await;

        response.assert_status_bad_request();

        let body = response.json::<Value>();
        assert_eq!(body["error"]["code"], "validation_error");
        assert_eq!(body["error"]["message"], "URL is required");
    }
}

#[tokio::test]
async fn test_shorten_rejects_invalid_urls() {
    let app = common::TestApp::new();

    for url in ["ftp://example.com/file", "https://", "http:// spaced .com"] {
        let response = app
            .server
            .post("/api/shorten")
            .json(&json!({ "url": url }))
            .await;

        response.assert_status_bad_request();
        assert_eq!(
            response.json::<Value>()["error"]["code"],
            "validation_error",
            "{url}"
        );
    }

    assert_eq!(app.repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_shorten_rejects_control_characters() {
    let app = common::TestApp::new();

    for url in ["example.com/a\nb", "https://example.com/\r\nx"] {
        let response = app
            .server
            .post("/api/shorten")
            .json(&json!({ "url": url }))
            .await;

        response.assert_status_bad_request();

        let body = response.json::<Value>();
        assert_eq!(body["error"]["code"], "validation_error", "{url:?}");
        assert_eq!(body["error"]["message"], "Invalid URL format", "{url:?}");
    }

    assert_eq!(app.repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_shorten_malformed_json() {
    let app = common::TestApp::new();

    let response = app
        .server
        .post("/api/shorten")
        .text("{\"url\": ")
        .content_type("application/json")
        .await;

    response.assert_status_bad_request();
    assert_eq!(
        response.json::<Value>()["error"]["code"],
        "validation_error"
    );
}

#[tokio::test]
async fn test_sixth_creation_in_window_is_rate_limited() {
    let app = common::TestApp::new();

    for i in 0..5 {
        let response = app
            .server
            .post("/api/shorten")
            .json(&json!({ "url": format!("example.com/{i}") }))
            .await;
        response.assert_status_ok();
    }

    let response = app
        .server
        .post("/api/shorten")
        .json(&json!({ "url": "example.com/6" }))
        .await;

    response.assert_status(StatusCode::TOO_MANY_REQUESTS);

    let retry_after: u64 = response
        .header("retry-after")
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!((1..=10).contains(&retry_after));

    let body = response.json::<Value>();
    assert_eq!(body["error"]["code"], "rate_limited");
}

#[tokio::test]
async fn test_rate_limit_counts_hits_and_rejects_before_validation() {
    let app = common::TestApp::with_rate_limit(RateLimitConfig::new(2, Duration::from_secs(60)));

    app.server
        .post("/api/shorten")
        .json(&json!({ "url": "example.com" }))
        .await
        .assert_status_ok();
    app.server
        .post("/api/shorten")
        .json(&json!({ "url": "example.com" }))
        .await
        .assert_status_ok();

    // Window is full, so even an invalid body gets 429.
    app.server
        .post("/api/shorten")
        .json(&json!({ "url": "" }))
        .await
        .assert_status(StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_rate_limit_does_not_apply_to_reads() {
    let app = common::TestApp::with_rate_limit(RateLimitConfig::new(1, Duration::from_secs(60)));

    let slug = app
        .server
        .post("/api/shorten")
        .json(&json!({ "url": "example.com/read" }))
        .await
        .json::<Value>()["slug"]
        .as_str()
        .unwrap()
        .to_string();

    for _ in 0..10 {
        app.server
            .get(&format!("/{slug}"))
            .await
            .assert_status(StatusCode::TEMPORARY_REDIRECT);
        app.server.get("/api/urls").await.assert_status_ok();
    }
}
