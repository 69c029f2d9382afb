//! Gallery listing and media serving tests

mod common;

use axum::http::{header, StatusCode};
use chrono::{Duration, TimeZone, Utc};
use common::*;

#[tokio::test]
async fn test_health() {
    let harness = TestHarness::new();
    let response = harness.send(get("/health")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_gallery_empty() {
    let harness = TestHarness::new();

    let response = harness.send(get("/gallery/")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/html"));

    let html = body_string(response).await;
    assert!(html.contains("The gallery is empty."));
    assert!(!html.contains("class=\"image-card\""));
}

#[tokio::test]
async fn test_gallery_lists_newest_first() {
    let harness = TestHarness::new();
    let base = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();

    // Inserted out of chronological order
    harness.seed("bravo.jpg", b"b", base + Duration::hours(1));
    harness.seed("charlie.jpg", b"c", base + Duration::hours(2));
    harness.seed("alpha.jpg", b"a", base);

    let html = body_string(harness.send(get("/gallery/")).await).await;
    assert!(html.contains("3 image(s)"));
    assert_eq!(html.matches("class=\"image-card\"").count(), 3);

    let charlie = html.find("charlie.jpg").unwrap();
    let bravo = html.find("bravo.jpg").unwrap();
    let alpha = html.find("alpha.jpg").unwrap();
    assert!(charlie < bravo);
    assert!(bravo < alpha);
}

#[tokio::test]
async fn test_gallery_lists_every_image() {
    let harness = TestHarness::new();
    let base = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
    for i in 0..10 {
        harness.seed(&format!("photo{i:02}.png"), b"p", base + Duration::seconds(i));
    }

    let html = body_string(harness.send(get("/gallery/")).await).await;
    assert_eq!(html.matches("class=\"image-card\"").count(), 10);
    assert!(html.contains("10 image(s)"));
}

#[tokio::test]
async fn test_gallery_shows_delete_forms_and_media_urls() {
    let harness = TestHarness::new();
    let image = harness.seed("tree.jpg", b"tree", Utc::now());

    let html = body_string(harness.send(get("/gallery/")).await).await;
    assert!(html.contains(&format!("action=\"/delete/{}/\"", image.id)));
    assert!(html.contains(&format!("src=\"/media/{}\"", image.path)));
    assert!(html.contains("4 B"));
}

#[tokio::test]
async fn test_gallery_escapes_names() {
    let harness = TestHarness::new();
    harness.seed("<script>alert(1)</script>.jpg", b"x", Utc::now());

    let html = body_string(harness.send(get("/gallery/")).await).await;
    assert!(!html.contains("<script>alert(1)</script>"));
    assert!(html.contains("&lt;script&gt;"));
}

#[tokio::test]
async fn test_media_serves_stored_file() {
    let harness = TestHarness::new();
    let image = harness.seed("served.png", b"PNG fake", Utc::now());

    let response = harness.send(get(&format!("/media/{}", image.path))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "image/png"
    );
    let bytes = body_string(response).await;
    assert_eq!(bytes, "PNG fake");
}

#[tokio::test]
async fn test_media_missing_file() {
    let harness = TestHarness::new();
    let response = harness.send(get("/media/images/nope.jpg")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
