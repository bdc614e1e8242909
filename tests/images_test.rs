//! Integration tests for image serving.

mod common;

use axum::http::{header, StatusCode};
use common::{body_bytes, get, multipart_body, multipart_request, TestHarness, JPEG_BYTES};

#[tokio::test]
async fn serves_stored_image() {
    let h = TestHarness::new();
    let body = multipart_body(
        &[("name", "jacket"), ("category", "fashion")],
        Some(("image", Some("jacket.jpg"), JPEG_BYTES)),
    );
    let json = common::body_json(h.send(multipart_request(body)).await).await;
    let image_name = json["item"]["image_name"].as_str().unwrap().to_string();

    let resp = h.send(get(&format!("/images/{image_name}"))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::CONTENT_TYPE], "image/jpeg");
    assert_eq!(body_bytes(resp).await, JPEG_BYTES);
}

#[tokio::test]
async fn missing_image_falls_back_to_default() {
    let h = TestHarness::new();
    h.write_default_image(b"placeholder");

    let resp = h.send(get("/images/absent.jpg")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::CONTENT_TYPE], "image/jpeg");
    assert_eq!(body_bytes(resp).await, b"placeholder");

    let resp = h.send(get("/images/absent.jpeg")).await;
    assert_eq!(body_bytes(resp).await, b"placeholder");
}

#[tokio::test]
async fn missing_default_image_is_not_found() {
    let h = TestHarness::new();
    let resp = h.send(get("/images/absent.jpg")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn traversal_is_rejected() {
    let h = TestHarness::new();
    std::fs::write(h.dir.path().join("secret.jpg"), b"secret").unwrap();

    let resp = h.send(get("/images/..%2Fsecret.jpg")).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn other_suffixes_are_rejected() {
    let h = TestHarness::new();
    h.write_default_image(b"placeholder");

    for name in ["photo.png", "photo.gif", "photo", "photo.JPG", "photo.Jpeg"] {
        let resp = h.send(get(&format!("/images/{name}"))).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{name}");
    }
}
