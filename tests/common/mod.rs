//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which builds a full [`AppContext`] over a
//! temporary image directory and a chosen item store, plus helpers for
//! building requests and reading bodies.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use itemshelf_core::config::{CategoryLayout, Config};
use itemshelf_db::pool::init_memory_pool;
use itemshelf_db::repository::{ItemRepository, JsonItemRepository, SqlItemRepository};
use itemshelf_server::context::AppContext;
use itemshelf_server::images::ImageStore;
use itemshelf_server::router::build_router;

pub const BOUNDARY: &str = "itemshelf-test-boundary";

/// Bytes that pass the JPEG magic check.
pub const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];

/// Item store flavors exercised by the HTTP tests.
#[derive(Debug, Clone, Copy)]
pub enum Backend {
    Json,
    Sqlite(CategoryLayout),
}

pub const ALL_BACKENDS: [Backend; 3] = [
    Backend::Json,
    Backend::Sqlite(CategoryLayout::Normalized),
    Backend::Sqlite(CategoryLayout::Denormalized),
];

/// Test harness wrapping a fully-constructed [`AppContext`].
pub struct TestHarness {
    pub ctx: AppContext,
    pub dir: tempfile::TempDir,
}

impl TestHarness {
    /// Harness over a fresh JSON item file.
    pub fn new() -> Self {
        Self::with_backend(Backend::Json)
    }

    pub fn with_backend(backend: Backend) -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");

        let mut config = Config::default();
        config.storage.items_json_path = dir.path().join("items.json");
        config.images.dir = dir.path().join("images");

        let items: Arc<dyn ItemRepository> = match backend {
            Backend::Json => {
                let repo = JsonItemRepository::new(config.storage.items_json_path.clone());
                repo.create_if_missing().expect("failed to seed item file");
                Arc::new(repo)
            }
            Backend::Sqlite(layout) => {
                let pool = init_memory_pool(layout).expect("failed to create in-memory pool");
                Arc::new(SqlItemRepository::new(pool, layout))
            }
        };

        let images = ImageStore::new(
            config.images.dir.clone(),
            config.images.default_image.clone(),
        );
        images.ensure_dir().expect("failed to create image dir");

        let ctx = AppContext {
            config: Arc::new(config),
            items,
            images: Arc::new(images),
        };

        Self { ctx, dir }
    }

    pub fn router(&self) -> Router {
        build_router(self.ctx.clone())
    }

    /// Send one request through a fresh router.
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router().oneshot(request).await.unwrap()
    }

    /// Write a placeholder image at the configured default path.
    pub fn write_default_image(&self, data: &[u8]) {
        std::fs::write(self.ctx.images.default_image_path(), data).unwrap();
    }
}

/// Build a multipart body from text fields and an optional file part.
pub fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, Option<&str>, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((name, file_name, data)) = file {
        let disposition = match file_name {
            Some(f) => format!("form-data; name=\"{name}\"; filename=\"{f}\""),
            None => format!("form-data; name=\"{name}\""),
        };
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: {disposition}\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn multipart_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/items")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub fn urlencoded_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/items")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Collect a response body into bytes.
pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
