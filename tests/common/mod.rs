//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which creates a temporary data directory, a
//! file-backed SQLite pool inside it and a full [`AppContext`]. Requests are
//! driven through the router with `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use chrono::{DateTime, Utc};
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use pictura::config::Config;
use pictura::server::flash::{self, FlashMessage, FLASH_COOKIE_NAME};
use pictura::server::{create_router, AppContext};
use pictura_db::models::{Image, NewImage};
use pictura_db::pool::{init_pool, DbPool};
use pictura_db::queries::images;

pub const BOUNDARY: &str = "----picturaTestBoundary7MA4YWxkTrZu0gW";

/// Test harness wrapping a fully-constructed [`AppContext`].
pub struct TestHarness {
    pub ctx: AppContext,
    pub db: DbPool,
    pub dir: TempDir,
}

impl TestHarness {
    /// Create a new harness with default configuration.
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    /// Create a new harness, letting the caller adjust the configuration.
    ///
    /// `storage.data_dir` always points at the harness's temp directory.
    pub fn with_config(adjust: impl FnOnce(&mut Config)) -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");

        let mut config = Config::default();
        config.storage.data_dir = dir.path().to_path_buf();
        adjust(&mut config);

        std::fs::create_dir_all(config.storage.media_root_path())
            .expect("failed to create media root");
        let db_path = config.storage.database_path();
        let db = init_pool(&db_path.to_string_lossy()).expect("failed to create pool");
        let ctx = AppContext::new(config, db.clone()).expect("failed to build context");

        Self { ctx, db, dir }
    }

    pub fn router(&self) -> Router {
        create_router(self.ctx.clone())
    }

    /// Send a single request through a fresh router.
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    /// Get a database connection from the pool.
    pub fn conn(&self) -> pictura_db::pool::PooledConnection {
        pictura_db::pool::get_conn(&self.db).expect("failed to get db connection")
    }

    pub fn count(&self) -> u64 {
        images::count_images(&self.conn()).expect("failed to count images")
    }

    pub fn all_images(&self) -> Vec<Image> {
        images::list_images(&self.conn()).expect("failed to list images")
    }

    /// Store a file and insert its record with an explicit creation time.
    pub fn seed(&self, name: &str, data: &[u8], created_at: DateTime<Utc>) -> Image {
        let stored = self
            .ctx
            .images
            .storage()
            .store(name, data)
            .expect("failed to store seed file");
        let record = NewImage {
            name: name.to_string(),
            path: stored.path,
            size: stored.size,
        };
        images::insert_image_at(&self.conn(), &record, created_at).expect("failed to seed image")
    }

    /// Whether a record's file exists under the media root.
    pub fn file_exists(&self, image: &Image) -> bool {
        self.ctx.images.storage().full_path(&image.path).exists()
    }
}

/// Build a `multipart/form-data` body.
///
/// `file` is `(field, file_name, bytes)`; `fields` are plain text fields.
pub fn multipart_body(file: Option<(&str, &str, &[u8])>, fields: &[(&str, &str)]) -> Vec<u8> {
    let mut body = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }

    if let Some((field, file_name, data)) = file {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// POST a multipart body to `uri`.
pub fn multipart_request(uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// GET `uri` sending the given `Cookie` header.
pub fn get_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

pub fn request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Helper to get response body as string
pub async fn body_string(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// The `name=value` pair of the flash cookie set by a response, if any.
pub fn flash_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter(|v| v.starts_with(&format!("{FLASH_COOKIE_NAME}=")))
        .map(|v| v.split(';').next().unwrap_or_default().to_string())
        .next()
}

/// Flash messages carried by the cookie a response sets.
pub fn flash_messages(response: &Response<Body>) -> Vec<FlashMessage> {
    flash_cookie(response)
        .and_then(|pair| {
            let value = pair.split_once('=').map(|(_, v)| v.to_string())?;
            flash::decode(&value)
        })
        .unwrap_or_default()
}

/// Value of the `Location` header.
pub fn location(response: &Response<Body>) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}
