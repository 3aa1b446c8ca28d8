#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Once;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

use catalogue_api::{app, auth, database, AppState};

pub const TEST_SECRET: &str = "catalogue-test-secret";
pub const BOUNDARY: &str = "catalogue-test-boundary";

static INIT: Once = Once::new();

/// Point the lazy config singleton at test-friendly values before anything
/// touches it. Safe to call from every test.
pub fn setup() {
    INIT.call_once(|| {
        if std::env::var("JWT_SECRET").is_err() {
            std::env::set_var("JWT_SECRET", TEST_SECRET);
        }
        if std::env::var("UPLOAD_DIR").is_err() {
            let dir = std::env::temp_dir().join(format!("catalogue-uploads-{}", std::process::id()));
            std::env::set_var("UPLOAD_DIR", &dir);
        }
    });
}

pub fn upload_dir() -> PathBuf {
    setup();
    PathBuf::from(&catalogue_api::config::config().upload_dir)
}

/// App over a lazy pool: auth and input-validation paths can be exercised
/// without a running database, since they reject before any query runs.
pub fn test_app() -> Router {
    setup();
    let url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "postgres://localhost/catalogue_test".to_string());
    let pool = PgPoolOptions::new().connect_lazy(&url).expect("lazy pool");
    app(AppState { pool })
}

/// App over a live database, with the schema migrated. Returns None when
/// DATABASE_URL is unset so the CRUD suite degrades to a no-op.
pub async fn db_app() -> Option<Router> {
    setup();
    let url = std::env::var("DATABASE_URL").ok()?;
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("failed to connect to DATABASE_URL");
    database::migrate(&pool).await.expect("migration failed");
    Some(app(AppState { pool }))
}

pub fn token_for(role: &str) -> String {
    setup();
    let claims = auth::Claims::new("user-1".to_string(), role.to_string());
    auth::generate_token(&claims).expect("token generation")
}

pub fn admin_token() -> String {
    token_for(auth::ROLE_ADMIN)
}

pub fn client_token() -> String {
    token_for(auth::ROLE_CLIENT)
}

/// Hand-rolled multipart body matching what a browser form submit sends.
pub fn multipart_body(fields: &[(&str, &str)], image: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }

    if let Some((filename, bytes)) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={BOUNDARY}")
}

/// Drive one request through the router and return status plus parsed body
/// (204 and other empty bodies come back as JSON null).
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.expect("request failed");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body read failed")
        .to_bytes();

    let value = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };

    (status, value)
}

pub fn get(path: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(path)
        .body(Body::empty())
        .unwrap()
}

pub fn delete(path: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(path)
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

pub fn post_form(
    path: &str,
    token: &str,
    fields: &[(&str, &str)],
    image: Option<(&str, &[u8])>,
) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header("Authorization", format!("Bearer {token}"))
        .header("Content-Type", multipart_content_type())
        .body(Body::from(multipart_body(fields, image)))
        .unwrap()
}

pub fn put_form(
    path: &str,
    token: &str,
    fields: &[(&str, &str)],
    image: Option<(&str, &[u8])>,
) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(path)
        .header("Authorization", format!("Bearer {token}"))
        .header("Content-Type", multipart_content_type())
        .body(Body::from(multipart_body(fields, image)))
        .unwrap()
}

/// Unique product name per test run so suites can rerun against a
/// persistent database.
pub fn unique_name(prefix: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{prefix}-{nanos}")
}
