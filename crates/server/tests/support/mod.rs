#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use configs::{CorsConfig, SameSitePolicy};
use serde_json::Value;
use tower::Service;

use server::routes;
use server::state::{ServerState, SessionCookie};
use service::auth::repository::mock::MockAuthRepository;
use service::auth::{AuthService, AuthSettings};
use service::blob::memory::MemoryBlobStore;
use service::product::repository::mock::MockProductRepository;
use service::product::ProductService;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "AdminPass1";
pub const USER_EMAIL: &str = "user@example.com";
pub const USER_PASSWORD: &str = "UserPass12";
pub const UPLOAD_LIMIT: usize = 64 * 1024;

const BOUNDARY: &str = "catalog-test-boundary";

pub struct TestApp {
    pub app: Router,
    pub blobs: Arc<MemoryBlobStore>,
}

/// Router over in-memory stores with one admin and one plain user.
pub async fn build_app() -> anyhow::Result<TestApp> {
    let blobs = Arc::new(MemoryBlobStore::new());
    let products = Arc::new(ProductService::new(Arc::new(MockProductRepository::default()), blobs.clone()));
    let auth = Arc::new(AuthService::new(
        Arc::new(MockAuthRepository::default()),
        AuthSettings { jwt_secret: "test-secret".into(), session_ttl_secs: 3600 },
    ));
    auth.ensure_user(ADMIN_EMAIL, ADMIN_PASSWORD, "admin").await?;
    auth.ensure_user(USER_EMAIL, USER_PASSWORD, "user").await?;

    let state = ServerState {
        products,
        auth,
        session: SessionCookie { name: "token".into(), ttl_secs: 3600, secure: false, same_site: SameSitePolicy::Lax },
        upload_limit: UPLOAD_LIMIT,
    };
    let app = routes::build_router(state, routes::build_cors(&CorsConfig::default())?);
    Ok(TestApp { app, blobs })
}

pub async fn send(app: &Router, req: Request<Body>) -> anyhow::Result<Response<Body>> {
    Ok(app.clone().call(req).await?)
}

pub async fn body_bytes(resp: Response<Body>) -> anyhow::Result<Vec<u8>> {
    Ok(axum::body::to_bytes(resp.into_body(), usize::MAX).await?.to_vec())
}

pub async fn body_json(resp: Response<Body>) -> anyhow::Result<Value> {
    Ok(serde_json::from_slice(&body_bytes(resp).await?)?)
}

/// Log in and return the `token=...` pair for a `Cookie` header.
pub async fn login(app: &Router, email: &str, password: &str) -> anyhow::Result<String> {
    let req = Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&serde_json::json!({"email": email, "password": password}))?))?;
    let resp = send(app, req).await?;
    let set_cookie = resp
        .headers()
        .get("set-cookie")
        .ok_or_else(|| anyhow::anyhow!("login did not set a cookie: {}", resp.status()))?
        .to_str()?;
    let pair = set_cookie.split(';').next().unwrap_or_default().to_string();
    Ok(pair)
}

pub struct FilePart<'a> {
    pub file_name: &'a str,
    pub content_type: &'a str,
    pub bytes: &'a [u8],
}

/// multipart/form-data body with text fields and an optional `image` file.
pub fn multipart(fields: &[(&str, &str)], file: Option<FilePart<'_>>) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes());
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    if let Some(f) = file {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"image\"; filename=\"{}\"\r\n", f.file_name).as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", f.content_type).as_bytes());
        body.extend_from_slice(f.bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    (format!("multipart/form-data; boundary={}", BOUNDARY), body)
}

pub fn product_fields<'a>(name: &'a str, category: &'a str) -> Vec<(&'a str, &'a str)> {
    vec![("name", name), ("price", "25000"), ("description", "Weekly sessions"), ("category", category)]
}

pub fn multipart_request(
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    fields: &[(&str, &str)],
    file: Option<FilePart<'_>>,
) -> anyhow::Result<Request<Body>> {
    let (content_type, body) = multipart(fields, file);
    let mut builder = Request::builder().method(method).uri(uri).header("content-type", content_type);
    if let Some(c) = cookie {
        builder = builder.header("cookie", c);
    }
    Ok(builder.body(Body::from(body))?)
}

pub fn empty_request(method: &str, uri: &str, cookie: Option<&str>) -> anyhow::Result<Request<Body>> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(c) = cookie {
        builder = builder.header("cookie", c);
    }
    Ok(builder.body(Body::empty())?)
}
