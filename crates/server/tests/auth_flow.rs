mod support;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;

use support::*;

#[tokio::test]
async fn login_sets_session_cookie_and_check_echoes_identity() -> anyhow::Result<()> {
    let t = build_app().await?;
    let req = Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&json!({"email": ADMIN_EMAIL, "password": ADMIN_PASSWORD}))?))?;
    let resp = send(&t.app, req).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let set_cookie = resp.headers().get("set-cookie").expect("cookie").to_str()?.to_string();
    assert!(set_cookie.starts_with("token="));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("Max-Age=3600"));
    assert!(set_cookie.contains("SameSite=Lax"));
    assert_eq!(body_json(resp).await?["message"], "Login successful");

    let cookie = set_cookie.split(';').next().unwrap_or_default().to_string();
    let resp = send(&t.app, empty_request("GET", "/auth/check", Some(&cookie))?).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await?;
    assert_eq!(body["message"], "Authenticated");
    assert_eq!(body["user"]["role"], "admin");
    assert!(body["user"]["id"].is_string());
    assert!(body["user"]["exp"].is_i64());
    Ok(())
}

#[tokio::test]
async fn wrong_password_is_rejected_without_cookie() -> anyhow::Result<()> {
    let t = build_app().await?;
    let req = Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&json!({"email": ADMIN_EMAIL, "password": "nope"}))?))?;
    let resp = send(&t.app, req).await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().get("set-cookie").is_none());
    assert_eq!(body_json(resp).await?["message"], "Invalid credentials");
    Ok(())
}

#[tokio::test]
async fn check_distinguishes_missing_and_invalid_tokens() -> anyhow::Result<()> {
    let t = build_app().await?;
    let resp = send(&t.app, empty_request("GET", "/auth/check", None)?).await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(resp).await?["message"], "Unauthorized");

    let resp = send(&t.app, empty_request("GET", "/auth/check", Some("token=garbage"))?).await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(resp).await?["message"], "Invalid token");
    Ok(())
}

#[tokio::test]
async fn logout_clears_cookie() -> anyhow::Result<()> {
    let t = build_app().await?;
    let cookie = login(&t.app, ADMIN_EMAIL, ADMIN_PASSWORD).await?;
    let resp = send(&t.app, empty_request("POST", "/auth/logout", Some(&cookie))?).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let set_cookie = resp.headers().get("set-cookie").expect("removal cookie").to_str()?.to_string();
    assert!(set_cookie.starts_with("token=;"));
    assert!(set_cookie.contains("Max-Age=0"));
    assert_eq!(body_json(resp).await?["message"], "Logout successful");
    Ok(())
}

#[tokio::test]
async fn mutating_endpoints_require_admin_session() -> anyhow::Result<()> {
    let t = build_app().await?;
    let user_cookie = login(&t.app, USER_EMAIL, USER_PASSWORD).await?;
    let id = uuid_like();

    let fields = product_fields("Algebra", "Grammar");
    let cases = [("POST", "/products".to_string()), ("PUT", format!("/products/{}", id))];
    for (method, uri) in &cases {
        let resp = send(&t.app, multipart_request(method, uri, None, &fields, None)?).await?;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{} {}", method, uri);
        let resp = send(&t.app, multipart_request(method, uri, Some(&user_cookie), &fields, None)?).await?;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN, "{} {}", method, uri);
        assert_eq!(body_json(resp).await?["message"], "Admin access only");
    }

    let others = [("DELETE", format!("/products/{}", id)), ("GET", "/products/admin".to_string())];
    for (method, uri) in &others {
        let resp = send(&t.app, empty_request(method, uri, None)?).await?;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{} {}", method, uri);
        let resp = send(&t.app, empty_request(method, uri, Some(&user_cookie))?).await?;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN, "{} {}", method, uri);
    }
    assert!(t.blobs.is_empty().await);
    Ok(())
}

#[tokio::test]
async fn health_and_openapi_are_public() -> anyhow::Result<()> {
    let t = build_app().await?;
    let resp = send(&t.app, empty_request("GET", "/health", None)?).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await?["status"], "ok");

    let resp = send(&t.app, empty_request("GET", "/api-docs/openapi.json", None)?).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let doc = body_json(resp).await?;
    assert!(doc["paths"]["/products/{id}"].is_object());
    assert!(doc["paths"]["/auth/login"].is_object());
    Ok(())
}

fn uuid_like() -> &'static str {
    "0b5f3a4e-8d2c-4c1e-9a77-2f6d1c0e9b13"
}
