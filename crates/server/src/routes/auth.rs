use axum::{
    extract::{rejection::JsonRejection, Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
    Extension, Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;
use tracing::{error, warn};

use service::auth::domain::{Claims, LoginInput};
use service::auth::errors::AuthError;
use common::types::Message;

use crate::errors::JsonApiError;
use crate::state::ServerState;

#[derive(Serialize)]
pub struct CheckOutput {
    pub message: &'static str,
    pub user: Claims,
}

#[utoipa::path(
    post, path = "/auth/login", tag = "auth",
    request_body = crate::openapi::LoginRequest,
    responses(
        (status = 200, description = "Session cookie set"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    input: Result<Json<LoginInput>, JsonRejection>,
) -> Result<(CookieJar, Json<Message>), JsonApiError> {
    let Json(input) = input.map_err(|e| JsonApiError::new(StatusCode::BAD_REQUEST, e.body_text()))?;
    let session = state.auth.login(input).await.map_err(|e| match e {
        AuthError::Unauthorized => JsonApiError::from(e),
        other => {
            error!(error = %other, "login failed");
            JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Login failed")
        }
    })?;
    let jar = jar.add(state.session.session(session.token));
    Ok((jar, Json(Message::new("Login successful"))))
}

#[utoipa::path(post, path = "/auth/logout", tag = "auth", responses((status = 200, description = "Session cookie cleared")))]
pub async fn logout(State(state): State<ServerState>, jar: CookieJar) -> (CookieJar, Json<Message>) {
    (jar.add(state.session.removal()), Json(Message::new("Logout successful")))
}

#[utoipa::path(
    get, path = "/auth/check", tag = "auth",
    responses(
        (status = 200, description = "Decoded session identity"),
        (status = 401, description = "Missing or invalid session")
    )
)]
pub async fn check(Extension(claims): Extension<Claims>) -> Json<CheckOutput> {
    Json(CheckOutput { message: "Authenticated", user: claims })
}

/// Reads the session cookie, verifies it and attaches the decoded [`Claims`].
pub async fn require_auth(State(state): State<ServerState>, mut req: Request, next: Next) -> Result<Response, JsonApiError> {
    let jar = CookieJar::from_headers(req.headers());
    let token = jar.get(&state.session.name).map(|c| c.value().to_string());
    let claims = state.auth.verify_token(token.as_deref()).map_err(|e| {
        warn!(path = %req.uri().path(), error = %e, "session rejected");
        JsonApiError::from(e)
    })?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Runs after [`require_auth`]; only the admin role passes.
pub async fn require_admin(State(state): State<ServerState>, req: Request, next: Next) -> Result<Response, JsonApiError> {
    let claims = req.extensions().get::<Claims>().ok_or(AuthError::MissingToken)?;
    if let Err(e) = state.auth.require_admin(claims) {
        warn!(path = %req.uri().path(), user_id = %claims.id, role = %claims.role, "admin role required");
        return Err(e.into());
    }
    Ok(next.run(req).await)
}
