pub mod auth;
pub mod products;
pub mod uploads;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;

use crate::errors::StartupError;
use crate::openapi::ApiDoc;
use crate::state::ServerState;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Credentialed CORS: explicit origins when configured, otherwise mirror the caller.
pub fn build_cors(cfg: &configs::CorsConfig) -> Result<CorsLayer, StartupError> {
    let origin = if cfg.allowed_origins.is_empty() {
        AllowOrigin::mirror_request()
    } else {
        let origins = cfg
            .allowed_origins
            .iter()
            .map(|o| {
                HeaderValue::from_str(o.trim_end_matches('/'))
                    .map_err(|e| StartupError::InvalidConfig(format!("cors origin {}: {}", o, e)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        AllowOrigin::list(origins)
    };
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]))
}

/// Build the full application router: public reads, auth endpoints and the
/// admin-only product mutations.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .route("/products", get(products::list_all))
        .route("/products/:id", get(products::get_one))
        .route("/uploads/:filename", get(uploads::download))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route(
            "/auth/check",
            get(auth::check).route_layer(middleware::from_fn_with_state(state.clone(), auth::require_auth)),
        );

    // Layers added later run first: authentication, then the admin role check.
    let admin = Router::new()
        .route("/products", post(products::create))
        .route("/products/admin", get(products::list_admin))
        .route("/products/:id", put(products::update).delete(products::delete))
        .layer(DefaultBodyLimit::max(state.upload_limit))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_admin))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_auth));

    public
        .merge(admin)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
