use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
};
use tracing::error;

use service::blob::BlobError;
use service::errors::ServiceError;

use crate::errors::JsonApiError;
use crate::state::ServerState;

#[utoipa::path(
    get, path = "/uploads/{filename}", tag = "uploads",
    params(("filename" = String, Path, description = "Stored blob name")),
    responses(
        (status = 200, description = "Blob bytes streamed with stored content type"),
        (status = 404, description = "Image not found")
    )
)]
pub async fn download(State(state): State<ServerState>, Path(filename): Path<String>) -> Result<Response, JsonApiError> {
    let download = state.products.open_image(&filename).await.map_err(|e| match e {
        ServiceError::Blob(BlobError::NotFound(_)) => JsonApiError::new(StatusCode::NOT_FOUND, "Image not found"),
        other => {
            error!(error = %other, %filename, "Error serving image");
            JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Error serving image")
        }
    })?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, download.blob.content_type.as_str())
        .header(header::CONTENT_LENGTH, download.blob.length)
        .body(Body::from_stream(download.stream))
        .map_err(|e| {
            error!(error = %e, %filename, "Error serving image");
            JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Error serving image")
        })
}
