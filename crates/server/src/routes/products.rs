use axum::{
    extract::{multipart::MultipartError, Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::{info, warn};

use common::types::Message;
use models::product::Model as Product;
use service::pagination::{Page, Pagination};
use service::product::{ProductFilter, ProductForm, UploadedFile};

use crate::errors::JsonApiError;
use crate::state::ServerState;

/// Raw admin listing query; numbers are parsed leniently.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AdminListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
    pub category: Option<String>,
}

/// Text fields plus the optional `image` file part.
#[derive(Debug, Default)]
pub struct ProductMultipart {
    pub form: ProductForm,
    pub file: Option<UploadedFile>,
}

fn multipart_error(e: MultipartError) -> JsonApiError {
    let status = e.status();
    warn!(%status, error = %e.body_text(), "multipart rejected");
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        JsonApiError::new(status, "File too large")
    } else {
        JsonApiError::new(StatusCode::BAD_REQUEST, "Invalid multipart body")
    }
}

/// A part named `image` with a file name is the upload; without one it is the
/// text reference to an existing blob.
pub async fn read_product_multipart(mut multipart: Multipart) -> Result<ProductMultipart, JsonApiError> {
    let mut out = ProductMultipart::default();
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        if let Some(file_name) = field.file_name().map(str::to_string) {
            if name != "image" {
                continue;
            }
            let content_type = field.content_type().unwrap_or_default().to_string();
            let bytes = field.bytes().await.map_err(multipart_error)?;
            // browsers send an empty part when no file was chosen
            if file_name.is_empty() && bytes.is_empty() {
                continue;
            }
            out.file = Some(UploadedFile { file_name, content_type, bytes });
            continue;
        }
        let text = field.text().await.map_err(multipart_error)?;
        match name.as_str() {
            "name" => out.form.name = Some(text),
            "price" => out.form.price = Some(text),
            "description" => out.form.description = Some(text),
            "category" => out.form.category = Some(text),
            "image" => out.form.image = Some(text),
            _ => {}
        }
    }
    Ok(out)
}

#[utoipa::path(
    post, path = "/products", tag = "products",
    request_body(content = crate::openapi::ProductFormDoc, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Created", body = crate::openapi::ProductDoc),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access only"),
        (status = 413, description = "File too large")
    )
)]
pub async fn create(State(state): State<ServerState>, multipart: Multipart) -> Result<(StatusCode, Json<Product>), JsonApiError> {
    let ProductMultipart { form, file } = read_product_multipart(multipart).await?;
    let created = state
        .products
        .create(form, file)
        .await
        .map_err(|e| JsonApiError::from_service(e, "Error creating product"))?;
    info!(product_id = %created.id, "product_create_request");
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(get, path = "/products", tag = "products", responses((status = 200, description = "Whole catalog", body = [crate::openapi::ProductDoc])))]
pub async fn list_all(State(state): State<ServerState>) -> Result<Json<Vec<Product>>, JsonApiError> {
    let products = state
        .products
        .list_all()
        .await
        .map_err(|e| JsonApiError::from_service(e, "Error fetching products"))?;
    Ok(Json(products))
}

#[utoipa::path(
    get, path = "/products/admin", tag = "products",
    params(AdminListQuery),
    responses(
        (status = 200, description = "Page of products"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access only")
    )
)]
pub async fn list_admin(State(state): State<ServerState>, Query(q): Query<AdminListQuery>) -> Result<Json<Page<Product>>, JsonApiError> {
    let pagination = Pagination::from_query(q.page.as_deref(), q.limit.as_deref());
    let filter = ProductFilter::from_query(q.category.as_deref(), q.search.as_deref());
    let page = state
        .products
        .list_admin(pagination, filter)
        .await
        .map_err(|e| JsonApiError::from_service(e, "Error fetching products"))?;
    Ok(Json(page))
}

#[utoipa::path(
    get, path = "/products/{id}", tag = "products",
    params(("id" = String, Path, description = "Product id (UUID)")),
    responses(
        (status = 200, description = "Product", body = crate::openapi::ProductDoc),
        (status = 400, description = "Invalid product ID"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn get_one(State(state): State<ServerState>, Path(id): Path<String>) -> Result<Json<Product>, JsonApiError> {
    let product = state
        .products
        .get(&id)
        .await
        .map_err(|e| JsonApiError::from_service(e, "Error fetching product"))?;
    Ok(Json(product))
}

#[utoipa::path(
    put, path = "/products/{id}", tag = "products",
    params(("id" = String, Path, description = "Product id (UUID)")),
    request_body(content = crate::openapi::ProductFormDoc, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Product updated successfully"),
        (status = 400, description = "Validation failed or invalid id"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn update(State(state): State<ServerState>, Path(id): Path<String>, multipart: Multipart) -> Result<Json<Message>, JsonApiError> {
    let ProductMultipart { form, file } = read_product_multipart(multipart).await?;
    state
        .products
        .update(&id, form, file)
        .await
        .map_err(|e| JsonApiError::from_service(e, "Error updating product"))?;
    Ok(Json(Message::new("Product updated successfully")))
}

#[utoipa::path(
    delete, path = "/products/{id}", tag = "products",
    params(("id" = String, Path, description = "Product id (UUID)")),
    responses(
        (status = 200, description = "Product deleted successfully"),
        (status = 400, description = "Invalid product ID"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn delete(State(state): State<ServerState>, Path(id): Path<String>) -> Result<Json<Message>, JsonApiError> {
    state
        .products
        .delete(&id)
        .await
        .map_err(|e| JsonApiError::from_service(e, "Error deleting product"))?;
    Ok(Json(Message::new("Product deleted successfully")))
}
