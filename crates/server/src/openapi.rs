use serde::Serialize;
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct LoginRequest { pub email: String, pub password: String }

/// Product as returned by the API.
#[derive(ToSchema, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDoc {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub price: f64,
    pub description: String,
    #[schema(example = "Grammar")]
    pub category: String,
    pub image: String,
    pub created_at: String,
    pub updated_at: Option<String>,
}

/// Multipart form for create/update.
#[derive(ToSchema)]
pub struct ProductFormDoc {
    pub name: String,
    pub price: String,
    pub description: String,
    pub category: String,
    /// Existing stored blob name (update only, when no file is sent).
    pub image: Option<String>,
    /// File part; sent under the `image` field name.
    #[schema(value_type = Option<String>, format = Binary)]
    pub file: Option<Vec<u8>>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::login,
        crate::routes::auth::logout,
        crate::routes::auth::check,
        crate::routes::products::create,
        crate::routes::products::list_all,
        crate::routes::products::list_admin,
        crate::routes::products::get_one,
        crate::routes::products::update,
        crate::routes::products::delete,
        crate::routes::uploads::download,
    ),
    components(
        schemas(
            HealthResponse,
            LoginRequest,
            ProductDoc,
            ProductFormDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "products"),
        (name = "uploads")
    )
)]
pub struct ApiDoc;
