use bytes::Bytes;
use chrono::{DateTime, FixedOffset};
use uuid::Uuid;

use models::Category;

use crate::errors::ServiceError;

pub type Product = models::product::Model;

/// Category value that disables category filtering.
pub const ALL_CATEGORIES: &str = "Semua";

/// Raw text fields of a create/update form, before validation.
#[derive(Debug, Clone, Default)]
pub struct ProductForm {
    pub name: Option<String>,
    pub price: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    /// Stored blob name; set by the service after blob handling.
    pub image: Option<String>,
}

/// File part of a multipart request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

/// Normalized product fields that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedProduct {
    pub name: String,
    pub price: f64,
    pub description: String,
    pub category: Category,
    pub image: String,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub fields: ValidatedProduct,
    pub created_at: DateTime<FixedOffset>,
}

/// Full replacement of the mutable fields.
#[derive(Debug, Clone)]
pub struct ProductPatch {
    pub fields: ValidatedProduct,
    pub updated_at: DateTime<FixedOffset>,
}

/// Admin listing filter. `None` matches everything for that dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Exact category value; unknown values match nothing.
    pub category: Option<String>,
    /// Case-insensitive substring of name or description.
    pub search: Option<String>,
}

impl ProductFilter {
    pub fn from_query(category: Option<&str>, search: Option<&str>) -> Self {
        let category = category
            .map(str::trim)
            .filter(|c| !c.is_empty() && *c != ALL_CATEGORIES && !c.eq_ignore_ascii_case("all"))
            .map(str::to_string);
        let search = search.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);
        Self { category, search }
    }

    pub fn matches(&self, p: &Product) -> bool {
        if let Some(c) = &self.category {
            if p.category.as_str() != c {
                return false;
            }
        }
        if let Some(s) = &self.search {
            let needle = s.to_lowercase();
            return p.name.to_lowercase().contains(&needle) || p.description.to_lowercase().contains(&needle);
        }
        true
    }
}

pub fn parse_id(raw: &str) -> Result<Uuid, ServiceError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ServiceError::InvalidId(raw.to_string()))
}
