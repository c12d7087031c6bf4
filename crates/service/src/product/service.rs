use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument, warn};

use super::domain::{parse_id, NewProduct, Product, ProductFilter, ProductForm, ProductPatch, UploadedFile};
use super::repository::ProductRepository;
use super::validation::validate;
use crate::blob::{BlobDownload, BlobStore};
use crate::errors::{FieldIssue, ServiceError};
use crate::pagination::{Page, PageInfo, Pagination};

/// Product Service: orchestrates validation, blob lifecycle and repository
/// writes. Within one request: upload, then validate, then write, then
/// delete the replaced blob.
pub struct ProductService {
    repo: Arc<dyn ProductRepository>,
    blobs: Arc<dyn BlobStore>,
}

impl ProductService {
    pub fn new(repo: Arc<dyn ProductRepository>, blobs: Arc<dyn BlobStore>) -> Self { Self { repo, blobs } }

    async fn store_file(&self, file: UploadedFile) -> Result<String, ServiceError> {
        let size = file.bytes.len();
        let name = self.blobs.upload(&file.file_name, &file.content_type, file.bytes).await?;
        info!(stored_name = %name, size, "image_uploaded");
        Ok(name)
    }

    /// Create a product. An uploaded file is stored before validation and is
    /// left in place when validation fails.
    #[instrument(skip(self, form, file), fields(has_file = file.is_some()))]
    pub async fn create(&self, mut form: ProductForm, file: Option<UploadedFile>) -> Result<Product, ServiceError> {
        form.image = match file {
            Some(file) => Some(self.store_file(file).await?),
            None => Some(String::new()),
        };
        let fields = validate(&form).map_err(ServiceError::Validation)?;

        let created_at = Utc::now().fixed_offset();
        let id = self.repo.insert(NewProduct { fields: fields.clone(), created_at }).await?;
        info!(product_id = %id, "product_created");
        Ok(Product {
            id,
            name: fields.name,
            price: fields.price,
            description: fields.description,
            category: fields.category,
            image: fields.image,
            created_at,
            updated_at: None,
        })
    }

    pub async fn list_all(&self) -> Result<Vec<Product>, ServiceError> {
        self.repo.find_all().await
    }

    #[instrument(skip(self))]
    pub async fn list_admin(&self, pagination: Pagination, filter: ProductFilter) -> Result<Page<Product>, ServiceError> {
        let total = self.repo.count_matching(&filter).await?;
        let data = match pagination.skip() {
            Some(skip) => self.repo.find_matching(&filter, skip, pagination.limit).await?,
            None => Vec::new(),
        };
        Ok(Page {
            data,
            pagination: PageInfo { total, page: pagination.page, total_pages: pagination.total_pages(total) },
        })
    }

    pub async fn get(&self, id: &str) -> Result<Product, ServiceError> {
        let id = parse_id(id)?;
        self.repo.find_by_id(id).await?.ok_or_else(|| ServiceError::not_found("product"))
    }

    /// Replace the product's fields. With a new file the old image is deleted
    /// only after the write matched. Without one, an omitted `image` keeps the
    /// current value and a changed one must name an existing blob.
    #[instrument(skip(self, form, file), fields(has_file = file.is_some()))]
    pub async fn update(&self, id: &str, mut form: ProductForm, file: Option<UploadedFile>) -> Result<(), ServiceError> {
        let id = parse_id(id)?;
        let current = self.repo.find_by_id(id).await?.ok_or_else(|| ServiceError::not_found("product"))?;

        let mut issues = Vec::new();
        let image = match file {
            Some(file) => self.store_file(file).await?,
            None => match form.image.as_deref().map(str::trim) {
                None => current.image.clone(),
                Some("") => String::new(),
                Some(name) if name == current.image => current.image.clone(),
                Some(name) => {
                    if self.blobs.find_by_name(name).await?.is_none() {
                        issues.push(FieldIssue::new("custom", "image", "Image not found"));
                    }
                    name.to_string()
                }
            },
        };
        form.image = Some(image);

        let fields = match validate(&form) {
            Ok(fields) if issues.is_empty() => fields,
            Ok(_) => return Err(ServiceError::Validation(issues)),
            Err(mut more) => {
                more.append(&mut issues);
                return Err(ServiceError::Validation(more));
            }
        };

        let new_image = fields.image.clone();
        let matched = self.repo.update_by_id(id, ProductPatch { fields, updated_at: Utc::now().fixed_offset() }).await?;
        if matched == 0 {
            warn!(product_id = %id, "product vanished before update");
            return Err(ServiceError::not_found("product"));
        }

        if current.has_image() && current.image != new_image {
            self.blobs.delete(&current.image).await?;
            info!(blob = %current.image, "old_image_deleted");
        }
        info!(product_id = %id, "product_updated");
        Ok(())
    }

    /// Delete the record first, then its image.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        let id = parse_id(id)?;
        let current = self.repo.find_by_id(id).await?.ok_or_else(|| ServiceError::not_found("product"))?;
        if self.repo.delete_by_id(id).await? == 0 {
            return Err(ServiceError::not_found("product"));
        }
        if current.has_image() {
            self.blobs.delete(&current.image).await?;
            info!(blob = %current.image, "image_deleted");
        }
        info!(product_id = %id, "product_deleted");
        Ok(())
    }

    pub async fn open_image(&self, name: &str) -> Result<BlobDownload, ServiceError> {
        Ok(self.blobs.open_download_stream(name).await?)
    }
}
