use async_trait::async_trait;
use uuid::Uuid;

use super::domain::{NewProduct, Product, ProductFilter, ProductPatch};
use crate::errors::ServiceError;

/// Persistence port for products.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn insert(&self, doc: NewProduct) -> Result<Uuid, ServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, ServiceError>;
    /// Whole catalog, oldest first.
    async fn find_all(&self) -> Result<Vec<Product>, ServiceError>;
    async fn count_matching(&self, filter: &ProductFilter) -> Result<u64, ServiceError>;
    /// Newest first.
    async fn find_matching(&self, filter: &ProductFilter, skip: u64, limit: u64) -> Result<Vec<Product>, ServiceError>;
    /// Returns the matched count.
    async fn update_by_id(&self, id: Uuid, patch: ProductPatch) -> Result<u64, ServiceError>;
    /// Returns the deleted count.
    async fn delete_by_id(&self, id: Uuid) -> Result<u64, ServiceError>;
}

/// In-memory repository for tests
pub mod mock {
    use super::*;
    use tokio::sync::RwLock;

    #[derive(Default)]
    pub struct MockProductRepository {
        rows: RwLock<Vec<Product>>, // insertion order
    }

    impl MockProductRepository {
        pub async fn len(&self) -> usize { self.rows.read().await.len() }

        pub async fn is_empty(&self) -> bool { self.rows.read().await.is_empty() }
    }

    #[async_trait]
    impl ProductRepository for MockProductRepository {
        async fn insert(&self, doc: NewProduct) -> Result<Uuid, ServiceError> {
            let id = Uuid::new_v4();
            let f = doc.fields;
            self.rows.write().await.push(Product {
                id,
                name: f.name,
                price: f.price,
                description: f.description,
                category: f.category,
                image: f.image,
                created_at: doc.created_at,
                updated_at: None,
            });
            Ok(id)
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, ServiceError> {
            Ok(self.rows.read().await.iter().find(|p| p.id == id).cloned())
        }

        async fn find_all(&self) -> Result<Vec<Product>, ServiceError> {
            Ok(self.rows.read().await.clone())
        }

        async fn count_matching(&self, filter: &ProductFilter) -> Result<u64, ServiceError> {
            Ok(self.rows.read().await.iter().filter(|p| filter.matches(p)).count() as u64)
        }

        async fn find_matching(&self, filter: &ProductFilter, skip: u64, limit: u64) -> Result<Vec<Product>, ServiceError> {
            let rows = self.rows.read().await;
            let mut matching: Vec<Product> = rows.iter().filter(|p| filter.matches(p)).cloned().collect();
            // stable sort keeps later inserts first on equal timestamps
            matching.reverse();
            matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            let skip = usize::try_from(skip).unwrap_or(usize::MAX);
            let limit = usize::try_from(limit).unwrap_or(usize::MAX);
            Ok(matching.into_iter().skip(skip).take(limit).collect())
        }

        async fn update_by_id(&self, id: Uuid, patch: ProductPatch) -> Result<u64, ServiceError> {
            let mut rows = self.rows.write().await;
            let Some(p) = rows.iter_mut().find(|p| p.id == id) else {
                return Ok(0);
            };
            let f = patch.fields;
            p.name = f.name;
            p.price = f.price;
            p.description = f.description;
            p.category = f.category;
            p.image = f.image;
            p.updated_at = Some(patch.updated_at);
            Ok(1)
        }

        async fn delete_by_id(&self, id: Uuid) -> Result<u64, ServiceError> {
            let mut rows = self.rows.write().await;
            let before = rows.len();
            rows.retain(|p| p.id != id);
            Ok((before - rows.len()) as u64)
        }
    }
}
