use models::product;
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use tracing::instrument;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::product::domain::{NewProduct, Product, ProductFilter, ProductPatch};
use crate::product::repository::ProductRepository;

pub struct SeaOrmProductRepository {
    pub db: DatabaseConnection,
}

/// Escape LIKE metacharacters so the search text matches literally.
fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn condition(filter: &ProductFilter) -> Condition {
    let mut cond = Condition::all();
    if let Some(category) = &filter.category {
        cond = cond.add(Expr::col(product::Column::Category).eq(category.clone()));
    }
    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", escape_like(&search.to_lowercase()));
        cond = cond.add(
            Condition::any()
                .add(Expr::expr(Func::lower(Expr::col(product::Column::Name))).like(LikeExpr::new(pattern.clone()).escape('\\')))
                .add(Expr::expr(Func::lower(Expr::col(product::Column::Description))).like(LikeExpr::new(pattern).escape('\\'))),
        );
    }
    cond
}

#[async_trait::async_trait]
impl ProductRepository for SeaOrmProductRepository {
    #[instrument(skip(self, doc))]
    async fn insert(&self, doc: NewProduct) -> Result<Uuid, ServiceError> {
        let f = doc.fields;
        let created = product::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(f.name),
            price: Set(f.price),
            description: Set(f.description),
            category: Set(f.category),
            image: Set(f.image),
            created_at: Set(doc.created_at),
            updated_at: Set(None),
        }
        .insert(&self.db)
        .await?;
        Ok(created.id)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, ServiceError> {
        Ok(product::Entity::find_by_id(id).one(&self.db).await?)
    }

    async fn find_all(&self) -> Result<Vec<Product>, ServiceError> {
        Ok(product::Entity::find().order_by_asc(product::Column::CreatedAt).all(&self.db).await?)
    }

    async fn count_matching(&self, filter: &ProductFilter) -> Result<u64, ServiceError> {
        Ok(product::Entity::find().filter(condition(filter)).count(&self.db).await?)
    }

    #[instrument(skip(self))]
    async fn find_matching(&self, filter: &ProductFilter, skip: u64, limit: u64) -> Result<Vec<Product>, ServiceError> {
        Ok(product::Entity::find()
            .filter(condition(filter))
            .order_by_desc(product::Column::CreatedAt)
            .offset(skip)
            .limit(limit)
            .all(&self.db)
            .await?)
    }

    #[instrument(skip(self, patch))]
    async fn update_by_id(&self, id: Uuid, patch: ProductPatch) -> Result<u64, ServiceError> {
        let f = patch.fields;
        let am = product::ActiveModel {
            name: Set(f.name),
            price: Set(f.price),
            description: Set(f.description),
            category: Set(f.category),
            image: Set(f.image),
            updated_at: Set(Some(patch.updated_at)),
            ..Default::default()
        };
        let res = product::Entity::update_many()
            .set(am)
            .filter(product::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        Ok(res.rows_affected)
    }

    #[instrument(skip(self))]
    async fn delete_by_id(&self, id: Uuid) -> Result<u64, ServiceError> {
        let res = product::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(res.rows_affected)
    }
}
