use sea_orm::{entity::prelude::*, Set, DatabaseConnection, QueryFilter};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;

pub const ROLE_ADMIN: &str = "admin";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_email(email: &str) -> Result<(), errors::ModelError> {
    if !email.contains('@') || email.trim().len() < 3 {
        return Err(errors::ModelError::Validation("invalid email".into()));
    }
    Ok(())
}

pub async fn find_by_email(db: &DatabaseConnection, email: &str) -> Result<Option<Model>, errors::ModelError> {
    let found = Entity::find()
        .filter(Column::Email.eq(email.to_string()))
        .one(db)
        .await?;
    Ok(found)
}

pub async fn create(db: &DatabaseConnection, email: &str, password_hash: String, role: &str) -> Result<Model, errors::ModelError> {
    validate_email(email)?;
    if password_hash.trim().is_empty() { return Err(errors::ModelError::Validation("password hash required".into())); }
    if role.trim().is_empty() { return Err(errors::ModelError::Validation("role required".into())); }
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        password_hash: Set(password_hash),
        role: Set(role.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
