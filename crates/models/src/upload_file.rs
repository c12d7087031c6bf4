use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::upload_chunk;

/// Metadata row of a stored blob. Bytes live in `upload_chunk`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "upload_file")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub filename: String,
    pub content_type: String,
    pub length: i64,
    pub chunk_size: i32,
    pub uploaded_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Chunk }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Chunk => Entity::has_many(upload_chunk::Entity).into(),
        }
    }
}

impl Related<upload_chunk::Entity> for Entity {
    fn to() -> RelationDef { Relation::Chunk.def() }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Number of chunk rows the file was split into.
    pub fn chunk_count(&self) -> i32 {
        if self.length <= 0 || self.chunk_size <= 0 {
            return 0;
        }
        let size = i64::from(self.chunk_size);
        ((self.length + size - 1) / size) as i32
    }
}
