use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::upload_file;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "upload_chunk")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub file_id: Uuid,
    pub n: i32,
    pub data: Vec<u8>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { File }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::File => Entity::belongs_to(upload_file::Entity)
                .from(Column::FileId)
                .to(upload_file::Column::Id)
                .into(),
        }
    }
}

impl Related<upload_file::Entity> for Entity {
    fn to() -> RelationDef { Relation::File.def() }
}

impl ActiveModelBehavior for ActiveModel {}
