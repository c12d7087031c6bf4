//! Create `upload_file` table: one row per stored blob, keyed by its
//! generated unique filename. Content lives in `upload_chunk`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UploadFile::Table)
                    .if_not_exists()
                    .col(uuid(UploadFile::Id).primary_key())
                    .col(string_len(UploadFile::Filename, 512).unique_key().not_null())
                    .col(string_len(UploadFile::ContentType, 255).not_null())
                    .col(big_integer(UploadFile::Length).not_null())
                    .col(integer(UploadFile::ChunkSize).not_null())
                    .col(timestamp_with_time_zone(UploadFile::UploadedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(UploadFile::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum UploadFile { Table, Id, Filename, ContentType, Length, ChunkSize, UploadedAt }
