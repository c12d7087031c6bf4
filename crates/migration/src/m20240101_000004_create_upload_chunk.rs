//! Create `upload_chunk` table with FK to `upload_file`.
//!
//! Chunks are numbered from zero; deleting the file row cascades.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UploadChunk::Table)
                    .if_not_exists()
                    .col(uuid(UploadChunk::Id).primary_key())
                    .col(uuid(UploadChunk::FileId).not_null())
                    .col(integer(UploadChunk::N).not_null())
                    .col(ColumnDef::new(UploadChunk::Data).binary().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_upload_chunk_file")
                            .from(UploadChunk::Table, UploadChunk::FileId)
                            .to(UploadFile::Table, UploadFile::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(UploadChunk::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum UploadChunk { Table, Id, FileId, N, Data }

#[derive(DeriveIden)]
enum UploadFile { Table, Id }
