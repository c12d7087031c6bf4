use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Product: admin listing sorts by created_at desc
        manager
            .create_index(
                Index::create()
                    .name("idx_product_created_at")
                    .table(Product::Table)
                    .col(Product::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Product: category filter
        manager
            .create_index(
                Index::create()
                    .name("idx_product_category")
                    .table(Product::Table)
                    .col(Product::Category)
                    .to_owned(),
            )
            .await?;

        // UploadChunk: composite unique (file_id, n)
        manager
            .create_index(
                Index::create()
                    .name("uniq_upload_chunk_file_n")
                    .table(UploadChunk::Table)
                    .col(UploadChunk::FileId)
                    .col(UploadChunk::N)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_product_created_at").table(Product::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_product_category").table(Product::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("uniq_upload_chunk_file_n").table(UploadChunk::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Product { Table, CreatedAt, Category }

#[derive(DeriveIden)]
enum UploadChunk { Table, FileId, N }
