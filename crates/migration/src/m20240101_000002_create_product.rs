//! Create `product` table.
//! `image` holds the stored blob name, empty when the product has no image.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Product::Table)
                    .if_not_exists()
                    .col(uuid(Product::Id).primary_key())
                    .col(string_len(Product::Name, 100).not_null())
                    .col(double(Product::Price).not_null())
                    .col(string_len(Product::Description, 500).not_null())
                    .col(string_len(Product::Category, 64).not_null())
                    .col(string_len(Product::Image, 512).not_null().default(""))
                    .col(timestamp_with_time_zone(Product::CreatedAt).not_null())
                    .col(
                        ColumnDef::new(Product::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Product::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Product {
    Table,
    Id,
    Name,
    Price,
    Description,
    Category,
    Image,
    CreatedAt,
    UpdatedAt,
}
