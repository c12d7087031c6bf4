//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_users;
mod m20240101_000002_create_product;
mod m20240101_000003_create_upload_file;
mod m20240101_000004_create_upload_chunk;
mod m20240101_000010_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users::Migration),
            Box::new(m20240101_000002_create_product::Migration),
            Box::new(m20240101_000003_create_upload_file::Migration),
            Box::new(m20240101_000004_create_upload_chunk::Migration),
            // Indexes should always be applied last
            Box::new(m20240101_000010_add_indexes::Migration),
        ]
    }
}
