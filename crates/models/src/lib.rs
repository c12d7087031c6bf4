//! Persistence entities for the catalog: products, users and the chunked
//! upload tables backing the image blob store.

pub mod errors;
pub mod db;
pub mod product;
pub mod user;
pub mod upload_file;
pub mod upload_chunk;

pub use product::Category;
