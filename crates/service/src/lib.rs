//! Service layer for the product catalog.
//! - Validation, blob lifecycle and repository writes are orchestrated here,
//!   independent of the HTTP framework.
//! - Ports (`BlobStore`, `ProductRepository`, `AuthRepository`) have a
//!   SeaORM implementation and an in-memory one used by tests.

pub mod errors;
pub mod pagination;
pub mod blob;
pub mod product;
pub mod auth;
#[cfg(test)]
pub mod test_support;
