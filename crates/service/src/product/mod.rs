//! Product catalog: validation, repository port and the orchestrating service.

pub mod domain;
pub mod validation;
pub mod repository;
pub mod repo;
pub mod service;

pub use domain::{ProductFilter, ProductForm, UploadedFile, ValidatedProduct};
pub use service::ProductService;
