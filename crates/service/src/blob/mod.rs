//! Blob Store: durable binary storage keyed by a generated unique filename.
//!
//! The SeaORM implementation splits content into ordered chunks and streams
//! them back one row at a time; the in-memory one backs tests.

pub mod store;
pub mod seaorm;
pub mod memory;

pub use store::{BlobDownload, BlobError, BlobRef, BlobStore, ByteStream};
