use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, FixedOffset};
use futures_util::stream::BoxStream;
use thiserror::Error;
use uuid::Uuid;

pub type ByteStream = BoxStream<'static, Result<Bytes, BlobError>>;

#[derive(Debug, Error)]
pub enum BlobError {
    #[error("blob not found: {0}")]
    NotFound(String),
    #[error("blob storage error: {0}")]
    Storage(String),
}

impl BlobError {
    pub(crate) fn storage(e: impl std::fmt::Display) -> Self { BlobError::Storage(e.to_string()) }
}

/// Stored blob metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct BlobRef {
    pub id: Uuid,
    pub filename: String,
    pub content_type: String,
    pub length: u64,
    pub uploaded_at: DateTime<FixedOffset>,
}

/// An open download: metadata plus the content stream.
pub struct BlobDownload {
    pub blob: BlobRef,
    pub stream: ByteStream,
}

impl std::fmt::Debug for BlobDownload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlobDownload").field("blob", &self.blob).finish_non_exhaustive()
    }
}

/// Storage port for product images.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes` under a fresh name derived from `original_name`; never
    /// overwrites an existing blob. Returns the stored name.
    async fn upload(&self, original_name: &str, content_type: &str, bytes: Bytes) -> Result<String, BlobError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<BlobRef>, BlobError>;

    /// Fails with `BlobError::NotFound` when no blob has that name.
    async fn open_download_stream(&self, name: &str) -> Result<BlobDownload, BlobError>;

    /// Remove the blob; `Ok(false)` when nothing had that name.
    async fn delete(&self, name: &str) -> Result<bool, BlobError>;
}

pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Longest original-name component kept in a stored name.
pub const MAX_ORIGINAL_NAME: usize = 200;

/// Final path component of a client-supplied file name, trimmed and capped
/// at [`MAX_ORIGINAL_NAME`] characters.
pub fn sanitize_original_name(name: &str) -> String {
    let last = name.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    let cleaned: String = last.chars().filter(|c| !c.is_control()).take(MAX_ORIGINAL_NAME).collect();
    if cleaned.is_empty() { "upload".to_string() } else { cleaned }
}

/// `<unix-millis>-<original-name>`
pub fn stored_name(millis: i64, original_name: &str) -> String {
    format!("{}-{}", millis, sanitize_original_name(original_name))
}

/// Fallback used when [`stored_name`] is already taken.
pub fn disambiguated_name(millis: i64, original_name: &str) -> String {
    let suffix: String = Uuid::new_v4().simple().to_string().chars().take(8).collect();
    format!("{}-{}-{}", millis, suffix, sanitize_original_name(original_name))
}

pub(crate) fn content_type_or_default(content_type: &str) -> String {
    let ct = content_type.trim();
    if ct.is_empty() { DEFAULT_CONTENT_TYPE.to_string() } else { ct.to_string() }
}
