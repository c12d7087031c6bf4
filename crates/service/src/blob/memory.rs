use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use futures_util::StreamExt;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::store::{content_type_or_default, disambiguated_name, stored_name};
use super::{BlobDownload, BlobError, BlobRef, BlobStore};

const DEFAULT_MEMORY_CHUNK: usize = 255 * 1024;

struct StoredBlob {
    meta: BlobRef,
    data: Bytes,
}

/// In-memory blob store. Counts `delete` calls so tests can assert on them.
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<String, StoredBlob>>,
    chunk_size: usize,
    delete_calls: AtomicUsize,
}

impl Default for MemoryBlobStore {
    fn default() -> Self { Self::new() }
}

impl MemoryBlobStore {
    pub fn new() -> Self { Self::with_chunk_size(DEFAULT_MEMORY_CHUNK) }

    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self { blobs: RwLock::new(HashMap::new()), chunk_size: chunk_size.max(1), delete_calls: AtomicUsize::new(0) }
    }

    pub async fn len(&self) -> usize { self.blobs.read().await.len() }

    pub async fn is_empty(&self) -> bool { self.blobs.read().await.is_empty() }

    pub async fn contains(&self, name: &str) -> bool { self.blobs.read().await.contains_key(name) }

    pub fn delete_calls(&self) -> usize { self.delete_calls.load(Ordering::SeqCst) }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn upload(&self, original_name: &str, content_type: &str, bytes: Bytes) -> Result<String, BlobError> {
        let now = Utc::now();
        let mut blobs = self.blobs.write().await;
        let mut filename = stored_name(now.timestamp_millis(), original_name);
        while blobs.contains_key(&filename) {
            filename = disambiguated_name(now.timestamp_millis(), original_name);
        }
        let meta = BlobRef {
            id: Uuid::new_v4(),
            filename: filename.clone(),
            content_type: content_type_or_default(content_type),
            length: bytes.len() as u64,
            uploaded_at: now.fixed_offset(),
        };
        blobs.insert(filename.clone(), StoredBlob { meta, data: bytes });
        Ok(filename)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<BlobRef>, BlobError> {
        Ok(self.blobs.read().await.get(name).map(|b| b.meta.clone()))
    }

    async fn open_download_stream(&self, name: &str) -> Result<BlobDownload, BlobError> {
        let blobs = self.blobs.read().await;
        let blob = blobs.get(name).ok_or_else(|| BlobError::NotFound(name.to_string()))?;
        let data = blob.data.clone();
        let chunks: Vec<Result<Bytes, BlobError>> = (0..data.len())
            .step_by(self.chunk_size)
            .map(|start| Ok(data.slice(start..(start + self.chunk_size).min(data.len()))))
            .collect();
        Ok(BlobDownload { blob: blob.meta.clone(), stream: futures_util::stream::iter(chunks).boxed() })
    }

    async fn delete(&self, name: &str) -> Result<bool, BlobError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.blobs.write().await.remove(name).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn collect(download: BlobDownload) -> anyhow::Result<Vec<u8>> {
        let mut out = Vec::new();
        let mut stream = download.stream;
        while let Some(chunk) = stream.next().await {
            out.extend_from_slice(&chunk?);
        }
        Ok(out)
    }

    #[tokio::test]
    async fn upload_then_download_returns_same_bytes() -> anyhow::Result<()> {
        let store = MemoryBlobStore::with_chunk_size(4);
        let name = store.upload("cover.png", "image/png", Bytes::from_static(b"0123456789")).await?;
        assert!(name.ends_with("-cover.png"));

        let download = store.open_download_stream(&name).await?;
        assert_eq!(download.blob.content_type, "image/png");
        assert_eq!(download.blob.length, 10);
        assert_eq!(collect(download).await?, b"0123456789");
        Ok(())
    }

    #[tokio::test]
    async fn same_name_never_overwrites() -> anyhow::Result<()> {
        let store = MemoryBlobStore::new();
        let a = store.upload("a.png", "image/png", Bytes::from_static(b"first")).await?;
        let b = store.upload("a.png", "image/png", Bytes::from_static(b"second")).await?;
        assert_ne!(a, b);
        assert_eq!(store.len().await, 2);
        assert_eq!(collect(store.open_download_stream(&a).await?).await?, b"first");
        Ok(())
    }

    #[tokio::test]
    async fn missing_blob_is_not_found_and_delete_is_noop() -> anyhow::Result<()> {
        let store = MemoryBlobStore::new();
        assert!(matches!(store.open_download_stream("nope").await, Err(BlobError::NotFound(_))));
        assert!(!store.delete("nope").await?);
        assert_eq!(store.delete_calls(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn empty_blob_streams_nothing() -> anyhow::Result<()> {
        let store = MemoryBlobStore::new();
        let name = store.upload("empty.txt", "", Bytes::new()).await?;
        let download = store.open_download_stream(&name).await?;
        assert_eq!(download.blob.content_type, "application/octet-stream");
        assert!(collect(download).await?.is_empty());
        Ok(())
    }
}
