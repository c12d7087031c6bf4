use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures_util::StreamExt;
use models::{upload_chunk, upload_file};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set, SqlErr,
    TransactionTrait,
};
use tracing::{debug, instrument};
use uuid::Uuid;

use super::store::{content_type_or_default, disambiguated_name, stored_name};
use super::{BlobDownload, BlobError, BlobRef, BlobStore};

/// Attempts at finding a free stored name before giving up.
const NAME_ATTEMPTS: usize = 4;

/// Chunked blob storage in Postgres: one `upload_file` row plus ordered
/// `upload_chunk` rows.
#[derive(Clone)]
pub struct SeaOrmBlobStore {
    pub db: DatabaseConnection,
    pub chunk_size: usize,
}

impl SeaOrmBlobStore {
    pub fn new(db: DatabaseConnection, chunk_size: usize) -> Self {
        Self { db, chunk_size: chunk_size.max(1) }
    }

    /// Store `bytes` under a name derived from `now`. A name taken by a
    /// concurrent upload in the same millisecond is retried with a random
    /// suffix; the unique index on `filename` decides who won.
    #[instrument(skip(self, bytes), fields(len = bytes.len()))]
    async fn upload_at(
        &self,
        now: DateTime<Utc>,
        original_name: &str,
        content_type: &str,
        bytes: Bytes,
    ) -> Result<String, BlobError> {
        let millis = now.timestamp_millis();
        let mut filename = stored_name(millis, original_name);
        let mut attempt = 1;
        loop {
            match self.write_file(&filename, content_type, &bytes, now).await {
                Ok(()) => {
                    debug!(%filename, "blob stored");
                    return Ok(filename);
                }
                Err(WriteError::Db(e)) if attempt < NAME_ATTEMPTS && is_unique_violation(&e) => {
                    debug!(%filename, attempt, "stored name taken");
                    filename = disambiguated_name(millis, original_name);
                    attempt += 1;
                }
                Err(WriteError::Db(e)) => return Err(BlobError::storage(e)),
                Err(WriteError::Blob(e)) => return Err(e),
            }
        }
    }

    /// File row plus its chunks in one transaction, rolled back on error.
    async fn write_file(
        &self,
        filename: &str,
        content_type: &str,
        bytes: &Bytes,
        now: DateTime<Utc>,
    ) -> Result<(), WriteError> {
        let chunk_size = i32::try_from(self.chunk_size).map_err(BlobError::storage)?;
        let length = i64::try_from(bytes.len()).map_err(BlobError::storage)?;
        let file_id = Uuid::new_v4();

        let txn = self.db.begin().await?;
        upload_file::ActiveModel {
            id: Set(file_id),
            filename: Set(filename.to_string()),
            content_type: Set(content_type_or_default(content_type)),
            length: Set(length),
            chunk_size: Set(chunk_size),
            uploaded_at: Set(now.fixed_offset()),
        }
        .insert(&txn)
        .await?;

        for (n, chunk) in bytes.chunks(self.chunk_size).enumerate() {
            upload_chunk::ActiveModel {
                id: Set(Uuid::new_v4()),
                file_id: Set(file_id),
                n: Set(i32::try_from(n).map_err(BlobError::storage)?),
                data: Set(chunk.to_vec()),
            }
            .insert(&txn)
            .await?;
        }
        txn.commit().await?;
        Ok(())
    }

    async fn find_file(&self, name: &str) -> Result<Option<upload_file::Model>, BlobError> {
        upload_file::Entity::find()
            .filter(upload_file::Column::Filename.eq(name))
            .one(&self.db)
            .await
            .map_err(BlobError::storage)
    }
}

enum WriteError {
    Db(DbErr),
    Blob(BlobError),
}

impl From<DbErr> for WriteError {
    fn from(e: DbErr) -> Self { WriteError::Db(e) }
}

impl From<BlobError> for WriteError {
    fn from(e: BlobError) -> Self { WriteError::Blob(e) }
}

fn is_unique_violation(e: &DbErr) -> bool {
    matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

fn to_ref(m: &upload_file::Model) -> BlobRef {
    BlobRef {
        id: m.id,
        filename: m.filename.clone(),
        content_type: m.content_type.clone(),
        length: u64::try_from(m.length).unwrap_or_default(),
        uploaded_at: m.uploaded_at,
    }
}

#[async_trait]
impl BlobStore for SeaOrmBlobStore {
    async fn upload(&self, original_name: &str, content_type: &str, bytes: Bytes) -> Result<String, BlobError> {
        self.upload_at(Utc::now(), original_name, content_type, bytes).await
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<BlobRef>, BlobError> {
        Ok(self.find_file(name).await?.as_ref().map(to_ref))
    }

    #[instrument(skip(self))]
    async fn open_download_stream(&self, name: &str) -> Result<BlobDownload, BlobError> {
        let file = self.find_file(name).await?.ok_or_else(|| BlobError::NotFound(name.to_string()))?;
        let blob = to_ref(&file);
        let count = file.chunk_count();
        let file_id = file.id;
        let db = self.db.clone();

        // One chunk row in memory at a time; stop after the first failure.
        let stream = futures_util::stream::unfold(0i32, move |n| {
            let db = db.clone();
            async move {
                if n >= count {
                    return None;
                }
                let item = match upload_chunk::Entity::find()
                    .filter(upload_chunk::Column::FileId.eq(file_id))
                    .filter(upload_chunk::Column::N.eq(n))
                    .one(&db)
                    .await
                {
                    Ok(Some(chunk)) => Ok(Bytes::from(chunk.data)),
                    Ok(None) => Err(BlobError::Storage(format!("missing chunk {} of {}", n, file_id))),
                    Err(e) => Err(BlobError::storage(e)),
                };
                let next = if item.is_ok() { n + 1 } else { count };
                Some((item, next))
            }
        })
        .boxed();

        Ok(BlobDownload { blob, stream })
    }

    #[instrument(skip(self))]
    async fn delete(&self, name: &str) -> Result<bool, BlobError> {
        let Some(file) = self.find_file(name).await? else {
            return Ok(false);
        };
        let txn = self.db.begin().await.map_err(BlobError::storage)?;
        upload_chunk::Entity::delete_many()
            .filter(upload_chunk::Column::FileId.eq(file.id))
            .exec(&txn)
            .await
            .map_err(BlobError::storage)?;
        upload_file::Entity::delete_by_id(file.id)
            .exec(&txn)
            .await
            .map_err(BlobError::storage)?;
        txn.commit().await.map_err(BlobError::storage)?;
        Ok(true)
    }
}
