use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use futures::StreamExt;
use futures::stream::BoxStream;
use object_store::local::LocalFileSystem;
use object_store::path::Path as StorePath;
use object_store::{MultipartUpload, ObjectStore, PutPayload};

use crate::application::ports::{StagingStore, StagingStoreError};
use crate::domain::StoragePath;

/// Stages files under a local temporary directory.
pub struct LocalStagingStore {
    inner: Arc<LocalFileSystem>,
    base_path: PathBuf,
}

impl LocalStagingStore {
    pub fn new(base_path: PathBuf) -> Result<Self, StagingStoreError> {
        std::fs::create_dir_all(&base_path).map_err(StagingStoreError::Io)?;
        let fs = LocalFileSystem::new_with_prefix(&base_path)
            .map_err(|e| StagingStoreError::WriteFailed(e.to_string()))?;
        Ok(Self {
            inner: Arc::new(fs),
            base_path,
        })
    }

    pub fn base_path(&self) -> &std::path::Path {
        &self.base_path
    }
}

/// Parses rather than converts so names keep their characters on disk.
fn store_path(path: &StoragePath) -> Result<StorePath, StagingStoreError> {
    StorePath::parse(path.as_str()).map_err(|e| StagingStoreError::InvalidPath(e.to_string()))
}

fn not_found_or(
    e: object_store::Error,
    other: fn(String) -> StagingStoreError,
) -> StagingStoreError {
    match e {
        object_store::Error::NotFound { path, .. } => StagingStoreError::NotFound(path),
        e => other(e.to_string()),
    }
}

#[async_trait::async_trait]
impl StagingStore for LocalStagingStore {
    async fn store(
        &self,
        path: &StoragePath,
        mut stream: BoxStream<'_, Result<Bytes, io::Error>>,
        _content_length: Option<u64>,
    ) -> Result<u64, StagingStoreError> {
        let store_path = store_path(path)?;
        let mut upload = self
            .inner
            .put_multipart(&store_path)
            .await
            .map_err(|e| StagingStoreError::WriteFailed(e.to_string()))?;

        let mut total_bytes: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let bytes = match chunk {
                Ok(b) => b,
                Err(e) => {
                    let _ = upload.abort().await;
                    return Err(StagingStoreError::Io(e));
                }
            };
            total_bytes += bytes.len() as u64;
            if let Err(e) = upload.put_part(PutPayload::from(bytes)).await {
                let _ = upload.abort().await;
                return Err(StagingStoreError::WriteFailed(e.to_string()));
            }
        }

        upload
            .complete()
            .await
            .map_err(|e| StagingStoreError::WriteFailed(e.to_string()))?;

        Ok(total_bytes)
    }

    async fn locate(&self, path: &StoragePath) -> Result<PathBuf, StagingStoreError> {
        let store_path = store_path(path)?;
        self.inner
            .head(&store_path)
            .await
            .map_err(|e| not_found_or(e, StagingStoreError::ReadFailed))?;

        self.inner
            .path_to_filesystem(&store_path)
            .map_err(|e| StagingStoreError::ReadFailed(e.to_string()))
    }

    async fn delete(&self, path: &StoragePath) -> Result<(), StagingStoreError> {
        let store_path = store_path(path)?;
        self.inner
            .delete(&store_path)
            .await
            .map_err(|e| not_found_or(e, StagingStoreError::DeleteFailed))
    }
}
