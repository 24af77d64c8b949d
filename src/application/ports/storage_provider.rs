use std::io;

use bytes::Bytes;
use futures::stream::BoxStream;

use crate::domain::{FileId, FolderId, RemoteFile};

/// A remote file body, streamed as it arrives.
pub struct FileDownload {
    pub content_length: Option<u64>,
    pub stream: BoxStream<'static, Result<Bytes, io::Error>>,
}

#[async_trait::async_trait]
pub trait StorageProvider: Send + Sync {
    /// Every non-trashed child of the folder, most recently modified first.
    async fn list_files(&self, folder_id: &FolderId) -> Result<Vec<RemoteFile>, ProviderError>;

    async fn download(&self, file_id: &FileId) -> Result<FileDownload, ProviderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("authentication failed: {0}")]
    Authentication(String),
    #[error("request failed: {0}")]
    Request(String),
    #[error("provider returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),
}
