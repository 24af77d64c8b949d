use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use futures::StreamExt;
use futures::stream::BoxStream;

use crate::application::ports::{
    FileDownload, FileLoader, ProviderError, StagingStore, StagingStoreError, StorageProvider,
};
use crate::domain::{ExtractionResult, FileId, StoragePath, extract_fields};

const PROGRESS_STEP_PERCENT: u64 = 10;
const PROGRESS_STEP_BYTES: u64 = 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ExtractionServiceError {
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("staging failed: {0}")]
    Staging(#[from] StagingStoreError),
}

pub struct ExtractionService<F: FileLoader> {
    file_loader: Arc<F>,
    provider: Arc<dyn StorageProvider>,
    staging_store: Arc<dyn StagingStore>,
}

impl<F: FileLoader> ExtractionService<F> {
    pub fn new(
        file_loader: Arc<F>,
        provider: Arc<dyn StorageProvider>,
        staging_store: Arc<dyn StagingStore>,
    ) -> Self {
        Self {
            file_loader,
            provider,
            staging_store,
        }
    }

    /// Downloads the remote file into staging, extracts both fields and removes
    /// the staged copy whatever the outcome.
    #[tracing::instrument(skip(self, file_id), fields(file_id = %file_id))]
    pub async fn download_and_extract(
        &self,
        file_id: &FileId,
    ) -> Result<ExtractionResult, ExtractionServiceError> {
        let download = self.provider.download(file_id).await?;
        let path = StoragePath::for_download(file_id);

        let staged = self.stage(&path, download).await;
        let result = match staged {
            Ok(local) => Ok(self.extract(&local).await),
            Err(e) => Err(e),
        };

        self.discard(&path).await;

        result
    }

    async fn stage(
        &self,
        path: &StoragePath,
        download: FileDownload,
    ) -> Result<PathBuf, ExtractionServiceError> {
        let content_length = download.content_length;
        let stream = with_progress(download, path.to_string());

        let written = self.staging_store.store(path, stream, content_length).await?;
        tracing::info!(path = %path, bytes = written, "Download complete");

        Ok(self.staging_store.locate(path).await?)
    }

    async fn extract(&self, local: &Path) -> ExtractionResult {
        match self.file_loader.extract_pages(local).await {
            Ok(pages) => {
                let result = extract_fields(&pages);
                tracing::info!(
                    page_count = pages.len(),
                    document_number = ?result.document_number,
                    registration_code = ?result.registration_code,
                    "Fields extracted"
                );
                result
            }
            Err(e) => {
                tracing::error!(error = %e, "Field extraction failed, returning empty result");
                ExtractionResult::empty()
            }
        }
    }

    async fn discard(&self, path: &StoragePath) {
        match self.staging_store.delete(path).await {
            Ok(()) => tracing::debug!(path = %path, "Staged file removed"),
            Err(StagingStoreError::NotFound(_)) => {
                tracing::debug!(path = %path, "Staged file already absent");
            }
            Err(e) => tracing::error!(error = %e, path = %path, "Failed to remove staged file"),
        }
    }
}

fn with_progress(
    download: FileDownload,
    path: String,
) -> BoxStream<'static, Result<Bytes, io::Error>> {
    let total = download.content_length.filter(|len| *len > 0);
    let mut received: u64 = 0;
    let mut next_mark: u64 = match total {
        Some(_) => PROGRESS_STEP_PERCENT,
        None => PROGRESS_STEP_BYTES,
    };

    download
        .stream
        .map(move |chunk| {
            if let Ok(bytes) = &chunk {
                received += bytes.len() as u64;
                match total {
                    Some(total) => {
                        let percent = (received * 100 / total).min(100);
                        if percent >= next_mark {
                            tracing::info!(path = %path, percent, "Download progress");
                            next_mark = (percent / PROGRESS_STEP_PERCENT + 1) * PROGRESS_STEP_PERCENT;
                        }
                    }
                    None => {
                        if received >= next_mark {
                            tracing::info!(path = %path, bytes = received, "Download progress");
                            next_mark = (received / PROGRESS_STEP_BYTES + 1) * PROGRESS_STEP_BYTES;
                        }
                    }
                }
            }
            chunk
        })
        .boxed()
}
