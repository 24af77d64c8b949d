use std::path::Path;

use async_trait::async_trait;

/// Turns a document on disk into per-page text, in page order.
#[async_trait]
pub trait FileLoader: Send + Sync {
    async fn extract_pages(&self, path: &Path) -> Result<Vec<String>, FileLoaderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum FileLoaderError {
    #[error("extraction failed: {0}")]
    ExtractionFailed(String),
    #[error("extraction of page {page} failed: {reason}")]
    PageFailed { page: usize, reason: String },
}
