use std::fmt;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use pdf_oxide::PdfDocument;

use crate::application::ports::{FileLoader, FileLoaderError};

const DEFAULT_EXTRACTION_TIMEOUT: Duration = Duration::from_secs(30);

pub struct PdfAdapter {
    timeout: Duration,
}

impl Default for PdfAdapter {
    fn default() -> Self {
        Self::new(DEFAULT_EXTRACTION_TIMEOUT)
    }
}

impl PdfAdapter {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn extract_all_pages(path: &Path) -> Result<Vec<String>, FileLoaderError> {
        let mut doc = PdfDocument::open(path)
            .map_err(|e| FileLoaderError::ExtractionFailed(format!("failed to parse PDF: {e}")))?;

        let page_count = doc.page_count().map_err(|e| {
            FileLoaderError::ExtractionFailed(format!("failed to read page count: {e}"))
        })?;

        collect_page_texts(page_count, |page_index| doc.extract_text(page_index))
    }
}

/// Reads pages `0..page_count` in order. The first unreadable page fails the
/// whole document.
pub fn collect_page_texts<E: fmt::Display>(
    page_count: usize,
    mut read_page: impl FnMut(usize) -> Result<String, E>,
) -> Result<Vec<String>, FileLoaderError> {
    let mut pages = Vec::with_capacity(page_count);

    for page_index in 0..page_count {
        let text = read_page(page_index).map_err(|e| FileLoaderError::PageFailed {
            page: page_index + 1,
            reason: e.to_string(),
        })?;
        pages.push(text);
    }

    Ok(pages)
}

#[async_trait]
impl FileLoader for PdfAdapter {
    #[tracing::instrument(skip(self, path), fields(path = %path.display()))]
    async fn extract_pages(&self, path: &Path) -> Result<Vec<String>, FileLoaderError> {
        let path = path.to_path_buf();

        let pages = tokio::time::timeout(
            self.timeout,
            tokio::task::spawn_blocking(move || Self::extract_all_pages(&path)),
        )
        .await
        .map_err(|_| FileLoaderError::ExtractionFailed("PDF extraction timed out".to_string()))?
        .map_err(|e| FileLoaderError::ExtractionFailed(format!("task join error: {e}")))??;

        tracing::info!(page_count = pages.len(), "PDF text extraction complete");

        Ok(pages)
    }
}
