use std::sync::Arc;

use crate::application::ports::{FileLoader, StagingStore, StorageProvider};
use crate::application::services::ExtractionService;

pub struct AppState<F>
where
    F: FileLoader,
{
    pub extraction_service: Arc<ExtractionService<F>>,
    pub storage_provider: Arc<dyn StorageProvider>,
    pub staging_store: Arc<dyn StagingStore>,
}

impl<F> Clone for AppState<F>
where
    F: FileLoader,
{
    fn clone(&self) -> Self {
        Self {
            extraction_service: Arc::clone(&self.extraction_service),
            storage_provider: Arc::clone(&self.storage_provider),
            staging_store: Arc::clone(&self.staging_store),
        }
    }
}
