mod file_loader;
mod staging_store;
mod storage_provider;

pub use file_loader::{FileLoader, FileLoaderError};
pub use staging_store::{StagingStore, StagingStoreError};
pub use storage_provider::{FileDownload, ProviderError, StorageProvider};
