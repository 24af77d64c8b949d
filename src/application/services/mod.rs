mod extraction_service;

pub use extraction_service::{ExtractionService, ExtractionServiceError};
