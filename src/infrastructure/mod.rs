pub mod google_drive;
pub mod observability;
pub mod storage;
pub mod text_processing;
