mod extraction_result;
mod field_extraction;
mod remote_file;
mod storage_path;

pub use extraction_result::ExtractionResult;
pub use field_extraction::{
    extract_fields, find_document_number, find_registration_code, normalize_registration_code,
};
pub use remote_file::{FileId, FolderId, IdentifierError, RemoteFile};
pub use storage_path::{StoragePath, StoragePathError};
