mod download_and_extract;
mod health;
mod list_files;
mod responses;
mod upload;

pub use download_and_extract::{DownloadAndExtractRequest, download_and_extract_handler};
pub use health::health_handler;
pub use list_files::{ListFilesParams, list_files_handler};
pub use responses::{ErrorResponse, MessageResponse};
pub use upload::{
    UPLOAD_FIELD, UPLOAD_MISSING_MESSAGE, UPLOAD_SUCCESS_MESSAGE, upload_handler,
};
