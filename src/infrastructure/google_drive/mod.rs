mod credentials;
mod drive_client;
mod token_source;

pub use credentials::{AuthorizedUser, Credentials, CredentialsError, ServiceAccountKey};
pub use drive_client::{FileListPage, GoogleDriveProvider, children_query};
pub use token_source::TokenSource;
