use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

/// Entry of a provider folder listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteFile {
    pub id: String,
    pub name: String,
    pub mime_type: String,
    pub modified_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierError {
    #[error("{0} is required")]
    Missing(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileId(String);

impl FileId {
    pub fn parse(raw: Option<&str>) -> Result<Self, IdentifierError> {
        match raw.map(str::trim) {
            Some(id) if !id.is_empty() => Ok(Self(id.to_string())),
            _ => Err(IdentifierError::Missing("file_id")),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FolderId(String);

impl FolderId {
    /// Accepts a bare identifier or a folder URL, with or without a scheme, in
    /// which case the last non-empty path segment is the identifier.
    pub fn parse(raw: Option<&str>) -> Result<Self, IdentifierError> {
        let raw = raw.map(str::trim).unwrap_or_default();

        let id = match Url::parse(raw) {
            Ok(url) if url.has_host() => url
                .path_segments()
                .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
                .unwrap_or_default()
                .to_string(),
            _ => last_path_segment(raw).to_string(),
        };

        if id.is_empty() {
            return Err(IdentifierError::Missing("folder_id"));
        }

        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn last_path_segment(raw: &str) -> &str {
    let path = raw.split(['?', '#']).next().unwrap_or_default();
    path.rsplit('/').find(|s| !s.is_empty()).unwrap_or_default()
}

impl fmt::Display for FolderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
