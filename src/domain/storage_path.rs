use std::fmt;

use uuid::Uuid;

use super::FileId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoragePathError {
    #[error("invalid file name: {0:?}")]
    InvalidFileName(String),
}

/// Location of a staged file, relative to the temporary directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePath(String);

impl StoragePath {
    /// A fresh path per download so concurrent requests for one file never collide.
    pub fn for_download(file_id: &FileId) -> Self {
        let stem: String = file_id
            .as_str()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        Self(format!("{}-{}.pdf", stem, Uuid::new_v4()))
    }

    /// Keeps only the final component of a client-supplied name.
    pub fn for_upload(filename: &str) -> Result<Self, StoragePathError> {
        let name = filename
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or_default()
            .trim();

        let reserved = name.is_empty() || name == "." || name == "..";
        if reserved || name.chars().any(char::is_control) {
            return Err(StoragePathError::InvalidFileName(filename.to_string()));
        }

        Ok(Self(name.to_string()))
    }

    pub fn from_raw(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoragePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
