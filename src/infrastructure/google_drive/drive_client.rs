use std::io;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, Response};
use serde::Deserialize;
use url::Url;

use super::token_source::TokenSource;
use crate::application::ports::{FileDownload, ProviderError, StorageProvider};
use crate::domain::{FileId, FolderId, RemoteFile};
use crate::presentation::config::ProviderSettings;

pub const LIST_FIELDS: &str = "nextPageToken, files(id, name, mimeType, modifiedTime)";
pub const LIST_ORDER: &str = "modifiedTime desc";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileListPage {
    #[serde(default)]
    pub files: Vec<RemoteFile>,
    pub next_page_token: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Google Drive v3 files API.
pub struct GoogleDriveProvider {
    client: Client,
    api_base_url: Url,
    page_size: u32,
    tokens: TokenSource,
}

impl GoogleDriveProvider {
    pub fn new(settings: &ProviderSettings) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .map_err(|e| ProviderError::Request(format!("failed to build HTTP client: {e}")))?;

        let api_base_url = Url::parse(&settings.api_base_url).map_err(|e| {
            ProviderError::Request(format!("invalid api_base_url {}: {e}", settings.api_base_url))
        })?;

        let tokens = TokenSource::new(
            client.clone(),
            PathBuf::from(&settings.credentials_path),
            settings.scope.clone(),
            settings.token_url.clone(),
        );

        Ok(Self {
            client,
            api_base_url,
            page_size: settings.page_size,
            tokens,
        })
    }

    fn files_endpoint(&self, file_id: Option<&str>) -> Result<Url, ProviderError> {
        let mut url = self.api_base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                ProviderError::Request(format!(
                    "api_base_url cannot be a base: {}",
                    self.api_base_url
                ))
            })?;
            segments.pop_if_empty().extend(["drive", "v3", "files"]);
            if let Some(id) = file_id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    async fn fetch_page(
        &self,
        token: &str,
        query: &str,
        page_token: Option<&str>,
    ) -> Result<FileListPage, ProviderError> {
        let page_size = self.page_size.to_string();
        let mut request = self
            .client
            .get(self.files_endpoint(None)?)
            .bearer_auth(token)
            .query(&[
                ("q", query),
                ("orderBy", LIST_ORDER),
                ("fields", LIST_FIELDS),
                ("pageSize", page_size.as_str()),
            ]);

        if let Some(page_token) = page_token {
            request = request.query(&[("pageToken", page_token)]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ProviderError::Request(format!("list request failed: {e}")))?;

        ensure_success(response)
            .await?
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("file list parse failed: {e}")))
    }
}

/// Query selecting the non-trashed children of a folder.
pub fn children_query(folder_id: &FolderId) -> String {
    let escaped = folder_id.as_str().replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{escaped}' in parents and trashed = false")
}

async fn ensure_success(response: Response) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&text)
        .map(|body| body.error.message)
        .unwrap_or(text);

    Err(ProviderError::Api {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl StorageProvider for GoogleDriveProvider {
    #[tracing::instrument(skip(self, folder_id), fields(folder_id = %folder_id))]
    async fn list_files(&self, folder_id: &FolderId) -> Result<Vec<RemoteFile>, ProviderError> {
        let token = self.tokens.bearer().await?;
        let query = children_query(folder_id);

        let mut files = Vec::new();
        let mut page_token: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let page = self
                .fetch_page(&token, &query, page_token.as_deref())
                .await?;
            pages += 1;
            files.extend(page.files);

            match page.next_page_token {
                Some(next) if !next.is_empty() => page_token = Some(next),
                _ => break,
            }
        }

        tracing::info!(pages, file_count = files.len(), "Folder listed");

        Ok(files)
    }

    #[tracing::instrument(skip(self, file_id), fields(file_id = %file_id))]
    async fn download(&self, file_id: &FileId) -> Result<FileDownload, ProviderError> {
        let token = self.tokens.bearer().await?;

        let response = self
            .client
            .get(self.files_endpoint(Some(file_id.as_str()))?)
            .bearer_auth(&token)
            .query(&[("alt", "media")])
            .send()
            .await
            .map_err(|e| ProviderError::Request(format!("download request failed: {e}")))?;

        let response = ensure_success(response).await?;
        let content_length = response.content_length();

        tracing::info!(content_length = ?content_length, "Download started");

        let stream = response.bytes_stream().map(|chunk| chunk.map_err(io::Error::other));

        Ok(FileDownload {
            content_length,
            stream: stream.boxed(),
        })
    }
}
