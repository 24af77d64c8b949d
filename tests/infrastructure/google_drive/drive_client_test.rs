use futures::StreamExt;
use wiremock::matchers::{
    body_string_contains, header, method, path, query_param, query_param_is_missing,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

use docfields::application::ports::{ProviderError, StorageProvider};
use docfields::domain::{FileId, FolderId};
use docfields::infrastructure::google_drive::{GoogleDriveProvider, children_query};
use docfields::presentation::config::ProviderSettings;

const FOLDER: &str = "folder-42";

fn settings(server: &MockServer, credentials_path: &std::path::Path) -> ProviderSettings {
    ProviderSettings {
        credentials_path: credentials_path.display().to_string(),
        scope: "https://www.googleapis.com/auth/drive.readonly".to_string(),
        api_base_url: server.uri(),
        token_url: format!("{}/token", server.uri()),
        page_size: 2,
        request_timeout_secs: 5,
    }
}

fn write_credentials(dir: &tempfile::TempDir, json: &str) -> std::path::PathBuf {
    let path = dir.path().join("token.json");
    std::fs::write(&path, json).unwrap();
    path
}

fn static_token_provider(server: &MockServer, dir: &tempfile::TempDir) -> GoogleDriveProvider {
    let credentials = write_credentials(dir, r#"{"token": "static-token"}"#);
    GoogleDriveProvider::new(&settings(server, &credentials)).unwrap()
}

fn file_entry(id: &str, modified: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": format!("{id}.pdf"),
        "mimeType": "application/pdf",
        "modifiedTime": modified,
    })
}

#[test]
fn given_folder_id_when_building_query_then_excludes_trashed_children() {
    let folder = FolderId::parse(Some("abc")).unwrap();

    assert_eq!(children_query(&folder), "'abc' in parents and trashed = false");
}

#[tokio::test]
async fn given_paginated_folder_when_listing_then_all_pages_are_accumulated_in_order() {
    let server = MockServer::start().await;
    let dir = tempfile::TempDir::new().unwrap();
    let provider = static_token_provider(&server, &dir);

    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .and(header("authorization", "Bearer static-token"))
        .and(query_param("q", "'folder-42' in parents and trashed = false"))
        .and(query_param("orderBy", "modifiedTime desc"))
        .and(query_param("pageSize", "2"))
        .and(query_param_is_missing("pageToken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "files": [
                file_entry("newest", "2024-05-03T00:00:00.000Z"),
                file_entry("middle", "2024-05-02T00:00:00.000Z"),
            ],
            "nextPageToken": "page-2",
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .and(query_param("pageToken", "page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "files": [file_entry("oldest", "2024-05-01T00:00:00.000Z")],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let folder = FolderId::parse(Some(FOLDER)).unwrap();
    let files = provider.list_files(&folder).await.unwrap();

    let ids: Vec<&str> = files.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, vec!["newest", "middle", "oldest"]);
    assert_eq!(files[2].modified_time, "2024-05-01T00:00:00.000Z");
}

#[tokio::test]
async fn given_folder_url_and_bare_id_when_listing_then_results_are_identical() {
    let server = MockServer::start().await;
    let dir = tempfile::TempDir::new().unwrap();
    let provider = static_token_provider(&server, &dir);

    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .and(query_param("q", "'folder-42' in parents and trashed = false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "files": [file_entry("only", "2024-05-01T00:00:00.000Z")],
        })))
        .expect(2)
        .mount(&server)
        .await;

    let from_url =
        FolderId::parse(Some("https://drive.google.com/drive/folders/folder-42")).unwrap();
    let bare = FolderId::parse(Some(FOLDER)).unwrap();

    let via_url = provider.list_files(&from_url).await.unwrap();
    let via_id = provider.list_files(&bare).await.unwrap();

    assert_eq!(via_url, via_id);
}

#[tokio::test]
async fn given_provider_error_body_when_listing_then_message_is_surfaced() {
    let server = MockServer::start().await;
    let dir = tempfile::TempDir::new().unwrap();
    let provider = static_token_provider(&server, &dir);

    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "error": {"code": 404, "message": "File not found: folder-42."}
        })))
        .mount(&server)
        .await;

    let folder = FolderId::parse(Some(FOLDER)).unwrap();
    let result = provider.list_files(&folder).await;

    let Err(ProviderError::Api { status, message }) = result else {
        panic!("expected api error");
    };
    assert_eq!(status, 404);
    assert_eq!(message, "File not found: folder-42.");
}

#[tokio::test]
async fn given_file_id_when_downloading_then_streams_media_content() {
    let server = MockServer::start().await;
    let dir = tempfile::TempDir::new().unwrap();
    let provider = static_token_provider(&server, &dir);

    Mock::given(method("GET"))
        .and(path("/drive/v3/files/file-7"))
        .and(query_param("alt", "media"))
        .and(header("authorization", "Bearer static-token"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.4 body".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let file_id = FileId::parse(Some("file-7")).unwrap();
    let download = provider.download(&file_id).await.unwrap();

    assert_eq!(download.content_length, Some(13));
    let chunks: Vec<_> = download.stream.collect().await;
    let body: Vec<u8> = chunks
        .into_iter()
        .flat_map(|chunk| chunk.unwrap().to_vec())
        .collect();
    assert_eq!(body, b"%PDF-1.4 body");
}

#[tokio::test]
async fn given_expired_token_when_requesting_then_refreshes_once_and_caches() {
    let server = MockServer::start().await;
    let dir = tempfile::TempDir::new().unwrap();
    let credentials = write_credentials(
        &dir,
        &format!(
            r#"{{
                "token": "stale",
                "expiry": "2000-01-01T00:00:00Z",
                "refresh_token": "refresh-me",
                "client_id": "client",
                "client_secret": "secret",
                "token_uri": "{}/oauth/token"
            }}"#,
            server.uri()
        ),
    );
    let provider = GoogleDriveProvider::new(&settings(&server, &credentials)).unwrap();

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=refresh-me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "fresh-token",
            "expires_in": 3599,
            "token_type": "Bearer",
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .and(header("authorization", "Bearer fresh-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"files": []})))
        .expect(2)
        .mount(&server)
        .await;

    let folder = FolderId::parse(Some(FOLDER)).unwrap();
    assert!(provider.list_files(&folder).await.unwrap().is_empty());
    assert!(provider.list_files(&folder).await.unwrap().is_empty());
}

#[tokio::test]
async fn given_expired_token_without_refresh_token_when_requesting_then_fails_authentication() {
    let server = MockServer::start().await;
    let dir = tempfile::TempDir::new().unwrap();
    let credentials = write_credentials(
        &dir,
        r#"{"token": "stale", "expiry": "2000-01-01T00:00:00Z"}"#,
    );
    let provider = GoogleDriveProvider::new(&settings(&server, &credentials)).unwrap();

    let folder = FolderId::parse(Some(FOLDER)).unwrap();
    let result = provider.list_files(&folder).await;

    assert!(matches!(result, Err(ProviderError::Authentication(_))));
}

#[tokio::test]
async fn given_missing_credentials_file_when_downloading_then_fails_authentication() {
    let server = MockServer::start().await;
    let dir = tempfile::TempDir::new().unwrap();
    let provider =
        GoogleDriveProvider::new(&settings(&server, &dir.path().join("missing.json"))).unwrap();

    let file_id = FileId::parse(Some("file-7")).unwrap();
    let result = provider.download(&file_id).await;

    assert!(matches!(result, Err(ProviderError::Authentication(_))));
}

#[tokio::test]
async fn given_rejected_refresh_when_requesting_then_error_carries_token_endpoint_status() {
    let server = MockServer::start().await;
    let dir = tempfile::TempDir::new().unwrap();
    let credentials = write_credentials(
        &dir,
        r#"{"refresh_token": "revoked", "client_id": "c", "client_secret": "s"}"#,
    );
    let provider = GoogleDriveProvider::new(&settings(&server, &credentials)).unwrap();

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(
            ResponseTemplate::new(400).set_body_string(r#"{"error": "invalid_grant"}"#),
        )
        .mount(&server)
        .await;

    let folder = FolderId::parse(Some(FOLDER)).unwrap();
    let result = provider.list_files(&folder).await;

    let Err(ProviderError::Authentication(message)) = result else {
        panic!("expected authentication error");
    };
    assert!(message.contains("400"));
    assert!(message.contains("invalid_grant"));
}
