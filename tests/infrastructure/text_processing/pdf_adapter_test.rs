use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use docfields::application::ports::{FileLoader, FileLoaderError};
use docfields::domain::extract_fields;
use docfields::infrastructure::text_processing::{PdfAdapter, collect_page_texts};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn write_temp(content: &[u8]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content).unwrap();
    file
}

#[tokio::test]
async fn given_two_page_notice_when_extracting_pdf_then_returns_one_text_per_page_in_order() {
    let adapter = PdfAdapter::default();

    let pages = adapter
        .extract_pages(&fixture("two_page_notice.pdf"))
        .await
        .unwrap();

    assert_eq!(pages.len(), 2);
    assert!(pages[0].contains("Avis de passage"));
    assert!(!pages[0].contains("NICE AEROPORT"));
    assert!(pages[1].contains("N° du document"));
}

#[tokio::test]
async fn given_two_page_notice_when_extracting_fields_then_labels_on_second_page_are_found() {
    let adapter = PdfAdapter::new(Duration::from_secs(10));

    let pages = adapter
        .extract_pages(&fixture("two_page_notice.pdf"))
        .await
        .unwrap();
    let result = extract_fields(&pages);

    assert_eq!(result.document_number.as_deref(), Some("ABC-123"));
    assert_eq!(result.registration_code.as_deref(), Some("PARIS-CDG"));
}

#[tokio::test]
async fn given_corrupt_bytes_when_extracting_pdf_then_returns_extraction_failed() {
    let adapter = PdfAdapter::default();
    let file = write_temp(b"not a pdf at all");

    let result = adapter.extract_pages(file.path()).await;

    assert!(matches!(result, Err(FileLoaderError::ExtractionFailed(_))));
}

#[tokio::test]
async fn given_empty_file_when_extracting_pdf_then_returns_extraction_failed() {
    let adapter = PdfAdapter::new(Duration::from_secs(5));
    let file = write_temp(&[]);

    let result = adapter.extract_pages(file.path()).await;

    assert!(matches!(result, Err(FileLoaderError::ExtractionFailed(_))));
}

#[tokio::test]
async fn given_missing_file_when_extracting_pdf_then_returns_extraction_failed() {
    let adapter = PdfAdapter::default();
    let dir = tempfile::TempDir::new().unwrap();

    let result = adapter.extract_pages(&dir.path().join("absent.pdf")).await;

    assert!(matches!(result, Err(FileLoaderError::ExtractionFailed(_))));
}

#[test]
fn given_readable_pages_when_collecting_then_texts_keep_page_order() {
    let pages = collect_page_texts(3, |i| Ok::<_, String>(format!("page {}", i + 1))).unwrap();

    assert_eq!(pages, vec!["page 1", "page 2", "page 3"]);
}

#[test]
fn given_unreadable_second_page_when_collecting_then_whole_document_fails() {
    let mut reads = Vec::new();

    let result = collect_page_texts(3, |i| {
        reads.push(i);
        if i == 1 {
            Err("broken content stream")
        } else {
            Ok("N° du document : ABC-123".to_string())
        }
    });

    let Err(FileLoaderError::PageFailed { page, reason }) = result else {
        panic!("expected page failure, got {result:?}");
    };
    assert_eq!(page, 2);
    assert_eq!(reason, "broken content stream");
    assert_eq!(reads, vec![0, 1]);
}
