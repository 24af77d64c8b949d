mod pdf_adapter;

pub use pdf_adapter::{PdfAdapter, collect_page_texts};
