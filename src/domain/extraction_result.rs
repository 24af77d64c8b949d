use serde::Serialize;

/// Fields captured from a single document. Either may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionResult {
    #[serde(rename = "doc_num")]
    pub document_number: Option<String>,
    #[serde(rename = "immat_info")]
    pub registration_code: Option<String>,
}

impl ExtractionResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_complete(&self) -> bool {
        self.document_number.is_some() && self.registration_code.is_some()
    }
}
