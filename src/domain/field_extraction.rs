use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use super::ExtractionResult;

static DOCUMENT_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"N° du document\s*:\s*([\w-]+)").unwrap());

static REGISTRATION_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"NICE AEROPORT(.*)").unwrap());

// Longest names first so "NICE AEROPORT" is not left as "AEROPORT".
static KNOWN_LOCATIONS: LazyLock<Regex> = LazyLock::new(|| {
    RegexBuilder::new(r"NICE AEROPORT|CAGNES SUR MER|NICE")
        .case_insensitive(true)
        .build()
        .unwrap()
});

/// Scans pages in order and captures both fields, first match wins per field.
pub fn extract_fields<S: AsRef<str>>(pages: &[S]) -> ExtractionResult {
    ExtractionResult {
        document_number: find_document_number(pages),
        registration_code: find_registration_code(pages),
    }
}

pub fn find_document_number<S: AsRef<str>>(pages: &[S]) -> Option<String> {
    pages.iter().find_map(|page| {
        DOCUMENT_NUMBER
            .captures(page.as_ref())
            .map(|caps| caps[1].to_string())
    })
}

pub fn find_registration_code<S: AsRef<str>>(pages: &[S]) -> Option<String> {
    pages.iter().find_map(|page| {
        REGISTRATION_LINE
            .captures(page.as_ref())
            .map(|caps| normalize_registration_code(&caps[1]))
    })
}

/// Drops known location names from the captured tail and hyphenates what remains.
pub fn normalize_registration_code(raw: &str) -> String {
    let stripped = KNOWN_LOCATIONS.replace_all(raw.trim(), "");
    stripped.trim().replace(' ', "-")
}
