//! ISBN extraction from free text

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::validators::{normalize_isbn, validate_isbn, IsbnKind};

/// Extracted ISBN with position information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct ExtractedIsbn {
    /// Normalized, checksum-valid ISBN
    pub value: String,
    pub kind: IsbnKind,
    /// Byte offsets of the matched text (before normalization)
    pub start_index: u32,
    pub end_index: u32,
}

lazy_static! {
    // ISBN regex: ISBN-10 and ISBN-13 with optional "ISBN" label, hyphens or spaces
    static ref ISBN_REGEX: Regex = Regex::new(
        r"(?i)(?:isbn(?:-1[03])?[:\s-]*)?(?P<isbn>(?:97[89][- ]?)?(?:\d[- ]?){9}[\dxX])"
    ).unwrap();
}

/// Extract checksum-valid ISBNs from text, normalized
///
/// # Examples
/// ```
/// use bookshelf_isbn::extract_isbns;
/// let isbns = extract_isbns("Back cover: ISBN 978-0-123-45678-6 (pbk), 0-8044-2957-X (hbk)");
/// assert_eq!(isbns, vec!["9780123456786", "080442957X"]);
/// ```
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn extract_isbns(text: &str) -> Vec<String> {
    extract_isbns_with_positions(text)
        .into_iter()
        .map(|found| found.value)
        .collect()
}

/// Extract checksum-valid ISBNs with their positions, in text order
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn extract_isbns_with_positions(text: &str) -> Vec<ExtractedIsbn> {
    ISBN_REGEX
        .captures_iter(text)
        .filter_map(|cap| cap.name("isbn"))
        .filter_map(|m| {
            let value = normalize_isbn(m.as_str());
            let result = validate_isbn(&value);
            match result.kind {
                Some(kind) if result.is_valid => Some(ExtractedIsbn {
                    value,
                    kind,
                    start_index: m.start() as u32,
                    end_index: m.end() as u32,
                }),
                _ => None,
            }
        })
        .collect()
}

/// First checksum-valid ISBN in the text, if any
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn first_isbn(text: &str) -> Option<String> {
    extract_isbns_with_positions(text)
        .into_iter()
        .next()
        .map(|found| found.value)
}
