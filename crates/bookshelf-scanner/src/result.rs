//! The result contract shared by camera scans and manual entry

use bookshelf_isbn::{convert_isbn10_to_13, format_isbn, validate_isbn, IsbnKind};
use serde::{Deserialize, Serialize};

/// A scanned or entered ISBN handed to the caller
///
/// Produced once per successful scan or manual submission. Camera and
/// manual paths build it the same way, so callers need only this one type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct ScanResult {
    /// Normalized ISBN (digits and a possible trailing `X`)
    pub isbn: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScanResult {
    /// A successful result for an already normalized ISBN
    pub fn success(isbn: impl Into<String>) -> Self {
        Self {
            isbn: isbn.into(),
            success: true,
            error: None,
        }
    }

    /// ISBN-10 or ISBN-13, from the length of `isbn`
    pub fn kind(&self) -> Option<IsbnKind> {
        validate_isbn(&self.isbn).kind
    }

    /// Hyphenated form for display
    pub fn formatted(&self) -> String {
        format_isbn(&self.isbn)
    }

    /// The ISBN-13 form, converting an ISBN-10 if needed
    pub fn isbn13(&self) -> Option<String> {
        match self.kind()? {
            IsbnKind::Isbn13 => Some(self.isbn.clone()),
            IsbnKind::Isbn10 => convert_isbn10_to_13(&self.isbn),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_result_json() {
        let result = ScanResult::success("9780123456786");
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"isbn":"9780123456786","success":true}"#);

        let parsed: ScanResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, result);
    }

    #[test]
    fn test_isbn13_from_isbn10() {
        let result = ScanResult::success("080442957X");
        assert_eq!(result.kind(), Some(IsbnKind::Isbn10));
        assert_eq!(result.isbn13().as_deref(), Some("9780804429573"));
        assert_eq!(result.formatted(), "0-80442-957-X");
    }

    #[test]
    fn test_isbn13_passthrough() {
        let result = ScanResult::success("9780123456786");
        assert_eq!(result.isbn13().as_deref(), Some("9780123456786"));
    }
}
