//! Manual ISBN entry, the fallback when the camera cannot read a barcode

use bookshelf_isbn::{is_valid_isbn, normalize_isbn};

use crate::error::ManualEntryError;
use crate::result::ScanResult;

/// Validate free-text ISBN input and build the same result a scan would
///
/// The input is normalized and must be a checksum-valid ISBN-10 or
/// ISBN-13 as a whole. Extra digits are never dropped to find a match.
pub fn validate_manual_isbn(input: &str) -> Result<ScanResult, ManualEntryError> {
    let cleaned = normalize_isbn(input);
    if cleaned.is_empty() {
        return Err(ManualEntryError::Empty);
    }

    if !is_valid_isbn(&cleaned) {
        return Err(ManualEntryError::Malformed);
    }
    Ok(ScanResult::success(cleaned))
}

/// State of the manual entry form
#[derive(Debug, Clone)]
pub struct ManualIsbnEntry {
    input: String,
    error: Option<ManualEntryError>,
    max_len: usize,
}

impl ManualIsbnEntry {
    pub fn new(max_len: usize) -> Self {
        Self {
            input: String::new(),
            error: None,
            max_len,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Inline message for the last rejected submission
    pub fn error(&self) -> Option<&ManualEntryError> {
        self.error.as_ref()
    }

    /// Replace the input, truncated to the configured length
    ///
    /// Typing clears a previous rejection message.
    pub fn set_input(&mut self, value: &str) {
        self.input = value.chars().take(self.max_len).collect();
        self.error = None;
    }

    /// Whether the submit button should be enabled
    pub fn can_submit(&self) -> bool {
        !self.input.trim().is_empty()
    }

    /// Validate the input; on success the form is cleared
    pub fn submit(&mut self) -> Result<ScanResult, ManualEntryError> {
        match validate_manual_isbn(&self.input) {
            Ok(result) => {
                self.clear();
                Ok(result)
            }
            Err(err) => {
                self.error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Reset input and message (cancel)
    pub fn clear(&mut self) {
        self.input.clear();
        self.error = None;
    }
}

impl Default for ManualIsbnEntry {
    fn default() -> Self {
        Self::new(17)
    }
}
