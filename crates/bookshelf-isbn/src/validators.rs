//! ISBN normalization and check-digit validation

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which ISBN scheme a cleaned string was checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Enum))]
pub enum IsbnKind {
    #[serde(rename = "ISBN-10")]
    Isbn10,
    #[serde(rename = "ISBN-13")]
    Isbn13,
}

impl IsbnKind {
    /// Number of characters in a normalized ISBN of this kind
    pub fn char_count(&self) -> usize {
        match self {
            IsbnKind::Isbn10 => 10,
            IsbnKind::Isbn13 => 13,
        }
    }

    /// Kind for a normalized length, if it is one of the two valid lengths
    pub fn from_len(len: usize) -> Option<Self> {
        match len {
            10 => Some(IsbnKind::Isbn10),
            13 => Some(IsbnKind::Isbn13),
            _ => None,
        }
    }
}

impl fmt::Display for IsbnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IsbnKind::Isbn10 => write!(f, "ISBN-10"),
            IsbnKind::Isbn13 => write!(f, "ISBN-13"),
        }
    }
}

/// Outcome of [`validate_isbn`]
///
/// `kind` is `None` only when the cleaned input is neither 10 nor 13
/// characters long. A `kind` with `is_valid == false` means the length
/// matched but the checksum (or a character) did not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct ValidationResult {
    pub is_valid: bool,
    pub kind: Option<IsbnKind>,
}

impl ValidationResult {
    fn unknown() -> Self {
        Self {
            is_valid: false,
            kind: None,
        }
    }
}

/// Normalize an ISBN by removing everything except digits and `X`
///
/// Hyphens, spaces and any other punctuation are dropped and a lowercase
/// `x` is uppercased. No length check is made here.
///
/// # Examples
/// ```
/// use bookshelf_isbn::normalize_isbn;
/// assert_eq!(normalize_isbn("012-345-678-x"), "012345678X");
/// assert_eq!(normalize_isbn(""), "");
/// ```
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn normalize_isbn(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || *c == 'X' || *c == 'x')
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Validate an ISBN-10 or ISBN-13 after normalizing it
///
/// # Examples
/// ```
/// use bookshelf_isbn::{validate_isbn, IsbnKind};
/// let result = validate_isbn("978-0-123-45678-6");
/// assert!(result.is_valid);
/// assert_eq!(result.kind, Some(IsbnKind::Isbn13));
/// ```
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn validate_isbn(raw: &str) -> ValidationResult {
    let cleaned = normalize_isbn(raw);

    match IsbnKind::from_len(cleaned.len()) {
        Some(IsbnKind::Isbn10) => ValidationResult {
            is_valid: validate_isbn10(&cleaned),
            kind: Some(IsbnKind::Isbn10),
        },
        Some(IsbnKind::Isbn13) => ValidationResult {
            is_valid: validate_isbn13(&cleaned),
            kind: Some(IsbnKind::Isbn13),
        },
        None => ValidationResult::unknown(),
    }
}

/// Shorthand for `validate_isbn(raw).is_valid`
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn is_valid_isbn(raw: &str) -> bool {
    validate_isbn(raw).is_valid
}

/// Validate ISBN-10 checksum on an already normalized string
fn validate_isbn10(isbn: &str) -> bool {
    if isbn.len() != 10 {
        return false;
    }

    let (body, check) = isbn.split_at(9);
    let Some(sum) = isbn10_weighted_sum(body) else {
        return false;
    };

    let check_value = match check.chars().next() {
        Some('X') => 10,
        Some(c) => match c.to_digit(10) {
            Some(d) => d,
            None => return false,
        },
        None => return false,
    };

    (sum + check_value) % 11 == 0
}

/// Validate ISBN-13 checksum on an already normalized string
fn validate_isbn13(isbn: &str) -> bool {
    if isbn.len() != 13 {
        return false;
    }

    let (body, check) = isbn.split_at(12);
    let Some(expected) = isbn13_weighted_sum(body).map(isbn13_check_value) else {
        return false;
    };

    // `X` is never a legal ISBN-13 character, so to_digit rejects it here
    match check.chars().next().and_then(|c| c.to_digit(10)) {
        Some(actual) => actual == expected,
        None => false,
    }
}

/// `Σ digit[i] * (10 - i)` over the nine body digits of an ISBN-10
pub(crate) fn isbn10_weighted_sum(body: &str) -> Option<u32> {
    body.chars()
        .enumerate()
        .map(|(i, c)| c.to_digit(10).map(|d| d * (10 - i as u32)))
        .sum()
}

/// `Σ digit[i] * (1 | 3)` over the twelve body digits of an ISBN-13
pub(crate) fn isbn13_weighted_sum(body: &str) -> Option<u32> {
    body.chars()
        .enumerate()
        .map(|(i, c)| {
            c.to_digit(10)
                .map(|d| if i % 2 == 0 { d } else { d * 3 })
        })
        .sum()
}

pub(crate) fn isbn13_check_value(sum: u32) -> u32 {
    (10 - (sum % 10)) % 10
}
