//! Conversion between ISBN-10 and ISBN-13 and check-digit computation

use crate::validators::{
    isbn10_weighted_sum, isbn13_check_value, isbn13_weighted_sum, normalize_isbn, validate_isbn,
    IsbnKind,
};

/// EAN "Bookland" prefix prepended when converting an ISBN-10
pub const BOOKLAND_PREFIX: &str = "978";

/// Convert a valid ISBN-10 to its ISBN-13 form
///
/// Returns `None` when the input does not normalize to a valid ISBN-10.
/// Failing to convert is a common, expected case (wrong length, bad
/// checksum), so it is not an error.
///
/// # Examples
/// ```
/// use bookshelf_isbn::convert_isbn10_to_13;
/// assert_eq!(convert_isbn10_to_13("0-12345-678-9").as_deref(), Some("9780123456786"));
/// assert_eq!(convert_isbn10_to_13("0123456788"), None);
/// ```
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn convert_isbn10_to_13(isbn10: &str) -> Option<String> {
    let cleaned = normalize_isbn(isbn10);
    let result = validate_isbn(&cleaned);
    if result.kind != Some(IsbnKind::Isbn10) || !result.is_valid {
        return None;
    }

    let mut isbn13 = String::with_capacity(13);
    isbn13.push_str(BOOKLAND_PREFIX);
    isbn13.push_str(&cleaned[..9]);

    let check = isbn13_check_digit(&isbn13)?;
    isbn13.push(check);
    Some(isbn13)
}

/// Compute the ISBN-13 check digit for twelve body digits
///
/// Returns `None` unless `body` is exactly twelve ASCII digits.
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn isbn13_check_digit(body: &str) -> Option<char> {
    if body.len() != 12 {
        return None;
    }
    let sum = isbn13_weighted_sum(body)?;
    char::from_digit(isbn13_check_value(sum), 10)
}

/// Compute the ISBN-10 check character (`0`-`9` or `X`) for nine body digits
///
/// Returns `None` unless `body` is exactly nine ASCII digits.
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn isbn10_check_digit(body: &str) -> Option<char> {
    if body.len() != 9 {
        return None;
    }
    let sum = isbn10_weighted_sum(body)?;
    match (11 - sum % 11) % 11 {
        10 => Some('X'),
        value => char::from_digit(value, 10),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_with_x_check_digit() {
        assert_eq!(
            convert_isbn10_to_13("080442957X").as_deref(),
            Some("9780804429573")
        );
        assert_eq!(
            convert_isbn10_to_13("0-8044-2957-x").as_deref(),
            Some("9780804429573")
        );
    }

    #[test]
    fn test_convert_rejects_isbn13_input() {
        assert_eq!(convert_isbn10_to_13("9780123456786"), None);
    }

    #[test]
    fn test_convert_rejects_wrong_length() {
        assert_eq!(convert_isbn10_to_13("123456"), None);
        assert_eq!(convert_isbn10_to_13(""), None);
    }

    #[test]
    fn test_isbn13_check_digit() {
        assert_eq!(isbn13_check_digit("978012345678"), Some('6'));
        assert_eq!(isbn13_check_digit("978080442957"), Some('3'));
        assert_eq!(isbn13_check_digit("97801234567"), None);
        assert_eq!(isbn13_check_digit("97801234567X"), None);
    }

    #[test]
    fn test_isbn10_check_digit() {
        assert_eq!(isbn10_check_digit("012345678"), Some('9'));
        assert_eq!(isbn10_check_digit("080442957"), Some('X'));
        assert_eq!(isbn10_check_digit("030640615"), Some('2'));
        assert_eq!(isbn10_check_digit("0123"), None);
    }
}
