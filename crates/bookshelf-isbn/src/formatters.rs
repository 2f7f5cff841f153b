//! Hyphenated display formatting

use crate::validators::{normalize_isbn, IsbnKind};

/// Group sizes used when hyphenating an ISBN-10 (`0-12345-678-9`)
const ISBN10_GROUPS: [usize; 4] = [1, 5, 3, 1];

/// Group sizes used when hyphenating an ISBN-13 (`978-0-12345-678-6`)
const ISBN13_GROUPS: [usize; 5] = [3, 1, 5, 3, 1];

/// Format an ISBN with hyphens between fixed-size groups
///
/// The input is normalized first. The checksum is not verified; only the
/// cleaned length matters. Input whose cleaned length is neither 10 nor 13
/// is returned exactly as given (not the cleaned form), so callers can
/// detect "unformattable" by comparing the output to the input.
///
/// # Examples
/// ```
/// use bookshelf_isbn::format_isbn;
/// assert_eq!(format_isbn("0123456789"), "0-12345-678-9");
/// assert_eq!(format_isbn("9780123456786"), "978-0-12345-678-6");
/// assert_eq!(format_isbn("12-345"), "12-345");
/// ```
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn format_isbn(raw: &str) -> String {
    let cleaned = normalize_isbn(raw);

    match IsbnKind::from_len(cleaned.len()) {
        Some(IsbnKind::Isbn10) => hyphenate(&cleaned, &ISBN10_GROUPS),
        Some(IsbnKind::Isbn13) => hyphenate(&cleaned, &ISBN13_GROUPS),
        None => raw.to_string(),
    }
}

/// Join consecutive slices of `cleaned` with `-`
///
/// `cleaned` is ASCII and its length equals the sum of `groups`.
fn hyphenate(cleaned: &str, groups: &[usize]) -> String {
    let mut out = String::with_capacity(cleaned.len() + groups.len() - 1);
    let mut start = 0;

    for (i, size) in groups.iter().enumerate() {
        if i > 0 {
            out.push('-');
        }
        out.push_str(&cleaned[start..start + size]);
        start += size;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_isbn10_with_x() {
        assert_eq!(format_isbn("080442957X"), "0-80442-957-X");
        assert_eq!(format_isbn("080442957x"), "0-80442-957-X");
    }

    #[test]
    fn test_format_reformats_existing_hyphens() {
        assert_eq!(format_isbn("978-0-123-45678-6"), "978-0-12345-678-6");
        assert_eq!(format_isbn(" 0 12 345 678 9 "), "0-12345-678-9");
    }

    #[test]
    fn test_format_ignores_checksum() {
        assert_eq!(format_isbn("0123456788"), "0-12345-678-8");
    }

    #[test]
    fn test_format_passthrough_keeps_original() {
        assert_eq!(format_isbn("12345"), "12345");
        assert_eq!(format_isbn("isbn: 1-2"), "isbn: 1-2");
        assert_eq!(format_isbn(""), "");
    }

    #[test]
    fn test_hyphenate_groups_cover_lengths() {
        assert_eq!(ISBN10_GROUPS.iter().sum::<usize>(), IsbnKind::Isbn10.char_count());
        assert_eq!(ISBN13_GROUPS.iter().sum::<usize>(), IsbnKind::Isbn13.char_count());
    }
}
