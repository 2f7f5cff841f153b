//! ISBN codec integration tests

use bookshelf_isbn::{
    convert_isbn10_to_13, format_isbn, is_valid_isbn, isbn10_check_digit, normalize_isbn,
    validate_isbn, IsbnKind, ValidationResult,
};
use proptest::prelude::*;
use rstest::rstest;

// === Normalization ===

#[test]
fn test_normalize_lowercase_x() {
    assert_eq!(normalize_isbn("012-345-678-x"), "012345678X");
}

// === Validation ===

#[rstest]
#[case("0123456789", true, Some(IsbnKind::Isbn10))]
#[case("0123456788", false, Some(IsbnKind::Isbn10))]
#[case("080442957X", true, Some(IsbnKind::Isbn10))]
#[case("0-306-40615-2", true, Some(IsbnKind::Isbn10))]
#[case("9780123456786", true, Some(IsbnKind::Isbn13))]
#[case("9780123456787", false, Some(IsbnKind::Isbn13))]
#[case("978-0-123-45678-6", true, Some(IsbnKind::Isbn13))]
#[case("978 0 123 456 78 6", true, Some(IsbnKind::Isbn13))]
#[case("978-0-321-12521-7", true, Some(IsbnKind::Isbn13))]
#[case("123456", false, None)]
#[case("", false, None)]
fn test_validate_isbn(
    #[case] input: &str,
    #[case] is_valid: bool,
    #[case] kind: Option<IsbnKind>,
) {
    assert_eq!(validate_isbn(input), ValidationResult { is_valid, kind });
    assert_eq!(is_valid_isbn(input), is_valid);
}

#[test]
fn test_validation_result_serializes_kind_label() {
    let json = serde_json::to_string(&validate_isbn("0123456789")).unwrap();
    assert_eq!(json, r#"{"is_valid":true,"kind":"ISBN-10"}"#);

    let json = serde_json::to_string(&validate_isbn("42")).unwrap();
    assert_eq!(json, r#"{"is_valid":false,"kind":null}"#);
}

// === Formatting ===

#[rstest]
#[case("0123456789", "0-12345-678-9")]
#[case("9780123456786", "978-0-12345-678-6")]
#[case("080442957X", "0-80442-957-X")]
#[case("12345", "12345")]
#[case("not an isbn", "not an isbn")]
fn test_format_isbn(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(format_isbn(input), expected);
}

// === Conversion ===

#[rstest]
#[case("0123456789", Some("9780123456786"))]
#[case("080442957X", Some("9780804429573"))]
#[case("0-306-40615-2", Some("9780306406157"))]
#[case("0123456788", None)]
#[case("123456", None)]
fn test_convert_isbn10_to_13(#[case] input: &str, #[case] expected: Option<&str>) {
    assert_eq!(convert_isbn10_to_13(input).as_deref(), expected);
}

// === Property-Based Tests ===

proptest! {
    #[test]
    fn test_converted_isbn10_always_validates(body in "[0-9]{9}") {
        let check = isbn10_check_digit(&body).unwrap();
        let isbn10 = format!("{}{}", body, check);
        prop_assert!(validate_isbn(&isbn10).is_valid, "generated ISBN-10 should be valid: {}", isbn10);

        let isbn13 = convert_isbn10_to_13(&isbn10).unwrap();
        let result = validate_isbn(&isbn13);
        prop_assert!(result.is_valid, "converted ISBN-13 should be valid: {}", isbn13);
        prop_assert_eq!(result.kind, Some(IsbnKind::Isbn13));
        prop_assert_eq!(&isbn13[3..12], body.as_str());
    }

    #[test]
    fn test_normalize_idempotent(raw in ".{0,40}") {
        let once = normalize_isbn(&raw);
        prop_assert_eq!(normalize_isbn(&once), once);
    }

    #[test]
    fn test_format_preserves_unformattable_input(raw in "[0-9a-z -]{0,30}") {
        let cleaned_len = normalize_isbn(&raw).len();
        prop_assume!(cleaned_len != 10 && cleaned_len != 13);
        prop_assert_eq!(format_isbn(&raw), raw);
    }

    #[test]
    fn test_single_digit_typo_detected(body in "[0-9]{9}", pos in 0usize..9, delta in 1u32..10) {
        let check = isbn10_check_digit(&body).unwrap();
        let mut chars: Vec<char> = format!("{}{}", body, check).chars().collect();
        let original = chars[pos].to_digit(10).unwrap();
        chars[pos] = char::from_digit((original + delta) % 10, 10).unwrap();
        let typo: String = chars.into_iter().collect();
        prop_assert!(!validate_isbn(&typo).is_valid, "typo should be rejected: {}", typo);
    }
}
