use crate::cli::utils::*;

#[test]
fn test_truncate_short_string_unchanged() {
    assert_eq!(truncate_with_ellipsis("short", 10), "short");
}

#[test]
fn test_truncate_long_string_adds_ellipsis() {
    assert_eq!(truncate_with_ellipsis("abcdefghijkl", 8), "abcde...");
}

#[test]
fn test_truncate_counts_chars_not_bytes() {
    assert_eq!(truncate_with_ellipsis("ääääää", 6), "ääääää");
    assert_eq!(truncate_with_ellipsis("äääääää", 6), "äää...");
}

#[test]
fn test_format_optional_millis() {
    assert_eq!(format_optional_millis(None), "-");
    assert_eq!(format_optional_millis(Some(0)), "1970-01-01 00:00");
}

#[test]
fn test_check() {
    assert_eq!(check(true), "✓");
    assert_eq!(check(false), "");
}
