//! Numeric-only filtering for set input fields.

/// Strip every character that is not an ASCII digit or a `.`
///
/// Multiple dots are kept ("1.2.3" stays as is); such values parse as 0
/// during aggregation.
pub fn sanitize(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit() || *c == '.').collect()
}

/// Parse a sanitized field for aggregation; empty or malformed input is 0.
pub fn parse_numeric(value: &str) -> f64 {
    if value.is_empty() {
        return 0.0;
    }
    match value.parse::<f64>() {
        Ok(n) if n.is_finite() => n,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_non_numeric() {
        assert_eq!(sanitize("12 kg"), "12");
        assert_eq!(sanitize("-5"), "5");
        assert_eq!(sanitize("2,5"), "25");
        assert_eq!(sanitize("abc"), "");
        assert_eq!(sanitize("٣"), "");
    }

    #[test]
    fn test_sanitize_keeps_multiple_dots() {
        assert_eq!(sanitize("1.2.3"), "1.2.3");
        assert_eq!(sanitize("..5"), "..5");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let inputs = ["", "100", "12.5kg", "1.2.3", "x-9_8.7y", "  42  ", "€3.50"];
        for input in inputs {
            let once = sanitize(input);
            assert_eq!(sanitize(&once), once, "not idempotent for {:?}", input);
            assert!(once.chars().all(|c| c.is_ascii_digit() || c == '.'));
        }
    }

    #[test]
    fn test_parse_numeric() {
        assert_eq!(parse_numeric(""), 0.0);
        assert_eq!(parse_numeric("10"), 10.0);
        assert_eq!(parse_numeric("2.5"), 2.5);
        assert_eq!(parse_numeric(".5"), 0.5);
        assert_eq!(parse_numeric("1.2.3"), 0.0);
        assert_eq!(parse_numeric("."), 0.0);
    }
}
