//! Tolerant string-to-number conversion.
//!
//! Users type amounts with either a comma or a dot as the decimal separator.
//! Every arithmetic step goes through this parser so that partially-typed
//! input never corrupts derived fields: the caller gets `None` and clears
//! the dependent fields instead of propagating garbage.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Parses a user-entered amount, accepting `,` or `.` as decimal separator.
///
/// Returns `None` (not zero, not an error) for empty or non-numeric input.
#[must_use]
pub fn parse_flexible_number(input: &str) -> Option<Decimal> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    let normalized = trimmed.replacen(',', ".", 1);
    Decimal::from_str(&normalized).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_comma_decimal_separator() {
        assert_eq!(parse_flexible_number("12,50"), Some(dec!(12.50)));
    }

    #[test]
    fn test_dot_decimal_separator() {
        assert_eq!(parse_flexible_number("12.50"), Some(dec!(12.50)));
    }

    #[test]
    fn test_integer_input() {
        assert_eq!(parse_flexible_number("100"), Some(dec!(100)));
    }

    #[test]
    fn test_surrounding_whitespace() {
        assert_eq!(parse_flexible_number("  7,5 "), Some(dec!(7.5)));
    }

    #[test]
    fn test_garbage_returns_none() {
        assert_eq!(parse_flexible_number("abc"), None);
        assert_eq!(parse_flexible_number("12,50,00"), None);
        assert_eq!(parse_flexible_number("1.2.3"), None);
    }

    #[test]
    fn test_empty_returns_none() {
        assert_eq!(parse_flexible_number(""), None);
        assert_eq!(parse_flexible_number("   "), None);
    }

    #[test]
    fn test_negative_amounts_parse() {
        // Sign rules are the validator's job, not the parser's.
        assert_eq!(parse_flexible_number("-3,10"), Some(dec!(-3.10)));
    }
}
