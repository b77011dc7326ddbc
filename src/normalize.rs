//! Phone number normalization for fuzzy handle matching.

/// Reduce an identifier to its digits-only form.
///
/// Contacts show up in the Messages database under many formats of the same
/// number ("+1 (555) 010-0000", "555.010.0000", ...). Comparing the
/// digits-only projections lets all of them match. Returns an empty string
/// when the input contains no digits.
pub fn normalize(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_formatting() {
        assert_eq!(normalize("+1 (234) 567-8900"), "12345678900");
        assert_eq!(normalize("555.010.0000"), "5550100000");
    }

    #[test]
    fn test_preserves_digit_order() {
        assert_eq!(normalize("9a8b7c"), "987");
    }

    #[test]
    fn test_empty_and_no_digits() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("no digits here!"), "");
        assert_eq!(normalize("+() -."), "");
    }
}
