//! Input sanitising for the phone and code fields.

/// Keep only ASCII digits, truncated to `max_len`.
///
/// Applied on every edit of the phone and code inputs.
pub fn digits_only(raw: &str, max_len: usize) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit())
        .take(max_len)
        .collect()
}

/// Country-code prefix + national digits, as sent to the backend.
pub fn full_phone_number(country_code: &str, digits: &str) -> String {
    format!("{}{}", country_code, digits)
}

/// Phone number with all but the last four digits hidden, for logs.
pub fn mask_phone_number(phone_number: &str) -> String {
    let digits = phone_number.chars().filter(|c| c.is_ascii_digit()).count();
    let visible_from = digits.saturating_sub(4);

    let mut seen = 0;
    phone_number
        .chars()
        .map(|c| {
            if c.is_ascii_digit() {
                seen += 1;
                if seen <= visible_from {
                    return '*';
                }
            }
            c
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digits_only_strips_and_truncates() {
        assert_eq!(digits_only("98765abc4321", 10), "9876543210");
    }

    #[test]
    fn test_digits_only_keeps_short_input() {
        assert_eq!(digits_only("98 76-5", 10), "98765");
        assert_eq!(digits_only("", 10), "");
        assert_eq!(digits_only("abc", 10), "");
    }

    #[test]
    fn test_digits_only_ignores_non_ascii_digits() {
        // Devanagari digits are not accepted
        assert_eq!(digits_only("१२३456", 6), "456");
    }

    #[test]
    fn test_full_phone_number() {
        assert_eq!(full_phone_number("+91", "9876543210"), "+919876543210");
    }

    #[test]
    fn test_mask_phone_number() {
        assert_eq!(mask_phone_number("+919876543210"), "+********3210");
        assert_eq!(mask_phone_number("123"), "123");
    }
}
