//! As-you-type formatting for card numbers and expiry dates.
//!
//! # Format Conventions
//!
//! - **Visa/Mastercard/Discover** (16 digits): `XXXX XXXX XXXX XXXX`
//! - **American Express** (15 digits): `XXXX XXXXXX XXXXX`
//! - **No network detected**: groups of 4
//! - **Expiry**: `MM/YY`
//!
//! # Example
//!
//! ```
//! use card_input::format::{format_card_number, format_expiry};
//! use card_input::network::classify;
//!
//! let network = classify("378282246310005");
//! assert_eq!(format_card_number("378282246310005", network), "3782 822463 10005");
//! assert_eq!(format_card_number("42424", None), "4242 4");
//!
//! assert_eq!(format_expiry("1"), "1");
//! assert_eq!(format_expiry("123"), "12/3");
//! assert_eq!(format_expiry("12/345"), "12/34");
//! ```

use crate::network::NetworkDescriptor;

/// Group size used when no network is active.
const GENERIC_GROUP: usize = 4;

/// Maximum digits in an `MMYY` expiry.
const EXPIRY_DIGITS: usize = 4;

/// Formats a card number using the descriptor's grouping, separated by single spaces.
///
/// All non-digit characters are stripped first, so formatting already
/// formatted output yields the same string. Digits beyond the descriptor's
/// pattern form one trailing group; no digit is ever dropped.
pub fn format_card_number(raw: &str, network: Option<&NetworkDescriptor>) -> String {
    format_with_separator(raw, network, " ")
}

/// Formats a card number with a custom separator.
///
/// ```
/// use card_input::format::format_with_separator;
/// use card_input::network::classify;
///
/// let raw = "4242424242424242";
/// assert_eq!(format_with_separator(raw, classify(raw), "-"), "4242-4242-4242-4242");
/// ```
pub fn format_with_separator(
    raw: &str,
    network: Option<&NetworkDescriptor>,
    separator: &str,
) -> String {
    let groups = split_into_groups(raw, network);
    let digit_count: usize = groups.iter().map(String::len).sum();
    let mut result =
        String::with_capacity(digit_count + groups.len().saturating_sub(1) * separator.len());

    for (i, group) in groups.iter().enumerate() {
        if i > 0 {
            result.push_str(separator);
        }
        result.push_str(group);
    }

    result
}

/// Splits the digits of `raw` into display groups.
///
/// ```
/// use card_input::format::split_into_groups;
/// use card_input::network::classify;
///
/// let groups = split_into_groups("378282246310005", classify("37"));
/// assert_eq!(groups, vec!["3782", "822463", "10005"]);
/// ```
pub fn split_into_groups(raw: &str, network: Option<&NetworkDescriptor>) -> Vec<String> {
    let digits = strip_formatting(raw);
    if digits.is_empty() {
        return Vec::new();
    }

    let pattern = network.map(|n| n.group_format).unwrap_or(&[]);
    let mut groups = Vec::with_capacity(pattern.len() + 1);
    let mut rest = digits.as_str();

    for &size in pattern {
        if rest.is_empty() {
            break;
        }
        let (head, tail) = rest.split_at(size.min(rest.len()));
        groups.push(head.to_string());
        rest = tail;
    }

    if network.is_some() {
        if !rest.is_empty() {
            groups.push(rest.to_string());
        }
    } else {
        while !rest.is_empty() {
            let (head, tail) = rest.split_at(GENERIC_GROUP.min(rest.len()));
            groups.push(head.to_string());
            rest = tail;
        }
    }

    groups
}

/// Strips everything but ASCII digits.
///
/// ```
/// use card_input::format::strip_formatting;
///
/// assert_eq!(strip_formatting("4242 4242-4242.4242"), "4242424242424242");
/// ```
pub fn strip_formatting(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Formats raw expiry input as `MM/YY`.
///
/// Non-digits are stripped and the result is capped at four digits; the
/// slash appears only once more than two digits are present.
pub fn format_expiry(raw: &str) -> String {
    let digits: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(EXPIRY_DIGITS)
        .collect();

    if digits.len() > 2 {
        format!("{}/{}", &digits[..2], &digits[2..])
    } else {
        digits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{classify, CardNetwork};

    #[test]
    fn test_format_visa() {
        let raw = "4242424242424242";
        assert_eq!(format_card_number(raw, classify(raw)), "4242 4242 4242 4242");
    }

    #[test]
    fn test_format_amex() {
        let amex = Some(CardNetwork::Amex.descriptor());
        assert_eq!(format_card_number("378282246310005", amex), "3782 822463 10005");
        assert_eq!(format_card_number("37828", amex), "3782 8");
        assert_eq!(format_card_number("3782822463", amex), "3782 822463");
    }

    #[test]
    fn test_format_partial_input() {
        let visa = Some(CardNetwork::Visa.descriptor());
        assert_eq!(format_card_number("4", visa), "4");
        assert_eq!(format_card_number("4242", visa), "4242");
        assert_eq!(format_card_number("42424", visa), "4242 4");
    }

    #[test]
    fn test_format_without_network() {
        assert_eq!(format_card_number("1234567890", None), "1234 5678 90");
        assert_eq!(format_card_number("", None), "");
        assert_eq!(format_card_number("  - ", None), "");
    }

    #[test]
    fn test_format_is_idempotent() {
        let raw = "4242424242424242";
        let once = format_card_number(raw, classify(raw));
        let twice = format_card_number(&once, classify(&once));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_overflow_digits_kept_in_trailing_group() {
        let visa = Some(CardNetwork::Visa.descriptor());
        assert_eq!(
            format_card_number("4242424242424242424", visa),
            "4242 4242 4242 4242 424"
        );
    }

    #[test]
    fn test_format_with_separator() {
        let visa = Some(CardNetwork::Visa.descriptor());
        assert_eq!(
            format_with_separator("4242424242424242", visa, " - "),
            "4242 - 4242 - 4242 - 4242"
        );
    }

    #[test]
    fn test_format_expiry() {
        assert_eq!(format_expiry(""), "");
        assert_eq!(format_expiry("1"), "1");
        assert_eq!(format_expiry("12"), "12");
        assert_eq!(format_expiry("123"), "12/3");
        assert_eq!(format_expiry("1234"), "12/34");
        assert_eq!(format_expiry("12345"), "12/34");
        assert_eq!(format_expiry("12/34"), "12/34");
        assert_eq!(format_expiry("ab12cd3"), "12/3");
    }
}
