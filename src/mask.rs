//! PCI-DSS style masking for card data that reaches logs or `Debug` output.
//!
//! Only the last four digits of a card number are ever shown. CVCs are never
//! shown at all.

/// Masks a card number showing only the last 4 digits.
///
/// Non-digits are stripped first. Inputs with four or fewer digits are fully
/// masked.
///
/// ```
/// use card_input::mask::mask_number;
///
/// assert_eq!(mask_number("4242 4242 4242 4242"), "****-****-****-4242");
/// assert_eq!(mask_number("424"), "***");
/// ```
pub fn mask_number(input: &str) -> String {
    let digits: Vec<char> = input.chars().filter(|c| c.is_ascii_digit()).collect();
    let len = digits.len();

    if len <= 4 {
        return "*".repeat(len);
    }

    let masked_count = len - 4;
    let mut result = String::with_capacity(len + len / 4);

    for i in 0..masked_count {
        if i > 0 && i % 4 == 0 {
            result.push('-');
        }
        result.push('*');
    }

    if masked_count % 4 == 0 {
        result.push('-');
    }

    result.extend(&digits[len - 4..]);
    result
}

/// Replaces every character of a secret with `*`, keeping only its length.
#[inline]
pub fn mask_secret(input: &str) -> String {
    "*".repeat(input.chars().count())
}

/// Returns the last 4 digits of a card number, or an empty string if there are fewer.
pub fn last_four(input: &str) -> String {
    let digits: Vec<char> = input.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() >= 4 {
        digits[digits.len() - 4..].iter().collect()
    } else {
        String::new()
    }
}
