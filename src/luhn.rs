//! Luhn (mod 10) checksum.
//!
//! Digits are walked right to left; every second digit, starting with the one
//! just left of the check digit, is doubled and reduced by 9 when it exceeds 9.
//! The number is valid when the sum is a multiple of 10.

/// Doubled digit with 9 subtracted when the result exceeds 9, indexed by digit.
const DOUBLE_TABLE: [u8; 10] = [0, 2, 4, 6, 8, 1, 3, 5, 7, 9];

/// Validates a sequence of digit values (0-9) with the Luhn algorithm.
///
/// Empty input is never valid.
///
/// # Example
///
/// ```
/// use card_input::luhn::validate;
///
/// let digits = [4, 2, 4, 2, 4, 2, 4, 2, 4, 2, 4, 2, 4, 2, 4, 2];
/// assert!(validate(&digits));
///
/// let typo = [4, 2, 4, 2, 4, 2, 4, 2, 4, 2, 4, 2, 4, 2, 4, 1];
/// assert!(!validate(&typo));
/// ```
#[inline]
pub fn validate(digits: &[u8]) -> bool {
    !digits.is_empty() && compute_checksum(digits) % 10 == 0
}

/// Validates the digit characters of a string, ignoring everything else.
#[inline]
pub fn validate_str(input: &str) -> bool {
    validate(&crate::network::digit_values(input))
}

/// Computes the Luhn sum (not reduced modulo 10).
pub fn compute_checksum(digits: &[u8]) -> u32 {
    digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            let d = d.min(9) as usize;
            if i % 2 == 1 {
                DOUBLE_TABLE[d] as u32
            } else {
                d as u32
            }
        })
        .sum()
}

/// Computes the check digit that makes `partial` followed by it pass Luhn.
///
/// ```
/// use card_input::luhn::generate_check_digit;
///
/// let partial = [4, 2, 4, 2, 4, 2, 4, 2, 4, 2, 4, 2, 4, 2, 4];
/// assert_eq!(generate_check_digit(&partial), 2);
/// ```
pub fn generate_check_digit(partial: &[u8]) -> u8 {
    // Every digit shifts one place left once the check digit is appended,
    // so the rightmost existing digit is the first doubled one.
    let sum: u32 = partial
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            let d = d.min(9) as usize;
            if i % 2 == 0 {
                DOUBLE_TABLE[d] as u32
            } else {
                d as u32
            }
        })
        .sum();

    ((10 - (sum % 10)) % 10) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_numbers() {
        assert!(validate_str("4242424242424242"));
        assert!(!validate_str("4242424242424241"));
        assert!(validate_str("378282246310005"));
        assert!(validate_str("6011111111111117"));
        assert!(validate_str("5555555555554444"));
    }

    #[test]
    fn test_formatted_input() {
        assert!(validate_str("4242 4242 4242 4242"));
    }

    #[test]
    fn test_empty_input() {
        assert!(!validate(&[]));
        assert!(!validate_str(""));
    }

    #[test]
    fn test_single_digit() {
        assert!(validate(&[0]));
        assert!(!validate(&[1]));
    }

    #[test]
    fn test_check_digit_completes_number() {
        let partial = [3, 7, 8, 2, 8, 2, 2, 4, 6, 3, 1, 0, 0, 0];
        assert_eq!(generate_check_digit(&partial), 5);

        let partial = [6, 0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1];
        assert_eq!(generate_check_digit(&partial), 7);
    }

    #[test]
    fn test_double_table_values() {
        for (i, &value) in DOUBLE_TABLE.iter().enumerate() {
            let doubled = i * 2;
            let expected = if doubled > 9 { doubled - 9 } else { doubled };
            assert_eq!(value as usize, expected);
        }
    }
}
