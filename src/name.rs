//! Cardholder name validation.

use std::fmt;

/// Minimum number of characters in a trimmed cardholder name.
pub const MIN_NAME_CHARS: usize = 3;

/// Errors from cardholder name validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    /// The trimmed name is shorter than [`MIN_NAME_CHARS`].
    TooShort {
        /// Characters after trimming.
        length: usize,
    },
    /// The name contains something other than letters and whitespace.
    InvalidCharacter {
        /// The offending character.
        character: char,
    },
}

impl fmt::Display for NameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort { length } => write!(
                f,
                "cardholder name too short: got {} characters, minimum is {}",
                length, MIN_NAME_CHARS
            ),
            Self::InvalidCharacter { character } => write!(
                f,
                "invalid character '{}' in cardholder name (only letters and spaces allowed)",
                character.escape_default()
            ),
        }
    }
}

impl std::error::Error for NameError {}

/// Checks a cardholder name.
///
/// ```
/// use card_input::name::{check_card_name, NameError};
///
/// assert!(check_card_name("Ada Lovelace").is_ok());
/// assert_eq!(check_card_name(" Al "), Err(NameError::TooShort { length: 2 }));
/// ```
pub fn check_card_name(input: &str) -> Result<(), NameError> {
    let trimmed = input.trim();

    if let Some(character) = trimmed
        .chars()
        .find(|c| !(c.is_alphabetic() || c.is_whitespace()))
    {
        return Err(NameError::InvalidCharacter { character });
    }

    let length = trimmed.chars().count();
    if length < MIN_NAME_CHARS {
        return Err(NameError::TooShort { length });
    }

    Ok(())
}

/// Returns true if the trimmed name has at least three characters, all letters or whitespace.
#[inline]
pub fn validate_card_name(input: &str) -> bool {
    check_card_name(input).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert!(validate_card_name("Ada Lovelace"));
        assert!(validate_card_name("Bob"));
        assert!(validate_card_name("  Grace   Hopper  "));
        assert!(validate_card_name("José Álvarez"));
    }

    #[test]
    fn test_too_short() {
        assert!(!validate_card_name(""));
        assert!(!validate_card_name("   "));
        assert!(!validate_card_name("Al"));
        assert!(!validate_card_name("  Al  "));
    }

    #[test]
    fn test_rejects_digits_and_punctuation() {
        assert_eq!(
            check_card_name("R2D2"),
            Err(NameError::InvalidCharacter { character: '2' })
        );
        assert!(!validate_card_name("O'Brien"));
        assert!(!validate_card_name("Mary-Jane"));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            NameError::TooShort { length: 2 }.to_string(),
            "cardholder name too short: got 2 characters, minimum is 3"
        );
    }
}
