//! Error types for card number validation and per-field failures.
//!
//! Validation never panics or aborts the form: every failure maps to one of
//! these values, which the UI can render as a hint next to the field.

use crate::cvc::CvcError;
use crate::expiry::ExpiryError;
use crate::name::NameError;
use crate::network::CardNetwork;
use std::fmt;

/// Errors that can occur while validating a card number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NumberError {
    /// The input has no digits.
    Empty,

    /// A character other than a digit or space was found.
    InvalidCharacter {
        /// The position in the input string (0-indexed, in characters).
        position: usize,
        /// The invalid character.
        character: char,
    },

    /// No network matches the number's prefix.
    UnknownNetwork,

    /// The digit count is not accepted by the network.
    InvalidLengthForNetwork {
        /// The active network.
        network: CardNetwork,
        /// Digits provided.
        length: usize,
        /// Accepted digit counts.
        valid_lengths: &'static [u8],
    },

    /// The number does not belong to the active network.
    NetworkMismatch {
        /// The active network.
        network: CardNetwork,
    },

    /// The Luhn checksum failed.
    InvalidChecksum,
}

impl fmt::Display for NumberError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "card number is empty"),

            Self::InvalidCharacter {
                position,
                character,
            } => write!(
                f,
                "invalid character '{}' at position {} (only digits and spaces allowed)",
                character.escape_default(),
                position
            ),

            Self::UnknownNetwork => {
                write!(f, "unknown card network - check the card number prefix")
            }

            Self::InvalidLengthForNetwork {
                network,
                length,
                valid_lengths,
            } => {
                let valid: Vec<String> = valid_lengths.iter().map(|l| l.to_string()).collect();
                write!(
                    f,
                    "{} cards must have {} digits, got {}",
                    network,
                    valid.join(" or "),
                    length
                )
            }

            Self::NetworkMismatch { network } => {
                write!(f, "card number is not a valid {} number", network)
            }

            Self::InvalidChecksum => {
                write!(f, "invalid checksum (Luhn check failed) - please verify the card number")
            }
        }
    }
}

impl std::error::Error for NumberError {}

/// Why a single form field is invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// Card number failure.
    Number(NumberError),
    /// Cardholder name failure.
    Name(NameError),
    /// Expiry failure.
    Expiry(ExpiryError),
    /// CVC failure.
    Cvc(CvcError),
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(e) => fmt::Display::fmt(e, f),
            Self::Name(e) => fmt::Display::fmt(e, f),
            Self::Expiry(e) => fmt::Display::fmt(e, f),
            Self::Cvc(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for FieldError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Number(e) => Some(e),
            Self::Name(e) => Some(e),
            Self::Expiry(e) => Some(e),
            Self::Cvc(e) => Some(e),
        }
    }
}

impl From<NumberError> for FieldError {
    fn from(e: NumberError) -> Self {
        Self::Number(e)
    }
}

impl From<NameError> for FieldError {
    fn from(e: NameError) -> Self {
        Self::Name(e)
    }
}

impl From<ExpiryError> for FieldError {
    fn from(e: ExpiryError) -> Self {
        Self::Expiry(e)
    }
}

impl From<CvcError> for FieldError {
    fn from(e: CvcError) -> Self {
        Self::Cvc(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_error_display() {
        assert_eq!(NumberError::Empty.to_string(), "card number is empty");

        assert_eq!(
            NumberError::InvalidCharacter {
                position: 5,
                character: 'x'
            }
            .to_string(),
            "invalid character 'x' at position 5 (only digits and spaces allowed)"
        );

        assert_eq!(
            NumberError::InvalidLengthForNetwork {
                network: CardNetwork::Amex,
                length: 16,
                valid_lengths: &[15],
            }
            .to_string(),
            "American Express cards must have 15 digits, got 16"
        );
    }

    #[test]
    fn test_field_error_wraps_source() {
        let err: FieldError = NumberError::InvalidChecksum.into();
        assert_eq!(err.to_string(), NumberError::InvalidChecksum.to_string());
        assert!(err.source().is_some());
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<NumberError>();
        assert_send_sync::<FieldError>();
    }
}
