//! CVC/CVV/CID validation against the active card network.
//!
//! # Length Requirements
//!
//! - American Express: 4 digits (printed on front)
//! - All other networks: 3 digits (printed on back)
//!
//! Without a detected network no CVC is valid, because the expected length
//! is unknown.
//!
//! # Example
//!
//! ```
//! use card_input::cvc::validate_cvc;
//! use card_input::network::CardNetwork;
//!
//! let visa = Some(CardNetwork::Visa.descriptor());
//! let amex = Some(CardNetwork::Amex.descriptor());
//!
//! assert!(validate_cvc("123", visa));
//! assert!(!validate_cvc("123", amex));
//! assert!(validate_cvc("1234", amex));
//! assert!(!validate_cvc("123", None));
//! ```

use crate::network::{CardNetwork, NetworkDescriptor};
use std::fmt;

/// Errors from CVC validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CvcError {
    /// The input has no digits.
    Empty,
    /// No network is known, so the expected length is unknown.
    UnknownNetwork,
    /// The digit count does not match the network.
    WrongLengthForNetwork {
        /// The active network.
        network: CardNetwork,
        /// Digits provided.
        length: usize,
        /// Digits the network requires.
        expected: usize,
    },
}

impl fmt::Display for CvcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "CVC is empty"),
            Self::UnknownNetwork => write!(f, "enter the card number before the CVC"),
            Self::WrongLengthForNetwork {
                network,
                length,
                expected,
            } => write!(
                f,
                "{} cards require a {} digit CVC, got {}",
                network.name(),
                expected,
                length
            ),
        }
    }
}

impl std::error::Error for CvcError {}

/// Checks a CVC, stripping non-digit characters first.
pub fn check_cvc(input: &str, network: Option<&NetworkDescriptor>) -> Result<(), CvcError> {
    let length = input.chars().filter(|c| c.is_ascii_digit()).count();
    if length == 0 {
        return Err(CvcError::Empty);
    }

    let network = network.ok_or(CvcError::UnknownNetwork)?;
    if length != network.cvc_length {
        return Err(CvcError::WrongLengthForNetwork {
            network: network.network,
            length,
            expected: network.cvc_length,
        });
    }

    Ok(())
}

/// Returns true if the CVC's digit count equals the network's CVC length.
#[inline]
pub fn validate_cvc(input: &str, network: Option<&NetworkDescriptor>) -> bool {
    check_cvc(input, network).is_ok()
}

/// Returns the expected CVC length for a network.
#[inline]
pub fn cvc_length_for(network: CardNetwork) -> usize {
    network.descriptor().cvc_length
}
