//! Card number validation and per-field dispatch.
//!
//! Every validator is a pure function of the field value and the active
//! network descriptor. The boolean forms are total over their input.

use crate::cvc::check_cvc;
use crate::error::{FieldError, NumberError};
use crate::expiry::{check_expiry, YearMonth};
use crate::form::Field;
use crate::luhn;
use crate::name::check_card_name;
use crate::network::NetworkDescriptor;

/// Checks a card number against the active network.
///
/// Performs, in order:
/// 1. Space stripping (any other non-digit is rejected)
/// 2. Network presence check
/// 3. Network length check
/// 4. Network prefix/length predicate
/// 5. Luhn checksum
///
/// # Example
///
/// ```
/// use card_input::validate::check_card_number;
/// use card_input::network::classify;
/// use card_input::NumberError;
///
/// let number = "4242 4242 4242 4242";
/// assert!(check_card_number(number, classify(number)).is_ok());
///
/// let typo = "4242 4242 4242 4241";
/// assert_eq!(
///     check_card_number(typo, classify(typo)),
///     Err(NumberError::InvalidChecksum)
/// );
/// ```
pub fn check_card_number(
    input: &str,
    network: Option<&NetworkDescriptor>,
) -> Result<(), NumberError> {
    let mut digits = Vec::with_capacity(input.len());

    for (position, c) in input.chars().enumerate() {
        match c {
            '0'..='9' => digits.push(c as u8 - b'0'),
            ' ' => {}
            _ => {
                return Err(NumberError::InvalidCharacter {
                    position,
                    character: c,
                })
            }
        }
    }

    if digits.is_empty() {
        return Err(NumberError::Empty);
    }

    let network = network.ok_or(NumberError::UnknownNetwork)?;

    if !network.accepts_length(digits.len()) {
        return Err(NumberError::InvalidLengthForNetwork {
            network: network.network,
            length: digits.len(),
            valid_lengths: network.accepted_lengths,
        });
    }

    if !network.is_valid_number(&digits) {
        return Err(NumberError::NetworkMismatch {
            network: network.network,
        });
    }

    if !luhn::validate(&digits) {
        return Err(NumberError::InvalidChecksum);
    }

    Ok(())
}

/// Returns true if the number is complete for the network and passes Luhn.
///
/// Without a network this is always false.
///
/// ```
/// use card_input::validate::validate_card_number;
/// use card_input::network::classify;
///
/// assert!(validate_card_number("4242424242424242", classify("4")));
/// assert!(!validate_card_number("4242424242424241", classify("4")));
/// assert!(!validate_card_number("4242424242424242", None));
/// ```
#[inline]
pub fn validate_card_number(input: &str, network: Option<&NetworkDescriptor>) -> bool {
    check_card_number(input, network).is_ok()
}

/// Validates one form field's value.
///
/// `network` only affects the number and CVC fields and `today` only the expiry.
pub fn validate_field(
    field: Field,
    value: &str,
    network: Option<&NetworkDescriptor>,
    today: YearMonth,
) -> Result<(), FieldError> {
    match field {
        Field::Number => check_card_number(value, network)?,
        Field::Name => check_card_name(value)?,
        Field::Expiry => {
            check_expiry(value, today)?;
        }
        Field::Cvc => check_cvc(value, network)?,
    }
    Ok(())
}
