//! Card number generation for testing purposes.
//!
//! Generated numbers carry a network prefix, the network's full length and a
//! valid Luhn check digit. They are not connected to real accounts and should
//! only be used to exercise forms and validators.
//!
//! # Example
//!
//! ```
//! use card_input::generate::generate_card_deterministic;
//! use card_input::{classify, validate_card_number, CardNetwork};
//!
//! // Deterministic, no randomness required
//! let number = generate_card_deterministic(CardNetwork::Amex);
//! assert!(number.starts_with("34"));
//! assert!(validate_card_number(&number, classify(&number)));
//! ```

use crate::luhn;
use crate::network::CardNetwork;

#[cfg(feature = "generate")]
use rand::Rng;

/// Returns the prefix generated numbers of `network` start with.
pub const fn prefix_for_network(network: CardNetwork) -> &'static str {
    match network {
        CardNetwork::Visa => "4",
        CardNetwork::Mastercard => "51",
        CardNetwork::Amex => "34",
        CardNetwork::Discover => "6011",
    }
}

fn prefix_digits(prefix: &str, length: usize) -> Option<Vec<u8>> {
    if prefix.is_empty() || prefix.len() >= length || !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let mut digits = Vec::with_capacity(length);
    digits.extend(prefix.bytes().map(|b| b - b'0'));
    Some(digits)
}

fn finish(mut digits: Vec<u8>) -> String {
    digits.push(luhn::generate_check_digit(&digits));
    digits.iter().map(|&d| (b'0' + d) as char).collect()
}

/// Generates a valid card number deterministically (no randomness).
///
/// Middle digits are zeros, so the same network always yields the same number.
///
/// ```
/// use card_input::generate::generate_card_deterministic;
/// use card_input::CardNetwork;
///
/// assert_eq!(generate_card_deterministic(CardNetwork::Visa), "4000000000000002");
/// ```
pub fn generate_card_deterministic(network: CardNetwork) -> String {
    let prefix = prefix_for_network(network);
    let length = network.descriptor().max_length();
    generate_card_deterministic_with_prefix(prefix, length).unwrap_or_default()
}

/// Generates a valid card number with a custom prefix, zero-filled.
///
/// Returns `None` if the prefix is empty, contains non-digits or is not
/// shorter than `length`.
pub fn generate_card_deterministic_with_prefix(prefix: &str, length: usize) -> Option<String> {
    let mut digits = prefix_digits(prefix, length)?;
    digits.resize(length - 1, 0);
    Some(finish(digits))
}

/// Generates a random valid card number for `network`.
///
/// Requires the `generate` feature.
///
/// ```
/// use card_input::generate::generate_card;
/// use card_input::{classify, validate_card_number, CardNetwork};
///
/// let number = generate_card(CardNetwork::Discover);
/// assert_eq!(classify(&number).map(|n| n.network), Some(CardNetwork::Discover));
/// assert!(validate_card_number(&number, classify(&number)));
/// ```
#[cfg(feature = "generate")]
pub fn generate_card(network: CardNetwork) -> String {
    generate_card_with_rng(network, &mut rand::thread_rng())
}

/// Generates a random valid card number using a provided RNG.
///
/// Useful for reproducible fixtures with a seeded RNG.
#[cfg(feature = "generate")]
pub fn generate_card_with_rng<R: Rng>(network: CardNetwork, rng: &mut R) -> String {
    let prefix = prefix_for_network(network);
    let length = network.descriptor().max_length();
    generate_card_with_prefix(prefix, length, rng).unwrap_or_default()
}

/// Generates a random valid card number with a custom prefix and length.
///
/// Returns `None` under the same conditions as
/// [`generate_card_deterministic_with_prefix`].
#[cfg(feature = "generate")]
pub fn generate_card_with_prefix<R: Rng>(prefix: &str, length: usize, rng: &mut R) -> Option<String> {
    let mut digits = prefix_digits(prefix, length)?;
    while digits.len() < length - 1 {
        digits.push(rng.gen_range(0..10));
    }
    Some(finish(digits))
}

/// Generates `count` random valid card numbers for `network`.
///
/// Requires the `generate` feature.
#[cfg(feature = "generate")]
pub fn generate_cards(network: CardNetwork, count: usize) -> Vec<String> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| generate_card_with_rng(network, &mut rng))
        .collect()
}
