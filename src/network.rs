//! Card network catalog and prefix classification.
//!
//! The catalog is a fixed, ordered list of [`NetworkDescriptor`]s. Classification
//! walks it in order and returns the first descriptor whose prefix rule matches,
//! so catalog order encodes priority.
//!
//! # Example
//!
//! ```
//! use card_input::network::{classify, CardNetwork};
//!
//! let visa = classify("4242").unwrap();
//! assert_eq!(visa.network, CardNetwork::Visa);
//! assert_eq!(visa.cvc_length, 3);
//!
//! let amex = classify("3714 496353 98431").unwrap();
//! assert_eq!(amex.network, CardNetwork::Amex);
//! assert_eq!(amex.group_format, &[4, 6, 5]);
//!
//! assert!(classify("").is_none());
//! assert!(classify("9999").is_none());
//! ```

use std::fmt;

/// Maximum number of digits accepted while no network has been detected.
pub const GENERIC_MAX_DIGITS: usize = 16;

/// Maximum CVC digits accepted while no network has been detected.
pub const GENERIC_MAX_CVC: usize = 4;

/// Card networks known to the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CardNetwork {
    /// Visa - prefix 4, 16 digits
    Visa,
    /// Mastercard - prefix 51-55, 2221-2720, 16 digits
    Mastercard,
    /// American Express - prefix 34, 37, 15 digits, 4-digit CVC
    Amex,
    /// Discover - prefix 6011, 644-649, 65, 16 digits
    Discover,
}

impl CardNetwork {
    /// All networks in catalog order.
    pub const ALL: [CardNetwork; 4] = [Self::Visa, Self::Mastercard, Self::Amex, Self::Discover];

    /// Returns the catalog descriptor for this network.
    #[inline]
    pub fn descriptor(self) -> &'static NetworkDescriptor {
        match self {
            Self::Visa => &CATALOG[0],
            Self::Mastercard => &CATALOG[1],
            Self::Amex => &CATALOG[2],
            Self::Discover => &CATALOG[3],
        }
    }

    /// Returns a human-readable name for the network.
    #[inline]
    pub fn name(self) -> &'static str {
        self.descriptor().name
    }

    /// Parses a network name, case-insensitively. Accepts display names and
    /// the short forms `mc` and `amex`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "visa" => Some(Self::Visa),
            "mastercard" | "mc" => Some(Self::Mastercard),
            "amex" | "american express" => Some(Self::Amex),
            "discover" => Some(Self::Discover),
            _ => None,
        }
    }
}

impl fmt::Display for CardNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Static description of a card network.
pub struct NetworkDescriptor {
    /// Network this descriptor belongs to.
    pub network: CardNetwork,
    /// Display name.
    pub name: &'static str,
    /// Digit group sizes used when formatting, e.g. `[4, 6, 5]`.
    pub group_format: &'static [usize],
    /// Digit counts a complete number may have.
    pub accepted_lengths: &'static [u8],
    /// Exact number of CVC digits.
    pub cvc_length: usize,
    prefix: fn(&[u8]) -> bool,
    number: fn(&[u8]) -> bool,
}

impl NetworkDescriptor {
    /// Returns true if the (possibly partial) digit sequence starts with this network's prefix.
    #[inline]
    pub fn matches_prefix(&self, digits: &[u8]) -> bool {
        (self.prefix)(digits)
    }

    /// Network-specific check over prefix and length of a complete number.
    ///
    /// This does not run the Luhn checksum.
    #[inline]
    pub fn is_valid_number(&self, digits: &[u8]) -> bool {
        (self.number)(digits)
    }

    /// Returns true if `length` is one of the accepted digit counts.
    #[inline]
    pub fn accepts_length(&self, length: usize) -> bool {
        self.accepted_lengths.iter().any(|&l| l as usize == length)
    }

    /// Largest accepted digit count.
    #[inline]
    pub fn max_length(&self) -> usize {
        self.accepted_lengths
            .iter()
            .copied()
            .max()
            .map(usize::from)
            .unwrap_or(GENERIC_MAX_DIGITS)
    }

    /// Length of a complete number once formatted with single-space separators.
    pub fn max_formatted_length(&self) -> usize {
        let max = self.max_length();
        let mut remaining = max;
        let mut groups: usize = 0;
        for &size in self.group_format {
            if remaining == 0 {
                break;
            }
            remaining = remaining.saturating_sub(size);
            groups += 1;
        }
        if remaining > 0 {
            groups += 1;
        }
        max + groups.saturating_sub(1)
    }
}

impl fmt::Debug for NetworkDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetworkDescriptor")
            .field("network", &self.network)
            .field("group_format", &self.group_format)
            .field("accepted_lengths", &self.accepted_lengths)
            .field("cvc_length", &self.cvc_length)
            .finish()
    }
}

impl PartialEq for NetworkDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.network == other.network
    }
}

impl Eq for NetworkDescriptor {}

fn visa_prefix(digits: &[u8]) -> bool {
    matches!(digits, [4, ..])
}

fn mastercard_prefix(digits: &[u8]) -> bool {
    matches!(
        digits,
        [5, 1..=5, ..]
            | [2, 2, 2, 1..=9, ..] // 2221-2229
            | [2, 2, 3..=9, _, ..] // 2230-2299
            | [2, 3..=6, _, _, ..] // 2300-2699
            | [2, 7, 0..=1, _, ..] // 2700-2719
            | [2, 7, 2, 0, ..] // 2720
    )
}

fn amex_prefix(digits: &[u8]) -> bool {
    matches!(digits, [3, 4, ..] | [3, 7, ..])
}

fn discover_prefix(digits: &[u8]) -> bool {
    matches!(digits, [6, 0, 1, 1, ..] | [6, 4, 4..=9, ..] | [6, 5, ..])
}

fn all_digits(digits: &[u8]) -> bool {
    digits.iter().all(|&d| d <= 9)
}

fn visa_number(digits: &[u8]) -> bool {
    digits.len() == 16 && visa_prefix(digits) && all_digits(digits)
}

fn mastercard_number(digits: &[u8]) -> bool {
    digits.len() == 16 && mastercard_prefix(digits) && all_digits(digits)
}

fn amex_number(digits: &[u8]) -> bool {
    digits.len() == 15 && amex_prefix(digits) && all_digits(digits)
}

fn discover_number(digits: &[u8]) -> bool {
    digits.len() == 16 && discover_prefix(digits) && all_digits(digits)
}

/// The network catalog, in classification priority order.
pub static CATALOG: [NetworkDescriptor; 4] = [
    NetworkDescriptor {
        network: CardNetwork::Visa,
        name: "Visa",
        group_format: &[4, 4, 4, 4],
        accepted_lengths: &[16],
        cvc_length: 3,
        prefix: visa_prefix,
        number: visa_number,
    },
    NetworkDescriptor {
        network: CardNetwork::Mastercard,
        name: "Mastercard",
        group_format: &[4, 4, 4, 4],
        accepted_lengths: &[16],
        cvc_length: 3,
        prefix: mastercard_prefix,
        number: mastercard_number,
    },
    NetworkDescriptor {
        network: CardNetwork::Amex,
        name: "American Express",
        group_format: &[4, 6, 5],
        accepted_lengths: &[15],
        cvc_length: 4,
        prefix: amex_prefix,
        number: amex_number,
    },
    NetworkDescriptor {
        network: CardNetwork::Discover,
        name: "Discover",
        group_format: &[4, 4, 4, 4],
        accepted_lengths: &[16],
        cvc_length: 3,
        prefix: discover_prefix,
        number: discover_number,
    },
];

/// Converts the digit characters of `input` into digit values, ignoring everything else.
pub(crate) fn digit_values(input: &str) -> Vec<u8> {
    input
        .bytes()
        .filter(u8::is_ascii_digit)
        .map(|b| b - b'0')
        .collect()
}

/// Classifies a (possibly partial or formatted) card number.
///
/// Returns the first catalog entry whose prefix matches, or `None` when the
/// input has no digits or no prefix matches.
#[inline]
pub fn classify(input: &str) -> Option<&'static NetworkDescriptor> {
    classify_digits(&digit_values(input))
}

/// Classifies a sequence of digit values (0-9).
pub fn classify_digits(digits: &[u8]) -> Option<&'static NetworkDescriptor> {
    if digits.is_empty() {
        return None;
    }
    CATALOG.iter().find(|d| d.matches_prefix(digits))
}
