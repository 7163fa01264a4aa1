//! # card_input
//!
//! Checkout card input engine for Rust.
//!
//! ## Features
//!
//! - Card network detection from a number prefix (4 networks)
//! - As-you-type formatting of card numbers and `MM/YY` expiry dates
//! - Luhn, expiry, CVC and cardholder name validation
//! - A debounced form state machine with aggregate validity and focus auto-advance
//! - Multiple interfaces: library, tokio driver, CLI, WASM
//!
//! ## Quick Start
//!
//! ```rust
//! use card_input::{classify, format_card_number, validate_card_number, CardNetwork};
//!
//! let network = classify("4242").unwrap();
//! assert_eq!(network.network, CardNetwork::Visa);
//!
//! assert_eq!(format_card_number("4242424242424242", Some(network)), "4242 4242 4242 4242");
//! assert!(validate_card_number("4242 4242 4242 4242", Some(network)));
//! assert!(!validate_card_number("4242 4242 4242 4241", Some(network)));
//! ```
//!
//! ## Amex Grouping
//!
//! ```rust
//! use card_input::{classify, format_card_number, validate_cvc};
//!
//! let amex = classify("37");
//! assert_eq!(format_card_number("378282246310005", amex), "3782 822463 10005");
//! assert!(validate_cvc("1234", amex));
//! assert!(!validate_cvc("123", amex));
//! ```
//!
//! ## Expiry Validation
//!
//! ```rust
//! use card_input::{format_expiry, validate_expiry, YearMonth};
//!
//! assert_eq!(format_expiry("1227"), "12/27");
//!
//! let today = YearMonth::new(2026, 10).unwrap();
//! assert!(validate_expiry("10/26", today));
//! assert!(!validate_expiry("09/26", today));
//! assert!(!validate_expiry("13/27", today));
//! ```
//!
//! ## Debounced Form
//!
//! ```rust
//! use card_input::{CardData, CardForm, Field, FieldStatus, YearMonth};
//! use std::time::Duration;
//!
//! let ms = Duration::from_millis;
//! let mut last = None;
//! let mut form = CardForm::new(|ok: bool, data: &CardData| last = Some((ok, data.number.clone())))
//!     .with_reference_month(YearMonth::new(2026, 10).unwrap());
//!
//! form.input(Field::Number, "4242", ms(0));
//! form.input(Field::Number, "4242 4242 4242 4242", ms(120));
//! assert_eq!(form.tick(ms(300)), 0);
//! assert_eq!(form.tick(ms(420)), 1);
//! assert_eq!(form.validity().number, FieldStatus::Valid);
//! assert_eq!(form.focus(), Field::Name);
//!
//! drop(form);
//! assert_eq!(last, Some((false, "4242424242424242".to_string())));
//! ```
//!
//! ## Supported Card Networks
//!
//! | Network | Prefix | Length | Grouping | CVC |
//! |---------|--------|--------|----------|-----|
//! | Visa | 4 | 16 | 4-4-4-4 | 3 |
//! | Mastercard | 51-55, 2221-2720 | 16 | 4-4-4-4 | 3 |
//! | American Express | 34, 37 | 15 | 4-6-5 | 4 |
//! | Discover | 6011, 644-649, 65 | 16 | 4-4-4-4 | 3 |
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `serde` | Serialize card data, deserialize form config |
//! | `generate` | Random test card generation |
//! | `runtime` | Tokio-driven settle timers |
//! | `cli` | Command-line tool |
//! | `wasm` | WebAssembly support |
//!
//! ## Security
//!
//! - Form buffers and reported card data are zeroized on drop, reset and dispose
//! - `Debug` output masks card numbers and CVCs
//! - Log events never carry raw card data
//! - No unsafe code (`#![deny(unsafe_code)]`)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod cvc;
pub mod debounce;
pub mod error;
pub mod expiry;
pub mod form;
pub mod format;
pub mod generate;
pub mod luhn;
pub mod mask;
pub mod name;
pub mod network;
pub mod validate;

#[cfg(feature = "runtime")]
pub mod runtime;

#[cfg(feature = "wasm")]
mod wasm;

// Re-export main types at crate root
pub use cvc::{validate_cvc, CvcError};
pub use error::{FieldError, NumberError};
pub use expiry::{validate_expiry, ExpiryError, YearMonth};
pub use form::{
    CardData, CardForm, CardFormState, Field, FieldStatus, FieldValidity, FormConfig,
    FormObserver,
};
pub use format::{format_card_number, format_expiry};
pub use name::{validate_card_name, NameError};
pub use network::{classify, CardNetwork, NetworkDescriptor, CATALOG};
pub use validate::{check_card_number, validate_card_number};

#[cfg(feature = "runtime")]
pub use runtime::AsyncCardForm;
