//! WebAssembly bindings for the card input engine.
//!
//! # Usage from JavaScript
//!
//! ```javascript
//! import init, { CardInputForm, format_card_number } from 'card_input';
//!
//! await init();
//!
//! format_card_number("378282246310005");  // "3782 822463 10005"
//!
//! const form = new CardInputForm((isValid, data) => {
//!     submit.disabled = !isValid;
//! });
//! number.oninput = (e) => {
//!     e.target.value = form.input("number", e.target.value, performance.now());
//!     setTimeout(() => form.tick(performance.now()), form.settle_delay_ms);
//! };
//! ```

#![cfg(feature = "wasm")]

use crate::expiry::YearMonth;
use crate::form::{CardData, CardForm, Field, FormConfig, FormObserver};
use crate::network::{classify, CardNetwork};
use js_sys::{Date, Function, Object, Reflect};
use std::time::Duration;
use tracing::warn;
use wasm_bindgen::prelude::*;

/// Formats a card number for the network detected from its prefix.
///
/// # Example
/// ```javascript
/// format_card_number("4242424242424242")  // "4242 4242 4242 4242"
/// ```
#[wasm_bindgen]
pub fn format_card_number(raw: &str) -> String {
    crate::format::format_card_number(raw, classify(raw))
}

/// Formats raw expiry input as `MM/YY`.
#[wasm_bindgen]
pub fn format_expiry(raw: &str) -> String {
    crate::format::format_expiry(raw)
}

/// Detects the card network from a (partial) card number.
///
/// # Example
/// ```javascript
/// detect_network("37");  // "American Express"
/// ```
#[wasm_bindgen]
pub fn detect_network(card_number: &str) -> Option<String> {
    classify(card_number).map(|n| n.name.to_string())
}

/// Checks a card number against the network detected from its prefix.
#[wasm_bindgen]
pub fn validate_card_number(card_number: &str) -> bool {
    crate::validate::validate_card_number(card_number, classify(card_number))
}

/// Checks an `MM/YY` expiry against the current month.
#[wasm_bindgen]
pub fn validate_expiry(expiry: &str) -> bool {
    crate::expiry::validate_expiry(expiry, current_month())
}

/// Checks a CVC against the network detected from `card_number`.
#[wasm_bindgen]
pub fn validate_cvc(cvc: &str, card_number: &str) -> bool {
    crate::cvc::validate_cvc(cvc, classify(card_number))
}

/// Checks a cardholder name.
#[wasm_bindgen]
pub fn validate_card_name(name: &str) -> bool {
    crate::name::validate_card_name(name)
}

/// Generates a deterministic test card number for a network name.
#[wasm_bindgen]
pub fn generate_test_card(network: &str) -> Result<String, JsValue> {
    CardNetwork::from_name(network)
        .map(crate::generate::generate_card_deterministic)
        .ok_or_else(|| JsValue::from_str(&format!("Unknown network: {}", network)))
}

/// Forwards form notifications to JavaScript callbacks.
struct JsObserver {
    on_change: Function,
    on_advance: Option<Function>,
}

impl JsObserver {
    fn report(result: Result<JsValue, JsValue>) {
        if let Err(e) = result {
            warn!(error = ?e, "form callback threw");
        }
    }
}

impl FormObserver for JsObserver {
    fn on_change(&mut self, is_valid: bool, data: &CardData) {
        let object = match card_data_object(data) {
            Ok(object) => object,
            Err(e) => {
                warn!(error = ?e, "failed to build card data object");
                return;
            }
        };
        Self::report(
            self.on_change
                .call2(&JsValue::NULL, &JsValue::from_bool(is_valid), &object),
        );
    }

    fn on_focus_advance(&mut self, from: Field, to: Field) {
        if let Some(callback) = &self.on_advance {
            Self::report(callback.call2(
                &JsValue::NULL,
                &JsValue::from_str(from.name()),
                &JsValue::from_str(to.name()),
            ));
        }
    }
}

fn card_data_object(data: &CardData) -> Result<JsValue, JsValue> {
    let object = Object::new();
    Reflect::set(&object, &"number".into(), &data.number.as_str().into())?;
    Reflect::set(&object, &"name".into(), &data.name.as_str().into())?;
    Reflect::set(&object, &"expiry".into(), &data.expiry.as_str().into())?;
    Reflect::set(&object, &"cvc".into(), &data.cvc.as_str().into())?;
    Reflect::set(&object, &"isValid".into(), &data.is_valid.into())?;
    Ok(object.into())
}

fn parse_field(field: &str) -> Result<Field, JsValue> {
    Field::from_name(field).ok_or_else(|| JsValue::from_str(&format!("Unknown field: {}", field)))
}

/// The current UTC month from the JavaScript clock.
///
/// `SystemTime` is unavailable on `wasm32-unknown-unknown`.
fn current_month() -> YearMonth {
    let now = Date::new_0();
    let year = u16::try_from(now.get_utc_full_year()).unwrap_or(u16::MAX);
    YearMonth::january(year).plus_months(now.get_utc_month())
}

fn timestamp(now_ms: f64) -> Duration {
    Duration::try_from_secs_f64(now_ms / 1000.0).unwrap_or(Duration::ZERO)
}

/// A debounced card form driven by JavaScript timestamps.
///
/// The page owns the timers: call [`input`](Self::input) on every keystroke
/// and [`tick`](Self::tick) once the settle delay has passed.
#[wasm_bindgen]
pub struct CardInputForm {
    inner: CardForm<JsObserver>,
}

#[wasm_bindgen]
impl CardInputForm {
    /// Creates a form. `on_change(isValid, data)` runs after every settle;
    /// the optional `on_advance(from, to)` runs when focus auto-advances.
    #[wasm_bindgen(constructor)]
    pub fn new(on_change: Function, on_advance: Option<Function>) -> CardInputForm {
        CardInputForm {
            inner: CardForm::with_config(
                FormConfig::default(),
                JsObserver {
                    on_change,
                    on_advance,
                },
            )
            .with_reference_month(current_month()),
        }
    }

    /// Feeds a keystroke and returns the value to display in the field.
    pub fn input(&mut self, field: &str, value: &str, now_ms: f64) -> Result<String, JsValue> {
        let field = parse_field(field)?;
        self.inner.input(field, value, timestamp(now_ms));
        Ok(self.inner.state().display_value(field).to_string())
    }

    /// Settles every field whose delay has elapsed. Returns how many settled.
    pub fn tick(&mut self, now_ms: f64) -> usize {
        self.inner.set_reference_month(current_month());
        self.inner.tick(timestamp(now_ms))
    }

    /// Timestamp in milliseconds at which the next settle is due, if any.
    pub fn next_deadline_ms(&self) -> Option<f64> {
        self.inner
            .next_deadline()
            .map(|d| d.as_secs_f64() * 1000.0)
    }

    /// Settle delay in milliseconds.
    #[wasm_bindgen(getter)]
    pub fn settle_delay_ms(&self) -> f64 {
        self.inner.config().settle_delay_ms as f64
    }

    /// Status of a field: `neutral`, `pending`, `valid` or `invalid`.
    pub fn status(&self, field: &str) -> Result<String, JsValue> {
        let status = self.inner.validity().get(parse_field(field)?);
        Ok(format!("{:?}", status).to_lowercase())
    }

    /// Error hint for an invalid field.
    pub fn error(&self, field: &str) -> Result<Option<String>, JsValue> {
        Ok(self
            .inner
            .field_error(parse_field(field)?)
            .map(|e| e.to_string()))
    }

    /// Name of the detected network.
    #[wasm_bindgen(getter)]
    pub fn network(&self) -> Option<String> {
        self.inner.network().map(|n| n.name.to_string())
    }

    /// Maximum number of characters the number input should accept.
    #[wasm_bindgen(getter)]
    pub fn max_number_length(&self) -> usize {
        self.inner
            .network()
            .map_or(crate::network::GENERIC_MAX_DIGITS + 3, |n| n.max_formatted_length())
    }

    /// Field that currently has focus.
    #[wasm_bindgen(getter)]
    pub fn focus(&self) -> String {
        self.inner.focus().name().to_string()
    }

    /// Clears every field without notifying.
    pub fn reset(&mut self) {
        self.inner.reset();
    }

    /// Cancels pending settles and silences the form for good.
    pub fn dispose(&mut self) {
        self.inner.dispose();
    }
}
