//! Debounced card form state machine.
//!
//! [`CardForm`] owns the live buffers of the four card fields. Keystrokes are
//! formatted immediately and move the field to [`FieldStatus::Pending`]; the
//! field is validated only once its settle delay has elapsed without another
//! keystroke. Every settle recomputes the aggregate validity and reports the
//! full [`CardData`] to the [`FormObserver`].
//!
//! The form never reads a clock. Callers pass timestamps (any monotonic
//! `Duration` from a fixed origin) to [`CardForm::input`] and [`CardForm::tick`],
//! or drive settles themselves with [`CardForm::settle`] and the returned
//! [`Ticket`]s.
//!
//! # Example
//!
//! ```
//! use card_input::form::{CardData, CardForm, Field, FieldStatus};
//! use std::time::Duration;
//!
//! let ms = Duration::from_millis;
//! let mut valid = None;
//! let mut form = CardForm::new(|ok: bool, _: &CardData| valid = Some(ok));
//!
//! form.input(Field::Number, "4242 4242 4242 4242", ms(0));
//! assert_eq!(form.validity().get(Field::Number), FieldStatus::Pending);
//!
//! form.tick(ms(300));
//! assert_eq!(form.validity().get(Field::Number), FieldStatus::Valid);
//! drop(form);
//! assert_eq!(valid, Some(false));
//! ```

use crate::debounce::{Debouncer, Ticket};
use crate::error::FieldError;
use crate::expiry::YearMonth;
use crate::format::{format_card_number, format_expiry, strip_formatting};
use crate::mask::{mask_number, mask_secret};
use crate::network::{classify, NetworkDescriptor, GENERIC_MAX_CVC, GENERIC_MAX_DIGITS};
use crate::validate::validate_field;
use std::fmt;
use std::time::Duration;
use tracing::{debug, trace};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Default settle delay in milliseconds.
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 300;

/// Formatted length of a complete `MM/YY` expiry.
const EXPIRY_FORMATTED_LEN: usize = 5;

/// The four card form fields, in focus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Field {
    /// Card number.
    Number,
    /// Cardholder name.
    Name,
    /// Expiry date (`MM/YY`).
    Expiry,
    /// Card verification code.
    Cvc,
}

impl Field {
    /// All fields in focus order.
    pub const ALL: [Field; 4] = [Self::Number, Self::Name, Self::Expiry, Self::Cvc];

    /// Lower-case field name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Name => "name",
            Self::Expiry => "expiry",
            Self::Cvc => "cvc",
        }
    }

    /// Looks a field up by its [`name`](Self::name).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Validation status of one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FieldStatus {
    /// Not evaluated yet, or empty after the last settle.
    #[default]
    Neutral,
    /// Edited; waiting for the settle delay.
    Pending,
    /// Settled and valid.
    Valid,
    /// Settled and invalid.
    Invalid,
}

/// Status of every field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldValidity {
    /// Card number status.
    pub number: FieldStatus,
    /// Cardholder name status.
    pub name: FieldStatus,
    /// Expiry status.
    pub expiry: FieldStatus,
    /// CVC status.
    pub cvc: FieldStatus,
}

impl FieldValidity {
    /// Status of `field`.
    pub fn get(&self, field: Field) -> FieldStatus {
        match field {
            Field::Number => self.number,
            Field::Name => self.name,
            Field::Expiry => self.expiry,
            Field::Cvc => self.cvc,
        }
    }

    fn set(&mut self, field: Field, status: FieldStatus) {
        match field {
            Field::Number => self.number = status,
            Field::Name => self.name = status,
            Field::Expiry => self.expiry = status,
            Field::Cvc => self.cvc = status,
        }
    }

    /// True iff every field is [`FieldStatus::Valid`].
    pub fn all_valid(&self) -> bool {
        Field::ALL.iter().all(|&f| self.get(f) == FieldStatus::Valid)
    }
}

/// Live buffers of the form. Zeroed when dropped or reset.
#[derive(Clone, Default, Zeroize, ZeroizeOnDrop)]
pub struct CardFormState {
    /// Card number digits only.
    pub raw_digits: String,
    /// Card number as displayed.
    pub formatted_number: String,
    /// Cardholder name as typed.
    pub holder_name: String,
    /// Expiry as displayed (`MM/YY`).
    pub formatted_expiry: String,
    /// CVC digits.
    pub cvc: String,
}

impl CardFormState {
    /// The value a field's validator runs against.
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Number => &self.raw_digits,
            Field::Name => &self.holder_name,
            Field::Expiry => &self.formatted_expiry,
            Field::Cvc => &self.cvc,
        }
    }

    /// The value shown in the field's input.
    pub fn display_value(&self, field: Field) -> &str {
        match field {
            Field::Number => &self.formatted_number,
            _ => self.value(field),
        }
    }
}

impl fmt::Debug for CardFormState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardFormState")
            .field("number", &mask_number(&self.raw_digits))
            .field("holder_name", &self.holder_name)
            .field("formatted_expiry", &self.formatted_expiry)
            .field("cvc", &mask_secret(&self.cvc))
            .finish()
    }
}

/// Structured card data reported on every settle.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CardData {
    /// Card number digits.
    pub number: String,
    /// Trimmed cardholder name.
    pub name: String,
    /// Expiry as `MM/YY`.
    pub expiry: String,
    /// CVC digits.
    pub cvc: String,
    /// True iff all four fields are valid.
    #[zeroize(skip)]
    pub is_valid: bool,
}

impl fmt::Debug for CardData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardData")
            .field("number", &mask_number(&self.number))
            .field("name", &self.name)
            .field("expiry", &self.expiry)
            .field("cvc", &mask_secret(&self.cvc))
            .field("is_valid", &self.is_valid)
            .finish()
    }
}

/// Form behaviour settings.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FormConfig {
    /// Delay after the last keystroke before a field is validated.
    pub settle_delay_ms: u64,
    /// Move focus to the next field when a field completes validly.
    pub auto_advance: bool,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
            auto_advance: true,
        }
    }
}

impl FormConfig {
    /// Sets the settle delay.
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay_ms = delay.as_millis().min(u64::MAX as u128) as u64;
        self
    }

    /// Enables or disables focus auto-advance.
    pub fn with_auto_advance(mut self, enabled: bool) -> Self {
        self.auto_advance = enabled;
        self
    }

    /// The settle delay as a `Duration`.
    #[inline]
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

/// Receives form notifications.
///
/// Implemented for every `FnMut(bool, &CardData)` closure, which only
/// observes changes.
pub trait FormObserver {
    /// Called after every settle with the aggregate validity and card data.
    fn on_change(&mut self, is_valid: bool, data: &CardData);

    /// Called when focus auto-advances from one field to the next.
    fn on_focus_advance(&mut self, _from: Field, _to: Field) {}
}

impl<F> FormObserver for F
where
    F: FnMut(bool, &CardData),
{
    fn on_change(&mut self, is_valid: bool, data: &CardData) {
        self(is_valid, data)
    }
}

/// The debounced card form.
pub struct CardForm<O> {
    config: FormConfig,
    state: CardFormState,
    validity: FieldValidity,
    network: Option<&'static NetworkDescriptor>,
    timers: Debouncer<Field>,
    focus: Field,
    today: Option<YearMonth>,
    observer: O,
    disposed: bool,
}

impl<O: FormObserver> CardForm<O> {
    /// Creates an empty form with the default configuration.
    pub fn new(observer: O) -> Self {
        Self::with_config(FormConfig::default(), observer)
    }

    /// Creates an empty form.
    pub fn with_config(config: FormConfig, observer: O) -> Self {
        Self {
            config,
            state: CardFormState::default(),
            validity: FieldValidity::default(),
            network: None,
            timers: Debouncer::new(),
            focus: Field::Number,
            today: None,
            observer,
            disposed: false,
        }
    }

    /// Pins the month expiry dates are checked against instead of the system clock.
    pub fn with_reference_month(mut self, today: YearMonth) -> Self {
        self.today = Some(today);
        self
    }

    /// Replaces the month expiry dates are checked against.
    pub fn set_reference_month(&mut self, today: YearMonth) {
        self.today = Some(today);
    }

    /// Handles a keystroke: reformats the field, marks it pending and
    /// (re)starts its settle timer.
    ///
    /// Returns `None` once the form has been disposed.
    pub fn input(&mut self, field: Field, raw: &str, now: Duration) -> Option<Ticket> {
        if self.disposed {
            return None;
        }

        match field {
            Field::Number => self.update_number(raw, now),
            Field::Name => replace_secret(&mut self.state.holder_name, raw.to_string()),
            Field::Expiry => replace_secret(&mut self.state.formatted_expiry, format_expiry(raw)),
            Field::Cvc => {
                let cvc: String = strip_formatting(raw)
                    .chars()
                    .take(self.max_cvc_length())
                    .collect();
                replace_secret(&mut self.state.cvc, cvc);
            }
        }

        self.focus = field;
        trace!(%field, "field edited");
        Some(self.mark_pending(field, now))
    }

    /// Settles every field whose delay has elapsed by `now`.
    ///
    /// Returns the number of fields settled.
    pub fn tick(&mut self, now: Duration) -> usize {
        if self.disposed {
            return 0;
        }
        let due = self.timers.due(now);
        for &field in &due {
            self.settle_field(field);
        }
        due.len()
    }

    /// Settles `field` if `ticket` is still its current ticket.
    ///
    /// Meant for drivers that run their own timers; a superseded or cancelled
    /// ticket is ignored.
    pub fn settle(&mut self, field: Field, ticket: Ticket) -> bool {
        if self.disposed || !self.timers.fire(field, ticket) {
            return false;
        }
        self.settle_field(field);
        true
    }

    /// Clears every field and pending settle without notifying the observer.
    pub fn reset(&mut self) {
        self.timers.cancel_all();
        self.state.zeroize();
        self.validity = FieldValidity::default();
        self.network = None;
        self.focus = Field::Number;
    }

    /// Live buffers.
    #[inline]
    pub fn state(&self) -> &CardFormState {
        &self.state
    }

    /// Per-field status.
    #[inline]
    pub fn validity(&self) -> FieldValidity {
        self.validity
    }

    /// The network detected from the current number.
    #[inline]
    pub fn network(&self) -> Option<&'static NetworkDescriptor> {
        self.network
    }

    /// The field that currently has focus.
    #[inline]
    pub fn focus(&self) -> Field {
        self.focus
    }

    /// Moves focus explicitly.
    pub fn set_focus(&mut self, field: Field) {
        self.focus = field;
    }

    /// Form configuration.
    #[inline]
    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    /// The observer.
    #[inline]
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Mutable access to the observer.
    #[inline]
    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Returns true if `field` has a settle timer running.
    #[inline]
    pub fn is_pending(&self, field: Field) -> bool {
        self.timers.is_pending(field)
    }

    /// The earliest time at which [`tick`](Self::tick) would settle something.
    #[inline]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    /// Maximum number of card digits for the current network.
    pub fn max_number_length(&self) -> usize {
        self.network
            .map_or(GENERIC_MAX_DIGITS, NetworkDescriptor::max_length)
    }

    /// Maximum CVC digits for the current network.
    pub fn max_cvc_length(&self) -> usize {
        self.network.map_or(GENERIC_MAX_CVC, |n| n.cvc_length)
    }

    /// The current card data and aggregate validity.
    pub fn card_data(&self) -> CardData {
        CardData {
            number: self.state.raw_digits.clone(),
            name: self.state.holder_name.trim().to_string(),
            expiry: self.state.formatted_expiry.clone(),
            cvc: self.state.cvc.clone(),
            is_valid: self.validity.all_valid(),
        }
    }

    /// Why `field` is invalid, if its last settle marked it invalid.
    pub fn field_error(&self, field: Field) -> Option<FieldError> {
        if self.validity.get(field) != FieldStatus::Invalid {
            return None;
        }
        validate_field(field, self.state.value(field), self.network, self.today()).err()
    }

    fn today(&self) -> YearMonth {
        self.today.unwrap_or_else(YearMonth::now)
    }

    fn mark_pending(&mut self, field: Field, now: Duration) -> Ticket {
        self.validity.set(field, FieldStatus::Pending);
        self.timers.schedule(field, now, self.config.settle_delay())
    }

    fn update_number(&mut self, raw: &str, now: Duration) {
        let mut digits = strip_formatting(raw);
        let network = classify(&digits);
        digits.truncate(network.map_or(GENERIC_MAX_DIGITS, NetworkDescriptor::max_length));

        if network != self.network {
            debug!(
                from = self.network.map(|n| n.name),
                to = network.map(|n| n.name),
                "card network changed"
            );
            self.network = network;

            // CVC length and validity both depend on the network.
            let max_cvc = self.max_cvc_length();
            if self.state.cvc.len() > max_cvc {
                self.state.cvc.truncate(max_cvc);
            }
            if !self.state.cvc.is_empty() {
                self.mark_pending(Field::Cvc, now);
            }
        }

        replace_secret(
            &mut self.state.formatted_number,
            format_card_number(&digits, network),
        );
        replace_secret(&mut self.state.raw_digits, digits);
    }

    fn settle_field(&mut self, field: Field) {
        let value = self.state.value(field);
        let status = if value.is_empty() {
            FieldStatus::Neutral
        } else {
            match validate_field(field, value, self.network, self.today()) {
                Ok(()) => FieldStatus::Valid,
                Err(e) => {
                    debug!(%field, error = %e, "field invalid");
                    FieldStatus::Invalid
                }
            }
        };
        self.validity.set(field, status);

        if status == FieldStatus::Valid && self.config.auto_advance {
            self.auto_advance(field);
        }

        let data = self.card_data();
        debug!(
            %field,
            status = ?status,
            is_valid = data.is_valid,
            number = %mask_number(&data.number),
            "field settled"
        );
        self.observer.on_change(data.is_valid, &data);
    }

    fn auto_advance(&mut self, field: Field) {
        if self.focus != field {
            return;
        }
        let next = match field {
            Field::Number => {
                let complete = self
                    .network
                    .is_some_and(|n| self.state.formatted_number.len() >= n.max_formatted_length());
                complete.then_some(Field::Name)
            }
            Field::Expiry => {
                (self.state.formatted_expiry.len() == EXPIRY_FORMATTED_LEN).then_some(Field::Cvc)
            }
            _ => None,
        };

        if let Some(to) = next {
            trace!(from = %field, %to, "focus advanced");
            self.focus = to;
            self.observer.on_focus_advance(field, to);
        }
    }
}

impl<O> CardForm<O> {
    /// Cancels every pending settle, clears the buffers and makes the form inert.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.timers.cancel_all();
        self.state.zeroize();
        self.disposed = true;
        debug!("card form disposed");
    }

    /// Returns true once [`dispose`](Self::dispose) has run.
    #[inline]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl<O> fmt::Debug for CardForm<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardForm")
            .field("state", &self.state)
            .field("validity", &self.validity)
            .field("network", &self.network.map(|n| n.network))
            .field("focus", &self.focus)
            .field("disposed", &self.disposed)
            .finish()
    }
}

/// Overwrites a sensitive buffer, zeroing the old contents first.
fn replace_secret(slot: &mut String, value: String) {
    slot.zeroize();
    *slot = value;
}
