//! Property-based tests using proptest.
//!
//! These tests verify invariants that should hold for all inputs,
//! helping discover edge cases that manual tests might miss.

use card_input::{
    classify, cvc, expiry, format, generate::generate_card_deterministic_with_prefix, luhn,
    mask, name, validate_card_number, CardData, CardForm, CardNetwork, Field, FieldStatus,
    YearMonth,
};
use proptest::prelude::*;
use std::time::Duration;

// =============================================================================
// STRATEGIES
// =============================================================================

/// Generates any catalog network.
fn network_strategy() -> impl Strategy<Value = CardNetwork> {
    prop_oneof![
        Just(CardNetwork::Visa),
        Just(CardNetwork::Mastercard),
        Just(CardNetwork::Amex),
        Just(CardNetwork::Discover),
    ]
}

/// Generates a random digit string of a given length.
fn digit_string(len: usize) -> impl Strategy<Value = String> {
    proptest::collection::vec(prop::char::range('0', '9'), len)
        .prop_map(|chars| chars.into_iter().collect())
}

/// Generates a random digit string of a length within range.
fn digit_string_range(range: std::ops::RangeInclusive<usize>) -> impl Strategy<Value = String> {
    range.prop_flat_map(digit_string)
}

/// Generates a Luhn-valid number for `network` with random middle digits.
fn valid_card_strategy() -> impl Strategy<Value = (CardNetwork, String)> {
    network_strategy().prop_flat_map(|network| {
        let prefix = card_input::generate::prefix_for_network(network);
        let length = network.descriptor().max_length();
        digit_string(length - prefix.len() - 1).prop_map(move |middle| {
            let partial = format!("{}{}", prefix, middle);
            let number = generate_card_deterministic_with_prefix(&partial, length)
                .unwrap_or_default();
            (network, number)
        })
    })
}

fn october_2026() -> YearMonth {
    YearMonth::new(2026, 10).unwrap()
}

// =============================================================================
// LUHN PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn check_digit_makes_valid(partial in digit_string_range(1..=18)) {
        let digits: Vec<u8> = partial.bytes().map(|b| b - b'0').collect();
        let mut full = digits.clone();
        full.push(luhn::generate_check_digit(&digits));
        prop_assert!(luhn::validate(&full));
    }

    #[test]
    fn single_digit_change_invalidates_luhn(
        (_, number) in valid_card_strategy(),
        position in 0usize..15,
        delta in 1u8..=9,
    ) {
        let mut digits: Vec<u8> = number.bytes().map(|b| b - b'0').collect();
        digits[position] = (digits[position] + delta) % 10;
        prop_assert!(!luhn::validate(&digits));
    }
}

// =============================================================================
// CLASSIFICATION AND VALIDATION PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn valid_cards_validate((network, number) in valid_card_strategy()) {
        let detected = classify(&number);
        prop_assert_eq!(detected.map(|n| n.network), Some(network));
        prop_assert!(validate_card_number(&number, detected));
    }

    #[test]
    fn classification_is_stable_under_extension(
        (_, number) in valid_card_strategy(),
        cut in 4usize..15,
    ) {
        // Four digits are enough to pin every catalog prefix
        prop_assert_eq!(classify(&number[..cut]), classify(&number));
    }

    #[test]
    fn spaces_dont_affect_validation((_, number) in valid_card_strategy()) {
        let network = classify(&number);
        let spaced = format::format_card_number(&number, network);
        prop_assert!(validate_card_number(&spaced, network));
    }

    #[test]
    fn validators_never_panic(input in ".*") {
        let network = classify(&input);
        let _ = validate_card_number(&input, network);
        let _ = cvc::validate_cvc(&input, network);
        let _ = expiry::validate_expiry(&input, october_2026());
        let _ = name::validate_card_name(&input);
        let _ = format::format_expiry(&input);
        let _ = format::format_card_number(&input, network);
    }
}

// =============================================================================
// FORMATTING PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn format_roundtrip(digits in digit_string_range(13..=19), network in proptest::option::of(network_strategy())) {
        let descriptor = network.map(CardNetwork::descriptor);
        let formatted = format::format_card_number(&digits, descriptor);
        prop_assert_eq!(format::strip_formatting(&formatted), digits);
    }

    #[test]
    fn format_is_idempotent(digits in digit_string_range(0..=19), network in proptest::option::of(network_strategy())) {
        let descriptor = network.map(CardNetwork::descriptor);
        let once = format::format_card_number(&digits, descriptor);
        prop_assert_eq!(format::format_card_number(&once, descriptor), once.clone());
        prop_assert!(!once.contains("  "));
        prop_assert!(!once.starts_with(' ') && !once.ends_with(' '));
    }

    #[test]
    fn complete_number_fills_formatted_length((network, number) in valid_card_strategy()) {
        let descriptor = network.descriptor();
        let formatted = format::format_card_number(&number, Some(descriptor));
        prop_assert_eq!(formatted.len(), descriptor.max_formatted_length());
    }

    #[test]
    fn expiry_format_shape(input in "[0-9/ ]{0,10}") {
        let formatted = format::format_expiry(&input);
        prop_assert!(formatted.len() <= 5);
        let digits = format::strip_formatting(&formatted);
        prop_assert_eq!(formatted.contains('/'), digits.len() > 2);
    }
}

// =============================================================================
// EXPIRY AND CVC PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn expiry_validity_matches_month_order(month in 1u8..=12u8, yy in 0u16..=99u16) {
        let input = format!("{:02}/{:02}", month, yy);
        let expected = YearMonth::new(2000 + yy, month).unwrap() >= october_2026();
        prop_assert_eq!(expiry::validate_expiry(&input, october_2026()), expected);
    }

    #[test]
    fn invalid_month_rejected(month in prop_oneof![Just(0u8), 13u8..=99u8], yy in 0u16..=99u16) {
        let input = format!("{:02}/{:02}", month, yy);
        prop_assert!(!expiry::validate_expiry(&input, october_2026()));
    }

    #[test]
    fn cvc_valid_iff_length_matches(network in network_strategy(), code in digit_string_range(1..=6)) {
        let descriptor = network.descriptor();
        prop_assert_eq!(
            cvc::validate_cvc(&code, Some(descriptor)),
            code.len() == descriptor.cvc_length
        );
    }
}

// =============================================================================
// FORM PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn aggregate_equals_conjunction(
        (_, number) in valid_card_strategy(),
        holder in "[A-Za-z ]{0,12}",
        expiry_raw in "[0-9]{0,4}",
        cvc_raw in "[0-9]{0,4}",
    ) {
        let mut last = None;
        let mut form = CardForm::new(|ok: bool, _: &CardData| last = Some(ok))
            .with_reference_month(october_2026());

        form.input(Field::Number, &number, Duration::ZERO);
        form.input(Field::Name, &holder, Duration::ZERO);
        form.input(Field::Expiry, &expiry_raw, Duration::ZERO);
        form.input(Field::Cvc, &cvc_raw, Duration::ZERO);
        form.tick(Duration::from_secs(1));

        let network = form.network();
        let expected = validate_card_number(&number, network)
            && name::validate_card_name(&holder)
            && expiry::validate_expiry(&form.state().formatted_expiry, october_2026())
            && cvc::validate_cvc(&form.state().cvc, network);
        let all_valid = form.validity().all_valid();
        drop(form);

        prop_assert_eq!(all_valid, expected);
        prop_assert_eq!(last, Some(expected));
    }

    #[test]
    fn one_settle_per_burst(keystrokes in proptest::collection::vec(digit_string_range(0..=16), 1..10)) {
        let mut notifications = 0;
        let mut form = CardForm::new(|_: bool, _: &CardData| notifications += 1);

        // Every keystroke lands inside the previous one's window
        for (i, raw) in keystrokes.iter().enumerate() {
            form.input(Field::Number, raw, Duration::from_millis(i as u64 * 100));
            prop_assert_eq!(form.validity().number, FieldStatus::Pending);
        }
        form.tick(Duration::from_secs(60));
        drop(form);

        // A network change may also settle the CVC, which is empty here
        prop_assert_eq!(notifications, 1);
    }

    #[test]
    fn masked_never_exposes_full_number((_, number) in valid_card_strategy()) {
        let masked = mask::mask_number(&number);
        prop_assert!(!masked.contains(number.as_str()));
        prop_assert!(masked.ends_with(&number[number.len() - 4..]));
    }
}
