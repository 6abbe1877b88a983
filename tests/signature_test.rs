mod common;

use cmi_payment::application::checkout;
use cmi_payment::domain::field_map::FieldMap;
use cmi_payment::domain::order::{BillingPartner, PaymentRequest};
use cmi_payment::domain::signature::{self, HASH_FIELD, OUTBOUND_HASH_FIELD};
use common::*;
use rust_decimal_macros::dec;

#[test]
fn test_outbound_golden_signature() {
    let sig = signature::sign_outbound(&outbound_fields(), SECRET);
    assert_eq!(sig.as_str(), OUTBOUND_GOLDEN);
}

#[test]
fn test_outbound_is_case_sensitive() {
    let sig = signature::sign_outbound(&outbound_fields(), SECRET);
    assert_ne!(sig.as_str(), OUTBOUND_GOLDEN.to_ascii_lowercase());
}

#[test]
fn test_checkout_reproduces_golden_signature() {
    let request = PaymentRequest {
        reference: "REF123".to_string(),
        amount: dec!(10),
        partner: BillingPartner {
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: "0600000000".to_string(),
            address: "1 Rue Test".to_string(),
            city: "Casablanca".to_string(),
            zip: "20000".to_string(),
            country_name: "Morocco".to_string(),
            country_code: "MA".to_string(),
            lang: "fr_FR".to_string(),
            ..Default::default()
        },
    };

    let fields =
        checkout::build_redirect_fields(&merchant(true), &request, BASE_URL, "197328465").unwrap();

    assert_eq!(fields.get(OUTBOUND_HASH_FIELD), Some(OUTBOUND_GOLDEN));
}

#[test]
fn test_empty_secret_is_deterministic() {
    let first = signature::sign_outbound(&outbound_fields(), "");
    let second = signature::sign_outbound(&outbound_fields(), "");
    assert_eq!(first, second);
    assert_eq!(first.as_str(), OUTBOUND_EMPTY_SECRET_GOLDEN);
}

#[test]
fn test_fixture_callback_verifies() {
    let fields = callback_fields();
    assert_eq!(fields.get(HASH_FIELD), Some(CALLBACK_GOLDEN));
    assert!(signature::verify(&fields, SECRET, CALLBACK_GOLDEN));
    assert_eq!(signature::sign_inbound(&fields, SECRET).as_str(), CALLBACK_GOLDEN);
}

#[test]
fn test_flipped_character_fails_verification() {
    let fields = callback_fields();
    let mut flipped: Vec<char> = CALLBACK_GOLDEN.chars().collect();
    flipped[10] = if flipped[10] == 'A' { 'B' } else { 'A' };
    let flipped: String = flipped.into_iter().collect();

    assert!(!signature::verify(&fields, SECRET, &flipped));
}

#[test]
fn test_wrong_secret_fails_verification() {
    assert!(!signature::verify(&callback_fields(), "othersecret", CALLBACK_GOLDEN));
}

#[test]
fn test_inbound_key_case_and_posted_order_keep_signature() {
    let original: FieldMap = [("Amount", "1"), ("bank", "2"), ("Currency", "3")]
        .into_iter()
        .collect();
    let recased: FieldMap = [("AMOUNT", "1"), ("Bank", "2"), ("currency", "3")]
        .into_iter()
        .collect();
    let reordered: FieldMap = [("Currency", "3"), ("bank", "2"), ("Amount", "1")]
        .into_iter()
        .collect();

    let expected = signature::sign_inbound(&original, SECRET);
    assert_eq!(signature::sign_inbound(&recased, SECRET), expected);
    assert_eq!(signature::sign_inbound(&reordered, SECRET), expected);
}
