// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::measurement::{Dimensions, MeasurementDetails};
use crate::types::{CustomerType, PersonalNumber, Role};
use crate::validation::{
    validate_customer_representation, validate_email, validate_pin, validate_roles,
};

#[test]
fn test_personal_number_must_be_four_digits() {
    assert!(PersonalNumber::new("0001").is_ok());
    assert!(PersonalNumber::new("001").is_err());
    assert!(PersonalNumber::new("00001").is_err());
    assert!(PersonalNumber::new("00a1").is_err());
}

#[test]
fn test_pin_must_be_six_digits() {
    assert!(validate_pin("123456").is_ok());
    assert!(validate_pin("12345").is_err());
    assert!(validate_pin("1234567").is_err());
    assert!(validate_pin("12345a").is_err());
}

#[test]
fn test_roles_must_not_be_empty() {
    assert!(validate_roles(&[Role::Sales]).is_ok());
    assert!(validate_roles(&[]).is_err());
}

#[test]
fn test_email_shape() {
    assert!(validate_email("karel.novak@email.cz").is_ok());
    assert!(validate_email("karel").is_err());
    assert!(validate_email("@email.cz").is_err());
    assert!(validate_email("karel@cz").is_err());
}

#[test]
fn test_b2c_requires_full_name() {
    assert!(validate_customer_representation(CustomerType::B2C, Some("Jan Novák"), None).is_ok());
    assert!(validate_customer_representation(CustomerType::B2C, None, None).is_err());
    assert!(validate_customer_representation(CustomerType::B2C, Some("  "), None).is_err());
}

#[test]
fn test_b2b_requires_company_name() {
    assert!(
        validate_customer_representation(CustomerType::B2B, None, Some("Stavby s.r.o.")).is_ok()
    );
    assert!(validate_customer_representation(CustomerType::B2B, Some("Jan"), None).is_err());
}

#[test]
fn test_dimensions_plausibility() {
    assert!(Dimensions::new(4000, 3000, 2500).is_ok());
    assert!(Dimensions::new(0, 3000, 2500).is_err());
    assert!(Dimensions::new(25_000, 3000, 2500).is_err());
}

#[test]
fn test_measurement_details_round_trip_keeps_the_tag() {
    let details = MeasurementDetails::Klimo {
        lamella_count: Some(24),
        led_lighting: Some(true),
        side_screens: None,
        anchoring: None,
        construction_notes: Some("sloup u okapu".to_string()),
    };
    let json = serde_json::to_string(&details).unwrap();
    assert!(json.contains("\"pergola_type\":\"klimo\""));
    // Optional fields left empty are omitted entirely.
    assert!(!json.contains("side_screens"));
}
