// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::order_status::OrderStatus;
use std::str::FromStr;

const PIPELINE: [OrderStatus; 8] = [
    OrderStatus::Lead,
    OrderStatus::Customer,
    OrderStatus::QuoteSent,
    OrderStatus::Measurement,
    OrderStatus::Contract,
    OrderStatus::Production,
    OrderStatus::Installation,
    OrderStatus::Handover,
];

#[test]
fn test_initial_status_is_lead() {
    assert_eq!(OrderStatus::initial(), OrderStatus::Lead);
}

#[test]
fn test_adjacent_forward_transitions_are_allowed() {
    for pair in PIPELINE.windows(2) {
        assert!(
            pair[0].validate_transition(pair[1]).is_ok(),
            "{} -> {} should be legal",
            pair[0],
            pair[1]
        );
    }
}

#[test]
fn test_forward_jumps_are_allowed() {
    // The generic update path may skip stages, e.g. lead -> quote_sent.
    assert!(
        OrderStatus::Lead
            .validate_transition(OrderStatus::QuoteSent)
            .is_ok()
    );
    assert!(
        OrderStatus::Customer
            .validate_transition(OrderStatus::Production)
            .is_ok()
    );
}

#[test]
fn test_backward_transitions_are_rejected() {
    assert!(
        OrderStatus::Production
            .validate_transition(OrderStatus::Contract)
            .is_err()
    );
    assert!(
        OrderStatus::Handover
            .validate_transition(OrderStatus::Lead)
            .is_err()
    );
}

#[test]
fn test_measurement_reverts_to_quote_sent_only() {
    assert!(
        OrderStatus::Measurement
            .validate_transition(OrderStatus::QuoteSent)
            .is_ok()
    );
    // No other backward move is legal.
    assert!(
        OrderStatus::Contract
            .validate_transition(OrderStatus::QuoteSent)
            .is_err()
    );
    assert!(
        OrderStatus::Measurement
            .validate_transition(OrderStatus::Customer)
            .is_err()
    );
}

#[test]
fn test_cancel_is_reachable_from_every_pipeline_stage() {
    for status in PIPELINE {
        assert!(
            status.validate_transition(OrderStatus::Cancelled).is_ok(),
            "{status} -> cancelled should be legal"
        );
    }
}

#[test]
fn test_cancelled_is_terminal() {
    assert!(OrderStatus::Cancelled.is_terminal());
    for status in PIPELINE {
        let result = OrderStatus::Cancelled.validate_transition(status);
        assert!(matches!(
            result,
            Err(DomainError::InvalidStatusTransition { .. })
        ));
    }
}

#[test]
fn test_self_transition_is_rejected() {
    let result = OrderStatus::Lead.validate_transition(OrderStatus::Lead);
    assert!(result.is_err());
}

#[test]
fn test_status_string_round_trip() {
    for status in PIPELINE {
        assert_eq!(OrderStatus::from_str(status.as_str()).ok(), Some(status));
    }
    assert_eq!(
        OrderStatus::from_str("cancelled").ok(),
        Some(OrderStatus::Cancelled)
    );
    assert!(OrderStatus::from_str("shipped").is_err());
}
