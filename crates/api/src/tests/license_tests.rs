// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! License tier gating tests.

use futurol_domain::{Feature, Role, Tier};

use super::helpers::{
    create_admin_actor, create_basic_gate, create_full_gate, create_test_persistence,
};
use crate::error::ApiError;
use crate::handlers;
use crate::license::FeatureGate;
use crate::request_response::CreateQuoteRequest;

#[test]
fn test_tier_resolution_defaults_to_full() {
    assert_eq!(FeatureGate::from_config(None).tier(), Tier::Full);
    assert_eq!(FeatureGate::from_config(Some("basic")).tier(), Tier::Basic);
    assert_eq!(FeatureGate::from_config(Some("BASIC")).tier(), Tier::Basic);
    assert_eq!(FeatureGate::from_config(Some("unknown")).tier(), Tier::Full);
}

#[test]
fn test_basic_tier_feature_set() {
    let gate = create_basic_gate();
    for feature in [
        Feature::Advisor,
        Feature::Customers,
        Feature::Measurements,
        Feature::Inquiries,
        Feature::DashboardBasic,
    ] {
        gate.require(feature).unwrap();
    }
    for feature in [
        Feature::Orders,
        Feature::Service,
        Feature::AuditLogs,
        Feature::EmailMeasurement,
        Feature::Installation,
    ] {
        let err = gate.require(feature).unwrap_err();
        assert!(matches!(err, ApiError::FeatureNotAvailable { .. }));
    }
}

#[test]
fn test_full_tier_has_everything() {
    let gate = create_full_gate();
    for feature in [Feature::Orders, Feature::Service, Feature::AuditLogs] {
        gate.require(feature).unwrap();
    }
}

#[test]
fn test_feature_gate_runs_before_permission_check() {
    // Even an admin is bounced by the license before authorization is
    // consulted.
    let mut persistence = create_test_persistence();
    let admin = create_admin_actor(&mut persistence);

    let err = handlers::create_quote(
        &mut persistence,
        &create_basic_gate(),
        &admin,
        CreateQuoteRequest {
            order_id: 1,
            amount_czk: 100_000,
            valid_until: None,
            note: None,
        },
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::FeatureNotAvailable { .. }));
}

#[test]
fn test_seat_limits_per_tier() {
    let basic = create_basic_gate();
    basic.require_seat(2).unwrap();
    let err = basic.require_seat(3).unwrap_err();
    assert!(matches!(err, ApiError::Conflict { .. }));

    let full = create_full_gate();
    full.require_seat(5).unwrap();
    let err = full.require_seat(6).unwrap_err();
    match err {
        ApiError::Conflict { message } => {
            assert!(message.contains("6 active users"), "got: {message}");
        }
        other => panic!("expected Conflict, got {other:?}"),
    }
}

#[test]
fn test_basic_tier_role_restrictions() {
    let basic = create_basic_gate();
    basic
        .require_roles(&[Role::Admin, Role::Sales, Role::Technician])
        .unwrap();

    for role in [Role::Manager, Role::ProductionManager] {
        let err = basic.require_roles(&[role]).unwrap_err();
        assert!(matches!(err, ApiError::Validation { .. }));
    }

    create_full_gate()
        .require_roles(&[Role::Manager, Role::ProductionManager])
        .unwrap();
}
