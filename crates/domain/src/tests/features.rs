// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::features::{Feature, Tier};
use crate::types::Role;

#[test]
fn test_basic_tier_excludes_orders() {
    assert!(!Tier::Basic.has_feature(Feature::Orders));
}

#[test]
fn test_basic_tier_core_features() {
    for feature in [
        Feature::Advisor,
        Feature::Customers,
        Feature::Measurements,
        Feature::Inquiries,
        Feature::DashboardBasic,
    ] {
        assert!(Tier::Basic.has_feature(feature), "{feature} missing in basic");
    }
    assert!(!Tier::Basic.has_feature(Feature::Service));
    assert!(!Tier::Basic.has_feature(Feature::AuditLogs));
    assert!(!Tier::Basic.has_feature(Feature::EmailMeasurement));
}

#[test]
fn test_full_tier_is_a_superset_of_basic() {
    for feature in Tier::Basic.features() {
        assert!(Tier::Full.has_feature(*feature));
    }
    assert!(Tier::Full.has_feature(Feature::Orders));
    assert!(Tier::Full.has_feature(Feature::Installation));
    assert!(Tier::Full.has_feature(Feature::EmailInstallation));
}

#[test]
fn test_tier_resolution_defaults_to_full() {
    assert_eq!(Tier::resolve(None), Tier::Full);
    assert_eq!(Tier::resolve(Some("enterprise")), Tier::Full);
    assert_eq!(Tier::resolve(Some("")), Tier::Full);
}

#[test]
fn test_tier_resolution_is_case_insensitive() {
    assert_eq!(Tier::resolve(Some("basic")), Tier::Basic);
    assert_eq!(Tier::resolve(Some("BASIC")), Tier::Basic);
    assert_eq!(Tier::resolve(Some("Full")), Tier::Full);
}

#[test]
fn test_basic_tier_role_and_user_caps() {
    assert_eq!(Tier::Basic.max_users(), 3);
    assert!(Tier::Basic.is_role_allowed(Role::Admin));
    assert!(Tier::Basic.is_role_allowed(Role::Technician));
    assert!(!Tier::Basic.is_role_allowed(Role::Manager));
    assert!(!Tier::Basic.is_role_allowed(Role::ProductionManager));
}

#[test]
fn test_full_tier_allows_every_role() {
    assert_eq!(Tier::Full.max_users(), 6);
    for role in Role::ALL {
        assert!(Tier::Full.is_role_allowed(role));
    }
}
