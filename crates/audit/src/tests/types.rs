// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Actor, AuditAction, AuditEvent, EntityRef};
use std::str::FromStr;

fn create_test_actor() -> Actor {
    Actor::new(1, String::from("0001"), String::from("Systém Admin"))
}

#[test]
fn test_audit_action_string_round_trip() {
    for action in [
        AuditAction::Login,
        AuditAction::PinChange,
        AuditAction::EmployeeCreated,
        AuditAction::EmployeeUpdated,
        AuditAction::EmployeeDeactivated,
        AuditAction::LeadConverted,
        AuditAction::LeadRejected,
        AuditAction::InquiryConverted,
    ] {
        assert_eq!(AuditAction::from_str(action.as_str()).ok(), Some(action));
    }
    assert!(AuditAction::from_str("DELETE_EVERYTHING").is_err());
}

#[test]
fn test_marker_event_has_no_snapshots() {
    let event = AuditEvent::marker(
        create_test_actor(),
        AuditAction::Login,
        EntityRef::new(String::from("Employee"), 1),
    );
    assert!(event.before.is_none());
    assert!(event.after.is_none());
    assert_eq!(event.action, AuditAction::Login);
}

#[test]
fn test_event_preserves_snapshots() {
    let event = AuditEvent::new(
        create_test_actor(),
        AuditAction::EmployeeUpdated,
        EntityRef::new(String::from("Employee"), 7),
        Some(String::from("{\"is_active\":true}")),
        Some(String::from("{\"is_active\":false}")),
    );
    assert_eq!(event.entity.entity_id, 7);
    assert_eq!(event.before.as_deref(), Some("{\"is_active\":true}"));
}
