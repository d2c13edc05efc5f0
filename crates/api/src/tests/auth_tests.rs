// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Login, token, and PIN change tests.

use time::{Duration, OffsetDateTime};

use futurol_domain::Role;

use super::helpers::{
    TEST_PIN, TEST_SECRET, actor_for, create_test_persistence, seed_employee,
};
use crate::auth::{
    AuthenticationService, TOKEN_LIFETIME, TokenClaims, create_token, verify_token,
    verify_token_at,
};
use crate::error::{ApiError, AuthError};
use crate::rate_limit::RateLimiter;

fn create_test_claims() -> TokenClaims {
    let now = OffsetDateTime::now_utc();
    TokenClaims {
        employee_id: 7,
        personal_number: String::from("1007"),
        full_name: String::from("Karel Dvorak"),
        roles: vec![Role::Sales, Role::Technician],
        iat: now.unix_timestamp(),
        exp: (now + TOKEN_LIFETIME).unix_timestamp(),
    }
}

#[test]
fn test_token_round_trip() {
    let claims = create_test_claims();
    let token = create_token(&claims, TEST_SECRET).unwrap();
    let verified = verify_token(&token, TEST_SECRET).unwrap();
    assert_eq!(verified, claims);
}

#[test]
fn test_expired_token_rejected() {
    let claims = create_test_claims();
    let token = create_token(&claims, TEST_SECRET).unwrap();
    let after_expiry = OffsetDateTime::now_utc() + TOKEN_LIFETIME + Duration::seconds(1);
    assert!(verify_token_at(&token, TEST_SECRET, after_expiry).is_none());
}

#[test]
fn test_tampered_token_rejected() {
    let claims = create_test_claims();
    let token = create_token(&claims, TEST_SECRET).unwrap();

    // Flip one character of the payload.
    let mut tampered: String = token.clone();
    let first = if tampered.starts_with('A') { "B" } else { "A" };
    tampered.replace_range(0..1, first);
    assert!(verify_token(&tampered, TEST_SECRET).is_none());
}

#[test]
fn test_wrong_secret_rejected() {
    let claims = create_test_claims();
    let token = create_token(&claims, TEST_SECRET).unwrap();
    assert!(verify_token(&token, "another-secret").is_none());
}

#[test]
fn test_malformed_token_rejected() {
    assert!(verify_token("", TEST_SECRET).is_none());
    assert!(verify_token("no-dot-here", TEST_SECRET).is_none());
    assert!(verify_token("not.base64!", TEST_SECRET).is_none());
}

#[test]
fn test_login_success_issues_valid_token() {
    let mut persistence = create_test_persistence();
    let record = seed_employee(&mut persistence, "1001", vec![Role::Admin]);
    let limiter = RateLimiter::new();

    let outcome = AuthenticationService::login(
        &mut persistence,
        &limiter,
        TEST_SECRET,
        "10.0.0.1",
        "1001",
        TEST_PIN,
    )
    .unwrap();

    assert_eq!(outcome.employee.employee_id, record.employee_id);
    assert_eq!(outcome.employee.roles, vec![Role::Admin]);

    let resolved = AuthenticationService::validate_token(&outcome.token, TEST_SECRET).unwrap();
    assert_eq!(resolved, outcome.employee);
}

#[test]
fn test_login_writes_audit_marker() {
    let mut persistence = create_test_persistence();
    let record = seed_employee(&mut persistence, "1001", vec![Role::Admin]);
    let limiter = RateLimiter::new();

    AuthenticationService::login(
        &mut persistence,
        &limiter,
        TEST_SECRET,
        "10.0.0.1",
        "1001",
        TEST_PIN,
    )
    .unwrap();

    let trail = persistence
        .list_audit_entries_for_entity("Employee", record.employee_id)
        .unwrap();
    assert_eq!(trail.len(), 1);
    assert_eq!(trail[0].action, "LOGIN");
}

#[test]
fn test_login_wrong_pin_counts_down() {
    let mut persistence = create_test_persistence();
    seed_employee(&mut persistence, "1001", vec![Role::Admin]);
    let limiter = RateLimiter::new();

    let err = AuthenticationService::login(
        &mut persistence,
        &limiter,
        TEST_SECRET,
        "10.0.0.1",
        "1001",
        "000000",
    )
    .unwrap_err();

    match err {
        AuthError::AuthenticationFailed { reason } => {
            assert!(reason.contains("4 attempts remaining"), "got: {reason}");
        }
        other => panic!("expected AuthenticationFailed, got {other:?}"),
    }
}

#[test]
fn test_unknown_account_fails_like_wrong_pin() {
    let mut persistence = create_test_persistence();
    seed_employee(&mut persistence, "1001", vec![Role::Admin]);
    let limiter = RateLimiter::new();

    let wrong_pin = AuthenticationService::login(
        &mut persistence,
        &limiter,
        TEST_SECRET,
        "10.0.0.1",
        "1001",
        "000000",
    )
    .unwrap_err();
    let unknown = AuthenticationService::login(
        &mut persistence,
        &limiter,
        TEST_SECRET,
        "10.0.0.2",
        "9999",
        "000000",
    )
    .unwrap_err();

    // Same failure shape for both, so login probing cannot tell a bad
    // PIN from a nonexistent personal number.
    let (AuthError::AuthenticationFailed { reason: a }, AuthError::AuthenticationFailed { reason: b }) =
        (wrong_pin, unknown)
    else {
        panic!("expected AuthenticationFailed for both");
    };
    assert_eq!(a, b);
}

#[test]
fn test_deactivated_account_cannot_login() {
    let mut persistence = create_test_persistence();
    let record = seed_employee(&mut persistence, "1001", vec![Role::Admin]);
    persistence
        .set_employee_active(record.employee_id, false)
        .unwrap();
    let limiter = RateLimiter::new();

    let err = AuthenticationService::login(
        &mut persistence,
        &limiter,
        TEST_SECRET,
        "10.0.0.1",
        "1001",
        TEST_PIN,
    )
    .unwrap_err();
    assert!(matches!(err, AuthError::AuthenticationFailed { .. }));
}

#[test]
fn test_sixth_attempt_with_correct_pin_is_blocked() {
    let mut persistence = create_test_persistence();
    seed_employee(&mut persistence, "1001", vec![Role::Admin]);
    let limiter = RateLimiter::new();

    for _ in 0..5 {
        let _ = AuthenticationService::login(
            &mut persistence,
            &limiter,
            TEST_SECRET,
            "10.0.0.1",
            "1001",
            "000000",
        );
    }

    let err = AuthenticationService::login(
        &mut persistence,
        &limiter,
        TEST_SECRET,
        "10.0.0.1",
        "1001",
        TEST_PIN,
    )
    .unwrap_err();
    assert!(matches!(err, AuthError::RateLimited { .. }));
}

#[test]
fn test_successful_login_clears_failure_count() {
    let mut persistence = create_test_persistence();
    seed_employee(&mut persistence, "1001", vec![Role::Admin]);
    let limiter = RateLimiter::new();

    for _ in 0..3 {
        let _ = AuthenticationService::login(
            &mut persistence,
            &limiter,
            TEST_SECRET,
            "10.0.0.1",
            "1001",
            "000000",
        );
    }
    AuthenticationService::login(
        &mut persistence,
        &limiter,
        TEST_SECRET,
        "10.0.0.1",
        "1001",
        TEST_PIN,
    )
    .unwrap();

    // The counter starts over after the success.
    let err = AuthenticationService::login(
        &mut persistence,
        &limiter,
        TEST_SECRET,
        "10.0.0.1",
        "1001",
        "000000",
    )
    .unwrap_err();
    match err {
        AuthError::AuthenticationFailed { reason } => {
            assert!(reason.contains("4 attempts remaining"), "got: {reason}");
        }
        other => panic!("expected AuthenticationFailed, got {other:?}"),
    }
}

#[test]
fn test_change_pin_requires_current_pin() {
    let mut persistence = create_test_persistence();
    let record = seed_employee(&mut persistence, "1001", vec![Role::Admin]);
    let actor = actor_for(&record);

    let err = AuthenticationService::change_pin(
        &mut persistence,
        &actor,
        "000000",
        "246813",
        "246813",
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::AuthenticationFailed { .. }));
}

#[test]
fn test_change_pin_enforces_policy() {
    let mut persistence = create_test_persistence();
    let record = seed_employee(&mut persistence, "1001", vec![Role::Admin]);
    let actor = actor_for(&record);

    let err =
        AuthenticationService::change_pin(&mut persistence, &actor, TEST_PIN, "111111", "111111")
            .unwrap_err();
    assert!(matches!(err, ApiError::Validation { .. }));
}

#[test]
fn test_change_pin_takes_effect() {
    let mut persistence = create_test_persistence();
    let record = seed_employee(&mut persistence, "1001", vec![Role::Admin]);
    let actor = actor_for(&record);
    let limiter = RateLimiter::new();

    AuthenticationService::change_pin(&mut persistence, &actor, TEST_PIN, "246813", "246813")
        .unwrap();

    let old_pin = AuthenticationService::login(
        &mut persistence,
        &limiter,
        TEST_SECRET,
        "10.0.0.1",
        "1001",
        TEST_PIN,
    );
    assert!(old_pin.is_err());

    AuthenticationService::login(
        &mut persistence,
        &limiter,
        TEST_SECRET,
        "10.0.0.2",
        "1001",
        "246813",
    )
    .unwrap();

    let trail = persistence
        .list_audit_entries_for_entity("Employee", record.employee_id)
        .unwrap();
    let actions: Vec<&str> = trail.iter().map(|entry| entry.action.as_str()).collect();
    assert!(actions.contains(&"PIN_CHANGE"));
}
