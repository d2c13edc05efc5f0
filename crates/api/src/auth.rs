// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization services.
//!
//! Authentication is PIN-based: an employee logs in with their personal
//! number and a six-digit PIN, verified against a bcrypt hash. Successful
//! logins are issued a signed token (HMAC-SHA256 over base64url JSON
//! claims) that the server carries in an http-only cookie. Verification is
//! fail-closed: any malformed, tampered, or expired token is rejected.
//!
//! Authorization unions the permission matrix over every role the
//! authenticated employee holds.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use time::{Duration, OffsetDateTime};

use futurol_audit::{Actor, AuditAction, AuditEvent, EntityRef};
use futurol_domain::{Module, PermissionAction, Role, has_permission, is_manager_or_above};
use futurol_persistence::{EmployeeData, Persistence, verify_pin};

use crate::error::{ApiError, AuthError, translate_persistence_error};
use crate::pin_policy::PinPolicy;
use crate::rate_limit::{RateLimiter, ip_key, user_key};

type HmacSha256 = Hmac<Sha256>;

/// How long an issued token stays valid.
pub const TOKEN_LIFETIME: Duration = Duration::hours(8);

/// The claims carried inside a signed token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// The employee's database identifier.
    pub employee_id: i64,
    /// The employee's personal number.
    pub personal_number: String,
    /// The employee's full name, for display without a lookup.
    pub full_name: String,
    /// The roles held at login time.
    pub roles: Vec<Role>,
    /// Issued-at, unix seconds.
    pub iat: i64,
    /// Expiry, unix seconds.
    pub exp: i64,
}

/// An authenticated employee with their held roles.
///
/// This is what a validated token resolves to; handlers authorize against
/// the roles carried here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedEmployee {
    /// The employee's database identifier.
    pub employee_id: i64,
    /// The employee's personal number.
    pub personal_number: String,
    /// The employee's full name.
    pub full_name: String,
    /// The roles held by this employee.
    pub roles: Vec<Role>,
}

impl AuthenticatedEmployee {
    /// Converts this authenticated employee into an audit actor.
    #[must_use]
    pub fn to_audit_actor(&self) -> Actor {
        Actor::new(
            self.employee_id,
            self.personal_number.clone(),
            self.full_name.clone(),
        )
    }
}

/// The result of a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    /// The signed token to carry on subsequent requests.
    pub token: String,
    /// The authenticated employee.
    pub employee: AuthenticatedEmployee,
    /// Token expiry, unix seconds.
    pub expires_at: i64,
}

/// Signs token claims with the given secret.
///
/// The token is `base64url(claims JSON) . base64url(HMAC-SHA256)`.
///
/// # Errors
///
/// Returns an error if the claims cannot be serialized.
pub fn create_token(claims: &TokenClaims, secret: &str) -> Result<String, ApiError> {
    let payload_json = serde_json::to_vec(claims).map_err(|e| ApiError::Internal {
        message: format!("Failed to serialize token claims: {e}"),
    })?;
    let payload = URL_SAFE_NO_PAD.encode(payload_json);

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).map_err(|e| ApiError::Internal {
        message: format!("Invalid token secret: {e}"),
    })?;
    mac.update(payload.as_bytes());
    let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

    Ok(format!("{payload}.{signature}"))
}

/// Verifies a token and returns its claims.
///
/// Fail-closed: `None` for anything malformed, tampered, or expired.
#[must_use]
pub fn verify_token(token: &str, secret: &str) -> Option<TokenClaims> {
    verify_token_at(token, secret, OffsetDateTime::now_utc())
}

pub(crate) fn verify_token_at(
    token: &str,
    secret: &str,
    now: OffsetDateTime,
) -> Option<TokenClaims> {
    let (payload, signature) = token.split_once('.')?;
    let signature_bytes = URL_SAFE_NO_PAD.decode(signature).ok()?;

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(payload.as_bytes());
    mac.verify_slice(&signature_bytes).ok()?;

    let payload_json = URL_SAFE_NO_PAD.decode(payload).ok()?;
    let claims: TokenClaims = serde_json::from_slice(&payload_json).ok()?;

    if claims.exp <= now.unix_timestamp() {
        return None;
    }
    Some(claims)
}

/// Authentication service for PIN-based login and token validation.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Authenticates an employee and issues a token.
    ///
    /// Both the caller's address and the claimed personal number are rate
    /// limited. A failed attempt is recorded against both keys; the error
    /// message never reveals whether the account exists.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `rate_limiter` - The shared login rate limiter
    /// * `secret` - The token signing secret
    /// * `remote_addr` - The caller's address, for rate limiting
    /// * `personal_number` - The claimed personal number
    /// * `pin` - The PIN to verify
    ///
    /// # Errors
    ///
    /// Returns `RateLimited` when either key is blocked, and
    /// `AuthenticationFailed` for bad credentials or an inactive account.
    pub fn login(
        persistence: &mut Persistence,
        rate_limiter: &RateLimiter,
        secret: &str,
        remote_addr: &str,
        personal_number: &str,
        pin: &str,
    ) -> Result<LoginOutcome, AuthError> {
        let ip = ip_key(remote_addr);
        let user = user_key(personal_number);

        // The block check runs before any credential work, so a blocked
        // key stays blocked even when the PIN is correct.
        let blocked = rate_limiter
            .check(&ip)
            .into_iter()
            .chain(rate_limiter.check(&user))
            .max();
        if let Some(retry_after_secs) = blocked {
            return Err(AuthError::RateLimited { retry_after_secs });
        }

        let employee: Option<EmployeeData> = persistence
            .get_employee_by_personal_number(personal_number)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Database error: {e}"),
            })?;

        let verified = match &employee {
            Some(record) if record.is_active => {
                verify_pin(pin, &record.pin_hash).map_err(|e| AuthError::AuthenticationFailed {
                    reason: format!("PIN verification error: {e}"),
                })?
            }
            // Unknown or deactivated accounts fail the same way as a bad
            // PIN, so login probing cannot enumerate personal numbers.
            _ => false,
        };

        if !verified {
            rate_limiter.record_failure(&ip);
            rate_limiter.record_failure(&user);
            let remaining = rate_limiter
                .remaining_attempts(&ip)
                .min(rate_limiter.remaining_attempts(&user));
            return Err(AuthError::AuthenticationFailed {
                reason: format!("Invalid personal number or PIN ({remaining} attempts remaining)"),
            });
        }

        // The match above guarantees the record is present and active.
        let Some(record) = employee else {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Invalid personal number or PIN"),
            });
        };

        let roles: Vec<Role> = record.parse_roles().map_err(|e| {
            tracing::error!(employee_id = record.employee_id, error = %e, "stored roles failed to parse");
            AuthError::AuthenticationFailed {
                reason: String::from("Account is misconfigured"),
            }
        })?;

        rate_limiter.clear(&ip);
        rate_limiter.clear(&user);

        let authenticated = AuthenticatedEmployee {
            employee_id: record.employee_id,
            personal_number: record.personal_number.clone(),
            full_name: record.full_name.clone(),
            roles: roles.clone(),
        };

        let now = OffsetDateTime::now_utc();
        let expires_at = (now + TOKEN_LIFETIME).unix_timestamp();
        let claims = TokenClaims {
            employee_id: record.employee_id,
            personal_number: record.personal_number,
            full_name: record.full_name,
            roles,
            iat: now.unix_timestamp(),
            exp: expires_at,
        };
        let token =
            create_token(&claims, secret).map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to issue token: {e}"),
            })?;

        let login_event = AuditEvent::marker(
            authenticated.to_audit_actor(),
            AuditAction::Login,
            EntityRef::new(String::from("Employee"), authenticated.employee_id),
        );
        persistence
            .append_audit_event(&login_event)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to record login: {e}"),
            })?;

        Ok(LoginOutcome {
            token,
            employee: authenticated,
            expires_at,
        })
    }

    /// Validates a token and resolves the authenticated employee.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationFailed` for any invalid or expired token.
    pub fn validate_token(
        token: &str,
        secret: &str,
    ) -> Result<AuthenticatedEmployee, AuthError> {
        let claims = verify_token(token, secret).ok_or_else(|| AuthError::AuthenticationFailed {
            reason: String::from("Invalid or expired token"),
        })?;
        Ok(AuthenticatedEmployee {
            employee_id: claims.employee_id,
            personal_number: claims.personal_number,
            full_name: claims.full_name,
            roles: claims.roles,
        })
    }

    /// Changes the calling employee's PIN.
    ///
    /// The old PIN is verified first, the new PIN must pass the PIN
    /// policy, and a `PIN_CHANGE` audit row is written.
    ///
    /// # Errors
    ///
    /// Returns an error if the old PIN is wrong, the new PIN violates the
    /// policy, or persistence fails.
    pub fn change_pin(
        persistence: &mut Persistence,
        actor: &AuthenticatedEmployee,
        old_pin: &str,
        new_pin: &str,
        confirmation: &str,
    ) -> Result<(), ApiError> {
        let record = persistence
            .get_employee_by_id(actor.employee_id)
            .map_err(translate_persistence_error)?
            .ok_or_else(|| ApiError::NotFound {
                resource_type: String::from("Employee"),
                message: format!("Employee {} does not exist", actor.employee_id),
            })?;

        let old_matches =
            verify_pin(old_pin, &record.pin_hash).map_err(translate_persistence_error)?;
        if !old_matches {
            return Err(ApiError::AuthenticationFailed {
                reason: String::from("Current PIN is incorrect"),
            });
        }

        PinPolicy::default().validate(new_pin, confirmation)?;

        persistence
            .change_pin(actor.employee_id, new_pin)
            .map_err(translate_persistence_error)?;

        let event = AuditEvent::marker(
            actor.to_audit_actor(),
            AuditAction::PinChange,
            EntityRef::new(String::from("Employee"), actor.employee_id),
        );
        persistence
            .append_audit_event(&event)
            .map_err(translate_persistence_error)?;

        Ok(())
    }
}

/// Authorization service for enforcing the permission matrix.
///
/// Every check unions the matrix over the actor's held roles; holding any
/// role that grants the action is sufficient.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Requires a module/action grant for the actor.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Unauthorized` carrying only the action name.
    pub fn require(
        actor: &AuthenticatedEmployee,
        module: Module,
        action: PermissionAction,
        action_name: &str,
    ) -> Result<(), AuthError> {
        if has_permission(&actor.roles, module, action) {
            Ok(())
        } else {
            Err(AuthError::Unauthorized {
                action: action_name.to_string(),
            })
        }
    }

    /// Requires the actor to be an admin or a manager.
    ///
    /// Used for the audit trail, which sits outside the module matrix.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Unauthorized` carrying only the action name.
    pub fn require_manager_or_above(
        actor: &AuthenticatedEmployee,
        action_name: &str,
    ) -> Result<(), AuthError> {
        if is_manager_or_above(&actor.roles) {
            Ok(())
        } else {
            Err(AuthError::Unauthorized {
                action: action_name.to_string(),
            })
        }
    }
}
