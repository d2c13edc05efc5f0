// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! License tier enforcement.
//!
//! The gate is resolved once at startup from the `LICENSE_TIER`
//! configuration value and passed into every handler that touches a gated
//! feature. A feature check failure is a hard stop, never a degraded mode.

use crate::error::ApiError;
use futurol_domain::{Feature, Role, Tier};

/// Enforces the feature set and seat limits of the active license tier.
#[derive(Debug, Clone, Copy)]
pub struct FeatureGate {
    tier: Tier,
}

impl FeatureGate {
    /// Creates a gate for a resolved tier.
    #[must_use]
    pub const fn new(tier: Tier) -> Self {
        Self { tier }
    }

    /// Creates a gate from the raw `LICENSE_TIER` configuration value.
    ///
    /// Missing or unrecognized values resolve to the full tier.
    #[must_use]
    pub fn from_config(configured: Option<&str>) -> Self {
        Self::new(Tier::resolve(configured))
    }

    /// Returns the active tier.
    #[must_use]
    pub const fn tier(&self) -> Tier {
        self.tier
    }

    /// Requires a feature to be enabled under the active tier.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::FeatureNotAvailable` when the tier does not
    /// include the feature.
    pub fn require(&self, feature: Feature) -> Result<(), ApiError> {
        if self.tier.has_feature(feature) {
            Ok(())
        } else {
            Err(ApiError::FeatureNotAvailable {
                feature: feature.as_str().to_string(),
            })
        }
    }

    /// Requires that adding one more active employee stays within the
    /// tier's seat limit.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Conflict` when the seat limit is reached.
    pub fn require_seat(&self, active_employees: i64) -> Result<(), ApiError> {
        let max = i64::try_from(self.tier.max_users()).unwrap_or(i64::MAX);
        if active_employees < max {
            Ok(())
        } else {
            Err(ApiError::Conflict {
                message: format!(
                    "The {} license allows at most {} active users",
                    self.tier.label(),
                    self.tier.max_users()
                ),
            })
        }
    }

    /// Requires that every given role is assignable under the active tier.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` naming the first disallowed role.
    pub fn require_roles(&self, roles: &[Role]) -> Result<(), ApiError> {
        for role in roles {
            if !self.tier.is_role_allowed(*role) {
                return Err(ApiError::Validation {
                    field: String::from("roles"),
                    message: format!(
                        "Role '{role}' is not available in the {} license",
                        self.tier.label()
                    ),
                });
            }
        }
        Ok(())
    }
}
