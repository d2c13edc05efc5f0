// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! License tier gating.
//!
//! The tier is resolved once at process start from configuration and is
//! immutable for the process lifetime. Each tier maps to a fixed feature
//! set plus caps on user count and assignable roles.

use crate::error::DomainError;
use crate::types::Role;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Features gated by the license tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    /// B2C advisor flow.
    Advisor,
    Customers,
    Measurements,
    Inquiries,
    Orders,
    Installation,
    Service,
    DashboardBasic,
    DashboardFull,
    Reports,
    EmailMeasurement,
    EmailInstallation,
    EmailService,
    AuditLogs,
}

impl Feature {
    /// Returns the string representation used for the API.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Advisor => "advisor",
            Self::Customers => "customers",
            Self::Measurements => "measurements",
            Self::Inquiries => "inquiries",
            Self::Orders => "orders",
            Self::Installation => "installation",
            Self::Service => "service",
            Self::DashboardBasic => "dashboard_basic",
            Self::DashboardFull => "dashboard_full",
            Self::Reports => "reports",
            Self::EmailMeasurement => "email_measurement",
            Self::EmailInstallation => "email_installation",
            Self::EmailService => "email_service",
            Self::AuditLogs => "audit_logs",
        }
    }
}

impl FromStr for Feature {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "advisor" => Ok(Self::Advisor),
            "customers" => Ok(Self::Customers),
            "measurements" => Ok(Self::Measurements),
            "inquiries" => Ok(Self::Inquiries),
            "orders" => Ok(Self::Orders),
            "installation" => Ok(Self::Installation),
            "service" => Ok(Self::Service),
            "dashboard_basic" => Ok(Self::DashboardBasic),
            "dashboard_full" => Ok(Self::DashboardFull),
            "reports" => Ok(Self::Reports),
            "email_measurement" => Ok(Self::EmailMeasurement),
            "email_installation" => Ok(Self::EmailInstallation),
            "email_service" => Ok(Self::EmailService),
            "audit_logs" => Ok(Self::AuditLogs),
            _ => Err(DomainError::InvalidFeature(s.to_string())),
        }
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// License tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Basic,
    /// Default for existing installations when the configuration value is
    /// absent or unrecognized.
    #[default]
    Full,
}

impl Tier {
    /// Resolves the tier from a configuration value.
    ///
    /// Unrecognized or missing values fall back to `Full` so existing
    /// installations keep working when no tier is configured.
    #[must_use]
    pub fn resolve(configured: Option<&str>) -> Self {
        match configured {
            Some(value) if value.eq_ignore_ascii_case("basic") => Self::Basic,
            _ => Self::Full,
        }
    }

    /// Returns the string representation used for the API.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Full => "full",
        }
    }

    /// Returns the marketing label for UI display.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Basic => "Basic",
            Self::Full => "Business",
        }
    }

    /// Returns the features enabled for this tier.
    #[must_use]
    pub const fn features(&self) -> &'static [Feature] {
        match self {
            Self::Basic => &[
                Feature::Advisor,
                Feature::Customers,
                Feature::Measurements,
                Feature::Inquiries,
                Feature::DashboardBasic,
            ],
            Self::Full => &[
                Feature::Advisor,
                Feature::Customers,
                Feature::Measurements,
                Feature::Inquiries,
                Feature::Orders,
                Feature::Installation,
                Feature::Service,
                Feature::DashboardBasic,
                Feature::DashboardFull,
                Feature::Reports,
                Feature::EmailMeasurement,
                Feature::EmailInstallation,
                Feature::EmailService,
                Feature::AuditLogs,
            ],
        }
    }

    /// Checks whether a feature is enabled for this tier.
    #[must_use]
    pub fn has_feature(&self, feature: Feature) -> bool {
        self.features().contains(&feature)
    }

    /// Returns the maximum number of active employees for this tier.
    #[must_use]
    pub const fn max_users(&self) -> usize {
        match self {
            Self::Basic => 3,
            Self::Full => 6,
        }
    }

    /// Returns the roles assignable under this tier.
    #[must_use]
    pub const fn allowed_roles(&self) -> &'static [Role] {
        match self {
            Self::Basic => &[Role::Admin, Role::Sales, Role::Technician],
            Self::Full => &[
                Role::Admin,
                Role::Sales,
                Role::Manager,
                Role::ProductionManager,
                Role::Technician,
            ],
        }
    }

    /// Checks whether a role may be assigned under this tier.
    #[must_use]
    pub fn is_role_allowed(&self, role: Role) -> bool {
        self.allowed_roles().contains(&role)
    }
}

impl FromStr for Tier {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(Self::Basic),
            "full" => Ok(Self::Full),
            _ => Err(DomainError::InvalidTier(s.to_string())),
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
