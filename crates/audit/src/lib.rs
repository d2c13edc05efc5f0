// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

//! Audit event types.
//!
//! Every security-relevant mutation (login, PIN change, employee CRUD,
//! lead/inquiry conversion) produces exactly one audit event. Events are
//! immutable once created; the persistence layer appends them and never
//! updates or deletes rows.

use futurol_domain::DomainError;
use std::str::FromStr;

/// The employee performing an audited action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// Database identifier of the acting employee.
    pub employee_id: i64,
    /// The actor's personal number at the time of the action.
    pub personal_number: String,
    /// The actor's display name at the time of the action.
    pub full_name: String,
}

impl Actor {
    /// Creates a new Actor.
    #[must_use]
    pub const fn new(employee_id: i64, personal_number: String, full_name: String) -> Self {
        Self {
            employee_id,
            personal_number,
            full_name,
        }
    }
}

/// The closed set of audited actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    Login,
    PinChange,
    EmployeeCreated,
    EmployeeUpdated,
    EmployeeDeactivated,
    LeadConverted,
    LeadRejected,
    InquiryConverted,
}

impl AuditAction {
    /// Returns the string representation stored in the audit log.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Login => "LOGIN",
            Self::PinChange => "PIN_CHANGE",
            Self::EmployeeCreated => "EMPLOYEE_CREATED",
            Self::EmployeeUpdated => "EMPLOYEE_UPDATED",
            Self::EmployeeDeactivated => "EMPLOYEE_DEACTIVATED",
            Self::LeadConverted => "LEAD_CONVERTED",
            Self::LeadRejected => "LEAD_REJECTED",
            Self::InquiryConverted => "INQUIRY_CONVERTED",
        }
    }
}

impl FromStr for AuditAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOGIN" => Ok(Self::Login),
            "PIN_CHANGE" => Ok(Self::PinChange),
            "EMPLOYEE_CREATED" => Ok(Self::EmployeeCreated),
            "EMPLOYEE_UPDATED" => Ok(Self::EmployeeUpdated),
            "EMPLOYEE_DEACTIVATED" => Ok(Self::EmployeeDeactivated),
            "LEAD_CONVERTED" => Ok(Self::LeadConverted),
            "LEAD_REJECTED" => Ok(Self::LeadRejected),
            "INQUIRY_CONVERTED" => Ok(Self::InquiryConverted),
            _ => Err(DomainError::InvalidAuditAction(s.to_string())),
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The entity an audited action touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRef {
    /// The entity type name (e.g. "Employee", "Lead").
    pub entity_type: String,
    /// The database identifier of the entity.
    pub entity_id: i64,
}

impl EntityRef {
    /// Creates a new entity reference.
    #[must_use]
    pub const fn new(entity_type: String, entity_id: i64) -> Self {
        Self {
            entity_type,
            entity_id,
        }
    }
}

/// An immutable audit event.
///
/// Captures who acted, what they did, which entity was touched, and
/// optional JSON snapshots of the entity before and after the mutation.
/// The persistence layer stamps the creation time on append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// Who performed the action.
    pub actor: Actor,
    /// What was performed.
    pub action: AuditAction,
    /// The entity that was touched.
    pub entity: EntityRef,
    /// JSON snapshot of the entity before the mutation, if meaningful.
    pub before: Option<String>,
    /// JSON snapshot of the entity after the mutation, if meaningful.
    pub after: Option<String>,
}

impl AuditEvent {
    /// Creates a new audit event.
    #[must_use]
    pub const fn new(
        actor: Actor,
        action: AuditAction,
        entity: EntityRef,
        before: Option<String>,
        after: Option<String>,
    ) -> Self {
        Self {
            actor,
            action,
            entity,
            before,
            after,
        }
    }

    /// Creates an event with no snapshots, for actions like login where
    /// the act itself is the record.
    #[must_use]
    pub const fn marker(actor: Actor, action: AuditAction, entity: EntityRef) -> Self {
        Self {
            actor,
            action,
            entity,
            before: None,
            after: None,
        }
    }
}

#[cfg(test)]
mod tests;
