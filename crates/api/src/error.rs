// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use crate::pin_policy::PinPolicyError;
use futurol_domain::DomainError;
use futurol_persistence::PersistenceError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Too many failed login attempts; the caller must wait.
    RateLimited {
        /// Seconds until the block expires.
        retry_after_secs: u64,
    },
    /// Authorization failed.
    ///
    /// The variant deliberately carries only the attempted action, never
    /// which role or module grant was missing.
    Unauthorized {
        /// The action that was attempted.
        action: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::RateLimited { retry_after_secs } => {
                write!(f, "Too many failed attempts, retry in {retry_after_secs} seconds")
            }
            Self::Unauthorized { action } => {
                write!(f, "Unauthorized: '{action}' is not permitted")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain and persistence errors and represent the
/// API contract. The server maps each variant to one HTTP status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Invalid input was provided.
    Validation {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Too many failed login attempts; the caller must wait.
    RateLimited {
        /// Seconds until the block expires.
        retry_after_secs: u64,
    },
    /// Authorization failed - the actor does not have permission.
    Unauthorized {
        /// The action that was attempted.
        action: String,
    },
    /// The feature is not available under the active license tier.
    FeatureNotAvailable {
        /// The gated feature name.
        feature: String,
    },
    /// A requested resource was not found.
    NotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The request conflicts with the current state of the resource.
    Conflict {
        /// A human-readable description of the conflict.
        message: String,
    },
    /// An outgoing email could not be delivered.
    MailDelivery {
        /// A description of the delivery failure.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::RateLimited { retry_after_secs } => {
                write!(f, "Too many failed attempts, retry in {retry_after_secs} seconds")
            }
            Self::Unauthorized { action } => {
                write!(f, "Unauthorized: '{action}' is not permitted")
            }
            Self::FeatureNotAvailable { feature } => {
                write!(f, "Feature '{feature}' is not available in the current license tier")
            }
            Self::NotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Conflict { message } => {
                write!(f, "Conflict: {message}")
            }
            Self::MailDelivery { message } => {
                write!(f, "Email delivery failed: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::RateLimited { retry_after_secs } => Self::RateLimited { retry_after_secs },
            AuthError::Unauthorized { action } => Self::Unauthorized { action },
        }
    }
}

impl From<PinPolicyError> for ApiError {
    fn from(err: PinPolicyError) -> Self {
        Self::Validation {
            field: String::from("pin"),
            message: err.to_string(),
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked
/// directly across the API boundary.
pub(crate) fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidRole(msg) => ApiError::Validation {
            field: String::from("roles"),
            message: format!("Invalid role: {msg}"),
        },
        DomainError::InvalidModule(msg) => ApiError::Validation {
            field: String::from("module"),
            message: format!("Invalid module: {msg}"),
        },
        DomainError::InvalidTier(msg) => ApiError::Validation {
            field: String::from("tier"),
            message: format!("Invalid license tier: {msg}"),
        },
        DomainError::InvalidFeature(msg) => ApiError::Validation {
            field: String::from("feature"),
            message: format!("Invalid feature: {msg}"),
        },
        DomainError::InvalidOrderStatus(msg) => ApiError::Validation {
            field: String::from("status"),
            message: format!("Invalid order status: {msg}"),
        },
        DomainError::InvalidStatusTransition { from, to, reason } => ApiError::Conflict {
            message: format!("Cannot move order from '{from}' to '{to}': {reason}"),
        },
        DomainError::InvalidLeadStatus(msg) => ApiError::Validation {
            field: String::from("status"),
            message: format!("Invalid lead status: {msg}"),
        },
        DomainError::LeadAlreadyTerminal { status } => ApiError::Conflict {
            message: format!("Lead is already '{status}' and cannot be processed again"),
        },
        DomainError::InvalidRejectReason(msg) => ApiError::Validation {
            field: String::from("reason"),
            message: format!("Invalid reject reason: {msg}"),
        },
        DomainError::InvalidPersonalNumber(msg) => ApiError::Validation {
            field: String::from("personal_number"),
            message: format!("'{msg}' is not a valid personal number"),
        },
        DomainError::InvalidPin(msg) => ApiError::Validation {
            field: String::from("pin"),
            message: msg,
        },
        DomainError::MissingRoles => ApiError::Validation {
            field: String::from("roles"),
            message: String::from("Employee must hold at least one role"),
        },
        DomainError::InvalidEmail(msg) => ApiError::Validation {
            field: String::from("email"),
            message: format!("Invalid email address: {msg}"),
        },
        DomainError::InvalidCustomerType(msg) => ApiError::Validation {
            field: String::from("customer_type"),
            message: format!("Invalid customer type: {msg}"),
        },
        DomainError::InvalidCustomerSource(msg) => ApiError::Validation {
            field: String::from("source"),
            message: format!("Invalid customer source: {msg}"),
        },
        DomainError::InvalidLeadSource(msg) => ApiError::Validation {
            field: String::from("source"),
            message: format!("Invalid lead source: {msg}"),
        },
        DomainError::InvalidCustomerRepresentation(msg) => ApiError::Validation {
            field: String::from("customer_type"),
            message: msg,
        },
        DomainError::InvalidPriority(msg) => ApiError::Validation {
            field: String::from("priority"),
            message: format!("Invalid priority: {msg}"),
        },
        DomainError::InvalidProductCode(msg) => ApiError::Validation {
            field: String::from("product_code"),
            message: format!("Invalid product code: {msg}"),
        },
        DomainError::InvalidQuoteStatus(msg) => ApiError::Validation {
            field: String::from("status"),
            message: format!("Invalid quote status: {msg}"),
        },
        DomainError::InvalidTicketType(msg) => ApiError::Validation {
            field: String::from("ticket_type"),
            message: format!("Invalid service ticket type: {msg}"),
        },
        DomainError::InvalidTicketStatus(msg) => ApiError::Validation {
            field: String::from("status"),
            message: format!("Invalid service ticket status: {msg}"),
        },
        DomainError::InvalidAuditAction(msg) => ApiError::Internal {
            message: format!("Invalid audit action: {msg}"),
        },
        DomainError::InvalidDimensions(msg) => ApiError::Validation {
            field: String::from("dimensions"),
            message: msg.to_string(),
        },
    }
}

/// Translates a persistence error into an API error.
///
/// Referential guard violations surface as conflicts; unexpected database
/// failures are logged and surfaced generically.
pub(crate) fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::NotFound { entity, id } => ApiError::NotFound {
            resource_type: String::from(entity),
            message: format!("{entity} {id} does not exist"),
        },
        PersistenceError::EmployeeNotFound(personal_number) => ApiError::NotFound {
            resource_type: String::from("Employee"),
            message: format!("No employee with personal number {personal_number}"),
        },
        PersistenceError::PersonalNumberTaken(personal_number) => ApiError::Conflict {
            message: format!("Personal number {personal_number} is already in use"),
        },
        PersistenceError::LeadAlreadyProcessed { lead_id } => ApiError::Conflict {
            message: format!("Lead {lead_id} has already been converted or rejected"),
        },
        PersistenceError::InquiryAlreadyProcessed { inquiry_id } => ApiError::Conflict {
            message: format!("Inquiry {inquiry_id} has already been converted"),
        },
        PersistenceError::MeasurementExists { order_id } => ApiError::Conflict {
            message: format!("Order {order_id} already has a measurement"),
        },
        PersistenceError::InstallationExists { order_id } => ApiError::Conflict {
            message: format!("Order {order_id} already has an installation record"),
        },
        PersistenceError::OrderHasMeasurement { order_id } => ApiError::Conflict {
            message: format!("Order {order_id} still has a measurement attached"),
        },
        PersistenceError::OrderHasServiceTickets { order_id } => ApiError::Conflict {
            message: format!("Order {order_id} still has service tickets attached"),
        },
        other => {
            tracing::error!(error = %other, "persistence operation failed");
            ApiError::Internal {
                message: String::from("A database error occurred"),
            }
        }
    }
}
