// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Role string is not a known role.
    InvalidRole(String),
    /// Module string is not a known module.
    InvalidModule(String),
    /// License tier string is not a known tier.
    InvalidTier(String),
    /// Feature string is not a known feature.
    InvalidFeature(String),
    /// Order status string is not a known pipeline stage.
    InvalidOrderStatus(String),
    /// Requested order status transition is not permitted.
    InvalidStatusTransition {
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
        /// Why the transition is rejected.
        reason: String,
    },
    /// Lead status string is not a known status.
    InvalidLeadStatus(String),
    /// Lead is already in a terminal state and cannot be converted or
    /// rejected again.
    LeadAlreadyTerminal {
        /// The terminal status the lead currently holds.
        status: String,
    },
    /// Reject reason string is not in the fixed enumeration.
    InvalidRejectReason(String),
    /// Personal number is not exactly four digits.
    InvalidPersonalNumber(String),
    /// PIN is not exactly six digits.
    InvalidPin(String),
    /// Employee must hold at least one role.
    MissingRoles,
    /// Email address is malformed.
    InvalidEmail(String),
    /// Customer type string is not B2C or B2B.
    InvalidCustomerType(String),
    /// Customer source string is not a known source.
    InvalidCustomerSource(String),
    /// Lead source string is not a known source.
    InvalidLeadSource(String),
    /// Customer representation does not match its type discriminator.
    InvalidCustomerRepresentation(String),
    /// Priority string is not a known priority.
    InvalidPriority(String),
    /// Product code is not in the catalogue.
    InvalidProductCode(String),
    /// Quote status string is not a known status.
    InvalidQuoteStatus(String),
    /// Service ticket type string is not a known type.
    InvalidTicketType(String),
    /// Service ticket status string is not a known status.
    InvalidTicketStatus(String),
    /// Audit action string is not in the closed action set.
    InvalidAuditAction(String),
    /// Measurement dimensions are out of range.
    InvalidDimensions(&'static str),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRole(s) => write!(f, "Invalid role: {s}"),
            Self::InvalidModule(s) => write!(f, "Invalid module: {s}"),
            Self::InvalidTier(s) => write!(f, "Invalid license tier: {s}"),
            Self::InvalidFeature(s) => write!(f, "Invalid feature: {s}"),
            Self::InvalidOrderStatus(s) => write!(f, "Invalid order status: {s}"),
            Self::InvalidStatusTransition { from, to, reason } => {
                write!(f, "Invalid status transition from '{from}' to '{to}': {reason}")
            }
            Self::InvalidLeadStatus(s) => write!(f, "Invalid lead status: {s}"),
            Self::LeadAlreadyTerminal { status } => {
                write!(f, "Lead is already '{status}' and cannot be processed again")
            }
            Self::InvalidRejectReason(s) => write!(f, "Invalid reject reason: {s}"),
            Self::InvalidPersonalNumber(s) => {
                write!(f, "Invalid personal number '{s}': must be exactly 4 digits")
            }
            Self::InvalidPin(s) => write!(f, "Invalid PIN: {s}"),
            Self::MissingRoles => write!(f, "Employee must hold at least one role"),
            Self::InvalidEmail(s) => write!(f, "Invalid email address: {s}"),
            Self::InvalidCustomerType(s) => write!(f, "Invalid customer type: {s}"),
            Self::InvalidCustomerSource(s) => write!(f, "Invalid customer source: {s}"),
            Self::InvalidLeadSource(s) => write!(f, "Invalid lead source: {s}"),
            Self::InvalidCustomerRepresentation(s) => {
                write!(f, "Invalid customer representation: {s}")
            }
            Self::InvalidPriority(s) => write!(f, "Invalid priority: {s}"),
            Self::InvalidProductCode(s) => write!(f, "Invalid product code: {s}"),
            Self::InvalidQuoteStatus(s) => write!(f, "Invalid quote status: {s}"),
            Self::InvalidTicketType(s) => write!(f, "Invalid service ticket type: {s}"),
            Self::InvalidTicketStatus(s) => write!(f, "Invalid service ticket status: {s}"),
            Self::InvalidAuditAction(s) => write!(f, "Invalid audit action: {s}"),
            Self::InvalidDimensions(s) => write!(f, "Invalid dimensions: {s}"),
        }
    }
}

impl std::error::Error for DomainError {}
