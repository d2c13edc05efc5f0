// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Employee roles.
///
/// Roles are stored as a set on each employee record; an employee holds at
/// least one role. Authorization unions the permissions of every held role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// System administrator: settings and user management plus full
    /// business access.
    Admin,
    /// Salesperson: leads, customers, orders, service.
    Sales,
    /// Manager: read-only visibility over the whole pipeline plus reports.
    Manager,
    /// Production manager: read access to customers, orders, measurements.
    ProductionManager,
    /// Technician / surveyor: measurements and service, read access to
    /// customers and orders.
    Technician,
}

impl Role {
    /// All roles, in display order.
    pub const ALL: [Self; 5] = [
        Self::Admin,
        Self::Sales,
        Self::Manager,
        Self::ProductionManager,
        Self::Technician,
    ];

    /// Returns the string representation used for persistence and the API.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Sales => "sales",
            Self::Manager => "manager",
            Self::ProductionManager => "production_manager",
            Self::Technician => "technician",
        }
    }

    /// Returns the human-readable label for UI display.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Admin => "Administrátor",
            Self::Sales => "Obchodník",
            Self::Manager => "Manažer",
            Self::ProductionManager => "Vedoucí výroby",
            Self::Technician => "Technik",
        }
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "sales" => Ok(Self::Sales),
            "manager" => Ok(Self::Manager),
            "production_manager" => Ok(Self::ProductionManager),
            "technician" => Ok(Self::Technician),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Coarse permission scopes, independent of any single entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Module {
    Settings,
    Users,
    Leads,
    Customers,
    Orders,
    Measurements,
    Service,
    Reports,
}

impl Module {
    /// All modules. Permission checks iterate this to compute module access.
    pub const ALL: [Self; 8] = [
        Self::Settings,
        Self::Users,
        Self::Leads,
        Self::Customers,
        Self::Orders,
        Self::Measurements,
        Self::Service,
        Self::Reports,
    ];

    /// Returns the string representation used for persistence and the API.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Settings => "settings",
            Self::Users => "users",
            Self::Leads => "leads",
            Self::Customers => "customers",
            Self::Orders => "orders",
            Self::Measurements => "measurements",
            Self::Service => "service",
            Self::Reports => "reports",
        }
    }
}

impl FromStr for Module {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "settings" => Ok(Self::Settings),
            "users" => Ok(Self::Users),
            "leads" => Ok(Self::Leads),
            "customers" => Ok(Self::Customers),
            "orders" => Ok(Self::Orders),
            "measurements" => Ok(Self::Measurements),
            "service" => Ok(Self::Service),
            "reports" => Ok(Self::Reports),
            _ => Err(DomainError::InvalidModule(s.to_string())),
        }
    }
}

impl std::fmt::Display for Module {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Actions a role may perform within a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionAction {
    Read,
    Write,
    Delete,
}

/// A four-digit employee personal number.
///
/// Personal numbers are the login identifier; they are zero-padded and
/// unique across all employees, active or not.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PersonalNumber(String);

impl PersonalNumber {
    /// Creates a personal number after validating the format.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPersonalNumber` unless the value is
    /// exactly four ASCII digits.
    pub fn new(value: &str) -> Result<Self, DomainError> {
        if value.len() == 4 && value.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(value.to_string()))
        } else {
            Err(DomainError::InvalidPersonalNumber(value.to_string()))
        }
    }

    /// Returns the underlying string value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PersonalNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Customer representation mode: individual or organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CustomerType {
    /// Individual customer: name/phone/email directly on the record.
    B2C,
    /// Organization: company name plus contact persons.
    B2B,
}

impl CustomerType {
    /// Returns the string representation used for persistence and the API.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::B2C => "B2C",
            Self::B2B => "B2B",
        }
    }
}

impl FromStr for CustomerType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "B2C" => Ok(Self::B2C),
            "B2B" => Ok(Self::B2B),
            _ => Err(DomainError::InvalidCustomerType(s.to_string())),
        }
    }
}

/// How a customer record entered the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerSource {
    /// Converted from an advisor-flow lead.
    Advisor,
    /// Converted from a web inquiry.
    Inquiry,
    /// Entered manually by an employee.
    Manual,
}

impl CustomerSource {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Advisor => "advisor",
            Self::Inquiry => "inquiry",
            Self::Manual => "manual",
        }
    }
}

impl FromStr for CustomerSource {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "advisor" => Ok(Self::Advisor),
            "inquiry" => Ok(Self::Inquiry),
            "manual" => Ok(Self::Manual),
            _ => Err(DomainError::InvalidCustomerSource(s.to_string())),
        }
    }
}

/// Channel through which a lead was captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadSource {
    /// Guided advisor flow with scoring answers.
    Advisor,
    /// Plain web contact form.
    WebForm,
    /// Referral from an existing customer.
    Referral,
    /// Inbound phone call.
    Phone,
}

impl LeadSource {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Advisor => "advisor",
            Self::WebForm => "web_form",
            Self::Referral => "referral",
            Self::Phone => "phone",
        }
    }
}

impl FromStr for LeadSource {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "advisor" => Ok(Self::Advisor),
            "web_form" => Ok(Self::WebForm),
            "referral" => Ok(Self::Referral),
            "phone" => Ok(Self::Phone),
            _ => Err(DomainError::InvalidLeadSource(s.to_string())),
        }
    }
}

/// Order and ticket priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

impl Priority {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

impl FromStr for Priority {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "normal" => Ok(Self::Normal),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            _ => Err(DomainError::InvalidPriority(s.to_string())),
        }
    }
}

/// Fixed product catalogue: the pergola and screen lines FUTUROL builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductCode {
    /// Bioclimatic pergola with rotating roof lamellas.
    Klimo,
    /// Horizontal shading with a rolling mechanism.
    Horizontal,
    /// Classic pergola with a fixed roof.
    Klasik,
    /// Vertical screen shading.
    Screen,
    /// ZIP screen shading.
    Zip,
}

impl ProductCode {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Klimo => "KLIMO",
            Self::Horizontal => "HORIZONTAL",
            Self::Klasik => "KLASIK",
            Self::Screen => "SCREEN",
            Self::Zip => "ZIP",
        }
    }
}

impl FromStr for ProductCode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "KLIMO" => Ok(Self::Klimo),
            "HORIZONTAL" => Ok(Self::Horizontal),
            "KLASIK" => Ok(Self::Klasik),
            "SCREEN" => Ok(Self::Screen),
            "ZIP" => Ok(Self::Zip),
            _ => Err(DomainError::InvalidProductCode(s.to_string())),
        }
    }
}

/// Quote lifecycle status. Multiple quote versions may coexist per order;
/// by convention only one is approved at a time, but this is not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    #[default]
    Draft,
    Sent,
    Approved,
}

impl QuoteStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Sent => "sent",
            Self::Approved => "approved",
        }
    }
}

impl FromStr for QuoteStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "sent" => Ok(Self::Sent),
            "approved" => Ok(Self::Approved),
            _ => Err(DomainError::InvalidQuoteStatus(s.to_string())),
        }
    }
}

/// Post-sale service ticket kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketType {
    /// Warranty claim.
    Claim,
    /// Out-of-warranty repair.
    Repair,
    /// Scheduled maintenance.
    Maintenance,
    /// Site inspection.
    Inspection,
}

impl TicketType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Claim => "claim",
            Self::Repair => "repair",
            Self::Maintenance => "maintenance",
            Self::Inspection => "inspection",
        }
    }
}

impl FromStr for TicketType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "claim" => Ok(Self::Claim),
            "repair" => Ok(Self::Repair),
            "maintenance" => Ok(Self::Maintenance),
            "inspection" => Ok(Self::Inspection),
            _ => Err(DomainError::InvalidTicketType(s.to_string())),
        }
    }
}

/// Service ticket lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    #[default]
    New,
    InProgress,
    Resolved,
    Closed,
}

impl TicketStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
        }
    }
}

impl FromStr for TicketStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Self::New),
            "in_progress" => Ok(Self::InProgress),
            "resolved" => Ok(Self::Resolved),
            "closed" => Ok(Self::Closed),
            _ => Err(DomainError::InvalidTicketStatus(s.to_string())),
        }
    }
}
