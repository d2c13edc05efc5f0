// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Public row representations returned by queries.
//!
//! Statuses, roles and other closed enumerations are kept as their stored
//! string forms here; the API boundary parses them into domain types where
//! it needs to reason about them.

use futurol_domain::{
    CustomerSource, CustomerType, DomainError, LeadSource, Priority, Role, TicketType,
};
use serde::{Deserialize, Serialize};

/// An employee record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeData {
    pub employee_id: i64,
    pub personal_number: String,
    /// Bcrypt hash of the PIN. Never leaves the server boundary.
    #[serde(skip_serializing, default)]
    pub pin_hash: String,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// JSON array of role strings as stored.
    pub roles: String,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl EmployeeData {
    /// Parses the stored role set.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidRole` if the stored set contains an
    /// unknown role, or `DomainError::MissingRoles` if it is empty.
    pub fn parse_roles(&self) -> Result<Vec<Role>, DomainError> {
        let names: Vec<String> = serde_json::from_str(&self.roles)
            .map_err(|_| DomainError::InvalidRole(self.roles.clone()))?;
        if names.is_empty() {
            return Err(DomainError::MissingRoles);
        }
        names.iter().map(|name| name.parse()).collect()
    }
}

/// A product catalogue entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductData {
    pub product_id: i64,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
}

/// A customer record, B2C or B2B per `customer_type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerData {
    pub customer_id: i64,
    pub customer_type: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company_name: Option<String>,
    pub ico: Option<String>,
    pub dic: Option<String>,
    pub source: String,
    pub note: Option<String>,
    pub owner_id: Option<i64>,
    pub origin_lead_id: Option<i64>,
    pub created_at: String,
}

/// A contact person on a B2B customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactData {
    pub contact_id: i64,
    pub customer_id: i64,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub position: Option<String>,
}

/// A site location owned by a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationData {
    pub location_id: i64,
    pub customer_id: i64,
    pub street: String,
    pub city: String,
    pub zip: String,
    pub note: Option<String>,
}

/// A lead record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadData {
    pub lead_id: i64,
    pub source: String,
    pub status: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub recommended_product: Option<String>,
    pub score_answers: Option<String>,
    pub customer_note: Option<String>,
    pub lost_reason: Option<String>,
    pub lost_note: Option<String>,
    pub converted_customer_id: Option<i64>,
    pub converted_by: Option<i64>,
    pub converted_at: Option<String>,
    pub created_at: String,
}

/// A web inquiry record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InquiryData {
    pub inquiry_id: i64,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub message: Option<String>,
    pub status: String,
    pub customer_id: Option<i64>,
    pub converted_at: Option<String>,
    pub created_at: String,
}

/// An order record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderData {
    pub order_id: i64,
    pub order_number: String,
    pub customer_id: i64,
    pub location_id: Option<i64>,
    pub product_id: Option<i64>,
    pub contact_id: Option<i64>,
    pub owner_id: i64,
    pub status: String,
    pub priority: String,
    pub estimated_value_czk: Option<i64>,
    pub final_value_czk: Option<i64>,
    pub deadline_at: Option<String>,
    pub created_at: String,
}

/// One append-only status-history entry for an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusHistoryData {
    pub history_id: i64,
    pub order_id: i64,
    pub from_status: Option<String>,
    pub to_status: String,
    pub changed_by: i64,
    pub note: Option<String>,
    pub created_at: String,
}

/// A versioned quote for an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteData {
    pub quote_id: i64,
    pub order_id: i64,
    pub version: i32,
    pub status: String,
    pub amount_czk: i64,
    pub valid_until: Option<String>,
    pub note: Option<String>,
    pub created_by: i64,
    pub created_at: String,
}

/// A site measurement, 1:1 with an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasurementData {
    pub measurement_id: i64,
    pub order_id: i64,
    pub employee_id: i64,
    pub width_mm: i32,
    pub depth_mm: i32,
    pub height_mm: i32,
    pub details: Option<String>,
    pub email_sent_at: Option<String>,
    pub email_sent_by: Option<i64>,
    pub email_message_id: Option<String>,
    pub created_at: String,
}

/// An installation record, 1:1 with an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallationData {
    pub installation_id: i64,
    pub order_id: i64,
    pub technician_id: Option<i64>,
    pub scheduled_at: Option<String>,
    /// JSON map of checklist item id -> completed flag.
    pub checklist: String,
    pub work_notes: Option<String>,
    pub handover_notes: Option<String>,
    pub email_sent_at: Option<String>,
    pub email_sent_by: Option<i64>,
    pub email_message_id: Option<String>,
    pub created_at: String,
}

/// A post-sale service ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceTicketData {
    pub ticket_id: i64,
    pub customer_id: i64,
    pub order_id: Option<i64>,
    pub ticket_type: String,
    pub category: Option<String>,
    pub priority: String,
    pub status: String,
    pub subject: String,
    pub description: Option<String>,
    pub resolution: Option<String>,
    pub materials_used: Option<String>,
    pub created_by: i64,
    pub created_at: String,
    pub resolved_at: Option<String>,
    pub email_sent_at: Option<String>,
    pub email_sent_by: Option<i64>,
    pub email_message_id: Option<String>,
}

/// Input for creating an employee. The PIN is hashed inside the
/// persistence layer; it is never stored in plain form.
#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub personal_number: String,
    pub pin: String,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub roles: Vec<Role>,
}

/// Partial update of an employee. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct EmployeeUpdate {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub roles: Option<Vec<Role>>,
}

/// Input for creating a customer.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub customer_type: CustomerType,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company_name: Option<String>,
    pub ico: Option<String>,
    pub dic: Option<String>,
    pub source: CustomerSource,
    pub note: Option<String>,
    pub owner_id: Option<i64>,
    pub origin_lead_id: Option<i64>,
}

/// Optional corrections applied while converting a lead to a customer.
///
/// Conversion copies the lead's contact fields verbatim; the advisor can
/// fix the customer type and supply billing identifiers at conversion
/// time instead of editing the customer afterwards.
#[derive(Debug, Clone, Default)]
pub struct LeadConversionOverride {
    pub customer_type: Option<CustomerType>,
    pub company_name: Option<String>,
    pub ico: Option<String>,
    pub dic: Option<String>,
}

/// Input for creating a contact person on a customer.
#[derive(Debug, Clone)]
pub struct NewContact {
    pub customer_id: i64,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub position: Option<String>,
}

/// Input for creating a site location on a customer.
#[derive(Debug, Clone)]
pub struct NewLocation {
    pub customer_id: i64,
    pub street: String,
    pub city: String,
    pub zip: String,
    pub note: Option<String>,
}

/// Input for creating a lead.
#[derive(Debug, Clone)]
pub struct NewLead {
    pub source: LeadSource,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub recommended_product: Option<String>,
    pub score_answers: Option<String>,
    pub customer_note: Option<String>,
}

/// Input for creating a web inquiry.
#[derive(Debug, Clone)]
pub struct NewInquiry {
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub message: Option<String>,
}

/// Input for creating an order. The order number and the initial `lead`
/// status are assigned inside the creation transaction.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_id: i64,
    pub location_id: Option<i64>,
    pub product_id: Option<i64>,
    pub contact_id: Option<i64>,
    pub owner_id: i64,
    pub priority: Priority,
    pub estimated_value_czk: Option<i64>,
    pub deadline_at: Option<String>,
}

/// Input for creating a quote. The version is assigned inside the
/// creation transaction.
#[derive(Debug, Clone)]
pub struct NewQuote {
    pub order_id: i64,
    pub amount_czk: i64,
    pub valid_until: Option<String>,
    pub note: Option<String>,
    pub created_by: i64,
}

/// Input for recording a site measurement on an order.
#[derive(Debug, Clone)]
pub struct NewMeasurement {
    pub order_id: i64,
    pub employee_id: i64,
    pub width_mm: i32,
    pub depth_mm: i32,
    pub height_mm: i32,
    /// Product-specific detail payload, already serialized to JSON.
    pub details: Option<String>,
}

/// Input for creating an installation record on an order.
#[derive(Debug, Clone)]
pub struct NewInstallation {
    pub order_id: i64,
    pub technician_id: Option<i64>,
    pub scheduled_at: Option<String>,
}

/// Input for opening a service ticket.
#[derive(Debug, Clone)]
pub struct NewServiceTicket {
    pub customer_id: i64,
    pub order_id: Option<i64>,
    pub ticket_type: TicketType,
    pub category: Option<String>,
    pub priority: Priority,
    pub subject: String,
    pub description: Option<String>,
    pub created_by: i64,
}

/// A persisted audit-log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditLogData {
    pub audit_id: i64,
    pub employee_id: i64,
    pub personal_number: String,
    pub full_name: String,
    pub action: String,
    pub entity_type: String,
    pub entity_id: i64,
    pub before_json: Option<String>,
    pub after_json: Option<String>,
    pub created_at: String,
}
