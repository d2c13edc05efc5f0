// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Requests carry loosely typed fields (status and role names as strings)
//! and are parsed into domain types inside the handlers; validation
//! failures surface as `ApiError::Validation`. Read operations return the
//! persistence records directly, so only responses that add derived data
//! are defined here.

use futurol_domain::MeasurementDetails;
use futurol_persistence::{CustomerData, EmployeeData, OrderData, StatusHistoryData};
use serde::{Deserialize, Serialize};

/// API request to log in with a personal number and PIN.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    /// The employee's four-digit personal number.
    pub personal_number: String,
    /// The employee's six-digit PIN.
    pub pin: String,
}

/// API response for a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// The signed token for subsequent requests.
    pub token: String,
    /// The employee's database identifier.
    pub employee_id: i64,
    /// The employee's personal number.
    pub personal_number: String,
    /// The employee's full name.
    pub full_name: String,
    /// The roles held by the employee.
    pub roles: Vec<String>,
    /// Token expiry, unix seconds.
    pub expires_at: i64,
}

/// API response describing the current session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhoAmIResponse {
    /// The employee's database identifier.
    pub employee_id: i64,
    /// The employee's personal number.
    pub personal_number: String,
    /// The employee's full name.
    pub full_name: String,
    /// The roles held by the employee.
    pub roles: Vec<String>,
    /// The modules the employee can open.
    pub modules: Vec<String>,
    /// The active license tier.
    pub tier: String,
    /// The features enabled for the active tier.
    pub features: Vec<String>,
}

/// API request to change the calling employee's PIN.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChangePinRequest {
    /// The current PIN.
    pub old_pin: String,
    /// The new PIN.
    pub new_pin: String,
    /// Confirmation of the new PIN.
    pub confirmation: String,
}

/// API request to create an employee.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateEmployeeRequest {
    /// The four-digit personal number, unique across all employees.
    pub personal_number: String,
    /// The initial six-digit PIN.
    pub pin: String,
    /// The employee's full name.
    pub full_name: String,
    /// Optional email address.
    pub email: Option<String>,
    /// Optional phone number.
    pub phone: Option<String>,
    /// Role names; at least one is required.
    pub roles: Vec<String>,
}

/// API request to partially update an employee. `None` fields are left
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct UpdateEmployeeRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub roles: Option<Vec<String>>,
}

/// API representation of an employee.
///
/// The PIN hash never leaves the persistence layer through this type, and
/// roles are surfaced as parsed names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeResponse {
    pub employee_id: i64,
    pub personal_number: String,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub roles: Vec<String>,
    pub is_active: bool,
    pub created_at: String,
}

impl EmployeeResponse {
    /// Builds the response from a persistence record and its parsed roles.
    #[must_use]
    pub fn from_record(record: EmployeeData, roles: Vec<String>) -> Self {
        Self {
            employee_id: record.employee_id,
            personal_number: record.personal_number,
            full_name: record.full_name,
            email: record.email,
            phone: record.phone,
            roles,
            is_active: record.is_active,
            created_at: record.created_at,
        }
    }
}

/// API request to create or update a customer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CustomerRequest {
    /// `B2C` or `B2B`.
    pub customer_type: String,
    /// Full name; required for B2C.
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Company name; required for B2B.
    pub company_name: Option<String>,
    /// Czech company registration number.
    pub ico: Option<String>,
    /// Czech VAT number.
    pub dic: Option<String>,
    pub note: Option<String>,
}

/// API request to add a contact person to a customer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateContactRequest {
    pub customer_id: i64,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub position: Option<String>,
}

/// API request to add a site location to a customer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateLocationRequest {
    pub customer_id: i64,
    pub street: String,
    pub city: String,
    pub zip: String,
    pub note: Option<String>,
}

/// API request to create a lead.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateLeadRequest {
    /// Lead source name: `advisor`, `web_form`, `referral`, or `phone`.
    pub source: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Company name; a lead with a company converts to a B2B customer.
    pub company: Option<String>,
    /// Product code recommended by the advisor flow.
    pub recommended_product: Option<String>,
    /// Raw advisor questionnaire answers as a JSON document.
    pub score_answers: Option<String>,
    pub customer_note: Option<String>,
}

/// API request body for converting a lead; every field is optional and
/// overrides the value inherited from the lead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ConvertLeadRequest {
    /// Customer type override: `B2C` or `B2B`.
    pub customer_type: Option<String>,
    pub company_name: Option<String>,
    /// Company registration number.
    pub ico: Option<String>,
    /// VAT identifier.
    pub dic: Option<String>,
}

/// API request to reject a lead.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RejectLeadRequest {
    /// Reason name from the fixed enumeration.
    pub reason: String,
    /// Optional free-text note.
    pub note: Option<String>,
}

/// API response for a successful lead or inquiry conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionResponse {
    /// The customer created by the conversion.
    pub customer: CustomerData,
    /// A success message.
    pub message: String,
}

/// API request to record an incoming web inquiry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateInquiryRequest {
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub message: Option<String>,
}

/// API request to create an order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateOrderRequest {
    pub customer_id: i64,
    pub location_id: Option<i64>,
    pub product_id: Option<i64>,
    pub contact_id: Option<i64>,
    /// Priority name: `low`, `normal`, `high`, or `urgent`.
    pub priority: String,
    pub estimated_value_czk: Option<i64>,
    /// Target completion date, RFC 3339.
    pub deadline_at: Option<String>,
}

/// API request to update an order.
///
/// A populated `status` requests a pipeline transition, validated against
/// the transition rules before anything is written.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct UpdateOrderRequest {
    /// The requested pipeline status.
    pub status: Option<String>,
    /// Optional note recorded on the history row of a status change.
    pub note: Option<String>,
    /// The final contract value, usually set at the contract stage.
    pub final_value_czk: Option<i64>,
}

/// API response for an order with its status history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDetailResponse {
    pub order: OrderData,
    /// History rows, oldest first.
    pub history: Vec<StatusHistoryData>,
}

/// API request to create a quote on an order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateQuoteRequest {
    pub order_id: i64,
    pub amount_czk: i64,
    /// Validity date, RFC 3339.
    pub valid_until: Option<String>,
    pub note: Option<String>,
}

/// API request to move a quote to a new status.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateQuoteStatusRequest {
    /// Quote status name: `draft`, `sent`, or `approved`.
    pub status: String,
}

/// API request to record a site measurement on an order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateMeasurementRequest {
    pub order_id: i64,
    pub width_mm: u32,
    pub depth_mm: u32,
    pub height_mm: u32,
    /// Product-specific survey details.
    pub details: Option<MeasurementDetails>,
}

/// API request to update a measurement's dimensions and details.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateMeasurementRequest {
    pub width_mm: u32,
    pub depth_mm: u32,
    pub height_mm: u32,
    pub details: Option<MeasurementDetails>,
}

/// API request to create the installation record for an order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateInstallationRequest {
    pub order_id: i64,
    /// The assigned technician.
    pub technician_id: Option<i64>,
    /// Planned installation date, RFC 3339.
    pub scheduled_at: Option<String>,
}

/// API request to update an installation record. `None` fields are left
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct UpdateInstallationRequest {
    pub technician_id: Option<i64>,
    pub scheduled_at: Option<String>,
    /// Checklist state as a JSON map of item id to completed flag.
    pub checklist: Option<String>,
    pub work_notes: Option<String>,
    pub handover_notes: Option<String>,
}

/// API response for a customer-facing email send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendEmailResponse {
    /// The recipient address the message went to.
    pub recipient: String,
    /// The transport's message id, when it provided one.
    pub message_id: Option<String>,
}

/// API request to open a service ticket.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateTicketRequest {
    pub customer_id: i64,
    pub order_id: Option<i64>,
    /// Ticket type name: `claim`, `repair`, `maintenance`, or `inspection`.
    pub ticket_type: String,
    pub category: Option<String>,
    /// Priority name: `low`, `normal`, `high`, or `urgent`.
    pub priority: String,
    pub subject: String,
    pub description: Option<String>,
}

/// API request to update a service ticket.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateTicketRequest {
    /// Ticket status name: `new`, `in_progress`, `resolved`, or `closed`.
    pub status: String,
    pub resolution: Option<String>,
    pub materials_used: Option<String>,
}
