// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the Futurol CRM.
//!
//! This crate stores employees, customers, the sales pipeline and the
//! audit log in `SQLite` via Diesel. The schema is managed by embedded
//! migrations; in-memory databases are available for tests.
//!
//! ## Transactional Invariants
//!
//! - An order's status column and its `order_status_history` rows are
//!   written in one transaction and can never diverge.
//! - Lead and inquiry conversion creates the customer, stamps the
//!   source record and appends the audit entry in one transaction, and
//!   is guarded so each source record converts at most once.
//! - Measurement create/delete and their order-status side effects
//!   commit together.
//!
//! ## Testing
//!
//! `new_in_memory()` hands out an isolated shared-cache database per
//! call via an atomic counter, so tests never collide.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use diesel::SqliteConnection;
use futurol_audit::{Actor, AuditEvent};
use futurol_domain::{OrderStatus, RejectReason, TicketStatus};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod sqlite;

#[cfg(test)]
mod tests;

pub use data_models::{
    AuditLogData, ContactData, CustomerData, EmployeeData, EmployeeUpdate, InquiryData,
    InstallationData, LeadConversionOverride, LeadData, LocationData, MeasurementData, NewContact,
    NewCustomer,
    NewEmployee, NewInquiry, NewInstallation, NewLead, NewLocation, NewMeasurement, NewOrder,
    NewQuote, NewServiceTicket, OrderData, ProductData, QuoteData, ServiceTicketData,
    StatusHistoryData,
};
pub use error::PersistenceError;
pub use mutations::employees::PIN_HASH_COST;
pub use mutations::orders::ORDER_NUMBER_PREFIX;
pub use queries::employees::verify_pin;

/// Atomic counter for generating unique in-memory database names.
///
/// This ensures deterministic test isolation by eliminating time-based
/// collisions. Each call to `new_in_memory()` receives a unique
/// sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Returns the current UTC time as an RFC 3339 string.
fn now_timestamp() -> Result<String, PersistenceError> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|e| PersistenceError::TimestampError(e.to_string()))
}

/// Returns the current calendar year, used in order numbers.
fn current_year() -> i32 {
    OffsetDateTime::now_utc().year()
}

/// Persistence adapter over a single `SQLite` connection.
///
/// The server wraps this in an `Arc<Mutex<_>>`; each operation below is
/// self-contained and internally transactional where it touches more
/// than one row.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite`
    /// database.
    ///
    /// Each call receives a unique database instance via atomic
    /// counter, ensuring deterministic test isolation without
    /// time-based collisions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_name = format!("memdb_test_{db_id}");
        let shared_memory_url = format!("file:{db_name}?mode=memory&cache=shared");

        let mut conn = sqlite::initialize_database(&shared_memory_url)?;
        sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite`
    /// database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::DatabaseConnectionFailed("Invalid database path".to_string())
        })?;

        let mut conn = sqlite::initialize_database(path_str)?;
        sqlite::enable_wal_mode(&mut conn)?;
        sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    // ========================================================================
    // Employees
    // ========================================================================

    /// Retrieves an employee by personal number.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_employee_by_personal_number(
        &mut self,
        personal_number: &str,
    ) -> Result<Option<EmployeeData>, PersistenceError> {
        queries::employees::get_employee_by_personal_number(&mut self.conn, personal_number)
    }

    /// Retrieves an employee by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_employee_by_id(
        &mut self,
        employee_id: i64,
    ) -> Result<Option<EmployeeData>, PersistenceError> {
        queries::employees::get_employee_by_id(&mut self.conn, employee_id)
    }

    /// Lists all employees.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_employees(&mut self) -> Result<Vec<EmployeeData>, PersistenceError> {
        queries::employees::list_employees(&mut self.conn)
    }

    /// Counts active employees, for license seat checks.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_active_employees(&mut self) -> Result<i64, PersistenceError> {
        queries::employees::count_active_employees(&mut self.conn)
    }

    /// Creates an employee with a bcrypt-hashed PIN.
    ///
    /// # Errors
    ///
    /// Returns `PersonalNumberTaken` if the personal number is in use.
    pub fn create_employee(
        &mut self,
        new: &NewEmployee,
    ) -> Result<EmployeeData, PersistenceError> {
        let now = now_timestamp()?;
        mutations::employees::create_employee(&mut self.conn, new, &now)
    }

    /// Applies a partial update to an employee.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the employee does not exist.
    pub fn update_employee(
        &mut self,
        employee_id: i64,
        update: &EmployeeUpdate,
    ) -> Result<EmployeeData, PersistenceError> {
        let now = now_timestamp()?;
        mutations::employees::update_employee(&mut self.conn, employee_id, update, &now)
    }

    /// Activates or deactivates an employee.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the employee does not exist.
    pub fn set_employee_active(
        &mut self,
        employee_id: i64,
        active: bool,
    ) -> Result<(), PersistenceError> {
        let now = now_timestamp()?;
        mutations::employees::set_employee_active(&mut self.conn, employee_id, active, &now)
    }

    /// Replaces an employee's PIN.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the employee does not exist.
    pub fn change_pin(&mut self, employee_id: i64, new_pin: &str) -> Result<(), PersistenceError> {
        let now = now_timestamp()?;
        mutations::employees::change_pin(&mut self.conn, employee_id, new_pin, &now)
    }

    // ========================================================================
    // Products
    // ========================================================================

    /// Lists the product catalogue.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_products(&mut self) -> Result<Vec<ProductData>, PersistenceError> {
        queries::products::list_products(&mut self.conn)
    }

    /// Retrieves a product by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_product(
        &mut self,
        product_id: i64,
    ) -> Result<Option<ProductData>, PersistenceError> {
        queries::products::get_product_by_id(&mut self.conn, product_id)
    }

    // ========================================================================
    // Customers
    // ========================================================================

    /// Retrieves a customer by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_customer(
        &mut self,
        customer_id: i64,
    ) -> Result<Option<CustomerData>, PersistenceError> {
        queries::customers::get_customer_by_id(&mut self.conn, customer_id)
    }

    /// Lists all customers.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_customers(&mut self) -> Result<Vec<CustomerData>, PersistenceError> {
        queries::customers::list_customers(&mut self.conn)
    }

    /// Creates a customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_customer(
        &mut self,
        new: &NewCustomer,
    ) -> Result<CustomerData, PersistenceError> {
        let now = now_timestamp()?;
        mutations::customers::create_customer(&mut self.conn, new, &now)
    }

    /// Updates a customer.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the customer does not exist.
    pub fn update_customer(
        &mut self,
        customer_id: i64,
        new: &NewCustomer,
    ) -> Result<CustomerData, PersistenceError> {
        mutations::customers::update_customer(&mut self.conn, customer_id, new)
    }

    /// Adds a contact person to a customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_contact(&mut self, new: &NewContact) -> Result<ContactData, PersistenceError> {
        mutations::customers::create_contact(&mut self.conn, new)
    }

    /// Lists a customer's contact persons.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_contacts(
        &mut self,
        customer_id: i64,
    ) -> Result<Vec<ContactData>, PersistenceError> {
        queries::customers::list_contacts_for_customer(&mut self.conn, customer_id)
    }

    /// Adds a site location to a customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_location(
        &mut self,
        new: &NewLocation,
    ) -> Result<LocationData, PersistenceError> {
        mutations::customers::create_location(&mut self.conn, new)
    }

    /// Lists a customer's site locations.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_locations(
        &mut self,
        customer_id: i64,
    ) -> Result<Vec<LocationData>, PersistenceError> {
        queries::customers::list_locations_for_customer(&mut self.conn, customer_id)
    }

    /// Retrieves a site location by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_location(
        &mut self,
        location_id: i64,
    ) -> Result<Option<LocationData>, PersistenceError> {
        queries::customers::get_location_by_id(&mut self.conn, location_id)
    }

    // ========================================================================
    // Leads & Inquiries
    // ========================================================================

    /// Creates a lead.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_lead(&mut self, new: &NewLead) -> Result<LeadData, PersistenceError> {
        let now = now_timestamp()?;
        mutations::leads::create_lead(&mut self.conn, new, &now)
    }

    /// Retrieves a lead by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_lead(&mut self, lead_id: i64) -> Result<Option<LeadData>, PersistenceError> {
        queries::leads::get_lead_by_id(&mut self.conn, lead_id)
    }

    /// Lists leads, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_leads(
        &mut self,
        status: Option<&str>,
    ) -> Result<Vec<LeadData>, PersistenceError> {
        queries::leads::list_leads(&mut self.conn, status)
    }

    /// Marks a lead as contacted.
    ///
    /// # Errors
    ///
    /// Returns `LeadAlreadyProcessed` if the lead is terminal.
    pub fn mark_lead_contacted(&mut self, lead_id: i64) -> Result<(), PersistenceError> {
        mutations::leads::mark_lead_contacted(&mut self.conn, lead_id)
    }

    /// Rejects a lead with a reason.
    ///
    /// # Errors
    ///
    /// Returns `LeadAlreadyProcessed` if the lead is terminal.
    pub fn reject_lead(
        &mut self,
        lead_id: i64,
        reason: RejectReason,
        note: Option<&str>,
    ) -> Result<LeadData, PersistenceError> {
        mutations::leads::reject_lead(&mut self.conn, lead_id, reason, note)
    }

    /// Converts a lead into a customer, one-shot.
    ///
    /// # Errors
    ///
    /// Returns `LeadAlreadyProcessed` if the lead is terminal.
    pub fn convert_lead(
        &mut self,
        lead_id: i64,
        actor: &Actor,
        overrides: &LeadConversionOverride,
    ) -> Result<CustomerData, PersistenceError> {
        let now = now_timestamp()?;
        mutations::conversion::convert_lead(&mut self.conn, lead_id, actor, overrides, &now)
    }

    /// Records an incoming web inquiry.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_inquiry(&mut self, new: &NewInquiry) -> Result<InquiryData, PersistenceError> {
        let now = now_timestamp()?;
        mutations::inquiries::create_inquiry(&mut self.conn, new, &now)
    }

    /// Retrieves an inquiry by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_inquiry(
        &mut self,
        inquiry_id: i64,
    ) -> Result<Option<InquiryData>, PersistenceError> {
        queries::inquiries::get_inquiry_by_id(&mut self.conn, inquiry_id)
    }

    /// Lists inquiries, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_inquiries(
        &mut self,
        status: Option<&str>,
    ) -> Result<Vec<InquiryData>, PersistenceError> {
        queries::inquiries::list_inquiries(&mut self.conn, status)
    }

    /// Converts an inquiry into a customer, one-shot.
    ///
    /// # Errors
    ///
    /// Returns `InquiryAlreadyProcessed` if the inquiry is already
    /// converted.
    pub fn convert_inquiry(
        &mut self,
        inquiry_id: i64,
        actor: &Actor,
    ) -> Result<CustomerData, PersistenceError> {
        let now = now_timestamp()?;
        mutations::conversion::convert_inquiry(&mut self.conn, inquiry_id, actor, &now)
    }

    // ========================================================================
    // Orders & Quotes
    // ========================================================================

    /// Creates an order with a freshly allocated order number.
    ///
    /// # Errors
    ///
    /// Returns an error if number allocation or the inserts fail.
    pub fn create_order(&mut self, new: &NewOrder) -> Result<OrderData, PersistenceError> {
        let now = now_timestamp()?;
        mutations::orders::create_order(&mut self.conn, new, current_year(), &now)
    }

    /// Retrieves an order by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_order(&mut self, order_id: i64) -> Result<Option<OrderData>, PersistenceError> {
        queries::orders::get_order_by_id(&mut self.conn, order_id)
    }

    /// Lists orders, optionally filtered by status and customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_orders(
        &mut self,
        status: Option<&str>,
        customer_id: Option<i64>,
    ) -> Result<Vec<OrderData>, PersistenceError> {
        queries::orders::list_orders(&mut self.conn, status, customer_id)
    }

    /// Moves an order to a new status with a history row.
    ///
    /// The transition itself must already have been validated against
    /// the pipeline rules.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the order does not exist.
    pub fn change_order_status(
        &mut self,
        order_id: i64,
        from: OrderStatus,
        to: OrderStatus,
        changed_by: i64,
        note: Option<&str>,
    ) -> Result<OrderData, PersistenceError> {
        let now = now_timestamp()?;
        mutations::orders::persist_status_change(
            &mut self.conn,
            order_id,
            from,
            to,
            changed_by,
            note,
            &now,
        )
    }

    /// Lists the status history of an order, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_status_history(
        &mut self,
        order_id: i64,
    ) -> Result<Vec<StatusHistoryData>, PersistenceError> {
        queries::orders::list_status_history(&mut self.conn, order_id)
    }

    /// Deletes an order and its dependent rows, subject to guards.
    ///
    /// # Errors
    ///
    /// Returns `OrderHasMeasurement` or `OrderHasServiceTickets` if a
    /// guard trips.
    pub fn delete_order(&mut self, order_id: i64) -> Result<(), PersistenceError> {
        mutations::orders::delete_order(&mut self.conn, order_id)
    }

    /// Creates the next quote version on an order.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the order does not exist.
    pub fn create_quote(&mut self, new: &NewQuote) -> Result<QuoteData, PersistenceError> {
        let now = now_timestamp()?;
        mutations::orders::create_quote(&mut self.conn, new, &now)
    }

    /// Lists the quotes on an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_quotes(&mut self, order_id: i64) -> Result<Vec<QuoteData>, PersistenceError> {
        queries::orders::list_quotes_for_order(&mut self.conn, order_id)
    }

    /// Updates the status of a quote.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the quote does not exist.
    pub fn update_quote_status(
        &mut self,
        quote_id: i64,
        status: &str,
    ) -> Result<(), PersistenceError> {
        mutations::orders::update_quote_status(&mut self.conn, quote_id, status)
    }

    /// Records the final contract value on an order.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the order does not exist.
    pub fn set_final_value(
        &mut self,
        order_id: i64,
        final_value_czk: i64,
    ) -> Result<(), PersistenceError> {
        mutations::orders::set_final_value(&mut self.conn, order_id, final_value_czk)
    }

    // ========================================================================
    // Measurements & Installations
    // ========================================================================

    /// Records a measurement on an order, advancing the order to the
    /// `measurement` stage when it has not reached it yet.
    ///
    /// # Errors
    ///
    /// Returns `MeasurementExists` if the order already has one.
    pub fn create_measurement(
        &mut self,
        new: &NewMeasurement,
    ) -> Result<MeasurementData, PersistenceError> {
        let now = now_timestamp()?;
        mutations::measurements::create_measurement(&mut self.conn, new, &now)
    }

    /// Retrieves a measurement by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_measurement(
        &mut self,
        measurement_id: i64,
    ) -> Result<Option<MeasurementData>, PersistenceError> {
        queries::measurements::get_measurement_by_id(&mut self.conn, measurement_id)
    }

    /// Retrieves the measurement attached to an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_measurement_for_order(
        &mut self,
        order_id: i64,
    ) -> Result<Option<MeasurementData>, PersistenceError> {
        queries::measurements::get_measurement_for_order(&mut self.conn, order_id)
    }

    /// Updates a measurement's dimensions and survey details.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the measurement does not exist.
    pub fn update_measurement(
        &mut self,
        measurement_id: i64,
        width_mm: i32,
        depth_mm: i32,
        height_mm: i32,
        details: Option<&str>,
    ) -> Result<MeasurementData, PersistenceError> {
        mutations::measurements::update_measurement(
            &mut self.conn,
            measurement_id,
            width_mm,
            depth_mm,
            height_mm,
            details,
        )
    }

    /// Deletes a measurement, reverting the order to `quote_sent` when
    /// it sits exactly at `measurement`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the measurement does not exist.
    pub fn delete_measurement(
        &mut self,
        measurement_id: i64,
        changed_by: i64,
    ) -> Result<(), PersistenceError> {
        let now = now_timestamp()?;
        mutations::measurements::delete_measurement(&mut self.conn, measurement_id, changed_by, &now)
    }

    /// Records that the measurement summary email was sent.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the measurement does not exist.
    pub fn record_measurement_email(
        &mut self,
        measurement_id: i64,
        sent_by: i64,
        message_id: Option<&str>,
    ) -> Result<(), PersistenceError> {
        let now = now_timestamp()?;
        mutations::measurements::record_measurement_email(
            &mut self.conn,
            measurement_id,
            sent_by,
            message_id,
            &now,
        )
    }

    /// Creates the installation record for an order.
    ///
    /// # Errors
    ///
    /// Returns `InstallationExists` if the order already has one.
    pub fn create_installation(
        &mut self,
        new: &NewInstallation,
    ) -> Result<InstallationData, PersistenceError> {
        let now = now_timestamp()?;
        mutations::installations::create_installation(&mut self.conn, new, &now)
    }

    /// Retrieves an installation record by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_installation(
        &mut self,
        installation_id: i64,
    ) -> Result<Option<InstallationData>, PersistenceError> {
        queries::installations::get_installation_by_id(&mut self.conn, installation_id)
    }

    /// Retrieves the installation record attached to an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_installation_for_order(
        &mut self,
        order_id: i64,
    ) -> Result<Option<InstallationData>, PersistenceError> {
        queries::installations::get_installation_for_order(&mut self.conn, order_id)
    }

    /// Updates the working state of an installation record.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the installation does not exist.
    pub fn update_installation(
        &mut self,
        installation_id: i64,
        technician_id: Option<i64>,
        scheduled_at: Option<&str>,
        checklist: &str,
        work_notes: Option<&str>,
        handover_notes: Option<&str>,
    ) -> Result<(), PersistenceError> {
        mutations::installations::update_installation(
            &mut self.conn,
            installation_id,
            technician_id,
            scheduled_at,
            checklist,
            work_notes,
            handover_notes,
        )
    }

    /// Records that the installation handover email was sent.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the installation does not exist.
    pub fn record_installation_email(
        &mut self,
        installation_id: i64,
        sent_by: i64,
        message_id: Option<&str>,
    ) -> Result<(), PersistenceError> {
        let now = now_timestamp()?;
        mutations::installations::record_installation_email(
            &mut self.conn,
            installation_id,
            sent_by,
            message_id,
            &now,
        )
    }

    // ========================================================================
    // Service Tickets
    // ========================================================================

    /// Opens a service ticket.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the customer does not exist.
    pub fn create_ticket(
        &mut self,
        new: &NewServiceTicket,
    ) -> Result<ServiceTicketData, PersistenceError> {
        let now = now_timestamp()?;
        mutations::service::create_ticket(&mut self.conn, new, &now)
    }

    /// Retrieves a service ticket by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_ticket(
        &mut self,
        ticket_id: i64,
    ) -> Result<Option<ServiceTicketData>, PersistenceError> {
        queries::service::get_ticket_by_id(&mut self.conn, ticket_id)
    }

    /// Lists service tickets, optionally filtered.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_tickets(
        &mut self,
        status: Option<&str>,
        customer_id: Option<i64>,
    ) -> Result<Vec<ServiceTicketData>, PersistenceError> {
        queries::service::list_tickets(&mut self.conn, status, customer_id)
    }

    /// Updates a ticket's workflow state.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the ticket does not exist.
    pub fn update_ticket(
        &mut self,
        ticket_id: i64,
        status: TicketStatus,
        resolution: Option<&str>,
        materials_used: Option<&str>,
    ) -> Result<ServiceTicketData, PersistenceError> {
        let now = now_timestamp()?;
        mutations::service::update_ticket(
            &mut self.conn,
            ticket_id,
            status,
            resolution,
            materials_used,
            &now,
        )
    }

    /// Records that the service protocol email was sent.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the ticket does not exist.
    pub fn record_ticket_email(
        &mut self,
        ticket_id: i64,
        sent_by: i64,
        message_id: Option<&str>,
    ) -> Result<(), PersistenceError> {
        let now = now_timestamp()?;
        mutations::service::record_ticket_email(&mut self.conn, ticket_id, sent_by, message_id, &now)
    }

    // ========================================================================
    // Audit
    // ========================================================================

    /// Appends one audit entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn append_audit_event(&mut self, event: &AuditEvent) -> Result<(), PersistenceError> {
        let now = now_timestamp()?;
        mutations::audit::insert_audit_event(&mut self.conn, event, &now)
    }

    /// Lists the most recent audit entries, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_recent_audit_entries(
        &mut self,
        limit: i64,
    ) -> Result<Vec<AuditLogData>, PersistenceError> {
        queries::audit::list_recent_audit_entries(&mut self.conn, limit)
    }

    /// Lists the audit trail for one entity, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_audit_entries_for_entity(
        &mut self,
        entity_type: &str,
        entity_id: i64,
    ) -> Result<Vec<AuditLogData>, PersistenceError> {
        queries::audit::list_audit_entries_for_entity(&mut self.conn, entity_type, entity_id)
    }
}
