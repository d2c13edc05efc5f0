// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API operation handlers.
//!
//! Every handler follows the same shape: feature gate check, permission
//! check, request parsing into domain types, then the persistence call.
//! Handlers never see raw connections and never leak domain or persistence
//! errors unmapped.

use serde::Serialize;
use std::str::FromStr;

use futurol_audit::{AuditAction, AuditEvent, EntityRef};
use futurol_domain::{
    CustomerSource, CustomerType, Dimensions, DomainError, Feature, LeadSource, LeadStatus,
    Module, OrderStatus, PermissionAction, Priority, ProductCode, QuoteStatus, RejectReason, Role,
    TicketStatus, TicketType, accessible_modules, validate_customer_representation,
    validate_email, validate_pin, validate_roles,
};
use futurol_persistence::{
    ContactData, CustomerData, InquiryData, LeadConversionOverride, LeadData, LocationData,
    MeasurementData, NewContact,
    NewCustomer, NewEmployee, NewInquiry, NewInstallation, NewLead, NewLocation, NewMeasurement,
    NewOrder, NewQuote, NewServiceTicket, EmployeeUpdate, InstallationData, OrderData,
    Persistence, ProductData, QuoteData, ServiceTicketData, AuditLogData,
};

use crate::auth::{AuthenticatedEmployee, AuthenticationService, AuthorizationService};
use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::license::FeatureGate;
use crate::mailer::{EmailMessage, Mailer};
use crate::rate_limit::RateLimiter;
use crate::request_response::{
    ChangePinRequest, ConversionResponse, ConvertLeadRequest, CreateContactRequest,
    CreateEmployeeRequest,
    CreateInquiryRequest, CreateInstallationRequest, CreateLeadRequest, CreateLocationRequest,
    CreateMeasurementRequest, CreateOrderRequest, CreateQuoteRequest, CreateTicketRequest,
    CustomerRequest, EmployeeResponse, LoginRequest, LoginResponse, OrderDetailResponse,
    RejectLeadRequest, SendEmailResponse, UpdateEmployeeRequest, UpdateInstallationRequest,
    UpdateMeasurementRequest, UpdateOrderRequest, UpdateQuoteStatusRequest, UpdateTicketRequest,
    WhoAmIResponse,
};

/// Parses a string field into a domain type, mapping the failure to a
/// validation error.
fn parse_domain<T>(value: &str) -> Result<T, ApiError>
where
    T: FromStr<Err = DomainError>,
{
    value.parse().map_err(translate_domain_error)
}

fn parse_role_names(names: &[String]) -> Result<Vec<Role>, ApiError> {
    names.iter().map(|name| parse_domain(name)).collect()
}

fn role_names(roles: &[Role]) -> Vec<String> {
    roles.iter().map(|role| role.as_str().to_string()).collect()
}

fn to_json<T: Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string(value).map_err(|e| ApiError::Internal {
        message: format!("Failed to serialize audit payload: {e}"),
    })
}

fn require_order(persistence: &mut Persistence, order_id: i64) -> Result<OrderData, ApiError> {
    persistence
        .get_order(order_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::NotFound {
            resource_type: String::from("Order"),
            message: format!("Order {order_id} does not exist"),
        })
}

fn require_customer(
    persistence: &mut Persistence,
    customer_id: i64,
) -> Result<CustomerData, ApiError> {
    persistence
        .get_customer(customer_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::NotFound {
            resource_type: String::from("Customer"),
            message: format!("Customer {customer_id} does not exist"),
        })
}

fn require_measurement(
    persistence: &mut Persistence,
    measurement_id: i64,
) -> Result<MeasurementData, ApiError> {
    persistence
        .get_measurement(measurement_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::NotFound {
            resource_type: String::from("Measurement"),
            message: format!("Measurement {measurement_id} does not exist"),
        })
}

fn serialize_details(
    details: Option<&futurol_domain::MeasurementDetails>,
) -> Result<Option<String>, ApiError> {
    details.map(to_json).transpose()
}

// ============================================================================
// Auth
// ============================================================================

/// Logs an employee in with their personal number and PIN.
///
/// # Errors
///
/// Returns `AuthenticationFailed` for bad credentials, a blocked rate-limit
/// key, or an inactive account.
pub fn login(
    persistence: &mut Persistence,
    rate_limiter: &RateLimiter,
    secret: &str,
    remote_addr: &str,
    request: &LoginRequest,
) -> Result<LoginResponse, ApiError> {
    let outcome = AuthenticationService::login(
        persistence,
        rate_limiter,
        secret,
        remote_addr,
        &request.personal_number,
        &request.pin,
    )?;

    Ok(LoginResponse {
        token: outcome.token,
        employee_id: outcome.employee.employee_id,
        personal_number: outcome.employee.personal_number.clone(),
        full_name: outcome.employee.full_name.clone(),
        roles: role_names(&outcome.employee.roles),
        expires_at: outcome.expires_at,
    })
}

/// Describes the current session: identity, module access, and license.
#[must_use]
pub fn whoami(gate: &FeatureGate, actor: &AuthenticatedEmployee) -> WhoAmIResponse {
    let tier = gate.tier();
    WhoAmIResponse {
        employee_id: actor.employee_id,
        personal_number: actor.personal_number.clone(),
        full_name: actor.full_name.clone(),
        roles: role_names(&actor.roles),
        modules: accessible_modules(&actor.roles)
            .iter()
            .map(|module| module.as_str().to_string())
            .collect(),
        tier: tier.as_str().to_string(),
        features: tier
            .features()
            .iter()
            .map(|feature| feature.as_str().to_string())
            .collect(),
    }
}

/// Changes the calling employee's PIN.
///
/// # Errors
///
/// Returns an error if the old PIN is wrong or the new PIN violates the
/// PIN policy.
pub fn change_pin(
    persistence: &mut Persistence,
    actor: &AuthenticatedEmployee,
    request: &ChangePinRequest,
) -> Result<(), ApiError> {
    AuthenticationService::change_pin(
        persistence,
        actor,
        &request.old_pin,
        &request.new_pin,
        &request.confirmation,
    )
}

// ============================================================================
// Employees
// ============================================================================

/// Creates an employee, subject to the tier's seat and role limits.
///
/// Emits an `EMPLOYEE_CREATED` audit row.
///
/// # Errors
///
/// Returns an error if the actor may not manage users, the seat limit is
/// reached, a role is not available under the tier, or validation fails.
pub fn create_employee(
    persistence: &mut Persistence,
    gate: &FeatureGate,
    actor: &AuthenticatedEmployee,
    request: CreateEmployeeRequest,
) -> Result<EmployeeResponse, ApiError> {
    AuthorizationService::require(actor, Module::Users, PermissionAction::Write, "create_employee")?;

    futurol_domain::PersonalNumber::new(&request.personal_number)
        .map_err(translate_domain_error)?;
    validate_pin(&request.pin).map_err(translate_domain_error)?;
    let roles = parse_role_names(&request.roles)?;
    validate_roles(&roles).map_err(translate_domain_error)?;
    if let Some(email) = &request.email {
        validate_email(email).map_err(translate_domain_error)?;
    }

    gate.require_roles(&roles)?;
    let active = persistence
        .count_active_employees()
        .map_err(translate_persistence_error)?;
    gate.require_seat(active)?;

    let created = persistence
        .create_employee(&NewEmployee {
            personal_number: request.personal_number,
            pin: request.pin,
            full_name: request.full_name,
            email: request.email,
            phone: request.phone,
            roles: roles.clone(),
        })
        .map_err(translate_persistence_error)?;

    let response = EmployeeResponse::from_record(created, role_names(&roles));
    let event = AuditEvent::new(
        actor.to_audit_actor(),
        AuditAction::EmployeeCreated,
        EntityRef::new(String::from("Employee"), response.employee_id),
        None,
        Some(to_json(&response)?),
    );
    persistence
        .append_audit_event(&event)
        .map_err(translate_persistence_error)?;

    Ok(response)
}

/// Applies a partial update to an employee.
///
/// Emits an `EMPLOYEE_UPDATED` audit row with before and after snapshots.
///
/// # Errors
///
/// Returns an error if the actor may not manage users, a new role is not
/// available under the tier, or the employee does not exist.
pub fn update_employee(
    persistence: &mut Persistence,
    gate: &FeatureGate,
    actor: &AuthenticatedEmployee,
    employee_id: i64,
    request: UpdateEmployeeRequest,
) -> Result<EmployeeResponse, ApiError> {
    AuthorizationService::require(actor, Module::Users, PermissionAction::Write, "update_employee")?;

    let roles = request.roles.as_deref().map(parse_role_names).transpose()?;
    if let Some(roles) = &roles {
        validate_roles(roles).map_err(translate_domain_error)?;
        gate.require_roles(roles)?;
    }
    if let Some(email) = &request.email {
        validate_email(email).map_err(translate_domain_error)?;
    }

    let before = persistence
        .get_employee_by_id(employee_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::NotFound {
            resource_type: String::from("Employee"),
            message: format!("Employee {employee_id} does not exist"),
        })?;
    let before_roles = before.parse_roles().map_err(translate_domain_error)?;
    let before_response = EmployeeResponse::from_record(before, role_names(&before_roles));

    let updated = persistence
        .update_employee(
            employee_id,
            &EmployeeUpdate {
                full_name: request.full_name,
                email: request.email,
                phone: request.phone,
                roles,
            },
        )
        .map_err(translate_persistence_error)?;
    let updated_roles = updated.parse_roles().map_err(translate_domain_error)?;
    let response = EmployeeResponse::from_record(updated, role_names(&updated_roles));

    let event = AuditEvent::new(
        actor.to_audit_actor(),
        AuditAction::EmployeeUpdated,
        EntityRef::new(String::from("Employee"), employee_id),
        Some(to_json(&before_response)?),
        Some(to_json(&response)?),
    );
    persistence
        .append_audit_event(&event)
        .map_err(translate_persistence_error)?;

    Ok(response)
}

/// Deactivates an employee, freeing their license seat.
///
/// Emits an `EMPLOYEE_DEACTIVATED` audit row.
///
/// # Errors
///
/// Returns an error if the actor may not manage users, tries to
/// deactivate their own account, or the employee does not exist.
pub fn deactivate_employee(
    persistence: &mut Persistence,
    actor: &AuthenticatedEmployee,
    employee_id: i64,
) -> Result<(), ApiError> {
    AuthorizationService::require(
        actor,
        Module::Users,
        PermissionAction::Write,
        "deactivate_employee",
    )?;

    if actor.employee_id == employee_id {
        return Err(ApiError::Conflict {
            message: String::from("An employee cannot deactivate their own account"),
        });
    }

    persistence
        .set_employee_active(employee_id, false)
        .map_err(translate_persistence_error)?;

    let event = AuditEvent::marker(
        actor.to_audit_actor(),
        AuditAction::EmployeeDeactivated,
        EntityRef::new(String::from("Employee"), employee_id),
    );
    persistence
        .append_audit_event(&event)
        .map_err(translate_persistence_error)?;

    Ok(())
}

/// Lists all employees, active and inactive.
///
/// # Errors
///
/// Returns an error if the actor may not read users.
pub fn list_employees(
    persistence: &mut Persistence,
    actor: &AuthenticatedEmployee,
) -> Result<Vec<EmployeeResponse>, ApiError> {
    AuthorizationService::require(actor, Module::Users, PermissionAction::Read, "list_employees")?;

    let records = persistence
        .list_employees()
        .map_err(translate_persistence_error)?;
    records
        .into_iter()
        .map(|record| {
            let roles = record.parse_roles().map_err(translate_domain_error)?;
            Ok(EmployeeResponse::from_record(record, role_names(&roles)))
        })
        .collect()
}

/// Retrieves one employee.
///
/// # Errors
///
/// Returns an error if the actor may not read users or the employee does
/// not exist.
pub fn get_employee(
    persistence: &mut Persistence,
    actor: &AuthenticatedEmployee,
    employee_id: i64,
) -> Result<EmployeeResponse, ApiError> {
    AuthorizationService::require(actor, Module::Users, PermissionAction::Read, "get_employee")?;

    let record = persistence
        .get_employee_by_id(employee_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::NotFound {
            resource_type: String::from("Employee"),
            message: format!("Employee {employee_id} does not exist"),
        })?;
    let roles = record.parse_roles().map_err(translate_domain_error)?;
    Ok(EmployeeResponse::from_record(record, role_names(&roles)))
}

// ============================================================================
// Customers
// ============================================================================

fn validated_customer_input(
    request: CustomerRequest,
    owner_id: Option<i64>,
) -> Result<NewCustomer, ApiError> {
    let customer_type: CustomerType = parse_domain(&request.customer_type)?;
    validate_customer_representation(
        customer_type,
        request.full_name.as_deref(),
        request.company_name.as_deref(),
    )
    .map_err(translate_domain_error)?;
    if let Some(email) = &request.email {
        validate_email(email).map_err(translate_domain_error)?;
    }

    Ok(NewCustomer {
        customer_type,
        full_name: request.full_name,
        email: request.email,
        phone: request.phone,
        company_name: request.company_name,
        ico: request.ico,
        dic: request.dic,
        source: CustomerSource::Manual,
        note: request.note,
        owner_id,
        origin_lead_id: None,
    })
}

/// Creates a customer entered manually by an employee.
///
/// # Errors
///
/// Returns an error if the feature or permission check fails, or the
/// populated fields do not match the customer type.
pub fn create_customer(
    persistence: &mut Persistence,
    gate: &FeatureGate,
    actor: &AuthenticatedEmployee,
    request: CustomerRequest,
) -> Result<CustomerData, ApiError> {
    gate.require(Feature::Customers)?;
    AuthorizationService::require(
        actor,
        Module::Customers,
        PermissionAction::Write,
        "create_customer",
    )?;

    let new = validated_customer_input(request, Some(actor.employee_id))?;
    persistence
        .create_customer(&new)
        .map_err(translate_persistence_error)
}

/// Updates a customer's contact fields and note.
///
/// # Errors
///
/// Returns an error if the customer does not exist or validation fails.
pub fn update_customer(
    persistence: &mut Persistence,
    gate: &FeatureGate,
    actor: &AuthenticatedEmployee,
    customer_id: i64,
    request: CustomerRequest,
) -> Result<CustomerData, ApiError> {
    gate.require(Feature::Customers)?;
    AuthorizationService::require(
        actor,
        Module::Customers,
        PermissionAction::Write,
        "update_customer",
    )?;

    let existing = require_customer(persistence, customer_id)?;
    let mut new = validated_customer_input(request, existing.owner_id)?;
    // Provenance fields are immutable after creation.
    new.source = parse_domain(&existing.source)?;
    new.origin_lead_id = existing.origin_lead_id;

    persistence
        .update_customer(customer_id, &new)
        .map_err(translate_persistence_error)
}

/// Retrieves one customer.
///
/// # Errors
///
/// Returns an error if the customer does not exist.
pub fn get_customer(
    persistence: &mut Persistence,
    gate: &FeatureGate,
    actor: &AuthenticatedEmployee,
    customer_id: i64,
) -> Result<CustomerData, ApiError> {
    gate.require(Feature::Customers)?;
    AuthorizationService::require(actor, Module::Customers, PermissionAction::Read, "get_customer")?;
    require_customer(persistence, customer_id)
}

/// Lists customers, optionally filtered by a case-insensitive search over
/// name, company, email, and phone.
///
/// # Errors
///
/// Returns an error if the feature or permission check fails.
pub fn list_customers(
    persistence: &mut Persistence,
    gate: &FeatureGate,
    actor: &AuthenticatedEmployee,
    search: Option<&str>,
) -> Result<Vec<CustomerData>, ApiError> {
    gate.require(Feature::Customers)?;
    AuthorizationService::require(
        actor,
        Module::Customers,
        PermissionAction::Read,
        "list_customers",
    )?;

    let customers = persistence
        .list_customers()
        .map_err(translate_persistence_error)?;

    let Some(needle) = search.map(str::to_lowercase) else {
        return Ok(customers);
    };
    Ok(customers
        .into_iter()
        .filter(|customer| {
            [
                customer.full_name.as_deref(),
                customer.company_name.as_deref(),
                customer.email.as_deref(),
                customer.phone.as_deref(),
            ]
            .iter()
            .any(|field| {
                field.is_some_and(|value| value.to_lowercase().contains(&needle))
            })
        })
        .collect())
}

/// Adds a contact person to a customer.
///
/// # Errors
///
/// Returns an error if the customer does not exist or validation fails.
pub fn create_contact(
    persistence: &mut Persistence,
    gate: &FeatureGate,
    actor: &AuthenticatedEmployee,
    request: CreateContactRequest,
) -> Result<ContactData, ApiError> {
    gate.require(Feature::Customers)?;
    AuthorizationService::require(
        actor,
        Module::Customers,
        PermissionAction::Write,
        "create_contact",
    )?;

    require_customer(persistence, request.customer_id)?;
    if let Some(email) = &request.email {
        validate_email(email).map_err(translate_domain_error)?;
    }

    persistence
        .create_contact(&NewContact {
            customer_id: request.customer_id,
            full_name: request.full_name,
            email: request.email,
            phone: request.phone,
            position: request.position,
        })
        .map_err(translate_persistence_error)
}

/// Lists a customer's contact persons.
///
/// # Errors
///
/// Returns an error if the customer does not exist.
pub fn list_contacts(
    persistence: &mut Persistence,
    gate: &FeatureGate,
    actor: &AuthenticatedEmployee,
    customer_id: i64,
) -> Result<Vec<ContactData>, ApiError> {
    gate.require(Feature::Customers)?;
    AuthorizationService::require(actor, Module::Customers, PermissionAction::Read, "list_contacts")?;
    require_customer(persistence, customer_id)?;
    persistence
        .list_contacts(customer_id)
        .map_err(translate_persistence_error)
}

/// Adds a site location to a customer.
///
/// # Errors
///
/// Returns an error if the customer does not exist.
pub fn create_location(
    persistence: &mut Persistence,
    gate: &FeatureGate,
    actor: &AuthenticatedEmployee,
    request: CreateLocationRequest,
) -> Result<LocationData, ApiError> {
    gate.require(Feature::Customers)?;
    AuthorizationService::require(
        actor,
        Module::Customers,
        PermissionAction::Write,
        "create_location",
    )?;

    require_customer(persistence, request.customer_id)?;
    persistence
        .create_location(&NewLocation {
            customer_id: request.customer_id,
            street: request.street,
            city: request.city,
            zip: request.zip,
            note: request.note,
        })
        .map_err(translate_persistence_error)
}

/// Lists a customer's site locations.
///
/// # Errors
///
/// Returns an error if the customer does not exist.
pub fn list_locations(
    persistence: &mut Persistence,
    gate: &FeatureGate,
    actor: &AuthenticatedEmployee,
    customer_id: i64,
) -> Result<Vec<LocationData>, ApiError> {
    gate.require(Feature::Customers)?;
    AuthorizationService::require(
        actor,
        Module::Customers,
        PermissionAction::Read,
        "list_locations",
    )?;
    require_customer(persistence, customer_id)?;
    persistence
        .list_locations(customer_id)
        .map_err(translate_persistence_error)
}

// ============================================================================
// Products
// ============================================================================

/// Lists the product catalogue.
///
/// The catalogue is reference data; any authenticated employee can read
/// it, whatever their roles or the license tier.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_products(persistence: &mut Persistence) -> Result<Vec<ProductData>, ApiError> {
    persistence
        .list_products()
        .map_err(translate_persistence_error)
}

// ============================================================================
// Leads
// ============================================================================

/// Creates a lead, typically from the advisor flow.
///
/// # Errors
///
/// Returns an error if the feature or permission check fails, the source
/// is unknown, or the recommended product is not a catalogue code.
pub fn create_lead(
    persistence: &mut Persistence,
    gate: &FeatureGate,
    actor: &AuthenticatedEmployee,
    request: CreateLeadRequest,
) -> Result<LeadData, ApiError> {
    gate.require(Feature::Advisor)?;
    AuthorizationService::require(actor, Module::Leads, PermissionAction::Write, "create_lead")?;

    let source: LeadSource = parse_domain(&request.source)?;
    if let Some(email) = &request.email {
        validate_email(email).map_err(translate_domain_error)?;
    }
    // The advisor flow only ever recommends catalogue products.
    let recommended_product: Option<String> = request
        .recommended_product
        .as_deref()
        .map(parse_domain::<ProductCode>)
        .transpose()?
        .map(|code| code.as_str().to_owned());

    persistence
        .create_lead(&NewLead {
            source,
            full_name: request.full_name,
            email: request.email,
            phone: request.phone,
            company: request.company,
            recommended_product,
            score_answers: request.score_answers,
            customer_note: request.customer_note,
        })
        .map_err(translate_persistence_error)
}

/// Lists leads, optionally filtered by status.
///
/// # Errors
///
/// Returns an error if the status filter is not a known lead status.
pub fn list_leads(
    persistence: &mut Persistence,
    gate: &FeatureGate,
    actor: &AuthenticatedEmployee,
    status: Option<&str>,
) -> Result<Vec<LeadData>, ApiError> {
    gate.require(Feature::Advisor)?;
    AuthorizationService::require(actor, Module::Leads, PermissionAction::Read, "list_leads")?;

    let status = status
        .map(parse_domain::<LeadStatus>)
        .transpose()?
        .map(|status| status.as_str());
    persistence
        .list_leads(status)
        .map_err(translate_persistence_error)
}

/// Retrieves one lead.
///
/// # Errors
///
/// Returns an error if the lead does not exist.
pub fn get_lead(
    persistence: &mut Persistence,
    gate: &FeatureGate,
    actor: &AuthenticatedEmployee,
    lead_id: i64,
) -> Result<LeadData, ApiError> {
    gate.require(Feature::Advisor)?;
    AuthorizationService::require(actor, Module::Leads, PermissionAction::Read, "get_lead")?;

    persistence
        .get_lead(lead_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::NotFound {
            resource_type: String::from("Lead"),
            message: format!("Lead {lead_id} does not exist"),
        })
}

/// Marks a new lead as contacted.
///
/// # Errors
///
/// Returns a conflict if the lead is already terminal.
pub fn mark_lead_contacted(
    persistence: &mut Persistence,
    gate: &FeatureGate,
    actor: &AuthenticatedEmployee,
    lead_id: i64,
) -> Result<LeadData, ApiError> {
    gate.require(Feature::Advisor)?;
    AuthorizationService::require(
        actor,
        Module::Leads,
        PermissionAction::Write,
        "mark_lead_contacted",
    )?;

    persistence
        .mark_lead_contacted(lead_id)
        .map_err(translate_persistence_error)?;
    persistence
        .get_lead(lead_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::NotFound {
            resource_type: String::from("Lead"),
            message: format!("Lead {lead_id} does not exist"),
        })
}

/// Converts a lead into a customer.
///
/// The conversion runs in one transaction: exactly one customer is
/// created, the lead is stamped with the back-reference and actor, and a
/// `LEAD_CONVERTED` audit row is written. A lead that is already
/// converted or lost yields a conflict. The request can override the
/// customer type and supply the company name, ICO and DIC when the
/// advisor knows better than the lead record.
///
/// # Errors
///
/// Returns a conflict for a terminal lead, a validation error for an
/// unknown customer type, or an error if the feature or permission check
/// fails.
pub fn convert_lead(
    persistence: &mut Persistence,
    gate: &FeatureGate,
    actor: &AuthenticatedEmployee,
    lead_id: i64,
    request: &ConvertLeadRequest,
) -> Result<ConversionResponse, ApiError> {
    gate.require(Feature::Advisor)?;
    AuthorizationService::require(actor, Module::Leads, PermissionAction::Write, "convert_lead")?;

    let customer_type: Option<CustomerType> = request
        .customer_type
        .as_deref()
        .map(parse_domain)
        .transpose()?;
    let overrides = LeadConversionOverride {
        customer_type,
        company_name: request.company_name.clone(),
        ico: request.ico.clone(),
        dic: request.dic.clone(),
    };

    let customer = persistence
        .convert_lead(lead_id, &actor.to_audit_actor(), &overrides)
        .map_err(translate_persistence_error)?;

    let message = format!(
        "Lead {} converted to customer {}",
        lead_id, customer.customer_id
    );
    Ok(ConversionResponse { customer, message })
}

/// Rejects a lead with a reason from the fixed enumeration.
///
/// Emits a `LEAD_REJECTED` audit row.
///
/// # Errors
///
/// Returns a conflict for a terminal lead or a validation error for an
/// unknown reason.
pub fn reject_lead(
    persistence: &mut Persistence,
    gate: &FeatureGate,
    actor: &AuthenticatedEmployee,
    lead_id: i64,
    request: &RejectLeadRequest,
) -> Result<LeadData, ApiError> {
    gate.require(Feature::Advisor)?;
    AuthorizationService::require(actor, Module::Leads, PermissionAction::Write, "reject_lead")?;

    let reason: RejectReason = parse_domain(&request.reason)?;
    let rejected = persistence
        .reject_lead(lead_id, reason, request.note.as_deref())
        .map_err(translate_persistence_error)?;

    let event = AuditEvent::new(
        actor.to_audit_actor(),
        AuditAction::LeadRejected,
        EntityRef::new(String::from("Lead"), lead_id),
        None,
        Some(to_json(&rejected)?),
    );
    persistence
        .append_audit_event(&event)
        .map_err(translate_persistence_error)?;

    Ok(rejected)
}

// ============================================================================
// Inquiries
// ============================================================================

/// Records an incoming web inquiry.
///
/// This is the one unauthenticated write: the public web form posts here.
///
/// # Errors
///
/// Returns an error if the feature is not licensed or validation fails.
pub fn create_inquiry(
    persistence: &mut Persistence,
    gate: &FeatureGate,
    request: CreateInquiryRequest,
) -> Result<InquiryData, ApiError> {
    gate.require(Feature::Inquiries)?;

    if request.full_name.trim().is_empty() {
        return Err(ApiError::Validation {
            field: String::from("full_name"),
            message: String::from("A name is required"),
        });
    }
    if let Some(email) = &request.email {
        validate_email(email).map_err(translate_domain_error)?;
    }

    persistence
        .create_inquiry(&NewInquiry {
            full_name: request.full_name,
            email: request.email,
            phone: request.phone,
            message: request.message,
        })
        .map_err(translate_persistence_error)
}

/// Lists inquiries, optionally filtered by status.
///
/// # Errors
///
/// Returns an error if the feature or permission check fails.
pub fn list_inquiries(
    persistence: &mut Persistence,
    gate: &FeatureGate,
    actor: &AuthenticatedEmployee,
    status: Option<&str>,
) -> Result<Vec<InquiryData>, ApiError> {
    gate.require(Feature::Inquiries)?;
    AuthorizationService::require(actor, Module::Leads, PermissionAction::Read, "list_inquiries")?;

    persistence
        .list_inquiries(status)
        .map_err(translate_persistence_error)
}

/// Converts an inquiry into a customer, one-shot.
///
/// Same transactional shape as lead conversion; an inquiry that already
/// carries a customer back-reference yields a conflict.
///
/// # Errors
///
/// Returns a conflict for an already converted inquiry.
pub fn convert_inquiry(
    persistence: &mut Persistence,
    gate: &FeatureGate,
    actor: &AuthenticatedEmployee,
    inquiry_id: i64,
) -> Result<ConversionResponse, ApiError> {
    gate.require(Feature::Inquiries)?;
    AuthorizationService::require(actor, Module::Leads, PermissionAction::Write, "convert_inquiry")?;

    let customer = persistence
        .convert_inquiry(inquiry_id, &actor.to_audit_actor())
        .map_err(translate_persistence_error)?;

    let message = format!(
        "Inquiry {} converted to customer {}",
        inquiry_id, customer.customer_id
    );
    Ok(ConversionResponse { customer, message })
}

// ============================================================================
// Orders
// ============================================================================

/// Creates an order.
///
/// The order number (`FUT-<year>-NNNN`) and the initial `lead` status with
/// its opening history row are assigned inside the creation transaction.
///
/// # Errors
///
/// Returns an error if the customer or the referenced product does not
/// exist, or the priority is unknown.
pub fn create_order(
    persistence: &mut Persistence,
    gate: &FeatureGate,
    actor: &AuthenticatedEmployee,
    request: CreateOrderRequest,
) -> Result<OrderDetailResponse, ApiError> {
    gate.require(Feature::Orders)?;
    AuthorizationService::require(actor, Module::Orders, PermissionAction::Write, "create_order")?;

    let priority: Priority = parse_domain(&request.priority)?;
    require_customer(persistence, request.customer_id)?;
    if let Some(product_id) = request.product_id {
        persistence
            .get_product(product_id)
            .map_err(translate_persistence_error)?
            .ok_or_else(|| ApiError::NotFound {
                resource_type: String::from("Product"),
                message: format!("Product {product_id} does not exist"),
            })?;
    }

    let order = persistence
        .create_order(&NewOrder {
            customer_id: request.customer_id,
            location_id: request.location_id,
            product_id: request.product_id,
            contact_id: request.contact_id,
            owner_id: actor.employee_id,
            priority,
            estimated_value_czk: request.estimated_value_czk,
            deadline_at: request.deadline_at,
        })
        .map_err(translate_persistence_error)?;
    let history = persistence
        .list_status_history(order.order_id)
        .map_err(translate_persistence_error)?;

    Ok(OrderDetailResponse { order, history })
}

/// Updates an order: a status transition, a final value, or both.
///
/// A requested transition is validated against the pipeline rules before
/// anything is written; the write itself appends exactly one history row
/// in the same transaction as the status change.
///
/// # Errors
///
/// Returns a conflict for an illegal transition, `NotFound` for a missing
/// order, or a validation error for an unknown status.
pub fn update_order(
    persistence: &mut Persistence,
    gate: &FeatureGate,
    actor: &AuthenticatedEmployee,
    order_id: i64,
    request: UpdateOrderRequest,
) -> Result<OrderDetailResponse, ApiError> {
    gate.require(Feature::Orders)?;
    AuthorizationService::require(actor, Module::Orders, PermissionAction::Write, "update_order")?;

    let mut order = require_order(persistence, order_id)?;

    // Validate the requested transition before any write, so a rejected
    // transition leaves the whole request without effect.
    let transition: Option<(OrderStatus, OrderStatus)> = match &request.status {
        Some(raw_status) => {
            let current: OrderStatus = parse_domain(&order.status)?;
            let target: OrderStatus = parse_domain(raw_status)?;
            current
                .validate_transition(target)
                .map_err(translate_domain_error)?;
            Some((current, target))
        }
        None => None,
    };

    if let Some(final_value_czk) = request.final_value_czk {
        persistence
            .set_final_value(order_id, final_value_czk)
            .map_err(translate_persistence_error)?;
    }

    if let Some((current, target)) = transition {
        order = persistence
            .change_order_status(
                order_id,
                current,
                target,
                actor.employee_id,
                request.note.as_deref(),
            )
            .map_err(translate_persistence_error)?;
    } else {
        order = require_order(persistence, order_id)?;
    }

    let history = persistence
        .list_status_history(order_id)
        .map_err(translate_persistence_error)?;
    Ok(OrderDetailResponse { order, history })
}

/// Retrieves an order with its full status history.
///
/// # Errors
///
/// Returns an error if the order does not exist.
pub fn get_order(
    persistence: &mut Persistence,
    gate: &FeatureGate,
    actor: &AuthenticatedEmployee,
    order_id: i64,
) -> Result<OrderDetailResponse, ApiError> {
    gate.require(Feature::Orders)?;
    AuthorizationService::require(actor, Module::Orders, PermissionAction::Read, "get_order")?;

    let order = require_order(persistence, order_id)?;
    let history = persistence
        .list_status_history(order_id)
        .map_err(translate_persistence_error)?;
    Ok(OrderDetailResponse { order, history })
}

/// Lists orders, optionally filtered by status and customer.
///
/// # Errors
///
/// Returns an error if the status filter is not a known pipeline status.
pub fn list_orders(
    persistence: &mut Persistence,
    gate: &FeatureGate,
    actor: &AuthenticatedEmployee,
    status: Option<&str>,
    customer_id: Option<i64>,
) -> Result<Vec<OrderData>, ApiError> {
    gate.require(Feature::Orders)?;
    AuthorizationService::require(actor, Module::Orders, PermissionAction::Read, "list_orders")?;

    let status = status
        .map(parse_domain::<OrderStatus>)
        .transpose()?
        .map(|status| status.as_str());
    persistence
        .list_orders(status, customer_id)
        .map_err(translate_persistence_error)
}

/// Deletes an order and its dependent quotes, installation record, and
/// history.
///
/// # Errors
///
/// Returns a conflict while a measurement or any service ticket still
/// references the order.
pub fn delete_order(
    persistence: &mut Persistence,
    gate: &FeatureGate,
    actor: &AuthenticatedEmployee,
    order_id: i64,
) -> Result<(), ApiError> {
    gate.require(Feature::Orders)?;
    AuthorizationService::require(actor, Module::Orders, PermissionAction::Delete, "delete_order")?;

    persistence
        .delete_order(order_id)
        .map_err(translate_persistence_error)
}

// ============================================================================
// Quotes
// ============================================================================

/// Creates the next quote version on an order.
///
/// # Errors
///
/// Returns an error if the order does not exist.
pub fn create_quote(
    persistence: &mut Persistence,
    gate: &FeatureGate,
    actor: &AuthenticatedEmployee,
    request: CreateQuoteRequest,
) -> Result<QuoteData, ApiError> {
    gate.require(Feature::Orders)?;
    AuthorizationService::require(actor, Module::Orders, PermissionAction::Write, "create_quote")?;

    persistence
        .create_quote(&NewQuote {
            order_id: request.order_id,
            amount_czk: request.amount_czk,
            valid_until: request.valid_until,
            note: request.note,
            created_by: actor.employee_id,
        })
        .map_err(translate_persistence_error)
}

/// Moves a quote to a new status.
///
/// # Errors
///
/// Returns an error if the quote does not exist or the status is unknown.
pub fn update_quote_status(
    persistence: &mut Persistence,
    gate: &FeatureGate,
    actor: &AuthenticatedEmployee,
    quote_id: i64,
    request: &UpdateQuoteStatusRequest,
) -> Result<(), ApiError> {
    gate.require(Feature::Orders)?;
    AuthorizationService::require(
        actor,
        Module::Orders,
        PermissionAction::Write,
        "update_quote_status",
    )?;

    let status: QuoteStatus = parse_domain(&request.status)?;
    persistence
        .update_quote_status(quote_id, status.as_str())
        .map_err(translate_persistence_error)
}

/// Lists the quotes on an order, every version.
///
/// # Errors
///
/// Returns an error if the order does not exist.
pub fn list_quotes_for_order(
    persistence: &mut Persistence,
    gate: &FeatureGate,
    actor: &AuthenticatedEmployee,
    order_id: i64,
) -> Result<Vec<QuoteData>, ApiError> {
    gate.require(Feature::Orders)?;
    AuthorizationService::require(actor, Module::Orders, PermissionAction::Read, "list_quotes")?;

    require_order(persistence, order_id)?;
    persistence
        .list_quotes(order_id)
        .map_err(translate_persistence_error)
}

// ============================================================================
// Measurements
// ============================================================================

/// Records a site measurement on an order.
///
/// An order that has not reached the `measurement` stage advances to it
/// in the same transaction; one measurement per order.
///
/// # Errors
///
/// Returns a conflict if the order already has a measurement, or a
/// validation error for implausible dimensions.
pub fn create_measurement(
    persistence: &mut Persistence,
    gate: &FeatureGate,
    actor: &AuthenticatedEmployee,
    request: CreateMeasurementRequest,
) -> Result<MeasurementData, ApiError> {
    gate.require(Feature::Measurements)?;
    AuthorizationService::require(
        actor,
        Module::Measurements,
        PermissionAction::Write,
        "create_measurement",
    )?;

    let dimensions = Dimensions::new(request.width_mm, request.depth_mm, request.height_mm)
        .map_err(translate_domain_error)?;
    let details = serialize_details(request.details.as_ref())?;

    persistence
        .create_measurement(&NewMeasurement {
            order_id: request.order_id,
            employee_id: actor.employee_id,
            width_mm: i32::try_from(dimensions.width_mm).unwrap_or(i32::MAX),
            depth_mm: i32::try_from(dimensions.depth_mm).unwrap_or(i32::MAX),
            height_mm: i32::try_from(dimensions.height_mm).unwrap_or(i32::MAX),
            details,
        })
        .map_err(translate_persistence_error)
}

/// Updates a measurement's dimensions and survey details.
///
/// # Errors
///
/// Returns an error if the measurement does not exist or the dimensions
/// are implausible.
pub fn update_measurement(
    persistence: &mut Persistence,
    gate: &FeatureGate,
    actor: &AuthenticatedEmployee,
    measurement_id: i64,
    request: UpdateMeasurementRequest,
) -> Result<MeasurementData, ApiError> {
    gate.require(Feature::Measurements)?;
    AuthorizationService::require(
        actor,
        Module::Measurements,
        PermissionAction::Write,
        "update_measurement",
    )?;

    let dimensions = Dimensions::new(request.width_mm, request.depth_mm, request.height_mm)
        .map_err(translate_domain_error)?;
    let details = serialize_details(request.details.as_ref())?;

    persistence
        .update_measurement(
            measurement_id,
            i32::try_from(dimensions.width_mm).unwrap_or(i32::MAX),
            i32::try_from(dimensions.depth_mm).unwrap_or(i32::MAX),
            i32::try_from(dimensions.height_mm).unwrap_or(i32::MAX),
            details.as_deref(),
        )
        .map_err(translate_persistence_error)
}

/// Retrieves the measurement attached to an order.
///
/// # Errors
///
/// Returns `NotFound` if the order has no measurement.
pub fn get_measurement(
    persistence: &mut Persistence,
    gate: &FeatureGate,
    actor: &AuthenticatedEmployee,
    order_id: i64,
) -> Result<MeasurementData, ApiError> {
    gate.require(Feature::Measurements)?;
    AuthorizationService::require(
        actor,
        Module::Measurements,
        PermissionAction::Read,
        "get_measurement",
    )?;

    require_order(persistence, order_id)?;
    persistence
        .get_measurement_for_order(order_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::NotFound {
            resource_type: String::from("Measurement"),
            message: format!("Order {order_id} has no measurement"),
        })
}

/// Deletes a measurement.
///
/// An order sitting exactly at the `measurement` stage reverts to
/// `quote_sent` with a history row; an order that moved on keeps its
/// status.
///
/// # Errors
///
/// Returns an error if the measurement does not exist.
pub fn delete_measurement(
    persistence: &mut Persistence,
    gate: &FeatureGate,
    actor: &AuthenticatedEmployee,
    measurement_id: i64,
) -> Result<(), ApiError> {
    gate.require(Feature::Measurements)?;
    AuthorizationService::require(
        actor,
        Module::Measurements,
        PermissionAction::Delete,
        "delete_measurement",
    )?;

    persistence
        .delete_measurement(measurement_id, actor.employee_id)
        .map_err(translate_persistence_error)
}

/// Sends the measurement summary email to the customer and records the
/// delivery on the measurement.
///
/// Delivery is best-effort: the measurement itself is already committed
/// and stays committed whether or not the message goes out.
///
/// # Errors
///
/// Returns `MailDelivery` when the transport fails, or a validation error
/// when the customer has no email address.
pub fn send_measurement_email(
    persistence: &mut Persistence,
    gate: &FeatureGate,
    actor: &AuthenticatedEmployee,
    mailer: &dyn Mailer,
    measurement_id: i64,
) -> Result<SendEmailResponse, ApiError> {
    gate.require(Feature::EmailMeasurement)?;
    AuthorizationService::require(
        actor,
        Module::Measurements,
        PermissionAction::Write,
        "send_measurement_email",
    )?;

    let measurement = require_measurement(persistence, measurement_id)?;
    let order = require_order(persistence, measurement.order_id)?;
    let customer = require_customer(persistence, order.customer_id)?;
    let recipient = customer.email.ok_or_else(|| ApiError::Validation {
        field: String::from("email"),
        message: String::from("Customer has no email address"),
    })?;

    let message = EmailMessage {
        to: recipient.clone(),
        subject: format!("Zaměření pro zakázku {}", order.order_number),
        body: format!(
            "Dobrý den,\n\nzaměření pro Vaši zakázku {} proběhlo.\n\
             Naměřené rozměry: šířka {} mm, hloubka {} mm, výška {} mm.\n\n\
             Futurol",
            order.order_number, measurement.width_mm, measurement.depth_mm, measurement.height_mm
        ),
    };
    let message_id = mailer.send(&message).map_err(|e| ApiError::MailDelivery {
        message: e.to_string(),
    })?;

    // The email already went out; a failed tracking write must not turn
    // a delivered message into a reported failure.
    if let Err(e) =
        persistence.record_measurement_email(measurement_id, actor.employee_id, message_id.as_deref())
    {
        tracing::warn!(
            measurement_id = measurement_id,
            error = %e,
            "Measurement email sent but tracking write failed"
        );
    }

    Ok(SendEmailResponse {
        recipient,
        message_id,
    })
}

// ============================================================================
// Installations
// ============================================================================

/// Creates the installation record for an order, one per order.
///
/// # Errors
///
/// Returns a conflict if the order already has an installation record.
pub fn create_installation(
    persistence: &mut Persistence,
    gate: &FeatureGate,
    actor: &AuthenticatedEmployee,
    request: CreateInstallationRequest,
) -> Result<InstallationData, ApiError> {
    gate.require(Feature::Installation)?;
    AuthorizationService::require(
        actor,
        Module::Orders,
        PermissionAction::Write,
        "create_installation",
    )?;

    persistence
        .create_installation(&NewInstallation {
            order_id: request.order_id,
            technician_id: request.technician_id,
            scheduled_at: request.scheduled_at,
        })
        .map_err(translate_persistence_error)
}

/// Retrieves the installation record attached to an order.
///
/// # Errors
///
/// Returns `NotFound` if the order has no installation record.
pub fn get_installation(
    persistence: &mut Persistence,
    gate: &FeatureGate,
    actor: &AuthenticatedEmployee,
    order_id: i64,
) -> Result<InstallationData, ApiError> {
    gate.require(Feature::Installation)?;
    AuthorizationService::require(actor, Module::Orders, PermissionAction::Read, "get_installation")?;

    require_order(persistence, order_id)?;
    persistence
        .get_installation_for_order(order_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::NotFound {
            resource_type: String::from("Installation"),
            message: format!("Order {order_id} has no installation record"),
        })
}

/// Updates an installation's schedule, checklist, and notes.
///
/// Checklist progress is field work, so this check runs against the
/// measurements module, which technicians hold write access to.
///
/// # Errors
///
/// Returns an error if the installation does not exist or the checklist
/// is not valid JSON.
pub fn update_installation(
    persistence: &mut Persistence,
    gate: &FeatureGate,
    actor: &AuthenticatedEmployee,
    installation_id: i64,
    request: UpdateInstallationRequest,
) -> Result<InstallationData, ApiError> {
    gate.require(Feature::Installation)?;
    AuthorizationService::require(
        actor,
        Module::Measurements,
        PermissionAction::Write,
        "update_installation",
    )?;

    if let Some(checklist) = &request.checklist {
        serde_json::from_str::<serde_json::Value>(checklist).map_err(|e| ApiError::Validation {
            field: String::from("checklist"),
            message: format!("Checklist must be valid JSON: {e}"),
        })?;
    }

    // Partial update: unspecified fields keep their stored values.
    let existing = find_installation(persistence, installation_id)?;
    let checklist = request.checklist.unwrap_or(existing.checklist);
    let technician_id = request.technician_id.or(existing.technician_id);
    let scheduled_at = request.scheduled_at.or(existing.scheduled_at);
    let work_notes = request.work_notes.or(existing.work_notes);
    let handover_notes = request.handover_notes.or(existing.handover_notes);

    persistence
        .update_installation(
            installation_id,
            technician_id,
            scheduled_at.as_deref(),
            &checklist,
            work_notes.as_deref(),
            handover_notes.as_deref(),
        )
        .map_err(translate_persistence_error)?;

    find_installation(persistence, installation_id)
}

fn find_installation(
    persistence: &mut Persistence,
    installation_id: i64,
) -> Result<InstallationData, ApiError> {
    persistence
        .get_installation(installation_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::NotFound {
            resource_type: String::from("Installation"),
            message: format!("Installation {installation_id} does not exist"),
        })
}

/// Sends the handover email to the customer and records the delivery on
/// the installation.
///
/// # Errors
///
/// Returns `MailDelivery` when the transport fails, or a validation error
/// when the customer has no email address.
pub fn send_installation_email(
    persistence: &mut Persistence,
    gate: &FeatureGate,
    actor: &AuthenticatedEmployee,
    mailer: &dyn Mailer,
    installation_id: i64,
) -> Result<SendEmailResponse, ApiError> {
    gate.require(Feature::EmailInstallation)?;
    AuthorizationService::require(
        actor,
        Module::Orders,
        PermissionAction::Write,
        "send_installation_email",
    )?;

    let installation = find_installation(persistence, installation_id)?;
    let order = require_order(persistence, installation.order_id)?;
    let customer = require_customer(persistence, order.customer_id)?;
    let recipient = customer.email.ok_or_else(|| ApiError::Validation {
        field: String::from("email"),
        message: String::from("Customer has no email address"),
    })?;

    let message = EmailMessage {
        to: recipient.clone(),
        subject: format!("Předání zakázky {}", order.order_number),
        body: format!(
            "Dobrý den,\n\nmontáž Vaší zakázky {} byla dokončena a předána.\n\n\
             Futurol",
            order.order_number
        ),
    };
    let message_id = mailer.send(&message).map_err(|e| ApiError::MailDelivery {
        message: e.to_string(),
    })?;

    // The email already went out; a failed tracking write must not turn
    // a delivered message into a reported failure.
    if let Err(e) = persistence.record_installation_email(
        installation_id,
        actor.employee_id,
        message_id.as_deref(),
    ) {
        tracing::warn!(
            installation_id = installation_id,
            error = %e,
            "Installation email sent but tracking write failed"
        );
    }

    Ok(SendEmailResponse {
        recipient,
        message_id,
    })
}

// ============================================================================
// Service tickets
// ============================================================================

/// Opens a service ticket for a customer.
///
/// # Errors
///
/// Returns an error if the customer does not exist or a name is unknown.
pub fn create_ticket(
    persistence: &mut Persistence,
    gate: &FeatureGate,
    actor: &AuthenticatedEmployee,
    request: CreateTicketRequest,
) -> Result<ServiceTicketData, ApiError> {
    gate.require(Feature::Service)?;
    AuthorizationService::require(actor, Module::Service, PermissionAction::Write, "create_ticket")?;

    let ticket_type: TicketType = parse_domain(&request.ticket_type)?;
    let priority: Priority = parse_domain(&request.priority)?;

    persistence
        .create_ticket(&NewServiceTicket {
            customer_id: request.customer_id,
            order_id: request.order_id,
            ticket_type,
            category: request.category,
            priority,
            subject: request.subject,
            description: request.description,
            created_by: actor.employee_id,
        })
        .map_err(translate_persistence_error)
}

/// Updates a ticket's workflow state.
///
/// Moving to `resolved` or `closed` stamps the resolution time once.
///
/// # Errors
///
/// Returns an error if the ticket does not exist or the status is
/// unknown.
pub fn update_ticket(
    persistence: &mut Persistence,
    gate: &FeatureGate,
    actor: &AuthenticatedEmployee,
    ticket_id: i64,
    request: UpdateTicketRequest,
) -> Result<ServiceTicketData, ApiError> {
    gate.require(Feature::Service)?;
    AuthorizationService::require(actor, Module::Service, PermissionAction::Write, "update_ticket")?;

    let status: TicketStatus = parse_domain(&request.status)?;
    persistence
        .update_ticket(
            ticket_id,
            status,
            request.resolution.as_deref(),
            request.materials_used.as_deref(),
        )
        .map_err(translate_persistence_error)
}

/// Lists service tickets, optionally filtered by status and customer.
///
/// # Errors
///
/// Returns an error if the status filter is not a known ticket status.
pub fn list_tickets(
    persistence: &mut Persistence,
    gate: &FeatureGate,
    actor: &AuthenticatedEmployee,
    status: Option<&str>,
    customer_id: Option<i64>,
) -> Result<Vec<ServiceTicketData>, ApiError> {
    gate.require(Feature::Service)?;
    AuthorizationService::require(actor, Module::Service, PermissionAction::Read, "list_tickets")?;

    let status = status
        .map(parse_domain::<TicketStatus>)
        .transpose()?
        .map(|status| status.as_str());
    persistence
        .list_tickets(status, customer_id)
        .map_err(translate_persistence_error)
}

/// Retrieves one service ticket.
///
/// # Errors
///
/// Returns an error if the ticket does not exist.
pub fn get_ticket(
    persistence: &mut Persistence,
    gate: &FeatureGate,
    actor: &AuthenticatedEmployee,
    ticket_id: i64,
) -> Result<ServiceTicketData, ApiError> {
    gate.require(Feature::Service)?;
    AuthorizationService::require(actor, Module::Service, PermissionAction::Read, "get_ticket")?;

    persistence
        .get_ticket(ticket_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::NotFound {
            resource_type: String::from("ServiceTicket"),
            message: format!("Service ticket {ticket_id} does not exist"),
        })
}

/// Sends the service protocol email to the customer and records the
/// delivery on the ticket.
///
/// # Errors
///
/// Returns `MailDelivery` when the transport fails, or a validation error
/// when the customer has no email address.
pub fn send_ticket_email(
    persistence: &mut Persistence,
    gate: &FeatureGate,
    actor: &AuthenticatedEmployee,
    mailer: &dyn Mailer,
    ticket_id: i64,
) -> Result<SendEmailResponse, ApiError> {
    gate.require(Feature::EmailService)?;
    AuthorizationService::require(
        actor,
        Module::Service,
        PermissionAction::Write,
        "send_ticket_email",
    )?;

    let ticket = persistence
        .get_ticket(ticket_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::NotFound {
            resource_type: String::from("ServiceTicket"),
            message: format!("Service ticket {ticket_id} does not exist"),
        })?;
    let customer = require_customer(persistence, ticket.customer_id)?;
    let recipient = customer.email.ok_or_else(|| ApiError::Validation {
        field: String::from("email"),
        message: String::from("Customer has no email address"),
    })?;

    let resolution = ticket.resolution.as_deref().unwrap_or("viz protokol");
    let message = EmailMessage {
        to: recipient.clone(),
        subject: format!("Servisní protokol k tiketu {}", ticket.ticket_id),
        body: format!(
            "Dobrý den,\n\nservisní zásah \"{}\" byl dokončen.\n\
             Výsledek: {}\n\n\
             Futurol",
            ticket.subject, resolution
        ),
    };
    let message_id = mailer.send(&message).map_err(|e| ApiError::MailDelivery {
        message: e.to_string(),
    })?;

    // The email already went out; a failed tracking write must not turn
    // a delivered message into a reported failure.
    if let Err(e) =
        persistence.record_ticket_email(ticket_id, actor.employee_id, message_id.as_deref())
    {
        tracing::warn!(
            ticket_id = ticket_id,
            error = %e,
            "Service email sent but tracking write failed"
        );
    }

    Ok(SendEmailResponse {
        recipient,
        message_id,
    })
}

// ============================================================================
// Audit
// ============================================================================

/// Lists the most recent audit entries, newest first.
///
/// Restricted to admins and managers, on top of the `audit_logs` feature.
///
/// # Errors
///
/// Returns an error if the feature or permission check fails.
pub fn list_audit_events(
    persistence: &mut Persistence,
    gate: &FeatureGate,
    actor: &AuthenticatedEmployee,
    limit: i64,
) -> Result<Vec<AuditLogData>, ApiError> {
    gate.require(Feature::AuditLogs)?;
    AuthorizationService::require_manager_or_above(actor, "list_audit_events")?;

    persistence
        .list_recent_audit_entries(limit.clamp(1, 500))
        .map_err(translate_persistence_error)
}

/// Lists the audit trail of one entity, oldest first.
///
/// # Errors
///
/// Returns an error if the feature or permission check fails.
pub fn list_audit_events_for_entity(
    persistence: &mut Persistence,
    gate: &FeatureGate,
    actor: &AuthenticatedEmployee,
    entity_type: &str,
    entity_id: i64,
) -> Result<Vec<AuditLogData>, ApiError> {
    gate.require(Feature::AuditLogs)?;
    AuthorizationService::require_manager_or_above(actor, "list_audit_events_for_entity")?;

    persistence
        .list_audit_entries_for_entity(entity_type, entity_id)
        .map_err(translate_persistence_error)
}
