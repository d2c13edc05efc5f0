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
#![allow(clippy::multiple_crate_versions)]

mod mail;
mod session;

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

use futurol_api::{
    ApiError, FeatureGate, Mailer, RateLimiter, TOKEN_LIFETIME, handlers,
    request_response::{
        ChangePinRequest, ConversionResponse, ConvertLeadRequest, CreateContactRequest,
        CreateEmployeeRequest, CreateInquiryRequest, CreateInstallationRequest, CreateLeadRequest,
        CreateLocationRequest, CreateMeasurementRequest, CreateOrderRequest, CreateQuoteRequest, CreateTicketRequest,
        CustomerRequest, EmployeeResponse, LoginRequest, LoginResponse, OrderDetailResponse,
        RejectLeadRequest, SendEmailResponse, UpdateEmployeeRequest, UpdateInstallationRequest,
        UpdateMeasurementRequest, UpdateOrderRequest, UpdateQuoteStatusRequest,
        UpdateTicketRequest, WhoAmIResponse,
    },
};
use futurol_persistence::{
    AuditLogData, ContactData, CustomerData, InquiryData, InstallationData, LeadData,
    LocationData, MeasurementData, OrderData, Persistence, ProductData, QuoteData,
    ServiceTicketData,
};

use crate::session::Session;

/// Futurol CRM Server - HTTP server for the Futurol CRM/ERP backend
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,
}

/// How often the rate limiter evicts stale bookkeeping.
const SWEEP_INTERVAL: std::time::Duration = std::time::Duration::from_secs(300);

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The persistence layer wrapped in a Mutex for safe concurrent access.
    persistence: Arc<Mutex<Persistence>>,
    /// The login rate limiter shared by all login attempts.
    rate_limiter: Arc<RateLimiter>,
    /// The license tier gate resolved at startup.
    gate: FeatureGate,
    /// The token signing secret.
    token_secret: Arc<String>,
    /// The outgoing mail transport.
    mailer: Arc<dyn Mailer + Send + Sync>,
}

/// Query parameters for listing customers.
#[derive(Debug, Deserialize)]
struct CustomerListQuery {
    /// Case-insensitive substring applied to name, company, email, and phone.
    search: Option<String>,
}

/// Query parameters for listing leads or inquiries.
#[derive(Debug, Deserialize)]
struct StatusQuery {
    /// Status name to filter on.
    status: Option<String>,
}

/// Query parameters for listing orders or service tickets.
#[derive(Debug, Deserialize)]
struct OrderListQuery {
    /// Status name to filter on.
    status: Option<String>,
    /// Customer to filter on.
    customer_id: Option<i64>,
}

/// Query parameters for the audit trail.
#[derive(Debug, Deserialize)]
struct AuditQuery {
    /// Maximum number of entries to return.
    limit: Option<i64>,
}

/// API response for operations with no payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MessageResponse {
    /// Success indicator.
    success: bool,
    /// A human-readable message.
    message: String,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Unauthorized { .. } | ApiError::FeatureNotAvailable { .. } => {
                StatusCode::FORBIDDEN
            }
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::MailDelivery { .. } => StatusCode::BAD_GATEWAY,
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

/// Resolves the client address used as the per-address rate limit key.
///
/// The server normally sits behind a reverse proxy, so the first
/// `X-Forwarded-For` entry wins when present.
fn client_addr(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map_or_else(|| String::from("unknown"), |addr| addr.trim().to_string())
}

// ============================================================================
// Auth
// ============================================================================

/// Handler for POST `/auth/login` endpoint.
///
/// Verifies credentials and installs the session cookie.
async fn handle_login(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> Result<Response, HttpError> {
    info!(personal_number = %req.personal_number, "Handling login request");

    let remote: String = client_addr(&headers);

    let mut persistence = state.persistence.lock().await;
    let response: LoginResponse = handlers::login(
        &mut persistence,
        &state.rate_limiter,
        &state.token_secret,
        &remote,
        &req,
    )?;
    drop(persistence);

    info!(personal_number = %response.personal_number, "Login succeeded");

    let cookie: String =
        session::session_cookie(&response.token, TOKEN_LIFETIME.whole_seconds());
    Ok(([(header::SET_COOKIE, cookie)], Json(response)).into_response())
}

/// Handler for POST `/auth/logout` endpoint.
///
/// Tokens are stateless, so logout clears the session cookie.
#[allow(clippy::unused_async)]
async fn handle_logout(Session(actor): Session) -> Response {
    info!(personal_number = %actor.personal_number, "Handling logout request");

    let body: Json<MessageResponse> = Json(MessageResponse {
        success: true,
        message: String::from("Logged out"),
    });
    ([(header::SET_COOKIE, session::clear_session_cookie())], body).into_response()
}

/// Handler for GET `/auth/whoami` endpoint.
#[allow(clippy::unused_async)]
async fn handle_whoami(
    AxumState(state): AxumState<AppState>,
    Session(actor): Session,
) -> Json<WhoAmIResponse> {
    Json(handlers::whoami(&state.gate, &actor))
}

/// Handler for POST `/auth/change_pin` endpoint.
async fn handle_change_pin(
    AxumState(state): AxumState<AppState>,
    Session(actor): Session,
    Json(req): Json<ChangePinRequest>,
) -> Result<Json<MessageResponse>, HttpError> {
    info!(personal_number = %actor.personal_number, "Handling change_pin request");

    let mut persistence = state.persistence.lock().await;
    handlers::change_pin(&mut persistence, &actor, &req)?;
    drop(persistence);

    Ok(Json(MessageResponse {
        success: true,
        message: String::from("PIN changed"),
    }))
}

// ============================================================================
// Employees
// ============================================================================

/// Handler for POST `/employees` endpoint.
async fn handle_create_employee(
    AxumState(state): AxumState<AppState>,
    Session(actor): Session,
    Json(req): Json<CreateEmployeeRequest>,
) -> Result<Json<EmployeeResponse>, HttpError> {
    info!(
        personal_number = %actor.personal_number,
        new_personal_number = %req.personal_number,
        "Handling create_employee request"
    );

    let mut persistence = state.persistence.lock().await;
    let response: EmployeeResponse =
        handlers::create_employee(&mut persistence, &state.gate, &actor, req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/employees` endpoint.
async fn handle_list_employees(
    AxumState(state): AxumState<AppState>,
    Session(actor): Session,
) -> Result<Json<Vec<EmployeeResponse>>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let employees: Vec<EmployeeResponse> = handlers::list_employees(&mut persistence, &actor)?;
    drop(persistence);

    Ok(Json(employees))
}

/// Handler for GET `/employees/{id}` endpoint.
async fn handle_get_employee(
    AxumState(state): AxumState<AppState>,
    Session(actor): Session,
    Path(employee_id): Path<i64>,
) -> Result<Json<EmployeeResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let employee: EmployeeResponse =
        handlers::get_employee(&mut persistence, &actor, employee_id)?;
    drop(persistence);

    Ok(Json(employee))
}

/// Handler for PUT `/employees/{id}` endpoint.
async fn handle_update_employee(
    AxumState(state): AxumState<AppState>,
    Session(actor): Session,
    Path(employee_id): Path<i64>,
    Json(req): Json<UpdateEmployeeRequest>,
) -> Result<Json<EmployeeResponse>, HttpError> {
    info!(
        personal_number = %actor.personal_number,
        employee_id = employee_id,
        "Handling update_employee request"
    );

    let mut persistence = state.persistence.lock().await;
    let response: EmployeeResponse =
        handlers::update_employee(&mut persistence, &state.gate, &actor, employee_id, req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for DELETE `/employees/{id}` endpoint.
///
/// Deactivates the employee; records are never removed.
async fn handle_deactivate_employee(
    AxumState(state): AxumState<AppState>,
    Session(actor): Session,
    Path(employee_id): Path<i64>,
) -> Result<Json<MessageResponse>, HttpError> {
    info!(
        personal_number = %actor.personal_number,
        employee_id = employee_id,
        "Handling deactivate_employee request"
    );

    let mut persistence = state.persistence.lock().await;
    handlers::deactivate_employee(&mut persistence, &actor, employee_id)?;
    drop(persistence);

    Ok(Json(MessageResponse {
        success: true,
        message: String::from("Employee deactivated"),
    }))
}

// ============================================================================
// Customers
// ============================================================================

/// Handler for POST `/customers` endpoint.
async fn handle_create_customer(
    AxumState(state): AxumState<AppState>,
    Session(actor): Session,
    Json(req): Json<CustomerRequest>,
) -> Result<Json<CustomerData>, HttpError> {
    info!(personal_number = %actor.personal_number, "Handling create_customer request");

    let mut persistence = state.persistence.lock().await;
    let customer: CustomerData =
        handlers::create_customer(&mut persistence, &state.gate, &actor, req)?;
    drop(persistence);

    Ok(Json(customer))
}

/// Handler for GET `/customers` endpoint.
async fn handle_list_customers(
    AxumState(state): AxumState<AppState>,
    Session(actor): Session,
    Query(query): Query<CustomerListQuery>,
) -> Result<Json<Vec<CustomerData>>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let customers: Vec<CustomerData> = handlers::list_customers(
        &mut persistence,
        &state.gate,
        &actor,
        query.search.as_deref(),
    )?;
    drop(persistence);

    Ok(Json(customers))
}

/// Handler for GET `/customers/{id}` endpoint.
async fn handle_get_customer(
    AxumState(state): AxumState<AppState>,
    Session(actor): Session,
    Path(customer_id): Path<i64>,
) -> Result<Json<CustomerData>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let customer: CustomerData =
        handlers::get_customer(&mut persistence, &state.gate, &actor, customer_id)?;
    drop(persistence);

    Ok(Json(customer))
}

/// Handler for PUT `/customers/{id}` endpoint.
async fn handle_update_customer(
    AxumState(state): AxumState<AppState>,
    Session(actor): Session,
    Path(customer_id): Path<i64>,
    Json(req): Json<CustomerRequest>,
) -> Result<Json<CustomerData>, HttpError> {
    info!(
        personal_number = %actor.personal_number,
        customer_id = customer_id,
        "Handling update_customer request"
    );

    let mut persistence = state.persistence.lock().await;
    let customer: CustomerData =
        handlers::update_customer(&mut persistence, &state.gate, &actor, customer_id, req)?;
    drop(persistence);

    Ok(Json(customer))
}

/// Handler for POST `/contacts` endpoint.
async fn handle_create_contact(
    AxumState(state): AxumState<AppState>,
    Session(actor): Session,
    Json(req): Json<CreateContactRequest>,
) -> Result<Json<ContactData>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let contact: ContactData =
        handlers::create_contact(&mut persistence, &state.gate, &actor, req)?;
    drop(persistence);

    Ok(Json(contact))
}

/// Handler for GET `/customers/{id}/contacts` endpoint.
async fn handle_list_contacts(
    AxumState(state): AxumState<AppState>,
    Session(actor): Session,
    Path(customer_id): Path<i64>,
) -> Result<Json<Vec<ContactData>>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let contacts: Vec<ContactData> =
        handlers::list_contacts(&mut persistence, &state.gate, &actor, customer_id)?;
    drop(persistence);

    Ok(Json(contacts))
}

/// Handler for POST `/locations` endpoint.
async fn handle_create_location(
    AxumState(state): AxumState<AppState>,
    Session(actor): Session,
    Json(req): Json<CreateLocationRequest>,
) -> Result<Json<LocationData>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let location: LocationData =
        handlers::create_location(&mut persistence, &state.gate, &actor, req)?;
    drop(persistence);

    Ok(Json(location))
}

/// Handler for GET `/customers/{id}/locations` endpoint.
async fn handle_list_locations(
    AxumState(state): AxumState<AppState>,
    Session(actor): Session,
    Path(customer_id): Path<i64>,
) -> Result<Json<Vec<LocationData>>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let locations: Vec<LocationData> =
        handlers::list_locations(&mut persistence, &state.gate, &actor, customer_id)?;
    drop(persistence);

    Ok(Json(locations))
}

// ============================================================================
// Products
// ============================================================================

/// Handler for GET `/products` endpoint.
async fn handle_list_products(
    AxumState(state): AxumState<AppState>,
    Session(actor): Session,
) -> Result<Json<Vec<ProductData>>, HttpError> {
    info!(personal_number = %actor.personal_number, "Handling list_products request");

    let mut persistence = state.persistence.lock().await;
    let products: Vec<ProductData> = handlers::list_products(&mut persistence)?;
    drop(persistence);

    Ok(Json(products))
}

// ============================================================================
// Leads
// ============================================================================

/// Handler for POST `/leads` endpoint.
async fn handle_create_lead(
    AxumState(state): AxumState<AppState>,
    Session(actor): Session,
    Json(req): Json<CreateLeadRequest>,
) -> Result<Json<LeadData>, HttpError> {
    info!(personal_number = %actor.personal_number, "Handling create_lead request");

    let mut persistence = state.persistence.lock().await;
    let lead: LeadData = handlers::create_lead(&mut persistence, &state.gate, &actor, req)?;
    drop(persistence);

    Ok(Json(lead))
}

/// Handler for GET `/leads` endpoint.
async fn handle_list_leads(
    AxumState(state): AxumState<AppState>,
    Session(actor): Session,
    Query(query): Query<StatusQuery>,
) -> Result<Json<Vec<LeadData>>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let leads: Vec<LeadData> = handlers::list_leads(
        &mut persistence,
        &state.gate,
        &actor,
        query.status.as_deref(),
    )?;
    drop(persistence);

    Ok(Json(leads))
}

/// Handler for GET `/leads/{id}` endpoint.
async fn handle_get_lead(
    AxumState(state): AxumState<AppState>,
    Session(actor): Session,
    Path(lead_id): Path<i64>,
) -> Result<Json<LeadData>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let lead: LeadData = handlers::get_lead(&mut persistence, &state.gate, &actor, lead_id)?;
    drop(persistence);

    Ok(Json(lead))
}

/// Handler for POST `/leads/{id}/contacted` endpoint.
async fn handle_mark_lead_contacted(
    AxumState(state): AxumState<AppState>,
    Session(actor): Session,
    Path(lead_id): Path<i64>,
) -> Result<Json<LeadData>, HttpError> {
    info!(
        personal_number = %actor.personal_number,
        lead_id = lead_id,
        "Handling mark_lead_contacted request"
    );

    let mut persistence = state.persistence.lock().await;
    let lead: LeadData =
        handlers::mark_lead_contacted(&mut persistence, &state.gate, &actor, lead_id)?;
    drop(persistence);

    Ok(Json(lead))
}

/// Handler for POST `/leads/{id}/convert` endpoint.
async fn handle_convert_lead(
    AxumState(state): AxumState<AppState>,
    Session(actor): Session,
    Path(lead_id): Path<i64>,
    body: Option<Json<ConvertLeadRequest>>,
) -> Result<Json<ConversionResponse>, HttpError> {
    info!(
        personal_number = %actor.personal_number,
        lead_id = lead_id,
        "Handling convert_lead request"
    );

    // The body is optional; a bare POST converts with the lead's own
    // fields.
    let request: ConvertLeadRequest = body.map_or_else(ConvertLeadRequest::default, |Json(r)| r);

    let mut persistence = state.persistence.lock().await;
    let response: ConversionResponse =
        handlers::convert_lead(&mut persistence, &state.gate, &actor, lead_id, &request)?;
    drop(persistence);

    info!(
        lead_id = lead_id,
        customer_id = response.customer.customer_id,
        "Successfully converted lead"
    );

    Ok(Json(response))
}

/// Handler for POST `/leads/{id}/reject` endpoint.
async fn handle_reject_lead(
    AxumState(state): AxumState<AppState>,
    Session(actor): Session,
    Path(lead_id): Path<i64>,
    Json(req): Json<RejectLeadRequest>,
) -> Result<Json<LeadData>, HttpError> {
    info!(
        personal_number = %actor.personal_number,
        lead_id = lead_id,
        reason = %req.reason,
        "Handling reject_lead request"
    );

    let mut persistence = state.persistence.lock().await;
    let lead: LeadData =
        handlers::reject_lead(&mut persistence, &state.gate, &actor, lead_id, &req)?;
    drop(persistence);

    Ok(Json(lead))
}

// ============================================================================
// Inquiries
// ============================================================================

/// Handler for POST `/inquiries` endpoint.
///
/// The one unauthenticated write: the public web form posts here.
async fn handle_create_inquiry(
    AxumState(state): AxumState<AppState>,
    Json(req): Json<CreateInquiryRequest>,
) -> Result<Json<InquiryData>, HttpError> {
    info!("Handling create_inquiry request");

    let mut persistence = state.persistence.lock().await;
    let inquiry: InquiryData = handlers::create_inquiry(&mut persistence, &state.gate, req)?;
    drop(persistence);

    Ok(Json(inquiry))
}

/// Handler for GET `/inquiries` endpoint.
async fn handle_list_inquiries(
    AxumState(state): AxumState<AppState>,
    Session(actor): Session,
    Query(query): Query<StatusQuery>,
) -> Result<Json<Vec<InquiryData>>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let inquiries: Vec<InquiryData> = handlers::list_inquiries(
        &mut persistence,
        &state.gate,
        &actor,
        query.status.as_deref(),
    )?;
    drop(persistence);

    Ok(Json(inquiries))
}

/// Handler for POST `/inquiries/{id}/convert` endpoint.
async fn handle_convert_inquiry(
    AxumState(state): AxumState<AppState>,
    Session(actor): Session,
    Path(inquiry_id): Path<i64>,
) -> Result<Json<ConversionResponse>, HttpError> {
    info!(
        personal_number = %actor.personal_number,
        inquiry_id = inquiry_id,
        "Handling convert_inquiry request"
    );

    let mut persistence = state.persistence.lock().await;
    let response: ConversionResponse =
        handlers::convert_inquiry(&mut persistence, &state.gate, &actor, inquiry_id)?;
    drop(persistence);

    Ok(Json(response))
}

// ============================================================================
// Orders
// ============================================================================

/// Handler for POST `/orders` endpoint.
async fn handle_create_order(
    AxumState(state): AxumState<AppState>,
    Session(actor): Session,
    Json(req): Json<CreateOrderRequest>,
) -> Result<Json<OrderDetailResponse>, HttpError> {
    info!(
        personal_number = %actor.personal_number,
        customer_id = req.customer_id,
        "Handling create_order request"
    );

    let mut persistence = state.persistence.lock().await;
    let detail: OrderDetailResponse =
        handlers::create_order(&mut persistence, &state.gate, &actor, req)?;
    drop(persistence);

    info!(
        order_id = detail.order.order_id,
        order_number = %detail.order.order_number,
        "Successfully created order"
    );

    Ok(Json(detail))
}

/// Handler for GET `/orders` endpoint.
async fn handle_list_orders(
    AxumState(state): AxumState<AppState>,
    Session(actor): Session,
    Query(query): Query<OrderListQuery>,
) -> Result<Json<Vec<OrderData>>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let orders: Vec<OrderData> = handlers::list_orders(
        &mut persistence,
        &state.gate,
        &actor,
        query.status.as_deref(),
        query.customer_id,
    )?;
    drop(persistence);

    Ok(Json(orders))
}

/// Handler for GET `/orders/{id}` endpoint.
async fn handle_get_order(
    AxumState(state): AxumState<AppState>,
    Session(actor): Session,
    Path(order_id): Path<i64>,
) -> Result<Json<OrderDetailResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let detail: OrderDetailResponse =
        handlers::get_order(&mut persistence, &state.gate, &actor, order_id)?;
    drop(persistence);

    Ok(Json(detail))
}

/// Handler for PUT `/orders/{id}` endpoint.
///
/// A populated `status` field requests a pipeline transition.
async fn handle_update_order(
    AxumState(state): AxumState<AppState>,
    Session(actor): Session,
    Path(order_id): Path<i64>,
    Json(req): Json<UpdateOrderRequest>,
) -> Result<Json<OrderDetailResponse>, HttpError> {
    info!(
        personal_number = %actor.personal_number,
        order_id = order_id,
        status = ?req.status,
        "Handling update_order request"
    );

    let mut persistence = state.persistence.lock().await;
    let detail: OrderDetailResponse =
        handlers::update_order(&mut persistence, &state.gate, &actor, order_id, req)?;
    drop(persistence);

    Ok(Json(detail))
}

/// Handler for DELETE `/orders/{id}` endpoint.
async fn handle_delete_order(
    AxumState(state): AxumState<AppState>,
    Session(actor): Session,
    Path(order_id): Path<i64>,
) -> Result<Json<MessageResponse>, HttpError> {
    info!(
        personal_number = %actor.personal_number,
        order_id = order_id,
        "Handling delete_order request"
    );

    let mut persistence = state.persistence.lock().await;
    handlers::delete_order(&mut persistence, &state.gate, &actor, order_id)?;
    drop(persistence);

    Ok(Json(MessageResponse {
        success: true,
        message: String::from("Order deleted"),
    }))
}

// ============================================================================
// Quotes
// ============================================================================

/// Handler for POST `/quotes` endpoint.
async fn handle_create_quote(
    AxumState(state): AxumState<AppState>,
    Session(actor): Session,
    Json(req): Json<CreateQuoteRequest>,
) -> Result<Json<QuoteData>, HttpError> {
    info!(
        personal_number = %actor.personal_number,
        order_id = req.order_id,
        "Handling create_quote request"
    );

    let mut persistence = state.persistence.lock().await;
    let quote: QuoteData = handlers::create_quote(&mut persistence, &state.gate, &actor, req)?;
    drop(persistence);

    Ok(Json(quote))
}

/// Handler for PUT `/quotes/{id}/status` endpoint.
async fn handle_update_quote_status(
    AxumState(state): AxumState<AppState>,
    Session(actor): Session,
    Path(quote_id): Path<i64>,
    Json(req): Json<UpdateQuoteStatusRequest>,
) -> Result<Json<MessageResponse>, HttpError> {
    info!(
        personal_number = %actor.personal_number,
        quote_id = quote_id,
        status = %req.status,
        "Handling update_quote_status request"
    );

    let mut persistence = state.persistence.lock().await;
    handlers::update_quote_status(&mut persistence, &state.gate, &actor, quote_id, &req)?;
    drop(persistence);

    Ok(Json(MessageResponse {
        success: true,
        message: String::from("Quote status updated"),
    }))
}

/// Handler for GET `/orders/{id}/quotes` endpoint.
async fn handle_list_quotes_for_order(
    AxumState(state): AxumState<AppState>,
    Session(actor): Session,
    Path(order_id): Path<i64>,
) -> Result<Json<Vec<QuoteData>>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let quotes: Vec<QuoteData> =
        handlers::list_quotes_for_order(&mut persistence, &state.gate, &actor, order_id)?;
    drop(persistence);

    Ok(Json(quotes))
}

// ============================================================================
// Measurements
// ============================================================================

/// Handler for POST `/measurements` endpoint.
async fn handle_create_measurement(
    AxumState(state): AxumState<AppState>,
    Session(actor): Session,
    Json(req): Json<CreateMeasurementRequest>,
) -> Result<Json<MeasurementData>, HttpError> {
    info!(
        personal_number = %actor.personal_number,
        order_id = req.order_id,
        "Handling create_measurement request"
    );

    let mut persistence = state.persistence.lock().await;
    let measurement: MeasurementData =
        handlers::create_measurement(&mut persistence, &state.gate, &actor, req)?;
    drop(persistence);

    Ok(Json(measurement))
}

/// Handler for GET `/orders/{id}/measurement` endpoint.
async fn handle_get_measurement(
    AxumState(state): AxumState<AppState>,
    Session(actor): Session,
    Path(order_id): Path<i64>,
) -> Result<Json<MeasurementData>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let measurement: MeasurementData =
        handlers::get_measurement(&mut persistence, &state.gate, &actor, order_id)?;
    drop(persistence);

    Ok(Json(measurement))
}

/// Handler for PUT `/measurements/{id}` endpoint.
async fn handle_update_measurement(
    AxumState(state): AxumState<AppState>,
    Session(actor): Session,
    Path(measurement_id): Path<i64>,
    Json(req): Json<UpdateMeasurementRequest>,
) -> Result<Json<MeasurementData>, HttpError> {
    info!(
        personal_number = %actor.personal_number,
        measurement_id = measurement_id,
        "Handling update_measurement request"
    );

    let mut persistence = state.persistence.lock().await;
    let measurement: MeasurementData =
        handlers::update_measurement(&mut persistence, &state.gate, &actor, measurement_id, req)?;
    drop(persistence);

    Ok(Json(measurement))
}

/// Handler for DELETE `/measurements/{id}` endpoint.
///
/// Reverts the owning order to the quote stage.
async fn handle_delete_measurement(
    AxumState(state): AxumState<AppState>,
    Session(actor): Session,
    Path(measurement_id): Path<i64>,
) -> Result<Json<MessageResponse>, HttpError> {
    info!(
        personal_number = %actor.personal_number,
        measurement_id = measurement_id,
        "Handling delete_measurement request"
    );

    let mut persistence = state.persistence.lock().await;
    handlers::delete_measurement(&mut persistence, &state.gate, &actor, measurement_id)?;
    drop(persistence);

    Ok(Json(MessageResponse {
        success: true,
        message: String::from("Measurement deleted"),
    }))
}

/// Handler for POST `/measurements/{id}/email` endpoint.
async fn handle_send_measurement_email(
    AxumState(state): AxumState<AppState>,
    Session(actor): Session,
    Path(measurement_id): Path<i64>,
) -> Result<Json<SendEmailResponse>, HttpError> {
    info!(
        personal_number = %actor.personal_number,
        measurement_id = measurement_id,
        "Handling send_measurement_email request"
    );

    let mut persistence = state.persistence.lock().await;
    let response: SendEmailResponse = handlers::send_measurement_email(
        &mut persistence,
        &state.gate,
        &actor,
        state.mailer.as_ref(),
        measurement_id,
    )?;
    drop(persistence);

    info!(recipient = %response.recipient, "Measurement email sent");

    Ok(Json(response))
}

// ============================================================================
// Installations
// ============================================================================

/// Handler for POST `/installations` endpoint.
async fn handle_create_installation(
    AxumState(state): AxumState<AppState>,
    Session(actor): Session,
    Json(req): Json<CreateInstallationRequest>,
) -> Result<Json<InstallationData>, HttpError> {
    info!(
        personal_number = %actor.personal_number,
        order_id = req.order_id,
        "Handling create_installation request"
    );

    let mut persistence = state.persistence.lock().await;
    let installation: InstallationData =
        handlers::create_installation(&mut persistence, &state.gate, &actor, req)?;
    drop(persistence);

    Ok(Json(installation))
}

/// Handler for GET `/orders/{id}/installation` endpoint.
async fn handle_get_installation(
    AxumState(state): AxumState<AppState>,
    Session(actor): Session,
    Path(order_id): Path<i64>,
) -> Result<Json<InstallationData>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let installation: InstallationData =
        handlers::get_installation(&mut persistence, &state.gate, &actor, order_id)?;
    drop(persistence);

    Ok(Json(installation))
}

/// Handler for PUT `/installations/{id}` endpoint.
async fn handle_update_installation(
    AxumState(state): AxumState<AppState>,
    Session(actor): Session,
    Path(installation_id): Path<i64>,
    Json(req): Json<UpdateInstallationRequest>,
) -> Result<Json<InstallationData>, HttpError> {
    info!(
        personal_number = %actor.personal_number,
        installation_id = installation_id,
        "Handling update_installation request"
    );

    let mut persistence = state.persistence.lock().await;
    let installation: InstallationData = handlers::update_installation(
        &mut persistence,
        &state.gate,
        &actor,
        installation_id,
        req,
    )?;
    drop(persistence);

    Ok(Json(installation))
}

/// Handler for POST `/installations/{id}/email` endpoint.
async fn handle_send_installation_email(
    AxumState(state): AxumState<AppState>,
    Session(actor): Session,
    Path(installation_id): Path<i64>,
) -> Result<Json<SendEmailResponse>, HttpError> {
    info!(
        personal_number = %actor.personal_number,
        installation_id = installation_id,
        "Handling send_installation_email request"
    );

    let mut persistence = state.persistence.lock().await;
    let response: SendEmailResponse = handlers::send_installation_email(
        &mut persistence,
        &state.gate,
        &actor,
        state.mailer.as_ref(),
        installation_id,
    )?;
    drop(persistence);

    info!(recipient = %response.recipient, "Installation email sent");

    Ok(Json(response))
}

// ============================================================================
// Service tickets
// ============================================================================

/// Handler for POST `/tickets` endpoint.
async fn handle_create_ticket(
    AxumState(state): AxumState<AppState>,
    Session(actor): Session,
    Json(req): Json<CreateTicketRequest>,
) -> Result<Json<ServiceTicketData>, HttpError> {
    info!(
        personal_number = %actor.personal_number,
        customer_id = req.customer_id,
        "Handling create_ticket request"
    );

    let mut persistence = state.persistence.lock().await;
    let ticket: ServiceTicketData =
        handlers::create_ticket(&mut persistence, &state.gate, &actor, req)?;
    drop(persistence);

    Ok(Json(ticket))
}

/// Handler for GET `/tickets` endpoint.
async fn handle_list_tickets(
    AxumState(state): AxumState<AppState>,
    Session(actor): Session,
    Query(query): Query<OrderListQuery>,
) -> Result<Json<Vec<ServiceTicketData>>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let tickets: Vec<ServiceTicketData> = handlers::list_tickets(
        &mut persistence,
        &state.gate,
        &actor,
        query.status.as_deref(),
        query.customer_id,
    )?;
    drop(persistence);

    Ok(Json(tickets))
}

/// Handler for GET `/tickets/{id}` endpoint.
async fn handle_get_ticket(
    AxumState(state): AxumState<AppState>,
    Session(actor): Session,
    Path(ticket_id): Path<i64>,
) -> Result<Json<ServiceTicketData>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let ticket: ServiceTicketData =
        handlers::get_ticket(&mut persistence, &state.gate, &actor, ticket_id)?;
    drop(persistence);

    Ok(Json(ticket))
}

/// Handler for PUT `/tickets/{id}` endpoint.
async fn handle_update_ticket(
    AxumState(state): AxumState<AppState>,
    Session(actor): Session,
    Path(ticket_id): Path<i64>,
    Json(req): Json<UpdateTicketRequest>,
) -> Result<Json<ServiceTicketData>, HttpError> {
    info!(
        personal_number = %actor.personal_number,
        ticket_id = ticket_id,
        status = %req.status,
        "Handling update_ticket request"
    );

    let mut persistence = state.persistence.lock().await;
    let ticket: ServiceTicketData =
        handlers::update_ticket(&mut persistence, &state.gate, &actor, ticket_id, req)?;
    drop(persistence);

    Ok(Json(ticket))
}

/// Handler for POST `/tickets/{id}/email` endpoint.
async fn handle_send_ticket_email(
    AxumState(state): AxumState<AppState>,
    Session(actor): Session,
    Path(ticket_id): Path<i64>,
) -> Result<Json<SendEmailResponse>, HttpError> {
    info!(
        personal_number = %actor.personal_number,
        ticket_id = ticket_id,
        "Handling send_ticket_email request"
    );

    let mut persistence = state.persistence.lock().await;
    let response: SendEmailResponse = handlers::send_ticket_email(
        &mut persistence,
        &state.gate,
        &actor,
        state.mailer.as_ref(),
        ticket_id,
    )?;
    drop(persistence);

    info!(recipient = %response.recipient, "Service email sent");

    Ok(Json(response))
}

// ============================================================================
// Audit
// ============================================================================

/// Handler for GET `/audit` endpoint.
async fn handle_list_audit_events(
    AxumState(state): AxumState<AppState>,
    Session(actor): Session,
    Query(query): Query<AuditQuery>,
) -> Result<Json<Vec<AuditLogData>>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let events: Vec<AuditLogData> = handlers::list_audit_events(
        &mut persistence,
        &state.gate,
        &actor,
        query.limit.unwrap_or(100),
    )?;
    drop(persistence);

    Ok(Json(events))
}

/// Handler for GET `/audit/{entity_type}/{entity_id}` endpoint.
async fn handle_list_audit_events_for_entity(
    AxumState(state): AxumState<AppState>,
    Session(actor): Session,
    Path((entity_type, entity_id)): Path<(String, i64)>,
) -> Result<Json<Vec<AuditLogData>>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let events: Vec<AuditLogData> = handlers::list_audit_events_for_entity(
        &mut persistence,
        &state.gate,
        &actor,
        &entity_type,
        entity_id,
    )?;
    drop(persistence);

    Ok(Json(events))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/auth/login", post(handle_login))
        .route("/auth/logout", post(handle_logout))
        .route("/auth/whoami", get(handle_whoami))
        .route("/auth/change_pin", post(handle_change_pin))
        .route("/employees", post(handle_create_employee))
        .route("/employees", get(handle_list_employees))
        .route("/employees/{id}", get(handle_get_employee))
        .route("/employees/{id}", put(handle_update_employee))
        .route("/employees/{id}", delete(handle_deactivate_employee))
        .route("/customers", post(handle_create_customer))
        .route("/customers", get(handle_list_customers))
        .route("/customers/{id}", get(handle_get_customer))
        .route("/customers/{id}", put(handle_update_customer))
        .route("/customers/{id}/contacts", get(handle_list_contacts))
        .route("/customers/{id}/locations", get(handle_list_locations))
        .route("/contacts", post(handle_create_contact))
        .route("/locations", post(handle_create_location))
        .route("/products", get(handle_list_products))
        .route("/leads", post(handle_create_lead))
        .route("/leads", get(handle_list_leads))
        .route("/leads/{id}", get(handle_get_lead))
        .route("/leads/{id}/contacted", post(handle_mark_lead_contacted))
        .route("/leads/{id}/convert", post(handle_convert_lead))
        .route("/leads/{id}/reject", post(handle_reject_lead))
        .route("/inquiries", post(handle_create_inquiry))
        .route("/inquiries", get(handle_list_inquiries))
        .route("/inquiries/{id}/convert", post(handle_convert_inquiry))
        .route("/orders", post(handle_create_order))
        .route("/orders", get(handle_list_orders))
        .route("/orders/{id}", get(handle_get_order))
        .route("/orders/{id}", put(handle_update_order))
        .route("/orders/{id}", delete(handle_delete_order))
        .route("/orders/{id}/quotes", get(handle_list_quotes_for_order))
        .route("/orders/{id}/measurement", get(handle_get_measurement))
        .route("/orders/{id}/installation", get(handle_get_installation))
        .route("/quotes", post(handle_create_quote))
        .route("/quotes/{id}/status", put(handle_update_quote_status))
        .route("/measurements", post(handle_create_measurement))
        .route("/measurements/{id}", put(handle_update_measurement))
        .route("/measurements/{id}", delete(handle_delete_measurement))
        .route(
            "/measurements/{id}/email",
            post(handle_send_measurement_email),
        )
        .route("/installations", post(handle_create_installation))
        .route("/installations/{id}", put(handle_update_installation))
        .route(
            "/installations/{id}/email",
            post(handle_send_installation_email),
        )
        .route("/tickets", post(handle_create_ticket))
        .route("/tickets", get(handle_list_tickets))
        .route("/tickets/{id}", get(handle_get_ticket))
        .route("/tickets/{id}", put(handle_update_ticket))
        .route("/tickets/{id}/email", post(handle_send_ticket_email))
        .route("/audit", get(handle_list_audit_events))
        .route(
            "/audit/{entity_type}/{entity_id}",
            get(handle_list_audit_events_for_entity),
        )
        .with_state(app_state)
}

/// Resolves the token signing secret from `FUTUROL_TOKEN_SECRET`.
///
/// A missing secret gets a process-unique fallback so development servers
/// start, at the cost of sessions not surviving a restart.
fn token_secret_from_env() -> String {
    std::env::var("FUTUROL_TOKEN_SECRET").unwrap_or_else(|_| {
        tracing::warn!(
            "FUTUROL_TOKEN_SECRET is not set, sessions will not survive a restart"
        );
        format!(
            "dev-secret-{}",
            time::OffsetDateTime::now_utc().unix_timestamp_nanos()
        )
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Futurol CRM Server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let gate: FeatureGate =
        FeatureGate::from_config(std::env::var("LICENSE_TIER").ok().as_deref());
    info!(tier = gate.tier().as_str(), "License tier resolved");

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        rate_limiter: Arc::new(RateLimiter::new()),
        gate,
        token_secret: Arc::new(token_secret_from_env()),
        mailer: mail::mailer_from_env(),
    };

    // Periodically evict stale rate limiter bookkeeping
    let limiter: Arc<RateLimiter> = Arc::clone(&app_state.rate_limiter);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            limiter.sweep();
        }
    });

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
