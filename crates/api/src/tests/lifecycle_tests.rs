// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! End-to-end handler tests: conversions, the order pipeline, and
//! employee management.

use futurol_domain::Role;
use futurol_persistence::{Persistence, ServiceTicketData};

use super::helpers::{
    actor_for, create_admin_actor, create_basic_gate, create_full_gate, create_test_customer,
    create_test_order, create_test_persistence, seed_employee,
};
use crate::auth::AuthenticatedEmployee;
use crate::error::ApiError;
use crate::handlers;
use crate::mailer::{EmailMessage, MailError, Mailer, NullMailer};
use crate::request_response::{
    ConvertLeadRequest, CreateEmployeeRequest, CreateInquiryRequest, CreateLeadRequest,
    CreateMeasurementRequest, CreateOrderRequest, CreateTicketRequest, CustomerRequest,
    RejectLeadRequest, UpdateOrderRequest,
};

fn create_test_lead_request() -> CreateLeadRequest {
    CreateLeadRequest {
        source: String::from("advisor"),
        full_name: Some(String::from("Petr Svoboda")),
        email: Some(String::from("petr@example.cz")),
        phone: None,
        company: None,
        recommended_product: Some(String::from("KLIMO")),
        score_answers: Some(String::from("{\"shading\":\"full\"}")),
        customer_note: None,
    }
}

// ============================================================================
// Lead and inquiry conversion
// ============================================================================

#[test]
fn test_lead_conversion_is_one_shot() {
    let mut persistence = create_test_persistence();
    let admin = create_admin_actor(&mut persistence);
    let gate = create_full_gate();

    let lead =
        handlers::create_lead(&mut persistence, &gate, &admin, create_test_lead_request())
            .unwrap();
    let conversion = handlers::convert_lead(
        &mut persistence,
        &gate,
        &admin,
        lead.lead_id,
        &ConvertLeadRequest::default(),
    )
    .unwrap();
    assert_eq!(conversion.customer.source, "advisor");
    assert_eq!(conversion.customer.origin_lead_id, Some(lead.lead_id));

    let err = handlers::convert_lead(
        &mut persistence,
        &gate,
        &admin,
        lead.lead_id,
        &ConvertLeadRequest::default(),
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::Conflict { .. }));
}

#[test]
fn test_lead_conversion_applies_b2b_override() {
    let mut persistence = create_test_persistence();
    let admin = create_admin_actor(&mut persistence);
    let gate = create_full_gate();

    let lead =
        handlers::create_lead(&mut persistence, &gate, &admin, create_test_lead_request())
            .unwrap();
    let conversion = handlers::convert_lead(
        &mut persistence,
        &gate,
        &admin,
        lead.lead_id,
        &ConvertLeadRequest {
            customer_type: Some(String::from("B2B")),
            company_name: Some(String::from("Svoboda pergoly s.r.o.")),
            ico: Some(String::from("12345678")),
            dic: Some(String::from("CZ12345678")),
        },
    )
    .unwrap();

    assert_eq!(conversion.customer.customer_type, "B2B");
    assert_eq!(
        conversion.customer.company_name.as_deref(),
        Some("Svoboda pergoly s.r.o.")
    );
    assert_eq!(conversion.customer.ico.as_deref(), Some("12345678"));
    assert_eq!(conversion.customer.dic.as_deref(), Some("CZ12345678"));
}

#[test]
fn test_lead_conversion_rejects_unknown_customer_type() {
    let mut persistence = create_test_persistence();
    let admin = create_admin_actor(&mut persistence);
    let gate = create_full_gate();

    let lead =
        handlers::create_lead(&mut persistence, &gate, &admin, create_test_lead_request())
            .unwrap();
    let err = handlers::convert_lead(
        &mut persistence,
        &gate,
        &admin,
        lead.lead_id,
        &ConvertLeadRequest {
            customer_type: Some(String::from("B2X")),
            ..ConvertLeadRequest::default()
        },
    )
    .unwrap_err();

    assert!(matches!(err, ApiError::Validation { .. }));
    // The failed conversion must not have stamped the lead.
    let after = handlers::get_lead(&mut persistence, &gate, &admin, lead.lead_id).unwrap();
    assert_ne!(after.status, "converted");
}

#[test]
fn test_conversion_writes_exactly_one_customer_and_audit_row() {
    let mut persistence = create_test_persistence();
    let admin = create_admin_actor(&mut persistence);
    let gate = create_full_gate();

    let lead =
        handlers::create_lead(&mut persistence, &gate, &admin, create_test_lead_request())
            .unwrap();
    handlers::convert_lead(
        &mut persistence,
        &gate,
        &admin,
        lead.lead_id,
        &ConvertLeadRequest::default(),
    )
    .unwrap();
    let _ = handlers::convert_lead(
        &mut persistence,
        &gate,
        &admin,
        lead.lead_id,
        &ConvertLeadRequest::default(),
    );

    let customers = persistence.list_customers().unwrap();
    assert_eq!(customers.len(), 1);

    let trail = persistence
        .list_audit_entries_for_entity("Lead", lead.lead_id)
        .unwrap();
    let conversions: Vec<_> = trail
        .iter()
        .filter(|entry| entry.action == "LEAD_CONVERTED")
        .collect();
    assert_eq!(conversions.len(), 1);
}

#[test]
fn test_lost_lead_cannot_convert() {
    let mut persistence = create_test_persistence();
    let admin = create_admin_actor(&mut persistence);
    let gate = create_full_gate();

    let lead =
        handlers::create_lead(&mut persistence, &gate, &admin, create_test_lead_request())
            .unwrap();
    let rejected = handlers::reject_lead(
        &mut persistence,
        &gate,
        &admin,
        lead.lead_id,
        &RejectLeadRequest {
            reason: String::from("price"),
            note: Some(String::from("over budget")),
        },
    )
    .unwrap();
    assert_eq!(rejected.status, "lost");

    let err = handlers::convert_lead(
        &mut persistence,
        &gate,
        &admin,
        lead.lead_id,
        &ConvertLeadRequest::default(),
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::Conflict { .. }));
}

#[test]
fn test_reject_lead_unknown_reason_rejected() {
    let mut persistence = create_test_persistence();
    let admin = create_admin_actor(&mut persistence);
    let gate = create_full_gate();

    let lead =
        handlers::create_lead(&mut persistence, &gate, &admin, create_test_lead_request())
            .unwrap();
    let err = handlers::reject_lead(
        &mut persistence,
        &gate,
        &admin,
        lead.lead_id,
        &RejectLeadRequest {
            reason: String::from("mood"),
            note: None,
        },
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::Validation { .. }));
}

#[test]
fn test_inquiry_conversion_is_one_shot() {
    let mut persistence = create_test_persistence();
    let admin = create_admin_actor(&mut persistence);
    let gate = create_full_gate();

    let inquiry = handlers::create_inquiry(
        &mut persistence,
        &gate,
        CreateInquiryRequest {
            full_name: String::from("Eva Horakova"),
            email: Some(String::from("eva@example.cz")),
            phone: None,
            message: Some(String::from("Interested in a pergola")),
        },
    )
    .unwrap();

    let conversion =
        handlers::convert_inquiry(&mut persistence, &gate, &admin, inquiry.inquiry_id).unwrap();
    assert_eq!(conversion.customer.source, "inquiry");

    let err = handlers::convert_inquiry(&mut persistence, &gate, &admin, inquiry.inquiry_id)
        .unwrap_err();
    assert!(matches!(err, ApiError::Conflict { .. }));
}

#[test]
fn test_inquiry_requires_a_name() {
    let mut persistence = create_test_persistence();
    let err = handlers::create_inquiry(
        &mut persistence,
        &create_full_gate(),
        CreateInquiryRequest {
            full_name: String::from("   "),
            email: None,
            phone: None,
            message: None,
        },
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::Validation { .. }));
}

// ============================================================================
// Order pipeline
// ============================================================================

#[test]
fn test_new_order_starts_at_lead_with_one_history_row() {
    let mut persistence = create_test_persistence();
    let admin = create_admin_actor(&mut persistence);
    let customer = create_test_customer(&mut persistence, &admin);

    let detail = create_test_order(&mut persistence, &admin, customer.customer_id);
    assert_eq!(detail.order.status, "lead");
    assert!(detail.order.order_number.starts_with("FUT-"));
    assert_eq!(detail.history.len(), 1);
    assert!(detail.history[0].from_status.is_none());
    assert_eq!(detail.history[0].to_status, "lead");
}

#[test]
fn test_forward_jump_is_allowed() {
    let mut persistence = create_test_persistence();
    let admin = create_admin_actor(&mut persistence);
    let customer = create_test_customer(&mut persistence, &admin);
    let detail = create_test_order(&mut persistence, &admin, customer.customer_id);
    let gate = create_full_gate();

    let updated = handlers::update_order(
        &mut persistence,
        &gate,
        &admin,
        detail.order.order_id,
        UpdateOrderRequest {
            status: Some(String::from("production")),
            note: Some(String::from("skipping straight to the shop floor")),
            final_value_czk: None,
        },
    )
    .unwrap();

    assert_eq!(updated.order.status, "production");
    assert_eq!(updated.history.len(), 2);
    assert_eq!(updated.history[1].from_status.as_deref(), Some("lead"));
    assert_eq!(updated.history[1].to_status, "production");
}

#[test]
fn test_backward_transition_is_a_conflict() {
    let mut persistence = create_test_persistence();
    let admin = create_admin_actor(&mut persistence);
    let customer = create_test_customer(&mut persistence, &admin);
    let detail = create_test_order(&mut persistence, &admin, customer.customer_id);
    let gate = create_full_gate();

    handlers::update_order(
        &mut persistence,
        &gate,
        &admin,
        detail.order.order_id,
        UpdateOrderRequest {
            status: Some(String::from("production")),
            ..UpdateOrderRequest::default()
        },
    )
    .unwrap();

    let err = handlers::update_order(
        &mut persistence,
        &gate,
        &admin,
        detail.order.order_id,
        UpdateOrderRequest {
            status: Some(String::from("quote_sent")),
            ..UpdateOrderRequest::default()
        },
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::Conflict { .. }));

    // The failed attempt left no history behind.
    let current = handlers::get_order(&mut persistence, &gate, &admin, detail.order.order_id)
        .unwrap();
    assert_eq!(current.order.status, "production");
    assert_eq!(current.history.len(), 2);
}

#[test]
fn test_rejected_transition_writes_nothing_at_all() {
    let mut persistence = create_test_persistence();
    let admin = create_admin_actor(&mut persistence);
    let customer = create_test_customer(&mut persistence, &admin);
    let detail = create_test_order(&mut persistence, &admin, customer.customer_id);
    let gate = create_full_gate();

    handlers::update_order(
        &mut persistence,
        &gate,
        &admin,
        detail.order.order_id,
        UpdateOrderRequest {
            status: Some(String::from("quote_sent")),
            ..UpdateOrderRequest::default()
        },
    )
    .unwrap();

    // A final value bundled with an illegal transition must not stick.
    let err = handlers::update_order(
        &mut persistence,
        &gate,
        &admin,
        detail.order.order_id,
        UpdateOrderRequest {
            status: Some(String::from("lead")),
            note: None,
            final_value_czk: Some(123_456),
        },
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::Conflict { .. }));

    let current = handlers::get_order(&mut persistence, &gate, &admin, detail.order.order_id)
        .unwrap();
    assert_eq!(current.order.status, "quote_sent");
    assert_eq!(current.order.final_value_czk, None);
    assert_eq!(current.history.len(), 2);
}

#[test]
fn test_cancelled_order_is_terminal() {
    let mut persistence = create_test_persistence();
    let admin = create_admin_actor(&mut persistence);
    let customer = create_test_customer(&mut persistence, &admin);
    let detail = create_test_order(&mut persistence, &admin, customer.customer_id);
    let gate = create_full_gate();

    handlers::update_order(
        &mut persistence,
        &gate,
        &admin,
        detail.order.order_id,
        UpdateOrderRequest {
            status: Some(String::from("cancelled")),
            ..UpdateOrderRequest::default()
        },
    )
    .unwrap();

    let err = handlers::update_order(
        &mut persistence,
        &gate,
        &admin,
        detail.order.order_id,
        UpdateOrderRequest {
            status: Some(String::from("lead")),
            ..UpdateOrderRequest::default()
        },
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::Conflict { .. }));
}

#[test]
fn test_measurement_advances_order_and_delete_reverts() {
    let mut persistence = create_test_persistence();
    let admin = create_admin_actor(&mut persistence);
    let customer = create_test_customer(&mut persistence, &admin);
    let detail = create_test_order(&mut persistence, &admin, customer.customer_id);
    let gate = create_full_gate();
    let order_id = detail.order.order_id;

    handlers::update_order(
        &mut persistence,
        &gate,
        &admin,
        order_id,
        UpdateOrderRequest {
            status: Some(String::from("quote_sent")),
            ..UpdateOrderRequest::default()
        },
    )
    .unwrap();

    let measurement = handlers::create_measurement(
        &mut persistence,
        &gate,
        &admin,
        CreateMeasurementRequest {
            order_id,
            width_mm: 4000,
            depth_mm: 3000,
            height_mm: 2500,
            details: None,
        },
    )
    .unwrap();

    let after_create =
        handlers::get_order(&mut persistence, &gate, &admin, order_id).unwrap();
    assert_eq!(after_create.order.status, "measurement");

    handlers::delete_measurement(&mut persistence, &gate, &admin, measurement.measurement_id)
        .unwrap();
    let after_delete =
        handlers::get_order(&mut persistence, &gate, &admin, order_id).unwrap();
    assert_eq!(after_delete.order.status, "quote_sent");
}

#[test]
fn test_second_measurement_is_a_conflict() {
    let mut persistence = create_test_persistence();
    let admin = create_admin_actor(&mut persistence);
    let customer = create_test_customer(&mut persistence, &admin);
    let detail = create_test_order(&mut persistence, &admin, customer.customer_id);
    let gate = create_full_gate();

    let request = CreateMeasurementRequest {
        order_id: detail.order.order_id,
        width_mm: 4000,
        depth_mm: 3000,
        height_mm: 2500,
        details: None,
    };
    handlers::create_measurement(&mut persistence, &gate, &admin, request.clone()).unwrap();
    let err =
        handlers::create_measurement(&mut persistence, &gate, &admin, request).unwrap_err();
    assert!(matches!(err, ApiError::Conflict { .. }));
}

#[test]
fn test_implausible_dimensions_rejected() {
    let mut persistence = create_test_persistence();
    let admin = create_admin_actor(&mut persistence);
    let customer = create_test_customer(&mut persistence, &admin);
    let detail = create_test_order(&mut persistence, &admin, customer.customer_id);

    let err = handlers::create_measurement(
        &mut persistence,
        &create_full_gate(),
        &admin,
        CreateMeasurementRequest {
            order_id: detail.order.order_id,
            width_mm: 25_000,
            depth_mm: 3000,
            height_mm: 2500,
            details: None,
        },
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::Validation { .. }));
}

#[test]
fn test_delete_order_guarded_by_measurement() {
    let mut persistence = create_test_persistence();
    let admin = create_admin_actor(&mut persistence);
    let customer = create_test_customer(&mut persistence, &admin);
    let detail = create_test_order(&mut persistence, &admin, customer.customer_id);
    let gate = create_full_gate();
    let order_id = detail.order.order_id;

    let measurement = handlers::create_measurement(
        &mut persistence,
        &gate,
        &admin,
        CreateMeasurementRequest {
            order_id,
            width_mm: 4000,
            depth_mm: 3000,
            height_mm: 2500,
            details: None,
        },
    )
    .unwrap();

    let err = handlers::delete_order(&mut persistence, &gate, &admin, order_id).unwrap_err();
    assert!(matches!(err, ApiError::Conflict { .. }));

    handlers::delete_measurement(&mut persistence, &gate, &admin, measurement.measurement_id)
        .unwrap();
    handlers::delete_order(&mut persistence, &gate, &admin, order_id).unwrap();

    let err = handlers::get_order(&mut persistence, &gate, &admin, order_id).unwrap_err();
    assert!(matches!(err, ApiError::NotFound { .. }));
}

// ============================================================================
// Product catalogue
// ============================================================================

#[test]
fn test_product_catalogue_is_seeded() {
    let mut persistence = create_test_persistence();

    let products = handlers::list_products(&mut persistence).unwrap();
    assert_eq!(products.len(), 5);
    assert!(products.iter().any(|p| p.code == "KLIMO"));
}

#[test]
fn test_order_with_unknown_product_is_not_found() {
    let mut persistence = create_test_persistence();
    let admin = create_admin_actor(&mut persistence);
    let customer = create_test_customer(&mut persistence, &admin);

    let err = handlers::create_order(
        &mut persistence,
        &create_full_gate(),
        &admin,
        CreateOrderRequest {
            customer_id: customer.customer_id,
            location_id: None,
            product_id: Some(9999),
            contact_id: None,
            priority: String::from("normal"),
            estimated_value_czk: None,
            deadline_at: None,
        },
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::NotFound { .. }));
}

#[test]
fn test_lead_with_unknown_recommended_product_is_rejected() {
    let mut persistence = create_test_persistence();
    let admin = create_admin_actor(&mut persistence);

    let err = handlers::create_lead(
        &mut persistence,
        &create_full_gate(),
        &admin,
        CreateLeadRequest {
            recommended_product: Some(String::from("GAZEBO")),
            ..create_test_lead_request()
        },
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::Validation { .. }));
}

// ============================================================================
// Measurement email
// ============================================================================

struct FailingMailer;

impl Mailer for FailingMailer {
    fn send(&self, _message: &EmailMessage) -> Result<Option<String>, MailError> {
        Err(MailError::DeliveryFailed(String::from("SMTP refused")))
    }
}

#[test]
fn test_measurement_email_records_delivery() {
    let mut persistence = create_test_persistence();
    let admin = create_admin_actor(&mut persistence);
    let customer = create_test_customer(&mut persistence, &admin);
    let detail = create_test_order(&mut persistence, &admin, customer.customer_id);
    let gate = create_full_gate();

    let measurement = handlers::create_measurement(
        &mut persistence,
        &gate,
        &admin,
        CreateMeasurementRequest {
            order_id: detail.order.order_id,
            width_mm: 4000,
            depth_mm: 3000,
            height_mm: 2500,
            details: None,
        },
    )
    .unwrap();

    let response = handlers::send_measurement_email(
        &mut persistence,
        &gate,
        &admin,
        &NullMailer,
        measurement.measurement_id,
    )
    .unwrap();
    assert_eq!(response.recipient, "jana@example.cz");

    let stored = persistence
        .get_measurement(measurement.measurement_id)
        .unwrap()
        .unwrap();
    assert!(stored.email_sent_at.is_some());
    assert_eq!(stored.email_sent_by, Some(admin.employee_id));
}

#[test]
fn test_measurement_email_transport_failure_keeps_record() {
    let mut persistence = create_test_persistence();
    let admin = create_admin_actor(&mut persistence);
    let customer = create_test_customer(&mut persistence, &admin);
    let detail = create_test_order(&mut persistence, &admin, customer.customer_id);
    let gate = create_full_gate();

    let measurement = handlers::create_measurement(
        &mut persistence,
        &gate,
        &admin,
        CreateMeasurementRequest {
            order_id: detail.order.order_id,
            width_mm: 4000,
            depth_mm: 3000,
            height_mm: 2500,
            details: None,
        },
    )
    .unwrap();

    let err = handlers::send_measurement_email(
        &mut persistence,
        &gate,
        &admin,
        &FailingMailer,
        measurement.measurement_id,
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::MailDelivery { .. }));

    // The measurement survives the failed delivery, unsent.
    let stored = persistence
        .get_measurement(measurement.measurement_id)
        .unwrap()
        .unwrap();
    assert!(stored.email_sent_at.is_none());
}

#[test]
fn test_email_send_survives_failed_tracking_write() {
    let mut persistence = create_test_persistence();
    let admin = create_admin_actor(&mut persistence);
    let customer = create_test_customer(&mut persistence, &admin);
    let detail = create_test_order(&mut persistence, &admin, customer.customer_id);
    let gate = create_full_gate();

    let measurement = handlers::create_measurement(
        &mut persistence,
        &gate,
        &admin,
        CreateMeasurementRequest {
            order_id: detail.order.order_id,
            width_mm: 4000,
            depth_mm: 3000,
            height_mm: 2500,
            details: None,
        },
    )
    .unwrap();

    // An actor whose employee row no longer exists: the tracking update
    // trips the foreign key on email_sent_by, but the customer already
    // has the mail in their inbox.
    let ghost = AuthenticatedEmployee {
        employee_id: 9999,
        personal_number: String::from("9999"),
        full_name: String::from("Ghost Employee"),
        roles: vec![Role::Admin],
    };

    let response = handlers::send_measurement_email(
        &mut persistence,
        &gate,
        &ghost,
        &NullMailer,
        measurement.measurement_id,
    )
    .unwrap();
    assert_eq!(response.recipient, "jana@example.cz");

    let stored = persistence
        .get_measurement(measurement.measurement_id)
        .unwrap()
        .unwrap();
    assert!(stored.email_sent_at.is_none());
}

// ============================================================================
// Service email
// ============================================================================

fn create_test_ticket(
    persistence: &mut Persistence,
    actor: &AuthenticatedEmployee,
    customer_id: i64,
) -> ServiceTicketData {
    handlers::create_ticket(
        persistence,
        &create_full_gate(),
        actor,
        CreateTicketRequest {
            customer_id,
            order_id: None,
            ticket_type: String::from("repair"),
            category: Some(String::from("lamely")),
            priority: String::from("normal"),
            subject: String::from("Lamela se neotáčí"),
            description: None,
        },
    )
    .unwrap()
}

#[test]
fn test_service_email_records_delivery_on_ticket() {
    let mut persistence = create_test_persistence();
    let admin = create_admin_actor(&mut persistence);
    let customer = create_test_customer(&mut persistence, &admin);
    let ticket = create_test_ticket(&mut persistence, &admin, customer.customer_id);
    let gate = create_full_gate();

    let response = handlers::send_ticket_email(
        &mut persistence,
        &gate,
        &admin,
        &NullMailer,
        ticket.ticket_id,
    )
    .unwrap();
    assert_eq!(response.recipient, "jana@example.cz");

    let stored = persistence.get_ticket(ticket.ticket_id).unwrap().unwrap();
    assert!(stored.email_sent_at.is_some());
    assert_eq!(stored.email_sent_by, Some(admin.employee_id));
}

#[test]
fn test_basic_tier_has_no_service_email() {
    let mut persistence = create_test_persistence();
    let admin = create_admin_actor(&mut persistence);
    let customer = create_test_customer(&mut persistence, &admin);
    let ticket = create_test_ticket(&mut persistence, &admin, customer.customer_id);

    let err = handlers::send_ticket_email(
        &mut persistence,
        &create_basic_gate(),
        &admin,
        &NullMailer,
        ticket.ticket_id,
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::FeatureNotAvailable { .. }));

    let stored = persistence.get_ticket(ticket.ticket_id).unwrap().unwrap();
    assert!(stored.email_sent_at.is_none());
}

// ============================================================================
// Employees
// ============================================================================

fn create_employee_request(personal_number: &str, roles: Vec<String>) -> CreateEmployeeRequest {
    CreateEmployeeRequest {
        personal_number: personal_number.to_string(),
        pin: String::from("246813"),
        full_name: format!("Employee {personal_number}"),
        email: None,
        phone: None,
        roles,
    }
}

#[test]
fn test_create_employee_writes_audit_snapshot() {
    let mut persistence = create_test_persistence();
    let admin = create_admin_actor(&mut persistence);
    let gate = create_full_gate();

    let created = handlers::create_employee(
        &mut persistence,
        &gate,
        &admin,
        create_employee_request("2001", vec![String::from("sales")]),
    )
    .unwrap();

    let trail = persistence
        .list_audit_entries_for_entity("Employee", created.employee_id)
        .unwrap();
    assert_eq!(trail.len(), 1);
    assert_eq!(trail[0].action, "EMPLOYEE_CREATED");
    assert!(trail[0].before_json.is_none());
    let after = trail[0].after_json.as_deref().unwrap();
    assert!(after.contains("2001"));
    // The snapshot never carries credential material.
    assert!(!after.contains("pin"));
}

#[test]
fn test_seat_limit_blocks_employee_creation() {
    let mut persistence = create_test_persistence();
    let admin = create_admin_actor(&mut persistence);
    let gate = create_basic_gate();

    for pn in ["2001", "2002"] {
        handlers::create_employee(
            &mut persistence,
            &gate,
            &admin,
            create_employee_request(pn, vec![String::from("sales")]),
        )
        .unwrap();
    }

    // Admin plus two sales reps fills the three basic seats.
    let err = handlers::create_employee(
        &mut persistence,
        &gate,
        &admin,
        create_employee_request("2003", vec![String::from("sales")]),
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::Conflict { .. }));
}

#[test]
fn test_deactivation_frees_a_seat() {
    let mut persistence = create_test_persistence();
    let admin = create_admin_actor(&mut persistence);
    let gate = create_basic_gate();

    let first = handlers::create_employee(
        &mut persistence,
        &gate,
        &admin,
        create_employee_request("2001", vec![String::from("sales")]),
    )
    .unwrap();
    handlers::create_employee(
        &mut persistence,
        &gate,
        &admin,
        create_employee_request("2002", vec![String::from("sales")]),
    )
    .unwrap();

    handlers::deactivate_employee(&mut persistence, &admin, first.employee_id).unwrap();
    handlers::create_employee(
        &mut persistence,
        &gate,
        &admin,
        create_employee_request("2003", vec![String::from("sales")]),
    )
    .unwrap();
}

#[test]
fn test_basic_tier_rejects_manager_role() {
    let mut persistence = create_test_persistence();
    let admin = create_admin_actor(&mut persistence);

    let err = handlers::create_employee(
        &mut persistence,
        &create_basic_gate(),
        &admin,
        create_employee_request("2001", vec![String::from("manager")]),
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::Validation { .. }));
}

#[test]
fn test_self_deactivation_is_a_conflict() {
    let mut persistence = create_test_persistence();
    let admin = create_admin_actor(&mut persistence);

    let err = handlers::deactivate_employee(&mut persistence, &admin, admin.employee_id)
        .unwrap_err();
    assert!(matches!(err, ApiError::Conflict { .. }));
}

#[test]
fn test_non_admin_cannot_manage_employees() {
    let mut persistence = create_test_persistence();
    create_admin_actor(&mut persistence);
    let sales = actor_for(&seed_employee(&mut persistence, "3001", vec![Role::Sales]));

    let err = handlers::create_employee(
        &mut persistence,
        &create_full_gate(),
        &sales,
        create_employee_request("3002", vec![String::from("sales")]),
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized { .. }));
}

// ============================================================================
// Customers
// ============================================================================

#[test]
fn test_b2b_customer_requires_company_name() {
    let mut persistence = create_test_persistence();
    let admin = create_admin_actor(&mut persistence);

    let err = handlers::create_customer(
        &mut persistence,
        &create_full_gate(),
        &admin,
        CustomerRequest {
            customer_type: String::from("B2B"),
            full_name: Some(String::from("Contact Person")),
            email: None,
            phone: None,
            company_name: None,
            ico: None,
            dic: None,
            note: None,
        },
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::Validation { .. }));
}

#[test]
fn test_customer_search_is_case_insensitive() {
    let mut persistence = create_test_persistence();
    let admin = create_admin_actor(&mut persistence);
    let gate = create_full_gate();
    create_test_customer(&mut persistence, &admin);
    handlers::create_customer(
        &mut persistence,
        &gate,
        &admin,
        CustomerRequest {
            customer_type: String::from("B2B"),
            full_name: None,
            email: Some(String::from("info@stavby.cz")),
            phone: None,
            company_name: Some(String::from("Stavby Brno s.r.o.")),
            ico: Some(String::from("12345678")),
            dic: None,
            note: None,
        },
    )
    .unwrap();

    let hits = handlers::list_customers(&mut persistence, &gate, &admin, Some("NOVAK")).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].full_name.as_deref(), Some("Jana Novakova"));

    let hits = handlers::list_customers(&mut persistence, &gate, &admin, Some("stavby")).unwrap();
    assert_eq!(hits.len(), 1);

    let all = handlers::list_customers(&mut persistence, &gate, &admin, None).unwrap();
    assert_eq!(all.len(), 2);
}

// ============================================================================
// Audit listing
// ============================================================================

#[test]
fn test_audit_listing_restricted_to_managers() {
    let mut persistence = create_test_persistence();
    let admin = create_admin_actor(&mut persistence);
    let gate = create_full_gate();
    let sales = actor_for(&seed_employee(&mut persistence, "3001", vec![Role::Sales]));

    handlers::create_employee(
        &mut persistence,
        &gate,
        &admin,
        create_employee_request("2001", vec![String::from("sales")]),
    )
    .unwrap();

    let err = handlers::list_audit_events(&mut persistence, &gate, &sales, 50).unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized { .. }));

    let entries = handlers::list_audit_events(&mut persistence, &gate, &admin, 50).unwrap();
    assert!(!entries.is_empty());
    assert_eq!(entries[0].action, "EMPLOYEE_CREATED");
}
