// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use futurol_domain::{Priority, TicketStatus, TicketType};

use crate::tests::{create_test_customer, create_test_employee, create_test_persistence};
use crate::{NewServiceTicket, Persistence, PersistenceError};

fn ticket_input(customer_id: i64, created_by: i64) -> NewServiceTicket {
    NewServiceTicket {
        customer_id,
        order_id: None,
        ticket_type: TicketType::Repair,
        category: Some(String::from("motor")),
        priority: Priority::Normal,
        subject: String::from("Motor does not respond"),
        description: Some(String::from("Remote pairing lost after power outage")),
        created_by,
    }
}

#[test]
fn test_ticket_opens_in_new_status() {
    let mut persistence: Persistence = create_test_persistence();
    let employee = create_test_employee(&mut persistence);
    let customer = create_test_customer(&mut persistence, employee.employee_id);

    let ticket = persistence
        .create_ticket(&ticket_input(customer.customer_id, employee.employee_id))
        .unwrap();

    assert_eq!(ticket.status, "new");
    assert_eq!(ticket.ticket_type, "repair");
    assert!(ticket.resolved_at.is_none());
}

#[test]
fn test_ticket_for_missing_customer_rejected() {
    let mut persistence: Persistence = create_test_persistence();
    let employee = create_test_employee(&mut persistence);

    let result = persistence.create_ticket(&ticket_input(99, employee.employee_id));
    assert!(matches!(
        result,
        Err(PersistenceError::NotFound { entity: "customer", id: 99 })
    ));
}

#[test]
fn test_resolving_ticket_stamps_resolved_at() {
    let mut persistence: Persistence = create_test_persistence();
    let employee = create_test_employee(&mut persistence);
    let customer = create_test_customer(&mut persistence, employee.employee_id);
    let ticket = persistence
        .create_ticket(&ticket_input(customer.customer_id, employee.employee_id))
        .unwrap();

    let in_progress = persistence
        .update_ticket(ticket.ticket_id, TicketStatus::InProgress, None, None)
        .unwrap();
    assert!(in_progress.resolved_at.is_none());

    let resolved = persistence
        .update_ticket(
            ticket.ticket_id,
            TicketStatus::Resolved,
            Some("Motor re-paired"),
            Some("[\"remote RX-2\"]"),
        )
        .unwrap();
    assert_eq!(resolved.status, "resolved");
    assert_eq!(resolved.resolution.as_deref(), Some("Motor re-paired"));
    assert!(resolved.resolved_at.is_some());

    // Closing later keeps the original resolution timestamp.
    let stamp = resolved.resolved_at.clone();
    let closed = persistence
        .update_ticket(
            ticket.ticket_id,
            TicketStatus::Closed,
            Some("Motor re-paired"),
            None,
        )
        .unwrap();
    assert_eq!(closed.resolved_at, stamp);
}

#[test]
fn test_record_ticket_email() {
    let mut persistence: Persistence = create_test_persistence();
    let employee = create_test_employee(&mut persistence);
    let customer = create_test_customer(&mut persistence, employee.employee_id);
    let ticket = persistence
        .create_ticket(&ticket_input(customer.customer_id, employee.employee_id))
        .unwrap();
    assert!(ticket.email_sent_at.is_none());

    persistence
        .record_ticket_email(
            ticket.ticket_id,
            employee.employee_id,
            Some("<svc-1@futurol>"),
        )
        .unwrap();

    let reloaded = persistence.get_ticket(ticket.ticket_id).unwrap().unwrap();
    assert!(reloaded.email_sent_at.is_some());
    assert_eq!(reloaded.email_sent_by, Some(employee.employee_id));
    assert_eq!(reloaded.email_message_id.as_deref(), Some("<svc-1@futurol>"));
}

#[test]
fn test_list_tickets_filters_by_status() {
    let mut persistence: Persistence = create_test_persistence();
    let employee = create_test_employee(&mut persistence);
    let customer = create_test_customer(&mut persistence, employee.employee_id);

    let first = persistence
        .create_ticket(&ticket_input(customer.customer_id, employee.employee_id))
        .unwrap();
    persistence
        .create_ticket(&ticket_input(customer.customer_id, employee.employee_id))
        .unwrap();
    persistence
        .update_ticket(first.ticket_id, TicketStatus::Resolved, Some("done"), None)
        .unwrap();

    let open = persistence.list_tickets(Some("new"), None).unwrap();
    assert_eq!(open.len(), 1);

    let all = persistence
        .list_tickets(None, Some(customer.customer_id))
        .unwrap();
    assert_eq!(all.len(), 2);
}
