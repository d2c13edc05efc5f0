// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use futurol_domain::{OrderStatus, Priority, TicketType};
use time::OffsetDateTime;

use crate::tests::{
    create_test_customer, create_test_employee, create_test_order, create_test_persistence,
};
use crate::{NewMeasurement, NewServiceTicket, Persistence, PersistenceError};

#[test]
fn test_create_order_allocates_number_and_opening_history() {
    let mut persistence: Persistence = create_test_persistence();
    let employee = create_test_employee(&mut persistence);
    let customer = create_test_customer(&mut persistence, employee.employee_id);

    let order = create_test_order(&mut persistence, customer.customer_id, employee.employee_id);

    let year = OffsetDateTime::now_utc().year();
    assert_eq!(order.order_number, format!("FUT-{year}-0001"));
    assert_eq!(order.status, "lead");

    let history = persistence.list_status_history(order.order_id).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].from_status, None);
    assert_eq!(history[0].to_status, "lead");
    assert_eq!(history[0].changed_by, employee.employee_id);
}

#[test]
fn test_order_numbers_are_sequential() {
    let mut persistence: Persistence = create_test_persistence();
    let employee = create_test_employee(&mut persistence);
    let customer = create_test_customer(&mut persistence, employee.employee_id);

    let first = create_test_order(&mut persistence, customer.customer_id, employee.employee_id);
    let second = create_test_order(&mut persistence, customer.customer_id, employee.employee_id);

    let year = OffsetDateTime::now_utc().year();
    assert_eq!(first.order_number, format!("FUT-{year}-0001"));
    assert_eq!(second.order_number, format!("FUT-{year}-0002"));
}

#[test]
fn test_status_change_updates_order_and_appends_history() {
    let mut persistence: Persistence = create_test_persistence();
    let employee = create_test_employee(&mut persistence);
    let customer = create_test_customer(&mut persistence, employee.employee_id);
    let order = create_test_order(&mut persistence, customer.customer_id, employee.employee_id);

    let updated = persistence
        .change_order_status(
            order.order_id,
            OrderStatus::Lead,
            OrderStatus::QuoteSent,
            employee.employee_id,
            Some("quote emailed"),
        )
        .unwrap();

    assert_eq!(updated.status, "quote_sent");

    let history = persistence.list_status_history(order.order_id).unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].from_status.as_deref(), Some("lead"));
    assert_eq!(history[1].to_status, "quote_sent");
    assert_eq!(history[1].note.as_deref(), Some("quote emailed"));
}

#[test]
fn test_status_change_with_stale_from_fails() {
    let mut persistence: Persistence = create_test_persistence();
    let employee = create_test_employee(&mut persistence);
    let customer = create_test_customer(&mut persistence, employee.employee_id);
    let order = create_test_order(&mut persistence, customer.customer_id, employee.employee_id);

    // The order is at `lead`, so a change claiming `contract` must fail
    // and leave no history row behind.
    let result = persistence.change_order_status(
        order.order_id,
        OrderStatus::Contract,
        OrderStatus::Production,
        employee.employee_id,
        None,
    );
    assert!(result.is_err());

    let history = persistence.list_status_history(order.order_id).unwrap();
    assert_eq!(history.len(), 1);
}

#[test]
fn test_delete_order_removes_history() {
    let mut persistence: Persistence = create_test_persistence();
    let employee = create_test_employee(&mut persistence);
    let customer = create_test_customer(&mut persistence, employee.employee_id);
    let order = create_test_order(&mut persistence, customer.customer_id, employee.employee_id);

    persistence.delete_order(order.order_id).unwrap();

    assert!(persistence.get_order(order.order_id).unwrap().is_none());
    assert!(persistence
        .list_status_history(order.order_id)
        .unwrap()
        .is_empty());
}

#[test]
fn test_delete_order_blocked_by_measurement() {
    let mut persistence: Persistence = create_test_persistence();
    let employee = create_test_employee(&mut persistence);
    let customer = create_test_customer(&mut persistence, employee.employee_id);
    let order = create_test_order(&mut persistence, customer.customer_id, employee.employee_id);

    persistence
        .create_measurement(&NewMeasurement {
            order_id: order.order_id,
            employee_id: employee.employee_id,
            width_mm: 4000,
            depth_mm: 3000,
            height_mm: 2500,
            details: None,
        })
        .unwrap();

    let result = persistence.delete_order(order.order_id);
    assert!(matches!(
        result,
        Err(PersistenceError::OrderHasMeasurement { order_id }) if order_id == order.order_id
    ));
    assert!(persistence.get_order(order.order_id).unwrap().is_some());
}

#[test]
fn test_delete_order_blocked_by_service_tickets() {
    let mut persistence: Persistence = create_test_persistence();
    let employee = create_test_employee(&mut persistence);
    let customer = create_test_customer(&mut persistence, employee.employee_id);
    let order = create_test_order(&mut persistence, customer.customer_id, employee.employee_id);

    persistence
        .create_ticket(&NewServiceTicket {
            customer_id: customer.customer_id,
            order_id: Some(order.order_id),
            ticket_type: TicketType::Claim,
            category: Some(String::from("lamella")),
            priority: Priority::High,
            subject: String::from("Lamella stuck"),
            description: None,
            created_by: employee.employee_id,
        })
        .unwrap();

    let result = persistence.delete_order(order.order_id);
    assert!(matches!(
        result,
        Err(PersistenceError::OrderHasServiceTickets { order_id }) if order_id == order.order_id
    ));
}

#[test]
fn test_list_orders_filters() {
    let mut persistence: Persistence = create_test_persistence();
    let employee = create_test_employee(&mut persistence);
    let customer = create_test_customer(&mut persistence, employee.employee_id);
    let order = create_test_order(&mut persistence, customer.customer_id, employee.employee_id);
    create_test_order(&mut persistence, customer.customer_id, employee.employee_id);

    persistence
        .change_order_status(
            order.order_id,
            OrderStatus::Lead,
            OrderStatus::QuoteSent,
            employee.employee_id,
            None,
        )
        .unwrap();

    let quoted = persistence.list_orders(Some("quote_sent"), None).unwrap();
    assert_eq!(quoted.len(), 1);
    assert_eq!(quoted[0].order_id, order.order_id);

    let all_for_customer = persistence
        .list_orders(None, Some(customer.customer_id))
        .unwrap();
    assert_eq!(all_for_customer.len(), 2);
}
