// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use futurol_domain::OrderStatus;

use crate::tests::{
    create_test_customer, create_test_employee, create_test_order, create_test_persistence,
};
use crate::{NewMeasurement, Persistence, PersistenceError};

fn measurement_input(order_id: i64, employee_id: i64) -> NewMeasurement {
    NewMeasurement {
        order_id,
        employee_id,
        width_mm: 4000,
        depth_mm: 3000,
        height_mm: 2500,
        details: Some(String::from(
            "{\"pergola_type\":\"klimo\",\"lamella_count\":24}",
        )),
    }
}

#[test]
fn test_create_measurement_advances_order_status() {
    let mut persistence: Persistence = create_test_persistence();
    let employee = create_test_employee(&mut persistence);
    let customer = create_test_customer(&mut persistence, employee.employee_id);
    let order = create_test_order(&mut persistence, customer.customer_id, employee.employee_id);

    let measurement = persistence
        .create_measurement(&measurement_input(order.order_id, employee.employee_id))
        .unwrap();
    assert_eq!(measurement.width_mm, 4000);

    let reloaded = persistence.get_order(order.order_id).unwrap().unwrap();
    assert_eq!(reloaded.status, "measurement");

    let history = persistence.list_status_history(order.order_id).unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].from_status.as_deref(), Some("lead"));
    assert_eq!(history[1].to_status, "measurement");
    assert_eq!(history[1].note.as_deref(), Some("measurement recorded"));
}

#[test]
fn test_create_measurement_does_not_regress_later_stage() {
    let mut persistence: Persistence = create_test_persistence();
    let employee = create_test_employee(&mut persistence);
    let customer = create_test_customer(&mut persistence, employee.employee_id);
    let order = create_test_order(&mut persistence, customer.customer_id, employee.employee_id);

    persistence
        .change_order_status(
            order.order_id,
            OrderStatus::Lead,
            OrderStatus::Contract,
            employee.employee_id,
            None,
        )
        .unwrap();

    persistence
        .create_measurement(&measurement_input(order.order_id, employee.employee_id))
        .unwrap();

    // An order already past the measurement stage keeps its status.
    let reloaded = persistence.get_order(order.order_id).unwrap().unwrap();
    assert_eq!(reloaded.status, "contract");
    assert_eq!(
        persistence.list_status_history(order.order_id).unwrap().len(),
        2
    );
}

#[test]
fn test_second_measurement_rejected() {
    let mut persistence: Persistence = create_test_persistence();
    let employee = create_test_employee(&mut persistence);
    let customer = create_test_customer(&mut persistence, employee.employee_id);
    let order = create_test_order(&mut persistence, customer.customer_id, employee.employee_id);

    persistence
        .create_measurement(&measurement_input(order.order_id, employee.employee_id))
        .unwrap();
    let second =
        persistence.create_measurement(&measurement_input(order.order_id, employee.employee_id));

    assert!(matches!(
        second,
        Err(PersistenceError::MeasurementExists { order_id }) if order_id == order.order_id
    ));
}

#[test]
fn test_delete_measurement_reverts_measurement_stage() {
    let mut persistence: Persistence = create_test_persistence();
    let employee = create_test_employee(&mut persistence);
    let customer = create_test_customer(&mut persistence, employee.employee_id);
    let order = create_test_order(&mut persistence, customer.customer_id, employee.employee_id);

    let measurement = persistence
        .create_measurement(&measurement_input(order.order_id, employee.employee_id))
        .unwrap();
    persistence
        .delete_measurement(measurement.measurement_id, employee.employee_id)
        .unwrap();

    let reloaded = persistence.get_order(order.order_id).unwrap().unwrap();
    assert_eq!(reloaded.status, "quote_sent");

    let history = persistence.list_status_history(order.order_id).unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history[2].from_status.as_deref(), Some("measurement"));
    assert_eq!(history[2].to_status, "quote_sent");

    assert!(persistence
        .get_measurement_for_order(order.order_id)
        .unwrap()
        .is_none());
}

#[test]
fn test_delete_measurement_leaves_later_stage_untouched() {
    let mut persistence: Persistence = create_test_persistence();
    let employee = create_test_employee(&mut persistence);
    let customer = create_test_customer(&mut persistence, employee.employee_id);
    let order = create_test_order(&mut persistence, customer.customer_id, employee.employee_id);

    let measurement = persistence
        .create_measurement(&measurement_input(order.order_id, employee.employee_id))
        .unwrap();
    persistence
        .change_order_status(
            order.order_id,
            OrderStatus::Measurement,
            OrderStatus::Production,
            employee.employee_id,
            None,
        )
        .unwrap();

    persistence
        .delete_measurement(measurement.measurement_id, employee.employee_id)
        .unwrap();

    let reloaded = persistence.get_order(order.order_id).unwrap().unwrap();
    assert_eq!(reloaded.status, "production");
}

#[test]
fn test_record_measurement_email() {
    let mut persistence: Persistence = create_test_persistence();
    let employee = create_test_employee(&mut persistence);
    let customer = create_test_customer(&mut persistence, employee.employee_id);
    let order = create_test_order(&mut persistence, customer.customer_id, employee.employee_id);

    let measurement = persistence
        .create_measurement(&measurement_input(order.order_id, employee.employee_id))
        .unwrap();
    assert!(measurement.email_sent_at.is_none());

    persistence
        .record_measurement_email(
            measurement.measurement_id,
            employee.employee_id,
            Some("<msg-1@futurol>"),
        )
        .unwrap();

    let reloaded = persistence
        .get_measurement_for_order(order.order_id)
        .unwrap()
        .unwrap();
    assert!(reloaded.email_sent_at.is_some());
    assert_eq!(reloaded.email_sent_by, Some(employee.employee_id));
    assert_eq!(reloaded.email_message_id.as_deref(), Some("<msg-1@futurol>"));
}
