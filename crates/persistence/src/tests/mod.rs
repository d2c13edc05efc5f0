// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod conversion_tests;
mod measurement_tests;
mod order_tests;
mod ticket_tests;

use futurol_audit::Actor;
use futurol_domain::{CustomerSource, CustomerType, LeadSource, Priority, Role};

use crate::{
    CustomerData, EmployeeData, NewCustomer, NewEmployee, NewLead, NewOrder, OrderData,
    Persistence,
};

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().unwrap()
}

pub fn create_test_actor(persistence: &mut Persistence) -> Actor {
    let employee = create_test_employee(persistence);
    Actor::new(
        employee.employee_id,
        employee.personal_number,
        employee.full_name,
    )
}

pub fn create_test_employee(persistence: &mut Persistence) -> EmployeeData {
    persistence
        .create_employee(&NewEmployee {
            personal_number: String::from("1001"),
            pin: String::from("123456"),
            full_name: String::from("Test Admin"),
            email: Some(String::from("admin@futurol.example")),
            phone: None,
            roles: vec![Role::Admin],
        })
        .unwrap()
}

pub fn create_test_customer(persistence: &mut Persistence, owner_id: i64) -> CustomerData {
    persistence
        .create_customer(&NewCustomer {
            customer_type: CustomerType::B2C,
            full_name: Some(String::from("Jana Novakova")),
            email: Some(String::from("jana@example.cz")),
            phone: Some(String::from("+420777000111")),
            company_name: None,
            ico: None,
            dic: None,
            source: CustomerSource::Manual,
            note: None,
            owner_id: Some(owner_id),
            origin_lead_id: None,
        })
        .unwrap()
}

pub fn create_test_order(persistence: &mut Persistence, customer_id: i64, owner_id: i64) -> OrderData {
    persistence
        .create_order(&NewOrder {
            customer_id,
            location_id: None,
            product_id: None,
            contact_id: None,
            owner_id,
            priority: Priority::Normal,
            estimated_value_czk: Some(250_000),
            deadline_at: None,
        })
        .unwrap()
}

pub fn create_test_lead(persistence: &mut Persistence) -> crate::LeadData {
    persistence
        .create_lead(&NewLead {
            source: LeadSource::Advisor,
            full_name: Some(String::from("Petr Svoboda")),
            email: Some(String::from("petr@example.cz")),
            phone: None,
            company: None,
            recommended_product: Some(String::from("KLIMO")),
            score_answers: Some(String::from("{\"shading\":\"full\"}")),
            customer_note: None,
        })
        .unwrap()
}
