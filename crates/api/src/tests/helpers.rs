// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use futurol_domain::{Role, Tier};
use futurol_persistence::{CustomerData, EmployeeData, NewEmployee, Persistence};

use crate::auth::AuthenticatedEmployee;
use crate::handlers;
use crate::license::FeatureGate;
use crate::request_response::{CreateOrderRequest, CustomerRequest, OrderDetailResponse};

pub const TEST_SECRET: &str = "test-signing-secret";
pub const TEST_PIN: &str = "135792";

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().unwrap()
}

pub fn create_full_gate() -> FeatureGate {
    FeatureGate::new(Tier::Full)
}

pub fn create_basic_gate() -> FeatureGate {
    FeatureGate::new(Tier::Basic)
}

pub fn seed_employee(
    persistence: &mut Persistence,
    personal_number: &str,
    roles: Vec<Role>,
) -> EmployeeData {
    persistence
        .create_employee(&NewEmployee {
            personal_number: personal_number.to_string(),
            pin: TEST_PIN.to_string(),
            full_name: format!("Employee {personal_number}"),
            email: Some(format!("e{personal_number}@futurol.example")),
            phone: None,
            roles,
        })
        .unwrap()
}

pub fn actor_for(record: &EmployeeData) -> AuthenticatedEmployee {
    AuthenticatedEmployee {
        employee_id: record.employee_id,
        personal_number: record.personal_number.clone(),
        full_name: record.full_name.clone(),
        roles: record.parse_roles().unwrap(),
    }
}

pub fn create_admin_actor(persistence: &mut Persistence) -> AuthenticatedEmployee {
    let record = seed_employee(persistence, "1001", vec![Role::Admin]);
    actor_for(&record)
}

pub fn create_test_customer(
    persistence: &mut Persistence,
    actor: &AuthenticatedEmployee,
) -> CustomerData {
    handlers::create_customer(
        persistence,
        &create_full_gate(),
        actor,
        CustomerRequest {
            customer_type: String::from("B2C"),
            full_name: Some(String::from("Jana Novakova")),
            email: Some(String::from("jana@example.cz")),
            phone: Some(String::from("+420777000111")),
            company_name: None,
            ico: None,
            dic: None,
            note: None,
        },
    )
    .unwrap()
}

pub fn create_test_order(
    persistence: &mut Persistence,
    actor: &AuthenticatedEmployee,
    customer_id: i64,
) -> OrderDetailResponse {
    handlers::create_order(
        persistence,
        &create_full_gate(),
        actor,
        CreateOrderRequest {
            customer_id,
            location_id: None,
            product_id: None,
            contact_id: None,
            priority: String::from("normal"),
            estimated_value_czk: Some(250_000),
            deadline_at: None,
        },
    )
    .unwrap()
}
