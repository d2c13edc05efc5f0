// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Employee mutations.
//!
//! PINs are hashed with bcrypt before they touch the database. The cost
//! factor is fixed so login latency stays predictable on the small
//! deployments this system targets.

use diesel::prelude::*;
use diesel::SqliteConnection;
use futurol_domain::Role;
use tracing::info;

use crate::data_models::{EmployeeData, EmployeeUpdate, NewEmployee};
use crate::diesel_schema::employees;
use crate::error::PersistenceError;
use crate::queries;
use crate::sqlite::get_last_insert_rowid;

/// Bcrypt cost factor for PIN hashes.
pub const PIN_HASH_COST: u32 = 10;

#[derive(Insertable)]
#[diesel(table_name = employees)]
struct EmployeeInsert<'a> {
    personal_number: &'a str,
    pin_hash: &'a str,
    full_name: &'a str,
    email: Option<&'a str>,
    phone: Option<&'a str>,
    roles: &'a str,
    is_active: i32,
    created_at: &'a str,
}

fn serialize_roles(roles: &[Role]) -> Result<String, PersistenceError> {
    let names: Vec<&str> = roles.iter().map(Role::as_str).collect();
    Ok(serde_json::to_string(&names)?)
}

/// Hashes a PIN with the fixed bcrypt cost.
///
/// # Errors
///
/// Returns an error if bcrypt fails.
pub fn hash_pin(pin: &str) -> Result<String, PersistenceError> {
    bcrypt::hash(pin, PIN_HASH_COST).map_err(|e| PersistenceError::HashingFailed(e.to_string()))
}

/// Creates an employee.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `new` - The employee input; the PIN is hashed here
/// * `now` - Creation timestamp
///
/// # Errors
///
/// Returns `PersonalNumberTaken` if the personal number is already in
/// use, or an error if hashing or the insert fails.
pub fn create_employee(
    conn: &mut SqliteConnection,
    new: &NewEmployee,
    now: &str,
) -> Result<EmployeeData, PersistenceError> {
    if queries::employees::get_employee_by_personal_number(conn, &new.personal_number)?.is_some() {
        return Err(PersistenceError::PersonalNumberTaken(
            new.personal_number.clone(),
        ));
    }

    let pin_hash = hash_pin(&new.pin)?;
    let roles_json = serialize_roles(&new.roles)?;

    let employee_id = conn.transaction::<_, PersistenceError, _>(|conn| {
        diesel::insert_into(employees::table)
            .values(EmployeeInsert {
                personal_number: &new.personal_number,
                pin_hash: &pin_hash,
                full_name: &new.full_name,
                email: new.email.as_deref(),
                phone: new.phone.as_deref(),
                roles: &roles_json,
                is_active: 1,
                created_at: now,
            })
            .execute(conn)?;
        get_last_insert_rowid(conn)
    })?;

    info!(
        "Created employee {} ({})",
        new.personal_number, employee_id
    );

    queries::employees::get_employee_by_id(conn, employee_id)?.ok_or(PersistenceError::NotFound {
        entity: "employee",
        id: employee_id,
    })
}

/// Applies a partial update to an employee.
///
/// # Errors
///
/// Returns `NotFound` if the employee does not exist, or an error if
/// the update fails.
pub fn update_employee(
    conn: &mut SqliteConnection,
    employee_id: i64,
    update: &EmployeeUpdate,
    now: &str,
) -> Result<EmployeeData, PersistenceError> {
    let existing =
        queries::employees::get_employee_by_id(conn, employee_id)?.ok_or(
            PersistenceError::NotFound {
                entity: "employee",
                id: employee_id,
            },
        )?;

    let full_name = update.full_name.clone().unwrap_or(existing.full_name);
    let email = update.email.clone().or(existing.email);
    let phone = update.phone.clone().or(existing.phone);
    let roles_json = match &update.roles {
        Some(roles) => serialize_roles(roles)?,
        None => existing.roles,
    };

    diesel::update(employees::table.filter(employees::employee_id.eq(employee_id)))
        .set((
            employees::full_name.eq(&full_name),
            employees::email.eq(email.as_deref()),
            employees::phone.eq(phone.as_deref()),
            employees::roles.eq(&roles_json),
            employees::updated_at.eq(Some(now)),
        ))
        .execute(conn)?;

    queries::employees::get_employee_by_id(conn, employee_id)?.ok_or(PersistenceError::NotFound {
        entity: "employee",
        id: employee_id,
    })
}

/// Activates or deactivates an employee.
///
/// Deactivation is the only removal path; employee rows are referenced
/// from orders and the audit log and are never deleted.
///
/// # Errors
///
/// Returns `NotFound` if the employee does not exist.
pub fn set_employee_active(
    conn: &mut SqliteConnection,
    employee_id: i64,
    active: bool,
    now: &str,
) -> Result<(), PersistenceError> {
    let affected =
        diesel::update(employees::table.filter(employees::employee_id.eq(employee_id)))
            .set((
                employees::is_active.eq(i32::from(active)),
                employees::updated_at.eq(Some(now)),
            ))
            .execute(conn)?;

    if affected == 0 {
        return Err(PersistenceError::NotFound {
            entity: "employee",
            id: employee_id,
        });
    }
    Ok(())
}

/// Replaces an employee's PIN hash.
///
/// # Errors
///
/// Returns `NotFound` if the employee does not exist, or an error if
/// hashing fails.
pub fn change_pin(
    conn: &mut SqliteConnection,
    employee_id: i64,
    new_pin: &str,
    now: &str,
) -> Result<(), PersistenceError> {
    let pin_hash = hash_pin(new_pin)?;

    let affected =
        diesel::update(employees::table.filter(employees::employee_id.eq(employee_id)))
            .set((
                employees::pin_hash.eq(&pin_hash),
                employees::updated_at.eq(Some(now)),
            ))
            .execute(conn)?;

    if affected == 0 {
        return Err(PersistenceError::NotFound {
            entity: "employee",
            id: employee_id,
        });
    }

    info!("PIN changed for employee {}", employee_id);
    Ok(())
}
