// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Employee queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::debug;

use crate::data_models::EmployeeData;
use crate::diesel_schema::employees;
use crate::error::PersistenceError;

/// Diesel Queryable struct for employee rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = employees)]
pub(crate) struct EmployeeRow {
    employee_id: i64,
    personal_number: String,
    pin_hash: String,
    full_name: String,
    email: Option<String>,
    phone: Option<String>,
    roles: String,
    is_active: i32,
    created_at: String,
    updated_at: Option<String>,
}

impl From<EmployeeRow> for EmployeeData {
    fn from(row: EmployeeRow) -> Self {
        Self {
            employee_id: row.employee_id,
            personal_number: row.personal_number,
            pin_hash: row.pin_hash,
            full_name: row.full_name,
            email: row.email,
            phone: row.phone,
            roles: row.roles,
            is_active: row.is_active != 0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Retrieves an employee by personal number.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `personal_number` - The four-digit personal number
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if no employee holds that personal number.
pub fn get_employee_by_personal_number(
    conn: &mut SqliteConnection,
    personal_number: &str,
) -> Result<Option<EmployeeData>, PersistenceError> {
    debug!("Looking up employee by personal_number: {}", personal_number);

    let result: Result<EmployeeRow, diesel::result::Error> = employees::table
        .filter(employees::personal_number.eq(personal_number))
        .select(EmployeeRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into())),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Retrieves an employee by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the employee does not exist.
pub fn get_employee_by_id(
    conn: &mut SqliteConnection,
    employee_id: i64,
) -> Result<Option<EmployeeData>, PersistenceError> {
    let result: Result<EmployeeRow, diesel::result::Error> = employees::table
        .filter(employees::employee_id.eq(employee_id))
        .select(EmployeeRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into())),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Lists all employees, ordered by personal number.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_employees(conn: &mut SqliteConnection) -> Result<Vec<EmployeeData>, PersistenceError> {
    let rows: Vec<EmployeeRow> = employees::table
        .order(employees::personal_number.asc())
        .select(EmployeeRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// Verifies a PIN against a stored bcrypt hash.
///
/// # Arguments
///
/// * `pin` - The plain text PIN to verify
/// * `pin_hash` - The stored bcrypt hash
///
/// # Errors
///
/// Returns an error if hash verification itself fails.
pub fn verify_pin(pin: &str, pin_hash: &str) -> Result<bool, PersistenceError> {
    bcrypt::verify(pin, pin_hash).map_err(|e| PersistenceError::HashingFailed(e.to_string()))
}

/// Counts active employees.
///
/// Used by the license-tier seat check when creating or reactivating
/// an employee.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_active_employees(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(employees::table
        .filter(employees::is_active.eq(1))
        .count()
        .get_result(conn)?)
}
