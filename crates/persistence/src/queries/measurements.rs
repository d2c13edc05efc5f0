// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Site measurement queries.

use diesel::prelude::*;
use diesel::SqliteConnection;

use crate::data_models::MeasurementData;
use crate::diesel_schema::measurements;
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = measurements)]
pub(crate) struct MeasurementRow {
    measurement_id: i64,
    order_id: i64,
    employee_id: i64,
    width_mm: i32,
    depth_mm: i32,
    height_mm: i32,
    details: Option<String>,
    email_sent_at: Option<String>,
    email_sent_by: Option<i64>,
    email_message_id: Option<String>,
    created_at: String,
}

impl From<MeasurementRow> for MeasurementData {
    fn from(row: MeasurementRow) -> Self {
        Self {
            measurement_id: row.measurement_id,
            order_id: row.order_id,
            employee_id: row.employee_id,
            width_mm: row.width_mm,
            depth_mm: row.depth_mm,
            height_mm: row.height_mm,
            details: row.details,
            email_sent_at: row.email_sent_at,
            email_sent_by: row.email_sent_by,
            email_message_id: row.email_message_id,
            created_at: row.created_at,
        }
    }
}

/// Retrieves the measurement attached to an order, if any.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_measurement_for_order(
    conn: &mut SqliteConnection,
    order_id: i64,
) -> Result<Option<MeasurementData>, PersistenceError> {
    let result: Result<MeasurementRow, diesel::result::Error> = measurements::table
        .filter(measurements::order_id.eq(order_id))
        .select(MeasurementRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into())),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Retrieves a measurement by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the measurement does not exist.
pub fn get_measurement_by_id(
    conn: &mut SqliteConnection,
    measurement_id: i64,
) -> Result<Option<MeasurementData>, PersistenceError> {
    let result: Result<MeasurementRow, diesel::result::Error> = measurements::table
        .filter(measurements::measurement_id.eq(measurement_id))
        .select(MeasurementRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into())),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}
