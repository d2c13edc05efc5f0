// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Measurement lifecycle and its order-status side effects.
//!
//! Recording a measurement pulls the order forward to the `measurement`
//! stage when it has not reached it yet. Deleting a measurement reverts
//! the order to `quote_sent`, but only when the order sits exactly at
//! `measurement`; an order that moved on keeps its status and only
//! loses the measurement record.

use diesel::prelude::*;
use diesel::SqliteConnection;
use futurol_domain::OrderStatus;
use tracing::info;

use crate::data_models::{MeasurementData, NewMeasurement};
use crate::diesel_schema::{measurements, orders};
use crate::error::PersistenceError;
use crate::mutations::orders::insert_history_row;
use crate::queries;
use crate::sqlite::get_last_insert_rowid;

#[derive(Insertable)]
#[diesel(table_name = measurements)]
struct MeasurementInsert<'a> {
    order_id: i64,
    employee_id: i64,
    width_mm: i32,
    depth_mm: i32,
    height_mm: i32,
    details: Option<&'a str>,
    created_at: &'a str,
}

fn parse_order_status(raw: &str) -> Result<OrderStatus, PersistenceError> {
    raw.parse()
        .map_err(|_| PersistenceError::Other(format!("corrupt order status: {raw}")))
}

/// Records a measurement on an order.
///
/// If the order has not reached the `measurement` stage yet, its status
/// advances to `measurement` and a history row is appended in the same
/// transaction.
///
/// # Errors
///
/// Returns `NotFound` if the order does not exist, or
/// `MeasurementExists` if the order already has one.
pub fn create_measurement(
    conn: &mut SqliteConnection,
    new: &NewMeasurement,
    now: &str,
) -> Result<MeasurementData, PersistenceError> {
    let measurement_id = conn.transaction::<_, PersistenceError, _>(|conn| {
        let order = queries::orders::get_order_by_id(conn, new.order_id)?.ok_or(
            PersistenceError::NotFound {
                entity: "order",
                id: new.order_id,
            },
        )?;

        if queries::measurements::get_measurement_for_order(conn, new.order_id)?.is_some() {
            return Err(PersistenceError::MeasurementExists {
                order_id: new.order_id,
            });
        }

        diesel::insert_into(measurements::table)
            .values(MeasurementInsert {
                order_id: new.order_id,
                employee_id: new.employee_id,
                width_mm: new.width_mm,
                depth_mm: new.depth_mm,
                height_mm: new.height_mm,
                details: new.details.as_deref(),
                created_at: now,
            })
            .execute(conn)?;
        let measurement_id = get_last_insert_rowid(conn)?;

        let current = parse_order_status(&order.status)?;
        let target = OrderStatus::Measurement;
        let advances = match (current.stage_index(), target.stage_index()) {
            (Some(from), Some(to)) => from < to,
            _ => false,
        };
        if advances {
            diesel::update(orders::table.filter(orders::order_id.eq(new.order_id)))
                .set(orders::status.eq(target.as_str()))
                .execute(conn)?;
            insert_history_row(
                conn,
                new.order_id,
                Some(current.as_str()),
                target.as_str(),
                new.employee_id,
                Some("measurement recorded"),
                now,
            )?;
        }

        info!(
            "Measurement {} recorded for order {}",
            measurement_id, new.order_id
        );
        Ok(measurement_id)
    })?;

    queries::measurements::get_measurement_by_id(conn, measurement_id)?.ok_or(
        PersistenceError::NotFound {
            entity: "measurement",
            id: measurement_id,
        },
    )
}

/// Updates a measurement's dimensions and survey details.
///
/// The owning order's status is not touched; only creation and deletion
/// carry status side effects.
///
/// # Errors
///
/// Returns `NotFound` if the measurement does not exist.
pub fn update_measurement(
    conn: &mut SqliteConnection,
    measurement_id: i64,
    width_mm: i32,
    depth_mm: i32,
    height_mm: i32,
    details: Option<&str>,
) -> Result<MeasurementData, PersistenceError> {
    let affected = diesel::update(
        measurements::table.filter(measurements::measurement_id.eq(measurement_id)),
    )
    .set((
        measurements::width_mm.eq(width_mm),
        measurements::depth_mm.eq(depth_mm),
        measurements::height_mm.eq(height_mm),
        measurements::details.eq(details),
    ))
    .execute(conn)?;

    if affected == 0 {
        return Err(PersistenceError::NotFound {
            entity: "measurement",
            id: measurement_id,
        });
    }

    queries::measurements::get_measurement_by_id(conn, measurement_id)?.ok_or(
        PersistenceError::NotFound {
            entity: "measurement",
            id: measurement_id,
        },
    )
}

/// Deletes a measurement.
///
/// When the owning order sits exactly at the `measurement` stage, the
/// order reverts to `quote_sent` with a history row; any other status
/// is left untouched.
///
/// # Errors
///
/// Returns `NotFound` if the measurement does not exist.
pub fn delete_measurement(
    conn: &mut SqliteConnection,
    measurement_id: i64,
    changed_by: i64,
    now: &str,
) -> Result<(), PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        let measurement = queries::measurements::get_measurement_by_id(conn, measurement_id)?
            .ok_or(PersistenceError::NotFound {
                entity: "measurement",
                id: measurement_id,
            })?;

        diesel::delete(
            measurements::table.filter(measurements::measurement_id.eq(measurement_id)),
        )
        .execute(conn)?;

        let order = queries::orders::get_order_by_id(conn, measurement.order_id)?.ok_or(
            PersistenceError::NotFound {
                entity: "order",
                id: measurement.order_id,
            },
        )?;

        let current = parse_order_status(&order.status)?;
        if current == OrderStatus::Measurement {
            let target = OrderStatus::QuoteSent;
            diesel::update(orders::table.filter(orders::order_id.eq(measurement.order_id)))
                .set(orders::status.eq(target.as_str()))
                .execute(conn)?;
            insert_history_row(
                conn,
                measurement.order_id,
                Some(current.as_str()),
                target.as_str(),
                changed_by,
                Some("measurement deleted"),
                now,
            )?;
        }

        info!(
            "Measurement {} deleted from order {}",
            measurement_id, measurement.order_id
        );
        Ok(())
    })
}

/// Records that the measurement summary email was sent.
///
/// Delivery tracking is best-effort; the measurement itself is already
/// committed by the time this runs.
///
/// # Errors
///
/// Returns `NotFound` if the measurement does not exist.
pub fn record_measurement_email(
    conn: &mut SqliteConnection,
    measurement_id: i64,
    sent_by: i64,
    message_id: Option<&str>,
    now: &str,
) -> Result<(), PersistenceError> {
    let affected = diesel::update(
        measurements::table.filter(measurements::measurement_id.eq(measurement_id)),
    )
    .set((
        measurements::email_sent_at.eq(Some(now)),
        measurements::email_sent_by.eq(Some(sent_by)),
        measurements::email_message_id.eq(message_id),
    ))
    .execute(conn)?;

    if affected == 0 {
        return Err(PersistenceError::NotFound {
            entity: "measurement",
            id: measurement_id,
        });
    }
    Ok(())
}
