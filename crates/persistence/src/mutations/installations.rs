// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Installation record mutations.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::info;

use crate::data_models::{InstallationData, NewInstallation};
use crate::diesel_schema::installations;
use crate::error::PersistenceError;
use crate::queries;
use crate::sqlite::get_last_insert_rowid;

#[derive(Insertable)]
#[diesel(table_name = installations)]
struct InstallationInsert<'a> {
    order_id: i64,
    technician_id: Option<i64>,
    scheduled_at: Option<&'a str>,
    checklist: &'a str,
    created_at: &'a str,
}

/// Creates the installation record for an order with an empty checklist.
///
/// # Errors
///
/// Returns `NotFound` if the order does not exist, or
/// `InstallationExists` if the order already has one.
pub fn create_installation(
    conn: &mut SqliteConnection,
    new: &NewInstallation,
    now: &str,
) -> Result<InstallationData, PersistenceError> {
    let installation_id = conn.transaction::<_, PersistenceError, _>(|conn| {
        if queries::orders::get_order_by_id(conn, new.order_id)?.is_none() {
            return Err(PersistenceError::NotFound {
                entity: "order",
                id: new.order_id,
            });
        }
        if queries::installations::get_installation_for_order(conn, new.order_id)?.is_some() {
            return Err(PersistenceError::InstallationExists {
                order_id: new.order_id,
            });
        }

        diesel::insert_into(installations::table)
            .values(InstallationInsert {
                order_id: new.order_id,
                technician_id: new.technician_id,
                scheduled_at: new.scheduled_at.as_deref(),
                checklist: "{}",
                created_at: now,
            })
            .execute(conn)?;
        get_last_insert_rowid(conn)
    })?;

    info!(
        "Created installation {} for order {}",
        installation_id, new.order_id
    );

    queries::installations::get_installation_for_order(conn, new.order_id)?.ok_or(
        PersistenceError::NotFound {
            entity: "installation",
            id: installation_id,
        },
    )
}

/// Updates the working state of an installation record.
///
/// # Errors
///
/// Returns `NotFound` if the installation does not exist.
pub fn update_installation(
    conn: &mut SqliteConnection,
    installation_id: i64,
    technician_id: Option<i64>,
    scheduled_at: Option<&str>,
    checklist: &str,
    work_notes: Option<&str>,
    handover_notes: Option<&str>,
) -> Result<(), PersistenceError> {
    let affected = diesel::update(
        installations::table.filter(installations::installation_id.eq(installation_id)),
    )
    .set((
        installations::technician_id.eq(technician_id),
        installations::scheduled_at.eq(scheduled_at),
        installations::checklist.eq(checklist),
        installations::work_notes.eq(work_notes),
        installations::handover_notes.eq(handover_notes),
    ))
    .execute(conn)?;

    if affected == 0 {
        return Err(PersistenceError::NotFound {
            entity: "installation",
            id: installation_id,
        });
    }
    Ok(())
}

/// Records that the installation handover email was sent.
///
/// # Errors
///
/// Returns `NotFound` if the installation does not exist.
pub fn record_installation_email(
    conn: &mut SqliteConnection,
    installation_id: i64,
    sent_by: i64,
    message_id: Option<&str>,
    now: &str,
) -> Result<(), PersistenceError> {
    let affected = diesel::update(
        installations::table.filter(installations::installation_id.eq(installation_id)),
    )
    .set((
        installations::email_sent_at.eq(Some(now)),
        installations::email_sent_by.eq(Some(sent_by)),
        installations::email_message_id.eq(message_id),
    ))
    .execute(conn)?;

    if affected == 0 {
        return Err(PersistenceError::NotFound {
            entity: "installation",
            id: installation_id,
        });
    }
    Ok(())
}
