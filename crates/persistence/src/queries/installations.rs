// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Installation record queries.

use diesel::prelude::*;
use diesel::SqliteConnection;

use crate::data_models::InstallationData;
use crate::diesel_schema::installations;
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = installations)]
pub(crate) struct InstallationRow {
    installation_id: i64,
    order_id: i64,
    technician_id: Option<i64>,
    scheduled_at: Option<String>,
    checklist: String,
    work_notes: Option<String>,
    handover_notes: Option<String>,
    email_sent_at: Option<String>,
    email_sent_by: Option<i64>,
    email_message_id: Option<String>,
    created_at: String,
}

impl From<InstallationRow> for InstallationData {
    fn from(row: InstallationRow) -> Self {
        Self {
            installation_id: row.installation_id,
            order_id: row.order_id,
            technician_id: row.technician_id,
            scheduled_at: row.scheduled_at,
            checklist: row.checklist,
            work_notes: row.work_notes,
            handover_notes: row.handover_notes,
            email_sent_at: row.email_sent_at,
            email_sent_by: row.email_sent_by,
            email_message_id: row.email_message_id,
            created_at: row.created_at,
        }
    }
}

/// Retrieves an installation record by ID, if any.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_installation_by_id(
    conn: &mut SqliteConnection,
    installation_id: i64,
) -> Result<Option<InstallationData>, PersistenceError> {
    let result: Result<InstallationRow, diesel::result::Error> = installations::table
        .find(installation_id)
        .select(InstallationRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into())),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Retrieves the installation record attached to an order, if any.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_installation_for_order(
    conn: &mut SqliteConnection,
    order_id: i64,
) -> Result<Option<InstallationData>, PersistenceError> {
    let result: Result<InstallationRow, diesel::result::Error> = installations::table
        .filter(installations::order_id.eq(order_id))
        .select(InstallationRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into())),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}
