// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit log appends.
//!
//! The audit log is append-only. Each row snapshots the actor's
//! personal number and name at the time of the action, so entries stay
//! readable after the employee record changes.

use diesel::prelude::*;
use diesel::SqliteConnection;
use futurol_audit::AuditEvent;

use crate::diesel_schema::audit_log;
use crate::error::PersistenceError;

#[derive(Insertable)]
#[diesel(table_name = audit_log)]
struct AuditLogInsert<'a> {
    employee_id: i64,
    personal_number: &'a str,
    full_name: &'a str,
    action: &'a str,
    entity_type: &'a str,
    entity_id: i64,
    before_json: Option<&'a str>,
    after_json: Option<&'a str>,
    created_at: &'a str,
}

/// Appends one audit entry.
///
/// Called inside the transaction of the operation being audited, so an
/// operation and its audit entry commit or roll back together.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_audit_event(
    conn: &mut SqliteConnection,
    event: &AuditEvent,
    now: &str,
) -> Result<(), PersistenceError> {
    diesel::insert_into(audit_log::table)
        .values(AuditLogInsert {
            employee_id: event.actor.employee_id,
            personal_number: &event.actor.personal_number,
            full_name: &event.actor.full_name,
            action: event.action.as_str(),
            entity_type: &event.entity.entity_type,
            entity_id: event.entity.entity_id,
            before_json: event.before.as_deref(),
            after_json: event.after.as_deref(),
            created_at: now,
        })
        .execute(conn)?;
    Ok(())
}
