// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit log queries.

use diesel::prelude::*;
use diesel::SqliteConnection;

use crate::data_models::AuditLogData;
use crate::diesel_schema::audit_log;
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = audit_log)]
struct AuditLogRow {
    audit_id: i64,
    employee_id: i64,
    personal_number: String,
    full_name: String,
    action: String,
    entity_type: String,
    entity_id: i64,
    before_json: Option<String>,
    after_json: Option<String>,
    created_at: String,
}

impl From<AuditLogRow> for AuditLogData {
    fn from(row: AuditLogRow) -> Self {
        Self {
            audit_id: row.audit_id,
            employee_id: row.employee_id,
            personal_number: row.personal_number,
            full_name: row.full_name,
            action: row.action,
            entity_type: row.entity_type,
            entity_id: row.entity_id,
            before_json: row.before_json,
            after_json: row.after_json,
            created_at: row.created_at,
        }
    }
}

/// Lists the most recent audit entries, newest first.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `limit` - Maximum number of entries to return
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_recent_audit_entries(
    conn: &mut SqliteConnection,
    limit: i64,
) -> Result<Vec<AuditLogData>, PersistenceError> {
    let rows: Vec<AuditLogRow> = audit_log::table
        .order(audit_log::audit_id.desc())
        .limit(limit)
        .select(AuditLogRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// Lists the audit trail for one entity, oldest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_audit_entries_for_entity(
    conn: &mut SqliteConnection,
    entity_type: &str,
    entity_id: i64,
) -> Result<Vec<AuditLogData>, PersistenceError> {
    let rows: Vec<AuditLogRow> = audit_log::table
        .filter(audit_log::entity_type.eq(entity_type))
        .filter(audit_log::entity_id.eq(entity_id))
        .order(audit_log::audit_id.asc())
        .select(AuditLogRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(Into::into).collect())
}
