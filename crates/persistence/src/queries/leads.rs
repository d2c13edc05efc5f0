// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Advisor lead queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::debug;

use crate::data_models::LeadData;
use crate::diesel_schema::leads;
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = leads)]
pub(crate) struct LeadRow {
    lead_id: i64,
    source: String,
    status: String,
    full_name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    company: Option<String>,
    recommended_product: Option<String>,
    score_answers: Option<String>,
    customer_note: Option<String>,
    lost_reason: Option<String>,
    lost_note: Option<String>,
    converted_customer_id: Option<i64>,
    converted_by: Option<i64>,
    converted_at: Option<String>,
    created_at: String,
}

impl From<LeadRow> for LeadData {
    fn from(row: LeadRow) -> Self {
        Self {
            lead_id: row.lead_id,
            source: row.source,
            status: row.status,
            full_name: row.full_name,
            email: row.email,
            phone: row.phone,
            company: row.company,
            recommended_product: row.recommended_product,
            score_answers: row.score_answers,
            customer_note: row.customer_note,
            lost_reason: row.lost_reason,
            lost_note: row.lost_note,
            converted_customer_id: row.converted_customer_id,
            converted_by: row.converted_by,
            converted_at: row.converted_at,
            created_at: row.created_at,
        }
    }
}

/// Retrieves a lead by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the lead does not exist.
pub fn get_lead_by_id(
    conn: &mut SqliteConnection,
    lead_id: i64,
) -> Result<Option<LeadData>, PersistenceError> {
    debug!("Looking up lead: {}", lead_id);

    let result: Result<LeadRow, diesel::result::Error> = leads::table
        .filter(leads::lead_id.eq(lead_id))
        .select(LeadRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into())),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Lists leads, newest first, optionally filtered by status.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_leads(
    conn: &mut SqliteConnection,
    status: Option<&str>,
) -> Result<Vec<LeadData>, PersistenceError> {
    let mut query = leads::table.into_boxed();
    if let Some(status) = status {
        query = query.filter(leads::status.eq(status.to_owned()));
    }

    let rows: Vec<LeadRow> = query
        .order(leads::lead_id.desc())
        .select(LeadRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(Into::into).collect())
}
