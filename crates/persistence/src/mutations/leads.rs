// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Lead creation and rejection.
//!
//! Conversion to a customer lives in the `conversion` module.

use diesel::prelude::*;
use diesel::SqliteConnection;
use futurol_domain::{LeadStatus, RejectReason};
use tracing::info;

use crate::data_models::{LeadData, NewLead};
use crate::diesel_schema::leads;
use crate::error::PersistenceError;
use crate::queries;
use crate::sqlite::get_last_insert_rowid;

#[derive(Insertable)]
#[diesel(table_name = leads)]
struct LeadInsert<'a> {
    source: &'a str,
    status: &'a str,
    full_name: Option<&'a str>,
    email: Option<&'a str>,
    phone: Option<&'a str>,
    company: Option<&'a str>,
    recommended_product: Option<&'a str>,
    score_answers: Option<&'a str>,
    customer_note: Option<&'a str>,
    created_at: &'a str,
}

/// Creates a lead in the `new` status.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_lead(
    conn: &mut SqliteConnection,
    new: &NewLead,
    now: &str,
) -> Result<LeadData, PersistenceError> {
    let lead_id = conn.transaction::<_, PersistenceError, _>(|conn| {
        diesel::insert_into(leads::table)
            .values(LeadInsert {
                source: new.source.as_str(),
                status: LeadStatus::New.as_str(),
                full_name: new.full_name.as_deref(),
                email: new.email.as_deref(),
                phone: new.phone.as_deref(),
                company: new.company.as_deref(),
                recommended_product: new.recommended_product.as_deref(),
                score_answers: new.score_answers.as_deref(),
                customer_note: new.customer_note.as_deref(),
                created_at: now,
            })
            .execute(conn)?;
        get_last_insert_rowid(conn)
    })?;

    info!("Created lead {}", lead_id);

    queries::leads::get_lead_by_id(conn, lead_id)?.ok_or(PersistenceError::NotFound {
        entity: "lead",
        id: lead_id,
    })
}

/// Marks a lead as contacted.
///
/// # Errors
///
/// Returns `NotFound` if the lead does not exist, or
/// `LeadAlreadyProcessed` if it is already terminal.
pub fn mark_lead_contacted(
    conn: &mut SqliteConnection,
    lead_id: i64,
) -> Result<(), PersistenceError> {
    let affected = diesel::update(
        leads::table
            .filter(leads::lead_id.eq(lead_id))
            .filter(leads::status.eq(LeadStatus::New.as_str())),
    )
    .set(leads::status.eq(LeadStatus::Contacted.as_str()))
    .execute(conn)?;

    if affected == 0 {
        match queries::leads::get_lead_by_id(conn, lead_id)? {
            Some(_) => Err(PersistenceError::LeadAlreadyProcessed { lead_id }),
            None => Err(PersistenceError::NotFound {
                entity: "lead",
                id: lead_id,
            }),
        }
    } else {
        Ok(())
    }
}

/// Rejects a lead with a reason from the fixed enumeration.
///
/// The status guard runs inside the update itself, so a lead that is
/// already converted or lost can never be rejected twice.
///
/// # Errors
///
/// Returns `NotFound` if the lead does not exist, or
/// `LeadAlreadyProcessed` if it is already terminal.
pub fn reject_lead(
    conn: &mut SqliteConnection,
    lead_id: i64,
    reason: RejectReason,
    note: Option<&str>,
) -> Result<LeadData, PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        let affected = diesel::update(
            leads::table.filter(leads::lead_id.eq(lead_id)).filter(
                leads::status.ne_all(vec![
                    LeadStatus::Converted.as_str(),
                    LeadStatus::Lost.as_str(),
                ]),
            ),
        )
        .set((
            leads::status.eq(LeadStatus::Lost.as_str()),
            leads::lost_reason.eq(Some(reason.as_str())),
            leads::lost_note.eq(note),
        ))
        .execute(conn)?;

        if affected == 0 {
            return match queries::leads::get_lead_by_id(conn, lead_id)? {
                Some(_) => Err(PersistenceError::LeadAlreadyProcessed { lead_id }),
                None => Err(PersistenceError::NotFound {
                    entity: "lead",
                    id: lead_id,
                }),
            };
        }
        Ok(())
    })?;

    info!("Lead {} rejected: {}", lead_id, reason.as_str());

    queries::leads::get_lead_by_id(conn, lead_id)?.ok_or(PersistenceError::NotFound {
        entity: "lead",
        id: lead_id,
    })
}
