// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Service ticket mutations.

use diesel::prelude::*;
use diesel::SqliteConnection;
use futurol_domain::TicketStatus;
use tracing::info;

use crate::data_models::{NewServiceTicket, ServiceTicketData};
use crate::diesel_schema::service_tickets;
use crate::error::PersistenceError;
use crate::queries;
use crate::sqlite::get_last_insert_rowid;

#[derive(Insertable)]
#[diesel(table_name = service_tickets)]
struct TicketInsert<'a> {
    customer_id: i64,
    order_id: Option<i64>,
    ticket_type: &'a str,
    category: Option<&'a str>,
    priority: &'a str,
    status: &'a str,
    subject: &'a str,
    description: Option<&'a str>,
    created_by: i64,
    created_at: &'a str,
}

/// Opens a service ticket in the `new` status.
///
/// # Errors
///
/// Returns `NotFound` if the customer does not exist, or an error if
/// the insert fails.
pub fn create_ticket(
    conn: &mut SqliteConnection,
    new: &NewServiceTicket,
    now: &str,
) -> Result<ServiceTicketData, PersistenceError> {
    let ticket_id = conn.transaction::<_, PersistenceError, _>(|conn| {
        if queries::customers::get_customer_by_id(conn, new.customer_id)?.is_none() {
            return Err(PersistenceError::NotFound {
                entity: "customer",
                id: new.customer_id,
            });
        }

        diesel::insert_into(service_tickets::table)
            .values(TicketInsert {
                customer_id: new.customer_id,
                order_id: new.order_id,
                ticket_type: new.ticket_type.as_str(),
                category: new.category.as_deref(),
                priority: new.priority.as_str(),
                status: TicketStatus::New.as_str(),
                subject: &new.subject,
                description: new.description.as_deref(),
                created_by: new.created_by,
                created_at: now,
            })
            .execute(conn)?;
        get_last_insert_rowid(conn)
    })?;

    info!(
        "Opened service ticket {} for customer {}",
        ticket_id, new.customer_id
    );

    queries::service::get_ticket_by_id(conn, ticket_id)?.ok_or(PersistenceError::NotFound {
        entity: "service ticket",
        id: ticket_id,
    })
}

/// Records that the service protocol email was sent.
///
/// Delivery tracking is best-effort; the ticket itself is already
/// committed by the time this runs.
///
/// # Errors
///
/// Returns `NotFound` if the ticket does not exist.
pub fn record_ticket_email(
    conn: &mut SqliteConnection,
    ticket_id: i64,
    sent_by: i64,
    message_id: Option<&str>,
    now: &str,
) -> Result<(), PersistenceError> {
    let affected =
        diesel::update(service_tickets::table.filter(service_tickets::ticket_id.eq(ticket_id)))
            .set((
                service_tickets::email_sent_at.eq(Some(now)),
                service_tickets::email_sent_by.eq(Some(sent_by)),
                service_tickets::email_message_id.eq(message_id),
            ))
            .execute(conn)?;

    if affected == 0 {
        return Err(PersistenceError::NotFound {
            entity: "service ticket",
            id: ticket_id,
        });
    }
    Ok(())
}

/// Updates a ticket's workflow state.
///
/// `resolved_at` is stamped when the ticket moves to `resolved` or
/// `closed` and carries no timestamp yet.
///
/// # Errors
///
/// Returns `NotFound` if the ticket does not exist.
pub fn update_ticket(
    conn: &mut SqliteConnection,
    ticket_id: i64,
    status: TicketStatus,
    resolution: Option<&str>,
    materials_used: Option<&str>,
    now: &str,
) -> Result<ServiceTicketData, PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        let existing = queries::service::get_ticket_by_id(conn, ticket_id)?.ok_or(
            PersistenceError::NotFound {
                entity: "service ticket",
                id: ticket_id,
            },
        )?;

        let resolved_at = match status {
            TicketStatus::Resolved | TicketStatus::Closed => {
                Some(existing.resolved_at.unwrap_or_else(|| now.to_owned()))
            }
            TicketStatus::New | TicketStatus::InProgress => None,
        };

        diesel::update(service_tickets::table.filter(service_tickets::ticket_id.eq(ticket_id)))
            .set((
                service_tickets::status.eq(status.as_str()),
                service_tickets::resolution.eq(resolution),
                service_tickets::materials_used.eq(materials_used),
                service_tickets::resolved_at.eq(resolved_at.as_deref()),
            ))
            .execute(conn)?;
        Ok(())
    })?;

    queries::service::get_ticket_by_id(conn, ticket_id)?.ok_or(PersistenceError::NotFound {
        entity: "service ticket",
        id: ticket_id,
    })
}
