// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Service ticket queries.

use diesel::prelude::*;
use diesel::SqliteConnection;

use crate::data_models::ServiceTicketData;
use crate::diesel_schema::service_tickets;
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = service_tickets)]
pub(crate) struct ServiceTicketRow {
    ticket_id: i64,
    customer_id: i64,
    order_id: Option<i64>,
    ticket_type: String,
    category: Option<String>,
    priority: String,
    status: String,
    subject: String,
    description: Option<String>,
    resolution: Option<String>,
    materials_used: Option<String>,
    created_by: i64,
    created_at: String,
    resolved_at: Option<String>,
    email_sent_at: Option<String>,
    email_sent_by: Option<i64>,
    email_message_id: Option<String>,
}

impl From<ServiceTicketRow> for ServiceTicketData {
    fn from(row: ServiceTicketRow) -> Self {
        Self {
            ticket_id: row.ticket_id,
            customer_id: row.customer_id,
            order_id: row.order_id,
            ticket_type: row.ticket_type,
            category: row.category,
            priority: row.priority,
            status: row.status,
            subject: row.subject,
            description: row.description,
            resolution: row.resolution,
            materials_used: row.materials_used,
            created_by: row.created_by,
            created_at: row.created_at,
            resolved_at: row.resolved_at,
            email_sent_at: row.email_sent_at,
            email_sent_by: row.email_sent_by,
            email_message_id: row.email_message_id,
        }
    }
}

/// Retrieves a service ticket by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the ticket does not exist.
pub fn get_ticket_by_id(
    conn: &mut SqliteConnection,
    ticket_id: i64,
) -> Result<Option<ServiceTicketData>, PersistenceError> {
    let result: Result<ServiceTicketRow, diesel::result::Error> = service_tickets::table
        .filter(service_tickets::ticket_id.eq(ticket_id))
        .select(ServiceTicketRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into())),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Lists service tickets, newest first, optionally filtered by status
/// and customer.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_tickets(
    conn: &mut SqliteConnection,
    status: Option<&str>,
    customer_id: Option<i64>,
) -> Result<Vec<ServiceTicketData>, PersistenceError> {
    let mut query = service_tickets::table.into_boxed();
    if let Some(status) = status {
        query = query.filter(service_tickets::status.eq(status.to_owned()));
    }
    if let Some(customer_id) = customer_id {
        query = query.filter(service_tickets::customer_id.eq(customer_id));
    }

    let rows: Vec<ServiceTicketRow> = query
        .order(service_tickets::ticket_id.desc())
        .select(ServiceTicketRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// Counts the service tickets referencing an order.
///
/// Used by the order-deletion guard.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_tickets_for_order(
    conn: &mut SqliteConnection,
    order_id: i64,
) -> Result<i64, PersistenceError> {
    Ok(service_tickets::table
        .filter(service_tickets::order_id.eq(order_id))
        .count()
        .get_result(conn)?)
}
