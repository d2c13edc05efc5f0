// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Order, status-history and quote queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::debug;

use crate::data_models::{OrderData, QuoteData, StatusHistoryData};
use crate::diesel_schema::{order_status_history, orders, quotes};
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = orders)]
pub(crate) struct OrderRow {
    order_id: i64,
    order_number: String,
    customer_id: i64,
    location_id: Option<i64>,
    product_id: Option<i64>,
    contact_id: Option<i64>,
    owner_id: i64,
    status: String,
    priority: String,
    estimated_value_czk: Option<i64>,
    final_value_czk: Option<i64>,
    deadline_at: Option<String>,
    created_at: String,
}

impl From<OrderRow> for OrderData {
    fn from(row: OrderRow) -> Self {
        Self {
            order_id: row.order_id,
            order_number: row.order_number,
            customer_id: row.customer_id,
            location_id: row.location_id,
            product_id: row.product_id,
            contact_id: row.contact_id,
            owner_id: row.owner_id,
            status: row.status,
            priority: row.priority,
            estimated_value_czk: row.estimated_value_czk,
            final_value_czk: row.final_value_czk,
            deadline_at: row.deadline_at,
            created_at: row.created_at,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = order_status_history)]
struct StatusHistoryRow {
    history_id: i64,
    order_id: i64,
    from_status: Option<String>,
    to_status: String,
    changed_by: i64,
    note: Option<String>,
    created_at: String,
}

impl From<StatusHistoryRow> for StatusHistoryData {
    fn from(row: StatusHistoryRow) -> Self {
        Self {
            history_id: row.history_id,
            order_id: row.order_id,
            from_status: row.from_status,
            to_status: row.to_status,
            changed_by: row.changed_by,
            note: row.note,
            created_at: row.created_at,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = quotes)]
struct QuoteRow {
    quote_id: i64,
    order_id: i64,
    version: i32,
    status: String,
    amount_czk: i64,
    valid_until: Option<String>,
    note: Option<String>,
    created_by: i64,
    created_at: String,
}

impl From<QuoteRow> for QuoteData {
    fn from(row: QuoteRow) -> Self {
        Self {
            quote_id: row.quote_id,
            order_id: row.order_id,
            version: row.version,
            status: row.status,
            amount_czk: row.amount_czk,
            valid_until: row.valid_until,
            note: row.note,
            created_by: row.created_by,
            created_at: row.created_at,
        }
    }
}

/// Retrieves an order by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the order does not exist.
pub fn get_order_by_id(
    conn: &mut SqliteConnection,
    order_id: i64,
) -> Result<Option<OrderData>, PersistenceError> {
    debug!("Looking up order: {}", order_id);

    let result: Result<OrderRow, diesel::result::Error> = orders::table
        .filter(orders::order_id.eq(order_id))
        .select(OrderRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into())),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Lists orders, newest first, optionally filtered by status and customer.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_orders(
    conn: &mut SqliteConnection,
    status: Option<&str>,
    customer_id: Option<i64>,
) -> Result<Vec<OrderData>, PersistenceError> {
    let mut query = orders::table.into_boxed();
    if let Some(status) = status {
        query = query.filter(orders::status.eq(status.to_owned()));
    }
    if let Some(customer_id) = customer_id {
        query = query.filter(orders::customer_id.eq(customer_id));
    }

    let rows: Vec<OrderRow> = query
        .order(orders::order_id.desc())
        .select(OrderRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// Lists the status history of an order, oldest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_status_history(
    conn: &mut SqliteConnection,
    order_id: i64,
) -> Result<Vec<StatusHistoryData>, PersistenceError> {
    let rows: Vec<StatusHistoryRow> = order_status_history::table
        .filter(order_status_history::order_id.eq(order_id))
        .order(order_status_history::history_id.asc())
        .select(StatusHistoryRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// Lists the quotes on an order, oldest version first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_quotes_for_order(
    conn: &mut SqliteConnection,
    order_id: i64,
) -> Result<Vec<QuoteData>, PersistenceError> {
    let rows: Vec<QuoteRow> = quotes::table
        .filter(quotes::order_id.eq(order_id))
        .order(quotes::version.asc())
        .select(QuoteRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// Returns the highest quote version on an order, or `None` if the order
/// has no quotes yet.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn max_quote_version(
    conn: &mut SqliteConnection,
    order_id: i64,
) -> Result<Option<i32>, PersistenceError> {
    Ok(quotes::table
        .filter(quotes::order_id.eq(order_id))
        .select(diesel::dsl::max(quotes::version))
        .first(conn)?)
}

/// Returns the highest existing order number with the given prefix.
///
/// Used inside the order-creation transaction to allocate the next
/// sequential number for the current year.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn max_order_number_with_prefix(
    conn: &mut SqliteConnection,
    prefix: &str,
) -> Result<Option<String>, PersistenceError> {
    Ok(orders::table
        .filter(orders::order_number.like(format!("{prefix}%")))
        .select(diesel::dsl::max(orders::order_number))
        .first(conn)?)
}
