// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Order creation, status transitions, deletion and quotes.
//!
//! An order's status column and its `order_status_history` rows are
//! written in the same transaction. The history is the source of truth
//! for how an order moved through the pipeline; a status value without
//! a matching history row would be unexplainable, so the two can never
//! be committed separately.

use diesel::prelude::*;
use diesel::SqliteConnection;
use futurol_domain::{OrderStatus, QuoteStatus};
use tracing::info;

use crate::data_models::{NewOrder, NewQuote, OrderData, QuoteData};
use crate::diesel_schema::{installations, measurements, order_status_history, orders, quotes};
use crate::error::PersistenceError;
use crate::queries;
use crate::sqlite::get_last_insert_rowid;

/// Order number prefix; numbers look like `FUT-2026-0001`.
pub const ORDER_NUMBER_PREFIX: &str = "FUT";

#[derive(Insertable)]
#[diesel(table_name = orders)]
struct OrderInsert<'a> {
    order_number: &'a str,
    customer_id: i64,
    location_id: Option<i64>,
    product_id: Option<i64>,
    contact_id: Option<i64>,
    owner_id: i64,
    status: &'a str,
    priority: &'a str,
    estimated_value_czk: Option<i64>,
    deadline_at: Option<&'a str>,
    created_at: &'a str,
}

#[derive(Insertable)]
#[diesel(table_name = order_status_history)]
struct HistoryInsert<'a> {
    order_id: i64,
    from_status: Option<&'a str>,
    to_status: &'a str,
    changed_by: i64,
    note: Option<&'a str>,
    created_at: &'a str,
}

/// Appends one status-history row. Must run inside the transaction
/// that changes the order's status.
pub(crate) fn insert_history_row(
    conn: &mut SqliteConnection,
    order_id: i64,
    from_status: Option<&str>,
    to_status: &str,
    changed_by: i64,
    note: Option<&str>,
    now: &str,
) -> Result<(), PersistenceError> {
    diesel::insert_into(order_status_history::table)
        .values(HistoryInsert {
            order_id,
            from_status,
            to_status,
            changed_by,
            note,
            created_at: now,
        })
        .execute(conn)?;
    Ok(())
}

/// Allocates the next sequential order number for the given year.
fn next_order_number(conn: &mut SqliteConnection, year: i32) -> Result<String, PersistenceError> {
    let prefix = format!("{ORDER_NUMBER_PREFIX}-{year}-");
    let highest = queries::orders::max_order_number_with_prefix(conn, &prefix)?;

    let next = match highest {
        Some(number) => {
            let suffix = number.strip_prefix(&prefix).unwrap_or("");
            let current: u32 = suffix
                .parse()
                .map_err(|_| PersistenceError::Other(format!("corrupt order number: {number}")))?;
            current + 1
        }
        None => 1,
    };

    Ok(format!("{prefix}{next:04}"))
}

/// Creates an order in the initial `lead` status.
///
/// The order number is allocated, the order row inserted and the
/// opening history row (`NULL -> lead`) appended in one transaction.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `new` - The order input
/// * `year` - Calendar year used in the order number
/// * `now` - Creation timestamp
///
/// # Errors
///
/// Returns an error if number allocation or either insert fails.
pub fn create_order(
    conn: &mut SqliteConnection,
    new: &NewOrder,
    year: i32,
    now: &str,
) -> Result<OrderData, PersistenceError> {
    let order_id = conn.transaction::<_, PersistenceError, _>(|conn| {
        let order_number = next_order_number(conn, year)?;
        let initial = OrderStatus::initial();

        diesel::insert_into(orders::table)
            .values(OrderInsert {
                order_number: &order_number,
                customer_id: new.customer_id,
                location_id: new.location_id,
                product_id: new.product_id,
                contact_id: new.contact_id,
                owner_id: new.owner_id,
                status: initial.as_str(),
                priority: new.priority.as_str(),
                estimated_value_czk: new.estimated_value_czk,
                deadline_at: new.deadline_at.as_deref(),
                created_at: now,
            })
            .execute(conn)?;
        let order_id = get_last_insert_rowid(conn)?;

        insert_history_row(
            conn,
            order_id,
            None,
            initial.as_str(),
            new.owner_id,
            None,
            now,
        )?;

        info!("Created order {} ({})", order_number, order_id);
        Ok(order_id)
    })?;

    queries::orders::get_order_by_id(conn, order_id)?.ok_or(PersistenceError::NotFound {
        entity: "order",
        id: order_id,
    })
}

/// Moves an order to a new status and appends the matching history row.
///
/// The caller validates the transition against the pipeline rules; this
/// function guards the update on the expected current status so the
/// history row always matches what was actually replaced.
///
/// # Errors
///
/// Returns `NotFound` if the order does not exist, or an error if the
/// order's status no longer matches `from`.
pub fn persist_status_change(
    conn: &mut SqliteConnection,
    order_id: i64,
    from: OrderStatus,
    to: OrderStatus,
    changed_by: i64,
    note: Option<&str>,
    now: &str,
) -> Result<OrderData, PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        let affected = diesel::update(
            orders::table
                .filter(orders::order_id.eq(order_id))
                .filter(orders::status.eq(from.as_str())),
        )
        .set(orders::status.eq(to.as_str()))
        .execute(conn)?;

        if affected == 0 {
            return match queries::orders::get_order_by_id(conn, order_id)? {
                Some(order) => Err(PersistenceError::Other(format!(
                    "order {} is '{}', expected '{}'",
                    order_id,
                    order.status,
                    from.as_str()
                ))),
                None => Err(PersistenceError::NotFound {
                    entity: "order",
                    id: order_id,
                }),
            };
        }

        insert_history_row(
            conn,
            order_id,
            Some(from.as_str()),
            to.as_str(),
            changed_by,
            note,
            now,
        )?;
        Ok(())
    })?;

    info!(
        "Order {} moved {} -> {}",
        order_id,
        from.as_str(),
        to.as_str()
    );

    queries::orders::get_order_by_id(conn, order_id)?.ok_or(PersistenceError::NotFound {
        entity: "order",
        id: order_id,
    })
}

/// Deletes an order and its dependent rows.
///
/// Orders with a measurement or with service tickets cannot be deleted;
/// those records carry operational history that must be removed first.
///
/// # Errors
///
/// Returns `NotFound` if the order does not exist, `OrderHasMeasurement`
/// or `OrderHasServiceTickets` if a guard trips.
pub fn delete_order(conn: &mut SqliteConnection, order_id: i64) -> Result<(), PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        if queries::orders::get_order_by_id(conn, order_id)?.is_none() {
            return Err(PersistenceError::NotFound {
                entity: "order",
                id: order_id,
            });
        }

        let measurement_count: i64 = measurements::table
            .filter(measurements::order_id.eq(order_id))
            .count()
            .get_result(conn)?;
        if measurement_count > 0 {
            return Err(PersistenceError::OrderHasMeasurement { order_id });
        }

        let ticket_count: i64 = queries::service::count_tickets_for_order(conn, order_id)?;
        if ticket_count > 0 {
            return Err(PersistenceError::OrderHasServiceTickets { order_id });
        }

        diesel::delete(installations::table.filter(installations::order_id.eq(order_id)))
            .execute(conn)?;
        diesel::delete(quotes::table.filter(quotes::order_id.eq(order_id))).execute(conn)?;
        diesel::delete(
            order_status_history::table.filter(order_status_history::order_id.eq(order_id)),
        )
        .execute(conn)?;
        diesel::delete(orders::table.filter(orders::order_id.eq(order_id))).execute(conn)?;

        info!("Deleted order {}", order_id);
        Ok(())
    })
}

#[derive(Insertable)]
#[diesel(table_name = quotes)]
struct QuoteInsert<'a> {
    order_id: i64,
    version: i32,
    status: &'a str,
    amount_czk: i64,
    valid_until: Option<&'a str>,
    note: Option<&'a str>,
    created_by: i64,
    created_at: &'a str,
}

/// Creates the next quote version on an order.
///
/// Versions are sequential per order, starting at 1. Allocation happens
/// inside the transaction so two quotes can never share a version.
///
/// # Errors
///
/// Returns `NotFound` if the order does not exist, or an error if the
/// insert fails.
pub fn create_quote(
    conn: &mut SqliteConnection,
    new: &NewQuote,
    now: &str,
) -> Result<QuoteData, PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        if queries::orders::get_order_by_id(conn, new.order_id)?.is_none() {
            return Err(PersistenceError::NotFound {
                entity: "order",
                id: new.order_id,
            });
        }

        let version = queries::orders::max_quote_version(conn, new.order_id)?.unwrap_or(0) + 1;

        diesel::insert_into(quotes::table)
            .values(QuoteInsert {
                order_id: new.order_id,
                version,
                status: QuoteStatus::Draft.as_str(),
                amount_czk: new.amount_czk,
                valid_until: new.valid_until.as_deref(),
                note: new.note.as_deref(),
                created_by: new.created_by,
                created_at: now,
            })
            .execute(conn)?;
        let quote_id = get_last_insert_rowid(conn)?;

        info!("Created quote v{} for order {}", version, new.order_id);

        Ok(QuoteData {
            quote_id,
            order_id: new.order_id,
            version,
            status: QuoteStatus::Draft.as_str().to_owned(),
            amount_czk: new.amount_czk,
            valid_until: new.valid_until.clone(),
            note: new.note.clone(),
            created_by: new.created_by,
            created_at: now.to_owned(),
        })
    })
}

/// Updates the status of a quote (`draft`, `sent`, `approved`).
///
/// # Errors
///
/// Returns `NotFound` if the quote does not exist.
pub fn update_quote_status(
    conn: &mut SqliteConnection,
    quote_id: i64,
    status: &str,
) -> Result<(), PersistenceError> {
    let affected = diesel::update(quotes::table.filter(quotes::quote_id.eq(quote_id)))
        .set(quotes::status.eq(status))
        .execute(conn)?;

    if affected == 0 {
        return Err(PersistenceError::NotFound {
            entity: "quote",
            id: quote_id,
        });
    }
    Ok(())
}

/// Records the final contract value on an order.
///
/// # Errors
///
/// Returns `NotFound` if the order does not exist.
pub fn set_final_value(
    conn: &mut SqliteConnection,
    order_id: i64,
    final_value_czk: i64,
) -> Result<(), PersistenceError> {
    let affected = diesel::update(orders::table.filter(orders::order_id.eq(order_id)))
        .set(orders::final_value_czk.eq(Some(final_value_czk)))
        .execute(conn)?;

    if affected == 0 {
        return Err(PersistenceError::NotFound {
            entity: "order",
            id: order_id,
        });
    }
    Ok(())
}
