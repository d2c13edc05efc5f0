// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Customer, contact and site-location queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::debug;

use crate::data_models::{ContactData, CustomerData, LocationData};
use crate::diesel_schema::{contacts, customers, locations};
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = customers)]
pub(crate) struct CustomerRow {
    customer_id: i64,
    customer_type: String,
    full_name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    company_name: Option<String>,
    ico: Option<String>,
    dic: Option<String>,
    source: String,
    note: Option<String>,
    owner_id: Option<i64>,
    origin_lead_id: Option<i64>,
    created_at: String,
}

impl From<CustomerRow> for CustomerData {
    fn from(row: CustomerRow) -> Self {
        Self {
            customer_id: row.customer_id,
            customer_type: row.customer_type,
            full_name: row.full_name,
            email: row.email,
            phone: row.phone,
            company_name: row.company_name,
            ico: row.ico,
            dic: row.dic,
            source: row.source,
            note: row.note,
            owner_id: row.owner_id,
            origin_lead_id: row.origin_lead_id,
            created_at: row.created_at,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = contacts)]
struct ContactRow {
    contact_id: i64,
    customer_id: i64,
    full_name: String,
    email: Option<String>,
    phone: Option<String>,
    position: Option<String>,
}

impl From<ContactRow> for ContactData {
    fn from(row: ContactRow) -> Self {
        Self {
            contact_id: row.contact_id,
            customer_id: row.customer_id,
            full_name: row.full_name,
            email: row.email,
            phone: row.phone,
            position: row.position,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = locations)]
struct LocationRow {
    location_id: i64,
    customer_id: i64,
    street: String,
    city: String,
    zip: String,
    note: Option<String>,
}

impl From<LocationRow> for LocationData {
    fn from(row: LocationRow) -> Self {
        Self {
            location_id: row.location_id,
            customer_id: row.customer_id,
            street: row.street,
            city: row.city,
            zip: row.zip,
            note: row.note,
        }
    }
}

/// Retrieves a customer by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the customer does not exist.
pub fn get_customer_by_id(
    conn: &mut SqliteConnection,
    customer_id: i64,
) -> Result<Option<CustomerData>, PersistenceError> {
    debug!("Looking up customer: {}", customer_id);

    let result: Result<CustomerRow, diesel::result::Error> = customers::table
        .filter(customers::customer_id.eq(customer_id))
        .select(CustomerRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into())),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Lists all customers, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_customers(conn: &mut SqliteConnection) -> Result<Vec<CustomerData>, PersistenceError> {
    let rows: Vec<CustomerRow> = customers::table
        .order(customers::customer_id.desc())
        .select(CustomerRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// Lists the contact persons attached to a customer.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_contacts_for_customer(
    conn: &mut SqliteConnection,
    customer_id: i64,
) -> Result<Vec<ContactData>, PersistenceError> {
    let rows: Vec<ContactRow> = contacts::table
        .filter(contacts::customer_id.eq(customer_id))
        .order(contacts::contact_id.asc())
        .select(ContactRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// Lists the site locations attached to a customer.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_locations_for_customer(
    conn: &mut SqliteConnection,
    customer_id: i64,
) -> Result<Vec<LocationData>, PersistenceError> {
    let rows: Vec<LocationRow> = locations::table
        .filter(locations::customer_id.eq(customer_id))
        .order(locations::location_id.asc())
        .select(LocationRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// Retrieves a site location by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the location does not exist.
pub fn get_location_by_id(
    conn: &mut SqliteConnection,
    location_id: i64,
) -> Result<Option<LocationData>, PersistenceError> {
    let result: Result<LocationRow, diesel::result::Error> = locations::table
        .filter(locations::location_id.eq(location_id))
        .select(LocationRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into())),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}
