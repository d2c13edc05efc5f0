// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Customer, contact and site-location mutations.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::info;

use crate::data_models::{
    ContactData, CustomerData, LocationData, NewContact, NewCustomer, NewLocation,
};
use crate::diesel_schema::{contacts, customers, locations};
use crate::error::PersistenceError;
use crate::queries;
use crate::sqlite::get_last_insert_rowid;

#[derive(Insertable)]
#[diesel(table_name = customers)]
struct CustomerInsert<'a> {
    customer_type: &'a str,
    full_name: Option<&'a str>,
    email: Option<&'a str>,
    phone: Option<&'a str>,
    company_name: Option<&'a str>,
    ico: Option<&'a str>,
    dic: Option<&'a str>,
    source: &'a str,
    note: Option<&'a str>,
    owner_id: Option<i64>,
    origin_lead_id: Option<i64>,
    created_at: &'a str,
}

/// Inserts a customer row and returns its ID.
///
/// Shared by direct creation and by lead/inquiry conversion, which call
/// it inside their own transactions.
pub(crate) fn insert_customer(
    conn: &mut SqliteConnection,
    new: &NewCustomer,
    now: &str,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(customers::table)
        .values(CustomerInsert {
            customer_type: new.customer_type.as_str(),
            full_name: new.full_name.as_deref(),
            email: new.email.as_deref(),
            phone: new.phone.as_deref(),
            company_name: new.company_name.as_deref(),
            ico: new.ico.as_deref(),
            dic: new.dic.as_deref(),
            source: new.source.as_str(),
            note: new.note.as_deref(),
            owner_id: new.owner_id,
            origin_lead_id: new.origin_lead_id,
            created_at: now,
        })
        .execute(conn)?;
    get_last_insert_rowid(conn)
}

/// Creates a customer.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_customer(
    conn: &mut SqliteConnection,
    new: &NewCustomer,
    now: &str,
) -> Result<CustomerData, PersistenceError> {
    let customer_id = conn.transaction(|conn| insert_customer(conn, new, now))?;

    info!("Created customer {}", customer_id);

    queries::customers::get_customer_by_id(conn, customer_id)?.ok_or(
        PersistenceError::NotFound {
            entity: "customer",
            id: customer_id,
        },
    )
}

/// Updates the mutable fields of a customer.
///
/// # Errors
///
/// Returns `NotFound` if the customer does not exist.
pub fn update_customer(
    conn: &mut SqliteConnection,
    customer_id: i64,
    new: &NewCustomer,
) -> Result<CustomerData, PersistenceError> {
    let affected =
        diesel::update(customers::table.filter(customers::customer_id.eq(customer_id)))
            .set((
                customers::customer_type.eq(new.customer_type.as_str()),
                customers::full_name.eq(new.full_name.as_deref()),
                customers::email.eq(new.email.as_deref()),
                customers::phone.eq(new.phone.as_deref()),
                customers::company_name.eq(new.company_name.as_deref()),
                customers::ico.eq(new.ico.as_deref()),
                customers::dic.eq(new.dic.as_deref()),
                customers::note.eq(new.note.as_deref()),
                customers::owner_id.eq(new.owner_id),
            ))
            .execute(conn)?;

    if affected == 0 {
        return Err(PersistenceError::NotFound {
            entity: "customer",
            id: customer_id,
        });
    }

    queries::customers::get_customer_by_id(conn, customer_id)?.ok_or(
        PersistenceError::NotFound {
            entity: "customer",
            id: customer_id,
        },
    )
}

#[derive(Insertable)]
#[diesel(table_name = contacts)]
struct ContactInsert<'a> {
    customer_id: i64,
    full_name: &'a str,
    email: Option<&'a str>,
    phone: Option<&'a str>,
    position: Option<&'a str>,
}

/// Adds a contact person to a customer.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_contact(
    conn: &mut SqliteConnection,
    new: &NewContact,
) -> Result<ContactData, PersistenceError> {
    let contact_id = conn.transaction::<_, PersistenceError, _>(|conn| {
        diesel::insert_into(contacts::table)
            .values(ContactInsert {
                customer_id: new.customer_id,
                full_name: &new.full_name,
                email: new.email.as_deref(),
                phone: new.phone.as_deref(),
                position: new.position.as_deref(),
            })
            .execute(conn)?;
        get_last_insert_rowid(conn)
    })?;

    Ok(ContactData {
        contact_id,
        customer_id: new.customer_id,
        full_name: new.full_name.clone(),
        email: new.email.clone(),
        phone: new.phone.clone(),
        position: new.position.clone(),
    })
}

#[derive(Insertable)]
#[diesel(table_name = locations)]
struct LocationInsert<'a> {
    customer_id: i64,
    street: &'a str,
    city: &'a str,
    zip: &'a str,
    note: Option<&'a str>,
}

/// Adds a site location to a customer.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_location(
    conn: &mut SqliteConnection,
    new: &NewLocation,
) -> Result<LocationData, PersistenceError> {
    let location_id = conn.transaction::<_, PersistenceError, _>(|conn| {
        diesel::insert_into(locations::table)
            .values(LocationInsert {
                customer_id: new.customer_id,
                street: &new.street,
                city: &new.city,
                zip: &new.zip,
                note: new.note.as_deref(),
            })
            .execute(conn)?;
        get_last_insert_rowid(conn)
    })?;

    Ok(LocationData {
        location_id,
        customer_id: new.customer_id,
        street: new.street.clone(),
        city: new.city.clone(),
        zip: new.zip.clone(),
        note: new.note.clone(),
    })
}
