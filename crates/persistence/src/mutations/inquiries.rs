// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Web inquiry mutations.
//!
//! Conversion to a customer lives in the `conversion` module.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::info;

use crate::data_models::{InquiryData, NewInquiry};
use crate::diesel_schema::inquiries;
use crate::error::PersistenceError;
use crate::queries;
use crate::sqlite::get_last_insert_rowid;

#[derive(Insertable)]
#[diesel(table_name = inquiries)]
struct InquiryInsert<'a> {
    full_name: &'a str,
    email: Option<&'a str>,
    phone: Option<&'a str>,
    message: Option<&'a str>,
    status: &'a str,
    created_at: &'a str,
}

/// Records an incoming web inquiry in the `new` status.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_inquiry(
    conn: &mut SqliteConnection,
    new: &NewInquiry,
    now: &str,
) -> Result<InquiryData, PersistenceError> {
    let inquiry_id = conn.transaction::<_, PersistenceError, _>(|conn| {
        diesel::insert_into(inquiries::table)
            .values(InquiryInsert {
                full_name: &new.full_name,
                email: new.email.as_deref(),
                phone: new.phone.as_deref(),
                message: new.message.as_deref(),
                status: "new",
                created_at: now,
            })
            .execute(conn)?;
        get_last_insert_rowid(conn)
    })?;

    info!("Recorded inquiry {}", inquiry_id);

    queries::inquiries::get_inquiry_by_id(conn, inquiry_id)?.ok_or(PersistenceError::NotFound {
        entity: "inquiry",
        id: inquiry_id,
    })
}
