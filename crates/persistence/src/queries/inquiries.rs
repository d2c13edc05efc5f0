// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Web inquiry queries.

use diesel::prelude::*;
use diesel::SqliteConnection;

use crate::data_models::InquiryData;
use crate::diesel_schema::inquiries;
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = inquiries)]
pub(crate) struct InquiryRow {
    inquiry_id: i64,
    full_name: String,
    email: Option<String>,
    phone: Option<String>,
    message: Option<String>,
    status: String,
    customer_id: Option<i64>,
    converted_at: Option<String>,
    created_at: String,
}

impl From<InquiryRow> for InquiryData {
    fn from(row: InquiryRow) -> Self {
        Self {
            inquiry_id: row.inquiry_id,
            full_name: row.full_name,
            email: row.email,
            phone: row.phone,
            message: row.message,
            status: row.status,
            customer_id: row.customer_id,
            converted_at: row.converted_at,
            created_at: row.created_at,
        }
    }
}

/// Retrieves an inquiry by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the inquiry does not exist.
pub fn get_inquiry_by_id(
    conn: &mut SqliteConnection,
    inquiry_id: i64,
) -> Result<Option<InquiryData>, PersistenceError> {
    let result: Result<InquiryRow, diesel::result::Error> = inquiries::table
        .filter(inquiries::inquiry_id.eq(inquiry_id))
        .select(InquiryRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into())),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Lists inquiries, newest first, optionally filtered by status.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_inquiries(
    conn: &mut SqliteConnection,
    status: Option<&str>,
) -> Result<Vec<InquiryData>, PersistenceError> {
    let mut query = inquiries::table.into_boxed();
    if let Some(status) = status {
        query = query.filter(inquiries::status.eq(status.to_owned()));
    }

    let rows: Vec<InquiryRow> = query
        .order(inquiries::inquiry_id.desc())
        .select(InquiryRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(Into::into).collect())
}
