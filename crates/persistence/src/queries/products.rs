// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Product catalogue queries.

use diesel::prelude::*;
use diesel::SqliteConnection;

use crate::data_models::ProductData;
use crate::diesel_schema::products;
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = products)]
struct ProductRow {
    product_id: i64,
    code: String,
    name: String,
    description: Option<String>,
}

impl From<ProductRow> for ProductData {
    fn from(row: ProductRow) -> Self {
        Self {
            product_id: row.product_id,
            code: row.code,
            name: row.name,
            description: row.description,
        }
    }
}

/// Lists the product catalogue, ordered by code.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_products(conn: &mut SqliteConnection) -> Result<Vec<ProductData>, PersistenceError> {
    let rows: Vec<ProductRow> = products::table
        .order(products::code.asc())
        .select(ProductRow::as_select())
        .load(conn)?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// Retrieves a product by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the product does not exist.
pub fn get_product_by_id(
    conn: &mut SqliteConnection,
    product_id: i64,
) -> Result<Option<ProductData>, PersistenceError> {
    let result: Result<ProductRow, diesel::result::Error> = products::table
        .filter(products::product_id.eq(product_id))
        .select(ProductRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into())),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}
