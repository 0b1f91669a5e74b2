//! Row mapping for query results.

use std::str::FromStr;

use rusqlite::{Connection, Row, ToSql, types::Type};

use crate::error::Result;
use crate::models::*;

pub trait FromRow: Sized {
    fn from_row(row: &Row) -> rusqlite::Result<Self>;
}

pub const USER_COLS: &str =
    "id, name, email, password_hash, role, status, logged_in, created_at, updated_at";

pub const MANAGER_COLS: &str = "id, user_id, manager_name, email, mobile_no, company_name, rate_per_day, validity, created_at";

pub const PRODUCT_COLS: &str =
    "id, parent_id, title, description, sku, price, stock, options, created_at";

pub const PRODUCT_IMAGE_COLS: &str = "id, product_id, url, alt_text, is_primary";

pub const STOCK_LOG_COLS: &str = "id, product_id, type, quantity, note, created_at";

/// Parse a TEXT column holding a strum-backed enum.
fn parse_enum<T: FromStr>(row: &Row, idx: usize) -> rusqlite::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(idx)?;
    raw.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

impl FromRow for User {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(User {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            password_hash: row.get(3)?,
            role: parse_enum(row, 4)?,
            status: parse_enum(row, 5)?,
            logged_in: row.get(6)?,
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
        })
    }
}

impl FromRow for Manager {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Manager {
            manager_id: row.get(0)?,
            user_id: row.get(1)?,
            manager_name: row.get(2)?,
            email: row.get(3)?,
            mobile_no: row.get(4)?,
            company_name: row.get(5)?,
            rate_per_day: row.get(6)?,
            validity: row.get(7)?,
            created_at: row.get(8)?,
        })
    }
}

impl FromRow for Product {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let options: Option<String> = row.get(7)?;
        let options = options
            .map(|s| OptionMap::from_json(&s))
            .transpose()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(7, Type::Text, Box::new(e)))?;

        Ok(Product {
            id: row.get(0)?,
            parent_id: row.get(1)?,
            title: row.get(2)?,
            description: row.get(3)?,
            sku: row.get(4)?,
            price: row.get(5)?,
            stock: row.get(6)?,
            options,
            created_at: row.get(8)?,
        })
    }
}

impl FromRow for ProductImage {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(ProductImage {
            id: row.get(0)?,
            product_id: row.get(1)?,
            url: row.get(2)?,
            alt_text: row.get(3)?,
            is_primary: row.get(4)?,
        })
    }
}

impl FromRow for StockLog {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(StockLog {
            id: row.get(0)?,
            product_id: row.get(1)?,
            kind: parse_enum(row, 2)?,
            quantity: row.get(3)?,
            note: row.get(4)?,
            created_at: row.get(5)?,
        })
    }
}

pub fn query_one<T: FromRow>(conn: &Connection, sql: &str, params: &[&dyn ToSql]) -> Result<Option<T>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    match rows.next()? {
        Some(row) => Ok(Some(T::from_row(row)?)),
        None => Ok(None),
    }
}

pub fn query_all<T: FromRow>(conn: &Connection, sql: &str, params: &[&dyn ToSql]) -> Result<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, |row| T::from_row(row))?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}
