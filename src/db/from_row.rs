//! Row mapping trait and helpers for reducing boilerplate in queries.

use rusqlite::{Connection, OptionalExtension, Row, ToSql};

use crate::models::*;

/// Trait for constructing a type from a database row.
///
/// Implementing this trait allows using `query_one` and passing
/// `T::from_row` straight to `query_row`.
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> rusqlite::Result<Self>;
}

/// Query for a single optional result.
pub fn query_one<T: FromRow>(
    conn: &Connection,
    sql: &str,
    params: &[&dyn ToSql],
) -> crate::error::Result<Option<T>> {
    conn.query_row(sql, params, T::from_row)
        .optional()
        .map_err(Into::into)
}

// ============ SQL SELECT Constants ============

pub const LICENSE_COLS: &str =
    "id, license_key, owner, email, expires_on, max_activations, is_active, created_at";

pub const ACTIVATION_COLS: &str = "id, license_id, hardware_signature, activated_at";

// ============ FromRow Implementations ============

impl FromRow for License {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(License {
            id: row.get(0)?,
            license_key: row.get(1)?,
            owner: row.get(2)?,
            email: row.get(3)?,
            expires_on: row.get(4)?,
            max_activations: row.get(5)?,
            is_active: row.get(6)?,
            created_at: row.get(7)?,
        })
    }
}

impl FromRow for Activation {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Activation {
            id: row.get(0)?,
            license_id: row.get(1)?,
            hardware_signature: row.get(2)?,
            activated_at: row.get(3)?,
        })
    }
}
