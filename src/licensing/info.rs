use chrono::NaiveDate;
use rusqlite::Connection;
use serde::Serialize;

use crate::db::queries;
use crate::error::{AppError, Result};

use super::normalize_key;

/// Read-only view of a license and its ledger usage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LicenseInfo {
    pub active: bool,
    pub owner: String,
    pub email: String,
    pub expires_on: Option<NaiveDate>,
    pub activations_used: i64,
    pub activations_max: i64,
    pub created_at: i64,
}

/// Look up a license by key.
///
/// The license row and its activation count are read in one transaction so
/// the count belongs to the same snapshot as the ceiling.
pub fn license_info(conn: &mut Connection, license_key: &str) -> Result<LicenseInfo> {
    let license_key = normalize_key(license_key)?;

    let tx = conn.transaction()?;
    let license = queries::get_license_by_key(&tx, license_key)?.ok_or(AppError::NotFound)?;
    let activations_used = queries::count_activations_for_license(&tx, license.id)?;
    tx.commit()?;

    Ok(LicenseInfo {
        active: license.is_active,
        owner: license.owner,
        email: license.email,
        expires_on: license.expires_on,
        activations_used,
        activations_max: license.max_activations,
        created_at: license.created_at,
    })
}
