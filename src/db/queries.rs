use chrono::{NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, TransactionBehavior, params};

use crate::error::{AppError, Result};
use crate::models::*;

use super::from_row::{ACTIVATION_COLS, FromRow, LICENSE_COLS, query_one};

fn now() -> i64 {
    Utc::now().timestamp()
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

/// Cheap round trip used by the health check.
pub fn ping(conn: &Connection) -> Result<()> {
    conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
    Ok(())
}

// ============ Licenses ============

/// Insert a license. Defaults: one activation, active.
///
/// A key that already exists yields `DuplicateKey` and leaves the existing row untouched.
pub fn create_license(conn: &Connection, input: &CreateLicense) -> Result<License> {
    let result = conn.query_row(
        &format!(
            "INSERT INTO licenses (license_key, owner, email, expires_on, max_activations, is_active, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING {}",
            LICENSE_COLS
        ),
        params![
            &input.license_key,
            &input.owner,
            &input.email,
            input.expires_on,
            input.max_activations.unwrap_or(DEFAULT_MAX_ACTIVATIONS),
            input.is_active.unwrap_or(true),
            now(),
        ],
        License::from_row,
    );

    match result {
        Ok(license) => Ok(license),
        Err(e) if is_unique_violation(&e) => {
            Err(AppError::DuplicateKey(input.license_key.clone()))
        }
        Err(e) => Err(e.into()),
    }
}

pub fn get_license_by_key(conn: &Connection, license_key: &str) -> Result<Option<License>> {
    query_one(
        conn,
        &format!("SELECT {} FROM licenses WHERE license_key = ?1", LICENSE_COLS),
        &[&license_key],
    )
}

/// Demo licenses for local development. Existing keys are left alone.
/// Returns the number of rows inserted.
pub fn seed_demo_licenses(conn: &Connection) -> Result<usize> {
    let demo = [
        ("DEMO-1234-5678-ABCD", "Demo Customer", "demo@example.com", NaiveDate::from_ymd_opt(2099, 12, 31), 1),
        ("PROD-9876-5432-ZYXW", "Premium Customer", "premium@example.com", NaiveDate::from_ymd_opt(2099, 12, 31), 3),
        ("EXPIRED-LITE-LICENSE", "Expired Customer", "expired@example.com", NaiveDate::from_ymd_opt(2020, 1, 1), 1),
    ];

    let now = now();
    let mut inserted = 0;
    for (key, owner, email, expires_on, max_activations) in demo {
        inserted += conn.execute(
            "INSERT OR IGNORE INTO licenses (license_key, owner, email, expires_on, max_activations, is_active, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6)",
            params![key, owner, email, expires_on, max_activations, now],
        )?;
    }
    Ok(inserted)
}

// ============ Activations ============

pub fn get_activation(
    conn: &Connection,
    license_id: i64,
    hardware_signature: &str,
) -> Result<Option<Activation>> {
    query_one(
        conn,
        &format!(
            "SELECT {} FROM activations WHERE license_id = ?1 AND hardware_signature = ?2",
            ACTIVATION_COLS
        ),
        &[&license_id, &hardware_signature],
    )
}

pub fn count_activations_for_license(conn: &Connection, license_id: i64) -> Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM activations WHERE license_id = ?1",
        params![license_id],
        |row| row.get(0),
    )
    .map_err(Into::into)
}

/// Take an activation slot for `hardware_signature` on `license`, or report
/// the slot it already holds.
///
/// The existence check, the ceiling check and the insert run in one IMMEDIATE
/// transaction: the write lock is held from before the count is read until
/// the commit, so concurrent callers cannot both observe a free slot.
/// Any failure drops the transaction, which rolls back.
pub fn acquire_activation_atomic(
    conn: &mut Connection,
    license: &License,
    hardware_signature: &str,
) -> Result<ActivationAcquisition> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    if let Some(existing) = get_activation(&tx, license.id, hardware_signature)? {
        return Ok(ActivationAcquisition::Existing(existing));
    }

    // Ceiling is re-read under the lock rather than trusted from the caller's snapshot
    let max_activations: i64 = tx
        .query_row(
            "SELECT max_activations FROM licenses WHERE id = ?1",
            params![license.id],
            |row| row.get(0),
        )
        .optional()?
        .ok_or(AppError::NotFound)?;

    let used = count_activations_for_license(&tx, license.id)?;
    if used >= max_activations {
        return Err(AppError::CeilingReached(max_activations));
    }

    let activation = tx.query_row(
        &format!(
            "INSERT INTO activations (license_id, hardware_signature, activated_at)
             VALUES (?1, ?2, ?3)
             RETURNING {}",
            ACTIVATION_COLS
        ),
        params![license.id, hardware_signature, now()],
        Activation::from_row,
    )?;

    tx.commit()?;

    Ok(ActivationAcquisition::Created {
        activation,
        used: used + 1,
    })
}

/// Remove one machine's activation. Returns false when no such activation exists.
pub fn delete_activation(
    conn: &Connection,
    license_id: i64,
    hardware_signature: &str,
) -> Result<bool> {
    let deleted = conn.execute(
        "DELETE FROM activations WHERE license_id = ?1 AND hardware_signature = ?2",
        params![license_id, hardware_signature],
    )?;
    Ok(deleted > 0)
}
