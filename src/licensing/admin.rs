use rusqlite::{Connection, TransactionBehavior};
use serde::Serialize;

use crate::db::queries;
use crate::error::{AppError, Result};
use crate::models::{CreateLicense, DEFAULT_MAX_ACTIVATIONS, License};

use super::{HardwareId, normalize_key};

/// Issue a new license.
///
/// Text fields are trimmed. Key, owner and email are required and the
/// ceiling must be at least 1.
pub fn add_license(conn: &Connection, input: &CreateLicense) -> Result<License> {
    let license_key = normalize_key(&input.license_key)?;
    let owner = required_field("owner", &input.owner)?;
    let email = required_field("email", &input.email)?;

    let max_activations = input.max_activations.unwrap_or(DEFAULT_MAX_ACTIVATIONS);
    if max_activations < 1 {
        return Err(AppError::InvalidInput(
            "max_activations must be at least 1".into(),
        ));
    }

    let normalized = CreateLicense {
        license_key: license_key.to_string(),
        owner: owner.to_string(),
        email: email.to_string(),
        expires_on: input.expires_on,
        max_activations: Some(max_activations),
        is_active: Some(input.is_active.unwrap_or(true)),
    };

    let license = queries::create_license(conn, &normalized)?;
    tracing::info!(
        license_id = license.id,
        max_activations = license.max_activations,
        expires_on = ?license.expires_on,
        "License created"
    );
    Ok(license)
}

fn required_field<'a>(name: &str, value: &'a str) -> Result<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::InvalidInput(format!("{} is required", name)));
    }
    Ok(value)
}

/// Result of releasing one machine's activation slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Deactivation {
    pub license_id: i64,
    pub hardware_signature: String,
    pub activations_remaining: i64,
}

/// Free the slot held by one machine. The license itself stays active.
pub fn deactivate_hardware(
    conn: &mut Connection,
    license_key: &str,
    machine_uuid: &str,
    disk_serial: &str,
) -> Result<Deactivation> {
    let license_key = normalize_key(license_key)?;
    let hardware = HardwareId::new(machine_uuid, disk_serial)?;
    let signature = hardware.signature();

    // Write lock up front: a deferred read-then-delete fails without waiting
    // if another writer commits in between
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let license = queries::get_license_by_key(&tx, license_key)?.ok_or(AppError::NotFound)?;

    if !queries::delete_activation(&tx, license.id, &signature)? {
        return Err(AppError::SignatureNotFound);
    }
    let activations_remaining = queries::count_activations_for_license(&tx, license.id)?;
    tx.commit()?;

    tracing::info!(
        license_id = license.id,
        hardware_signature = %signature,
        activations_remaining,
        "Hardware deactivated"
    );

    Ok(Deactivation {
        license_id: license.id,
        hardware_signature: signature,
        activations_remaining,
    })
}
