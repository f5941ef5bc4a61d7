use chrono::{NaiveDate, Utc};
use rusqlite::Connection;

use crate::db::queries;
use crate::error::{AppError, Result};
use crate::models::ActivationAcquisition;

use super::{HardwareId, normalize_key};

/// Accepted outcome of a validation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    /// This machine already held a slot; nothing changed.
    AlreadyActivated {
        owner: String,
        expires_on: Option<NaiveDate>,
    },
    /// A slot was taken for this machine.
    NewlyActivated {
        owner: String,
        expires_on: Option<NaiveDate>,
        activations_used: i64,
        activations_max: i64,
    },
}

impl Validation {
    pub fn owner(&self) -> &str {
        match self {
            Validation::AlreadyActivated { owner, .. } | Validation::NewlyActivated { owner, .. } => {
                owner
            }
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, Validation::NewlyActivated { .. })
    }
}

/// Validate `license_key` for a machine, activating it if a slot is free.
/// "Today" is the current UTC date.
pub fn validate(
    conn: &mut Connection,
    license_key: &str,
    machine_uuid: &str,
    disk_serial: &str,
) -> Result<Validation> {
    validate_on(
        conn,
        license_key,
        machine_uuid,
        disk_serial,
        Utc::now().date_naive(),
    )
}

/// Validation with an explicit calendar date for the expiry check.
///
/// Checks run in a fixed order and the first failure is the answer:
/// key present, hardware complete, license exists, license active,
/// not expired, then the ledger. Only the final ledger step writes.
pub fn validate_on(
    conn: &mut Connection,
    license_key: &str,
    machine_uuid: &str,
    disk_serial: &str,
    today: NaiveDate,
) -> Result<Validation> {
    let license_key = normalize_key(license_key)?;
    let hardware = HardwareId::new(machine_uuid, disk_serial)?;

    let license = queries::get_license_by_key(conn, license_key)?.ok_or(AppError::NotFound)?;

    if !license.is_active {
        return Err(AppError::Deactivated);
    }

    if let Some(expires_on) = license.expires_on
        && license.is_expired_on(today)
    {
        return Err(AppError::Expired(expires_on));
    }

    let signature = hardware.signature();

    // Fast path: re-validation of a known machine needs no write lock
    if queries::get_activation(conn, license.id, &signature)?.is_some() {
        return Ok(Validation::AlreadyActivated {
            owner: license.owner,
            expires_on: license.expires_on,
        });
    }

    match queries::acquire_activation_atomic(conn, &license, &signature) {
        Ok(ActivationAcquisition::Existing(_)) => Ok(Validation::AlreadyActivated {
            owner: license.owner,
            expires_on: license.expires_on,
        }),
        Ok(ActivationAcquisition::Created { activation, used }) => {
            tracing::info!(
                license_id = license.id,
                activation_id = activation.id,
                hardware_signature = %signature,
                activations_used = used,
                activations_max = license.max_activations,
                "Hardware activated"
            );
            Ok(Validation::NewlyActivated {
                owner: license.owner,
                expires_on: license.expires_on,
                activations_used: used,
                activations_max: license.max_activations,
            })
        }
        Err(e @ AppError::CeilingReached(_)) => {
            tracing::debug!(
                license_id = license.id,
                hardware_signature = %signature,
                "Activation refused: ceiling reached"
            );
            Err(e)
        }
        Err(e) => Err(e),
    }
}
