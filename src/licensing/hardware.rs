use crate::error::{AppError, Result};

/// Trim a caller-supplied license key, rejecting an empty one.
pub fn normalize_key(license_key: &str) -> Result<&str> {
    let key = license_key.trim();
    if key.is_empty() {
        return Err(AppError::MissingKey);
    }
    Ok(key)
}

/// Identity of one client machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HardwareId {
    machine_uuid: String,
    disk_serial: String,
}

impl HardwareId {
    /// Both parts are trimmed; either one empty is `IncompleteHardware`.
    pub fn new(machine_uuid: &str, disk_serial: &str) -> Result<Self> {
        let machine_uuid = machine_uuid.trim();
        let disk_serial = disk_serial.trim();
        if machine_uuid.is_empty() || disk_serial.is_empty() {
            return Err(AppError::IncompleteHardware);
        }
        Ok(Self {
            machine_uuid: machine_uuid.to_string(),
            disk_serial: disk_serial.to_string(),
        })
    }

    /// The string stored in the activation ledger.
    pub fn signature(&self) -> String {
        format!("{}_{}", self.machine_uuid, self.disk_serial)
    }
}
