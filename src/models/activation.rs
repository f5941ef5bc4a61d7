use serde::{Deserialize, Serialize};

/// Binding of one license to one machine. Consumes one activation slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activation {
    pub id: i64,
    pub license_id: i64,
    /// `machine_uuid + "_" + disk_serial`
    pub hardware_signature: String,
    pub activated_at: i64,
}

/// Result of the atomic ledger write for a validation request.
#[derive(Debug, Clone)]
pub enum ActivationAcquisition {
    /// The hardware already held a slot; nothing was written.
    Existing(Activation),
    /// A new slot was taken. `used` is the post-insert count.
    Created { activation: Activation, used: i64 },
}
