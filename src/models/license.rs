use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_ACTIVATIONS: i64 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct License {
    pub id: i64,
    pub license_key: String,
    pub owner: String,
    pub email: String,
    /// Last day the license is valid (inclusive). None = never expires
    pub expires_on: Option<NaiveDate>,
    /// Ceiling on distinct activated machines
    pub max_activations: i64,
    /// False blocks validation regardless of any other state
    pub is_active: bool,
    pub created_at: i64,
}

impl License {
    /// Date-only comparison: the license is still valid on its expiry day.
    pub fn is_expired_on(&self, today: NaiveDate) -> bool {
        self.expires_on.is_some_and(|exp| today > exp)
    }
}

/// Admin input for a new license.
///
/// Required text fields default to empty so that a missing field is reported
/// as a validation error naming the field, not as a JSON parse failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateLicense {
    #[serde(default)]
    pub license_key: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub expires_on: Option<NaiveDate>,
    /// Defaults to 1
    #[serde(default)]
    pub max_activations: Option<i64>,
    /// Defaults to true
    #[serde(default)]
    pub is_active: Option<bool>,
}
