use axum::{extract::State, http::StatusCode};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::db::{AppState, run_blocking};
use crate::error::{AppError, ErrorKind, Result};
use crate::extractors::{Json, Query};
use crate::licensing::{self, Validation};

/// Query parameters for GET /api/licenca.
/// Missing parameters are treated as empty so the engine reports which one.
#[derive(Debug, Deserialize)]
pub struct ValidateQuery {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub disk: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationOutcome {
    AlreadyActivated,
    NewlyActivated,
}

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<ValidationOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<ErrorKind>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Expiry date; also filled on an `expired` rejection
    pub expires: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activations_used: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activations_max: Option<i64>,
}

impl ValidateResponse {
    fn accepted(validation: Validation) -> Self {
        match validation {
            Validation::AlreadyActivated { owner, expires_on } => Self {
                valid: true,
                outcome: Some(ValidationOutcome::AlreadyActivated),
                reason: None,
                message: "License valid (already activated on this hardware)".into(),
                owner: Some(owner),
                expires: expires_on,
                activations_used: None,
                activations_max: None,
            },
            Validation::NewlyActivated {
                owner,
                expires_on,
                activations_used,
                activations_max,
            } => Self {
                valid: true,
                outcome: Some(ValidationOutcome::NewlyActivated),
                reason: None,
                message: "License activated successfully".into(),
                owner: Some(owner),
                expires: expires_on,
                activations_used: Some(activations_used),
                activations_max: Some(activations_max),
            },
        }
    }

    fn rejected(err: &AppError) -> Self {
        Self {
            valid: false,
            outcome: None,
            reason: Some(err.kind()),
            message: err.public_message(),
            owner: None,
            expires: match err {
                AppError::Expired(date) => Some(*date),
                _ => None,
            },
            activations_used: None,
            activations_max: None,
        }
    }
}

/// GET /api/licenca?key=&uuid=&disk=
///
/// Input and policy rejections answer `valid: false` with the matching
/// status; storage failures fall through to the generic error body.
pub async fn validate_license(
    State(state): State<AppState>,
    Query(query): Query<ValidateQuery>,
) -> Result<(StatusCode, Json<ValidateResponse>)> {
    let result = run_blocking(&state.db, move |conn| {
        licensing::validate(conn, &query.key, &query.uuid, &query.disk)
    })
    .await;

    match result {
        Ok(validation) => {
            tracing::debug!(
                owner = validation.owner(),
                new_activation = validation.is_new(),
                "License validated"
            );
            Ok((StatusCode::OK, Json(ValidateResponse::accepted(validation))))
        }
        Err(e) if e.is_client_facing() => {
            tracing::debug!(reason = e.kind().as_str(), "Validation rejected");
            Ok((e.status(), Json(ValidateResponse::rejected(&e))))
        }
        Err(e) => Err(e),
    }
}
