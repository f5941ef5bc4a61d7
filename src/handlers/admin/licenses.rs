use axum::{extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::db::{AppState, run_blocking};
use crate::error::{AppError, ErrorKind, Result};
use crate::extractors::Json;
use crate::licensing;
use crate::models::{CreateLicense, License};

/// Shared body for admin responses.
#[derive(Debug, Default, Serialize)]
pub struct AdminResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<ErrorKind>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activations_remaining: Option<i64>,
}

impl AdminResponse {
    fn failure(err: &AppError) -> (StatusCode, Json<Self>) {
        (
            err.status(),
            Json(Self {
                success: false,
                reason: Some(err.kind()),
                message: err.public_message(),
                ..Default::default()
            }),
        )
    }
}

/// Render client-facing errors as `success: false`; infrastructure errors
/// keep the generic error body.
fn respond<T>(
    result: Result<T>,
    on_success: impl FnOnce(T) -> (StatusCode, Json<AdminResponse>),
) -> Result<(StatusCode, Json<AdminResponse>)> {
    match result {
        Ok(value) => Ok(on_success(value)),
        Err(e) if e.is_client_facing() => Ok(AdminResponse::failure(&e)),
        Err(e) => Err(e),
    }
}

#[derive(Debug, Serialize)]
pub struct VerifyTokenResponse {
    pub valid: bool,
    pub message: &'static str,
}

/// GET /api/token/verify
///
/// Reaching this handler means the API key middleware accepted the credential.
pub async fn verify_token() -> Json<VerifyTokenResponse> {
    Json(VerifyTokenResponse {
        valid: true,
        message: "Token valid",
    })
}

/// POST /api/licenca/add
///
/// A body that fails to parse is answered in the admin shape too.
pub async fn add_license(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateLicense>, AppError>,
) -> Result<(StatusCode, Json<AdminResponse>)> {
    let Json(input) = match payload {
        Ok(body) => body,
        Err(e) => return Ok(AdminResponse::failure(&e)),
    };
    let result = run_blocking(&state.db, move |conn| licensing::add_license(conn, &input)).await;

    respond(result, |license| {
        (
            StatusCode::CREATED,
            Json(AdminResponse {
                success: true,
                message: "License created successfully".into(),
                license: Some(license),
                ..Default::default()
            }),
        )
    })
}

#[derive(Debug, Deserialize)]
pub struct DeactivateRequest {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub disk: String,
}

/// POST /api/licenca/deactivate
///
/// Frees one machine's activation slot. The license itself stays active.
pub async fn deactivate_hardware(
    State(state): State<AppState>,
    payload: std::result::Result<Json<DeactivateRequest>, AppError>,
) -> Result<(StatusCode, Json<AdminResponse>)> {
    let Json(req) = match payload {
        Ok(body) => body,
        Err(e) => return Ok(AdminResponse::failure(&e)),
    };
    let result = run_blocking(&state.db, move |conn| {
        licensing::deactivate_hardware(conn, &req.key, &req.uuid, &req.disk)
    })
    .await;

    respond(result, |deactivation| {
        (
            StatusCode::OK,
            Json(AdminResponse {
                success: true,
                message: "License deactivated on this hardware".into(),
                activations_remaining: Some(deactivation.activations_remaining),
                ..Default::default()
            }),
        )
    })
}
