use axum::{extract::State, http::StatusCode};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::db::{AppState, run_blocking};
use crate::error::{ErrorKind, Result};
use crate::extractors::{Json, Query};
use crate::licensing;

#[derive(Debug, Deserialize)]
pub struct InfoQuery {
    #[serde(default)]
    pub key: String,
}

#[derive(Debug, Default, Serialize)]
pub struct InfoResponse {
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Present (possibly null) whenever the license was found
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activations_used: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activations_max: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
}

/// GET /api/licenca/info?key=
pub async fn get_license_info(
    State(state): State<AppState>,
    Query(query): Query<InfoQuery>,
) -> Result<(StatusCode, Json<InfoResponse>)> {
    let result =
        run_blocking(&state.db, move |conn| licensing::license_info(conn, &query.key)).await;

    match result {
        Ok(info) => Ok((
            StatusCode::OK,
            Json(InfoResponse {
                found: true,
                active: Some(info.active),
                owner: Some(info.owner),
                email: Some(info.email),
                expires: Some(info.expires_on),
                activations_used: Some(info.activations_used),
                activations_max: Some(info.activations_max),
                created_at: Some(info.created_at),
                ..Default::default()
            }),
        )),
        Err(e) if e.is_client_facing() => Ok((
            e.status(),
            Json(InfoResponse {
                found: false,
                reason: Some(e.kind()),
                message: Some(e.public_message()),
                ..Default::default()
            }),
        )),
        Err(e) => Err(e),
    }
}
