use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::db::AppState;
use crate::error::AppError;
use crate::util::{extract_api_key, secrets_match};

/// Gate for admin routes. Runs before any admin handler, so the licensing
/// core only ever sees authorized calls.
///
/// Missing credential is 401; a wrong one, or no credential configured on the
/// server, is 403.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let provided = extract_api_key(request.headers()).ok_or(AppError::Unauthorized)?;

    let Some(expected) = state.api_key.as_deref() else {
        tracing::warn!("Admin request rejected: API_KEY is not configured");
        return Err(AppError::Forbidden);
    };

    if !secrets_match(expected, provided) {
        tracing::warn!(path = %request.uri().path(), "Admin request rejected: invalid API key");
        return Err(AppError::Forbidden);
    }

    Ok(next.run(request).await)
}
