use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use rusqlite::ErrorCode;
use serde::Serialize;
use thiserror::Error;

/// Machine-readable error classification, surfaced to clients as `reason`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    MissingKey,
    IncompleteHardware,
    InvalidInput,
    NotFound,
    SignatureNotFound,
    Deactivated,
    Expired,
    CeilingReached,
    DuplicateKey,
    Unauthorized,
    Forbidden,
    StorageUnavailable,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::MissingKey => "missing_key",
            ErrorKind::IncompleteHardware => "incomplete_hardware",
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::NotFound => "not_found",
            ErrorKind::SignatureNotFound => "signature_not_found",
            ErrorKind::Deactivated => "deactivated",
            ErrorKind::Expired => "expired",
            ErrorKind::CeilingReached => "ceiling_reached",
            ErrorKind::DuplicateKey => "duplicate_key",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::StorageUnavailable => "storage_unavailable",
            ErrorKind::Internal => "internal",
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("License key not provided")]
    MissingKey,

    #[error("Incomplete hardware information")]
    IncompleteHardware,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("License not found")]
    NotFound,

    #[error("Hardware not found among activations")]
    SignatureNotFound,

    #[error("License deactivated")]
    Deactivated,

    #[error("License expired on {0}")]
    Expired(NaiveDate),

    #[error("Activation limit reached ({0})")]
    CeilingReached(i64),

    #[error("License key already exists: {0}")]
    DuplicateKey(String),

    #[error("API key not provided. Use header: X-API-Key or Authorization")]
    Unauthorized,

    #[error("Invalid API key")]
    Forbidden,

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::MissingKey => ErrorKind::MissingKey,
            AppError::IncompleteHardware => ErrorKind::IncompleteHardware,
            AppError::InvalidInput(_) => ErrorKind::InvalidInput,
            AppError::NotFound => ErrorKind::NotFound,
            AppError::SignatureNotFound => ErrorKind::SignatureNotFound,
            AppError::Deactivated => ErrorKind::Deactivated,
            AppError::Expired(_) => ErrorKind::Expired,
            AppError::CeilingReached(_) => ErrorKind::CeilingReached,
            AppError::DuplicateKey(_) => ErrorKind::DuplicateKey,
            AppError::Unauthorized => ErrorKind::Unauthorized,
            AppError::Forbidden => ErrorKind::Forbidden,
            AppError::StorageUnavailable(_) => ErrorKind::StorageUnavailable,
            AppError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingKey | AppError::IncompleteHardware | AppError::InvalidInput(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound | AppError::SignatureNotFound => StatusCode::NOT_FOUND,
            AppError::Deactivated | AppError::Expired(_) | AppError::CeilingReached(_) => {
                StatusCode::FORBIDDEN
            }
            AppError::DuplicateKey(_) => StatusCode::CONFLICT,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Errors caused by the request itself or by license policy, as opposed
    /// to infrastructure failures. Their message is safe to show the caller.
    pub fn is_client_facing(&self) -> bool {
        !matches!(
            self,
            AppError::StorageUnavailable(_) | AppError::Internal(_)
        )
    }

    /// Message returned to the caller. Infrastructure details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            AppError::StorageUnavailable(_) => "Database unavailable".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }

    /// Emit the log line for failures the caller cannot act on.
    pub fn log(&self) {
        match self {
            AppError::StorageUnavailable(e) => tracing::error!("Storage unavailable: {}", e),
            AppError::Internal(e) => tracing::error!("Internal error: {}", e),
            _ => {}
        }
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(err: rusqlite::Error) -> Self {
        match err.sqlite_error_code() {
            Some(
                ErrorCode::DatabaseBusy
                | ErrorCode::DatabaseLocked
                | ErrorCode::CannotOpen
                | ErrorCode::SystemIoFailure
                | ErrorCode::DiskFull,
            ) => AppError::StorageUnavailable(err.to_string()),
            _ => AppError::Internal(format!("Database error: {}", err)),
        }
    }
}

impl From<r2d2::Error> for AppError {
    fn from(err: r2d2::Error) -> Self {
        AppError::StorageUnavailable(format!("Pool error: {}", err))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("Blocking task failed: {}", err))
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
    reason: ErrorKind,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();
        let status = self.status();
        let body = ErrorResponse {
            error: status.canonical_reason().unwrap_or("Error"),
            reason: self.kind(),
            message: self.public_message(),
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
