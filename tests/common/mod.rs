//! Test utilities and fixtures for hwlicense integration tests

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::Response;
use chrono::NaiveDate;
use rusqlite::Connection;
use serde_json::Value;

pub use hwlicense::config::{DbConfig, RateLimitConfig};
pub use hwlicense::db::{AppState, DbPool, create_memory_pool, create_pool, init_db, queries};
pub use hwlicense::error::{AppError, ErrorKind};
pub use hwlicense::handlers;
pub use hwlicense::licensing::{self, Validation};
pub use hwlicense::models::*;

pub const TEST_API_KEY: &str = "test-admin-key";

pub const MACHINE_A: (&str, &str) = ("UUID-A", "DISK-A");
pub const MACHINE_B: (&str, &str) = ("UUID-B", "DISK-B");
pub const MACHINE_C: (&str, &str) = ("UUID-C", "DISK-C");

/// Create an in-memory test database with schema initialized
pub fn setup_test_db() -> Connection {
    let conn = Connection::open_in_memory().expect("Failed to create in-memory database");
    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .expect("Failed to enable foreign keys");
    init_db(&conn).expect("Failed to initialize schema");
    conn
}

/// A fixed date well before any test license expires
pub fn test_today() -> NaiveDate {
    date(2030, 6, 15)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

/// Create a license with the given ceiling and expiry
pub fn create_test_license(
    conn: &Connection,
    key: &str,
    max_activations: i64,
    expires_on: Option<NaiveDate>,
) -> License {
    let input = CreateLicense {
        license_key: key.to_string(),
        owner: format!("Owner of {}", key),
        email: format!("{}@example.com", key.to_lowercase()),
        expires_on,
        max_activations: Some(max_activations),
        is_active: Some(true),
    };
    queries::create_license(conn, &input).expect("Failed to create test license")
}

/// Create a license that has been switched off
pub fn create_inactive_license(conn: &Connection, key: &str) -> License {
    let input = CreateLicense {
        license_key: key.to_string(),
        owner: "Inactive Owner".into(),
        email: "inactive@example.com".into(),
        expires_on: None,
        max_activations: Some(1),
        is_active: Some(false),
    };
    queries::create_license(conn, &input).expect("Failed to create inactive license")
}

/// File-backed pool in a temp dir, for tests that need several connections
pub fn create_file_pool(dir: &tempfile::TempDir, pool_size: u32) -> DbPool {
    let path = dir.path().join("hwlicense-test.db");
    let config = DbConfig {
        pool_size,
        busy_timeout_ms: 10_000,
        connection_timeout_secs: 10,
    };
    let pool = create_pool(path.to_str().expect("utf-8 temp path"), &config)
        .expect("Failed to create file pool");
    {
        let conn = pool.get().expect("Failed to get connection");
        init_db(&conn).expect("Failed to initialize schema");
    }
    pool
}

/// Create an AppState for testing with an in-memory database
pub fn create_test_app_state() -> AppState {
    let pool = create_memory_pool().expect("Failed to create memory pool");
    {
        let conn = pool.get().expect("Failed to get connection");
        init_db(&conn).expect("Failed to initialize schema");
    }
    AppState::new(pool, Some(TEST_API_KEY.to_string()))
}

/// Full router without rate limiting
pub fn test_app(state: AppState) -> Router {
    handlers::app(state, None)
}

pub async fn body_json(response: Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&body).expect("Response should be valid JSON")
}
