mod info;
mod validate;

pub use info::*;
pub use validate::*;

use axum::{Router, extract::State, routing::get};
use serde::Serialize;

use crate::config::RateLimitConfig;
use crate::db::{AppState, queries, run_blocking};
use crate::extractors::Json;
use crate::rate_limit::{self, Tier};

const SERVICE_NAME: &str = "hwlicense";

#[derive(Serialize)]
struct IndexResponse {
    service: &'static str,
    version: &'static str,
    status: &'static str,
    endpoints: Endpoints,
}

#[derive(Serialize)]
struct Endpoints {
    validate: &'static str,
    info: &'static str,
    add: &'static str,
    deactivate: &'static str,
    verify_token: &'static str,
    health: &'static str,
}

async fn index() -> Json<IndexResponse> {
    Json(IndexResponse {
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        status: "online",
        endpoints: Endpoints {
            validate: "GET /api/licenca?key=&uuid=&disk=",
            info: "GET /api/licenca/info?key=",
            add: "POST /api/licenca/add",
            deactivate: "POST /api/licenca/deactivate",
            verify_token: "GET /api/token/verify",
            health: "GET /health",
        },
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    database: &'static str,
    timestamp: String,
}

/// Reports `unhealthy` rather than failing when the database does not answer.
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let connected = match run_blocking(&state.db, |conn| queries::ping(conn)).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Health check database ping failed: {}", e);
            false
        }
    };

    Json(HealthResponse {
        status: if connected { "healthy" } else { "unhealthy" },
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        database: if connected { "connected" } else { "disconnected" },
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Public routes. Pass `None` to skip rate limiting (tests drive the router
/// without peer addresses).
pub fn router(limits: Option<RateLimitConfig>) -> Router<AppState> {
    let lookups = Router::new()
        .route("/api/licenca", get(validate_license))
        .route("/api/licenca/info", get(get_license_info));
    let probes = Router::new()
        .route("/", get(index))
        .route("/health", get(health));

    match limits {
        Some(limits) => lookups
            .route_layer(rate_limit::layer(Tier::Lookup, &limits))
            .merge(probes.route_layer(rate_limit::layer(Tier::Probe, &limits))),
        None => lookups.merge(probes),
    }
}
