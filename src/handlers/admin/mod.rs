mod licenses;

pub use licenses::*;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::db::AppState;
use crate::middleware::require_api_key;

/// Admin routes, all behind the API key check. Unmatched paths fall through
/// to the 404 fallback without it.
pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/token/verify", get(verify_token))
        .route("/api/licenca/add", post(add_license))
        .route("/api/licenca/deactivate", post(deactivate_hardware))
        .route_layer(middleware::from_fn_with_state(state, require_api_key))
}
