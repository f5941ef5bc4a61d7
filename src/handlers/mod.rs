pub mod admin;
pub mod public;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::config::RateLimitConfig;
use crate::db::AppState;

/// Full application router.
pub fn app(state: AppState, rate_limit: Option<RateLimitConfig>) -> Router {
    Router::new()
        .merge(public::router(rate_limit))
        .merge(admin::router(state.clone()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
