//! Tests for the index and health endpoints

use axum::{body::Body, http::Request, http::StatusCode};
use tower::ServiceExt;

#[path = "../common/mod.rs"]
mod common;
use common::*;

#[tokio::test]
async fn test_index_describes_service() {
    let app = test_app(create_test_app_state());

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["service"], "hwlicense");
    assert_eq!(json["status"], "online");
    assert_eq!(json["endpoints"]["validate"], "GET /api/licenca?key=&uuid=&disk=");
}

#[tokio::test]
async fn test_health_reports_database_connected() {
    let app = test_app(create_test_app_state());

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["database"], "connected");
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = test_app(create_test_app_state());

    let response = app
        .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
