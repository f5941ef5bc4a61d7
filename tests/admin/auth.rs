//! API key enforcement on admin routes

use axum::{body::Body, http::Request, http::StatusCode};
use tower::ServiceExt;

#[path = "../common/mod.rs"]
mod common;
use common::*;

fn verify_request(header: Option<(&str, &str)>) -> Request<Body> {
    let mut builder = Request::builder().uri("/api/token/verify");
    if let Some((name, value)) = header {
        builder = builder.header(name, value);
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_missing_key_is_unauthorized() {
    let app = test_app(create_test_app_state());

    let response = app.oneshot(verify_request(None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(response).await;
    assert_eq!(json["reason"], "unauthorized");
}

#[tokio::test]
async fn test_wrong_key_is_forbidden() {
    let app = test_app(create_test_app_state());

    let response = app
        .oneshot(verify_request(Some(("X-API-Key", "wrong-key"))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let json = body_json(response).await;
    assert_eq!(json["reason"], "forbidden");
    assert_eq!(json["message"], "Invalid API key");
}

#[tokio::test]
async fn test_accepts_x_api_key_header() {
    let app = test_app(create_test_app_state());

    let response = app
        .oneshot(verify_request(Some(("X-API-Key", TEST_API_KEY))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["valid"], true);
    assert_eq!(json["message"], "Token valid");
}

#[tokio::test]
async fn test_accepts_authorization_header_with_and_without_bearer() {
    let state = create_test_app_state();
    let bearer = format!("Bearer {}", TEST_API_KEY);

    for value in [bearer.as_str(), TEST_API_KEY] {
        let response = test_app(state.clone())
            .oneshot(verify_request(Some(("Authorization", value))))
            .await
            .unwrap();
        assert_eq!(
            response.status(),
            StatusCode::OK,
            "Authorization: {} should be accepted",
            value
        );
    }
}

#[tokio::test]
async fn test_unconfigured_key_rejects_everything() {
    let mut state = create_test_app_state();
    state.api_key = None;

    let response = test_app(state)
        .oneshot(verify_request(Some(("X-API-Key", TEST_API_KEY))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_writes_require_key() {
    let app = test_app(create_test_app_state());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/licenca/add")
                .header("content-type", "application/json")
                .body(Body::from(
                    r#"{"license_key":"SNEAKY","owner":"x","email":"y"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_path_without_key_is_404() {
    let app = test_app(create_test_app_state());

    let response = app
        .oneshot(Request::builder().uri("/api/licenca/typo").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(
        response.status(),
        StatusCode::NOT_FOUND,
        "the API key gate should only guard matched admin routes"
    );
}
