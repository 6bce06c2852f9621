// SPDX-License-Identifier: MIT

//! Login flow and JWT gating.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use tower::ServiceExt;

mod common;

fn login_request(email: &str, password: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::json!({ "email": email, "password": password }).to_string(),
        ))
        .unwrap()
}

#[tokio::test]
async fn login_returns_token_and_sanitized_user() {
    let (app, _) = common::create_test_app().await;

    let response = app
        .oneshot(login_request("caller1@crm.com", "caller123"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|h| h.to_str().ok())
        .unwrap()
        .to_string();
    assert!(set_cookie.starts_with("leadflow_token="));
    assert!(set_cookie.contains("HttpOnly"));

    let body = common::body_json(response).await;
    assert!(body["token"].as_str().unwrap().contains('.'));
    assert_eq!(body["user"]["id"], "clr-001");
    assert_eq!(body["user"]["role"], "caller");
    // The credential never leaves the server.
    assert!(body["user"].get("password").is_none());
}

#[tokio::test]
async fn login_email_lookup_is_case_insensitive() {
    let (app, _) = common::create_test_app().await;

    let response = app
        .oneshot(login_request("  CALLER1@CRM.COM ", "caller123"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn login_rejects_wrong_password() {
    let (app, _) = common::create_test_app().await;

    let response = app
        .oneshot(login_request("caller1@crm.com", "wrong"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_rejects_unknown_email() {
    let (app, _) = common::create_test_app().await;

    let response = app
        .oneshot(login_request("nobody@crm.com", "caller123"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_rejects_inactive_account() {
    let (app, state) = common::create_test_app().await;

    let mut user = state.store.get_user("clr-001").await.unwrap();
    user.is_active = false;
    state.store.put_user(&user).await;

    let response = app
        .oneshot(login_request("caller1@crm.com", "caller123"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn protected_route_without_token_is_unauthorized() {
    let (app, _) = common::create_test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/me")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_route_with_invalid_token_is_unauthorized() {
    let (app, _) = common::create_test_app().await;

    let response = app
        .oneshot(common::auth_request("GET", "/api/me", "invalid.token.here"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn valid_token_resolves_current_user() {
    let (app, state) = common::create_test_app().await;
    let token = common::token_for(&state, "mgr-001");

    let response = app
        .oneshot(common::auth_request("GET", "/api/me", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::body_json(response).await;
    assert_eq!(body["id"], "mgr-001");
    assert_eq!(body["role"], "manager");
    assert_eq!(body["reportingTo"], "tl-001");
}

#[tokio::test]
async fn deactivated_user_token_stops_working_immediately() {
    let (app, state) = common::create_test_app().await;
    let token = common::token_for(&state, "clr-001");

    let mut user = state.store.get_user("clr-001").await.unwrap();
    user.is_active = false;
    state.store.put_user(&user).await;

    let response = app
        .oneshot(common::auth_request("GET", "/api/me", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_clears_session_cookie() {
    let (app, _) = common::create_test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/auth/logout")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|h| h.to_str().ok())
        .unwrap();
    assert!(set_cookie.starts_with("leadflow_token="));
}
