// SPDX-License-Identifier: MIT

use axum::body::Body;
use axum::http::{header, Request, Response};
use leadflow::config::Config;
use leadflow::db::Store;
use leadflow::middleware::auth::create_jwt;
use leadflow::routes::create_router;
use leadflow::AppState;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

static TEST_SEQ: AtomicU32 = AtomicU32::new(0);

/// Create a test app over an offline store seeded with the demo
/// hierarchy, using a unique data directory per call.
#[allow(dead_code)]
pub async fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let dir = format!(
        "{}-{}",
        config.data_dir,
        TEST_SEQ.fetch_add(1, Ordering::Relaxed)
    );
    let _ = std::fs::remove_dir_all(&dir);

    let store = Store::new_offline(&dir);
    store.replace_all_users(leadflow::demo::demo_users()).await;

    let state = Arc::new(AppState { config, store });
    (create_router(state.clone()), state)
}

/// JWT for one of the seeded demo users.
#[allow(dead_code)]
pub fn token_for(state: &AppState, user_id: &str) -> String {
    create_jwt(user_id, &state.config.jwt_signing_key).expect("JWT creation failed")
}

/// Build an authenticated JSON request.
#[allow(dead_code)]
pub fn json_request(method: &str, uri: &str, token: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Build an authenticated bodyless request.
#[allow(dead_code)]
pub fn auth_request(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

/// Collect a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body is not valid JSON")
}
