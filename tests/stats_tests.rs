// SPDX-License-Identifier: MIT

//! Dashboard stats are scoped by the same visibility filter as lists.

use axum::http::StatusCode;
use tower::ServiceExt;

mod common;

async fn seed_lead(app: &axum::Router, state: &leadflow::AppState, creator: &str, lead_type: &str) {
    let token = common::token_for(state, creator);
    let response = app
        .clone()
        .oneshot(common::json_request(
            "POST",
            "/api/leads",
            &token,
            serde_json::json!({
                "name": "Prospect",
                "number": "+91 90000 00009",
                "leadType": lead_type,
                "source": "facebook",
                "service": "app"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

async fn stats_for(app: &axum::Router, state: &leadflow::AppState, user: &str) -> serde_json::Value {
    let token = common::token_for(state, user);
    let response = app
        .clone()
        .oneshot(common::auth_request("GET", "/api/stats", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    common::body_json(response).await
}

#[tokio::test]
async fn admin_stats_cover_everything() {
    let (app, state) = common::create_test_app().await;
    seed_lead(&app, &state, "clr-001", "hot").await;
    seed_lead(&app, &state, "clr-004", "cold").await;

    let stats = stats_for(&app, &state, "admin-001").await;
    assert_eq!(stats["totalLeads"], 2);
    assert_eq!(stats["totalUsers"], 10);
    assert_eq!(stats["leadsByStatus"]["new"], 2);
    assert_eq!(stats["leadsByType"]["hot"], 1);
    assert_eq!(stats["leadsByType"]["cold"], 1);
    assert_eq!(stats["usersByRole"]["caller"], 6);
    assert_eq!(stats["usersByRole"]["manager"], 2);
}

#[tokio::test]
async fn manager_stats_count_only_their_team() {
    let (app, state) = common::create_test_app().await;
    seed_lead(&app, &state, "clr-001", "hot").await;
    seed_lead(&app, &state, "clr-004", "cold").await;

    let stats = stats_for(&app, &state, "mgr-001").await;
    assert_eq!(stats["totalLeads"], 1);
    assert_eq!(stats["leadsByType"]["hot"], 1);
    assert!(stats["leadsByType"].get("cold").is_none());
}

#[tokio::test]
async fn caller_with_no_leads_sees_zero() {
    let (app, state) = common::create_test_app().await;
    seed_lead(&app, &state, "clr-001", "warm").await;

    let stats = stats_for(&app, &state, "clr-002").await;
    assert_eq!(stats["totalLeads"], 0);
    assert!(stats["leadsByStatus"].as_object().unwrap().is_empty());
}
