// SPDX-License-Identifier: MIT

//! Reassignment rules exercised through the HTTP API.

use axum::http::StatusCode;
use tower::ServiceExt;

mod common;

async fn create_lead_as(
    app: &axum::Router,
    state: &leadflow::AppState,
    creator_id: &str,
) -> String {
    let token = common::token_for(state, creator_id);
    let response = app
        .clone()
        .oneshot(common::json_request(
            "POST",
            "/api/leads",
            &token,
            serde_json::json!({
                "name": "Globex",
                "number": "+91 90000 00002",
                "leadType": "hot",
                "source": "linkedin",
                "service": "web_app"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    common::body_json(response).await["id"]
        .as_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn assignable_targets_per_role() {
    let (app, state) = common::create_test_app().await;

    let cases: [(&str, Vec<&str>); 4] = [
        ("clr-001", vec!["mgr-001"]),
        ("mgr-001", vec!["clr-001", "clr-002", "clr-003", "tl-001"]),
        (
            "tl-001",
            vec![
                "clr-001", "clr-002", "clr-003", "clr-004", "clr-005", "clr-006", "mgr-001",
                "mgr-002",
            ],
        ),
        (
            "admin-001",
            vec![
                "clr-001", "clr-002", "clr-003", "clr-004", "clr-005", "clr-006", "mgr-001",
                "mgr-002", "tl-001",
            ],
        ),
    ];

    for (user_id, expected) in cases {
        let token = common::token_for(&state, user_id);
        let response = app
            .clone()
            .oneshot(common::auth_request("GET", "/api/users/assignable", &token))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = common::body_json(response).await;
        let mut ids: Vec<String> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|u| u["id"].as_str().unwrap().to_string())
            .collect();
        ids.sort();
        assert_eq!(ids, expected, "wrong targets for {user_id}");
    }
}

#[tokio::test]
async fn inactive_users_are_not_offered_as_targets() {
    let (app, state) = common::create_test_app().await;

    let mut caller = state.store.get_user("clr-002").await.unwrap();
    caller.is_active = false;
    state.store.put_user(&caller).await;

    let token = common::token_for(&state, "mgr-001");
    let response = app
        .oneshot(common::auth_request("GET", "/api/users/assignable", &token))
        .await
        .unwrap();
    let body = common::body_json(response).await;
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["id"].as_str().unwrap())
        .collect();
    assert!(!ids.contains(&"clr-002"));
    assert!(ids.contains(&"clr-001"));
}

#[tokio::test]
async fn caller_escalates_to_own_manager() {
    let (app, state) = common::create_test_app().await;
    let lead_id = create_lead_as(&app, &state, "clr-001").await;
    let token = common::token_for(&state, "clr-001");

    let response = app
        .oneshot(common::json_request(
            "POST",
            &format!("/api/leads/{lead_id}/assign"),
            &token,
            serde_json::json!({ "toUserId": "mgr-001", "reason": "Needs pricing approval" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::body_json(response).await;
    assert_eq!(body["assignedTo"], "mgr-001");
    assert_eq!(body["assignedToName"], "Priya Sharma");
    assert_eq!(body["teamThread"], serde_json::json!(["clr-001", "mgr-001"]));

    let history = body["assignmentHistory"].as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["fromUserId"], "clr-001");
    assert_eq!(history[0]["toUserId"], "mgr-001");
    assert_eq!(history[0]["reason"], "Needs pricing approval");

    // The transfer is logged as an activity comment.
    let comments = body["comments"].as_array().unwrap();
    let text = comments.last().unwrap()["text"].as_str().unwrap();
    assert!(text.contains("Priya Sharma"));
    assert!(text.contains("Reason: Needs pricing approval"));
}

#[tokio::test]
async fn caller_cannot_assign_to_peer() {
    let (app, state) = common::create_test_app().await;
    let lead_id = create_lead_as(&app, &state, "clr-001").await;
    let token = common::token_for(&state, "clr-001");

    let response = app
        .clone()
        .oneshot(common::json_request(
            "POST",
            &format!("/api/leads/{lead_id}/assign"),
            &token,
            serde_json::json!({ "toUserId": "clr-002" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = common::body_json(response).await;
    assert_eq!(body["error"], "invalid_assignee");

    // The rejected attempt must not have mutated the lead.
    let lead = state.store.get_lead(&lead_id).await.unwrap();
    assert_eq!(lead.assigned_to.as_deref(), Some("clr-001"));
    assert!(lead.assignment_history.is_empty());
}

#[tokio::test]
async fn assigning_to_unknown_user_is_not_found() {
    let (app, state) = common::create_test_app().await;
    let lead_id = create_lead_as(&app, &state, "clr-001").await;
    let token = common::token_for(&state, "clr-001");

    let response = app
        .oneshot(common::json_request(
            "POST",
            &format!("/api/leads/{lead_id}/assign"),
            &token,
            serde_json::json!({ "toUserId": "no-such-user" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn escalated_lead_stays_visible_to_original_caller() {
    let (app, state) = common::create_test_app().await;
    let lead_id = create_lead_as(&app, &state, "clr-001").await;

    let token = common::token_for(&state, "clr-001");
    let response = app
        .clone()
        .oneshot(common::json_request(
            "POST",
            &format!("/api/leads/{lead_id}/assign"),
            &token,
            serde_json::json!({ "toUserId": "mgr-001", "reason": "escalating" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Reassigned away, but thread membership keeps the caller's access.
    let response = app
        .clone()
        .oneshot(common::auth_request(
            "GET",
            &format!("/api/leads/{lead_id}"),
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The other team's manager still sees nothing.
    let token = common::token_for(&state, "mgr-002");
    let response = app
        .oneshot(common::auth_request(
            "GET",
            &format!("/api/leads/{lead_id}"),
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_can_assign_across_teams() {
    let (app, state) = common::create_test_app().await;
    let lead_id = create_lead_as(&app, &state, "clr-001").await;
    let token = common::token_for(&state, "admin-001");

    let response = app
        .oneshot(common::json_request(
            "POST",
            &format!("/api/leads/{lead_id}/assign"),
            &token,
            serde_json::json!({ "toUserId": "clr-006" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::body_json(response).await;
    assert_eq!(body["assignedTo"], "clr-006");
    assert_eq!(
        body["teamThread"],
        serde_json::json!(["clr-001", "admin-001", "clr-006"])
    );
}
