// SPDX-License-Identifier: MIT

//! User management routes: profile, directory, creation, and the
//! assignment/hierarchy queries the frontend drives its pickers with.

use crate::error::{AppError, Result};
use crate::ids::fresh_id;
use crate::middleware::auth::AuthUser;
use crate::models::{Role, User};
use crate::services::{assignable_targets, OrgChart};
use crate::time_utils::now_rfc3339;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Extension, Json, Router,
};
use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Cow;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::{Validate, ValidationError, ValidationErrors};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me))
        .route("/api/users", get(list_users).post(create_user))
        .route("/api/users/assignable", get(list_assignable))
        .route("/api/users/bulk", post(bulk_replace_users))
        .route("/api/users/{id}", put(update_user))
        .route("/api/users/{id}/team", get(get_team))
}

/// User record with the credential stripped, as returned to clients.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reporting_to: Option<String>,
    pub is_active: bool,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            role: user.role,
            reporting_to: user.reporting_to,
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}

/// Current user profile.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<UserResponse>> {
    let user = super::acting_user(&state, &auth).await?;
    Ok(Json(user.into()))
}

/// Full user directory. Role-gated like the original's Users page.
async fn list_users(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<UserResponse>>> {
    let user = super::acting_user(&state, &auth).await?;
    if !matches!(user.role, Role::Admin | Role::TeamLeader) {
        return Err(AppError::Forbidden(
            "Only admins and team leaders may list users".to_string(),
        ));
    }

    let users = state.store.list_users().await;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Phone is required"))]
    pub phone: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    pub role: Role,
    #[serde(default)]
    pub reporting_to: Option<String>,
}

/// Structural rule the derive can't express: callers and managers must
/// carry a reporting edge.
fn check_reporting_edge(role: Role, reporting_to: Option<&str>) -> Result<()> {
    let missing = reporting_to.map_or(true, |r| r.is_empty());
    if !missing {
        return Ok(());
    }

    let message: Option<&'static str> = match role {
        Role::Caller => Some("Caller must report to a manager"),
        Role::Manager => Some("Manager must report to a Team Leader"),
        Role::TeamLeader | Role::Admin => None,
    };

    if let Some(message) = message {
        let mut errors = ValidationErrors::new();
        let mut error = ValidationError::new("required");
        error.message = Some(Cow::Borrowed(message));
        errors.add("reportingTo", error);
        return Err(AppError::Validation(errors));
    }
    Ok(())
}

/// Create a user. Admin only; validation failures are reported
/// field-by-field and nothing is partially applied.
async fn create_user(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(axum::http::StatusCode, Json<UserResponse>)> {
    let actor = super::acting_user(&state, &auth).await?;
    if actor.role != Role::Admin {
        return Err(AppError::Forbidden("Only admins may create users".to_string()));
    }

    payload.validate()?;
    check_reporting_edge(payload.role, payload.reporting_to.as_deref())?;

    if state.store.find_user_by_email(&payload.email).await.is_some() {
        let mut errors = ValidationErrors::new();
        let mut error = ValidationError::new("unique");
        error.message = Some(Cow::Borrowed("Email already in use"));
        errors.add("email", error);
        return Err(AppError::Validation(errors));
    }

    let user = User {
        id: fresh_id(),
        name: payload.name,
        email: payload.email,
        phone: payload.phone,
        password: payload.password,
        role: payload.role,
        reporting_to: payload.reporting_to.filter(|r| !r.is_empty()),
        is_active: true,
        created_at: now_rfc3339(),
    };

    state.store.put_user(&user).await;
    tracing::info!(user_id = %user.id, role = ?user.role, "User created");

    Ok((axum::http::StatusCode::CREATED, Json(user.into())))
}

/// Distinguishes "field absent" (keep) from "field null" (clear).
fn double_option<'de, D>(deserializer: D) -> std::result::Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "Phone is required"))]
    pub phone: Option<String>,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: Option<String>,
    pub role: Option<Role>,
    #[serde(default, deserialize_with = "double_option")]
    pub reporting_to: Option<Option<String>>,
    pub is_active: Option<bool>,
}

/// Update a user. Admin only. Deactivation (`isActive: false`) is the
/// removal mechanism; there is no delete route.
async fn update_user(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>> {
    let actor = super::acting_user(&state, &auth).await?;
    if actor.role != Role::Admin {
        return Err(AppError::Forbidden("Only admins may update users".to_string()));
    }

    payload.validate()?;

    let mut user = state
        .store
        .get_user(&id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("User {id} not found")))?;

    if let Some(name) = payload.name {
        user.name = name;
    }
    if let Some(email) = payload.email {
        user.email = email;
    }
    if let Some(phone) = payload.phone {
        user.phone = phone;
    }
    if let Some(password) = payload.password {
        user.password = password;
    }
    if let Some(role) = payload.role {
        user.role = role;
    }
    if let Some(reporting_to) = payload.reporting_to {
        user.reporting_to = reporting_to.filter(|r| !r.is_empty());
    }
    if let Some(is_active) = payload.is_active {
        user.is_active = is_active;
    }

    check_reporting_edge(user.role, user.reporting_to.as_deref())?;

    state.store.put_user(&user).await;
    Ok(Json(user.into()))
}

/// Legal reassignment targets for the acting user. Only active users
/// are offered, matching the original's assignment picker.
async fn list_assignable(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<UserResponse>>> {
    let user = super::acting_user(&state, &auth).await?;
    let users = state.store.list_users().await;

    let targets: Vec<UserResponse> = assignable_targets(&user, &users)
        .into_iter()
        .filter(|u| u.is_active)
        .cloned()
        .map(UserResponse::from)
        .collect();
    Ok(Json(targets))
}

/// Role-aware descendant set of a user.
async fn get_team(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Vec<UserResponse>>> {
    let actor = super::acting_user(&state, &auth).await?;
    let allowed = matches!(actor.role, Role::Admin | Role::TeamLeader) || actor.id == id;
    if !allowed {
        return Err(AppError::Forbidden(
            "Not permitted to view this team".to_string(),
        ));
    }

    let users = state.store.list_users().await;
    let subject = users
        .iter()
        .find(|u| u.id == id)
        .ok_or_else(|| AppError::NotFound(format!("User {id} not found")))?;

    let team: Vec<UserResponse> = OrgChart::new(&users)
        .descendants_of(subject)
        .into_iter()
        .cloned()
        .map(UserResponse::from)
        .collect();
    Ok(Json(team))
}

/// Replace the whole user collection. Admin only; serialized against
/// individual record writes by the store.
async fn bulk_replace_users(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(users): Json<Vec<User>>,
) -> Result<Json<serde_json::Value>> {
    let actor = super::acting_user(&state, &auth).await?;
    if actor.role != Role::Admin {
        return Err(AppError::Forbidden(
            "Only admins may bulk-replace users".to_string(),
        ));
    }

    let count = users.len();
    state.store.replace_all_users(users).await;
    Ok(Json(serde_json::json!({ "success": true, "count": count })))
}
