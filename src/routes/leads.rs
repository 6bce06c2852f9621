// SPDX-License-Identifier: MIT

//! Lead routes. Every read filters through the visibility predicate;
//! reassignment additionally checks the role-based target rules.

use crate::error::{AppError, Result};
use crate::ids::fresh_id;
use crate::middleware::auth::AuthUser;
use crate::models::{
    CallReminder, Comment, Lead, LeadSource, LeadStatus, LeadType, Role, ServiceType,
};
use crate::services::{apply_assignment, can_assign_to, can_view, visible_leads};
use crate::time_utils::now_rfc3339;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/leads", get(list_leads).post(create_lead))
        .route("/api/leads/bulk", post(bulk_replace_leads))
        .route("/api/leads/{id}", get(get_lead).put(update_lead))
        .route("/api/leads/{id}/assign", post(assign_lead))
        .route("/api/leads/{id}/comments", post(add_comment))
        .route("/api/leads/{id}/reminders", post(add_reminder))
        .route("/api/leads/{id}/reminders/{rid}", put(toggle_reminder))
}

/// Fetch a lead the acting user may see; absent and invisible leads are
/// indistinguishable (both NotFound), so existence never leaks.
async fn visible_lead(state: &AppState, user: &crate::models::User, id: &str) -> Result<Lead> {
    let lead = state
        .store
        .get_lead(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Lead {id} not found")))?;

    let users = state.store.list_users().await;
    if !can_view(user, &lead, &users) {
        return Err(AppError::NotFound(format!("Lead {id} not found")));
    }
    Ok(lead)
}

/// Leads visible to the acting user, in stored order.
async fn list_leads(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<Lead>>> {
    let user = super::acting_user(&state, &auth).await?;
    let leads = state.store.list_leads().await;
    let users = state.store.list_users().await;

    let visible: Vec<Lead> = visible_leads(&user, &leads, &users)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(visible))
}

fn validate_optional_email(email: &str) -> std::result::Result<(), validator::ValidationError> {
    if email.is_empty() {
        return Ok(());
    }
    use validator::ValidateEmail;
    if email.validate_email() {
        Ok(())
    } else {
        let mut error = validator::ValidationError::new("email");
        error.message = Some("Invalid email format".into());
        Err(error)
    }
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLeadRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Phone number is required"))]
    pub number: String,
    #[serde(default)]
    #[validate(custom(function = validate_optional_email))]
    pub email: String,
    #[serde(default)]
    pub city: String,
    pub lead_type: LeadType,
    pub source: LeadSource,
    pub service: ServiceType,
    #[serde(default)]
    pub notes: String,
}

/// Create a lead. New leads start at status `new` with empty logs, the
/// creator as owner, and the team thread seeded with the creator.
async fn create_lead(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<CreateLeadRequest>,
) -> Result<(StatusCode, Json<Lead>)> {
    let user = super::acting_user(&state, &auth).await?;
    payload.validate()?;

    let lead = Lead {
        id: fresh_id(),
        name: payload.name,
        number: payload.number,
        email: payload.email,
        city: payload.city,
        lead_type: payload.lead_type,
        source: payload.source,
        service: payload.service,
        notes: payload.notes,
        status: LeadStatus::New,
        comments: Vec::new(),
        reminders: Vec::new(),
        created_at: now_rfc3339(),
        created_by: Some(user.id.clone()),
        created_by_name: Some(user.name.clone()),
        assigned_to: Some(user.id.clone()),
        assigned_to_name: Some(user.name.clone()),
        assignment_history: Vec::new(),
        team_thread: vec![user.id.clone()],
    };

    state.store.put_lead(&lead).await;
    tracing::info!(lead_id = %lead.id, created_by = %user.id, "Lead created");

    Ok((StatusCode::CREATED, Json(lead)))
}

async fn get_lead(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Lead>> {
    let user = super::acting_user(&state, &auth).await?;
    let lead = visible_lead(&state, &user, &id).await?;
    Ok(Json(lead))
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLeadRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "Phone number is required"))]
    pub number: Option<String>,
    pub email: Option<String>,
    pub city: Option<String>,
    pub lead_type: Option<LeadType>,
    pub source: Option<LeadSource>,
    pub service: Option<ServiceType>,
    pub notes: Option<String>,
    pub status: Option<LeadStatus>,
}

/// Edit contact, classification, notes, status, and type. Status and
/// type are plain labels with no transition graph, any value may follow
/// any other. Ownership and log fields are not writable here.
async fn update_lead(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateLeadRequest>,
) -> Result<Json<Lead>> {
    let user = super::acting_user(&state, &auth).await?;
    payload.validate()?;
    // Visibility gate before any mutation.
    visible_lead(&state, &user, &id).await?;

    let updated = state
        .store
        .update_lead_with(&id, move |mut lead| {
            if let Some(name) = payload.name {
                lead.name = name;
            }
            if let Some(number) = payload.number {
                lead.number = number;
            }
            if let Some(email) = payload.email {
                lead.email = email;
            }
            if let Some(city) = payload.city {
                lead.city = city;
            }
            if let Some(lead_type) = payload.lead_type {
                lead.lead_type = lead_type;
            }
            if let Some(source) = payload.source {
                lead.source = source;
            }
            if let Some(service) = payload.service {
                lead.service = service;
            }
            if let Some(notes) = payload.notes {
                lead.notes = notes;
            }
            if let Some(status) = payload.status {
                lead.status = status;
            }
            Ok(lead)
        })
        .await?;

    Ok(Json(updated))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
    pub to_user_id: String,
    #[serde(default)]
    pub reason: String,
}

/// Reassign a lead. Preconditions: the lead is visible to the acting
/// user and the target is in their assignable set. All four effects
/// (history, owner, thread, activity comment) land in one atomic
/// record update.
async fn assign_lead(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(payload): Json<AssignRequest>,
) -> Result<Json<Lead>> {
    let user = super::acting_user(&state, &auth).await?;
    visible_lead(&state, &user, &id).await?;

    let users = state.store.list_users().await;
    let target = users
        .iter()
        .find(|u| u.id == payload.to_user_id)
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", payload.to_user_id)))?
        .clone();

    if !can_assign_to(&user, &target, &users) {
        return Err(AppError::InvalidAssignee(format!(
            "You may not assign leads to {}",
            target.name
        )));
    }

    let updated = state
        .store
        .update_lead_with(&id, move |lead| {
            Ok(apply_assignment(
                lead,
                &user,
                &target,
                payload.reason.trim(),
                fresh_id(),
                fresh_id(),
                now_rfc3339(),
            ))
        })
        .await?;

    tracing::info!(
        lead_id = %id,
        to_user = %payload.to_user_id,
        "Lead reassigned"
    );
    Ok(Json(updated))
}

#[derive(Deserialize, Validate)]
pub struct CommentRequest {
    #[validate(length(min = 1, message = "Comment text is required"))]
    pub text: String,
}

async fn add_comment(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(payload): Json<CommentRequest>,
) -> Result<Json<Lead>> {
    let user = super::acting_user(&state, &auth).await?;
    payload.validate()?;
    visible_lead(&state, &user, &id).await?;

    let updated = state
        .store
        .update_lead_with(&id, move |mut lead| {
            lead.comments.push(Comment {
                id: fresh_id(),
                text: payload.text.trim().to_string(),
                created_at: now_rfc3339(),
                user_id: Some(user.id),
                user_name: Some(user.name),
            });
            Ok(lead)
        })
        .await?;

    Ok(Json(updated))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderRequest {
    pub date_time: String,
    #[serde(default)]
    pub note: String,
}

async fn add_reminder(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(payload): Json<ReminderRequest>,
) -> Result<Json<Lead>> {
    let user = super::acting_user(&state, &auth).await?;
    visible_lead(&state, &user, &id).await?;

    // Timestamps are RFC3339 on the wire; reject anything else up front.
    if chrono::DateTime::parse_from_rfc3339(&payload.date_time).is_err() {
        return Err(AppError::BadRequest(
            "Invalid reminder dateTime: must be RFC3339".to_string(),
        ));
    }

    let updated = state
        .store
        .update_lead_with(&id, move |mut lead| {
            lead.reminders.push(CallReminder {
                id: fresh_id(),
                date_time: payload.date_time,
                note: payload.note,
                completed: false,
            });
            Ok(lead)
        })
        .await?;

    Ok(Json(updated))
}

/// Toggle a reminder's completed flag.
async fn toggle_reminder(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path((id, reminder_id)): Path<(String, String)>,
) -> Result<Json<Lead>> {
    let user = super::acting_user(&state, &auth).await?;
    visible_lead(&state, &user, &id).await?;

    let updated = state
        .store
        .update_lead_with(&id, move |mut lead| {
            let reminder = lead
                .reminders
                .iter_mut()
                .find(|r| r.id == reminder_id)
                .ok_or_else(|| AppError::NotFound(format!("Reminder {reminder_id} not found")))?;
            reminder.completed = !reminder.completed;
            Ok(lead)
        })
        .await?;

    Ok(Json(updated))
}

/// Replace the whole lead collection. Admin only; serialized against
/// individual record writes by the store.
async fn bulk_replace_leads(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(leads): Json<Vec<Lead>>,
) -> Result<Json<serde_json::Value>> {
    let actor = super::acting_user(&state, &auth).await?;
    if actor.role != Role::Admin {
        return Err(AppError::Forbidden(
            "Only admins may bulk-replace leads".to_string(),
        ));
    }

    let count = leads.len();
    state.store.replace_all_leads(leads).await;
    Ok(Json(serde_json::json!({ "success": true, "count": count })))
}
