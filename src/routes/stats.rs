// SPDX-License-Identifier: MIT

//! Dashboard statistics, aggregated over the caller's visible leads.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::services::visible_leads;
use crate::AppState;
use axum::{extract::State, routing::get, Extension, Json, Router};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/stats", get(get_stats))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct StatsResponse {
    pub total_leads: usize,
    pub total_users: usize,
    pub leads_by_status: BTreeMap<String, usize>,
    pub leads_by_type: BTreeMap<String, usize>,
    pub users_by_role: BTreeMap<String, usize>,
    pub pending_reminders: usize,
}

/// The enum's wire string, for use as an aggregation key.
fn wire_name<T: Serialize>(value: &T) -> String {
    serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

/// Dashboard counts. Lead aggregations are computed only over the leads
/// the acting user may see; the visibility filter is never bypassed.
async fn get_stats(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<StatsResponse>> {
    let user = super::acting_user(&state, &auth).await?;
    let leads = state.store.list_leads().await;
    let users = state.store.list_users().await;

    let visible = visible_leads(&user, &leads, &users);

    let mut leads_by_status = BTreeMap::new();
    let mut leads_by_type = BTreeMap::new();
    let mut pending_reminders = 0;
    for lead in &visible {
        *leads_by_status.entry(wire_name(&lead.status)).or_insert(0) += 1;
        *leads_by_type.entry(wire_name(&lead.lead_type)).or_insert(0) += 1;
        pending_reminders += lead.reminders.iter().filter(|r| !r.completed).count();
    }

    let mut users_by_role = BTreeMap::new();
    for u in &users {
        *users_by_role.entry(wire_name(&u.role)).or_insert(0) += 1;
    }

    Ok(Json(StatsResponse {
        total_leads: visible.len(),
        total_users: users.len(),
        leads_by_status,
        leads_by_type,
        users_by_role,
        pending_reminders,
    }))
}
