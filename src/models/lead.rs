// SPDX-License-Identifier: MIT

//! Lead model: pipeline record plus its append-only activity logs.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Pipeline stage. Deliberately a label, not a state machine: sales
/// pipelines are non-linear, so any status may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum LeadStatus {
    New,
    Contacted,
    Qualified,
    Proposal,
    Negotiation,
    Converted,
    Lost,
}

/// Temperature classification, freely mutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum LeadType {
    Hot,
    Warm,
    Cold,
}

/// Where the lead came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum LeadSource {
    GoogleAds,
    Facebook,
    Linkedin,
    EmailCampaign,
    Other,
}

/// Service the lead is interested in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum ServiceType {
    Website,
    Automation,
    Lp,
    App,
    WebApp,
    Other,
}

/// Free-text activity note on a lead (append-only).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Comment {
    pub id: String,
    pub text: String,
    /// RFC3339 timestamp
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
}

/// One entry in a lead's assignment history. Names are denormalized
/// snapshots captured at assignment time, not live joins.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LeadAssignment {
    pub id: String,
    pub from_user_id: String,
    pub from_user_name: String,
    pub to_user_id: String,
    pub to_user_name: String,
    pub reason: String,
    /// RFC3339 timestamp
    pub assigned_at: String,
}

/// Scheduled call-back reminder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CallReminder {
    pub id: String,
    /// RFC3339 timestamp of the scheduled call
    pub date_time: String,
    pub note: String,
    pub completed: bool,
}

/// Lead record stored in the leads collection.
///
/// Collection fields default to empty on deserialization so that
/// legacy-shaped records (written before thread tracking existed) load
/// without error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Lead {
    /// Opaque unique identifier (also the document key)
    pub id: String,
    pub name: String,
    /// Phone number
    pub number: String,
    pub email: String,
    pub city: String,
    pub lead_type: LeadType,
    pub source: LeadSource,
    pub service: ServiceType,
    pub notes: String,
    pub status: LeadStatus,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub reminders: Vec<CallReminder>,
    /// RFC3339 timestamp
    pub created_at: String,
    /// Creator snapshot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by_name: Option<String>,
    /// Current owner snapshot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to_name: Option<String>,
    /// Append-only record of every handoff
    #[serde(default)]
    pub assignment_history: Vec<LeadAssignment>,
    /// Everyone who has ever touched the lead via assignment.
    /// Insertion-ordered, deduplicated; a hard "always visible to" set.
    #[serde(default)]
    pub team_thread: Vec<String>,
}

impl Lead {
    /// Add a user to the team thread unless already present.
    pub fn add_to_thread(&mut self, user_id: &str) {
        if !self.team_thread.iter().any(|id| id == user_id) {
            self.team_thread.push(user_id.to_string());
        }
    }

    pub fn is_in_thread(&self, user_id: &str) -> bool {
        self.team_thread.iter().any(|id| id == user_id)
    }
}
