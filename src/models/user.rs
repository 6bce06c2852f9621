// SPDX-License-Identifier: MIT

//! User model and the four-tier role hierarchy.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Organizational role. The set is closed: visibility and assignment
/// rules match exhaustively on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Role {
    Caller,
    Manager,
    TeamLeader,
    Admin,
}

impl Role {
    /// The structurally-correct supervisor role for this role, if any.
    /// Admin sits at the root and has no stored reporting edge.
    pub fn parent_role(self) -> Option<Role> {
        match self {
            Role::Caller => Some(Role::Manager),
            Role::Manager => Some(Role::TeamLeader),
            Role::TeamLeader => Some(Role::Admin),
            Role::Admin => None,
        }
    }

    /// Human-readable label, used when synthesizing activity comments.
    pub fn label(self) -> &'static str {
        match self {
            Role::Caller => "Caller",
            Role::Manager => "Manager",
            Role::TeamLeader => "Team Leader",
            Role::Admin => "Administrator",
        }
    }
}

/// User record stored in the users collection.
///
/// Wire field names are camelCase to match the JSON the frontend and the
/// remote store already exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct User {
    /// Opaque unique identifier (also the document key)
    pub id: String,
    /// Display name
    pub name: String,
    /// Email address, unique; looked up case-insensitively at login
    pub email: String,
    /// Phone number
    pub phone: String,
    /// Plain credential, compared verbatim (no hashing in this design)
    pub password: String,
    /// Organizational role
    pub role: Role,
    /// ID of the direct supervisor, absent for admins
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporting_to: Option<String>,
    /// Deactivation flag; users are never physically deleted
    pub is_active: bool,
    /// Creation timestamp (RFC3339)
    pub created_at: String,
}
