// SPDX-License-Identifier: MIT

//! Org-chart queries over the user collection.
//!
//! The reporting edges form a shallow forest: callers report to managers,
//! managers to team leaders, team leaders to the admin. Expansion is a
//! fixed two-step walk, never a recursive traversal, so a malformed cycle
//! in stored data cannot make these queries loop.

use crate::models::{Role, User};

/// Id-keyed view over a slice of users. Cheap to build per request; the
/// whole population is small and already in memory.
pub struct OrgChart<'a> {
    users: &'a [User],
}

impl<'a> OrgChart<'a> {
    pub fn new(users: &'a [User]) -> Self {
        Self { users }
    }

    pub fn get(&self, id: &str) -> Option<&'a User> {
        self.users.iter().find(|u| u.id == id)
    }

    /// Resolve a user's direct supervisor.
    ///
    /// The edge only counts when the referenced user exists and holds the
    /// structurally-correct parent role; a dangling or mis-typed
    /// `reporting_to` degrades to "unassigned" (None). Active status is
    /// not filtered here, display layers decide.
    pub fn parent_of(&self, user: &User) -> Option<&'a User> {
        let parent_id = user.reporting_to.as_deref()?;
        let expected = user.role.parent_role()?;
        self.get(parent_id).filter(|p| p.role == expected)
    }

    /// Direct reports of a user, regardless of their role.
    ///
    /// Matches the original data model where the manager visibility rule
    /// considers anyone with `reporting_to == manager.id`.
    pub fn direct_reports(&self, user_id: &str) -> Vec<&'a User> {
        self.users
            .iter()
            .filter(|u| u.reporting_to.as_deref() == Some(user_id))
            .collect()
    }

    /// Role-aware descendant expansion.
    ///
    /// - manager: their direct reports
    /// - team leader: their managers plus those managers' callers
    /// - caller / admin: empty (admin's "everyone" is handled by the
    ///   visibility rules, not here)
    pub fn descendants_of(&self, user: &User) -> Vec<&'a User> {
        match user.role {
            Role::Manager => self.direct_reports(&user.id),
            Role::TeamLeader => {
                let managers: Vec<&User> = self
                    .users
                    .iter()
                    .filter(|u| {
                        u.role == Role::Manager && u.reporting_to.as_deref() == Some(user.id.as_str())
                    })
                    .collect();

                let callers: Vec<&User> = self
                    .users
                    .iter()
                    .filter(|u| {
                        u.role == Role::Caller
                            && u.reporting_to
                                .as_deref()
                                .is_some_and(|r| managers.iter().any(|m| m.id == r))
                    })
                    .collect();

                managers.into_iter().chain(callers).collect()
            }
            Role::Caller | Role::Admin => Vec::new(),
        }
    }
}
