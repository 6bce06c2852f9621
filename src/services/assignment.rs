// SPDX-License-Identifier: MIT

//! Reassignment rules and the assignment transform.
//!
//! The target rules are intentionally asymmetric from visibility: a
//! caller escalates up to their manager, a manager escalates up to their
//! team leader or delegates down to their callers, a team leader
//! delegates anywhere in their two-level team, an admin is unconstrained.

use crate::models::{Comment, Lead, LeadAssignment, Role, User};
use crate::services::hierarchy::OrgChart;

/// All users the acting user may hand a lead to.
pub fn assignable_targets<'a>(user: &User, users: &'a [User]) -> Vec<&'a User> {
    let chart = OrgChart::new(users);

    match user.role {
        Role::Caller => {
            // Only their own manager.
            user.reporting_to
                .as_deref()
                .and_then(|id| chart.get(id))
                .into_iter()
                .collect()
        }
        Role::Manager => {
            let mut targets: Vec<&User> = user
                .reporting_to
                .as_deref()
                .and_then(|id| chart.get(id))
                .into_iter()
                .collect();
            targets.extend(
                users
                    .iter()
                    .filter(|u| u.role == Role::Caller && u.reporting_to.as_deref() == Some(user.id.as_str())),
            );
            targets
        }
        Role::TeamLeader => {
            let managers: Vec<&User> = users
                .iter()
                .filter(|u| {
                    u.role == Role::Manager && u.reporting_to.as_deref() == Some(user.id.as_str())
                })
                .collect();

            let callers = users.iter().filter(|u| {
                u.role == Role::Caller
                    && u.reporting_to
                        .as_deref()
                        .is_some_and(|r| managers.iter().any(|m| m.id == r))
            });

            managers.clone().into_iter().chain(callers).collect()
        }
        Role::Admin => users.iter().filter(|u| u.id != user.id).collect(),
    }
}

/// Whether `from` may hand a lead to `to`.
pub fn can_assign_to(from: &User, to: &User, users: &[User]) -> bool {
    assignable_targets(from, users).iter().any(|u| u.id == to.id)
}

/// Apply a reassignment to a lead, producing the updated record.
///
/// Four effects, applied together: history entry appended, owner
/// snapshot updated, both parties added to the team thread (from first,
/// duplicates skipped), and a synthesized activity comment. The caller
/// is responsible for checking [`can_assign_to`] first and for writing
/// the result back atomically.
pub fn apply_assignment(
    mut lead: Lead,
    from: &User,
    to: &User,
    reason: &str,
    assignment_id: String,
    comment_id: String,
    now: String,
) -> Lead {
    lead.assignment_history.push(LeadAssignment {
        id: assignment_id,
        from_user_id: from.id.clone(),
        from_user_name: from.name.clone(),
        to_user_id: to.id.clone(),
        to_user_name: to.name.clone(),
        reason: reason.to_string(),
        assigned_at: now.clone(),
    });

    lead.assigned_to = Some(to.id.clone());
    lead.assigned_to_name = Some(to.name.clone());

    lead.add_to_thread(&from.id);
    lead.add_to_thread(&to.id);

    let text = if reason.is_empty() {
        format!("Lead assigned to {} ({})", to.name, to.role.label())
    } else {
        format!(
            "Lead assigned to {} ({}). Reason: {}",
            to.name,
            to.role.label(),
            reason
        )
    };
    lead.comments.push(Comment {
        id: comment_id,
        text,
        created_at: now,
        user_id: Some(from.id.clone()),
        user_name: Some(from.name.clone()),
    });

    lead
}
