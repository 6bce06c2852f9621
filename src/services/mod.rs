// SPDX-License-Identifier: MIT

//! Domain logic: org-chart queries, the visibility predicate, and the
//! assignment rules. All pure functions over in-memory collections.

pub mod assignment;
pub mod hierarchy;
pub mod visibility;

pub use assignment::{apply_assignment, assignable_targets, can_assign_to};
pub use hierarchy::OrgChart;
pub use visibility::{can_view, visible_leads};
