// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod lead;
pub mod user;

pub use lead::{CallReminder, Comment, Lead, LeadAssignment, LeadSource, LeadStatus, LeadType, ServiceType};
pub use user::{Role, User};
