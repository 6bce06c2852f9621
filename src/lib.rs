// SPDX-License-Identifier: MIT

//! Leadflow: role-based lead management backend.
//!
//! This crate provides the API for tracking sales leads through a
//! pipeline while restricting visibility and assignment of each lead
//! according to a four-tier hierarchy (caller, manager, team leader,
//! admin).

pub mod config;
pub mod db;
pub mod demo;
pub mod error;
pub mod ids;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::Store;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: Store,
}
