// SPDX-License-Identifier: MIT

//! File-backed local snapshot of both collections.
//!
//! This is the fallback half of the dual-path storage design: the last
//! successfully fetched state lives here, and writes land here first so
//! the server keeps working when the remote collaborator is down. File
//! persistence failures are logged, never fatal.

use crate::models::{Lead, User};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

const LEADS_FILE: &str = "leads.json";
const USERS_FILE: &str = "users.json";

/// In-memory collections plus their JSON files on disk. Insertion order
/// is preserved: the collections are arrays, not maps, because list
/// responses must keep stored order.
pub struct JsonCache {
    dir: PathBuf,
    leads: RwLock<Vec<Lead>>,
    users: RwLock<Vec<User>>,
}

fn load_file<T: DeserializeOwned>(path: &Path) -> Vec<T> {
    match std::fs::read_to_string(path) {
        Ok(data) => match serde_json::from_str(&data) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable cache file");
                Vec::new()
            }
        },
        Err(_) => Vec::new(),
    }
}

impl JsonCache {
    /// Open (or initialize) the cache under `dir`.
    pub fn open(dir: &str) -> Self {
        let dir = PathBuf::from(dir);
        if let Err(e) = std::fs::create_dir_all(&dir) {
            tracing::warn!(dir = %dir.display(), error = %e, "Could not create data directory");
        }

        let leads = load_file(&dir.join(LEADS_FILE));
        let users = load_file(&dir.join(USERS_FILE));
        tracing::info!(
            leads = leads.len(),
            users = users.len(),
            dir = %dir.display(),
            "Local cache loaded"
        );

        Self {
            dir,
            leads: RwLock::new(leads),
            users: RwLock::new(users),
        }
    }

    fn persist<T: Serialize>(&self, file: &str, records: &[T]) {
        let path = self.dir.join(file);
        let json = match serde_json::to_string_pretty(records) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize cache");
                return;
            }
        };
        if let Err(e) = std::fs::write(&path, json) {
            tracing::warn!(path = %path.display(), error = %e, "Failed to persist cache file");
        }
    }

    // ─── Leads ───────────────────────────────────────────────────

    pub fn list_leads(&self) -> Vec<Lead> {
        self.leads.read().expect("cache lock poisoned").clone()
    }

    pub fn get_lead(&self, id: &str) -> Option<Lead> {
        self.leads
            .read()
            .expect("cache lock poisoned")
            .iter()
            .find(|l| l.id == id)
            .cloned()
    }

    /// Insert or replace a lead. New leads go to the front, matching the
    /// remote collaborator's newest-first ordering.
    pub fn upsert_lead(&self, lead: Lead) {
        let snapshot = {
            let mut leads = self.leads.write().expect("cache lock poisoned");
            match leads.iter_mut().find(|l| l.id == lead.id) {
                Some(existing) => *existing = lead,
                None => leads.insert(0, lead),
            }
            leads.clone()
        };
        self.persist(LEADS_FILE, &snapshot);
    }

    pub fn replace_leads(&self, records: Vec<Lead>) {
        let snapshot = {
            let mut leads = self.leads.write().expect("cache lock poisoned");
            *leads = records;
            leads.clone()
        };
        self.persist(LEADS_FILE, &snapshot);
    }

    // ─── Users ───────────────────────────────────────────────────

    pub fn list_users(&self) -> Vec<User> {
        self.users.read().expect("cache lock poisoned").clone()
    }

    pub fn get_user(&self, id: &str) -> Option<User> {
        self.users
            .read()
            .expect("cache lock poisoned")
            .iter()
            .find(|u| u.id == id)
            .cloned()
    }

    pub fn upsert_user(&self, user: User) {
        let snapshot = {
            let mut users = self.users.write().expect("cache lock poisoned");
            match users.iter_mut().find(|u| u.id == user.id) {
                Some(existing) => *existing = user,
                None => users.insert(0, user),
            }
            users.clone()
        };
        self.persist(USERS_FILE, &snapshot);
    }

    pub fn replace_users(&self, records: Vec<User>) {
        let snapshot = {
            let mut users = self.users.write().expect("cache lock poisoned");
            *users = records;
            users.clone()
        };
        self.persist(USERS_FILE, &snapshot);
    }
}
