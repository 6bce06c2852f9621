// SPDX-License-Identifier: MIT

//! Dual-path store: remote collaborator first, local cache as fallback.
//!
//! Reads try the remote API and refresh the cache from what they get;
//! when the remote is unreachable they degrade to the cached snapshot.
//! Writes land in the cache first and are pushed to the remote
//! best-effort, so an outage never aborts an in-memory operation.
//!
//! Concurrency discipline:
//! - read-modify-write of a single lead runs under a per-lead async
//!   mutex ([`Store::update_lead_with`]), so two concurrent
//!   reassignments of the same lead cannot interleave and drop a
//!   history entry or a thread member;
//! - bulk replace-all takes the collection lock exclusively, individual
//!   record writes take it shared.

use crate::db::cache::JsonCache;
use crate::db::remote::RemoteStore;
use crate::error::AppError;
use crate::models::{Lead, User};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

pub struct Store {
    remote: Option<RemoteStore>,
    cache: JsonCache,
    lead_locks: DashMap<String, Arc<Mutex<()>>>,
    collection_lock: RwLock<()>,
}

impl Store {
    /// Build a store against a remote collaborator plus local cache.
    pub fn new(storage_api_url: Option<&str>, data_dir: &str) -> Result<Self, AppError> {
        let remote = match storage_api_url {
            Some(url) => {
                tracing::info!(url, "Using remote store with local cache fallback");
                Some(RemoteStore::new(url)?)
            }
            None => {
                tracing::info!("No remote store configured, running on local cache only");
                None
            }
        };

        Ok(Self {
            remote,
            cache: JsonCache::open(data_dir),
            lead_locks: DashMap::new(),
            collection_lock: RwLock::new(()),
        })
    }

    /// Local-cache-only store for tests.
    pub fn new_offline(data_dir: &str) -> Self {
        Self {
            remote: None,
            cache: JsonCache::open(data_dir),
            lead_locks: DashMap::new(),
            collection_lock: RwLock::new(()),
        }
    }

    fn lead_lock(&self, id: &str) -> Arc<Mutex<()>> {
        self.lead_locks
            .entry(id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    // ─── Leads ───────────────────────────────────────────────────

    pub async fn list_leads(&self) -> Vec<Lead> {
        let _guard = self.collection_lock.read().await;

        if let Some(remote) = &self.remote {
            match remote.list_leads().await {
                Ok(leads) => {
                    self.cache.replace_leads(leads.clone());
                    return leads;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Remote lead list failed, serving cached snapshot");
                }
            }
        }

        self.cache.list_leads()
    }

    /// Remote-first lead fetch. Does not touch the collection lock;
    /// callers decide the locking discipline.
    async fn fetch_lead(&self, id: &str) -> Option<Lead> {
        if let Some(remote) = &self.remote {
            match remote.get_lead(id).await {
                Ok(Some(lead)) => {
                    self.cache.upsert_lead(lead.clone());
                    return Some(lead);
                }
                // A remote miss still checks the cache: local-only
                // writes may not have reached the collaborator yet.
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(lead_id = id, error = %e, "Remote lead fetch failed, trying cache");
                }
            }
        }

        self.cache.get_lead(id)
    }

    pub async fn get_lead(&self, id: &str) -> Option<Lead> {
        self.fetch_lead(id).await
    }

    /// Cache-first, remote best-effort lead write. Lock-free; callers
    /// must already hold the collection lock.
    async fn write_lead(&self, lead: &Lead) {
        self.cache.upsert_lead(lead.clone());

        if let Some(remote) = &self.remote {
            if let Err(e) = remote.put_lead(lead).await {
                tracing::warn!(lead_id = %lead.id, error = %e, "Remote lead write failed, kept locally");
            }
        }
    }

    /// Upsert a lead: cache first, remote best-effort.
    pub async fn put_lead(&self, lead: &Lead) {
        let _guard = self.collection_lock.read().await;
        self.write_lead(lead).await;
    }

    /// Atomically read-modify-write one lead.
    ///
    /// The closure sees the current record and returns the replacement;
    /// returning an error leaves the stored record untouched. No partial
    /// state is observable by readers. The collection lock is held
    /// shared for the whole sequence, so a bulk replace-all cannot land
    /// between the read and the write-back.
    pub async fn update_lead_with<F>(&self, id: &str, f: F) -> Result<Lead, AppError>
    where
        F: FnOnce(Lead) -> Result<Lead, AppError>,
    {
        let lock = self.lead_lock(id);
        let _record_guard = lock.lock().await;
        let _collection_guard = self.collection_lock.read().await;

        let current = self
            .fetch_lead(id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("Lead {id} not found")))?;

        let updated = f(current)?;
        self.write_lead(&updated).await;
        Ok(updated)
    }

    /// Replace the whole lead collection (administrative bulk edit).
    /// Serialized against every individual record write.
    pub async fn replace_all_leads(&self, leads: Vec<Lead>) {
        let _guard = self.collection_lock.write().await;
        self.cache.replace_leads(leads.clone());

        if let Some(remote) = &self.remote {
            if let Err(e) = remote.replace_all_leads(&leads).await {
                tracing::warn!(error = %e, "Remote bulk lead write failed, kept locally");
            }
        }
    }

    // ─── Users ───────────────────────────────────────────────────

    pub async fn list_users(&self) -> Vec<User> {
        let _guard = self.collection_lock.read().await;

        if let Some(remote) = &self.remote {
            match remote.list_users().await {
                Ok(users) => {
                    self.cache.replace_users(users.clone());
                    return users;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Remote user list failed, serving cached snapshot");
                }
            }
        }

        self.cache.list_users()
    }

    pub async fn get_user(&self, id: &str) -> Option<User> {
        if let Some(remote) = &self.remote {
            match remote.get_user(id).await {
                Ok(Some(user)) => {
                    self.cache.upsert_user(user.clone());
                    return Some(user);
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(user_id = id, error = %e, "Remote user fetch failed, trying cache");
                }
            }
        }

        self.cache.get_user(id)
    }

    /// Case-insensitive email lookup over the user collection.
    pub async fn find_user_by_email(&self, email: &str) -> Option<User> {
        let needle = email.trim().to_lowercase();
        self.list_users()
            .await
            .into_iter()
            .find(|u| u.email.to_lowercase() == needle)
    }

    pub async fn put_user(&self, user: &User) {
        let _guard = self.collection_lock.read().await;
        self.cache.upsert_user(user.clone());

        if let Some(remote) = &self.remote {
            if let Err(e) = remote.put_user(user).await {
                tracing::warn!(user_id = %user.id, error = %e, "Remote user write failed, kept locally");
            }
        }
    }

    pub async fn replace_all_users(&self, users: Vec<User>) {
        let _guard = self.collection_lock.write().await;
        self.cache.replace_users(users.clone());

        if let Some(remote) = &self.remote {
            if let Err(e) = remote.replace_all_users(&users).await {
                tracing::warn!(error = %e, "Remote bulk user write failed, kept locally");
            }
        }
    }

    /// Seed the demo hierarchy if the user collection is empty.
    pub async fn seed_demo_data_if_empty(&self) {
        if self.list_users().await.is_empty() {
            tracing::info!("User collection empty, seeding demo hierarchy");
            self.replace_all_users(crate::demo::demo_users()).await;
        }
    }
}
