// SPDX-License-Identifier: MIT

//! Client for the remote store collaborator: a small JSON CRUD API
//! exposing `/api/leads` and `/api/users` with per-record and bulk
//! (replace-all) operations.

use crate::error::AppError;
use crate::models::{Lead, User};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

const REQUEST_TIMEOUT_SECS: u64 = 5;

/// HTTP client for the remote JSON store.
#[derive(Clone)]
pub struct RemoteStore {
    base_url: String,
    client: reqwest::Client,
}

impl RemoteStore {
    pub fn new(base_url: &str) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::Storage(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, AppError> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;

        response
            .error_for_status()
            .map_err(|e| AppError::Storage(e.to_string()))?
            .json()
            .await
            .map_err(|e| AppError::Storage(format!("Malformed response from {path}: {e}")))
    }

    async fn get_one<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, AppError> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let record = response
            .error_for_status()
            .map_err(|e| AppError::Storage(e.to_string()))?
            .json()
            .await
            .map_err(|e| AppError::Storage(format!("Malformed response from {path}: {e}")))?;
        Ok(Some(record))
    }

    /// Upsert: PUT the record; a 404 means the collaborator has never
    /// seen this id, so fall back to POST-create.
    async fn put_record<T: Serialize>(
        &self,
        collection: &str,
        id: &str,
        record: &T,
    ) -> Result<(), AppError> {
        let response = self
            .client
            .put(self.url(&format!("/api/{collection}/{id}")))
            .json(record)
            .send()
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            let response = self
                .client
                .post(self.url(&format!("/api/{collection}")))
                .json(record)
                .send()
                .await
                .map_err(|e| AppError::Storage(e.to_string()))?;
            response
                .error_for_status()
                .map_err(|e| AppError::Storage(e.to_string()))?;
            return Ok(());
        }

        response
            .error_for_status()
            .map_err(|e| AppError::Storage(e.to_string()))?;
        Ok(())
    }

    async fn replace_all<T: Serialize>(
        &self,
        collection: &str,
        records: &[T],
    ) -> Result<(), AppError> {
        let response = self
            .client
            .post(self.url(&format!("/api/{collection}/bulk")))
            .json(records)
            .send()
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;

        response
            .error_for_status()
            .map_err(|e| AppError::Storage(e.to_string()))?;
        Ok(())
    }

    pub async fn list_leads(&self) -> Result<Vec<Lead>, AppError> {
        self.get_list("/api/leads").await
    }

    pub async fn get_lead(&self, id: &str) -> Result<Option<Lead>, AppError> {
        self.get_one(&format!("/api/leads/{id}")).await
    }

    pub async fn put_lead(&self, lead: &Lead) -> Result<(), AppError> {
        self.put_record("leads", &lead.id, lead).await
    }

    pub async fn replace_all_leads(&self, leads: &[Lead]) -> Result<(), AppError> {
        self.replace_all("leads", leads).await
    }

    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.get_list("/api/users").await
    }

    pub async fn get_user(&self, id: &str) -> Result<Option<User>, AppError> {
        self.get_one(&format!("/api/users/{id}")).await
    }

    pub async fn put_user(&self, user: &User) -> Result<(), AppError> {
        self.put_record("users", &user.id, user).await
    }

    pub async fn replace_all_users(&self, users: &[User]) -> Result<(), AppError> {
        self.replace_all("users", users).await
    }
}
