//! REST client for the stats backend
//!
//! Speaks a PostgREST-style API with a service key. Every call here is
//! best-effort from the game's point of view; callers fall back to the
//! local cache on any error.

use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};

/// Stats backend client
#[derive(Clone)]
pub struct StatsBackend {
    client: Client,
    base_url: String,
    api_key: String,
}

impl StatsBackend {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            api_key,
        }
    }

    /// REST URL for a table
    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// Authenticated GET expecting at most one row
    pub async fn get_one<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &str,
    ) -> Result<Option<T>, BackendError> {
        let url = format!("{}?{}", self.rest_url(table), query);

        let response = self
            .client
            .get(&url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .header("Accept", "application/vnd.pgrst.object+json")
            .send()
            .await
            .map_err(BackendError::Request)?;

        if response.status() == reqwest::StatusCode::NOT_ACCEPTABLE {
            // No rows found
            return Ok(None);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Api { status: status.as_u16(), body });
        }

        response.json().await.map(Some).map_err(BackendError::Parse)
    }

    /// Authenticated POST (insert), returning the created row
    pub async fn insert<T: Serialize, R: DeserializeOwned>(
        &self,
        table: &str,
        data: &T,
    ) -> Result<R, BackendError> {
        let url = self.rest_url(table);

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .header("Prefer", "return=representation")
            .json(data)
            .send()
            .await
            .map_err(BackendError::Request)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Api { status: status.as_u16(), body });
        }

        // PostgREST returns an array, take the first element
        let rows: Vec<R> = response.json().await.map_err(BackendError::Parse)?;
        rows.into_iter().next().ok_or(BackendError::NoRowReturned)
    }

    /// Authenticated PATCH (update)
    pub async fn update<T: Serialize>(
        &self,
        table: &str,
        query: &str,
        data: &T,
    ) -> Result<(), BackendError> {
        let url = format!("{}?{}", self.rest_url(table), query);

        let response = self
            .client
            .patch(&url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(data)
            .send()
            .await
            .map_err(BackendError::Request)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Api { status: status.as_u16(), body });
        }

        Ok(())
    }
}

/// Backend errors
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    Parse(reqwest::Error),

    #[error("No row returned from insert")]
    NoRowReturned,
}
