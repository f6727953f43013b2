//! Supabase (PostgREST) response sink.
//!
//! Rows are posted as one JSON array to `{url}/rest/v1/{table}`; PostgREST
//! inserts the whole array in a single statement.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use survey_core::model::PersistedRow;

use crate::repository::{ResponseStore, Storage, StorageError};

pub const DEFAULT_TABLE: &str = "infdriven";

#[derive(Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub key: String,
    pub table: String,
}

impl SupabaseConfig {
    #[must_use]
    pub fn new(url: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            key: key.into(),
            table: DEFAULT_TABLE.to_string(),
        }
    }

    #[must_use]
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    #[must_use]
    pub fn insert_url(&self) -> String {
        format!("{}/rest/v1/{}", self.url.trim_end_matches('/'), self.table)
    }
}

impl std::fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("url", &self.url)
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}

/// Column layout of the remote table.
#[derive(Debug, Serialize, PartialEq)]
struct SupabaseRow<'a> {
    user_id: String,
    initial_score: f64,
    snippet_i: u32,
    headline: &'a str,
    summary: &'a str,
    rating: f64,
}

impl<'a> From<&'a PersistedRow> for SupabaseRow<'a> {
    fn from(row: &'a PersistedRow) -> Self {
        Self {
            user_id: row.session_id.to_string(),
            initial_score: row.starting_score.value(),
            snippet_i: row.exposure_index,
            headline: &row.headline,
            summary: &row.summary,
            rating: row.rating.value(),
        }
    }
}

#[derive(Clone)]
pub struct SupabaseResponseStore {
    client: Client,
    config: SupabaseConfig,
}

impl SupabaseResponseStore {
    #[must_use]
    pub fn new(config: SupabaseConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl ResponseStore for SupabaseResponseStore {
    async fn insert_batch(&self, rows: &[PersistedRow]) -> Result<usize, StorageError> {
        if rows.is_empty() {
            return Ok(0);
        }

        let payload: Vec<SupabaseRow<'_>> = rows.iter().map(SupabaseRow::from).collect();
        let response = self
            .client
            .post(self.config.insert_url())
            .header("apikey", &self.config.key)
            .bearer_auth(&self.config.key)
            .header("Prefer", "return=minimal")
            .json(&payload)
            .send()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<unreadable body: {e}>"));
            return Err(StorageError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        tracing::debug!(rows = rows.len(), table = %self.config.table, "stored survey rows in supabase");
        Ok(rows.len())
    }

    fn backend(&self) -> &'static str {
        "supabase"
    }
}

impl Storage {
    #[must_use]
    pub fn supabase(config: SupabaseConfig) -> Self {
        let responses: Arc<dyn ResponseStore> = Arc::new(SupabaseResponseStore::new(config));
        Self::with_store(responses)
    }
}
