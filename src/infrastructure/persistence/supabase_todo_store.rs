use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use tracing::instrument;

use crate::application::ports::{TodoStore, TodoStoreError};
use crate::domain::Todo;

const TODOS_TABLE_PATH: &str = "/rest/v1/todos";

/// Writes todos to a Supabase (PostgREST) table.
pub struct SupabaseTodoStore {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SupabaseTodoStore {
    pub fn new(base_url: String, api_key: String, timeout: Duration) -> Result<Self, TodoStoreError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TodoStoreError::RequestFailed(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn todos_url(&self) -> String {
        format!("{}{}", self.base_url, TODOS_TABLE_PATH)
    }
}

#[async_trait]
impl TodoStore for SupabaseTodoStore {
    #[instrument(skip(self, todos), fields(count = todos.len()))]
    async fn insert_batch(&self, todos: &[Todo]) -> Result<(), TodoStoreError> {
        if todos.is_empty() {
            return Ok(());
        }

        let response = self
            .client
            .post(self.todos_url())
            .header(CONTENT_TYPE, "application/json")
            .header("apikey", &self.api_key)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header("Prefer", "return=minimal")
            .json(todos)
            .send()
            .await
            .map_err(|e| TodoStoreError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TodoStoreError::InsertFailed {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!("Todos inserted");
        Ok(())
    }
}
