use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use super::InputKind;

const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

/// A to-do item as proposed by the AI extractor, before normalization.
///
/// Fields are read leniently: a missing or non-string value never rejects
/// the whole answer, it just leaves that field empty.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TodoCandidate {
    #[serde(default, deserialize_with = "string_or_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "string_or_none")]
    pub due_date: Option<String>,
}

fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(value) => Some(value),
        _ => None,
    })
}

fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    string_or_none(deserializer).map(Option::unwrap_or_default)
}

/// A normalized to-do item, as attached to a completed job.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TodoItem {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
}

impl From<TodoCandidate> for TodoItem {
    fn from(candidate: TodoCandidate) -> Self {
        let description = Some(candidate.description.trim())
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        Self {
            title: candidate.title.trim().to_string(),
            description,
            due_date: candidate.due_date.as_deref().and_then(parse_due_date),
        }
    }
}

/// Parses `YYYY-MM-DD`. Anything else, including `"null"` and `""`, means
/// there is no due date.
pub fn parse_due_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DUE_DATE_FORMAT).ok()
}

/// Record written to the remote todo store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Todo {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub source_type: String,
    pub created_at: DateTime<Utc>,
}

impl Todo {
    pub fn from_item(
        item: &TodoItem,
        user_id: &str,
        source: InputKind,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            title: item.title.clone(),
            description: item.description.clone(),
            due_date: item.due_date,
            source_type: source.as_str().to_string(),
            created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingResult {
    pub todos: Vec<TodoItem>,
    pub processed_at: DateTime<Utc>,
}

impl ProcessingResult {
    pub fn new(todos: Vec<TodoItem>) -> Self {
        Self {
            todos,
            processed_at: Utc::now(),
        }
    }
}
