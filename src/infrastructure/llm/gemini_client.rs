use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::ports::{TodoExtractor, TodoExtractorError};
use crate::domain::TodoCandidate;
use crate::infrastructure::observability::sanitize_prompt;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

const PROMPT_TEMPLATE: &str = r#"You are a productivity assistant. Extract the actionable to-do items from the text below and answer with a JSON array only:
[{"title":"...","description":"...","due_date":"YYYY-MM-DD"}]

RULES:
1. Only include tasks or activities that still need to be done
2. Skip anything that is already finished
3. due_date must be YYYY-MM-DD, or null when the text gives no date
4. description may be an empty string when there are no details
5. The response must be a valid JSON array and nothing else

Text:
---
"#;

pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Content,
}

impl GeminiClient {
    pub fn new(
        api_key: String,
        model: String,
        base_url: String,
        timeout: Duration,
    ) -> Result<Self, TodoExtractorError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TodoExtractorError::ApiRequestFailed(e.to_string()))?;

        let model = if model.trim().is_empty() {
            DEFAULT_MODEL.to_string()
        } else {
            model
        };

        Ok(Self {
            client,
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

pub fn build_prompt(text: &str) -> String {
    format!("{}{}", PROMPT_TEMPLATE, text)
}

/// Parses the model's answer into candidates. Models like to wrap JSON in
/// a Markdown fence even when told not to, so one is stripped if present.
pub fn parse_candidates(answer: &str) -> Result<Vec<TodoCandidate>, TodoExtractorError> {
    let json = strip_code_fence(answer);
    serde_json::from_str(json).map_err(|e| {
        TodoExtractorError::InvalidResponse(format!("failed to parse todos from response: {}", e))
    })
}

fn strip_code_fence(answer: &str) -> &str {
    let trimmed = answer.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };

    body.trim_end().trim_end_matches("```").trim()
}

#[async_trait]
impl TodoExtractor for GeminiClient {
    async fn extract_todos(&self, text: &str) -> Result<Vec<TodoCandidate>, TodoExtractorError> {
        tracing::debug!(
            model = %self.model,
            input = %sanitize_prompt(text),
            "Requesting todo extraction"
        );

        let request_body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: build_prompt(text),
                }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&request_body)
            .send()
            .await
            .map_err(|e| TodoExtractorError::ApiRequestFailed(e.without_url().to_string()))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(TodoExtractorError::RateLimited);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TodoExtractorError::ApiRequestFailed(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let generated: GenerateResponse = response
            .json()
            .await
            .map_err(|e| TodoExtractorError::InvalidResponse(e.to_string()))?;

        let answer = generated
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| TodoExtractorError::InvalidResponse("empty response".to_string()))?;

        parse_candidates(&answer)
    }
}
