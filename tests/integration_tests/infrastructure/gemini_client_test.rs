use std::collections::HashMap;
use std::time::Duration;

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use todo_agent::application::ports::{TodoExtractor, TodoExtractorError};
use todo_agent::infrastructure::llm::GeminiClient;

const API_KEY: &str = "test-gemini-key";

async fn spawn_server(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
    format!("http://{}/v1beta", addr)
}

fn client(base_url: String) -> GeminiClient {
    GeminiClient::new(
        API_KEY.to_string(),
        "gemini-1.5-flash".to_string(),
        base_url,
        Duration::from_secs(5),
    )
    .unwrap()
}

fn answer(text: &str) -> Value {
    json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] })
}

#[tokio::test]
async fn given_fenced_answer_when_extracting_then_returns_parsed_candidates() {
    let router = Router::new().route(
        "/v1beta/models/{action}",
        post(
            |Path(action): Path<String>,
             Query(query): Query<HashMap<String, String>>,
             Json(body): Json<Value>| async move {
                assert_eq!(action, "gemini-1.5-flash:generateContent");
                assert_eq!(query.get("key").map(String::as_str), Some(API_KEY));
                let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
                assert!(prompt.ends_with("Buy milk tomorrow"));
                Json(answer(
                    "```json\n[{\"title\":\"Buy milk\",\"description\":\"\",\"due_date\":\"2024-01-02\"}]\n```",
                ))
            },
        ),
    );
    let base_url = spawn_server(router).await;

    let candidates = client(base_url)
        .extract_todos("Buy milk tomorrow")
        .await
        .unwrap();

    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].title, "Buy milk");
    assert_eq!(candidates[0].due_date.as_deref(), Some("2024-01-02"));
}

#[tokio::test]
async fn given_too_many_requests_when_extracting_then_returns_rate_limited() {
    let router = Router::new().route(
        "/v1beta/models/{action}",
        post(|| async { StatusCode::TOO_MANY_REQUESTS }),
    );
    let base_url = spawn_server(router).await;

    let result = client(base_url).extract_todos("anything").await;

    assert!(matches!(result, Err(TodoExtractorError::RateLimited)));
}

#[tokio::test]
async fn given_server_error_when_extracting_then_returns_request_failed_with_status() {
    let router = Router::new().route(
        "/v1beta/models/{action}",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response() }),
    );
    let base_url = spawn_server(router).await;

    let result = client(base_url).extract_todos("anything").await;

    match result {
        Err(TodoExtractorError::ApiRequestFailed(message)) => {
            assert!(message.contains("500"), "{message}");
            assert!(message.contains("boom"), "{message}");
        }
        other => panic!("expected ApiRequestFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn given_no_candidates_when_extracting_then_returns_invalid_response() {
    let router = Router::new().route(
        "/v1beta/models/{action}",
        post(|| async { Json(json!({ "candidates": [] })) }),
    );
    let base_url = spawn_server(router).await;

    let result = client(base_url).extract_todos("anything").await;

    assert!(matches!(result, Err(TodoExtractorError::InvalidResponse(_))));
}
