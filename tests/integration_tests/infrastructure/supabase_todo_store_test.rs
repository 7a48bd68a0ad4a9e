use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use chrono::{NaiveDate, Utc};
use serde_json::Value;
use tokio::net::TcpListener;

use todo_agent::application::ports::{TodoStore, TodoStoreError};
use todo_agent::domain::{InputKind, Todo, TodoItem};
use todo_agent::infrastructure::persistence::SupabaseTodoStore;

const SERVICE_KEY: &str = "service-role-key";

#[derive(Clone, Default)]
struct Captured {
    requests: Arc<Mutex<Vec<(HeaderMap, Value)>>>,
}

async fn spawn_server(status: StatusCode, captured: Captured) -> String {
    let router = Router::new()
        .route(
            "/rest/v1/todos",
            post(
                move |State(captured): State<Captured>, headers: HeaderMap, Json(body): Json<Value>| async move {
                    captured.requests.lock().unwrap().push((headers, body));
                    status
                },
            ),
        )
        .with_state(captured);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
    format!("http://{}/", addr)
}

fn todos() -> Vec<Todo> {
    let item = TodoItem {
        title: "Buy milk".to_string(),
        description: None,
        due_date: NaiveDate::from_ymd_opt(2024, 1, 2),
    };
    vec![Todo::from_item(&item, "user-1", InputKind::Text, Utc::now())]
}

fn store(base_url: String) -> SupabaseTodoStore {
    SupabaseTodoStore::new(base_url, SERVICE_KEY.to_string(), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn given_todos_when_inserting_then_posts_batch_with_service_headers() {
    let captured = Captured::default();
    let base_url = spawn_server(StatusCode::CREATED, captured.clone()).await;

    store(base_url).insert_batch(&todos()).await.unwrap();

    let requests = captured.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let (headers, body) = &requests[0];
    assert_eq!(headers["apikey"], SERVICE_KEY);
    assert_eq!(headers["authorization"], format!("Bearer {}", SERVICE_KEY));
    assert_eq!(headers["prefer"], "return=minimal");
    assert_eq!(body[0]["title"], "Buy milk");
    assert_eq!(body[0]["user_id"], "user-1");
    assert_eq!(body[0]["due_date"], "2024-01-02");
    assert_eq!(body[0]["source_type"], "text");
}

#[tokio::test]
async fn given_rejecting_backend_when_inserting_then_returns_insert_failed() {
    let base_url = spawn_server(StatusCode::BAD_REQUEST, Captured::default()).await;

    let result = store(base_url).insert_batch(&todos()).await;

    assert!(matches!(
        result,
        Err(TodoStoreError::InsertFailed { status: 400, .. })
    ));
}

#[tokio::test]
async fn given_empty_batch_when_inserting_then_makes_no_request() {
    let captured = Captured::default();
    let base_url = spawn_server(StatusCode::CREATED, captured.clone()).await;

    store(base_url).insert_batch(&[]).await.unwrap();

    assert!(captured.requests.lock().unwrap().is_empty());
}
