//! HTTP surface tests driven through the router with `tower::ServiceExt::oneshot`.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use deck_db::service::DeckService;
use deck_server::{AppState, router};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn app() -> (AppState, Router) {
    let service = DeckService::new_local(":memory:").await.unwrap();
    let state = AppState::new(service, 1200);
    let app = router(state.clone(), false);
    (state, app)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_task(app: &Router, title: &str, schedule: &str) -> Value {
    let (status, task) = send(
        app,
        "POST",
        "/api/tasks",
        Some(json!({ "title": title, "schedule": schedule })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    task
}

fn ids(list: &Value) -> Vec<String> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn health_reports_ok() {
    let (_, app) = app().await;
    let (status, body) = send(&app, "GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn created_task_appears_in_its_bucket_only() {
    let (_, app) = app().await;
    let task = create_task(&app, "write report", "today").await;
    assert_eq!(task["status"], "pending");
    assert!(task["chunk_id"].is_null());
    assert_eq!(task["description"], "");

    let (status, buckets) = send(&app, "GET", "/api/tasks", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&buckets["today"]), vec![task["id"].as_str().unwrap()]);
    assert!(buckets["tomorrow"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn invalid_task_payloads_are_rejected_without_persisting() {
    let (_, app) = app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/tasks",
        Some(json!({ "title": "x", "schedule": "someday" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("schedule"));

    let (status, _) = send(&app, "POST", "/api/tasks", Some(json!({ "schedule": "today" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let request = Request::builder()
        .method("POST")
        .uri("/api/tasks")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (_, buckets) = send(&app, "GET", "/api/tasks", None).await;
    assert!(buckets["today"].as_array().unwrap().is_empty());
    assert!(buckets["tomorrow"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn bulk_create_defaults_to_today() {
    let (_, app) = app().await;
    let (status, tasks) = send(
        &app,
        "POST",
        "/api/tasks/bulk",
        Some(json!({ "text": "one\n\ntwo\n" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(tasks.as_array().unwrap().len(), 2);
    assert!(tasks.as_array().unwrap().iter().all(|t| t["schedule"] == "today"));
}

#[tokio::test]
async fn update_task_errors() {
    let (_, app) = app().await;
    let task = create_task(&app, "t", "today").await;
    let uri = format!("/api/tasks/{}", task["id"].as_str().unwrap());

    let (status, body) = send(&app, "PUT", &uri, Some(json!({ "unknown": 1 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "No valid fields provided for update");

    let (status, body) = send(
        &app,
        "PUT",
        "/api/tasks/tsk-00000000",
        Some(json!({ "status": "completed" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Task not found");

    let (status, body) = send(&app, "PUT", &uri, Some(json!({ "chunk_id": "chk-00000000" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Chunk not found");
}

#[tokio::test]
async fn chunk_lifecycle_nulls_task_references() {
    let (_, app) = app().await;
    let task = create_task(&app, "write report", "today").await;
    let task_id = task["id"].as_str().unwrap().to_string();

    let (status, chunk) = send(
        &app,
        "POST",
        "/api/chunks",
        Some(json!({ "name": "Morning", "taskIds": [task_id] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(chunk["name"], "Morning");
    assert_eq!(chunk["tasks"][0]["id"], task_id);
    let chunk_id = chunk["id"].as_str().unwrap().to_string();

    let (_, fetched) = send(&app, "GET", &format!("/api/tasks/{task_id}"), None).await;
    assert_eq!(fetched["chunk_id"], chunk_id);

    let (_, chunks) = send(&app, "GET", "/api/chunks", None).await;
    assert_eq!(ids(&chunks), vec![chunk_id.clone()]);

    let (status, body) = send(&app, "DELETE", &format!("/api/chunks/{chunk_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Chunk deleted successfully");

    let (_, fetched) = send(&app, "GET", &format!("/api/tasks/{task_id}"), None).await;
    assert!(fetched["chunk_id"].is_null());
    let (_, buckets) = send(&app, "GET", "/api/tasks", None).await;
    assert_eq!(ids(&buckets["today"]), vec![task_id]);

    let (status, _) = send(&app, "DELETE", &format!("/api/chunks/{chunk_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn chunk_create_validation_and_auto_name() {
    let (_, app) = app().await;

    let (status, _) = send(&app, "POST", "/api/chunks", Some(json!({ "name": "x" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, chunk) = send(&app, "POST", "/api/chunks", Some(json!({ "taskIds": [] }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(chunk["name"], "Chunk 1");
}

#[tokio::test]
async fn update_chunk_rules() {
    let (_, app) = app().await;
    let (_, chunk) = send(
        &app,
        "POST",
        "/api/chunks",
        Some(json!({ "name": "Morning", "taskIds": [] })),
    )
    .await;
    let uri = format!("/api/chunks/{}", chunk["id"].as_str().unwrap());

    let (status, _) = send(&app, "PUT", &uri, Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, updated) = send(
        &app,
        "PUT",
        &uri,
        Some(json!({ "status": "completed", "total_elapsed": 600 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "completed");
    assert_eq!(updated["total_elapsed"], 600);

    let (status, _) = send(&app, "PUT", &uri, Some(json!({ "status": "pending" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &app,
        "PUT",
        "/api/chunks/chk-00000000",
        Some(json!({ "name": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn focus_session_flow() {
    let (state, app) = app().await;
    let first = create_task(&app, "first", "today").await;
    let second = create_task(&app, "second", "today").await;
    let first_id = first["id"].as_str().unwrap().to_string();
    let second_id = second["id"].as_str().unwrap().to_string();
    let (_, chunk) = send(
        &app,
        "POST",
        "/api/chunks",
        Some(json!({ "name": "Morning", "taskIds": [first_id, second_id] })),
    )
    .await;
    let chunk_id = chunk["id"].as_str().unwrap().to_string();

    let (status, _) = send(&app, "GET", "/api/focus", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, started) = send(&app, "POST", &format!("/api/chunks/{chunk_id}/start"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(started["message"], "Chunk started");
    assert!(started["chunk"]["started_at"].is_string());
    assert_eq!(started["session"]["remaining"], 1200);
    assert_eq!(started["session"]["state"], "running");

    for _ in 0..50 {
        state.focus.tick().await;
    }
    let (status, snapshot) = send(
        &app,
        "POST",
        &format!("/api/focus/tasks/{first_id}/toggle"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(snapshot["remaining"], 1150);
    let (_, task) = send(&app, "GET", &format!("/api/tasks/{first_id}"), None).await;
    assert_eq!(task["status"], "completed");
    assert_eq!(task["completed_at"], 50);

    let (status, paused) = send(&app, "POST", "/api/focus/pause", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(paused["state"], "paused");
    let (status, _) = send(&app, "POST", "/api/focus/pause", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    send(&app, "POST", "/api/focus/resume", None).await;

    let (status, finished) = send(&app, "POST", "/api/focus/finish", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(finished["state"], "finished");

    let (_, task) = send(&app, "GET", &format!("/api/tasks/{second_id}"), None).await;
    assert_eq!(task["status"], "completed");
    assert_eq!(task["completed_at"], 50);
    let (_, chunk) = send(&app, "GET", &format!("/api/chunks/{chunk_id}"), None).await;
    assert_eq!(chunk["status"], "completed");
    assert_eq!(chunk["total_elapsed"], 50);

    let (status, _) = send(&app, "POST", "/api/focus/stop", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, _) = send(&app, "POST", &format!("/api/chunks/{chunk_id}/start"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn removing_task_from_session_unchunks_it() {
    let (_, app) = app().await;
    let task = create_task(&app, "drop me", "today").await;
    let task_id = task["id"].as_str().unwrap().to_string();
    let (_, chunk) = send(
        &app,
        "POST",
        "/api/chunks",
        Some(json!({ "name": "Morning", "taskIds": [task_id] })),
    )
    .await;
    let chunk_id = chunk["id"].as_str().unwrap();
    send(&app, "POST", &format!("/api/chunks/{chunk_id}/start"), None).await;

    let (status, snapshot) =
        send(&app, "DELETE", &format!("/api/focus/tasks/{task_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(snapshot["tasks"].as_array().unwrap().is_empty());

    let (_, fetched) = send(&app, "GET", &format!("/api/tasks/{task_id}"), None).await;
    assert!(fetched["chunk_id"].is_null());
}

#[tokio::test]
async fn manual_reset_clears_pending_chunks() {
    let (_, app) = app().await;
    let task = create_task(&app, "t", "today").await;
    send(
        &app,
        "POST",
        "/api/chunks",
        Some(json!({ "name": "Morning", "taskIds": [task["id"]] })),
    )
    .await;

    let (status, report) = send(&app, "POST", "/api/reset", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report, json!({ "tasks_unchunked": 1, "chunks_removed": 1 }));

    let (status, board) = send(&app, "GET", "/api/board", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(board["chunks"].as_array().unwrap().is_empty());
    assert_eq!(ids(&board["unchunked"]), vec![task["id"].as_str().unwrap()]);
    assert_eq!(board["dangling"], 0);

    let (_, report) = send(&app, "POST", "/api/reset", None).await;
    assert_eq!(report, json!({ "tasks_unchunked": 0, "chunks_removed": 0 }));
}
