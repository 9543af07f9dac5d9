//! Template API integration tests.
//!
//! Run with: `cargo test -p creative-api --test templates_test`
//! Requires Docker for testcontainers (Postgres).

mod helpers;

use helpers::setup_test_app;
use serde_json::{json, Value};

#[tokio::test]
async fn test_create_get_and_list_templates() {
    let app = setup_test_app().await;
    let client = app.client();

    let response = client
        .post("/templates")
        .json(&json!({
            "language": "en",
            "style": "ugc",
            "category": "puzzle",
            "characteristics": ["bright", "fast cuts"]
        }))
        .await;
    assert_eq!(response.status_code(), 201);
    let created: Value = response.json();
    assert_eq!(created["category"], "puzzle");
    assert_eq!(created["characteristics"], json!(["bright", "fast cuts"]));
    let id = created["id"].as_str().unwrap();

    let fetched: Value = client.get(&format!("/templates/{}", id)).await.json();
    assert_eq!(fetched["id"], id);
    assert_eq!(fetched["style"], "ugc");

    let list: Value = client.get("/templates").await.json();
    assert_eq!(list["templates"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_template_validation_error() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/templates")
        .json(&json!({ "category": "" }))
        .await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(response.json::<Value>()["success"], false);
    assert_eq!(app.count("templates").await, 0);
    assert!(app
        .log_actions()
        .await
        .contains(&"create_template_error".to_string()));
}

#[tokio::test]
async fn test_create_template_malformed_body() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/templates")
        .json(&json!({ "characteristics": "not-a-list" }))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_get_unknown_template() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .get("/templates/00000000-0000-0000-0000-000000000001")
        .await;

    assert_eq!(response.status_code(), 404);
}
