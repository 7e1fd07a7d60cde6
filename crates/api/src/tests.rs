use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use formkit_core::events::bus::EventBus;
use formkit_core::events::types::FormEvent;
use formkit_core::store::MemoryStore;
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::config::AppConfig;
use crate::routes::build_router;
use crate::state::AppState;

fn app_with_bus() -> (Router, EventBus) {
    let bus = EventBus::new(16);
    let state = AppState::new(Arc::new(MemoryStore::new()), AppConfig::default(), bus.clone());
    (build_router(state), bus)
}

fn app() -> Router {
    app_with_bus().0
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let body = match body {
        Some(value) => Body::from(value.to_string()),
        None => Body::empty(),
    };
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body)
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn signup_form() -> Value {
    json!({
        "title": "Event Signup",
        "description": "Annual meetup",
        "eventDateTime": "2024-09-01T18:00:00Z",
        "fields": [
            {"id": "name", "type": "text", "label": "Name", "required": true},
            {"id": "diet", "type": "checkbox", "label": "Diet", "options": ["Vegan", "Halal"]},
            {"id": "go", "type": "submit", "label": "Submit Label"},
        ],
    })
}

async fn create(app: &Router) -> String {
    let (status, body) = send(app, Method::POST, "/v1/forms", Some(signup_form())).await;
    assert_eq!(status, StatusCode::CREATED);
    body["formId"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn ping_and_health() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/v1/ping", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["store"], "connected");
}

#[tokio::test]
async fn save_without_title_is_bad_request() {
    let app = app();
    let (status, body) = send(&app, Method::POST, "/v1/forms", Some(json!({"title": " ", "fields": []}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "badRequest");

    let (_, forms) = send(&app, Method::GET, "/v1/forms", None).await;
    assert_eq!(forms, json!([]));
}

#[tokio::test]
async fn save_with_shared_field_id_is_bad_request() {
    let app = app();
    let form = json!({
        "title": "Event Signup",
        "fields": [
            {"id": "a", "type": "text", "label": "Name"},
            {"id": "a", "type": "email", "label": "Email"},
        ],
    });
    let (status, body) = send(&app, Method::POST, "/v1/forms", Some(form.clone())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "badRequest");

    let id = create(&app).await;
    let (status, _) = send(&app, Method::PUT, &format!("/v1/forms/{id}"), Some(form)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, stored) = send(&app, Method::GET, &format!("/v1/forms/{id}"), None).await;
    assert_eq!(stored["title"], "Event Signup");
    assert_eq!(stored["fields"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn save_with_unknown_field_type_is_bad_request() {
    let app = app();
    let form = json!({
        "title": "Event Signup",
        "fields": [{"id": "s", "type": "signature", "label": "Sign", "options": ["x"]}],
    });
    let (status, _) = send(&app, Method::POST, "/v1/forms", Some(form)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, forms) = send(&app, Method::GET, "/v1/forms", None).await;
    assert_eq!(forms, json!([]));
}

#[tokio::test]
async fn malformed_and_unknown_ids() {
    let app = app();
    let (status, _) = send(&app, Method::GET, "/v1/forms/not-an-id", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let unknown = uuid::Uuid::new_v4();
    let (status, body) = send(&app, Method::GET, &format!("/v1/forms/{unknown}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["statusCode"], 404);

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/v1/forms/{unknown}/submissions"),
        Some(json!({"submittedValues": []})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn fetch_and_update_form() {
    let app = app();
    let id = create(&app).await;

    let (status, form) = send(&app, Method::GET, &format!("/v1/forms/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(form["_id"], id.as_str());
    assert_eq!(form["fields"][1]["options"], json!(["Vegan", "Halal"]));

    let mut edited = signup_form();
    edited["title"] = json!("Event Signup 2024");
    let (status, updated) = send(&app, Method::PUT, &format!("/v1/forms/{id}"), Some(edited)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Event Signup 2024");

    let (_, forms) = send(&app, Method::GET, "/v1/forms", None).await;
    assert_eq!(forms.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn render_returns_fresh_instance() {
    let app = app();
    let id = create(&app).await;

    let (status, rendered) = send(&app, Method::GET, &format!("/v1/forms/{id}/render"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rendered["title"], "Event Signup");
    let fields = rendered["fields"].as_array().unwrap();
    assert_eq!(fields.len(), 3);
    assert_eq!(fields[0]["control"], "input");
    assert_eq!(fields[0]["required"], true);
    assert_eq!(fields[1]["control"], "checkboxGroup");
    assert_eq!(fields[2]["control"], "submitButton");
    assert!(fields[2].get("label").is_none());
}

#[tokio::test]
async fn submit_then_read_response_table() {
    let (app, bus) = app_with_bus();
    let mut events = bus.subscribe();
    let id = create(&app).await;
    assert!(matches!(events.recv().await.unwrap(), FormEvent::FormSaved(_)));

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/v1/forms/{id}/submissions"),
        Some(json!({"submittedValues": [
            {"fieldId": "name", "value": "Ada"},
            {"fieldId": "diet", "value": ["Halal", "Vegan"]},
        ]})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["submissionId"].is_string());
    assert!(matches!(events.recv().await.unwrap(), FormEvent::SubmissionReceived(_)));

    send(
        &app,
        Method::POST,
        &format!("/v1/forms/{id}/submissions"),
        Some(json!({"submittedValues": [{"fieldId": 1718000000123u64, "value": "legacy"}]})),
    )
    .await;

    let (status, raw) = send(&app, Method::GET, &format!("/v1/forms/{id}/responses"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(raw.as_array().unwrap().len(), 2);
    assert_eq!(raw[1]["submittedValues"][0]["fieldId"], "1718000000123");

    let (status, table) = send(&app, Method::GET, &format!("/v1/forms/{id}/responses/table"), None).await;
    assert_eq!(status, StatusCode::OK);
    let labels: Vec<&str> = table["columns"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["label"].as_str().unwrap())
        .collect();
    assert_eq!(labels, vec!["Name", "Diet", "Field 1718000000123"]);
    assert_eq!(table["rows"][0]["cells"][1]["value"], "Halal, Vegan");
    assert_eq!(table["rows"][1]["cells"][0]["value"], "No value provided");

    let (_, filtered) = send(
        &app,
        Method::GET,
        &format!("/v1/forms/{id}/responses/table?search=LEGACY"),
        None,
    )
    .await;
    assert_eq!(filtered["rows"].as_array().unwrap().len(), 1);
    assert_eq!(filtered["rows"][0]["serial"], 1);
}
