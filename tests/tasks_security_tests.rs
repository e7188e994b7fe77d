// SPDX-License-Identifier: MIT

//! Task endpoint security tests.
//!
//! The /tasks/* endpoints must only be callable by Cloud Tasks, which
//! is enforced by requiring the queue name header that Cloud Tasks
//! attaches to every dispatched request.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;

mod common;

const QUEUE_HEADER: &str = "x-cloudtasks-queuename";

fn task_request(uri: &str, queue_name: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");

    if let Some(name) = queue_name {
        builder = builder.header(QUEUE_HEADER, name);
    }

    builder.body(Body::from(body.to_string())).unwrap()
}

#[tokio::test]
async fn send_digest_without_queue_header_forbidden() {
    let (app, _state) = common::create_test_app();

    let body = serde_json::json!({ "user_id": "user-1", "period_label": "March 2026" });
    let response = app
        .oneshot(task_request("/tasks/send-digest", None, body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn send_digest_with_wrong_queue_name_forbidden() {
    let (app, _state) = common::create_test_app();

    let body = serde_json::json!({ "user_id": "user-1", "period_label": "March 2026" });
    let response = app
        .oneshot(task_request("/tasks/send-digest", Some("other-queue"), body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn send_digest_with_queue_header_passes_gate() {
    let (app, _state) = common::create_test_app();

    let body = serde_json::json!({ "user_id": "user-1", "period_label": "March 2026" });
    let response = app
        .oneshot(task_request("/tasks/send-digest", Some("hsa-digest"), body))
        .await
        .unwrap();

    // The gate passes; the offline mock database then fails the lookup.
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn digest_fanout_without_queue_header_forbidden() {
    let (app, _state) = common::create_test_app();

    let body = serde_json::json!({ "period_label": "March 2026" });
    let response = app
        .oneshot(task_request("/tasks/digest-fanout", None, body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn delete_user_without_queue_header_forbidden() {
    let (app, _state) = common::create_test_app();

    let body = serde_json::json!({ "user_id": "user-1", "source": "user_request" });
    let response = app
        .oneshot(task_request("/tasks/delete-user", None, body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn task_endpoints_do_not_require_session_auth() {
    // Task endpoints sit outside the session-auth layer; the queue
    // header is their only gate, so a missing header must not 401.
    let (app, _state) = common::create_test_app();

    let body = serde_json::json!({ "user_id": "user-1", "source": "user_request" });
    let response = app
        .oneshot(task_request("/tasks/delete-user", None, body))
        .await
        .unwrap();

    assert_ne!(response.status(), StatusCode::UNAUTHORIZED);
}
