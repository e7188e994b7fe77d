// SPDX-License-Identifier: MIT

//! Cloud Tasks callback handlers.
//!
//! These endpoints are only meant to be invoked by the task queue. A
//! non-2xx response makes Cloud Tasks retry with backoff, so handlers
//! return 200 for permanent skips and 500 only for retryable failures.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use std::sync::Arc;

use crate::config::DIGEST_QUEUE_NAME;
use crate::engine;
use crate::services::render_digest;
use crate::services::digest::MAX_RECENT_EXPENSES;
use crate::services::tasks::{DeleteUserPayload, DigestFanoutPayload, SendDigestPayload};
use crate::time_utils::current_tax_year;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tasks/digest-fanout", post(digest_fanout))
        .route("/tasks/send-digest", post(send_digest))
        .route("/tasks/delete-user", post(delete_user))
}

/// Cloud Tasks sets this header on every dispatched request; it cannot
/// be set by external callers going through the load balancer.
fn is_from_task_queue(headers: &HeaderMap) -> bool {
    headers
        .get("x-cloudtasks-queuename")
        .and_then(|h| h.to_str().ok())
        .map(|name| name == DIGEST_QUEUE_NAME)
        .unwrap_or(false)
}

/// Fan the periodic digest out to one task per eligible user.
async fn digest_fanout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<DigestFanoutPayload>,
) -> StatusCode {
    if !is_from_task_queue(&headers) {
        tracing::warn!("Rejected digest-fanout call without task queue header");
        return StatusCode::FORBIDDEN;
    }

    let users = match state.db.list_users().await {
        Ok(users) => users,
        Err(e) => {
            tracing::error!(error = %e, "Failed to list users for digest fanout");
            return StatusCode::INTERNAL_SERVER_ERROR;
        }
    };

    let user_ids: Vec<String> = users
        .into_iter()
        .filter(|u| u.email.is_some() && u.deletion_requested_at.is_none())
        .map(|u| u.user_id)
        .collect();

    if user_ids.is_empty() {
        tracing::info!("No eligible users for digest");
        return StatusCode::OK;
    }

    let result = state
        .tasks_service
        .queue_digest_batch(&state.config.api_url, user_ids, &payload.period_label)
        .await;

    if result.is_complete_failure() {
        // Nothing queued at all: let Cloud Tasks retry the fanout
        tracing::error!(failed = result.failed, "Digest fanout queued nothing");
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    if result.is_partial_failure() {
        tracing::warn!(
            queued = result.queued,
            failed = result.failed,
            failed_user_ids = ?result.failed_user_ids,
            "Digest fanout partially failed"
        );
    }

    StatusCode::OK
}

/// Build and send the digest email for a single user.
async fn send_digest(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<SendDigestPayload>,
) -> StatusCode {
    if !is_from_task_queue(&headers) {
        tracing::warn!("Rejected send-digest call without task queue header");
        return StatusCode::FORBIDDEN;
    }

    let user = match state.db.get_user(&payload.user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            // Deleted between fanout and dispatch; permanent skip
            tracing::info!(user_id = %payload.user_id, "Digest skipped, user no longer exists");
            return StatusCode::OK;
        }
        Err(e) => {
            tracing::error!(user_id = %payload.user_id, error = %e, "Failed to load user");
            return StatusCode::INTERNAL_SERVER_ERROR;
        }
    };

    let Some(email) = user.email else {
        tracing::info!(user_id = %payload.user_id, "Digest skipped, user has no email");
        return StatusCode::OK;
    };

    let expenses = match state.db.list_expenses_for_user(&payload.user_id, None).await {
        Ok(expenses) => expenses,
        Err(e) => {
            tracing::error!(user_id = %payload.user_id, error = %e, "Failed to load expenses");
            return StatusCode::INTERNAL_SERVER_ERROR;
        }
    };
    let profile = match state.db.get_profile(&payload.user_id).await {
        Ok(profile) => profile.unwrap_or_default(),
        Err(e) => {
            tracing::error!(user_id = %payload.user_id, error = %e, "Failed to load profile");
            return StatusCode::INTERNAL_SERVER_ERROR;
        }
    };

    let current_year = current_tax_year();
    let stats = engine::dashboard_stats(&expenses, &profile, current_year);
    let points = engine::project(&profile, current_year);
    let summary = engine::summarize(&points);

    // list_expenses_for_user returns newest date of service first
    let recent = &expenses[..expenses.len().min(MAX_RECENT_EXPENSES)];
    let digest = render_digest(&payload.period_label, &stats, &summary, recent);

    match state.mailer.send(&email, &digest.subject, &digest.html).await {
        Ok(()) => {
            tracing::info!(user_id = %payload.user_id, "Digest sent");
            StatusCode::OK
        }
        Err(e) => {
            tracing::error!(user_id = %payload.user_id, error = %e, "Failed to send digest");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Delete all stored data for a user.
async fn delete_user(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<DeleteUserPayload>,
) -> StatusCode {
    if !is_from_task_queue(&headers) {
        tracing::warn!("Rejected delete-user call without task queue header");
        return StatusCode::FORBIDDEN;
    }

    tracing::info!(
        user_id = %payload.user_id,
        source = %payload.source,
        "Processing user deletion"
    );

    match state.db.delete_user_data(&payload.user_id).await {
        Ok(deleted) => {
            tracing::info!(
                user_id = %payload.user_id,
                documents_deleted = deleted,
                "User data deleted"
            );
            StatusCode::OK
        }
        Err(e) => {
            tracing::error!(user_id = %payload.user_id, error = %e, "User deletion failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
