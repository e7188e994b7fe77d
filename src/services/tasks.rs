// SPDX-License-Identifier: MIT

//! Cloud Tasks service for background processing.
//!
//! This service creates Cloud Tasks for:
//! - Sending the periodic digest email (fanned out per user)
//! - Deleting a user's data after an account-deletion request
//!
//! Uses the official google-cloud-tasks-v2 SDK.

use crate::error::AppError;
use crate::error::Result;
use futures_util::{stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

const MAX_CONCURRENT_TASKS: usize = 50;

/// Payload for the per-user digest task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendDigestPayload {
    pub user_id: String,
    /// Human-readable period, e.g. "January 2026"
    pub period_label: String,
}

/// Payload for the digest fanout task (queued by Cloud Scheduler).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigestFanoutPayload {
    pub period_label: String,
}

/// Payload for user deletion task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteUserPayload {
    pub user_id: String,
    pub source: String, // "user_request"
}

/// Result of a batch digest fanout.
///
/// Tracks which users failed to queue so partial failures can be logged
/// and retried by the next scheduled run.
#[derive(Debug, Clone, Default)]
pub struct FanoutResult {
    /// Number of digest tasks successfully queued.
    pub queued: u32,
    /// Number of digest tasks that failed to queue.
    pub failed: u32,
    /// User IDs that failed to queue.
    pub failed_user_ids: Vec<String>,
}

impl FanoutResult {
    /// Returns true if all digests were successfully queued.
    pub fn is_complete_success(&self) -> bool {
        self.failed == 0
    }

    /// Returns true if all digests failed to queue.
    pub fn is_complete_failure(&self) -> bool {
        self.queued == 0 && self.failed > 0
    }

    /// Returns true if some digests succeeded and some failed.
    pub fn is_partial_failure(&self) -> bool {
        self.queued > 0 && self.failed > 0
    }
}

/// Cloud Tasks client wrapper.
pub struct TasksService {
    project_id: String,
    location: String,
    queue_name: String,
}

impl TasksService {
    pub fn new(project_id: &str, region: &str) -> Self {
        Self {
            project_id: project_id.to_string(),
            location: region.to_string(),
            queue_name: crate::config::DIGEST_QUEUE_NAME.to_string(),
        }
    }

    /// Queue a digest email for a single user.
    pub async fn queue_send_digest(
        &self,
        service_url: &str,
        payload: SendDigestPayload,
    ) -> Result<()> {
        self.queue_task(service_url, "/tasks/send-digest", &payload)
            .await
    }

    /// Queue a user deletion task.
    pub async fn queue_delete_user(
        &self,
        service_url: &str,
        payload: DeleteUserPayload,
    ) -> Result<()> {
        tracing::info!(
            user_id = %payload.user_id,
            source = %payload.source,
            "Queuing user deletion task"
        );
        self.queue_task(service_url, "/tasks/delete-user", &payload)
            .await
    }

    /// Queue per-user digest tasks for a batch of users.
    ///
    /// Returns a `FanoutResult` with details about which users were
    /// successfully queued and which failed.
    pub async fn queue_digest_batch(
        &self,
        service_url: &str,
        user_ids: Vec<String>,
        period_label: &str,
    ) -> FanoutResult {
        let count = user_ids.len();
        let batch_success = Arc::new(AtomicU64::new(0));
        let failed_user_ids = Arc::new(tokio::sync::Mutex::new(Vec::new()));

        stream::iter(user_ids)
            .for_each_concurrent(MAX_CONCURRENT_TASKS, |user_id| {
                let batch_success = Arc::clone(&batch_success);
                let failed_user_ids = Arc::clone(&failed_user_ids);
                async move {
                    let payload = SendDigestPayload {
                        user_id: user_id.clone(),
                        period_label: period_label.to_string(),
                    };

                    match self.queue_send_digest(service_url, payload).await {
                        Ok(_) => {
                            batch_success.fetch_add(1, Ordering::Relaxed);
                        }
                        Err(e) => {
                            tracing::warn!(
                                user_id = %user_id,
                                error = ?e,
                                "Failed to queue digest task"
                            );
                            failed_user_ids.lock().await.push(user_id);
                        }
                    }
                }
            })
            .await;

        let queued = batch_success.load(Ordering::Relaxed) as u32;
        let failed_user_ids = Arc::try_unwrap(failed_user_ids)
            .expect("All tasks completed, should have sole ownership")
            .into_inner();
        let failed = failed_user_ids.len() as u32;

        tracing::info!(
            requested = count,
            succeeded = queued,
            failed = failed,
            "Queued digest batch"
        );

        FanoutResult {
            queued,
            failed,
            failed_user_ids,
        }
    }

    /// Generic task queuing helper.
    async fn queue_task<T: Serialize>(
        &self,
        service_url: &str,
        endpoint: &str,
        payload: &T,
    ) -> Result<()> {
        use google_cloud_tasks_v2::client::CloudTasks;
        use google_cloud_tasks_v2::model::{HttpRequest, OidcToken, Task};

        let client = CloudTasks::builder()
            .build()
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Cloud Tasks client error: {}", e)))?;

        let queue_path = format!(
            "projects/{}/locations/{}/queues/{}",
            self.project_id, self.location, self.queue_name
        );

        let body = serde_json::to_vec(payload)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("JSON error: {}", e)))?;

        let http_request = HttpRequest::default()
            .set_url(format!("{}{}", service_url, endpoint))
            .set_http_method("POST")
            .set_body(axum::body::Bytes::from(body))
            .set_headers(std::collections::HashMap::from([(
                "Content-Type".to_string(),
                "application/json".to_string(),
            )]))
            .set_oidc_token(
                OidcToken::default()
                    .set_service_account_email(format!(
                        "hsa-ledger-api@{}.iam.gserviceaccount.com",
                        self.project_id
                    ))
                    .set_audience(service_url.to_string()),
            );

        let task = Task::default().set_http_request(http_request);

        let _response = client
            .create_task()
            .set_parent(queue_path)
            .set_task(task)
            .send()
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Cloud Tasks create error: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fanout_result_complete_success() {
        let result = FanoutResult {
            queued: 5,
            failed: 0,
            failed_user_ids: vec![],
        };

        assert!(result.is_complete_success());
        assert!(!result.is_complete_failure());
        assert!(!result.is_partial_failure());
    }

    #[test]
    fn fanout_result_complete_failure() {
        let result = FanoutResult {
            queued: 0,
            failed: 2,
            failed_user_ids: vec!["a".to_string(), "b".to_string()],
        };

        assert!(!result.is_complete_success());
        assert!(result.is_complete_failure());
        assert!(!result.is_partial_failure());
    }

    #[test]
    fn fanout_result_partial_failure() {
        let result = FanoutResult {
            queued: 3,
            failed: 1,
            failed_user_ids: vec!["c".to_string()],
        };

        assert!(!result.is_complete_success());
        assert!(!result.is_complete_failure());
        assert!(result.is_partial_failure());
    }

    #[test]
    fn fanout_result_empty_is_success() {
        let result = FanoutResult::default();

        assert!(result.is_complete_success());
        assert!(!result.is_complete_failure());
        assert!(!result.is_partial_failure());
    }

    #[test]
    fn fanout_result_failed_ids_match_failed_count() {
        let result = FanoutResult {
            queued: 7,
            failed: 2,
            failed_user_ids: vec!["x".to_string(), "y".to_string()],
        };

        assert_eq!(result.failed_user_ids.len() as u32, result.failed);
    }
}
