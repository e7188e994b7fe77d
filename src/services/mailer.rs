// SPDX-License-Identifier: MIT

//! Transactional email client (Resend-style HTTP API).

use crate::error::AppError;

const DEFAULT_BASE_URL: &str = "https://api.resend.com";

/// Transactional email API client.
#[derive(Clone)]
pub struct MailerService {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    from: String,
}

impl MailerService {
    pub fn new(api_key: String, from: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
            from,
        }
    }

    /// Send an HTML email to a single recipient.
    pub async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), AppError> {
        if self.api_key.is_empty() {
            return Err(AppError::Email("Mailer not configured".to_string()));
        }

        let body = serde_json::json!({
            "from": self.from,
            "to": [to],
            "subject": subject,
            "html": html,
        });

        let response = self
            .http
            .post(format!("{}/emails", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Email(format!("Send request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::Email(format!("HTTP {}: {}", status, text)));
        }

        tracing::info!(to, subject, "Email sent");
        Ok(())
    }
}
