// SPDX-License-Identifier: MIT

//! Application configuration loaded from environment variables.
//!
//! Secrets are injected as environment variables by Cloud Run secret
//! bindings and cached in memory at startup.

use std::env;

/// Cloud Tasks queue used for digest and deletion tasks.
pub const DIGEST_QUEUE_NAME: &str = "hsa-digest";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Google OAuth client ID (public)
    pub google_client_id: String,
    /// Frontend URL for OAuth redirects
    pub frontend_url: String,
    /// Public URL of this API (used for Cloud Tasks callbacks)
    pub api_url: String,
    /// GCP project ID
    pub gcp_project_id: String,
    /// GCP region for Cloud Tasks
    pub gcp_region: String,
    /// GCS bucket for uploaded expense documents
    pub storage_bucket: String,
    /// Server port
    pub port: u16,

    // --- Secrets (injected via secret bindings) ---
    /// Google OAuth client secret
    pub google_client_secret: String,
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// HMAC key for signing the OAuth state parameter
    pub oauth_state_key: Vec<u8>,
    /// Plaid API credentials for bank linking
    pub plaid_client_id: String,
    pub plaid_secret: String,
    /// Plaid environment base URL
    pub plaid_base_url: String,
    /// Transactional email API key
    pub mail_api_key: String,
    /// From address for digest emails
    pub mail_from: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            google_client_id: env::var("GOOGLE_CLIENT_ID")
                .map_err(|_| ConfigError::Missing("GOOGLE_CLIENT_ID"))?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            api_url: env::var("API_URL").unwrap_or_else(|_| "http://localhost:8080".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            gcp_region: env::var("GCP_REGION").unwrap_or_else(|_| "us-west1".to_string()),
            storage_bucket: env::var("STORAGE_BUCKET")
                .unwrap_or_else(|_| "hsa-ledger-documents".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),

            google_client_secret: env::var("GOOGLE_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("GOOGLE_CLIENT_SECRET"))?,
            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
            oauth_state_key: env::var("OAUTH_STATE_KEY")
                .map_err(|_| ConfigError::Missing("OAUTH_STATE_KEY"))?
                .into_bytes(),
            plaid_client_id: env::var("PLAID_CLIENT_ID").unwrap_or_default(),
            plaid_secret: env::var("PLAID_SECRET").unwrap_or_default(),
            plaid_base_url: env::var("PLAID_BASE_URL")
                .unwrap_or_else(|_| "https://sandbox.plaid.com".to_string()),
            mail_api_key: env::var("MAIL_API_KEY").unwrap_or_default(),
            mail_from: env::var("MAIL_FROM")
                .unwrap_or_else(|_| "HSA Ledger <digest@hsaledger.app>".to_string()),
        })
    }

    /// Default config for tests (no real credentials).
    pub fn test_default() -> Self {
        Self {
            google_client_id: "test_client_id".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
            api_url: "http://localhost:8080".to_string(),
            gcp_project_id: "test-project".to_string(),
            gcp_region: "us-west1".to_string(),
            storage_bucket: "test-bucket".to_string(),
            port: 8080,
            google_client_secret: "test_secret".to_string(),
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!!".to_vec(),
            oauth_state_key: b"test_state_key".to_vec(),
            plaid_client_id: "test_plaid_id".to_string(),
            plaid_secret: "test_plaid_secret".to_string(),
            plaid_base_url: "https://sandbox.plaid.com".to_string(),
            mail_api_key: "test_mail_key".to_string(),
            mail_from: "HSA Ledger <digest@test.local>".to_string(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
