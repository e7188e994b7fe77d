// SPDX-License-Identifier: MIT

//! HSA Ledger API Server
//!
//! Tracks qualified medical expenses against HSA/FSA accounts, stores
//! supporting documents, and projects the payoff of delaying
//! reimbursement.

use hsa_ledger::{
    config::Config,
    db::FirestoreDb,
    services::{BankService, MailerService, StorageService, TasksService},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting HSA Ledger API");

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.gcp_project_id)
        .await
        .expect("Failed to connect to Firestore");

    // Initialize Cloud Storage for document uploads
    let storage_service = StorageService::new(&config.storage_bucket)
        .await
        .expect("Failed to initialize Cloud Storage");
    tracing::info!(bucket = %config.storage_bucket, "Cloud Storage initialized");

    // Initialize Cloud Tasks service
    let tasks_service = TasksService::new(&config.gcp_project_id, &config.gcp_region);
    tracing::info!(
        project = %config.gcp_project_id,
        "Cloud Tasks service initialized"
    );

    // Initialize bank aggregator client
    let bank_service = BankService::new(
        config.plaid_base_url.clone(),
        config.plaid_client_id.clone(),
        config.plaid_secret.clone(),
    );

    // Initialize mailer for digest emails
    let mailer = MailerService::new(config.mail_api_key.clone(), config.mail_from.clone());

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        storage_service,
        tasks_service,
        bank_service,
        mailer,
    });

    // Build router
    let app = hsa_ledger::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("hsa_ledger=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
