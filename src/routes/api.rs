// SPDX-License-Identifier: MIT

//! Authenticated API routes: profile, stats, projection, bank linking.

use axum::{
    extract::{Query, State},
    routing::{delete, get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::engine;
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{DashboardStats, ProfileParameters, ProjectionPoint, ProjectionSummary, User};
use crate::services::tasks::DeleteUserPayload;
use crate::time_utils::{current_tax_year, format_utc_rfc3339};
use crate::AppState;

/// Hard cap on the projection horizon, in years.
const MAX_TIME_HORIZON_YEARS: u32 = 100;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me))
        .route("/api/account", delete(delete_account))
        .route("/api/profile", get(get_profile).put(update_profile))
        .route("/api/stats", get(get_stats))
        .route("/api/projection", get(get_projection))
        .route("/api/bank/link-token", post(create_link_token))
        .route("/api/bank/exchange", post(exchange_public_token))
        .route("/api/bank/refresh-balance", post(refresh_balance))
}

/// Get the authenticated user's profile info.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<User>> {
    let user = state
        .db
        .get_user(&auth.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DeleteAccountResponse {
    pub status: String,
}

/// Request deletion of the user's account and all stored data.
///
/// Marks the user record, then queues the actual deletion as a task so
/// the request returns quickly and the deletion retries on failure.
async fn delete_account(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<DeleteAccountResponse>> {
    let mut user = state
        .db
        .get_user(&auth.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    user.deletion_requested_at = Some(format_utc_rfc3339(chrono::Utc::now()));
    state.db.upsert_user(&user).await?;

    let payload = DeleteUserPayload {
        user_id: auth.user_id.clone(),
        source: "user_request".to_string(),
    };
    state
        .tasks_service
        .queue_delete_user(&state.config.api_url, payload)
        .await?;

    tracing::info!(user_id = %auth.user_id, "Account deletion requested");

    Ok(Json(DeleteAccountResponse {
        status: "deletion_queued".to_string(),
    }))
}

/// Get the saved projection parameters (defaults if never saved).
async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<ProfileParameters>> {
    let profile = state
        .db
        .get_profile(&auth.user_id)
        .await?
        .unwrap_or_default();

    Ok(Json(profile))
}

#[derive(Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(range(min = 0.0, message = "Balance cannot be negative"))]
    pub current_balance: f64,
    #[validate(range(min = 0.0, max = 100_000.0, message = "Contribution out of range"))]
    pub annual_contribution: f64,
    #[validate(range(min = -50.0, max = 50.0, message = "Return rate out of range"))]
    pub annual_return_pct: f64,
    #[validate(range(max = 100, message = "Horizon too long"))]
    pub time_horizon_years: u32,
    #[validate(range(min = 0.0, max = 60.0, message = "Federal tax rate out of range"))]
    pub federal_tax_pct: f64,
    #[validate(range(min = 0.0, max = 30.0, message = "State tax rate out of range"))]
    pub state_tax_pct: f64,
}

/// Replace the saved projection parameters.
async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileParameters>> {
    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let profile = ProfileParameters {
        current_balance: req.current_balance,
        annual_contribution: req.annual_contribution,
        annual_return_pct: req.annual_return_pct,
        time_horizon_years: req.time_horizon_years,
        federal_tax_pct: req.federal_tax_pct,
        state_tax_pct: req.state_tax_pct,
    };
    state.db.set_profile(&auth.user_id, &profile).await?;

    Ok(Json(profile))
}

/// Dashboard statistics over all of the user's expenses.
async fn get_stats(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<DashboardStats>> {
    let expenses = state.db.list_expenses_for_user(&auth.user_id, None).await?;
    let profile = state
        .db
        .get_profile(&auth.user_id)
        .await?
        .unwrap_or_default();

    let stats = engine::dashboard_stats(&expenses, &profile, current_tax_year());
    Ok(Json(stats))
}

/// Query-string overrides for the projection. Any omitted field falls
/// back to the saved profile.
#[derive(Deserialize, Default)]
pub struct ProjectionQuery {
    pub current_balance: Option<f64>,
    pub annual_contribution: Option<f64>,
    pub annual_return_pct: Option<f64>,
    pub time_horizon_years: Option<u32>,
    pub federal_tax_pct: Option<f64>,
    pub state_tax_pct: Option<f64>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProjectionResponse {
    pub points: Vec<ProjectionPoint>,
    pub summary: ProjectionSummary,
    pub parameters: ProfileParameters,
}

/// Run the growth projection, with optional what-if overrides.
async fn get_projection(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<ProjectionQuery>,
) -> Result<Json<ProjectionResponse>> {
    // Validate overrides before touching the database
    if let Some(horizon) = query.time_horizon_years {
        if horizon > MAX_TIME_HORIZON_YEARS {
            return Err(AppError::BadRequest(format!(
                "time_horizon_years must be at most {}",
                MAX_TIME_HORIZON_YEARS
            )));
        }
    }
    if let Some(balance) = query.current_balance {
        if !balance.is_finite() || balance < 0.0 {
            return Err(AppError::BadRequest(
                "current_balance must be a non-negative number".to_string(),
            ));
        }
    }
    if let Some(contribution) = query.annual_contribution {
        if !contribution.is_finite() || contribution < 0.0 {
            return Err(AppError::BadRequest(
                "annual_contribution must be a non-negative number".to_string(),
            ));
        }
    }

    let saved = state
        .db
        .get_profile(&auth.user_id)
        .await?
        .unwrap_or_default();

    let parameters = ProfileParameters {
        current_balance: query.current_balance.unwrap_or(saved.current_balance),
        annual_contribution: query
            .annual_contribution
            .unwrap_or(saved.annual_contribution),
        annual_return_pct: query.annual_return_pct.unwrap_or(saved.annual_return_pct),
        time_horizon_years: query
            .time_horizon_years
            .unwrap_or(saved.time_horizon_years),
        federal_tax_pct: query.federal_tax_pct.unwrap_or(saved.federal_tax_pct),
        state_tax_pct: query.state_tax_pct.unwrap_or(saved.state_tax_pct),
    };

    let points = engine::project(&parameters, current_tax_year());
    let summary = engine::summarize(&points);

    Ok(Json(ProjectionResponse {
        points,
        summary,
        parameters,
    }))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LinkTokenResponse {
    pub link_token: String,
}

/// Start the bank-linking flow.
async fn create_link_token(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<LinkTokenResponse>> {
    let link_token = state.bank_service.create_link_token(&auth.user_id).await?;
    Ok(Json(LinkTokenResponse { link_token }))
}

#[derive(Deserialize)]
pub struct ExchangeRequest {
    pub public_token: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct BalanceResponse {
    pub current_balance: f64,
}

/// Finish the bank-linking flow and pull an initial balance.
async fn exchange_public_token(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<ExchangeRequest>,
) -> Result<Json<BalanceResponse>> {
    if req.public_token.is_empty() {
        return Err(AppError::BadRequest("public_token is required".to_string()));
    }

    let tokens = state
        .bank_service
        .exchange_public_token(&req.public_token)
        .await?;
    state.db.set_bank_tokens(&auth.user_id, &tokens).await?;

    tracing::info!(user_id = %auth.user_id, item_id = %tokens.item_id, "Bank account linked");

    let balance = state.bank_service.fetch_balance(&tokens.access_token).await?;
    let current_balance = apply_balance(&state, &auth.user_id, balance).await?;

    Ok(Json(BalanceResponse { current_balance }))
}

/// Re-fetch the balance from the linked bank account.
async fn refresh_balance(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<BalanceResponse>> {
    let tokens = state
        .db
        .get_bank_tokens(&auth.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("No linked bank account".to_string()))?;

    let balance = state.bank_service.fetch_balance(&tokens.access_token).await?;
    let current_balance = apply_balance(&state, &auth.user_id, balance).await?;

    Ok(Json(BalanceResponse { current_balance }))
}

/// Store a fetched balance as the profile's current_balance.
async fn apply_balance(state: &Arc<AppState>, user_id: &str, balance: f64) -> Result<f64> {
    let mut profile = state.db.get_profile(user_id).await?.unwrap_or_default();
    profile.current_balance = balance;
    state.db.set_profile(user_id, &profile).await?;

    tracing::info!(user_id, balance, "Refreshed bank balance");
    Ok(balance)
}
