// SPDX-License-Identifier: MIT

//! Expense CRUD, reimbursement, and document upload routes.

use axum::{
    extract::{Multipart, Path, Query, State},
    routing::{get, post, put},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{AccountType, DocumentKind, ExpenseCategory, ExpenseRecord};
use crate::time_utils::{format_utc_rfc3339, today_iso_date};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/expenses", get(list_expenses).post(create_expense))
        .route("/api/expenses/{id}", put(update_expense).delete(delete_expense))
        .route("/api/expenses/{id}/reimburse", post(reimburse_expense))
        .route("/api/expenses/{id}/documents", post(upload_document))
}

/// Optional list filters, applied after the per-user fetch.
#[derive(Deserialize, Default)]
pub struct ListQuery {
    pub tax_year: Option<i32>,
    pub account_type: Option<AccountType>,
    /// "pending" or "reimbursed"
    pub status: Option<String>,
    pub limit: Option<u32>,
}

/// List the user's expenses, newest date of service first.
async fn list_expenses(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<ExpenseRecord>>> {
    if let Some(status) = query.status.as_deref() {
        if status != "pending" && status != "reimbursed" {
            return Err(AppError::BadRequest(
                "status must be 'pending' or 'reimbursed'".to_string(),
            ));
        }
    }

    let mut expenses = state.db.list_expenses_for_user(&auth.user_id, None).await?;

    if let Some(tax_year) = query.tax_year {
        expenses.retain(|e| e.effective_tax_year() == Some(tax_year));
    }
    if let Some(account_type) = query.account_type {
        expenses.retain(|e| e.account_type == account_type);
    }
    match query.status.as_deref() {
        Some("pending") => expenses.retain(|e| !e.reimbursed),
        Some("reimbursed") => expenses.retain(|e| e.reimbursed),
        _ => {}
    }
    if let Some(limit) = query.limit {
        expenses.truncate(limit as usize);
    }

    Ok(Json(expenses))
}

#[derive(Deserialize, Validate)]
pub struct CreateExpenseRequest {
    #[validate(length(min = 1, max = 200, message = "Description must be 1-200 characters"))]
    pub description: String,
    #[validate(range(min = 0.01, message = "Amount must be positive"))]
    pub amount: f64,
    pub date_of_service: String,
    #[serde(default)]
    pub date_of_service_end: Option<String>,
    #[serde(default)]
    #[validate(range(min = 2000, max = 2100, message = "Tax year out of range"))]
    pub tax_year: Option<i32>,
    pub account_type: AccountType,
    pub category: ExpenseCategory,
}

/// Create a new expense. Always starts unreimbursed with no documents.
async fn create_expense(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<CreateExpenseRequest>,
) -> Result<Json<ExpenseRecord>> {
    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    validate_date(&req.date_of_service)?;
    if let Some(end) = req.date_of_service_end.as_deref() {
        validate_date(end)?;
        if end < req.date_of_service.as_str() {
            return Err(AppError::BadRequest(
                "date_of_service_end cannot precede date_of_service".to_string(),
            ));
        }
    }

    let now = format_utc_rfc3339(chrono::Utc::now());
    let expense = ExpenseRecord {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: auth.user_id.clone(),
        description: req.description,
        amount: req.amount,
        date_of_service: req.date_of_service,
        date_of_service_end: req.date_of_service_end,
        tax_year: req.tax_year,
        reimbursed: false,
        reimbursed_amount: None,
        reimbursed_date: None,
        account_type: req.account_type,
        category: req.category,
        receipt_urls: vec![],
        eob_urls: vec![],
        invoice_urls: vec![],
        statement_urls: vec![],
        created_at: now.clone(),
        updated_at: now,
    };
    state.db.set_expense(&expense).await?;

    tracing::info!(user_id = %auth.user_id, expense_id = %expense.id, "Expense created");

    Ok(Json(expense))
}

#[derive(Deserialize, Validate, Default)]
pub struct UpdateExpenseRequest {
    #[validate(length(min = 1, max = 200, message = "Description must be 1-200 characters"))]
    pub description: Option<String>,
    #[validate(range(min = 0.01, message = "Amount must be positive"))]
    pub amount: Option<f64>,
    pub date_of_service: Option<String>,
    pub date_of_service_end: Option<String>,
    #[validate(range(min = 2000, max = 2100, message = "Tax year out of range"))]
    pub tax_year: Option<i32>,
    pub account_type: Option<AccountType>,
    pub category: Option<ExpenseCategory>,
}

/// Update an existing expense's descriptive fields.
///
/// Reimbursement state is only changed through the reimburse endpoint,
/// and document lists only through the upload endpoint.
async fn update_expense(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(req): Json<UpdateExpenseRequest>,
) -> Result<Json<ExpenseRecord>> {
    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    if let Some(date) = req.date_of_service.as_deref() {
        validate_date(date)?;
    }
    if let Some(end) = req.date_of_service_end.as_deref() {
        validate_date(end)?;
    }

    let mut expense = fetch_owned_expense(&state, &auth, &id).await?;

    if let Some(description) = req.description {
        expense.description = description;
    }
    if let Some(amount) = req.amount {
        expense.amount = amount;
    }
    if let Some(date) = req.date_of_service {
        expense.date_of_service = date;
    }
    if req.date_of_service_end.is_some() {
        expense.date_of_service_end = req.date_of_service_end;
    }
    if req.tax_year.is_some() {
        expense.tax_year = req.tax_year;
    }
    if let Some(account_type) = req.account_type {
        expense.account_type = account_type;
    }
    if let Some(category) = req.category {
        expense.category = category;
    }
    expense.updated_at = format_utc_rfc3339(chrono::Utc::now());

    state.db.set_expense(&expense).await?;

    Ok(Json(expense))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DeleteExpenseResponse {
    pub deleted: bool,
}

async fn delete_expense(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<DeleteExpenseResponse>> {
    // Ownership check before delete
    let expense = fetch_owned_expense(&state, &auth, &id).await?;
    state.db.delete_expense(&expense.id).await?;

    tracing::info!(user_id = %auth.user_id, expense_id = %id, "Expense deleted");

    Ok(Json(DeleteExpenseResponse { deleted: true }))
}

#[derive(Deserialize, Validate)]
pub struct ReimburseRequest {
    pub reimbursed: bool,
    #[validate(range(min = 0.0, message = "Reimbursed amount cannot be negative"))]
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub date: Option<String>,
}

/// Mark an expense reimbursed or roll a reimbursement back.
///
/// Marking reimbursed defaults the amount to the expense amount and the
/// date to today. Un-marking clears both fields.
async fn reimburse_expense(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(req): Json<ReimburseRequest>,
) -> Result<Json<ExpenseRecord>> {
    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    if let Some(date) = req.date.as_deref() {
        validate_date(date)?;
    }

    let mut expense = fetch_owned_expense(&state, &auth, &id).await?;

    if req.reimbursed {
        expense.reimbursed = true;
        expense.reimbursed_amount = Some(req.amount.unwrap_or(expense.amount));
        expense.reimbursed_date = Some(req.date.unwrap_or_else(today_iso_date));
    } else {
        expense.reimbursed = false;
        expense.reimbursed_amount = None;
        expense.reimbursed_date = None;
    }
    expense.updated_at = format_utc_rfc3339(chrono::Utc::now());

    state.db.set_expense(&expense).await?;

    tracing::info!(
        user_id = %auth.user_id,
        expense_id = %id,
        reimbursed = expense.reimbursed,
        "Reimbursement state updated"
    );

    Ok(Json(expense))
}

#[derive(Deserialize)]
pub struct UploadQuery {
    pub kind: DocumentKind,
}

/// Upload a supporting document and attach its URL to the expense.
async fn upload_document(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<String>,
    Query(query): Query<UploadQuery>,
    mut multipart: Multipart,
) -> Result<Json<ExpenseRecord>> {
    let mut expense = fetch_owned_expense(&state, &auth, &id).await?;

    let mut uploaded = false;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .unwrap_or("document")
            .to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {}", e)))?;

        if bytes.is_empty() {
            return Err(AppError::BadRequest("Uploaded file is empty".to_string()));
        }

        let url = state
            .storage_service
            .upload_document(
                &auth.user_id,
                query.kind,
                &filename,
                &content_type,
                bytes.to_vec(),
            )
            .await?;

        expense.document_urls_mut(query.kind).push(url);
        uploaded = true;
    }

    if !uploaded {
        return Err(AppError::BadRequest(
            "Multipart body must contain a 'file' field".to_string(),
        ));
    }

    expense.updated_at = format_utc_rfc3339(chrono::Utc::now());
    state.db.set_expense(&expense).await?;

    tracing::info!(
        user_id = %auth.user_id,
        expense_id = %id,
        kind = query.kind.as_str(),
        "Document attached"
    );

    Ok(Json(expense))
}

/// Fetch an expense and verify it belongs to the caller.
///
/// Someone else's expense reads as NotFound so IDs don't leak.
async fn fetch_owned_expense(
    state: &Arc<AppState>,
    auth: &AuthUser,
    id: &str,
) -> Result<ExpenseRecord> {
    let expense = state
        .db
        .get_expense(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Expense not found".to_string()))?;

    if expense.user_id != auth.user_id {
        return Err(AppError::NotFound("Expense not found".to_string()));
    }

    Ok(expense)
}

/// Require a calendar date in YYYY-MM-DD form.
fn validate_date(value: &str) -> Result<()> {
    chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest(format!("Invalid date '{}', expected YYYY-MM-DD", value)))?;
    Ok(())
}
