// SPDX-License-Identifier: MIT

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (profile storage, digest fanout listing)
//! - Bank tokens (aggregator access tokens)
//! - Expenses (owner-scoped CRUD)
//! - Profiles (projection parameters)

use crate::db::collections;
use crate::error::AppError;
use crate::models::{BankTokens, ExpenseRecord, ProfileParameters, User};
use futures_util::{stream, StreamExt};

const MAX_CONCURRENT_DB_OPS: usize = 50;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // With the emulator use an unauthenticated connection to avoid
        // local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by identity-provider subject.
    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or update a user.
    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&user.user_id)
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// List all users (digest fanout).
    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Bank Token Operations ───────────────────────────────────

    /// Get the bank aggregator tokens for a user.
    pub async fn get_bank_tokens(&self, user_id: &str) -> Result<Option<BankTokens>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::BANK_TOKENS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Store bank aggregator tokens for a user.
    pub async fn set_bank_tokens(
        &self,
        user_id: &str,
        tokens: &BankTokens,
    ) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::BANK_TOKENS)
            .document_id(user_id)
            .object(tokens)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete bank tokens (unlink).
    pub async fn delete_bank_tokens(&self, user_id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::BANK_TOKENS)
            .document_id(user_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Profile Operations ──────────────────────────────────────

    /// Get projection parameters for a user.
    pub async fn get_profile(&self, user_id: &str) -> Result<Option<ProfileParameters>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::PROFILES)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Store projection parameters for a user.
    pub async fn set_profile(
        &self,
        user_id: &str,
        params: &ProfileParameters,
    ) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::PROFILES)
            .document_id(user_id)
            .object(params)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Expense Operations ──────────────────────────────────────

    /// Get an expense by ID.
    pub async fn get_expense(&self, expense_id: &str) -> Result<Option<ExpenseRecord>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::EXPENSES)
            .obj()
            .one(expense_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List a user's expenses ordered by service date (most recent first).
    ///
    /// Expense lists are small per user; year/account filtering happens
    /// in the handler.
    pub async fn list_expenses_for_user(
        &self,
        user_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<ExpenseRecord>, AppError> {
        let uid = user_id.to_string();
        let query = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::EXPENSES)
            .filter(move |q| q.field("user_id").eq(uid.clone()))
            .order_by([(
                "date_of_service",
                firestore::FirestoreQueryDirection::Descending,
            )]);

        let query = if let Some(limit) = limit {
            query.limit(limit)
        } else {
            query
        };

        query
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or update an expense.
    pub async fn set_expense(&self, expense: &ExpenseRecord) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::EXPENSES)
            .document_id(&expense.id)
            .object(expense)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete an expense.
    pub async fn delete_expense(&self, expense_id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::EXPENSES)
            .document_id(expense_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Account Deletion ────────────────────────────────────────

    /// Delete all data for a user: expenses, profile, bank tokens, and
    /// the user document. Returns the number of expense documents removed.
    pub async fn delete_user_data(&self, user_id: &str) -> Result<u32, AppError> {
        let expenses = self.list_expenses_for_user(user_id, None).await?;
        let count = expenses.len() as u32;

        let errors: Vec<AppError> = stream::iter(expenses)
            .map(|expense| async move { self.delete_expense(&expense.id).await })
            .buffer_unordered(MAX_CONCURRENT_DB_OPS)
            .filter_map(|result| async move { result.err() })
            .collect()
            .await;

        if let Some(first) = errors.into_iter().next() {
            return Err(first);
        }

        // Profile and bank-token deletes are idempotent even when the
        // documents never existed.
        let client = self.get_client()?;
        client
            .fluent()
            .delete()
            .from(collections::PROFILES)
            .document_id(user_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        self.delete_bank_tokens(user_id).await?;

        client
            .fluent()
            .delete()
            .from(collections::USERS)
            .document_id(user_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::info!(user_id, deleted_expenses = count, "User data deleted");
        Ok(count)
    }
}
