// SPDX-License-Identifier: MIT

//! User model for storage and API.

use serde::{Deserialize, Serialize};

/// User profile stored in Firestore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Identity provider subject (also used as document ID)
    pub user_id: String,
    /// Email address (digest destination; may be None if not shared)
    pub email: Option<String>,
    /// Display name
    pub name: String,
    /// Profile picture URL
    pub picture: Option<String>,
    /// When user first signed in
    pub created_at: String,
    /// Last sign-in timestamp
    pub last_active: String,
    /// Set when the user has requested account deletion
    pub deletion_requested_at: Option<String>,
}

/// Bank aggregator access token for balance refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankTokens {
    /// Aggregator access token (opaque)
    pub access_token: String,
    /// Aggregator item ID
    pub item_id: String,
    /// When the account was linked (RFC3339)
    pub linked_at: String,
}
