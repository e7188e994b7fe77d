// SPDX-License-Identifier: MIT

//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    /// Bank aggregator access tokens (keyed by user_id)
    pub const BANK_TOKENS: &str = "bank_tokens";
    pub const EXPENSES: &str = "expenses";
    /// Projection parameters (keyed by user_id)
    pub const PROFILES: &str = "profiles";
}
