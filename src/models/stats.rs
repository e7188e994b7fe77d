// SPDX-License-Identifier: MIT

//! Dashboard summary statistics.
//!
//! Reduced from the full expense list on every request; cheap relative
//! to the Firestore fetch that precedes it, so nothing is cached.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Expense totals partitioned by account type.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AccountTotals {
    pub hsa: f64,
    pub fsa: f64,
    pub dependent_care_fsa: f64,
}

/// How many expenses have enough documentation to survive an audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AuditReadiness {
    pub total: u32,
    pub ready: u32,
    pub missing: u32,
}

/// Single-shot full-horizon projection over pending expenses.
///
/// Deliberately distinct from the year-by-year projection engine: each
/// pending amount is compounded once over the entire horizon.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ExpectedReturn {
    /// Sum of pending (unreimbursed) amounts
    pub pending_total: f64,
    /// Future value of those amounts at the horizon
    pub projected_value: f64,
    /// `projected_value - pending_total`
    pub extra_growth: f64,
}

/// Dashboard summary over a user's full expense list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DashboardStats {
    pub total_expenses: f64,
    pub total_reimbursed: f64,
    pub pending_reimbursement: f64,
    pub by_account: AccountTotals,
    pub audit_readiness: AuditReadiness,
    /// Expenses whose tax year is inside or approaching the end of the
    /// retention window
    pub retention_alerts: u32,
    pub expected_return: ExpectedReturn,
}
