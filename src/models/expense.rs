// SPDX-License-Identifier: MIT

//! Expense record model for storage and API.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Account an expense is tracked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    /// The primary tax-advantaged account
    Hsa,
    /// General-purpose Flexible Spending Account
    Fsa,
    /// Dependent-care FSA variant
    DependentCareFsa,
}

/// Expense category (fixed enumeration).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    Medical,
    Dental,
    Vision,
    Pharmacy,
    MentalHealth,
    Equipment,
    Other,
}

/// Kind of supporting document attached to an expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Receipt,
    /// Explanation of benefits
    Eob,
    Invoice,
    /// Credit-card statement (informational only, never counts toward
    /// audit readiness)
    Statement,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Receipt => "receipt",
            DocumentKind::Eob => "eob",
            DocumentKind::Invoice => "invoice",
            DocumentKind::Statement => "statement",
        }
    }
}

/// One out-of-pocket medical cost, stored in Firestore.
///
/// Invariant (enforced at the mutation endpoints): `reimbursed == true`
/// implies `reimbursed_amount` and `reimbursed_date` are present;
/// `reimbursed == false` implies both are absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ExpenseRecord {
    /// Document ID (UUID v4)
    pub id: String,
    /// Owner (identity provider subject)
    pub user_id: String,
    /// Short description ("Dental cleaning", "New glasses", ...)
    pub description: String,
    /// Out-of-pocket amount in currency units
    pub amount: f64,
    /// Service date (ISO `YYYY-MM-DD`)
    pub date_of_service: String,
    /// End of a multi-day service range, if any
    pub date_of_service_end: Option<String>,
    /// Explicit tax-year override; when absent the tax year is the
    /// calendar year of the service date
    pub tax_year: Option<i32>,
    /// Whether this expense has been reimbursed from the account
    pub reimbursed: bool,
    pub reimbursed_amount: Option<f64>,
    /// Reimbursement date (ISO `YYYY-MM-DD`)
    pub reimbursed_date: Option<String>,
    pub account_type: AccountType,
    pub category: ExpenseCategory,
    /// Attached document URLs by kind
    #[serde(default)]
    pub receipt_urls: Vec<String>,
    #[serde(default)]
    pub eob_urls: Vec<String>,
    #[serde(default)]
    pub invoice_urls: Vec<String>,
    #[serde(default)]
    pub statement_urls: Vec<String>,
    /// Created/updated timestamps (RFC3339)
    pub created_at: String,
    pub updated_at: String,
}

impl ExpenseRecord {
    /// Tax year this expense counts against: the explicit override if
    /// set, otherwise the calendar year of the service date.
    ///
    /// Returns `None` only if the service date is malformed.
    pub fn effective_tax_year(&self) -> Option<i32> {
        if let Some(year) = self.tax_year {
            return Some(year);
        }
        extract_year(&self.date_of_service)
    }

    /// The URL list for a given document kind.
    pub fn document_urls_mut(&mut self, kind: DocumentKind) -> &mut Vec<String> {
        match kind {
            DocumentKind::Receipt => &mut self.receipt_urls,
            DocumentKind::Eob => &mut self.eob_urls,
            DocumentKind::Invoice => &mut self.invoice_urls,
            DocumentKind::Statement => &mut self.statement_urls,
        }
    }
}

/// Extract the `YYYY` year from an ISO date string.
fn extract_year(date: &str) -> Option<i32> {
    date.get(..4)?.parse().ok()
}
