// SPDX-License-Identifier: MIT

//! Audit-readiness and retention-window classification.
//!
//! Pure predicates over an expense's attached documentation and tax
//! year. Retention status is a derived, read-only classification; it
//! never triggers deletion.

use crate::models::ExpenseRecord;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// How long tax records must be kept after filing, in years.
pub const RETENTION_YEARS: i32 = 7;

/// How many years before the retention deadline a warning is raised.
pub const RETENTION_WARNING_LEAD_YEARS: i32 = 1;

/// Where an expense's tax year sits relative to the retention window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "snake_case")]
pub enum RetentionStatus {
    Safe,
    Warning,
    Critical,
}

/// True iff the expense has enough documentation to withstand an audit:
/// a receipt plus either an explanation of benefits or an invoice.
///
/// Credit-card statements are informational only and never counted.
pub fn is_audit_ready(expense: &ExpenseRecord) -> bool {
    !expense.receipt_urls.is_empty()
        && (!expense.eob_urls.is_empty() || !expense.invoice_urls.is_empty())
}

/// Classify a tax year against the retention window.
pub fn retention_status(tax_year: i32, current_year: i32) -> RetentionStatus {
    let years_elapsed = current_year - tax_year;
    if years_elapsed >= RETENTION_YEARS {
        RetentionStatus::Critical
    } else if years_elapsed >= RETENTION_YEARS - RETENTION_WARNING_LEAD_YEARS {
        RetentionStatus::Warning
    } else {
        RetentionStatus::Safe
    }
}
