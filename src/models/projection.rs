// SPDX-License-Identifier: MIT

//! Projection output types. Derived on every request, never persisted.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// One simulated year of account growth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProjectionPoint {
    /// Year offset from today (0 = now)
    pub year: u32,
    /// Calendar-year label for charts
    pub calendar_year: i32,
    /// Projected balance under tax-advantaged growth
    pub balance: f64,
    /// Cumulative nominal contributions (including the starting balance)
    pub total_contributions: f64,
    /// Cumulative growth (`balance - total_contributions`)
    pub total_growth: f64,
    /// Cumulative tax savings from pre-tax contributions
    pub tax_savings: f64,
    /// Equivalent balance in a taxable brokerage account
    pub taxable_equivalent: f64,
}

/// Summary of the final projected year.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProjectionSummary {
    pub projected_balance: f64,
    pub total_contributed: f64,
    pub total_growth: f64,
    pub total_tax_savings: f64,
    /// Final-year advantage over the taxable brokerage equivalent
    pub hsa_advantage: f64,
}
