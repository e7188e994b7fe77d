// SPDX-License-Identifier: MIT

//! Per-user financial assumptions driving the projection engine.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

fn default_annual_contribution() -> f64 {
    4150.0
}
fn default_annual_return_pct() -> f64 {
    7.0
}
fn default_time_horizon_years() -> u32 {
    20
}
fn default_federal_tax_pct() -> f64 {
    22.0
}
fn default_state_tax_pct() -> f64 {
    5.0
}

/// Financial assumptions for the projection engine.
///
/// Stored at `profiles/{user_id}`; every field has a sane default so a
/// fresh account can render projections before any setup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProfileParameters {
    /// Current account balance (refreshed by the bank link, or entered
    /// manually)
    #[serde(default)]
    pub current_balance: f64,
    /// Planned annual contribution
    #[serde(default = "default_annual_contribution")]
    pub annual_contribution: f64,
    /// Expected annual rate of return (percent)
    #[serde(default = "default_annual_return_pct")]
    pub annual_return_pct: f64,
    /// Projection horizon in years
    #[serde(default = "default_time_horizon_years")]
    pub time_horizon_years: u32,
    /// Marginal federal tax rate (percent)
    #[serde(default = "default_federal_tax_pct")]
    pub federal_tax_pct: f64,
    /// Marginal state tax rate (percent)
    #[serde(default = "default_state_tax_pct")]
    pub state_tax_pct: f64,
}

impl Default for ProfileParameters {
    fn default() -> Self {
        Self {
            current_balance: 0.0,
            annual_contribution: default_annual_contribution(),
            annual_return_pct: default_annual_return_pct(),
            time_horizon_years: default_time_horizon_years(),
            federal_tax_pct: default_federal_tax_pct(),
            state_tax_pct: default_state_tax_pct(),
        }
    }
}
