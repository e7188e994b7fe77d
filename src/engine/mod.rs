// SPDX-License-Identifier: MIT

//! The financial core: projection, audit/retention rules, aggregation.
//!
//! Everything in this module is a pure, total function over plain data.
//! Degenerate inputs (empty lists, zero horizons, negative rates) produce
//! well-defined output instead of errors; input validation belongs to the
//! route layer.

pub mod aggregate;
pub mod audit;
pub mod projection;

pub use aggregate::{dashboard_stats, expected_return};
pub use audit::{is_audit_ready, retention_status, RetentionStatus};
pub use projection::{project, summarize, CAPITAL_GAINS_RATE};

/// Round to the nearest whole currency unit (projection chart values).
pub(crate) fn round_unit(value: f64) -> f64 {
    value.round()
}

/// Round to cents (aggregate dashboard values).
pub(crate) fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
