// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod expense;
pub mod profile;
pub mod projection;
pub mod stats;
pub mod user;

pub use expense::{AccountType, DocumentKind, ExpenseCategory, ExpenseRecord};
pub use profile::ProfileParameters;
pub use projection::{ProjectionPoint, ProjectionSummary};
pub use stats::DashboardStats;
pub use user::{BankTokens, User};
