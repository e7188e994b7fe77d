// SPDX-License-Identifier: MIT

//! HSA Ledger: track HSA expenses, receipts, and tax-free growth
//!
//! This crate provides the backend API for recording qualified medical
//! expenses, attaching supporting documents, and projecting the value of
//! delayed reimbursement.

pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use services::{BankService, MailerService, StorageService, TasksService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub storage_service: StorageService,
    pub tasks_service: TasksService,
    pub bank_service: BankService,
    pub mailer: MailerService,
}
