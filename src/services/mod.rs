// SPDX-License-Identifier: MIT

//! Services module - external collaborators and business logic.

pub mod bank;
pub mod digest;
pub mod identity;
pub mod mailer;
pub mod storage;
pub mod tasks;

pub use bank::BankService;
pub use digest::{render_digest, RenderedDigest};
pub use identity::{GoogleUserInfo, IdentityService};
pub use mailer::MailerService;
pub use storage::StorageService;
pub use tasks::TasksService;
