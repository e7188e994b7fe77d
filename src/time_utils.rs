// SPDX-License-Identifier: MIT

//! Shared helpers for date/time handling.

use chrono::{DateTime, Datelike, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Today's date as an ISO `YYYY-MM-DD` string (UTC).
pub fn today_iso_date() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

/// The current calendar year, used as the reference for retention
/// classification and projection labels.
pub fn current_tax_year() -> i32 {
    Utc::now().year()
}
