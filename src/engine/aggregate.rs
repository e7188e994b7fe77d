// SPDX-License-Identifier: MIT

//! Reduce an expense list into dashboard summary statistics.

use super::audit::{is_audit_ready, retention_status, RetentionStatus};
use super::round_cents;
use crate::models::stats::{AccountTotals, AuditReadiness, ExpectedReturn};
use crate::models::{AccountType, DashboardStats, ExpenseRecord, ProfileParameters};

/// Compute the dashboard summary for a user's expenses.
///
/// Deterministic and idempotent: the same inputs always reduce to
/// bit-identical output.
pub fn dashboard_stats(
    expenses: &[ExpenseRecord],
    params: &ProfileParameters,
    current_year: i32,
) -> DashboardStats {
    let total_expenses: f64 = expenses.iter().map(|e| e.amount).sum();

    // An expense marked reimbursed without an explicit amount is assumed
    // fully reimbursed at its original amount.
    let total_reimbursed: f64 = expenses
        .iter()
        .filter(|e| e.reimbursed)
        .map(|e| e.reimbursed_amount.unwrap_or(e.amount))
        .sum();

    let mut by_account = AccountTotals::default();
    for expense in expenses {
        match expense.account_type {
            AccountType::Hsa => by_account.hsa += expense.amount,
            AccountType::Fsa => by_account.fsa += expense.amount,
            AccountType::DependentCareFsa => by_account.dependent_care_fsa += expense.amount,
        }
    }

    let total = expenses.len() as u32;
    let ready = expenses.iter().filter(|e| is_audit_ready(e)).count() as u32;

    let retention_alerts = expenses
        .iter()
        .filter_map(|e| e.effective_tax_year())
        .filter(|&year| retention_status(year, current_year) != RetentionStatus::Safe)
        .count() as u32;

    DashboardStats {
        total_expenses: round_cents(total_expenses),
        total_reimbursed: round_cents(total_reimbursed),
        pending_reimbursement: round_cents(total_expenses - total_reimbursed),
        by_account: AccountTotals {
            hsa: round_cents(by_account.hsa),
            fsa: round_cents(by_account.fsa),
            dependent_care_fsa: round_cents(by_account.dependent_care_fsa),
        },
        audit_readiness: AuditReadiness {
            total,
            ready,
            missing: total - ready,
        },
        retention_alerts,
        expected_return: expected_return(expenses, params),
    }
}

/// Project the future value of pending (unreimbursed) expenses.
///
/// Each pending amount is compounded once over the entire horizon:
/// `amount * (1 + rate)^horizon`, regardless of how long it has already
/// been outstanding. This is a different model from the year-by-year
/// projection engine and the two must not be unified.
pub fn expected_return(expenses: &[ExpenseRecord], params: &ProfileParameters) -> ExpectedReturn {
    let rate = params.annual_return_pct / 100.0;
    let factor = (1.0 + rate).powi(params.time_horizon_years as i32);

    let mut pending_total = 0.0;
    let mut projected_value = 0.0;
    for expense in expenses.iter().filter(|e| !e.reimbursed) {
        pending_total += expense.amount;
        projected_value += expense.amount * factor;
    }

    ExpectedReturn {
        pending_total: round_cents(pending_total),
        projected_value: round_cents(projected_value),
        extra_growth: round_cents(projected_value - pending_total),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExpenseCategory;

    fn expense(amount: f64, date: &str, account: AccountType) -> ExpenseRecord {
        ExpenseRecord {
            id: format!("exp-{}", amount),
            user_id: "user-1".to_string(),
            description: "Test".to_string(),
            amount,
            date_of_service: date.to_string(),
            date_of_service_end: None,
            tax_year: None,
            reimbursed: false,
            reimbursed_amount: None,
            reimbursed_date: None,
            account_type: account,
            category: ExpenseCategory::Medical,
            receipt_urls: vec![],
            eob_urls: vec![],
            invoice_urls: vec![],
            statement_urls: vec![],
            created_at: "2026-01-01T00:00:00Z".to_string(),
            updated_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    fn reimbursed(mut e: ExpenseRecord, amount: Option<f64>) -> ExpenseRecord {
        e.reimbursed = true;
        e.reimbursed_amount = amount;
        e.reimbursed_date = Some("2026-02-01".to_string());
        e
    }

    #[test]
    fn totals_and_pending() {
        let expenses = vec![
            expense(100.0, "2024-01-01", AccountType::Hsa),
            reimbursed(expense(50.0, "2023-06-01", AccountType::Hsa), Some(40.0)),
        ];
        let stats = dashboard_stats(&expenses, &ProfileParameters::default(), 2026);

        assert_eq!(stats.total_expenses, 150.0);
        assert_eq!(stats.total_reimbursed, 40.0);
        assert_eq!(stats.pending_reimbursement, 110.0);
    }

    #[test]
    fn reimbursed_without_amount_counts_full_amount() {
        let expenses = vec![reimbursed(
            expense(75.5, "2025-03-01", AccountType::Hsa),
            None,
        )];
        let stats = dashboard_stats(&expenses, &ProfileParameters::default(), 2026);

        assert_eq!(stats.total_reimbursed, 75.5);
        assert_eq!(stats.pending_reimbursement, 0.0);
    }

    #[test]
    fn by_account_partition() {
        let expenses = vec![
            expense(10.0, "2026-01-01", AccountType::Hsa),
            expense(20.0, "2026-01-02", AccountType::Hsa),
            expense(30.0, "2026-01-03", AccountType::Fsa),
            expense(40.0, "2026-01-04", AccountType::DependentCareFsa),
        ];
        let stats = dashboard_stats(&expenses, &ProfileParameters::default(), 2026);

        assert_eq!(stats.by_account.hsa, 30.0);
        assert_eq!(stats.by_account.fsa, 30.0);
        assert_eq!(stats.by_account.dependent_care_fsa, 40.0);
    }

    #[test]
    fn audit_readiness_counts() {
        let mut ready = expense(10.0, "2026-01-01", AccountType::Hsa);
        ready.receipt_urls.push("r".to_string());
        ready.eob_urls.push("e".to_string());

        let expenses = vec![
            ready,
            expense(20.0, "2026-01-02", AccountType::Hsa),
            expense(30.0, "2026-01-03", AccountType::Hsa),
        ];
        let stats = dashboard_stats(&expenses, &ProfileParameters::default(), 2026);

        assert_eq!(stats.audit_readiness.total, 3);
        assert_eq!(stats.audit_readiness.ready, 1);
        assert_eq!(stats.audit_readiness.missing, 2);
    }

    #[test]
    fn retention_alerts_count_warning_and_critical() {
        let expenses = vec![
            expense(10.0, "2019-05-01", AccountType::Hsa), // critical (7 elapsed)
            expense(20.0, "2020-05-01", AccountType::Hsa), // warning (6 elapsed)
            expense(30.0, "2021-05-01", AccountType::Hsa), // safe
            expense(40.0, "2026-05-01", AccountType::Hsa), // safe
        ];
        let stats = dashboard_stats(&expenses, &ProfileParameters::default(), 2026);

        assert_eq!(stats.retention_alerts, 2);
    }

    #[test]
    fn retention_uses_explicit_tax_year_over_date() {
        let mut e = expense(10.0, "2026-01-15", AccountType::Hsa);
        e.tax_year = Some(2019);
        let stats = dashboard_stats(&[e], &ProfileParameters::default(), 2026);

        assert_eq!(stats.retention_alerts, 1);
    }

    #[test]
    fn expected_return_single_pending_expense() {
        let params = ProfileParameters {
            annual_return_pct: 7.0,
            time_horizon_years: 1,
            ..ProfileParameters::default()
        };
        let result = expected_return(&[expense(1000.0, "2026-01-01", AccountType::Hsa)], &params);

        assert_eq!(result.pending_total, 1000.0);
        assert_eq!(result.projected_value, 1070.0);
        assert_eq!(result.extra_growth, 70.0);
    }

    #[test]
    fn expected_return_ignores_reimbursed() {
        let params = ProfileParameters {
            annual_return_pct: 7.0,
            time_horizon_years: 10,
            ..ProfileParameters::default()
        };
        let expenses = vec![
            expense(500.0, "2026-01-01", AccountType::Hsa),
            reimbursed(expense(800.0, "2026-01-02", AccountType::Hsa), None),
        ];
        let result = expected_return(&expenses, &params);

        assert_eq!(result.pending_total, 500.0);
        let factor = 1.07_f64.powi(10);
        assert_eq!(
            result.projected_value,
            (500.0 * factor * 100.0).round() / 100.0
        );
    }

    #[test]
    fn expected_return_is_full_horizon_single_shot() {
        // The compounding factor applies over the whole horizon for every
        // pending expense, no matter its age.
        let params = ProfileParameters {
            annual_return_pct: 10.0,
            time_horizon_years: 2,
            ..ProfileParameters::default()
        };
        let expenses = vec![
            expense(100.0, "2019-01-01", AccountType::Hsa),
            expense(100.0, "2026-01-01", AccountType::Hsa),
        ];
        let result = expected_return(&expenses, &params);

        // Both compound identically: 100 * 1.1^2 each.
        assert_eq!(result.projected_value, 242.0);
    }

    #[test]
    fn empty_expense_list_yields_zeroes() {
        let stats = dashboard_stats(&[], &ProfileParameters::default(), 2026);

        assert_eq!(stats, DashboardStats::default());
    }

    #[test]
    fn aggregation_is_idempotent() {
        let mut with_docs = expense(123.45, "2020-07-01", AccountType::Fsa);
        with_docs.receipt_urls.push("r".to_string());
        with_docs.invoice_urls.push("i".to_string());

        let expenses = vec![
            expense(100.0, "2024-01-01", AccountType::Hsa),
            reimbursed(expense(50.0, "2023-06-01", AccountType::Hsa), Some(40.0)),
            with_docs,
        ];
        let params = ProfileParameters::default();

        let first = dashboard_stats(&expenses, &params, 2026);
        let second = dashboard_stats(&expenses, &params, 2026);

        assert_eq!(first, second);
    }
}
