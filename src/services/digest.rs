// SPDX-License-Identifier: MIT

//! Periodic email digest rendering.
//!
//! Pure string building over the aggregation and projection outputs; the
//! task handler fetches inputs and sends the result through the mailer.

use crate::models::{DashboardStats, ExpenseRecord, ProjectionSummary};

/// Most-recent expenses shown in the digest.
pub const MAX_RECENT_EXPENSES: usize = 5;

/// A rendered digest, ready for the mailer.
#[derive(Debug, Clone)]
pub struct RenderedDigest {
    pub subject: String,
    pub html: String,
}

/// Render the digest email for one user.
pub fn render_digest(
    period_label: &str,
    stats: &DashboardStats,
    summary: &ProjectionSummary,
    recent: &[ExpenseRecord],
) -> RenderedDigest {
    let subject = format!("Your HSA summary for {}", period_label);

    let mut html = String::with_capacity(2048);
    html.push_str("<html><body style=\"font-family: sans-serif; max-width: 600px;\">");
    html.push_str(&format!("<h1>HSA Ledger: {}</h1>", period_label));

    html.push_str("<h2>Expenses</h2><ul>");
    html.push_str(&format!(
        "<li>Total tracked: <strong>{}</strong></li>",
        format_usd(stats.total_expenses)
    ));
    html.push_str(&format!(
        "<li>Reimbursed: {}</li>",
        format_usd(stats.total_reimbursed)
    ));
    html.push_str(&format!(
        "<li>Pending reimbursement: <strong>{}</strong></li>",
        format_usd(stats.pending_reimbursement)
    ));
    html.push_str("</ul>");

    html.push_str("<h2>Audit readiness</h2>");
    html.push_str(&format!(
        "<p>{} of {} expenses fully documented.",
        stats.audit_readiness.ready, stats.audit_readiness.total
    ));
    if stats.retention_alerts > 0 {
        html.push_str(&format!(
            " <strong>{} expense(s) at or near the end of the 7-year retention window.</strong>",
            stats.retention_alerts
        ));
    }
    html.push_str("</p>");

    html.push_str("<h2>If you keep waiting</h2>");
    html.push_str(&format!(
        "<p>Your pending {} could grow to {} ({} of extra tax-free growth).</p>",
        format_usd(stats.expected_return.pending_total),
        format_usd(stats.expected_return.projected_value),
        format_usd(stats.expected_return.extra_growth)
    ));
    html.push_str(&format!(
        "<p>Projected balance at the horizon: <strong>{}</strong>, beating a taxable account by {}.</p>",
        format_usd(summary.projected_balance),
        format_usd(summary.hsa_advantage)
    ));

    let shown = &recent[..recent.len().min(MAX_RECENT_EXPENSES)];
    if !shown.is_empty() {
        html.push_str("<h2>Recent expenses</h2><table>");
        for expense in shown {
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td align=\"right\">{}</td></tr>",
                escape_html(&expense.description),
                expense.date_of_service,
                format_usd(expense.amount)
            ));
        }
        html.push_str("</table>");
    }

    html.push_str("</body></html>");

    RenderedDigest { subject, html }
}

fn format_usd(value: f64) -> String {
    if value < 0.0 {
        format!("-${:.2}", -value)
    } else {
        format!("${:.2}", value)
    }
}

/// Minimal escaping for user-entered descriptions.
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
