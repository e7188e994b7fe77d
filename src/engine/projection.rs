// SPDX-License-Identifier: MIT

//! Year-by-year account growth projection.
//!
//! Simulates two regimes side by side: the tax-advantaged account, and a
//! hypothetical taxable brokerage account funded with after-tax dollars
//! and taxed annually on growth. The gap between the two at the horizon
//! is the value of keeping receipts and delaying reimbursement.

use super::round_unit;
use crate::models::{ProfileParameters, ProjectionPoint, ProjectionSummary};

/// Long-term capital gains rate applied to the taxable equivalent.
pub const CAPITAL_GAINS_RATE: f64 = 0.15;

/// Simulate `time_horizon_years + 1` yearly points (year 0 through N).
///
/// Each point snapshots the balance *before* that year's growth is
/// applied, then advances: `B' = B * (1 + rate) + contribution`. The
/// snapshot-then-grow ordering means a contribution starts compounding
/// the year after it lands. Internal accumulation stays at full
/// precision; only the emitted fields are rounded (to whole units).
pub fn project(params: &ProfileParameters, start_year: i32) -> Vec<ProjectionPoint> {
    let rate = params.annual_return_pct / 100.0;
    let combined_tax_rate = (params.federal_tax_pct + params.state_tax_pct) / 100.0;
    // The taxable account is funded with after-tax dollars: adjust the
    // contribution once, not per year.
    let taxable_contribution = params.annual_contribution * (1.0 - combined_tax_rate);

    let mut balance = params.current_balance;
    let mut taxable = params.current_balance;
    let mut points = Vec::with_capacity(params.time_horizon_years as usize + 1);

    for year in 0..=params.time_horizon_years {
        let total_contributions =
            params.current_balance + params.annual_contribution * f64::from(year);
        let balance_out = round_unit(balance);
        let contributions_out = round_unit(total_contributions);

        points.push(ProjectionPoint {
            year,
            calendar_year: start_year + year as i32,
            balance: balance_out,
            total_contributions: contributions_out,
            total_growth: balance_out - contributions_out,
            tax_savings: round_unit(
                params.annual_contribution * combined_tax_rate * f64::from(year),
            ),
            taxable_equivalent: round_unit(taxable),
        });

        balance = balance * (1.0 + rate) + params.annual_contribution;

        let growth = taxable * rate;
        taxable += growth * (1.0 - CAPITAL_GAINS_RATE) + taxable_contribution;
    }

    points
}

/// Summarize the final projected year.
pub fn summarize(points: &[ProjectionPoint]) -> ProjectionSummary {
    points
        .last()
        .map(|last| ProjectionSummary {
            projected_balance: last.balance,
            total_contributed: last.total_contributions,
            total_growth: last.total_growth,
            total_tax_savings: last.tax_savings,
            hsa_advantage: last.balance - last.taxable_equivalent,
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(
        balance: f64,
        contribution: f64,
        return_pct: f64,
        horizon: u32,
    ) -> ProfileParameters {
        ProfileParameters {
            current_balance: balance,
            annual_contribution: contribution,
            annual_return_pct: return_pct,
            time_horizon_years: horizon,
            federal_tax_pct: 22.0,
            state_tax_pct: 5.0,
        }
    }

    #[test]
    fn point_count_and_year_sequence() {
        for horizon in [0u32, 1, 5, 30] {
            let points = project(&params(1000.0, 500.0, 7.0, horizon), 2026);

            assert_eq!(points.len(), horizon as usize + 1);
            for (i, point) in points.iter().enumerate() {
                assert_eq!(point.year, i as u32);
                assert_eq!(point.calendar_year, 2026 + i as i32);
            }
        }
    }

    #[test]
    fn pure_compounding_matches_closed_form() {
        // No contributions: balance is B * (1 + r)^y exactly.
        let points = project(&params(10_000.0, 0.0, 7.0, 10), 2026);

        for point in &points {
            let expected = (10_000.0 * 1.07_f64.powi(point.year as i32)).round();
            assert_eq!(point.balance, expected, "year {}", point.year);
        }
    }

    #[test]
    fn year_zero_snapshots_before_growth() {
        let points = project(&params(5000.0, 1000.0, 7.0, 3), 2026);

        // Year 0 is the starting balance untouched.
        assert_eq!(points[0].balance, 5000.0);
        // Year 1 = 5000 * 1.07 + 1000; the contribution has not grown yet.
        assert_eq!(points[1].balance, (5000.0_f64 * 1.07 + 1000.0).round());
        // Year 2 = (5000 * 1.07 + 1000) * 1.07 + 1000.
        assert_eq!(
            points[2].balance,
            ((5000.0_f64 * 1.07 + 1000.0) * 1.07 + 1000.0).round()
        );
    }

    #[test]
    fn growth_equals_balance_minus_contributions() {
        let points = project(&params(2500.0, 4150.0, 6.5, 25), 2026);

        for point in &points {
            // Recompute independently from the emitted fields.
            assert_eq!(
                point.total_growth,
                point.balance - point.total_contributions,
                "year {}",
                point.year
            );
        }
    }

    #[test]
    fn contributions_accumulate_nominally() {
        let points = project(&params(1000.0, 4150.0, 7.0, 20), 2026);

        assert_eq!(points[0].total_contributions, 1000.0);
        assert_eq!(points[20].total_contributions, 1000.0 + 4150.0 * 20.0);
    }

    #[test]
    fn tax_savings_scale_with_combined_rate() {
        // 22% federal + 5% state = 27% of each year's contribution.
        let points = project(&params(0.0, 1000.0, 7.0, 10), 2026);

        assert_eq!(points[0].tax_savings, 0.0);
        assert_eq!(points[1].tax_savings, 270.0);
        assert_eq!(points[10].tax_savings, 2700.0);
    }

    #[test]
    fn zero_horizon_yields_single_point() {
        let points = project(&params(750.0, 4150.0, 7.0, 0), 2026);

        assert_eq!(points.len(), 1);
        assert_eq!(points[0].year, 0);
        assert_eq!(points[0].balance, 750.0);
        assert_eq!(points[0].taxable_equivalent, 750.0);
    }

    #[test]
    fn zero_return_still_accumulates_contributions() {
        let points = project(&params(1000.0, 500.0, 0.0, 4), 2026);

        assert_eq!(points[4].balance, 1000.0 + 500.0 * 4.0);
        assert_eq!(points[4].total_growth, 0.0);
    }

    #[test]
    fn negative_return_shrinks_balance() {
        let points = project(&params(10_000.0, 0.0, -10.0, 3), 2026);

        assert_eq!(points[1].balance, 9000.0);
        assert_eq!(points[2].balance, 8100.0);
        assert_eq!(points[3].balance, 7290.0);
        assert!(points[3].total_growth < 0.0);
    }

    #[test]
    fn taxable_equivalent_trails_tax_advantaged() {
        let points = project(&params(1000.0, 4150.0, 7.0, 20), 2026);
        let last = points.last().unwrap();

        // After-tax funding and annual gains tax must leave the taxable
        // account strictly behind over any positive-return horizon.
        assert!(last.taxable_equivalent < last.balance);
    }

    #[test]
    fn taxable_growth_taxed_annually() {
        // One year, no contributions: T1 = T0 + T0 * r * (1 - cap gains).
        let points = project(&params(10_000.0, 0.0, 10.0, 1), 2026);

        let expected = 10_000.0 + 10_000.0 * 0.10 * (1.0 - CAPITAL_GAINS_RATE);
        assert_eq!(points[1].taxable_equivalent, expected.round());
    }

    #[test]
    fn summary_copies_final_point() {
        let points = project(&params(1000.0, 4150.0, 7.0, 20), 2026);
        let summary = summarize(&points);
        let last = points.last().unwrap();

        assert_eq!(summary.projected_balance, last.balance);
        assert_eq!(summary.total_contributed, last.total_contributions);
        assert_eq!(summary.total_growth, last.total_growth);
        assert_eq!(summary.total_tax_savings, last.tax_savings);
        assert_eq!(summary.hsa_advantage, last.balance - last.taxable_equivalent);
    }

    #[test]
    fn summary_of_empty_slice_is_default() {
        assert_eq!(summarize(&[]), ProjectionSummary::default());
    }
}
