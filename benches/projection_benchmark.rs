use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hsa_ledger::engine;
use hsa_ledger::models::{
    AccountType, ExpenseCategory, ExpenseRecord, ProfileParameters,
};

fn make_expenses(count: usize) -> Vec<ExpenseRecord> {
    (0..count)
        .map(|i| ExpenseRecord {
            id: format!("exp-{}", i),
            user_id: "bench-user".to_string(),
            description: format!("Expense {}", i),
            amount: 25.0 + (i % 400) as f64,
            date_of_service: format!("{}-{:02}-15", 2018 + (i % 9), 1 + (i % 12)),
            date_of_service_end: None,
            tax_year: None,
            reimbursed: i % 3 == 0,
            reimbursed_amount: None,
            reimbursed_date: None,
            account_type: match i % 3 {
                0 => AccountType::Hsa,
                1 => AccountType::Fsa,
                _ => AccountType::DependentCareFsa,
            },
            category: ExpenseCategory::Medical,
            receipt_urls: if i % 2 == 0 { vec!["r".to_string()] } else { vec![] },
            eob_urls: if i % 4 == 0 { vec!["e".to_string()] } else { vec![] },
            invoice_urls: vec![],
            statement_urls: vec![],
            created_at: "2026-01-01T00:00:00Z".to_string(),
            updated_at: "2026-01-01T00:00:00Z".to_string(),
        })
        .collect()
}

fn benchmark_engine(c: &mut Criterion) {
    let params = ProfileParameters {
        current_balance: 5000.0,
        annual_contribution: 4150.0,
        annual_return_pct: 7.0,
        time_horizon_years: 40,
        federal_tax_pct: 22.0,
        state_tax_pct: 5.0,
    };

    let small = make_expenses(50);
    let large = make_expenses(5000);

    let mut group = c.benchmark_group("financial_engine");

    group.bench_function("project_40_years", |b| {
        b.iter(|| engine::project(black_box(&params), black_box(2026)))
    });

    group.bench_function("dashboard_stats_50_expenses", |b| {
        b.iter(|| engine::dashboard_stats(black_box(&small), black_box(&params), black_box(2026)))
    });

    group.bench_function("dashboard_stats_5000_expenses", |b| {
        b.iter(|| engine::dashboard_stats(black_box(&large), black_box(&params), black_box(2026)))
    });

    group.finish();
}

criterion_group!(benches, benchmark_engine);
criterion_main!(benches);
