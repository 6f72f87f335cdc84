#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::aggregate::{average_expense, top_category, total_spend};
use super::budget::{category_progress, current_month_total, overall_progress};
use super::forecast::predicted_monthly_spend;
use super::*;
use crate::models::{BudgetConfig, Expense};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn exp(amount: Decimal, category: &str, d: &str) -> Expense {
    Expense::new(amount, category.into(), date(d))
}

fn sample() -> Vec<Expense> {
    vec![
        exp(dec!(12.50), "Food", "2024-03-02"),
        exp(dec!(900), "Rent", "2024-03-01"),
        exp(dec!(7.50), "Food", "2024-03-02"),
        exp(dec!(40), "Transport", "2024-02-28"),
        exp(dec!(30), "food", "2024-03-05"),
    ]
}

// ── Aggregator ────────────────────────────────────────────────

#[test]
fn test_category_totals_first_encounter_order() {
    let totals = category_totals(&sample());
    let names: Vec<&str> = totals.iter().map(|t| t.category.as_str()).collect();
    assert_eq!(names, ["Food", "Rent", "Transport", "food"]);
    assert_eq!(totals[0].total, dec!(20));
}

#[test]
fn test_category_totals_case_sensitive() {
    let totals = category_totals(&sample());
    let lower = totals.iter().find(|t| t.category == "food").unwrap();
    assert_eq!(lower.total, dec!(30));
}

#[test]
fn test_category_totals_empty() {
    assert!(category_totals(&[]).is_empty());
}

#[test]
fn test_daily_totals_keep_insertion_order() {
    let daily = daily_totals(&sample());
    let keys: Vec<&str> = daily.iter().map(|t| t.key.as_str()).collect();
    // not re-sorted: 03-02 first because it appears first
    assert_eq!(keys, ["2024-03-02", "2024-03-01", "2024-02-28", "2024-03-05"]);
    assert_eq!(daily[0].total, dec!(20));
}

#[test]
fn test_monthly_totals() {
    let monthly = monthly_totals(&sample());
    assert_eq!(
        monthly,
        vec![
            TimeBucketTotal {
                key: "2024-03".into(),
                total: dec!(950)
            },
            TimeBucketTotal {
                key: "2024-02".into(),
                total: dec!(40)
            },
        ]
    );
}

#[test]
fn test_bucket_totals_matches_named_helpers() {
    let records = sample();
    assert_eq!(bucket_totals(&records, Bucket::Daily), daily_totals(&records));
    assert_eq!(bucket_totals(&records, Bucket::Monthly), monthly_totals(&records));
}

#[test]
fn test_totals_agree_across_groupings() {
    let records = sample();
    let total = total_spend(&records);
    let by_cat: Decimal = category_totals(&records).iter().map(|t| t.total).sum();
    let by_day: Decimal = daily_totals(&records).iter().map(|t| t.total).sum();
    let by_month: Decimal = monthly_totals(&records).iter().map(|t| t.total).sum();
    assert_eq!(total, dec!(990));
    assert_eq!(by_cat, total);
    assert_eq!(by_day, total);
    assert_eq!(by_month, total);
}

#[test]
fn test_top_category() {
    let top = top_category(&sample()).unwrap();
    assert_eq!(top.category, "Rent");
    assert_eq!(top.total, dec!(900));
}

#[test]
fn test_top_category_tie_goes_to_first_encountered() {
    let records = vec![
        exp(dec!(50), "B", "2024-01-01"),
        exp(dec!(50), "A", "2024-01-02"),
    ];
    assert_eq!(top_category(&records).unwrap().category, "B");
}

#[test]
fn test_top_category_empty() {
    assert!(top_category(&[]).is_none());
}

#[test]
fn test_average_expense() {
    assert_eq!(average_expense(&sample()), dec!(198));
    assert_eq!(average_expense(&[]), Decimal::ZERO);
}

#[test]
fn test_negative_amounts_reduce_totals() {
    let records = vec![
        exp(dec!(100), "Food", "2024-01-01"),
        exp(dec!(-25), "Food", "2024-01-02"),
    ];
    assert_eq!(category_totals(&records)[0].total, dec!(75));
}

#[test]
fn test_filter_by_date_range_inclusive() {
    let filtered = filter_by_date_range(
        &sample(),
        Some(date("2024-03-01")),
        Some(date("2024-03-02")),
    );
    assert_eq!(filtered.len(), 3);
    assert!(filtered.iter().all(|e| e.date.to_string().starts_with("2024-03-0")));
}

#[test]
fn test_filter_by_date_range_open_bounds() {
    assert_eq!(filter_by_date_range(&sample(), None, None).len(), 5);
    assert_eq!(
        filter_by_date_range(&sample(), None, Some(date("2024-02-28"))).len(),
        1
    );
}

#[test]
fn test_bucket_parse_and_toggle() {
    assert_eq!(Bucket::parse("daily"), Some(Bucket::Daily));
    assert_eq!(Bucket::parse("Monthly"), Some(Bucket::Monthly));
    assert_eq!(Bucket::parse("weekly"), None);
    assert_eq!(Bucket::Daily.toggle(), Bucket::Monthly);
}

#[test]
fn test_aggregation_is_idempotent() {
    let records = sample();
    assert_eq!(category_totals(&records), category_totals(&records));
    assert_eq!(daily_totals(&records), daily_totals(&records));
}

// ── Budget evaluator ──────────────────────────────────────────

#[test]
fn test_current_month_total_matches_month_and_year() {
    let records = vec![
        exp(dec!(10), "Food", "2024-03-01"),
        exp(dec!(20), "Food", "2024-03-31"),
        exp(dec!(40), "Food", "2023-03-15"),
        exp(dec!(80), "Food", "2024-04-01"),
    ];
    assert_eq!(current_month_total(&records, date("2024-03-10")), dec!(30));
}

#[test]
fn test_overall_progress_under_budget() {
    let p = overall_progress(dec!(250), dec!(1000));
    assert_eq!(p.used, dec!(250));
    assert_eq!(p.remaining, dec!(750));
    assert_eq!(p.percent_used, dec!(25));
    assert!(!p.over_budget);
    assert_eq!(p.over_budget_percent, None);
    assert_eq!(p.describe(), "25.00% of budget used");
}

#[test]
fn test_overall_progress_over_budget() {
    let p = overall_progress(dec!(1200), dec!(1000));
    assert!(p.over_budget);
    assert_eq!(p.percent_used, dec!(120));
    assert_eq!(p.clamped_percent(), dec!(100));
    assert_eq!(p.over_budget_percent, Some(dec!(20)));
    assert_eq!(p.remaining, dec!(-200));
    assert_eq!(p.describe(), "Over budget by 20.00%");
}

#[test]
fn test_overall_progress_exactly_at_limit_is_not_over() {
    let p = overall_progress(dec!(1000), dec!(1000));
    assert!(!p.over_budget);
    assert_eq!(p.percent_used, dec!(100));
}

#[test]
fn test_overall_progress_zero_budget_with_spend() {
    let p = overall_progress(dec!(75), Decimal::ZERO);
    assert_eq!(p.percent_used, Decimal::ZERO);
    assert!(p.over_budget);
    assert_eq!(p.over_budget_percent, None);
    assert_eq!(p.fill_ratio(), 0.0);
    assert_eq!(p.describe(), "Over budget (no limit set)");
}

#[test]
fn test_overall_progress_zero_budget_no_spend() {
    let p = overall_progress(Decimal::ZERO, Decimal::ZERO);
    assert_eq!(p.percent_used, Decimal::ZERO);
    assert!(!p.over_budget);
    assert!(p.fill_ratio().is_finite());
}

#[test]
fn test_overall_progress_negative_budget_is_degenerate() {
    let p = overall_progress(dec!(10), dec!(-50));
    assert_eq!(p.percent_used, Decimal::ZERO);
    assert!(p.over_budget);
    assert_eq!(p.over_budget_percent, None);
}

#[test]
fn test_clamped_percent_floor_for_refunds() {
    let p = overall_progress(dec!(-20), dec!(100));
    assert_eq!(p.percent_used, dec!(-20));
    assert_eq!(p.clamped_percent(), Decimal::ZERO);
}

#[test]
fn test_fill_ratio_half() {
    let p = overall_progress(dec!(50), dec!(100));
    assert!((p.fill_ratio() - 0.5).abs() < 1e-12);
}

#[test]
fn test_overall_progress_tiny_limit_saturates() {
    let p = overall_progress(dec!(10), dec!(0.0000000000000000000000000001));
    assert!(p.over_budget);
    assert_eq!(p.percent_used, Decimal::MAX);
    assert_eq!(p.over_budget_percent, Some(Decimal::MAX));
    assert_eq!(p.clamped_percent(), dec!(100));
    assert!(p.describe().starts_with("Over budget by"));
}

#[test]
fn test_category_progress_tiny_limit_does_not_panic() {
    let mut budget = BudgetConfig::default();
    budget.set_category_limit("Food", dec!(0.0000000000000000000000000001));
    let records = vec![exp(dec!(5), "Food", "2024-03-02")];
    let progress = category_progress(&records, &budget.categories, date("2024-03-15"));
    assert_eq!(progress[0].progress.percent_used, Decimal::MAX);
    assert!(progress[0].progress.over_budget);
}

#[test]
fn test_category_progress_over_budget() {
    let mut budget = BudgetConfig::default();
    budget.set_category_limit("Food", dec!(100));
    let records = vec![
        exp(dec!(70), "Food", "2024-05-03"),
        exp(dec!(50), "Food", "2024-05-20"),
    ];

    let progress = category_progress(&records, &budget.categories, date("2024-05-31"));
    assert_eq!(progress.len(), 1);
    let food = &progress[0];
    assert_eq!(food.category, "Food");
    assert_eq!(food.progress.used, dec!(120));
    assert_eq!(food.progress.limit, dec!(100));
    assert_eq!(food.progress.percent_used, dec!(120));
    assert!(food.progress.over_budget);
}

#[test]
fn test_category_progress_budget_order_and_zero_usage() {
    let mut budget = BudgetConfig::default();
    budget.set_category_limit("Travel", dec!(300));
    budget.set_category_limit("Food", dec!(100));
    let records = vec![exp(dec!(40), "Food", "2024-05-03")];

    let progress = category_progress(&records, &budget.categories, date("2024-05-10"));
    let names: Vec<&str> = progress.iter().map(|c| c.category.as_str()).collect();
    assert_eq!(names, ["Travel", "Food"]);
    assert_eq!(progress[0].progress.used, Decimal::ZERO);
    assert_eq!(progress[1].progress.percent_used, dec!(40));
}

#[test]
fn test_category_progress_ignores_other_months_and_years() {
    let mut budget = BudgetConfig::default();
    budget.set_category_limit("Food", dec!(100));
    let records = vec![
        exp(dec!(40), "Food", "2024-04-30"),
        exp(dec!(40), "Food", "2023-05-15"),
        exp(dec!(10), "Food", "2024-05-01"),
    ];
    let progress = category_progress(&records, &budget.categories, date("2024-05-10"));
    assert_eq!(progress[0].progress.used, dec!(10));
}

#[test]
fn test_category_progress_zero_limit_guard() {
    let mut budget = BudgetConfig::default();
    budget.set_category_limit("Gifts", Decimal::ZERO);
    let records = vec![exp(dec!(15), "Gifts", "2024-05-03")];
    let progress = category_progress(&records, &budget.categories, date("2024-05-10"));
    assert_eq!(progress[0].progress.percent_used, Decimal::ZERO);
    assert!(progress[0].progress.over_budget);
    assert_eq!(progress[0].progress.over_budget_percent, None);
}

#[test]
fn test_unbudgeted_categories_are_not_reported() {
    let budget = BudgetConfig::new(dec!(500));
    let records = vec![exp(dec!(15), "Gifts", "2024-05-03")];
    assert!(category_progress(&records, &budget.categories, date("2024-05-10")).is_empty());
}

// ── Forecaster ────────────────────────────────────────────────

#[test]
fn test_forecast_single_record() {
    let records = vec![exp(dec!(90), "Food", "2024-01-01")];
    assert_eq!(predicted_monthly_spend(&records), dec!(2700.00));
}

#[test]
fn test_forecast_two_records_ten_day_span() {
    let records = vec![
        exp(dec!(30), "Food", "2024-01-01"),
        exp(dec!(30), "Food", "2024-01-11"),
    ];
    assert_eq!(predicted_monthly_spend(&records), dec!(180.00));
}

#[test]
fn test_forecast_same_day_span_guarded() {
    let records = vec![
        exp(dec!(10), "Food", "2024-01-05"),
        exp(dec!(20), "Food", "2024-01-05"),
    ];
    assert_eq!(span_days(&records), 1);
    assert_eq!(predicted_monthly_spend(&records), dec!(900.00));
}

#[test]
fn test_forecast_uses_given_order_not_chronology() {
    // first and last as supplied span 2 days, even though a later date sits in the middle
    let records = vec![
        exp(dec!(10), "Food", "2024-01-01"),
        exp(dec!(10), "Food", "2024-01-20"),
        exp(dec!(10), "Food", "2024-01-03"),
    ];
    assert_eq!(span_days(&records), 2);
    assert_eq!(predicted_monthly_spend(&records), dec!(450.00));
}

#[test]
fn test_forecast_reversed_order_keeps_negative_span() {
    let records = vec![
        exp(dec!(30), "Food", "2024-01-11"),
        exp(dec!(30), "Food", "2024-01-01"),
    ];
    assert_eq!(span_days(&records), -10);
    assert_eq!(predicted_monthly_spend(&records), dec!(-180.00));
}

#[test]
fn test_forecast_empty_is_zero() {
    assert_eq!(predicted_monthly_spend(&[]), Decimal::ZERO);
}

#[test]
fn test_forecast_rounds_to_cents() {
    let records = vec![
        exp(dec!(10), "Food", "2024-01-01"),
        exp(dec!(0), "Food", "2024-01-04"),
    ];
    // 10 / 3 * 30 = 100.000...
    assert_eq!(predicted_monthly_spend(&records), dec!(100.00));
    let records = vec![
        exp(dec!(1), "Food", "2024-01-01"),
        exp(dec!(0), "Food", "2024-01-08"),
    ];
    // 1 / 7 * 30 = 4.2857...
    assert_eq!(predicted_monthly_spend(&records), dec!(4.29));
}

#[test]
fn test_predicted_category_spend() {
    let records = vec![
        exp(dec!(30), "Food", "2024-01-01"),
        exp(dec!(90), "Rent", "2024-01-02"),
        exp(dec!(30), "Food", "2024-01-11"),
    ];
    let predicted = predicted_category_spend(&records);
    assert_eq!(predicted.len(), 2);
    assert_eq!(predicted[0].category, "Food");
    assert_eq!(predicted[0].total, dec!(180.00));
    assert_eq!(predicted[1].category, "Rent");
    assert_eq!(predicted[1].total, dec!(2700.00));
}

// ── Summary ───────────────────────────────────────────────────

#[test]
fn test_summary_compute() {
    let mut budget = BudgetConfig::new(dec!(1000));
    budget.set_category_limit("Food", dec!(10));
    budget.set_category_limit("Rent", dec!(1000));

    let summary = ExpenseSummary::compute(&sample(), &budget, date("2024-03-15"));
    assert_eq!(summary.record_count, 5);
    assert_eq!(summary.total, dec!(990));
    assert_eq!(summary.average, dec!(198));
    assert_eq!(summary.top_category.as_ref().unwrap().category, "Rent");
    assert_eq!(summary.current_month_total, dec!(950));
    assert!(!summary.overall.over_budget);
    assert_eq!(summary.categories.len(), 2);

    let over: Vec<&str> = summary
        .over_budget_categories()
        .map(|c| c.category.as_str())
        .collect();
    assert_eq!(over, ["Food"]);
}

#[test]
fn test_summary_empty_records() {
    let summary = ExpenseSummary::compute(&[], &BudgetConfig::default(), date("2024-03-15"));
    assert_eq!(summary.total, Decimal::ZERO);
    assert_eq!(summary.average, Decimal::ZERO);
    assert!(summary.top_category.is_none());
    assert_eq!(summary.predicted_monthly, Decimal::ZERO);
    assert_eq!(summary.overall.percent_used, Decimal::ZERO);
    assert!(!summary.overall.over_budget);
}
