//! Naive linear extrapolation of monthly spend.

use rust_decimal::{Decimal, RoundingStrategy};

use super::aggregate::{category_totals, total_spend, CategoryTotal};
use crate::models::Expense;

const FORECAST_DAYS: i64 = 30;

/// Days from the first to the last record as given (not chronologically sorted).
/// Fewer than two records, or a zero span, counts as a single day. Out-of-order
/// input can yield a negative span, which is kept as is.
pub(crate) fn span_days(records: &[Expense]) -> i64 {
    if records.len() < 2 {
        return 1;
    }
    match (records.first(), records.last()) {
        (Some(first), Some(last)) => match last.date.signed_duration_since(first.date).num_days() {
            0 => 1,
            days => days,
        },
        _ => 1,
    }
}

/// Projected spend over 30 days from the daily average across the record span,
/// rounded to cents.
pub(crate) fn predicted_monthly_spend(records: &[Expense]) -> Decimal {
    let daily_average = total_spend(records) / Decimal::from(span_days(records));
    (daily_average * Decimal::from(FORECAST_DAYS))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Per-category projection, each category extrapolated over its own records.
pub(crate) fn predicted_category_spend(records: &[Expense]) -> Vec<CategoryTotal> {
    category_totals(records)
        .into_iter()
        .map(|ct| {
            let subset: Vec<Expense> = records
                .iter()
                .filter(|e| e.category == ct.category)
                .cloned()
                .collect();
            CategoryTotal {
                total: predicted_monthly_spend(&subset),
                category: ct.category,
            }
        })
        .collect()
}
