//! Budget evaluation: current-month spend measured against configured limits.

use chrono::{Datelike, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::models::Expense;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Spend measured against one limit.
///
/// `percent_used` is unclamped so the over-budget message can report e.g. 120%;
/// use [`BudgetProgress::clamped_percent`] for progress bars. A limit of zero
/// (or below) is degenerate: `percent_used` is 0, `over_budget` is set when
/// anything was spent, and `over_budget_percent` is `None`. Percentages that
/// overflow `Decimal` (a vanishingly small limit) saturate at `Decimal::MAX`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BudgetProgress {
    pub(crate) used: Decimal,
    pub(crate) limit: Decimal,
    pub(crate) remaining: Decimal,
    pub(crate) percent_used: Decimal,
    pub(crate) over_budget: bool,
    pub(crate) over_budget_percent: Option<Decimal>,
}

impl BudgetProgress {
    pub(crate) fn evaluate(used: Decimal, limit: Decimal) -> Self {
        let remaining = limit.checked_sub(used).unwrap_or(Decimal::MIN);

        if limit <= Decimal::ZERO {
            return Self {
                used,
                limit,
                remaining,
                percent_used: Decimal::ZERO,
                over_budget: used > Decimal::ZERO,
                over_budget_percent: None,
            };
        }

        let percent_used = percent_of(used, limit);
        let over_budget = used > limit;
        let over_budget_percent =
            over_budget.then(|| percent_of(used.checked_sub(limit).unwrap_or(Decimal::MAX), limit));

        Self {
            used,
            limit,
            remaining,
            percent_used,
            over_budget,
            over_budget_percent,
        }
    }

    /// `percent_used` clamped to `[0, 100]`.
    pub(crate) fn clamped_percent(&self) -> Decimal {
        self.percent_used.clamp(Decimal::ZERO, HUNDRED)
    }

    /// Fill ratio for a progress bar, in `[0.0, 1.0]`.
    pub(crate) fn fill_ratio(&self) -> f64 {
        (self.clamped_percent() / HUNDRED).to_f64().unwrap_or(0.0)
    }

    pub(crate) fn describe(&self) -> String {
        match (self.over_budget, self.over_budget_percent) {
            (true, Some(pct)) => format!("Over budget by {pct:.2}%"),
            (true, None) => "Over budget (no limit set)".to_string(),
            (false, _) => format!("{:.2}% of budget used", self.percent_used),
        }
    }
}

/// `part / whole * 100` for a positive `whole`, saturating instead of overflowing.
fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(HUNDRED))
        .unwrap_or(Decimal::MAX)
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CategoryProgress {
    pub(crate) category: String,
    pub(crate) progress: BudgetProgress,
}

fn same_month(date: NaiveDate, reference: NaiveDate) -> bool {
    date.year() == reference.year() && date.month() == reference.month()
}

/// Sum of amounts dated in the same calendar month and year as `reference`.
pub(crate) fn current_month_total(records: &[Expense], reference: NaiveDate) -> Decimal {
    records
        .iter()
        .filter(|e| same_month(e.date, reference))
        .map(|e| e.amount)
        .sum()
}

pub(crate) fn overall_progress(current_month_total: Decimal, overall: Decimal) -> BudgetProgress {
    BudgetProgress::evaluate(current_month_total, overall)
}

/// Progress for every budgeted category, in the budget's own order.
/// Categories without spending this month report zero usage.
pub(crate) fn category_progress(
    records: &[Expense],
    limits: &[(String, Decimal)],
    reference: NaiveDate,
) -> Vec<CategoryProgress> {
    limits
        .iter()
        .map(|(category, limit)| {
            let used: Decimal = records
                .iter()
                .filter(|e| e.category == *category && same_month(e.date, reference))
                .map(|e| e.amount)
                .sum();
            CategoryProgress {
                category: category.clone(),
                progress: BudgetProgress::evaluate(used, *limit),
            }
        })
        .collect()
}
