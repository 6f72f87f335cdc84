use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::aggregate::{average_expense, top_category, total_spend, CategoryTotal};
use super::budget::{
    category_progress, current_month_total, overall_progress, BudgetProgress, CategoryProgress,
};
use super::forecast::predicted_monthly_spend;
use crate::models::{BudgetConfig, Expense};

/// Everything the analysis panel shows, derived in one pass from the records.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ExpenseSummary {
    pub(crate) record_count: usize,
    pub(crate) total: Decimal,
    pub(crate) average: Decimal,
    pub(crate) top_category: Option<CategoryTotal>,
    pub(crate) predicted_monthly: Decimal,
    pub(crate) current_month_total: Decimal,
    pub(crate) overall: BudgetProgress,
    pub(crate) categories: Vec<CategoryProgress>,
}

impl ExpenseSummary {
    pub(crate) fn compute(records: &[Expense], budget: &BudgetConfig, reference: NaiveDate) -> Self {
        let month_total = current_month_total(records, reference);
        Self {
            record_count: records.len(),
            total: total_spend(records),
            average: average_expense(records),
            top_category: top_category(records),
            predicted_monthly: predicted_monthly_spend(records),
            current_month_total: month_total,
            overall: overall_progress(month_total, budget.overall),
            categories: category_progress(records, &budget.categories, reference),
        }
    }

    pub(crate) fn over_budget_categories(&self) -> impl Iterator<Item = &CategoryProgress> {
        self.categories.iter().filter(|c| c.progress.over_budget)
    }
}
