//! Expense analytics: aggregation, budget evaluation and forecasting.
//!
//! Every function here is pure and recomputes from the records it is given.
//! Inputs are assumed to be validated already (see `models::Expense::parse`);
//! degenerate numeric cases resolve to defined values instead of errors.

mod aggregate;
mod budget;
mod forecast;
mod summary;

pub(crate) use aggregate::{
    bucket_totals, category_totals, daily_totals, filter_by_date_range, monthly_totals, Bucket,
    CategoryTotal, TimeBucketTotal,
};
pub(crate) use budget::BudgetProgress;
pub(crate) use forecast::{predicted_category_spend, span_days};
pub(crate) use summary::ExpenseSummary;

#[cfg(test)]
mod tests;
