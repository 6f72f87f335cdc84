//! Grouping of expenses into category and time-bucket totals.
//!
//! All groupings keep first-encounter order of their keys; nothing here
//! re-sorts the caller's sequence.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::models::Expense;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CategoryTotal {
    pub(crate) category: String,
    pub(crate) total: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TimeBucketTotal {
    /// `YYYY-MM-DD` for daily buckets, `YYYY-MM` for monthly ones.
    pub(crate) key: String,
    pub(crate) total: Decimal,
}

/// Time granularity for the bar-chart series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Bucket {
    Daily,
    Monthly,
}

impl Bucket {
    pub(crate) fn key_for(&self, expense: &Expense) -> String {
        match self {
            Self::Daily => expense.day_key(),
            Self::Monthly => expense.month_key(),
        }
    }

    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "daily" | "day" | "d" => Some(Self::Daily),
            "monthly" | "month" | "m" => Some(Self::Monthly),
            _ => None,
        }
    }

    pub(crate) fn toggle(&self) -> Self {
        match self {
            Self::Daily => Self::Monthly,
            Self::Monthly => Self::Daily,
        }
    }
}

impl std::fmt::Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Daily => write!(f, "Daily"),
            Self::Monthly => write!(f, "Monthly"),
        }
    }
}

/// Sum amounts per key, keeping the order in which keys first appear.
fn group_ordered<F>(records: &[Expense], key_fn: F) -> Vec<(String, Decimal)>
where
    F: Fn(&Expense) -> String,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Decimal)> = Vec::new();

    for record in records {
        let key = key_fn(record);
        match index.get(&key) {
            Some(&i) => groups[i].1 += record.amount,
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, record.amount));
            }
        }
    }

    groups
}

pub(crate) fn total_spend(records: &[Expense]) -> Decimal {
    records.iter().map(|e| e.amount).sum()
}

/// Mean amount per record; zero for an empty sequence.
pub(crate) fn average_expense(records: &[Expense]) -> Decimal {
    if records.is_empty() {
        return Decimal::ZERO;
    }
    total_spend(records) / Decimal::from(records.len())
}

/// Totals per category (exact, case-sensitive match), in first-encounter order.
pub(crate) fn category_totals(records: &[Expense]) -> Vec<CategoryTotal> {
    group_ordered(records, |e| e.category.clone())
        .into_iter()
        .map(|(category, total)| CategoryTotal { category, total })
        .collect()
}

pub(crate) fn bucket_totals(records: &[Expense], bucket: Bucket) -> Vec<TimeBucketTotal> {
    group_ordered(records, |e| bucket.key_for(e))
        .into_iter()
        .map(|(key, total)| TimeBucketTotal { key, total })
        .collect()
}

pub(crate) fn daily_totals(records: &[Expense]) -> Vec<TimeBucketTotal> {
    bucket_totals(records, Bucket::Daily)
}

pub(crate) fn monthly_totals(records: &[Expense]) -> Vec<TimeBucketTotal> {
    bucket_totals(records, Bucket::Monthly)
}

/// The category with the highest total. Ties go to the first-encountered category.
pub(crate) fn top_category(records: &[Expense]) -> Option<CategoryTotal> {
    let mut totals = category_totals(records);
    // sort_by is stable, so equal totals keep encounter order
    totals.sort_by(|a, b| b.total.cmp(&a.total));
    totals.into_iter().next()
}

/// Records whose date falls within the optional inclusive bounds, in input order.
pub(crate) fn filter_by_date_range(
    records: &[Expense],
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Vec<Expense> {
    records
        .iter()
        .filter(|e| start.map_or(true, |s| e.date >= s) && end.map_or(true, |d| e.date <= d))
        .cloned()
        .collect()
}
