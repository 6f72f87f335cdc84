use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use super::ValidationError;

/// A single dated, categorized expense.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Expense {
    pub(crate) id: Option<i64>,
    pub(crate) amount: Decimal,
    pub(crate) category: String,
    pub(crate) date: NaiveDate,
}

impl Expense {
    pub(crate) fn new(amount: Decimal, category: String, date: NaiveDate) -> Self {
        Self {
            id: None,
            amount,
            category,
            date,
        }
    }

    /// Build an expense from raw form fields.
    /// Accepts an optional leading currency symbol and thousands separators on the amount.
    pub(crate) fn parse(amount: &str, category: &str, date: &str) -> Result<Self, ValidationError> {
        let category = category.trim();
        if category.is_empty() {
            return Err(ValidationError::EmptyCategory);
        }
        Ok(Self::new(
            parse_amount(amount)?,
            category.to_string(),
            parse_iso_date(date)?,
        ))
    }

    /// Day bucket key, `YYYY-MM-DD`.
    pub(crate) fn day_key(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    /// Month bucket key, `YYYY-MM`.
    pub(crate) fn month_key(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }
}

pub(crate) fn parse_amount(raw: &str) -> Result<Decimal, ValidationError> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches(['$', '€', '£', '¥', '₹'])
        .chars()
        .filter(|c| *c != ',')
        .collect();
    Decimal::from_str(cleaned.trim()).map_err(|_| ValidationError::InvalidAmount(raw.to_string()))
}

pub(crate) fn parse_iso_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(raw.to_string()))
}
