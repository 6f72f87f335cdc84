mod budget;
mod currency;
mod error;
mod expense;

pub(crate) use budget::BudgetConfig;
pub(crate) use currency::{symbol_for_code, Currency};
pub(crate) use error::ValidationError;
pub(crate) use expense::{parse_amount, parse_iso_date, Expense};

#[cfg(test)]
mod tests;
