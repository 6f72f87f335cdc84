use thiserror::Error;

/// Rejected user input. The analytics engine assumes records already passed these checks.
#[derive(Debug, Error, PartialEq)]
pub(crate) enum ValidationError {
    #[error("Category must not be empty")]
    EmptyCategory,
    #[error("Invalid amount: '{0}'")]
    InvalidAmount(String),
    #[error("Invalid date: '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),
    #[error("Unknown currency: '{0}'. Supported: USD, EUR, GBP, JPY, INR")]
    UnknownCurrency(String),
}
