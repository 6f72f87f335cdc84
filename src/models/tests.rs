#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;

// ── Expense ───────────────────────────────────────────────────

#[test]
fn test_expense_new_has_no_id() {
    let e = Expense::new(
        dec!(12.50),
        "Food".into(),
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
    );
    assert!(e.id.is_none());
    assert_eq!(e.amount, dec!(12.50));
}

#[test]
fn test_expense_bucket_keys() {
    let e = Expense::new(
        dec!(1),
        "Food".into(),
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
    );
    assert_eq!(e.day_key(), "2024-03-09");
    assert_eq!(e.month_key(), "2024-03");
    assert_eq!(&e.day_key()[..7], e.month_key());
}

#[test]
fn test_expense_parse_valid() {
    let e = Expense::parse("$1,234.50", "  Rent ", "2024-01-31").unwrap();
    assert_eq!(e.amount, dec!(1234.50));
    assert_eq!(e.category, "Rent");
    assert_eq!(e.date, NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
}

#[test]
fn test_expense_parse_keeps_category_case() {
    let e = Expense::parse("5", "food", "2024-01-01").unwrap();
    assert_eq!(e.category, "food");
}

#[test]
fn test_expense_parse_empty_category() {
    assert_eq!(
        Expense::parse("5", "   ", "2024-01-01"),
        Err(ValidationError::EmptyCategory)
    );
}

#[test]
fn test_expense_parse_bad_amount() {
    assert_eq!(
        Expense::parse("five", "Food", "2024-01-01"),
        Err(ValidationError::InvalidAmount("five".into()))
    );
}

#[test]
fn test_expense_parse_bad_date() {
    assert_eq!(
        Expense::parse("5", "Food", "01/02/2024"),
        Err(ValidationError::InvalidDate("01/02/2024".into()))
    );
    assert!(Expense::parse("5", "Food", "2024-02-30").is_err());
}

#[test]
fn test_parse_amount_negative_allowed() {
    assert_eq!(parse_amount("-3.25").unwrap(), dec!(-3.25));
}

#[test]
fn test_parse_amount_other_symbols() {
    assert_eq!(parse_amount("€20").unwrap(), dec!(20));
    assert_eq!(parse_amount("₹1,000").unwrap(), dec!(1000));
}

// ── BudgetConfig ──────────────────────────────────────────────

#[test]
fn test_budget_default_is_empty() {
    let b = BudgetConfig::default();
    assert_eq!(b.overall, Decimal::ZERO);
    assert!(b.categories.is_empty());
}

#[test]
fn test_budget_set_category_limit_keeps_order() {
    let mut b = BudgetConfig::new(dec!(1000));
    b.set_category_limit("Rent", dec!(600));
    b.set_category_limit("Food", dec!(200));
    b.set_category_limit("Rent", dec!(650));

    let names: Vec<&str> = b.categories.iter().map(|(c, _)| c.as_str()).collect();
    assert_eq!(names, ["Rent", "Food"]);
    assert_eq!(b.category_limit("Rent"), Some(dec!(650)));
}

#[test]
fn test_budget_category_lookup_is_exact_match() {
    let mut b = BudgetConfig::default();
    b.set_category_limit("Food", dec!(100));
    assert_eq!(b.category_limit("food"), None);
    assert_eq!(b.category_limit("Food "), None);
}

#[test]
fn test_budget_remove_category() {
    let mut b = BudgetConfig::default();
    b.set_category_limit("Food", dec!(100));
    assert!(b.remove_category("Food"));
    assert!(!b.remove_category("Food"));
    assert!(b.categories.is_empty());
}

// ── Currency ──────────────────────────────────────────────────

#[test]
fn test_currency_symbols() {
    assert_eq!(Currency::Usd.symbol(), "$");
    assert_eq!(Currency::Eur.symbol(), "€");
    assert_eq!(Currency::Gbp.symbol(), "£");
    assert_eq!(Currency::Jpy.symbol(), "¥");
    assert_eq!(Currency::Inr.symbol(), "₹");
}

#[test]
fn test_currency_parse_case_insensitive() {
    assert_eq!(Currency::parse("eur"), Some(Currency::Eur));
    assert_eq!(Currency::parse(" GBP "), Some(Currency::Gbp));
    assert_eq!(Currency::parse("CHF"), None);
}

#[test]
fn test_currency_roundtrip() {
    for c in Currency::all() {
        assert_eq!(Currency::parse(c.code()), Some(*c), "Roundtrip failed for {c}");
    }
}

#[test]
fn test_symbol_for_unknown_code_defaults_to_dollar() {
    assert_eq!(symbol_for_code("JPY"), "¥");
    assert_eq!(symbol_for_code("XYZ"), "$");
    assert_eq!(symbol_for_code(""), "$");
}

#[test]
fn test_validation_error_messages() {
    assert_eq!(
        ValidationError::InvalidAmount("x".into()).to_string(),
        "Invalid amount: 'x'"
    );
    assert!(ValidationError::UnknownCurrency("CHF".into())
        .to_string()
        .contains("USD"));
}
