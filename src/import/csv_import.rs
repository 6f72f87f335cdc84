use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::models::Expense;

const HEADER: [&str; 3] = ["date", "category", "amount"];
const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%m/%d/%Y", "%m-%d-%Y", "%m/%d/%y", "%d/%m/%Y"];

/// Reads and writes expense lists as `date,category,amount` CSV.
pub(crate) struct ExpenseCsv;

impl ExpenseCsv {
    pub(crate) fn read(path: &Path) -> Result<Vec<Expense>> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .has_headers(false)
            .from_path(path)
            .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;

        let mut rows: Vec<Vec<String>> = Vec::new();
        for result in rdr.records() {
            let record = result.context("Failed to read CSV record")?;
            rows.push(record.iter().map(|s| s.to_string()).collect());
        }

        if rows.is_empty() {
            anyhow::bail!("CSV file is empty");
        }

        let skip = usize::from(looks_like_header(&rows[0]));
        Self::parse_rows(&rows, skip)
    }

    fn parse_rows(rows: &[Vec<String>], skip: usize) -> Result<Vec<Expense>> {
        let mut expenses = Vec::new();

        for (i, row) in rows.iter().enumerate().skip(skip) {
            let field = |col: usize| row.get(col).map(|s| s.trim()).unwrap_or_default();

            let date_str = field(0);
            if date_str.is_empty() {
                tracing::warn!(row = i + 1, "skipping CSV row with empty date");
                continue;
            }

            let date = parse_date(date_str)
                .with_context(|| format!("Row {}: failed to parse date '{}'", i + 1, date_str))?;

            let category = field(1);
            if category.is_empty() {
                anyhow::bail!("Row {}: category is empty", i + 1);
            }

            let amount = parse_decimal(field(2))
                .with_context(|| format!("Row {}: failed to parse amount", i + 1))?;

            expenses.push(Expense::new(amount, category.to_string(), date));
        }

        tracing::debug!(count = expenses.len(), "parsed expenses from CSV");
        Ok(expenses)
    }

    /// Write `expenses` in the given order, with a header row.
    pub(crate) fn write(path: &Path, expenses: &[Expense]) -> Result<()> {
        let mut wtr = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
        wtr.write_record(HEADER)?;
        for expense in expenses {
            wtr.write_record([
                expense.day_key(),
                expense.category.clone(),
                expense.amount.to_string(),
            ])?;
        }
        wtr.flush().context("Failed to flush CSV file")?;
        Ok(())
    }
}

fn looks_like_header(row: &[String]) -> bool {
    // Headers don't parse as dates or numbers
    row.iter().all(|field| {
        let trimmed = field.trim();
        parse_decimal(trimmed).is_err() && parse_date(trimmed).is_err()
    })
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    anyhow::bail!("Could not parse date: {}", s)
}

fn parse_decimal(s: &str) -> Result<Decimal> {
    let cleaned = s
        .replace(['$', ','], "")
        .replace('(', "-")
        .replace(')', "")
        .trim()
        .to_string();
    if cleaned.is_empty() {
        anyhow::bail!("Amount is empty");
    }
    Decimal::from_str(&cleaned).with_context(|| format!("Failed to parse '{}' as decimal", s))
}

#[cfg(test)]
#[path = "csv_import_tests.rs"]
mod tests;
