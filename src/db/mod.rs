mod schema;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::models::{BudgetConfig, Expense};

const OVERALL_BUDGET_KEY: &str = "overall_budget";
const CURRENCY_KEY: &str = "currency";
const DEFAULT_CURRENCY: &str = "USD";

/// Everything the store persists, as one value.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Snapshot {
    pub(crate) expenses: Vec<Expense>,
    pub(crate) budget: BudgetConfig,
    pub(crate) currency: String,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            expenses: Vec::new(),
            budget: BudgetConfig::default(),
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

/// Whole-state persistence used by the presentation layer.
pub(crate) trait RecordStore {
    fn load(&self) -> Result<Snapshot>;
    /// Replace everything stored with `snapshot`. Expense ids are reassigned in list order.
    fn save(&mut self, snapshot: &Snapshot) -> Result<()>;
}

pub(crate) struct Database {
    conn: Connection,
}

fn row_to_expense(row: &Row) -> rusqlite::Result<Expense> {
    let amount_str: String = row.get(1)?;
    let date_str: String = row.get(3)?;
    let amount = Decimal::from_str(&amount_str)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))?;
    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;
    Ok(Expense {
        id: Some(row.get(0)?),
        amount,
        category: row.get(2)?,
        date,
    })
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        tracing::debug!(path = %path.display(), "database opened");
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    // ── Expenses ──────────────────────────────────────────────

    pub(crate) fn insert_expense(&self, expense: &Expense) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO expenses (amount, category, date) VALUES (?1, ?2, ?3)",
            params![
                expense.amount.to_string(),
                expense.category,
                expense.day_key(),
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::info!(id, category = %expense.category, amount = %expense.amount, "expense added");
        Ok(id)
    }

    pub(crate) fn insert_expenses_batch(&mut self, expenses: &[Expense]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        for expense in expenses {
            tx.execute(
                "INSERT INTO expenses (amount, category, date) VALUES (?1, ?2, ?3)",
                params![
                    expense.amount.to_string(),
                    expense.category,
                    expense.day_key(),
                ],
            )?;
        }
        tx.commit()?;
        tracing::info!(count = expenses.len(), "expenses imported");
        Ok(expenses.len())
    }

    /// Replace the stored record with the same id. Returns false if no such record exists.
    pub(crate) fn update_expense(&self, expense: &Expense) -> Result<bool> {
        let id = expense
            .id
            .ok_or_else(|| anyhow::anyhow!("Cannot update an expense without an id"))?;
        let changed = self.conn.execute(
            "UPDATE expenses SET amount = ?1, category = ?2, date = ?3 WHERE id = ?4",
            params![
                expense.amount.to_string(),
                expense.category,
                expense.day_key(),
                id,
            ],
        )?;
        if changed > 0 {
            tracing::info!(id, "expense updated");
        }
        Ok(changed > 0)
    }

    pub(crate) fn delete_expense(&self, id: i64) -> Result<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM expenses WHERE id = ?1", params![id])?;
        if changed > 0 {
            tracing::info!(id, "expense deleted");
        }
        Ok(changed > 0)
    }

    /// All expenses in insertion order.
    pub(crate) fn get_expenses(&self) -> Result<Vec<Expense>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, amount, category, date FROM expenses ORDER BY id")?;
        let rows = stmt.query_map([], row_to_expense)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_expense_by_id(&self, id: i64) -> Result<Option<Expense>> {
        let result = self.conn.query_row(
            "SELECT id, amount, category, date FROM expenses WHERE id = ?1",
            params![id],
            row_to_expense,
        );
        match result {
            Ok(e) => Ok(Some(e)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub(crate) fn get_expense_count(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM expenses", [], |row| row.get(0))?)
    }

    /// Distinct categories in the order they were first used.
    pub(crate) fn get_categories(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT category FROM expenses GROUP BY category ORDER BY MIN(id)",
        )?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    // ── Budget ────────────────────────────────────────────────

    pub(crate) fn get_budget(&self) -> Result<BudgetConfig> {
        let overall = match self.get_setting(OVERALL_BUDGET_KEY)? {
            Some(raw) => Decimal::from_str(&raw)
                .with_context(|| format!("Stored overall budget is not a number: {raw}"))?,
            None => Decimal::ZERO,
        };
        let mut budget = BudgetConfig::new(overall);

        let mut stmt = self
            .conn
            .prepare("SELECT category, limit_amount FROM category_budgets ORDER BY position")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        for row in rows {
            let (category, raw) = row?;
            let limit = Decimal::from_str(&raw)
                .with_context(|| format!("Stored budget for '{category}' is not a number: {raw}"))?;
            budget.categories.push((category, limit));
        }
        Ok(budget)
    }

    /// Replace the whole budget configuration.
    pub(crate) fn save_budget(&mut self, budget: &BudgetConfig) -> Result<()> {
        let tx = self.conn.transaction()?;
        write_budget(&tx, budget)?;
        tx.commit()?;
        tracing::info!(
            overall = %budget.overall,
            categories = budget.categories.len(),
            "budget saved"
        );
        Ok(())
    }

    // ── Settings ──────────────────────────────────────────────

    pub(crate) fn get_currency(&self) -> Result<String> {
        Ok(self
            .get_setting(CURRENCY_KEY)?
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()))
    }

    pub(crate) fn set_currency(&self, code: &str) -> Result<()> {
        set_setting(&self.conn, CURRENCY_KEY, code)?;
        tracing::info!(code, "currency changed");
        Ok(())
    }

    fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let result = self.conn.query_row(
            "SELECT value FROM settings WHERE key = ?1",
            params![key],
            |row| row.get(0),
        );
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = ?2",
        params![key, value],
    )?;
    Ok(())
}

fn write_budget(conn: &Connection, budget: &BudgetConfig) -> Result<()> {
    set_setting(conn, OVERALL_BUDGET_KEY, &budget.overall.to_string())?;
    conn.execute("DELETE FROM category_budgets", [])?;
    for (position, (category, limit)) in budget.categories.iter().enumerate() {
        conn.execute(
            "INSERT INTO category_budgets (position, category, limit_amount) VALUES (?1, ?2, ?3)",
            params![position as i64, category, limit.to_string()],
        )?;
    }
    Ok(())
}

impl RecordStore for Database {
    fn load(&self) -> Result<Snapshot> {
        let snapshot = Snapshot {
            expenses: self.get_expenses()?,
            budget: self.get_budget()?,
            currency: self.get_currency()?,
        };
        tracing::debug!(expenses = snapshot.expenses.len(), "snapshot loaded");
        Ok(snapshot)
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM expenses", [])?;
        for expense in &snapshot.expenses {
            tx.execute(
                "INSERT INTO expenses (amount, category, date) VALUES (?1, ?2, ?3)",
                params![
                    expense.amount.to_string(),
                    expense.category,
                    expense.day_key(),
                ],
            )?;
        }
        write_budget(&tx, &snapshot.budget)?;
        set_setting(&tx, CURRENCY_KEY, &snapshot.currency)?;
        tx.commit()?;
        tracing::info!(expenses = snapshot.expenses.len(), "snapshot saved");
        Ok(())
    }
}
