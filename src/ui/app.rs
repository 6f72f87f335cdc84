use anyhow::Result;
use chrono::{Datelike, NaiveDate};

use crate::analytics::{
    bucket_totals, category_totals, filter_by_date_range, Bucket, CategoryTotal, ExpenseSummary,
    TimeBucketTotal,
};
use crate::db::{Database, RecordStore};
use crate::models::{symbol_for_code, BudgetConfig, Expense};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Dashboard,
    Expenses,
    Budgets,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[Self::Dashboard, Self::Expenses, Self::Budgets]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dashboard => write!(f, "Dashboard"),
            Self::Expenses => write!(f, "Expenses"),
            Self::Budgets => write!(f, "Budgets"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

/// Pending action that requires user confirmation.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PendingAction {
    DeleteExpense { id: i64, label: String },
    DeleteCategoryBudget { category: String },
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,

    /// Captured once at startup; new expenses default to this date.
    pub(crate) today: NaiveDate,
    /// Date whose calendar month the budget is evaluated against.
    pub(crate) reference: NaiveDate,
    pub(crate) bucket: Bucket,
    pub(crate) range_start: Option<NaiveDate>,
    pub(crate) range_end: Option<NaiveDate>,

    // Stored state
    pub(crate) expenses: Vec<Expense>,
    pub(crate) budget: BudgetConfig,
    pub(crate) currency: String,

    // Derived views over the range-filtered records
    pub(crate) filtered: Vec<Expense>,
    pub(crate) summary: ExpenseSummary,
    pub(crate) category_totals: Vec<CategoryTotal>,
    pub(crate) bucket_series: Vec<TimeBucketTotal>,

    // Dashboard
    pub(crate) slice_index: usize,

    // Expenses
    pub(crate) expense_index: usize,
    pub(crate) expense_scroll: usize,

    // Budgets
    pub(crate) budget_index: usize,

    // Confirmation
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new(today: NaiveDate) -> Self {
        let budget = BudgetConfig::default();
        Self {
            running: true,
            screen: Screen::Dashboard,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            status_message: String::new(),
            show_help: false,

            today,
            reference: today,
            bucket: Bucket::Daily,
            range_start: None,
            range_end: None,

            expenses: Vec::new(),
            summary: ExpenseSummary::compute(&[], &budget, today),
            budget,
            currency: "USD".into(),

            filtered: Vec::new(),
            category_totals: Vec::new(),
            bucket_series: Vec::new(),

            slice_index: 0,

            expense_index: 0,
            expense_scroll: 0,

            budget_index: 0,

            pending_action: None,
            confirm_message: String::new(),

            visible_rows: 20,
        }
    }

    /// Reload everything from the store and recompute the derived views.
    pub(crate) fn refresh(&mut self, db: &Database) -> Result<()> {
        let snapshot = db.load()?;
        self.expenses = snapshot.expenses;
        self.budget = snapshot.budget;
        self.currency = snapshot.currency;
        self.recompute();
        Ok(())
    }

    /// Re-derive every view from the in-memory records. Nothing is cached between calls.
    pub(crate) fn recompute(&mut self) {
        self.filtered = filter_by_date_range(&self.expenses, self.range_start, self.range_end);
        self.summary = ExpenseSummary::compute(&self.filtered, &self.budget, self.reference);
        self.category_totals = category_totals(&self.filtered);
        self.bucket_series = bucket_totals(&self.filtered, self.bucket);
        self.clamp_cursors();
    }

    fn clamp_cursors(&mut self) {
        let clamp = |index: &mut usize, len: usize| {
            if *index >= len {
                *index = len.saturating_sub(1);
            }
        };
        clamp(&mut self.slice_index, self.category_totals.len());
        clamp(&mut self.expense_index, self.filtered.len());
        clamp(&mut self.budget_index, self.budget.categories.len());
        if self.expense_scroll > self.expense_index {
            self.expense_scroll = self.expense_index;
        }
    }

    pub(crate) fn symbol(&self) -> &'static str {
        symbol_for_code(&self.currency)
    }

    pub(crate) fn selected_expense(&self) -> Option<&Expense> {
        self.filtered.get(self.expense_index)
    }

    pub(crate) fn selected_budget_category(&self) -> Option<&str> {
        self.budget
            .categories
            .get(self.budget_index)
            .map(|(name, _)| name.as_str())
    }

    pub(crate) fn reference_month(&self) -> String {
        self.reference.format("%Y-%m").to_string()
    }

    /// Move the reference date to the first of `year-month`, or back to today for the current month.
    pub(crate) fn set_reference_month(&mut self, year: i32, month: u32) -> bool {
        if year == self.today.year() && month == self.today.month() {
            self.reference = self.today;
            return true;
        }
        match NaiveDate::from_ymd_opt(year, month, 1) {
            Some(d) => {
                self.reference = d;
                true
            }
            None => false,
        }
    }

    pub(crate) fn range_label(&self) -> String {
        match (self.range_start, self.range_end) {
            (None, None) => "all dates".into(),
            (Some(s), None) => format!("from {s}"),
            (None, Some(e)) => format!("until {e}"),
            (Some(s), Some(e)) => format!("{s} to {e}"),
        }
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }
}
