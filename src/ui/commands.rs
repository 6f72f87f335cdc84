use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use chrono::{Datelike, Months, NaiveDate};

use super::app::{App, InputMode, PendingAction, Screen};
use super::util::format_amount;
use crate::analytics::Bucket;
use crate::db::Database;
use crate::import::ExpenseCsv;
use crate::models::{parse_amount, parse_iso_date, Currency, Expense, ValidationError};

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &mut Database) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit ExpenseTUI", cmd_quit, r);
    register_command!("quit", "Quit ExpenseTUI", cmd_quit, r);
    register_command!("d", "Go to Dashboard", cmd_dashboard, r);
    register_command!("dashboard", "Go to Dashboard", cmd_dashboard, r);
    register_command!("e", "Go to Expenses", cmd_expenses, r);
    register_command!("expenses", "Go to Expenses", cmd_expenses, r);
    register_command!("b", "Go to Budgets", cmd_budgets, r);
    register_command!("budgets", "Go to Budgets", cmd_budgets, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!(
        "add",
        "Add expense (e.g. :add 12.50 Food 2024-03-01)",
        cmd_add,
        r
    );
    register_command!("a", "Add expense (e.g. :a 12.50 Food)", cmd_add, r);
    register_command!(
        "edit",
        "Replace selected expense (e.g. :edit 15 Groceries)",
        cmd_edit,
        r
    );
    register_command!("delete", "Delete selected expense", cmd_delete, r);
    register_command!(
        "budget",
        "Set overall monthly budget (e.g. :budget 2000)",
        cmd_budget,
        r
    );
    register_command!(
        "category-budget",
        "Set category budget (e.g. :category-budget Food 300, or 'clear')",
        cmd_category_budget,
        r
    );
    register_command!(
        "cb",
        "Set category budget (e.g. :cb Food 300)",
        cmd_category_budget,
        r
    );
    register_command!(
        "delete-budget",
        "Delete selected category budget",
        cmd_delete_budget,
        r
    );
    register_command!(
        "currency",
        "Set display currency (USD, EUR, GBP, JPY, INR)",
        cmd_currency,
        r
    );
    register_command!(
        "view",
        "Bar chart granularity (e.g. :view monthly, no args toggles)",
        cmd_view,
        r
    );
    register_command!("v", "Toggle daily/monthly bars", cmd_view, r);
    register_command!(
        "range",
        "Filter by dates (e.g. :range 2024-01-01 2024-03-31, '-' for open)",
        cmd_range,
        r
    );
    register_command!("month", "Set budget month (e.g. :month 2024-01)", cmd_month, r);
    register_command!("m", "Set budget month (e.g. :m 2024-01)", cmd_month, r);
    register_command!("next-month", "Go to next budget month", cmd_next_month, r);
    register_command!("prev-month", "Go to previous budget month", cmd_prev_month, r);
    register_command!(
        "export",
        "Export shown expenses to CSV (e.g. :export ~/expenses.csv)",
        cmd_export,
        r
    );
    register_command!(
        "import",
        "Import expenses from CSV (e.g. :import ~/expenses.csv)",
        cmd_import,
        r
    );
    register_command!("i", "Import expenses from CSV", cmd_import, r);

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        tracing::debug!(command = cmd_name, "running command");
        if let Err(e) = (cmd.run)(args, app, db) {
            tracing::error!(command = cmd_name, error = %format!("{e:#}"), "command failed");
            app.set_status(format!("Error: {e:#}"));
        }
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 2) // skip short aliases for suggestions
        .min_by_key(|k| (levenshtein(input, k), **k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Parse `<amount> <category...> [YYYY-MM-DD]`. The date defaults to `default_date`.
pub(crate) fn parse_expense_args(
    args: &str,
    default_date: NaiveDate,
) -> Result<Expense, ValidationError> {
    let tokens: Vec<&str> = args.split_whitespace().collect();
    let amount = tokens.first().copied().unwrap_or("");
    let rest = tokens.get(1..).unwrap_or_default();

    let fallback = default_date.format("%Y-%m-%d").to_string();
    let (category_tokens, date) = match rest.split_last() {
        Some((last, init)) if !init.is_empty() && looks_like_date(last) => (init, *last),
        _ => (rest, fallback.as_str()),
    };

    Expense::parse(amount, &category_tokens.join(" "), date)
}

fn looks_like_date(token: &str) -> bool {
    token.starts_with(|c: char| c.is_ascii_digit()) && token.contains('-')
}

/// Parse `[start] [end]` where `-` or a missing token leaves that side open.
pub(crate) fn parse_range(
    args: &str,
) -> Result<(Option<NaiveDate>, Option<NaiveDate>), ValidationError> {
    let mut tokens = args.split_whitespace();
    let start = parse_bound(tokens.next())?;
    let end = parse_bound(tokens.next())?;
    Ok((start, end))
}

fn parse_bound(token: Option<&str>) -> Result<Option<NaiveDate>, ValidationError> {
    match token {
        None | Some("-") | Some("*") => Ok(None),
        Some(raw) => parse_iso_date(raw).map(Some),
    }
}

/// Expand a leading `~/` to the home directory.
pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_dashboard(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Dashboard;
    app.refresh(db)
}

fn cmd_expenses(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Expenses;
    app.refresh(db)
}

fn cmd_budgets(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Budgets;
    app.refresh(db)
}

fn cmd_help(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_add(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        let known = db.get_categories()?;
        if known.is_empty() {
            app.set_status("Usage: :add <amount> <category> [YYYY-MM-DD]");
        } else {
            app.set_status(format!(
                "Usage: :add <amount> <category> [YYYY-MM-DD]  (known: {})",
                known.join(", ")
            ));
        }
        return Ok(());
    }

    match parse_expense_args(args, app.today) {
        Ok(expense) => {
            db.insert_expense(&expense)?;
            app.refresh(db)?;
            app.set_status(format!(
                "Added {} to {} on {}",
                format_amount(expense.amount, app.symbol()),
                expense.category,
                expense.date
            ));
        }
        Err(e) => app.set_status(e.to_string()),
    }
    Ok(())
}

fn cmd_edit(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if app.screen != Screen::Expenses {
        app.set_status("Navigate to Expenses and select one first");
        return Ok(());
    }
    let Some(selected) = app.selected_expense().cloned() else {
        app.set_status("No expense selected");
        return Ok(());
    };
    if args.is_empty() {
        app.set_status(format!(
            "Usage: :edit <amount> <category> [YYYY-MM-DD]. Current: {} {} {}",
            selected.amount, selected.category, selected.date
        ));
        return Ok(());
    }

    match parse_expense_args(args, selected.date) {
        Ok(mut expense) => {
            expense.id = selected.id;
            if db.update_expense(&expense)? {
                app.refresh(db)?;
                app.set_status(format!("Updated expense: {} {}", expense.category, expense.date));
            } else {
                app.set_status("Expense no longer exists");
            }
        }
        Err(e) => app.set_status(e.to_string()),
    }
    Ok(())
}

fn cmd_delete(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    if app.screen != Screen::Expenses {
        app.set_status("Navigate to Expenses and select one first");
        return Ok(());
    }

    if let Some(expense) = app.selected_expense() {
        if let Some(id) = expense.id {
            let label = format!(
                "{} {} on {}",
                format_amount(expense.amount, app.symbol()),
                expense.category,
                expense.date
            );
            app.confirm_message = format!("Delete {label}?");
            app.pending_action = Some(PendingAction::DeleteExpense { id, label });
            app.input_mode = InputMode::Confirm;
        }
    } else {
        app.set_status("No expenses to delete");
    }

    Ok(())
}

fn cmd_budget(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status(format!(
            "Overall budget: {}. Usage: :budget <amount>",
            format_amount(app.budget.overall, app.symbol())
        ));
        return Ok(());
    }

    let amount = match parse_amount(args) {
        Ok(a) => a,
        Err(e) => {
            app.set_status(e.to_string());
            return Ok(());
        }
    };

    let mut budget = app.budget.clone();
    budget.overall = amount;
    db.save_budget(&budget)?;
    app.refresh(db)?;
    app.set_status(format!(
        "Overall budget set to {}",
        format_amount(amount, app.symbol())
    ));
    Ok(())
}

fn cmd_category_budget(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    // Last token is the amount, everything before is the category name
    let parts: Vec<&str> = args.rsplitn(2, ' ').collect();
    if parts.len() < 2 {
        app.set_status("Usage: :category-budget <category> <amount|clear>");
        return Ok(());
    }

    let amount_str = parts[0];
    let category = parts[1].trim();
    let mut budget = app.budget.clone();

    if matches!(amount_str.to_lowercase().as_str(), "clear" | "none") {
        if !budget.remove_category(category) {
            app.set_status(format!("No budget set for '{category}'"));
            return Ok(());
        }
        db.save_budget(&budget)?;
        app.refresh(db)?;
        app.set_status(format!("Cleared budget for {category}"));
        return Ok(());
    }

    let amount = match parse_amount(amount_str) {
        Ok(a) => a,
        Err(e) => {
            app.set_status(e.to_string());
            return Ok(());
        }
    };

    let previous = budget.category_limit(category);
    budget.set_category_limit(category, amount);
    db.save_budget(&budget)?;
    app.refresh(db)?;
    app.screen = Screen::Budgets;
    let symbol = app.symbol();
    let message = match previous {
        Some(old) => format!(
            "Budget set: {category} = {} (was {})",
            format_amount(amount, symbol),
            format_amount(old, symbol)
        ),
        None => format!("Budget set: {category} = {}", format_amount(amount, symbol)),
    };
    app.set_status(message);
    Ok(())
}

fn cmd_delete_budget(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    if app.screen != Screen::Budgets {
        app.set_status("Navigate to Budgets and select one first");
        return Ok(());
    }

    match app.selected_budget_category().map(str::to_string) {
        Some(category) => {
            app.confirm_message = format!("Delete budget for '{category}'?");
            app.pending_action = Some(PendingAction::DeleteCategoryBudget { category });
            app.input_mode = InputMode::Confirm;
        }
        None => app.set_status("No category budgets to delete"),
    }

    Ok(())
}

fn cmd_currency(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        let options: Vec<String> = Currency::all().iter().map(|c| c.to_string()).collect();
        app.set_status(format!(
            "Currency: {}. Options: {}",
            app.currency,
            options.join(", ")
        ));
        return Ok(());
    }

    match Currency::parse(args) {
        Some(currency) => {
            db.set_currency(currency.code())?;
            app.refresh(db)?;
            app.set_status(format!("Currency set to {currency}"));
        }
        None => app.set_status(ValidationError::UnknownCurrency(args.to_string()).to_string()),
    }
    Ok(())
}

fn cmd_view(args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    let bucket = if args.is_empty() {
        app.bucket.toggle()
    } else {
        match Bucket::parse(args) {
            Some(b) => b,
            None => {
                app.set_status("Usage: :view [daily|monthly]");
                return Ok(());
            }
        }
    };

    app.bucket = bucket;
    app.recompute();
    app.set_status(format!("{bucket} view"));
    Ok(())
}

fn cmd_range(args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    let (start, end) = match parse_range(args) {
        Ok(b) => b,
        Err(e) => {
            app.set_status(e.to_string());
            return Ok(());
        }
    };

    if let (Some(s), Some(e)) = (start, end) {
        if s > e {
            app.set_status(format!("Range start {s} is after end {e}"));
            return Ok(());
        }
    }

    app.range_start = start;
    app.range_end = end;
    app.recompute();
    app.set_status(format!(
        "Showing {} ({} expenses)",
        app.range_label(),
        app.filtered.len()
    ));
    Ok(())
}

fn cmd_month(args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.reference = app.today;
        app.recompute();
        app.set_status(format!("Budget month: {}", app.reference_month()));
        return Ok(());
    }

    let moved = NaiveDate::parse_from_str(&format!("{args}-01"), "%Y-%m-%d")
        .is_ok_and(|d| app.set_reference_month(d.year(), d.month()));
    if moved {
        app.recompute();
        app.set_status(format!("Budget month: {}", app.reference_month()));
    } else {
        app.set_status("Invalid month format. Use YYYY-MM (e.g. 2024-01)");
    }
    Ok(())
}

fn cmd_next_month(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    advance_month(app, 1);
    Ok(())
}

fn cmd_prev_month(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    advance_month(app, -1);
    Ok(())
}

fn advance_month(app: &mut App, delta: i32) {
    let first = app.reference.with_day(1).unwrap_or(app.reference);
    let moved = if delta > 0 {
        first.checked_add_months(Months::new(1))
    } else {
        first.checked_sub_months(Months::new(1))
    };

    if let Some(d) = moved {
        if app.set_reference_month(d.year(), d.month()) {
            app.recompute();
            app.set_status(format!("Budget month: {}", app.reference_month()));
        }
    }
}

fn cmd_export(args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    let path = if args.is_empty() {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/expensetui-export.csv")
    } else {
        shellexpand(args)
    };

    if app.filtered.is_empty() {
        app.set_status("No expenses to export");
        return Ok(());
    }

    ExpenseCsv::write(Path::new(&path), &app.filtered)?;
    tracing::info!(count = app.filtered.len(), path = %path, "exported expenses");
    app.set_status(format!("Exported {} expenses to {path}", app.filtered.len()));
    Ok(())
}

fn cmd_import(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :import <file.csv>");
        return Ok(());
    }

    let path = shellexpand(args);
    let expenses = ExpenseCsv::read(Path::new(&path))?;
    let count = db.insert_expenses_batch(&expenses)?;
    app.refresh(db)?;
    app.set_status(format!("Imported {count} expenses from {path}"));
    Ok(())
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
