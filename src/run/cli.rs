use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::Path;

use crate::analytics::{
    category_totals, daily_totals, filter_by_date_range, monthly_totals, predicted_category_spend,
    span_days, Bucket, ExpenseSummary,
};
use crate::chart::{pie_layout, series_from_totals, BarChartLayout};
use crate::db::{Database, RecordStore};
use crate::import::ExpenseCsv;
use crate::models::{parse_amount, symbol_for_code, Currency, ValidationError};
use crate::ui::commands::{parse_expense_args, parse_range, shellexpand};
use crate::ui::util::{format_amount, progress_bar};

const CHART_WIDTH: usize = 40;

pub(crate) fn as_cli(args: &[String], db: &mut Database, today: NaiveDate) -> Result<()> {
    tracing::debug!(command = %args[1], "running CLI command");
    match args[1].as_str() {
        "add" => cli_add(&args[2..], db, today),
        "edit" => cli_edit(&args[2..], db),
        "delete" | "rm" => cli_delete(&args[2..], db),
        "list" | "ls" => cli_list(&args[2..], db),
        "summary" | "s" => cli_summary(&args[2..], db, today),
        "budget" => cli_budget(&args[2..], db),
        "currency" => cli_currency(&args[2..], db),
        "chart" => cli_chart(&args[2..], db),
        "import" => cli_import(&args[2..], db),
        "export" => cli_export(&args[2..], db),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("expensetui {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("ExpenseTUI - local-only expense tracker and spending analysis");
    println!();
    println!("Usage: expensetui [command]");
    println!();
    println!("Commands:");
    println!("  (none)                              Launch interactive TUI");
    println!("  add <amount> <category> [date]      Record an expense (date defaults to today)");
    println!("  edit <id> <amount> <category> [date]  Replace an expense");
    println!("  delete <id>                         Delete an expense");
    println!("  list [--from DATE] [--to DATE]      List expenses in recorded order");
    println!("  summary [YYYY-MM]                   Totals, forecast and budget status");
    println!("  budget [amount]                     Show or set the overall monthly budget");
    println!("  budget <category> <amount|clear>    Set or clear a category budget");
    println!("  currency [CODE]                     Show or set currency (USD EUR GBP JPY INR)");
    println!("  chart <daily|monthly|pie>           Print chart data");
    println!("  import <file.csv> [--replace]       Import date,category,amount rows");
    println!("  export [path]                       Export all expenses to CSV");
    println!("  --help, -h                          Show this help");
    println!("  --version, -V                       Show version");
    println!();
    println!("Set EXPENSETUI_DB to use a different database file.");
}

fn symbol(db: &Database) -> Result<&'static str> {
    Ok(symbol_for_code(&db.get_currency()?))
}

fn cli_add(args: &[String], db: &mut Database, today: NaiveDate) -> Result<()> {
    if args.len() < 2 {
        anyhow::bail!("Usage: expensetui add <amount> <category> [YYYY-MM-DD]");
    }
    let expense = parse_expense_args(&args.join(" "), today)?;
    let id = db.insert_expense(&expense)?;
    println!(
        "Added #{id}: {} {} on {}",
        format_amount(expense.amount, symbol(db)?),
        expense.category,
        expense.date
    );
    Ok(())
}

fn parse_id(raw: Option<&String>) -> Result<i64> {
    let raw = raw.ok_or_else(|| anyhow::anyhow!("Missing expense id"))?;
    raw.trim_start_matches('#')
        .parse()
        .with_context(|| format!("Invalid expense id: {raw}"))
}

fn cli_edit(args: &[String], db: &mut Database) -> Result<()> {
    if args.len() < 3 {
        anyhow::bail!("Usage: expensetui edit <id> <amount> <category> [YYYY-MM-DD]");
    }
    let id = parse_id(args.first())?;
    let existing = db
        .get_expense_by_id(id)?
        .ok_or_else(|| anyhow::anyhow!("No expense with id {id}"))?;

    let mut expense = parse_expense_args(&args[1..].join(" "), existing.date)?;
    expense.id = Some(id);
    db.update_expense(&expense)?;
    println!(
        "Updated #{id}: {} {} on {}",
        format_amount(expense.amount, symbol(db)?),
        expense.category,
        expense.date
    );
    Ok(())
}

fn cli_delete(args: &[String], db: &mut Database) -> Result<()> {
    let id = parse_id(args.first())?;
    if db.delete_expense(id)? {
        println!("Deleted #{id}");
        Ok(())
    } else {
        anyhow::bail!("No expense with id {id}");
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn cli_list(args: &[String], db: &mut Database) -> Result<()> {
    let range = format!(
        "{} {}",
        flag_value(args, "--from").unwrap_or("-"),
        flag_value(args, "--to").unwrap_or("-")
    );
    let (from, to) = parse_range(&range)?;
    let expenses = filter_by_date_range(&db.get_expenses()?, from, to);
    if expenses.is_empty() {
        println!("No expenses");
        return Ok(());
    }

    let symbol = symbol(db)?;
    println!("{:<6} {:<12} {:<24} {:>14}", "ID", "Date", "Category", "Amount");
    println!("{}", "─".repeat(59));
    for e in &expenses {
        println!(
            "{:<6} {:<12} {:<24} {:>14}",
            e.id.unwrap_or(0),
            e.date,
            e.category,
            format_amount(e.amount, symbol)
        );
    }
    Ok(())
}

fn cli_summary(args: &[String], db: &mut Database, today: NaiveDate) -> Result<()> {
    let reference = match args.first() {
        Some(month) => NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d")
            .with_context(|| format!("Invalid month '{month}', expected YYYY-MM"))?,
        None => today,
    };

    let snapshot = db.load()?;
    let symbol = symbol_for_code(&snapshot.currency);
    let summary = ExpenseSummary::compute(&snapshot.expenses, &snapshot.budget, reference);

    println!("ExpenseTUI - {}", reference.format("%Y-%m"));
    println!("{}", "─".repeat(48));
    println!("  Expenses:        {}", summary.record_count);
    println!("  Total:           {}", format_amount(summary.total, symbol));
    println!("  Average:         {}", format_amount(summary.average, symbol));
    if let Some(top) = &summary.top_category {
        println!(
            "  Top category:    {} ({})",
            top.category,
            format_amount(top.total, symbol)
        );
    }
    println!(
        "  Forecast (30d):  {} (over {} days of data)",
        format_amount(summary.predicted_monthly, symbol),
        span_days(&snapshot.expenses)
    );
    println!(
        "  This month:      {}",
        format_amount(summary.current_month_total, symbol)
    );
    println!("  Overall budget:  {}", summary.overall.describe());

    if !summary.categories.is_empty() {
        println!();
        println!("Category budgets:");
        for cat in &summary.categories {
            println!(
                "  {:<20} {:>12} / {:<12} {} {}",
                cat.category,
                format_amount(cat.progress.used, symbol),
                format_amount(cat.progress.limit, symbol),
                progress_bar(cat.progress.fill_ratio(), 20),
                cat.progress.describe()
            );
        }
    }

    let forecasts = predicted_category_spend(&snapshot.expenses);
    if !forecasts.is_empty() {
        println!();
        println!("Forecast by category (30 days):");
        for f in &forecasts {
            println!("  {:<20} {:>12}", f.category, format_amount(f.total, symbol));
        }
    }

    Ok(())
}

fn cli_budget(args: &[String], db: &mut Database) -> Result<()> {
    let mut budget = db.get_budget()?;
    let symbol = symbol(db)?;

    match args {
        [] => {
            println!("Overall: {}", format_amount(budget.overall, symbol));
            for (category, limit) in &budget.categories {
                println!("  {category:<20} {}", format_amount(*limit, symbol));
            }
            return Ok(());
        }
        [amount] => {
            budget.overall = parse_amount(amount)?;
            println!("Overall budget set to {}", format_amount(budget.overall, symbol));
        }
        [category @ .., amount] => {
            let category = category.join(" ");
            if matches!(amount.to_lowercase().as_str(), "clear" | "none") {
                if !budget.remove_category(&category) {
                    anyhow::bail!("No budget set for '{category}'");
                }
                println!("Cleared budget for {category}");
            } else {
                let limit = parse_amount(amount)?;
                budget.set_category_limit(&category, limit);
                println!("Budget set: {category} = {}", format_amount(limit, symbol));
            }
        }
    }

    db.save_budget(&budget)
}

fn cli_currency(args: &[String], db: &mut Database) -> Result<()> {
    match args.first() {
        None => {
            let code = db.get_currency()?;
            println!("{code} ({})", symbol_for_code(&code));
            Ok(())
        }
        Some(code) => {
            let currency =
                Currency::parse(code).ok_or_else(|| ValidationError::UnknownCurrency(code.clone()))?;
            db.set_currency(currency.code())?;
            println!("Currency set to {currency}");
            Ok(())
        }
    }
}

fn cli_chart(args: &[String], db: &mut Database) -> Result<()> {
    let kind = args.first().map(String::as_str).unwrap_or("daily");
    let expenses = db.get_expenses()?;
    let symbol = symbol(db)?;

    if kind == "pie" {
        let totals = category_totals(&expenses);
        let slices = pie_layout(&series_from_totals(&totals), 1.0);
        for (slice, total) in slices.iter().zip(&totals) {
            if slice.value <= 0.0 {
                println!(
                    "{:<20} {:>12}  (not drawn)",
                    slice.category,
                    format_amount(total.total, symbol)
                );
                continue;
            }
            println!(
                "{:<20} {:>12} {:>6.1}%  {:>6.3}..{:<6.3} rad",
                slice.category,
                format_amount(total.total, symbol),
                slice.share_percent,
                slice.start_angle,
                slice.end_angle
            );
        }
        return Ok(());
    }

    let bucket = Bucket::parse(kind)
        .ok_or_else(|| anyhow::anyhow!("Usage: expensetui chart <daily|monthly|pie>"))?;
    let series = match bucket {
        Bucket::Daily => daily_totals(&expenses),
        Bucket::Monthly => monthly_totals(&expenses),
    };
    if series.is_empty() {
        println!("No expenses");
        return Ok(());
    }

    let layout = BarChartLayout::build(&series, bucket);
    for (bar, total) in layout.bars.iter().zip(&series) {
        let ratio = if layout.y_max > 0.0 {
            bar.value.max(0.0) / layout.y_max
        } else {
            0.0
        };
        let cells = (ratio * CHART_WIDTH as f64).round() as usize;
        println!(
            "{:<10} {:<width$} {}",
            bar.key,
            "█".repeat(cells),
            format_amount(total.total, symbol),
            width = CHART_WIDTH
        );
    }
    Ok(())
}

fn cli_import(args: &[String], db: &mut Database) -> Result<()> {
    let file_path = args
        .first()
        .ok_or_else(|| anyhow::anyhow!("Usage: expensetui import <file.csv> [--replace]"))?;
    let path = shellexpand(file_path);
    if !Path::new(&path).exists() {
        anyhow::bail!("File not found: {path}");
    }

    let expenses = ExpenseCsv::read(Path::new(&path))?;
    println!("Parsed {} expenses", expenses.len());

    if args.iter().any(|a| a == "--replace") {
        let mut snapshot = db.load()?;
        snapshot.expenses = expenses;
        db.save(&snapshot)?;
        println!("Replaced all expenses with {} imported", snapshot.expenses.len());
    } else {
        let count = db.insert_expenses_batch(&expenses)?;
        println!(
            "Imported {count} expenses ({} total)",
            db.get_expense_count()?
        );
    }
    Ok(())
}

fn cli_export(args: &[String], db: &mut Database) -> Result<()> {
    let output_path = args
        .first()
        .filter(|a| !a.starts_with('-'))
        .map(|a| shellexpand(a))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            format!("{home}/expensetui-export.csv")
        });

    let expenses = db.get_expenses()?;
    if expenses.is_empty() {
        println!("No expenses to export");
        return Ok(());
    }
    ExpenseCsv::write(Path::new(&output_path), &expenses)?;
    println!("Exported {} expenses to {output_path}", expenses.len());
    Ok(())
}
