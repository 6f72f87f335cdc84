mod analytics;
mod chart;
mod db;
mod import;
mod models;
mod run;
mod ui;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

const DB_ENV_VAR: &str = "EXPENSETUI_DB";
const DEFAULT_LOG_FILTER: &str = "expensetui=warn";

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let interactive = args.len() == 1;
    let db_path = get_db_path()?;
    init_logging(interactive, &db_path)?;

    let mut db = db::Database::open(&db_path)?;
    // Captured once so every view in this session agrees on "this month"
    let today = chrono::Local::now().date_naive();

    if interactive {
        run::as_tui(&mut db, today)
    } else {
        run::as_cli(&args, &mut db, today)
    }
}

/// The TUI owns the terminal, so its logs go to a file next to the database.
fn init_logging(interactive: bool, db_path: &Path) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    if interactive {
        let log_path = db_path.with_file_name("expensetui.log");
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .with_context(|| format!("Failed to open log file: {}", log_path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

fn get_db_path() -> Result<PathBuf> {
    if let Some(path) = std::env::var_os(DB_ENV_VAR) {
        let path = PathBuf::from(path);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        return Ok(path);
    }

    let proj_dirs = directories::ProjectDirs::from("com", "expensetui", "ExpenseTUI")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.join("expensetui.db"))
}
