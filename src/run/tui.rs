use anyhow::Result;
use chrono::NaiveDate;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};

use crate::db::Database;
use crate::ui::app::{App, InputMode, PendingAction, Screen};
use crate::ui::commands;
use crate::ui::util::{scroll_down, scroll_to_bottom, scroll_to_top, scroll_up};

/// Rows taken by the tab, status and command bars plus table chrome.
const CHROME_ROWS: u16 = 6;

type Term = Terminal<CrosstermBackend<Stdout>>;

/// Raw mode and the alternate screen for as long as it lives.
struct TerminalSession {
    terminal: Term,
}

impl TerminalSession {
    fn start() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

pub(crate) fn as_tui(db: &mut Database, today: NaiveDate) -> Result<()> {
    let mut app = App::new(today);
    app.refresh(db)?;
    tracing::info!(expenses = app.expenses.len(), %today, "starting TUI");

    let result = {
        let mut session = TerminalSession::start()?;
        event_loop(&mut session.terminal, &mut app, db)
    };

    if let Err(e) = &result {
        tracing::error!(error = %format!("{e:#}"), "TUI exited with error");
    }
    result
}

fn event_loop(terminal: &mut Term, app: &mut App, db: &mut Database) -> Result<()> {
    while app.running {
        terminal.draw(|f| {
            app.visible_rows = f.area().height.saturating_sub(CHROME_ROWS).max(1) as usize;
            crate::ui::render::render(f, app);
        })?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        if app.show_help {
            app.show_help = false;
            continue;
        }
        match app.input_mode {
            InputMode::Normal => on_normal_key(key, app, db)?,
            InputMode::Command => on_command_key(key, app, db)?,
            InputMode::Confirm => on_confirm_key(key, app, db)?,
        }
    }
    Ok(())
}

// ── Key handling ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
enum Motion {
    Down(usize),
    Up(usize),
    Top,
    Bottom,
}

fn on_normal_key(key: KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let half_page = (app.visible_rows / 2).max(1);

    match (key.code, ctrl) {
        (KeyCode::Char('q'), true) => app.running = false,
        (KeyCode::Char('d'), true) => apply_motion(app, Motion::Down(half_page)),
        (KeyCode::Char('u'), true) => apply_motion(app, Motion::Up(half_page)),
        (KeyCode::Char(':'), _) => {
            app.input_mode = InputMode::Command;
            app.command_input.clear();
        }
        (KeyCode::Char('j') | KeyCode::Down, _) => apply_motion(app, Motion::Down(1)),
        (KeyCode::Char('k') | KeyCode::Up, _) => apply_motion(app, Motion::Up(1)),
        (KeyCode::Char('g') | KeyCode::Home, _) => apply_motion(app, Motion::Top),
        (KeyCode::Char('G') | KeyCode::End, _) => apply_motion(app, Motion::Bottom),
        (KeyCode::Char(c @ '1'..='3'), _) => {
            let index = c as usize - '1' as usize;
            if let Some(screen) = Screen::all().get(index) {
                show_screen(app, db, *screen)?;
            }
        }
        (KeyCode::Tab, _) => step_screen(app, db, 1)?,
        (KeyCode::BackTab, _) => step_screen(app, db, -1)?,
        (KeyCode::Char('?'), _) => app.show_help = true,
        (KeyCode::Char('v'), _) => commands::handle_command("view", app, db)?,
        (KeyCode::Char('H'), _) => commands::handle_command("prev-month", app, db)?,
        (KeyCode::Char('L'), _) => commands::handle_command("next-month", app, db)?,
        (KeyCode::Char('n'), _) if app.screen == Screen::Dashboard => cycle_slice(app, 1),
        (KeyCode::Char('p'), _) if app.screen == Screen::Dashboard => cycle_slice(app, -1),
        (KeyCode::Char('D'), _) => match app.screen {
            Screen::Expenses => commands::handle_command("delete", app, db)?,
            Screen::Budgets => commands::handle_command("delete-budget", app, db)?,
            Screen::Dashboard => {}
        },
        (KeyCode::Esc, _) => app.status_message.clear(),
        _ => {}
    }
    Ok(())
}

fn on_command_key(key: KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let input = std::mem::take(&mut app.command_input);
            app.input_mode = InputMode::Normal;
            commands::handle_command(&input, app, db)?;
        }
        KeyCode::Esc => {
            app.command_input.clear();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => {
            app.command_input.pop();
            if app.command_input.is_empty() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char(c) => app.command_input.push(c),
        _ => {}
    }
    Ok(())
}

fn on_confirm_key(key: KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    let action = app.pending_action.take();
    app.input_mode = InputMode::Normal;
    app.confirm_message.clear();

    match (key.code, action) {
        (KeyCode::Char('y' | 'Y'), Some(action)) => run_pending(action, app, db),
        _ => {
            app.set_status("Cancelled");
            Ok(())
        }
    }
}

fn run_pending(action: PendingAction, app: &mut App, db: &mut Database) -> Result<()> {
    let message = match action {
        PendingAction::DeleteExpense { id, label } => {
            db.delete_expense(id)?;
            format!("Deleted: {label}")
        }
        PendingAction::DeleteCategoryBudget { category } => {
            let mut budget = app.budget.clone();
            budget.remove_category(&category);
            db.save_budget(&budget)?;
            format!("Deleted budget: {category}")
        }
    };
    app.refresh(db)?;
    app.set_status(message);
    Ok(())
}

// ── Navigation ───────────────────────────────────────────────

fn show_screen(app: &mut App, db: &mut Database, screen: Screen) -> Result<()> {
    app.screen = screen;
    app.refresh(db)
}

fn step_screen(app: &mut App, db: &mut Database, delta: isize) -> Result<()> {
    let screens = Screen::all();
    let current = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
    let next = (current as isize + delta).rem_euclid(screens.len() as isize) as usize;
    show_screen(app, db, screens[next])
}

fn cycle_slice(app: &mut App, delta: isize) {
    let len = app.category_totals.len();
    if len == 0 {
        return;
    }
    app.slice_index = (app.slice_index as isize + delta).rem_euclid(len as isize) as usize;
    let name = &app.category_totals[app.slice_index].category;
    app.set_status(format!("Selected: {name}"));
}

/// Move the cursor of whatever list the current screen shows.
fn apply_motion(app: &mut App, motion: Motion) {
    match app.screen {
        Screen::Expenses => {
            let (index, scroll) = (&mut app.expense_index, &mut app.expense_scroll);
            let (len, page) = (app.filtered.len(), app.visible_rows.max(1));
            match motion {
                Motion::Down(n) => {
                    for _ in 0..n {
                        scroll_down(index, scroll, len, page);
                    }
                }
                Motion::Up(n) => {
                    for _ in 0..n {
                        scroll_up(index, scroll);
                    }
                }
                Motion::Top => scroll_to_top(index, scroll),
                Motion::Bottom => scroll_to_bottom(index, scroll, len, page),
            }
        }
        Screen::Budgets => {
            let last = app.budget.categories.len().saturating_sub(1);
            app.budget_index = moved(app.budget_index, last, motion);
        }
        Screen::Dashboard => {
            let last = app.category_totals.len().saturating_sub(1);
            app.slice_index = moved(app.slice_index, last, motion);
        }
    }
}

fn moved(index: usize, last: usize, motion: Motion) -> usize {
    match motion {
        Motion::Down(n) => index.saturating_add(n).min(last),
        Motion::Up(n) => index.saturating_sub(n),
        Motion::Top => 0,
        Motion::Bottom => last,
    }
}
