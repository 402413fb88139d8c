use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

use crate::db::Database;
use crate::store::Tracker;
use crate::ui::app::{App, InputMode, Screen, SettingsField};
use crate::ui::commands;
use crate::ui::util::{scroll_down, scroll_to_bottom, scroll_to_top, scroll_up};
use crate::view::SortField;

pub(crate) fn as_tui(tracker: &mut Tracker<Database>) -> Result<()> {
    let mut app = App::new();
    app.refresh(tracker);
    app.reset_settings_form();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    tracing::info!("tui started");

    let result = run_app(&mut terminal, &mut app, tracker);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        tracing::error!("tui exited with error: {e:#}");
        eprintln!("Error: {e:?}");
    }

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    tracker: &mut Tracker<Database>,
) -> Result<()> {
    while app.running {
        terminal.draw(|f| {
            // 1 tab + 1 status + 1 cmd + 2 borders + 1 header
            let content_height = f.area().height.saturating_sub(6) as usize;
            app.visible_rows = content_height.max(1);
            crate::ui::render::render(f, app);
        })?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if app.show_help {
                app.show_help = false;
                continue;
            }
            match app.input_mode {
                InputMode::Normal => handle_normal_input(key, app, tracker)?,
                InputMode::Command => handle_command_input(key, app, tracker)?,
                InputMode::Search => handle_search_input(key, app, tracker),
                InputMode::Editing => handle_editing_input(key, app, tracker),
                InputMode::Confirm => handle_confirm_input(key, app, tracker),
            }
        }
    }
    Ok(())
}

// ── Input handlers ───────────────────────────────────────────

fn handle_normal_input(key: KeyEvent, app: &mut App, tracker: &mut Tracker<Database>) -> Result<()> {
    match key.code {
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Command;
            app.command_input.clear();
        }
        KeyCode::Char('/') => {
            app.input_mode = InputMode::Search;
            app.query.pattern.clear();
            app.screen = Screen::Records;
            reset_cursor(app);
            app.refresh(tracker);
        }
        KeyCode::Char('q') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.running = false;
        }
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            for _ in 0..app.visible_rows / 2 {
                handle_move_down(app);
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            for _ in 0..app.visible_rows / 2 {
                handle_move_up(app);
            }
        }
        KeyCode::Char('j') | KeyCode::Down => handle_move_down(app),
        KeyCode::Char('k') | KeyCode::Up => handle_move_up(app),
        KeyCode::Char('g') => scroll_to_top(&mut app.record_index, &mut app.record_scroll),
        KeyCode::Char('G') => scroll_to_bottom(
            &mut app.record_index,
            &mut app.record_scroll,
            app.view.rows.len(),
            app.visible_rows.max(1),
        ),
        KeyCode::Char('1') => switch_screen(app, tracker, Screen::Dashboard),
        KeyCode::Char('2') => switch_screen(app, tracker, Screen::Records),
        KeyCode::Char('3') => switch_screen(app, tracker, Screen::Form),
        KeyCode::Char('4') => switch_screen(app, tracker, Screen::Settings),
        KeyCode::Tab => cycle_screen(app, tracker, 1),
        KeyCode::BackTab => cycle_screen(app, tracker, -1),
        KeyCode::Char('?') => {
            app.show_help = true;
        }
        KeyCode::Esc => handle_escape(app, tracker),
        KeyCode::Enter | KeyCode::Char('i') => match app.screen {
            Screen::Form | Screen::Settings => {
                app.input_mode = InputMode::Editing;
                app.status_message.clear();
            }
            Screen::Records => commands::handle_command("edit", app, tracker)?,
            Screen::Dashboard => {}
        },
        KeyCode::Char(c) if app.screen == Screen::Records => match c {
            't' => sort_by(app, tracker, SortField::Date),
            'n' => sort_by(app, tracker, SortField::Description),
            'a' => sort_by(app, tracker, SortField::Amount),
            'c' => commands::handle_command("case", app, tracker)?,
            'e' => commands::handle_command("edit", app, tracker)?,
            'D' => commands::handle_command("delete", app, tracker)?,
            _ => {}
        },
        _ => {}
    }
    Ok(())
}

fn handle_command_input(
    key: KeyEvent,
    app: &mut App,
    tracker: &mut Tracker<Database>,
) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let input = app.command_input.clone();
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
            commands::handle_command(&input, app, tracker)?;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
        }
        KeyCode::Backspace => {
            app.command_input.pop();
            if app.command_input.is_empty() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
    Ok(())
}

fn handle_search_input(key: KeyEvent, app: &mut App, tracker: &mut Tracker<Database>) {
    match key.code {
        KeyCode::Enter => {
            app.input_mode = InputMode::Normal;
            if app.view.invalid_pattern {
                app.set_status(format!("Invalid pattern, showing all: {}", app.query.pattern));
            }
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.query.pattern.clear();
            app.refresh(tracker);
        }
        KeyCode::Backspace => {
            app.query.pattern.pop();
            // Live search: filter as you type
            reset_cursor(app);
            app.refresh(tracker);
        }
        KeyCode::Char(c) => {
            app.query.pattern.push(c);
            reset_cursor(app);
            app.refresh(tracker);
        }
        _ => {}
    }
}

fn handle_editing_input(key: KeyEvent, app: &mut App, tracker: &mut Tracker<Database>) {
    match app.screen {
        Screen::Form => handle_form_input(key, app, tracker),
        Screen::Settings => handle_settings_input(key, app, tracker),
        Screen::Dashboard | Screen::Records => app.input_mode = InputMode::Normal,
    }
}

fn handle_form_input(key: KeyEvent, app: &mut App, tracker: &mut Tracker<Database>) {
    match key.code {
        KeyCode::Tab | KeyCode::Down => app.form.move_focus(1),
        KeyCode::BackTab | KeyCode::Up => app.form.move_focus(-1),
        KeyCode::Enter => app.submit_form(tracker),
        KeyCode::Esc => {
            app.clear_form();
            app.input_mode = InputMode::Normal;
            app.set_status("Form cleared");
        }
        KeyCode::Backspace => {
            app.form.input().pop();
        }
        KeyCode::Char(c) => app.form.input().push(c),
        _ => {}
    }
}

fn handle_settings_input(key: KeyEvent, app: &mut App, tracker: &mut Tracker<Database>) {
    let on_currency = app.settings_form.focused() == SettingsField::Currency;
    match key.code {
        KeyCode::Tab | KeyCode::Down => app.settings_form.move_focus(1),
        KeyCode::BackTab | KeyCode::Up => app.settings_form.move_focus(-1),
        KeyCode::Enter => app.save_settings(tracker),
        KeyCode::Esc => {
            app.reset_settings_form();
            app.input_mode = InputMode::Normal;
            app.set_status("Changes discarded");
        }
        KeyCode::Char('+' | '=') | KeyCode::Right if on_currency => {
            app.settings_form.currency = app.settings_form.currency.cycle(1);
        }
        KeyCode::Char('-') | KeyCode::Left if on_currency => {
            app.settings_form.currency = app.settings_form.currency.cycle(-1);
        }
        KeyCode::Backspace => {
            if let Some(input) = app.settings_form.input() {
                input.pop();
            }
        }
        KeyCode::Char(c) => {
            if let Some(input) = app.settings_form.input() {
                input.push(c);
            }
        }
        _ => {}
    }
}

fn handle_confirm_input(key: KeyEvent, app: &mut App, tracker: &mut Tracker<Database>) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm(tracker),
        // Any other key = cancel
        _ => app.cancel_confirm(),
    }
}

// ── Navigation helpers ───────────────────────────────────────

fn switch_screen(app: &mut App, tracker: &Tracker<Database>, screen: Screen) {
    app.screen = screen;
    match screen {
        Screen::Dashboard | Screen::Records => app.refresh(tracker),
        Screen::Settings => app.reset_settings_form(),
        Screen::Form => {}
    }
}

fn cycle_screen(app: &mut App, tracker: &Tracker<Database>, delta: i32) {
    let screens = Screen::all();
    let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0) as i32;
    let next = (idx + delta).rem_euclid(screens.len() as i32) as usize;
    switch_screen(app, tracker, screens[next]);
}

fn sort_by(app: &mut App, tracker: &Tracker<Database>, field: SortField) {
    commands::select_sort(app, field);
    app.refresh(tracker);
}

fn reset_cursor(app: &mut App) {
    app.record_index = 0;
    app.record_scroll = 0;
}

fn handle_move_down(app: &mut App) {
    if app.screen == Screen::Records {
        let page = app.visible_rows.max(1);
        scroll_down(
            &mut app.record_index,
            &mut app.record_scroll,
            app.view.rows.len(),
            page,
        );
    }
}

fn handle_move_up(app: &mut App) {
    if app.screen == Screen::Records {
        scroll_up(&mut app.record_index, &mut app.record_scroll);
    }
}

fn handle_escape(app: &mut App, tracker: &Tracker<Database>) {
    app.status_message.clear();
    if app.screen == Screen::Records && !app.query.pattern.is_empty() {
        app.query.pattern.clear();
        app.refresh(tracker);
    }
}
