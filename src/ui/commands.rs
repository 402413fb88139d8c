use std::collections::HashMap;
use std::sync::LazyLock;

use super::app::{App, PendingAction, Screen};
use crate::db::Database;
use crate::store::Tracker;
use crate::view::SortField;

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &mut Tracker<Database>) -> anyhow::Result<()>,
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

    register_command!("q", "Quit FinTrack", cmd_quit, r);
    register_command!("quit", "Quit FinTrack", cmd_quit, r);
    register_command!("d", "Go to Dashboard", cmd_dashboard, r);
    register_command!("dashboard", "Go to Dashboard", cmd_dashboard, r);
    register_command!("r", "Go to Records", cmd_records, r);
    register_command!("records", "Go to Records", cmd_records, r);
    register_command!("f", "Go to the record form", cmd_form, r);
    register_command!("form", "Go to the record form", cmd_form, r);
    register_command!("s", "Go to Settings", cmd_settings, r);
    register_command!("settings", "Go to Settings", cmd_settings, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!(
        "import",
        "Replace all records from JSON (e.g. :import ~/records.json)",
        cmd_import,
        r
    );
    register_command!(
        "export",
        "Export records to JSON (e.g. :export ~/records.json)",
        cmd_export,
        r
    );
    register_command!(
        "search",
        "Filter records by regex (e.g. :search coffee|tea)",
        cmd_search,
        r
    );
    register_command!(
        "sort",
        "Sort records (e.g. :sort amount, :sort none)",
        cmd_sort,
        r
    );
    register_command!("case", "Toggle case-sensitive search", cmd_case, r);
    register_command!("delete", "Delete selected record", cmd_delete, r);
    register_command!("edit", "Edit selected record", cmd_edit, r);
    register_command!("new", "Start a new record", cmd_new, r);
    register_command!(
        "reset-settings",
        "Restore default cap, currency and rates",
        cmd_reset_settings,
        r
    );

    r
});

pub(crate) fn handle_command(
    input: &str,
    app: &mut App,
    tracker: &mut Tracker<Database>,
) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        (cmd.run)(args, app, tracker)?;
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

pub(crate) fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| (levenshtein(input, k), **k))
        .unwrap_or(&"help")
        .to_string()
}

pub(crate) fn levenshtein(a: &str, b: &str) -> usize {
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

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _tracker: &mut Tracker<Database>) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_dashboard(
    _args: &str,
    app: &mut App,
    tracker: &mut Tracker<Database>,
) -> anyhow::Result<()> {
    app.screen = Screen::Dashboard;
    app.refresh(tracker);
    Ok(())
}

fn cmd_records(_args: &str, app: &mut App, tracker: &mut Tracker<Database>) -> anyhow::Result<()> {
    app.screen = Screen::Records;
    app.refresh(tracker);
    Ok(())
}

fn cmd_form(_args: &str, app: &mut App, _tracker: &mut Tracker<Database>) -> anyhow::Result<()> {
    app.screen = Screen::Form;
    Ok(())
}

fn cmd_settings(
    _args: &str,
    app: &mut App,
    _tracker: &mut Tracker<Database>,
) -> anyhow::Result<()> {
    app.screen = Screen::Settings;
    app.reset_settings_form();
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App, _tracker: &mut Tracker<Database>) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_import(args: &str, app: &mut App, _tracker: &mut Tracker<Database>) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :import <file.json>");
        return Ok(());
    }
    let path = crate::run::shellexpand(args);
    if !std::path::Path::new(&path).exists() {
        app.set_status(format!("File not found: {path}"));
        return Ok(());
    }
    app.ask(
        format!("Replace all {} records with {path}?", app.record_count),
        PendingAction::Import { path },
    );
    Ok(())
}

fn cmd_export(args: &str, app: &mut App, tracker: &mut Tracker<Database>) -> anyhow::Result<()> {
    let output_path = if args.is_empty() {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/fintrack-records.json")
    } else {
        crate::run::shellexpand(args)
    };

    match crate::transfer::write_export(std::path::Path::new(&output_path), tracker.list()) {
        Ok(()) => app.set_status(format!(
            "Exported {} records to {output_path}",
            tracker.list().len()
        )),
        Err(e) => app.set_status(format!("Export failed: {e:#}")),
    }
    Ok(())
}

fn cmd_search(args: &str, app: &mut App, tracker: &mut Tracker<Database>) -> anyhow::Result<()> {
    app.query.pattern = args.to_string();
    app.screen = Screen::Records;
    app.record_index = 0;
    app.record_scroll = 0;
    app.refresh(tracker);

    if args.is_empty() {
        app.set_status("Search cleared");
    } else if app.view.invalid_pattern {
        app.set_status(format!("Invalid pattern, showing all: {args}"));
    } else {
        app.set_status(format!("Searching: {args}"));
    }

    Ok(())
}

fn cmd_sort(args: &str, app: &mut App, tracker: &mut Tracker<Database>) -> anyhow::Result<()> {
    if args.eq_ignore_ascii_case("none") {
        app.query.sort.clear();
        app.set_status("Sort cleared");
    } else if let Some(field) = SortField::parse(args) {
        select_sort(app, field);
    } else {
        app.set_status("Usage: :sort <date|description|amount|none>");
        return Ok(());
    }
    app.screen = Screen::Records;
    app.refresh(tracker);
    Ok(())
}

/// Apply a sort selection and report the resulting direction.
pub(crate) fn select_sort(app: &mut App, field: SortField) {
    app.query.sort.select(field);
    let arrow = app.query.sort.direction().arrow();
    app.set_status(format!("Sorted by {field} {arrow}"));
}

fn cmd_case(_args: &str, app: &mut App, tracker: &mut Tracker<Database>) -> anyhow::Result<()> {
    app.query.case_sensitive = !app.query.case_sensitive;
    app.refresh(tracker);
    let state = if app.query.case_sensitive {
        "on"
    } else {
        "off"
    };
    app.set_status(format!("Case-sensitive search: {state}"));
    Ok(())
}

fn cmd_delete(_args: &str, app: &mut App, _tracker: &mut Tracker<Database>) -> anyhow::Result<()> {
    if app.screen != Screen::Records {
        app.set_status("Navigate to Records first");
        return Ok(());
    }
    let Some(row) = app.selected_row() else {
        app.set_status("No record selected");
        return Ok(());
    };
    let id = row.id.clone();
    let description = row.description.text.clone();
    app.ask(
        format!("Delete '{description}'?"),
        PendingAction::DeleteRecord { id, description },
    );
    Ok(())
}

fn cmd_edit(_args: &str, app: &mut App, tracker: &mut Tracker<Database>) -> anyhow::Result<()> {
    let Some(id) = app.selected_row().map(|r| r.id.clone()) else {
        app.set_status("No record selected");
        return Ok(());
    };
    app.begin_edit(tracker, &id);
    Ok(())
}

fn cmd_new(_args: &str, app: &mut App, _tracker: &mut Tracker<Database>) -> anyhow::Result<()> {
    app.begin_new();
    Ok(())
}

fn cmd_reset_settings(
    _args: &str,
    app: &mut App,
    _tracker: &mut Tracker<Database>,
) -> anyhow::Result<()> {
    app.ask(
        "Reset cap, currency and rates to defaults?",
        PendingAction::ResetSettings,
    );
    Ok(())
}
