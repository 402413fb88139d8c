#![allow(clippy::unwrap_used)]

use super::app::*;
use super::commands::{find_closest, handle_command, levenshtein};
use crate::db::Database;
use crate::models::{Currency, Field, RecordFields};
use crate::store::Tracker;
use crate::view::{SortDirection, SortField, ViewOutcome};

fn tracker() -> Tracker<Database> {
    Tracker::load(Database::open_in_memory().unwrap()).unwrap()
}

fn seeded() -> (App, Tracker<Database>) {
    let mut t = tracker();
    t.add(&RecordFields::new("Lunch", "1500", "Food", "2024-01-15"))
        .unwrap();
    t.add(&RecordFields::new("Bus pass", "20000", "Transport", "2024-01-03"))
        .unwrap();
    t.add(&RecordFields::new("Coffee", "800", "Food", "2024-01-20"))
        .unwrap();
    let mut app = App::new();
    app.refresh(&t);
    (app, t)
}

fn fill(app: &mut App, description: &str, amount: &str, category: &str, date: &str) {
    app.form.fields = RecordFields::new(description, amount, category, date);
}

// ── Refresh ───────────────────────────────────────────────────

#[test]
fn test_refresh_builds_view_and_summary() {
    let (app, _t) = seeded();
    assert_eq!(app.record_count, 3);
    assert_eq!(app.view.rows.len(), 3);
    assert_eq!(app.summary.top_category.as_deref(), Some("Transport"));
    assert_eq!(app.category_totals[0].0, "Transport");
}

#[test]
fn test_refresh_clamps_cursor() {
    let (mut app, t) = seeded();
    app.record_index = 2;
    app.record_scroll = 2;
    app.query.pattern = "lunch".into();
    app.refresh(&t);
    assert_eq!(app.record_index, 0);
    assert_eq!(app.record_scroll, 0);
}

// ── Record form ───────────────────────────────────────────────

#[test]
fn test_submit_form_adds_record() {
    let mut t = tracker();
    let mut app = App::new();
    app.begin_new();
    fill(&mut app, "Textbook", "12000", "School", "2024-02-01");
    app.submit_form(&mut t);

    assert_eq!(t.list().len(), 1);
    assert_eq!(app.screen, Screen::Dashboard);
    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(app.status_message, "Added: Textbook");
    assert!(app.form.fields.description.is_empty());
    assert_eq!(app.record_count, 1);
}

#[test]
fn test_submit_form_reports_errors_per_field() {
    let mut t = tracker();
    let mut app = App::new();
    app.begin_new();
    fill(&mut app, "gym gym", "12.345", "Food", "2024-02-30");
    app.submit_form(&mut t);

    assert!(t.list().is_empty());
    assert_eq!(app.screen, Screen::Form);
    assert_eq!(app.form.errors.len(), 3);
    assert!(app.form.errors.contains_key(&Field::Description));
    assert!(app.form.errors.contains_key(&Field::Amount));
    assert!(app.form.errors.contains_key(&Field::Date));
    assert!(!app.form.errors.contains_key(&Field::Category));
    // Input is kept so the user can correct it
    assert_eq!(app.form.fields.amount, "12.345");
}

#[test]
fn test_typing_clears_field_error() {
    let mut t = tracker();
    let mut app = App::new();
    app.begin_new();
    fill(&mut app, "", "1", "Food", "2024-01-01");
    app.submit_form(&mut t);
    assert!(app.form.errors.contains_key(&Field::Description));

    app.form.focus = 0;
    app.form.input().push('x');
    assert!(!app.form.errors.contains_key(&Field::Description));
}

#[test]
fn test_form_focus_wraps() {
    let mut form = RecordForm::blank();
    assert_eq!(form.focused(), Field::Description);
    form.move_focus(-1);
    assert_eq!(form.focused(), Field::Date);
    form.move_focus(1);
    form.move_focus(1);
    assert_eq!(form.focused(), Field::Amount);
}

#[test]
fn test_blank_form_defaults_to_today() {
    let form = RecordForm::blank();
    assert_eq!(form.fields.date, crate::store::today());
}

#[test]
fn test_edit_updates_in_place() {
    let (mut app, mut t) = seeded();
    let id = t.list()[0].id.clone();
    assert!(app.begin_edit(&t, &id));
    assert_eq!(app.form.fields.description, "Lunch");
    assert_eq!(app.form.fields.amount, "1500");
    assert_eq!(app.input_mode, InputMode::Editing);

    app.form.fields.amount = "1750.50".into();
    app.submit_form(&mut t);

    assert_eq!(t.list().len(), 3);
    assert_eq!(t.list()[0].id, id);
    assert_eq!(t.list()[0].amount.to_string(), "1750.50");
    assert_eq!(app.status_message, "Updated: Lunch");
    assert!(app.form.editing_id.is_none());
}

#[test]
fn test_edit_command_uses_selected_row() {
    let (mut app, mut t) = seeded();
    app.screen = Screen::Records;
    app.record_index = 1;
    handle_command("edit", &mut app, &mut t).unwrap();
    assert_eq!(app.screen, Screen::Form);
    assert_eq!(app.form.fields.description, "Bus pass");
}

// ── Confirmations ─────────────────────────────────────────────

#[test]
fn test_delete_requires_confirmation() {
    let (mut app, mut t) = seeded();
    app.screen = Screen::Records;
    handle_command("delete", &mut app, &mut t).unwrap();
    assert_eq!(app.input_mode, InputMode::Confirm);
    assert_eq!(t.list().len(), 3);

    app.confirm(&mut t);
    assert_eq!(t.list().len(), 2);
    assert_eq!(app.status_message, "Deleted: Lunch");
    assert_eq!(app.input_mode, InputMode::Normal);
    assert!(app.pending_action.is_none());
}

#[test]
fn test_cancel_keeps_record() {
    let (mut app, mut t) = seeded();
    app.screen = Screen::Records;
    handle_command("delete", &mut app, &mut t).unwrap();
    app.cancel_confirm();
    assert_eq!(t.list().len(), 3);
    assert_eq!(app.status_message, "Cancelled");
}

#[test]
fn test_delete_outside_records_screen() {
    let (mut app, mut t) = seeded();
    handle_command("delete", &mut app, &mut t).unwrap();
    assert!(app.pending_action.is_none());
    assert_eq!(app.status_message, "Navigate to Records first");
}

#[test]
fn test_import_replaces_after_confirm() {
    let (mut app, mut t) = seeded();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("in.json");
    std::fs::write(&path, r#"[{"desc":"Rent","amt":90000,"cat":"Housing","dt":"2024-03-01"}]"#)
        .unwrap();

    handle_command(&format!("import {}", path.display()), &mut app, &mut t).unwrap();
    assert!(matches!(app.pending_action, Some(PendingAction::Import { .. })));
    app.confirm(&mut t);

    assert_eq!(t.list().len(), 1);
    assert_eq!(t.list()[0].description, "Rent");
    assert_eq!(app.record_count, 1);
    assert!(app.status_message.starts_with("Imported 1 records"));
}

#[test]
fn test_bad_import_leaves_store() {
    let (mut app, mut t) = seeded();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, r#"{"a":1}"#).unwrap();

    handle_command(&format!("import {}", path.display()), &mut app, &mut t).unwrap();
    app.confirm(&mut t);

    assert_eq!(t.list().len(), 3);
    assert!(app.status_message.starts_with("Import failed"));
}

#[test]
fn test_import_missing_file() {
    let (mut app, mut t) = seeded();
    handle_command("import /definitely/not/here.json", &mut app, &mut t).unwrap();
    assert!(app.pending_action.is_none());
    assert!(app.status_message.starts_with("File not found"));
}

#[test]
fn test_export_command_writes_file() {
    let (mut app, mut t) = seeded();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.json");
    handle_command(&format!("export {}", path.display()), &mut app, &mut t).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"description\": \"Bus pass\""));
    assert!(app.status_message.starts_with("Exported 3 records"));
}

// ── Settings ──────────────────────────────────────────────────

#[test]
fn test_settings_form_round_trip() {
    let (mut app, mut t) = seeded();
    app.screen = Screen::Settings;
    app.reset_settings_form();
    assert_eq!(app.settings_form.cap, "0");
    assert_eq!(
        app.settings_form.rates.get(&Currency::Usd).map(String::as_str),
        Some("0.00093")
    );

    app.settings_form.cap = "25000".into();
    app.settings_form.currency = app.settings_form.currency.cycle(1);
    app.save_settings(&mut t);

    assert_eq!(t.settings().currency, Currency::Usd);
    assert_eq!(app.settings.currency, Currency::Usd);
    assert_eq!(app.status_message, "Settings saved");
    assert_eq!(app.summary.status, crate::dashboard::CapStatus::Remaining);
    // 25000 - 22300 = 2700 RWF -> USD 2.51
    assert_eq!(
        app.summary.status_message(&app.settings),
        "You have USD 2.51 remaining."
    );
    assert_eq!(app.view.rows[0].amount.text, "1.40");
}

#[test]
fn test_settings_form_fields() {
    let mut form = SettingsForm::from_settings(&crate::models::Settings::default());
    assert_eq!(
        form.fields(),
        vec![
            SettingsField::Cap,
            SettingsField::Currency,
            SettingsField::Rate(Currency::Usd),
            SettingsField::Rate(Currency::Eur),
        ]
    );
    form.move_focus(1);
    assert_eq!(form.focused(), SettingsField::Currency);
    assert!(form.input().is_none());
    form.move_focus(1);
    form.input().unwrap().push('1');
    assert_eq!(form.rates.get(&Currency::Usd).map(String::as_str), Some("0.000931"));
}

#[test]
fn test_reset_settings_after_confirm() {
    let (mut app, mut t) = seeded();
    t.save_settings("100", "EUR", &Default::default()).unwrap();
    handle_command("reset-settings", &mut app, &mut t).unwrap();
    assert_eq!(app.pending_action, Some(PendingAction::ResetSettings));
    app.confirm(&mut t);
    assert_eq!(t.settings().currency, Currency::Rwf);
    assert_eq!(app.settings_form.cap, "0");
}

// ── View commands ─────────────────────────────────────────────

#[test]
fn test_search_command_filters() {
    let (mut app, mut t) = seeded();
    handle_command("search food", &mut app, &mut t).unwrap();
    assert_eq!(app.screen, Screen::Records);
    assert_eq!(app.view.rows.len(), 2);
    assert_eq!(app.status_message, "Searching: food");

    handle_command("search zzz", &mut app, &mut t).unwrap();
    assert_eq!(app.view.outcome, ViewOutcome::NoResults);
}

#[test]
fn test_search_command_invalid_pattern() {
    let (mut app, mut t) = seeded();
    handle_command("search [oops", &mut app, &mut t).unwrap();
    assert_eq!(app.view.rows.len(), 3);
    assert!(app.status_message.starts_with("Invalid pattern"));
}

#[test]
fn test_case_command_toggles() {
    let (mut app, mut t) = seeded();
    handle_command("search food", &mut app, &mut t).unwrap();
    handle_command("case", &mut app, &mut t).unwrap();
    assert!(app.query.case_sensitive);
    assert!(app.view.rows.is_empty());
    handle_command("case", &mut app, &mut t).unwrap();
    assert_eq!(app.view.rows.len(), 2);
}

#[test]
fn test_sort_command_toggles_direction() {
    let (mut app, mut t) = seeded();
    handle_command("sort amount", &mut app, &mut t).unwrap();
    assert_eq!(app.query.sort.field(), Some(SortField::Amount));
    assert_eq!(app.query.sort.direction(), SortDirection::Descending);
    assert_eq!(app.view.rows[0].description.text, "Bus pass");

    handle_command("sort amount", &mut app, &mut t).unwrap();
    assert_eq!(app.query.sort.direction(), SortDirection::Ascending);
    assert_eq!(app.view.rows[0].description.text, "Coffee");

    handle_command("sort none", &mut app, &mut t).unwrap();
    assert_eq!(app.query.sort.field(), None);
    assert_eq!(app.view.rows[0].description.text, "Lunch");
}

#[test]
fn test_sort_command_usage() {
    let (mut app, mut t) = seeded();
    handle_command("sort category", &mut app, &mut t).unwrap();
    assert!(app.status_message.starts_with("Usage"));
}

// ── Command registry ──────────────────────────────────────────

#[test]
fn test_unknown_command_suggests() {
    let (mut app, mut t) = seeded();
    handle_command("serch food", &mut app, &mut t).unwrap();
    assert_eq!(
        app.status_message,
        "Unknown command: :serch. Did you mean :search?"
    );
}

#[test]
fn test_find_closest() {
    assert_eq!(find_closest("expotr"), "export");
    assert_eq!(find_closest("dashbord"), "dashboard");
}

#[test]
fn test_levenshtein() {
    assert_eq!(levenshtein("", "abc"), 3);
    assert_eq!(levenshtein("kitten", "sitting"), 3);
    assert_eq!(levenshtein("same", "same"), 0);
}

#[test]
fn test_quit_command() {
    let (mut app, mut t) = seeded();
    handle_command("q", &mut app, &mut t).unwrap();
    assert!(!app.running);
}
