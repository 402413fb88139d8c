use anyhow::Result;
use std::path::Path;

use crate::config::{Command, SettingsAction};
use crate::dashboard::{category_totals, Summary};
use crate::db::Database;
use crate::error::TrackerError;
use crate::models::{Field, RecordFields, Settings};
use crate::store::{today, RateOverrides, Tracker};
use crate::transfer;
use crate::ui::util::truncate;
use crate::view::{build_view, SortField, SortState, ViewOutcome, ViewQuery};

pub(crate) fn as_cli(command: Command, tracker: &mut Tracker<Database>) -> Result<()> {
    match command {
        Command::Add {
            description,
            amount,
            category,
            date,
        } => {
            let date = date.unwrap_or_else(today);
            let fields = RecordFields::new(&description, &amount, &category, &date);
            let record = tracker.add(&fields).map_err(report)?;
            println!("Added {} ({})", record.id, record.description);
            Ok(())
        }
        Command::Edit {
            id,
            description,
            amount,
            category,
            date,
        } => cli_edit(tracker, &id, description, amount, category, date),
        Command::Delete { id } => {
            let removed = tracker.remove(&id).map_err(report)?;
            println!("Deleted: {}", removed.description);
            Ok(())
        }
        Command::List {
            search,
            case_sensitive,
            sort,
            reverse,
        } => {
            let mut query = ViewQuery {
                pattern: search.unwrap_or_default(),
                case_sensitive,
                sort: SortState::default(),
            };
            if let Some(key) = sort {
                let field = SortField::from(key);
                let direction = if reverse {
                    field.default_direction().toggled()
                } else {
                    field.default_direction()
                };
                query.sort = SortState::new(field, direction);
            }
            cli_list(tracker, &query);
            Ok(())
        }
        Command::Summary => {
            cli_summary(tracker);
            Ok(())
        }
        Command::Settings { action } => cli_settings(tracker, action),
        Command::Import { path } => cli_import(tracker, &path),
        Command::Export { path } => cli_export(tracker, path.as_deref()),
    }
}

/// Print per-field validation failures before handing the error back to `main`.
fn report(err: TrackerError) -> anyhow::Error {
    if let TrackerError::Validation(v) = &err {
        for field in Field::all() {
            if let Some(reason) = v.reason_for(*field) {
                eprintln!("  {:<12} {reason}", format!("{field}:"));
            }
        }
    }
    anyhow::Error::new(err)
}

fn cli_edit(
    tracker: &mut Tracker<Database>,
    id: &str,
    description: Option<String>,
    amount: Option<String>,
    category: Option<String>,
    date: Option<String>,
) -> Result<()> {
    let existing = tracker
        .get(id)
        .ok_or_else(|| anyhow::anyhow!("No record with id '{id}'"))?;
    let mut fields = RecordFields::from_record(existing);
    if let Some(v) = description {
        fields.description = v;
    }
    if let Some(v) = amount {
        fields.amount = v;
    }
    if let Some(v) = category {
        fields.category = v;
    }
    if let Some(v) = date {
        fields.date = v;
    }
    let record = tracker.update(id, &fields).map_err(report)?;
    println!("Updated {} ({})", record.id, record.description);
    Ok(())
}

fn cli_list(tracker: &Tracker<Database>, query: &ViewQuery) {
    let settings = tracker.settings();
    let view = build_view(tracker.list(), query, settings);
    if view.invalid_pattern {
        eprintln!("Warning: invalid search pattern ignored: {}", query.pattern);
    }
    match view.outcome {
        ViewOutcome::EmptyStore => {
            println!("No records yet");
            return;
        }
        ViewOutcome::NoResults => {
            println!("No records match '{}'", query.pattern);
            return;
        }
        ViewOutcome::Rows => {}
    }

    println!(
        "{:<36}  {:<10}  {:<28}  {:<16}  {:>14}",
        "ID", "Date", "Description", "Category", settings.currency.as_str()
    );
    println!("{}", "─".repeat(112));
    for row in &view.rows {
        println!(
            "{:<36}  {:<10}  {:<28}  {:<16}  {:>14}",
            row.id,
            row.date.text,
            truncate(&row.description.text, 28),
            truncate(&row.category.text, 16),
            row.amount.text,
        );
    }
    println!("{} of {} records", view.rows.len(), tracker.list().len());
}

fn cli_summary(tracker: &Tracker<Database>) {
    let settings = tracker.settings();
    let summary = Summary::compute(tracker.list(), settings);

    println!("FinTrack summary");
    println!("{}", "─".repeat(40));
    println!("  Records:       {}", summary.count);
    println!("  Total spent:   {}", settings.format_money(summary.total));
    println!("  Top category:  {}", summary.top_category_label());
    if settings.cap.is_zero() {
        println!("  Cap:           none");
    } else {
        println!("  Cap:           {}", settings.format_money(settings.cap));
    }
    println!("  {}", summary.status_message(settings));

    let totals = category_totals(tracker.list());
    if !totals.is_empty() {
        println!();
        println!("Spending by Category:");
        for (name, amount) in &totals {
            println!("  {name:<24} {}", settings.format_money(*amount));
        }
    }
}

fn cli_settings(tracker: &mut Tracker<Database>, action: SettingsAction) -> Result<()> {
    match action {
        SettingsAction::Show => {}
        SettingsAction::Set {
            cap,
            currency,
            rates,
        } => {
            let current = tracker.settings();
            let cap = cap.unwrap_or_else(|| current.cap.normalize().to_string());
            let currency = currency.unwrap_or_else(|| current.currency.to_string());
            let overrides: RateOverrides = rates.into_iter().collect();
            tracker.save_settings(&cap, &currency, &overrides)?;
            println!("Settings saved");
        }
        SettingsAction::Reset => {
            tracker.reset_settings()?;
            println!("Settings reset to defaults");
        }
    }
    print_settings(tracker.settings());
    Ok(())
}

fn print_settings(settings: &Settings) {
    let cap = if settings.cap.is_zero() {
        "none".to_string()
    } else {
        format!("{}", settings.cap.normalize())
    };
    println!("  Cap:       {cap} (base currency)");
    println!("  Currency:  {}", settings.currency);
    println!("  Rates:");
    for (code, rate) in settings.rates() {
        println!("    {code}  {}", rate.normalize());
    }
}

fn cli_import(tracker: &mut Tracker<Database>, path: &Path) -> Result<()> {
    let text = transfer::read_import(path)?;
    let previous = tracker.list().len();
    let count = tracker.import_json(&text)?;
    println!("Imported {count} records (replaced {previous})");
    Ok(())
}

fn cli_export(tracker: &Tracker<Database>, path: Option<&str>) -> Result<()> {
    let output_path = path.map(shellexpand).unwrap_or_else(|| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/fintrack-records.json")
    });

    transfer::write_export(Path::new(&output_path), tracker.list())?;
    println!("Exported {} records to {output_path}", tracker.list().len());
    Ok(())
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}
