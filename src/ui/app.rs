use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::dashboard::{category_totals, Summary};
use crate::db::BlobStore;
use crate::error::TrackerError;
use crate::models::{Currency, Field, RecordFields, Settings};
use crate::store::{today, RateOverrides, Tracker};
use crate::view::{build_view, View, ViewOutcome, ViewQuery, ViewRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Dashboard,
    Records,
    Form,
    Settings,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[Self::Dashboard, Self::Records, Self::Form, Self::Settings]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dashboard => write!(f, "Dashboard"),
            Self::Records => write!(f, "Records"),
            Self::Form => write!(f, "Form"),
            Self::Settings => write!(f, "Settings"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Search,
    /// Typing into the record form or the settings form.
    Editing,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Search => write!(f, "SEARCH"),
            Self::Editing => write!(f, "EDIT"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

/// Pending action that requires user confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PendingAction {
    DeleteRecord { id: String, description: String },
    Import { path: String },
    ResetSettings,
}

/// The add/edit record form.
#[derive(Debug, Clone, Default)]
pub(crate) struct RecordForm {
    pub(crate) fields: RecordFields,
    pub(crate) focus: usize,
    pub(crate) errors: HashMap<Field, &'static str>,
    /// Set when the form edits an existing record.
    pub(crate) editing_id: Option<String>,
}

impl RecordForm {
    pub(crate) fn blank() -> Self {
        Self {
            fields: RecordFields {
                date: today(),
                ..RecordFields::default()
            },
            ..Self::default()
        }
    }

    pub(crate) fn focused(&self) -> Field {
        Field::all()[self.focus % Field::all().len()]
    }

    pub(crate) fn move_focus(&mut self, delta: i32) {
        self.focus = cycle_index(self.focus, delta, Field::all().len());
    }

    pub(crate) fn input(&mut self) -> &mut String {
        let field = self.focused();
        self.errors.remove(&field);
        self.fields.get_mut(field)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SettingsField {
    Cap,
    Currency,
    Rate(Currency),
}

/// The settings panel. Rates are typed as text and parsed on save.
#[derive(Debug, Clone)]
pub(crate) struct SettingsForm {
    pub(crate) cap: String,
    pub(crate) currency: Currency,
    pub(crate) rates: RateOverrides,
    pub(crate) focus: usize,
}

impl SettingsForm {
    pub(crate) fn from_settings(settings: &Settings) -> Self {
        Self {
            cap: settings.cap.normalize().to_string(),
            currency: settings.currency,
            rates: Currency::all()
                .iter()
                .filter(|c| !c.is_base())
                .map(|c| (*c, settings.rate(*c).normalize().to_string()))
                .collect(),
            focus: 0,
        }
    }

    pub(crate) fn fields(&self) -> Vec<SettingsField> {
        let mut fields = vec![SettingsField::Cap, SettingsField::Currency];
        fields.extend(self.rates.keys().map(|c| SettingsField::Rate(*c)));
        fields
    }

    pub(crate) fn focused(&self) -> SettingsField {
        let fields = self.fields();
        fields[self.focus % fields.len()]
    }

    pub(crate) fn move_focus(&mut self, delta: i32) {
        self.focus = cycle_index(self.focus, delta, self.fields().len());
    }

    /// Text input for the focused field. The currency field is not typed into.
    pub(crate) fn input(&mut self) -> Option<&mut String> {
        match self.focused() {
            SettingsField::Cap => Some(&mut self.cap),
            SettingsField::Currency => None,
            SettingsField::Rate(c) => self.rates.get_mut(&c),
        }
    }
}

fn cycle_index(idx: usize, delta: i32, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (idx as i64 + delta as i64).rem_euclid(len as i64) as usize
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,

    // Snapshot of the store, rebuilt by `refresh`
    pub(crate) settings: Settings,
    pub(crate) summary: Summary,
    pub(crate) category_totals: Vec<(String, Decimal)>,
    pub(crate) record_count: usize,

    // Records
    pub(crate) query: ViewQuery,
    pub(crate) view: View,
    pub(crate) record_index: usize,
    pub(crate) record_scroll: usize,

    // Forms
    pub(crate) form: RecordForm,
    pub(crate) settings_form: SettingsForm,

    // Confirmation
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new() -> Self {
        let settings = Settings::default();
        Self {
            running: true,
            screen: Screen::Dashboard,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            status_message: String::new(),
            show_help: false,

            summary: Summary::compute(&[], &settings),
            category_totals: Vec::new(),
            record_count: 0,
            settings_form: SettingsForm::from_settings(&settings),
            settings,

            query: ViewQuery::default(),
            view: View {
                rows: Vec::new(),
                outcome: ViewOutcome::EmptyStore,
                invalid_pattern: false,
            },
            record_index: 0,
            record_scroll: 0,

            form: RecordForm::blank(),

            pending_action: None,
            confirm_message: String::new(),

            visible_rows: 20,
        }
    }

    /// Recompute the view and dashboard after any store mutation or query change.
    pub(crate) fn refresh<S: BlobStore>(&mut self, tracker: &Tracker<S>) {
        let records = tracker.list();
        self.settings = tracker.settings().clone();
        self.summary = Summary::compute(records, &self.settings);
        self.category_totals = category_totals(records)
            .into_iter()
            .map(|(name, total)| (name.to_string(), total))
            .collect();
        self.category_totals.sort_by(|a, b| b.1.cmp(&a.1));
        self.record_count = records.len();
        self.view = build_view(records, &self.query, &self.settings);

        if self.record_index >= self.view.rows.len() {
            self.record_index = self.view.rows.len().saturating_sub(1);
        }
        if self.record_scroll > self.record_index {
            self.record_scroll = self.record_index;
        }
    }

    pub(crate) fn selected_row(&self) -> Option<&ViewRow> {
        self.view.rows.get(self.record_index)
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    // ── Record form ──────────────────────────────────────────

    /// Open the form, pre-filled from the record with `id`.
    pub(crate) fn begin_edit<S: BlobStore>(&mut self, tracker: &Tracker<S>, id: &str) -> bool {
        let Some(record) = tracker.get(id) else {
            self.set_status(format!("No record with id '{id}'"));
            return false;
        };
        self.form = RecordForm {
            fields: RecordFields::from_record(record),
            editing_id: Some(record.id.clone()),
            ..RecordForm::default()
        };
        self.screen = Screen::Form;
        self.input_mode = InputMode::Editing;
        self.set_status(format!("Editing: {}", record.description));
        true
    }

    pub(crate) fn begin_new(&mut self) {
        self.form = RecordForm::blank();
        self.screen = Screen::Form;
        self.input_mode = InputMode::Editing;
    }

    pub(crate) fn clear_form(&mut self) {
        self.form = RecordForm::blank();
    }

    /// Save the form as a new record or an update. Errors stay on the form.
    pub(crate) fn submit_form<S: BlobStore>(&mut self, tracker: &mut Tracker<S>) {
        let result = match &self.form.editing_id {
            Some(id) => tracker.update(id, &self.form.fields),
            None => tracker.add(&self.form.fields),
        };
        let updating = self.form.editing_id.is_some();
        match result {
            Ok(record) => {
                self.clear_form();
                self.screen = Screen::Dashboard;
                self.input_mode = InputMode::Normal;
                let verb = if updating { "Updated" } else { "Added" };
                self.set_status(format!("{verb}: {}", record.description));
            }
            Err(TrackerError::Validation(e)) => {
                self.form.errors = e.failures.iter().map(|f| (f.field, f.reason)).collect();
                self.set_status("Fix the highlighted fields");
            }
            Err(TrackerError::NotFound(id)) => {
                self.form.editing_id = None;
                self.set_status(format!("Record {id} no longer exists; saving will add it"));
            }
            Err(e) => self.set_status(format!("Error: {e}")),
        }
        self.refresh(tracker);
    }

    // ── Settings ─────────────────────────────────────────────

    pub(crate) fn reset_settings_form(&mut self) {
        self.settings_form = SettingsForm::from_settings(&self.settings);
    }

    pub(crate) fn save_settings<S: BlobStore>(&mut self, tracker: &mut Tracker<S>) {
        let form = &self.settings_form;
        match tracker.save_settings(&form.cap, form.currency.as_str(), &form.rates) {
            Ok(_) => self.set_status("Settings saved"),
            Err(e) => self.set_status(format!("Error: {e}")),
        }
        self.refresh(tracker);
        self.reset_settings_form();
        self.input_mode = InputMode::Normal;
    }

    // ── Confirmation ─────────────────────────────────────────

    pub(crate) fn ask(&mut self, message: impl Into<String>, action: PendingAction) {
        self.confirm_message = message.into();
        self.pending_action = Some(action);
        self.input_mode = InputMode::Confirm;
    }

    /// Run the pending action after the user answered yes.
    pub(crate) fn confirm<S: BlobStore>(&mut self, tracker: &mut Tracker<S>) {
        let Some(action) = self.pending_action.take() else {
            return;
        };
        match action {
            PendingAction::DeleteRecord { id, description } => match tracker.remove(&id) {
                Ok(_) => self.set_status(format!("Deleted: {description}")),
                Err(e) => self.set_status(format!("Error: {e}")),
            },
            PendingAction::Import { path } => {
                let result = crate::transfer::read_import(std::path::Path::new(&path))
                    .and_then(|text| tracker.import_json(&text).map_err(anyhow::Error::new));
                match result {
                    Ok(count) => {
                        self.record_index = 0;
                        self.record_scroll = 0;
                        self.set_status(format!("Imported {count} records from {path}"));
                    }
                    Err(e) => self.set_status(format!("Import failed: {e:#}")),
                }
            }
            PendingAction::ResetSettings => match tracker.reset_settings() {
                Ok(_) => self.set_status("Settings reset to defaults"),
                Err(e) => self.set_status(format!("Error: {e}")),
            },
        }
        self.refresh(tracker);
        self.reset_settings_form();
        self.input_mode = InputMode::Normal;
        self.confirm_message.clear();
    }

    pub(crate) fn cancel_confirm(&mut self) {
        self.pending_action = None;
        self.input_mode = InputMode::Normal;
        self.confirm_message.clear();
        self.set_status("Cancelled");
    }
}
