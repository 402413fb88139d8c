//! The record store and settings store.
//!
//! [`Tracker`] owns all mutable state. Every operation validates first, mutates
//! in memory, then writes through to the [`BlobStore`]. A failed write surfaces as
//! [`TrackerError::Storage`] but leaves the in-memory state valid; the next
//! successful write re-syncs the full blob.

mod settings;

pub(crate) use settings::RateOverrides;

use chrono::{DateTime, Duration, Local, Utc};
use serde_json::Value;

use crate::db::BlobStore;
use crate::error::{ImportError, TrackerError};
use crate::models::{Record, RecordFields, Settings};
use crate::transfer;
use crate::validate::{validate_fields, ValidFields};

pub(crate) const KEY_RECORDS: &str = "records";
pub(crate) const KEY_CAP: &str = "cap";
pub(crate) const KEY_CURRENCY: &str = "currency";
pub(crate) const KEY_RATES: &str = "rates";

pub(crate) type Result<T> = std::result::Result<T, TrackerError>;

pub(crate) struct Tracker<S: BlobStore> {
    store: S,
    records: Vec<Record>,
    settings: Settings,
}

impl<S: BlobStore> Tracker<S> {
    /// Load prior state from the blob store. Missing keys yield defaults.
    pub(crate) fn load(store: S) -> Result<Self> {
        let records = match store.get(KEY_RECORDS)? {
            Some(blob) => {
                transfer::parse_document(&blob, Utc::now(), &today()).map_err(|e| {
                    tracing::error!("stored records are unreadable: {e}");
                    TrackerError::Import(e)
                })?
            }
            None => Vec::new(),
        };
        let settings = settings::load(&store)?;
        tracing::info!(
            records = records.len(),
            currency = %settings.currency,
            cap = %settings.cap,
            "tracker loaded"
        );
        Ok(Self {
            store,
            records,
            settings,
        })
    }

    // ── Records ───────────────────────────────────────────────

    /// Full collection in insertion order.
    pub(crate) fn list(&self) -> &[Record] {
        &self.records
    }

    pub(crate) fn get(&self, id: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }

    pub(crate) fn add(&mut self, fields: &RecordFields) -> Result<Record> {
        let valid = validate(fields)?;
        let now = Utc::now();
        let record = Record {
            id: self.fresh_id(),
            description: valid.description,
            amount: valid.amount,
            category: valid.category,
            date: valid.date,
            created_at: now,
            updated_at: now,
        };
        self.records.push(record.clone());
        tracing::info!(id = %record.id, amount = %record.amount, "record added");
        self.persist_records()?;
        Ok(record)
    }

    /// Replace the fields of an existing record, keeping its id and `created_at`.
    pub(crate) fn update(&mut self, id: &str, fields: &RecordFields) -> Result<Record> {
        let idx = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| TrackerError::NotFound(id.to_string()))?;
        let valid = validate(fields)?;

        let existing = &mut self.records[idx];
        existing.description = valid.description;
        existing.amount = valid.amount;
        existing.category = valid.category;
        existing.date = valid.date;
        existing.updated_at = next_timestamp(existing.updated_at.max(existing.created_at));
        let record = existing.clone();

        tracing::info!(id = %record.id, "record updated");
        self.persist_records()?;
        Ok(record)
    }

    /// Delete a record. Callers confirm destructive intent before calling.
    pub(crate) fn remove(&mut self, id: &str) -> Result<Record> {
        let idx = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| TrackerError::NotFound(id.to_string()))?;
        let removed = self.records.remove(idx);
        tracing::info!(id = %removed.id, "record removed");
        self.persist_records()?;
        Ok(removed)
    }

    /// Replace the whole collection with normalized import items.
    ///
    /// Either every item is accepted or nothing changes.
    pub(crate) fn replace_all(&mut self, items: &[Value]) -> Result<usize> {
        let records = transfer::normalize_items(items, Utc::now(), &today()).map_err(|e| {
            tracing::warn!("import rejected: {e}");
            e
        })?;
        let count = records.len();
        self.records = records;
        tracing::info!(count, "records replaced");
        self.persist_records()?;
        Ok(count)
    }

    /// Parse a JSON document and replace the collection with its contents.
    pub(crate) fn import_json(&mut self, text: &str) -> Result<usize> {
        let value: Value = serde_json::from_str(text).map_err(|e| {
            tracing::warn!("import rejected: {e}");
            ImportError::Parse(e)
        })?;
        match value {
            Value::Array(items) => self.replace_all(&items),
            _ => {
                tracing::warn!("import rejected: top-level value is not an array");
                Err(ImportError::NotAnArray.into())
            }
        }
    }

    pub(crate) fn export_json(&self) -> Result<String> {
        transfer::export_json(&self.records)
            .map_err(|e| TrackerError::Storage(anyhow::Error::new(e)))
    }

    // ── Settings ──────────────────────────────────────────────

    pub(crate) fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Apply the settings form. See [`settings::apply`] for the field rules.
    pub(crate) fn save_settings(
        &mut self,
        cap: &str,
        currency: &str,
        overrides: &RateOverrides,
    ) -> Result<&Settings> {
        self.settings = settings::apply(&self.settings, cap, currency, overrides)?;
        tracing::info!(
            cap = %self.settings.cap,
            currency = %self.settings.currency,
            "settings saved"
        );
        self.persist_settings()?;
        Ok(&self.settings)
    }

    pub(crate) fn reset_settings(&mut self) -> Result<&Settings> {
        self.settings = Settings::default();
        tracing::info!("settings reset");
        self.persist_settings()?;
        Ok(&self.settings)
    }

    // ── Persistence ───────────────────────────────────────────

    fn persist_records(&mut self) -> Result<()> {
        let blob = self.export_json()?;
        self.store.set(KEY_RECORDS, &blob).map_err(|e| {
            tracing::error!("failed to persist records: {e:#}");
            TrackerError::Storage(e)
        })
    }

    fn persist_settings(&mut self) -> Result<()> {
        let entries = settings::to_entries(&self.settings)?;
        self.store.set_all(&entries).map_err(|e| {
            tracing::error!("failed to persist settings: {e:#}");
            TrackerError::Storage(e)
        })
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = transfer::new_id();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn store(&self) -> &S {
        &self.store
    }

    #[cfg(test)]
    pub(crate) fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}

fn validate(fields: &RecordFields) -> Result<ValidFields> {
    validate_fields(fields).map_err(|e| {
        tracing::warn!("rejected record: {e}");
        TrackerError::Validation(e)
    })
}

/// A timestamp strictly after `previous`, normally the current time.
fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::milliseconds(1)
    }
}

/// Today's local date as `YYYY-MM-DD`.
pub(crate) fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}
