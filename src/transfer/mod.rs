//! JSON import/export of the record collection.
//!
//! Export always writes canonical field names. Import accepts either the canonical
//! name or the short alias for each field and fills in defaults for anything
//! missing. A document is accepted or rejected as a whole.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;

use crate::error::ImportError;
use crate::models::{within_limit, Record, MAX_INTEGER_DIGITS};

pub(crate) const DEFAULT_CATEGORY: &str = "Other";

/// Serialize records as a pretty-printed JSON array.
pub(crate) fn export_json(records: &[Record]) -> std::result::Result<String, serde_json::Error> {
    serde_json::to_string_pretty(records)
}

/// Parse a JSON document into records. The top-level value must be an array.
pub(crate) fn parse_document(
    text: &str,
    now: DateTime<Utc>,
    today: &str,
) -> std::result::Result<Vec<Record>, ImportError> {
    let value: Value = serde_json::from_str(text)?;
    match value {
        Value::Array(items) => normalize_items(&items, now, today),
        _ => Err(ImportError::NotAnArray),
    }
}

/// Normalize every item, or fail on the first malformed one.
///
/// Ids are kept when present and unique; missing or repeated ids get a fresh UUID.
pub(crate) fn normalize_items(
    items: &[Value],
    now: DateTime<Utc>,
    today: &str,
) -> std::result::Result<Vec<Record>, ImportError> {
    let mut seen: HashSet<String> = HashSet::with_capacity(items.len());
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let obj = item
                .as_object()
                .ok_or(ImportError::NotAnObject { index })?;
            let mut record = normalize_item(index, obj, now, today)?;
            if !seen.insert(record.id.clone()) {
                record.id = new_id();
                seen.insert(record.id.clone());
            }
            Ok(record)
        })
        .collect()
}

/// Field precedence: canonical name, then alias, then default.
fn normalize_item(
    index: usize,
    obj: &Map<String, Value>,
    now: DateTime<Utc>,
    today: &str,
) -> std::result::Result<Record, ImportError> {
    let id = text_field(index, obj, "id", None)?.unwrap_or_else(new_id);
    let description = text_field(index, obj, "description", Some("desc"))?.unwrap_or_default();
    let category = text_field(index, obj, "category", Some("cat"))?
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
    let date = text_field(index, obj, "date", Some("dt"))?.unwrap_or_else(|| today.to_string());
    let amount = amount_field(index, obj)?;
    let created_at = timestamp_field(index, obj, "createdAt")?.unwrap_or(now);
    let updated_at = timestamp_field(index, obj, "updatedAt")?
        .unwrap_or(now)
        .max(created_at);

    Ok(Record {
        id,
        description,
        amount,
        category,
        date,
        created_at,
        updated_at,
    })
}

/// A non-empty string under `name`, falling back to `alias`. Empty and null count as missing.
fn text_field(
    index: usize,
    obj: &Map<String, Value>,
    name: &'static str,
    alias: Option<&'static str>,
) -> std::result::Result<Option<String>, ImportError> {
    for key in std::iter::once(name).chain(alias) {
        match obj.get(key) {
            None | Some(Value::Null) => continue,
            Some(Value::String(s)) if s.is_empty() => continue,
            Some(Value::String(s)) => return Ok(Some(s.clone())),
            Some(Value::Number(n)) => return Ok(Some(n.to_string())),
            Some(other) => {
                return Err(ImportError::InvalidField {
                    index,
                    field: name,
                    reason: format!("expected text, found {other}"),
                })
            }
        }
    }
    Ok(None)
}

/// `amount`, then `amt`, then zero. Only a missing or null value falls through.
/// Negative or oversized amounts are rejected.
fn amount_field(
    index: usize,
    obj: &Map<String, Value>,
) -> std::result::Result<Decimal, ImportError> {
    let raw = match obj.get("amount") {
        None | Some(Value::Null) => obj.get("amt"),
        found => found,
    };
    let Some(raw) = raw.filter(|v| !v.is_null()) else {
        return Ok(Decimal::ZERO);
    };
    let invalid = |reason: String| ImportError::InvalidField {
        index,
        field: "amount",
        reason,
    };
    let amount = json_decimal(raw).ok_or_else(|| invalid(format!("not a number: {raw}")))?;
    if amount < Decimal::ZERO {
        return Err(invalid(format!("negative amount {amount}")));
    }
    if !within_limit(amount) {
        return Err(invalid(format!(
            "{amount} has more than {MAX_INTEGER_DIGITS} integer digits"
        )));
    }
    Ok(amount)
}

fn timestamp_field(
    index: usize,
    obj: &Map<String, Value>,
    name: &'static str,
) -> std::result::Result<Option<DateTime<Utc>>, ImportError> {
    let Some(raw) = text_field(index, obj, name, None)? else {
        return Ok(None);
    };
    DateTime::parse_from_rfc3339(&raw)
        .map(|ts| Some(ts.with_timezone(&Utc)))
        .map_err(|e| ImportError::InvalidField {
            index,
            field: name,
            reason: format!("'{raw}' is not an RFC 3339 timestamp: {e}"),
        })
}

/// Read a decimal from a JSON number or numeric string.
pub(crate) fn json_decimal(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Write the export document to `path`.
pub(crate) fn write_export(path: &Path, records: &[Record]) -> Result<()> {
    let json = export_json(records).context("Failed to serialize records")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write export file: {}", path.display()))?;
    tracing::info!(path = %path.display(), count = records.len(), "records exported");
    Ok(())
}

/// Read an import document from `path`.
pub(crate) fn read_import(path: &Path) -> Result<String> {
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read import file: {}", path.display()))
}
