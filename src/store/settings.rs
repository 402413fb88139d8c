use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use super::{Result, KEY_CAP, KEY_CURRENCY, KEY_RATES};
use crate::db::BlobStore;
use crate::error::TrackerError;
use crate::models::{within_limit, Currency, Settings};
use crate::transfer::json_decimal;

/// Raw rate inputs from the settings form, keyed by currency.
pub(crate) type RateOverrides = BTreeMap<Currency, String>;

#[derive(Serialize)]
struct Rate(#[serde(with = "rust_decimal::serde::arbitrary_precision")] Decimal);

/// Apply the settings form to `current`, returning the new settings.
///
/// The currency must be supported. An unparseable, negative or oversized cap becomes 0.
/// A rate override is applied only when it parses as a positive number;
/// otherwise the previous rate stays.
pub(crate) fn apply(
    current: &Settings,
    cap: &str,
    currency: &str,
    overrides: &RateOverrides,
) -> Result<Settings> {
    let currency = Currency::parse(currency)
        .ok_or_else(|| TrackerError::UnknownCurrency(currency.trim().to_string()))?;

    let mut next = current.clone();
    next.cap = parse_cap(cap);
    next.currency = currency;
    for (code, raw) in overrides {
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        let applied = Decimal::from_str(raw)
            .map(|rate| next.set_rate(*code, rate))
            .unwrap_or(false);
        if !applied {
            tracing::warn!(currency = %code, value = raw, "ignored rate override");
        }
    }
    Ok(next)
}

fn parse_cap(raw: &str) -> Decimal {
    Decimal::from_str(raw.trim())
        .ok()
        .filter(|cap| *cap >= Decimal::ZERO && within_limit(*cap))
        .unwrap_or(Decimal::ZERO)
}

/// Read settings from the blob store, falling back to defaults per key.
pub(crate) fn load<S: BlobStore>(store: &S) -> Result<Settings> {
    let mut settings = Settings::default();

    if let Some(cap) = store.get(KEY_CAP)? {
        settings.cap = parse_cap(&cap);
    }
    if let Some(code) = store.get(KEY_CURRENCY)? {
        match Currency::parse(&code) {
            Some(c) => settings.currency = c,
            None => tracing::warn!(code = %code, "stored currency not supported, using base"),
        }
    }
    if let Some(blob) = store.get(KEY_RATES)? {
        match serde_json::from_str::<Value>(&blob) {
            Ok(Value::Object(map)) => {
                for (code, value) in &map {
                    if let (Some(c), Some(rate)) = (Currency::parse(code), json_decimal(value)) {
                        settings.set_rate(c, rate);
                    }
                }
            }
            _ => tracing::warn!("stored rates unreadable, using defaults"),
        }
    }

    Ok(settings)
}

/// Serialize settings into their blob-store keys.
pub(crate) fn to_entries(settings: &Settings) -> Result<Vec<(&'static str, String)>> {
    let rates: BTreeMap<&str, Rate> = settings
        .rates()
        .iter()
        .map(|(c, r)| (c.as_str(), Rate(r.normalize())))
        .collect();
    let rates = serde_json::to_string(&rates)
        .map_err(|e| TrackerError::Storage(anyhow::Error::new(e)))?;
    Ok(vec![
        (KEY_CAP, settings.cap.normalize().to_string()),
        (KEY_CURRENCY, settings.currency.as_str().to_string()),
        (KEY_RATES, rates),
    ])
}
