//! Dashboard aggregates over the record store.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::models::{Record, Settings};

/// How spending compares with the configured cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CapStatus {
    NoCap,
    OverCap,
    Remaining,
}

/// Summary statistics. All amounts are in the base currency.
///
/// Sums saturate at [`Decimal::MAX`] rather than overflow.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Summary {
    pub(crate) count: usize,
    pub(crate) total: Decimal,
    pub(crate) top_category: Option<String>,
    /// `cap - total`. Meaningless when the status is [`CapStatus::NoCap`].
    pub(crate) remaining: Decimal,
    pub(crate) status: CapStatus,
}

impl Summary {
    pub(crate) fn compute(records: &[Record], settings: &Settings) -> Self {
        let total = records
            .iter()
            .fold(Decimal::ZERO, |acc, r| acc.saturating_add(r.amount));
        let remaining = settings.cap.saturating_sub(total);
        let status = if settings.cap.is_zero() {
            CapStatus::NoCap
        } else if remaining < Decimal::ZERO {
            CapStatus::OverCap
        } else {
            CapStatus::Remaining
        };
        Self {
            count: records.len(),
            total,
            top_category: top_category(records),
            remaining,
            status,
        }
    }

    /// User-facing cap message in the display currency.
    pub(crate) fn status_message(&self, settings: &Settings) -> String {
        match self.status {
            CapStatus::NoCap => "No cap set.".to_string(),
            CapStatus::OverCap => "\u{26a0} Over your monthly cap!".to_string(),
            CapStatus::Remaining => {
                format!("You have {} remaining.", settings.format_money(self.remaining))
            }
        }
    }

    pub(crate) fn top_category_label(&self) -> &str {
        self.top_category.as_deref().unwrap_or("\u{2014}")
    }
}

/// Category with the largest summed amount. Ties go to the alphabetically first name.
pub(crate) fn top_category(records: &[Record]) -> Option<String> {
    category_totals(records)
        .into_iter()
        // BTreeMap iterates alphabetically; keep the first of equal maxima.
        .fold(None, |best: Option<(String, Decimal)>, (cat, sum)| match best {
            Some((_, best_sum)) if best_sum >= sum => best,
            _ => Some((cat.to_string(), sum)),
        })
        .map(|(cat, _)| cat)
}

/// Per-category totals in alphabetical order.
pub(crate) fn category_totals(records: &[Record]) -> BTreeMap<&str, Decimal> {
    let mut totals: BTreeMap<&str, Decimal> = BTreeMap::new();
    for r in records {
        let sum = totals.entry(r.category.as_str()).or_default();
        *sum = sum.saturating_add(r.amount);
    }
    totals
}
