//! Display projection of the record store: sorted, filtered and highlighted.
//!
//! The projection is plain data. It never reorders or mutates the store itself.

use std::cmp::Ordering;
use std::ops::Range;

use regex::{Regex, RegexBuilder};

use crate::models::{Record, Settings};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SortField {
    Date,
    Description,
    Amount,
}

impl SortField {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Description => "description",
            Self::Amount => "amount",
        }
    }

    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "date" | "dt" => Some(Self::Date),
            "description" | "desc" => Some(Self::Description),
            "amount" | "amt" => Some(Self::Amount),
            _ => None,
        }
    }

    /// Amounts sort largest first; text fields sort A to Z.
    pub(crate) fn default_direction(&self) -> SortDirection {
        match self {
            Self::Amount => SortDirection::Descending,
            Self::Date | Self::Description => SortDirection::Ascending,
        }
    }

    fn compare(&self, a: &Record, b: &Record) -> Ordering {
        match self {
            Self::Date => a.date.cmp(&b.date),
            Self::Description => a.description.cmp(&b.description),
            Self::Amount => a.amount.cmp(&b.amount),
        }
    }
}

impl std::fmt::Display for SortField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub(crate) fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    pub(crate) fn arrow(&self) -> &'static str {
        match self {
            Self::Ascending => "\u{2191}",
            Self::Descending => "\u{2193}",
        }
    }
}

/// Active sort column, if any, and its direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct SortState {
    field: Option<SortField>,
    direction: SortDirection,
}

impl SortState {
    pub(crate) fn new(field: SortField, direction: SortDirection) -> Self {
        Self {
            field: Some(field),
            direction,
        }
    }

    /// Selecting the active field flips its direction; selecting another field
    /// switches to it with that field's default direction.
    pub(crate) fn select(&mut self, field: SortField) {
        if self.field == Some(field) {
            self.direction = self.direction.toggled();
        } else {
            self.field = Some(field);
            self.direction = field.default_direction();
        }
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn field(&self) -> Option<SortField> {
        self.field
    }

    pub(crate) fn direction(&self) -> SortDirection {
        self.direction
    }
}

/// Search and sort controls as set by the user.
#[derive(Debug, Clone, Default)]
pub(crate) struct ViewQuery {
    pub(crate) pattern: String,
    pub(crate) case_sensitive: bool,
    pub(crate) sort: SortState,
}

/// Field text plus the byte ranges that matched the search pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Highlighted {
    pub(crate) text: String,
    pub(crate) spans: Vec<Range<usize>>,
}

impl Highlighted {
    fn new(text: String, re: Option<&Regex>) -> Self {
        let spans = re
            .map(|re| {
                re.find_iter(&text)
                    .filter(|m| !m.is_empty())
                    .map(|m| m.range())
                    .collect()
            })
            .unwrap_or_default();
        Self { text, spans }
    }

    /// Split into `(segment, is_match)` pieces covering the whole text, in order.
    pub(crate) fn segments(&self) -> Vec<(&str, bool)> {
        let mut out = Vec::with_capacity(self.spans.len() * 2 + 1);
        let mut pos = 0;
        for span in &self.spans {
            if span.start > pos {
                out.push((&self.text[pos..span.start], false));
            }
            out.push((&self.text[span.clone()], true));
            pos = span.end;
        }
        if pos < self.text.len() {
            out.push((&self.text[pos..], false));
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ViewRow {
    pub(crate) id: String,
    pub(crate) date: Highlighted,
    pub(crate) description: Highlighted,
    pub(crate) category: Highlighted,
    /// Two-decimal value in the display currency.
    pub(crate) amount: Highlighted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ViewOutcome {
    Rows,
    /// The store has records but none matched the pattern.
    NoResults,
    EmptyStore,
}

#[derive(Debug, Clone)]
pub(crate) struct View {
    pub(crate) rows: Vec<ViewRow>,
    pub(crate) outcome: ViewOutcome,
    /// The pattern did not compile and was ignored.
    pub(crate) invalid_pattern: bool,
}

/// Result of compiling the search box contents.
enum Pattern {
    None,
    Valid(Regex),
    Invalid,
}

fn compile_pattern(pattern: &str, case_sensitive: bool) -> Pattern {
    let pattern = pattern.trim();
    if pattern.is_empty() {
        return Pattern::None;
    }
    match RegexBuilder::new(pattern)
        .case_insensitive(!case_sensitive)
        .build()
    {
        Ok(re) => Pattern::Valid(re),
        Err(e) => {
            tracing::debug!(pattern, "invalid search pattern ignored: {e}");
            Pattern::Invalid
        }
    }
}

/// Stable sort. Records with equal keys keep their store order in either direction.
pub(crate) fn sort_records<'a>(records: &'a [Record], sort: &SortState) -> Vec<&'a Record> {
    let mut list: Vec<&Record> = records.iter().collect();
    if let Some(field) = sort.field() {
        list.sort_by(|a, b| {
            let ord = field.compare(a, b);
            match sort.direction() {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        });
    }
    list
}

/// Sort, then filter, then compute highlight spans.
///
/// A record passes when the pattern matches its description, category, display
/// amount or date. An empty or invalid pattern lets every record through.
pub(crate) fn build_view(records: &[Record], query: &ViewQuery, settings: &Settings) -> View {
    let (re, invalid_pattern) = match compile_pattern(&query.pattern, query.case_sensitive) {
        Pattern::None => (None, false),
        Pattern::Valid(re) => (Some(re), false),
        Pattern::Invalid => (None, true),
    };

    let rows: Vec<ViewRow> = sort_records(records, &query.sort)
        .into_iter()
        .filter_map(|r| {
            let amount = settings.display_value(r.amount);
            if let Some(re) = &re {
                let matched = re.is_match(&r.description)
                    || re.is_match(&r.category)
                    || re.is_match(&amount)
                    || re.is_match(&r.date);
                if !matched {
                    return None;
                }
            }
            Some(ViewRow {
                id: r.id.clone(),
                date: Highlighted::new(r.date.clone(), re.as_ref()),
                description: Highlighted::new(r.description.clone(), re.as_ref()),
                category: Highlighted::new(r.category.clone(), re.as_ref()),
                amount: Highlighted::new(amount, re.as_ref()),
            })
        })
        .collect();

    let outcome = if records.is_empty() {
        ViewOutcome::EmptyStore
    } else if rows.is_empty() {
        ViewOutcome::NoResults
    } else {
        ViewOutcome::Rows
    };
    tracing::debug!(
        total = records.len(),
        shown = rows.len(),
        sort = ?query.sort.field(),
        "view rebuilt"
    );

    View {
        rows,
        outcome,
        invalid_pattern,
    }
}

#[cfg(test)]
mod tests;
