use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// A single spending transaction. Amounts are always held in the base currency.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Record {
    pub(crate) id: String,
    pub(crate) description: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub(crate) amount: Decimal,
    pub(crate) category: String,
    /// Format: "YYYY-MM-DD"
    pub(crate) date: String,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

/// Raw form input, exactly as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct RecordFields {
    pub(crate) description: String,
    pub(crate) amount: String,
    pub(crate) category: String,
    pub(crate) date: String,
}

impl RecordFields {
    pub(crate) fn new(description: &str, amount: &str, category: &str, date: &str) -> Self {
        Self {
            description: description.to_string(),
            amount: amount.to_string(),
            category: category.to_string(),
            date: date.to_string(),
        }
    }

    /// Pre-fill a form from an existing record (used when editing).
    pub(crate) fn from_record(record: &Record) -> Self {
        Self {
            description: record.description.clone(),
            amount: format!("{}", record.amount.normalize()),
            category: record.category.clone(),
            date: record.date.clone(),
        }
    }

    pub(crate) fn get(&self, field: Field) -> &str {
        match field {
            Field::Description => &self.description,
            Field::Amount => &self.amount,
            Field::Category => &self.category,
            Field::Date => &self.date,
        }
    }

    pub(crate) fn get_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Description => &mut self.description,
            Field::Amount => &mut self.amount,
            Field::Category => &mut self.category,
            Field::Date => &mut self.date,
        }
    }
}

/// The user-editable fields of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Field {
    Description,
    Amount,
    Category,
    Date,
}

impl Field {
    pub(crate) fn all() -> &'static [Field] {
        &[Self::Description, Self::Amount, Self::Category, Self::Date]
    }

    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Description => "description",
            Self::Amount => "amount",
            Self::Category => "category",
            Self::Date => "date",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
