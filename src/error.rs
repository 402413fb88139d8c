use thiserror::Error;

use crate::models::Field;

/// Errors surfaced by the record and settings store.
#[derive(Debug, Error)]
pub(crate) enum TrackerError {
    /// One or more form fields failed validation. Nothing was mutated.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// No record carries the given id.
    #[error("no record with id '{0}'")]
    NotFound(String),

    /// The import document was rejected as a whole. Nothing was mutated.
    #[error("import rejected: {0}")]
    Import(#[from] ImportError),

    /// The settings form named a currency outside the supported set.
    #[error("unsupported currency '{0}'")]
    UnknownCurrency(String),

    /// The write-through to the blob store failed. In-memory state is still valid.
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// A single field that failed its predicate, with a user-facing reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FieldError {
    pub(crate) field: Field,
    pub(crate) reason: &'static str,
}

/// Per-field validation failures, in form order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {}", fields_list(.failures))]
pub(crate) struct ValidationError {
    pub(crate) failures: Vec<FieldError>,
}

impl ValidationError {
    pub(crate) fn reason_for(&self, field: Field) -> Option<&'static str> {
        self.failures
            .iter()
            .find(|f| f.field == field)
            .map(|f| f.reason)
    }
}

fn fields_list(failures: &[FieldError]) -> String {
    failures
        .iter()
        .map(|f| f.field.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Error)]
pub(crate) enum ImportError {
    #[error("not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("top-level value is not an array")]
    NotAnArray,

    #[error("item {index} is not an object")]
    NotAnObject { index: usize },

    #[error("item {index}: bad {field}: {reason}")]
    InvalidField {
        index: usize,
        field: &'static str,
        reason: String,
    },
}
