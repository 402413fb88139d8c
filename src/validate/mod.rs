//! Field predicates run before a record is accepted.
//!
//! Each predicate is pure and independent. [`validate_fields`] runs all four and
//! reports every failing field, so the form can show one message per field.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

use crate::error::{FieldError, ValidationError};
use crate::models::{Field, RecordFields, MAX_INTEGER_DIGITS};

static EDGES_RE: LazyLock<Regex> = LazyLock::new(|| compile(r"(?s)^\S(?:.*\S)?$"));
static WORD_RE: LazyLock<Regex> = LazyLock::new(|| compile(r"\w+"));
static AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| compile(r"^(0|[1-9][0-9]*)(\.[0-9]{1,2})?$"));
static CATEGORY_RE: LazyLock<Regex> = LazyLock::new(|| compile(r"^[A-Za-z]+(?:[ -][A-Za-z]+)*$"));
static DATE_RE: LazyLock<Regex> = LazyLock::new(|| compile(r"^([0-9]{4})-([0-9]{2})-([0-9]{2})$"));

#[allow(clippy::expect_used)]
fn compile(pattern: &'static str) -> Regex {
    Regex::new(pattern).expect("static pattern compiles")
}

/// Outcome of a single predicate: `Err` carries the user-facing reason.
pub(crate) type Check = Result<(), &'static str>;

/// A record's fields after every predicate passed.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ValidFields {
    pub(crate) description: String,
    pub(crate) amount: Decimal,
    pub(crate) category: String,
    pub(crate) date: String,
}

pub(crate) fn check_description(value: &str) -> Check {
    if value.trim().is_empty() {
        return Err("Description is required.");
    }
    if !EDGES_RE.is_match(value) {
        return Err("No leading or trailing spaces.");
    }
    if has_repeated_word(value) {
        return Err("Remove the repeated word.");
    }
    Ok(())
}

/// True when two adjacent words, separated only by whitespace, are equal
/// ignoring case ("gym gym", "The the").
fn has_repeated_word(value: &str) -> bool {
    let words: Vec<_> = WORD_RE.find_iter(value).collect();
    words.windows(2).any(|pair| {
        let between = &value[pair[0].end()..pair[1].start()];
        !between.is_empty()
            && between.chars().all(char::is_whitespace)
            && pair[0].as_str().to_lowercase() == pair[1].as_str().to_lowercase()
    })
}

pub(crate) fn check_amount(value: &str) -> Check {
    let Some(caps) = AMOUNT_RE.captures(value) else {
        return Err("Enter a positive number (up to 2 decimals).");
    };
    if caps[1].len() > MAX_INTEGER_DIGITS as usize {
        return Err("Amount is too large (at most 12 digits before the point).");
    }
    Ok(())
}

pub(crate) fn check_category(value: &str) -> Check {
    if CATEGORY_RE.is_match(value) {
        Ok(())
    } else {
        Err("Letters, spaces or hyphens only.")
    }
}

/// Accepts `YYYY-MM-DD` with the day bounded by the month's length.
/// February always allows 29 days; leap years are not checked.
pub(crate) fn check_date(value: &str) -> Check {
    const MSG: &str = "Use a real date as YYYY-MM-DD.";
    let Some(caps) = DATE_RE.captures(value) else {
        return Err(MSG);
    };
    let month: u32 = caps[2].parse().map_err(|_| MSG)?;
    let day: u32 = caps[3].parse().map_err(|_| MSG)?;
    let max_day = match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => 29,
        _ => return Err(MSG),
    };
    if (1..=max_day).contains(&day) {
        Ok(())
    } else {
        Err(MSG)
    }
}

/// Run every predicate over trimmed form input.
///
/// On success the description has its internal whitespace runs collapsed.
pub(crate) fn validate_fields(fields: &RecordFields) -> Result<ValidFields, ValidationError> {
    let description = fields.description.trim();
    let amount = fields.amount.trim();
    let category = fields.category.trim();
    let date = fields.date.trim();

    let checks = [
        (Field::Description, check_description(description)),
        (Field::Amount, check_amount(amount)),
        (Field::Category, check_category(category)),
        (Field::Date, check_date(date)),
    ];
    let failures: Vec<FieldError> = checks
        .into_iter()
        .filter_map(|(field, check)| check.err().map(|reason| FieldError { field, reason }))
        .collect();
    if !failures.is_empty() {
        return Err(ValidationError { failures });
    }

    let amount = Decimal::from_str(amount).map_err(|_| ValidationError {
        failures: vec![FieldError {
            field: Field::Amount,
            reason: "Enter a positive number (up to 2 decimals).",
        }],
    })?;

    Ok(ValidFields {
        description: description.split_whitespace().collect::<Vec<_>>().join(" "),
        amount,
        category: category.to_string(),
        date: date.to_string(),
    })
}
