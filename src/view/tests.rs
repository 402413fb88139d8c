#![allow(clippy::unwrap_used)]

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::models::Currency;

fn make_record(id: &str, desc: &str, amount: Decimal, cat: &str, date: &str) -> Record {
    let ts = Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap();
    Record {
        id: id.into(),
        description: desc.into(),
        amount,
        category: cat.into(),
        date: date.into(),
        created_at: ts,
        updated_at: ts,
    }
}

fn sample() -> Vec<Record> {
    vec![
        make_record("1", "Lunch", dec!(1500), "Food", "2024-01-15"),
        make_record("2", "Bus pass", dec!(20000), "Transport", "2024-01-03"),
        make_record("3", "Coffee", dec!(800), "Food", "2024-01-20"),
    ]
}

fn query(pattern: &str) -> ViewQuery {
    ViewQuery {
        pattern: pattern.into(),
        ..ViewQuery::default()
    }
}

fn ids(view: &View) -> Vec<&str> {
    view.rows.iter().map(|r| r.id.as_str()).collect()
}

// ── Sort state ────────────────────────────────────────────────

#[test]
fn test_sort_select_toggles_same_field() {
    let mut sort = SortState::default();
    sort.select(SortField::Date);
    assert_eq!(sort.field(), Some(SortField::Date));
    assert_eq!(sort.direction(), SortDirection::Ascending);
    sort.select(SortField::Date);
    assert_eq!(sort.direction(), SortDirection::Descending);
    sort.select(SortField::Date);
    assert_eq!(sort.direction(), SortDirection::Ascending);
}

#[test]
fn test_sort_amount_defaults_descending() {
    let mut sort = SortState::new(SortField::Date, SortDirection::Descending);
    sort.select(SortField::Amount);
    assert_eq!(sort.field(), Some(SortField::Amount));
    assert_eq!(sort.direction(), SortDirection::Descending);
    sort.select(SortField::Description);
    assert_eq!(sort.direction(), SortDirection::Ascending);
}

#[test]
fn test_sort_field_parse() {
    assert_eq!(SortField::parse("amount"), Some(SortField::Amount));
    assert_eq!(SortField::parse(" Desc "), Some(SortField::Description));
    assert_eq!(SortField::parse("dt"), Some(SortField::Date));
    assert_eq!(SortField::parse("category"), None);
}

#[test]
fn test_sort_clear() {
    let mut sort = SortState::new(SortField::Amount, SortDirection::Ascending);
    sort.clear();
    assert_eq!(sort.field(), None);
}

// ── Sorting ───────────────────────────────────────────────────

#[test]
fn test_unsorted_keeps_insertion_order() {
    let records = sample();
    let view = build_view(&records, &ViewQuery::default(), &Settings::default());
    assert_eq!(ids(&view), vec!["1", "2", "3"]);
    assert_eq!(view.outcome, ViewOutcome::Rows);
}

#[test]
fn test_sort_by_each_field() {
    let records = sample();
    let settings = Settings::default();
    let mut q = ViewQuery::default();

    q.sort = SortState::new(SortField::Date, SortDirection::Ascending);
    assert_eq!(ids(&build_view(&records, &q, &settings)), vec!["2", "1", "3"]);

    q.sort = SortState::new(SortField::Description, SortDirection::Ascending);
    assert_eq!(ids(&build_view(&records, &q, &settings)), vec!["2", "3", "1"]);

    q.sort = SortState::new(SortField::Amount, SortDirection::Descending);
    assert_eq!(ids(&build_view(&records, &q, &settings)), vec!["2", "1", "3"]);

    q.sort = SortState::new(SortField::Amount, SortDirection::Ascending);
    assert_eq!(ids(&build_view(&records, &q, &settings)), vec!["3", "1", "2"]);
}

#[test]
fn test_sort_is_stable_in_both_directions() {
    let records = vec![
        make_record("a", "X", dec!(10), "Food", "2024-01-01"),
        make_record("b", "Y", dec!(10), "Food", "2024-01-01"),
        make_record("c", "Z", dec!(5), "Food", "2024-01-01"),
    ];
    let asc = sort_records(&records, &SortState::new(SortField::Amount, SortDirection::Ascending));
    let asc: Vec<&str> = asc.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(asc, vec!["c", "a", "b"]);

    let desc = sort_records(&records, &SortState::new(SortField::Amount, SortDirection::Descending));
    let desc: Vec<&str> = desc.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(desc, vec!["a", "b", "c"]);
}

#[test]
fn test_sort_does_not_touch_store_order() {
    let records = sample();
    let q = ViewQuery {
        sort: SortState::new(SortField::Amount, SortDirection::Descending),
        ..ViewQuery::default()
    };
    let _ = build_view(&records, &q, &Settings::default());
    let order: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(order, vec!["1", "2", "3"]);
}

// ── Filtering ─────────────────────────────────────────────────

#[test]
fn test_filter_case_insensitive_by_default() {
    let records = sample();
    let view = build_view(&records, &query("food"), &Settings::default());
    assert_eq!(ids(&view), vec!["1", "3"]);
}

#[test]
fn test_filter_case_sensitive() {
    let records = sample();
    let q = ViewQuery {
        pattern: "food".into(),
        case_sensitive: true,
        ..ViewQuery::default()
    };
    let view = build_view(&records, &q, &Settings::default());
    assert!(view.rows.is_empty());
    assert_eq!(view.outcome, ViewOutcome::NoResults);
}

#[test]
fn test_filter_matches_date_and_amount() {
    let records = sample();
    let view = build_view(&records, &query("^2024-01-03$"), &Settings::default());
    assert_eq!(ids(&view), vec!["2"]);

    let view = build_view(&records, &query(r"^800\.00$"), &Settings::default());
    assert_eq!(ids(&view), vec!["3"]);
}

#[test]
fn test_filter_amount_uses_display_currency() {
    let records = sample();
    let mut settings = Settings::default();
    settings.currency = Currency::Usd;
    // 1500 * 0.00093 = 1.395 -> 1.40
    let view = build_view(&records, &query(r"^1\.40$"), &settings);
    assert_eq!(ids(&view), vec!["1"]);
    assert_eq!(view.rows[0].amount.text, "1.40");
}

#[test]
fn test_filter_regex_alternation() {
    let records = sample();
    let view = build_view(&records, &query("lunch|coffee"), &Settings::default());
    assert_eq!(ids(&view), vec!["1", "3"]);
}

#[test]
fn test_empty_pattern_shows_all() {
    let records = sample();
    let view = build_view(&records, &query("   "), &Settings::default());
    assert_eq!(view.rows.len(), 3);
    assert!(!view.invalid_pattern);
    assert!(view.rows.iter().all(|r| r.description.spans.is_empty()));
}

#[test]
fn test_invalid_pattern_shows_all_and_flags() {
    let records = sample();
    let view = build_view(&records, &query("(unclosed"), &Settings::default());
    assert_eq!(view.rows.len(), 3);
    assert!(view.invalid_pattern);
    assert_eq!(view.outcome, ViewOutcome::Rows);
}

#[test]
fn test_empty_store_outcome() {
    let view = build_view(&[], &query("anything"), &Settings::default());
    assert_eq!(view.outcome, ViewOutcome::EmptyStore);
    assert!(view.rows.is_empty());
}

#[test]
fn test_sort_then_filter() {
    let records = sample();
    let q = ViewQuery {
        pattern: "food".into(),
        case_sensitive: false,
        sort: SortState::new(SortField::Amount, SortDirection::Ascending),
    };
    let view = build_view(&records, &q, &Settings::default());
    assert_eq!(ids(&view), vec!["3", "1"]);
}

// ── Highlighting ──────────────────────────────────────────────

#[test]
fn test_highlight_spans() {
    let records = vec![make_record("1", "Coffee and coffee", dec!(5), "Food", "2024-01-01")];
    let view = build_view(&records, &query("coffee"), &Settings::default());
    let desc = &view.rows[0].description;
    assert_eq!(desc.spans, vec![0..6, 11..17]);
    assert!(view.rows[0].category.spans.is_empty());
}

#[test]
fn test_highlight_skips_empty_matches() {
    let records = vec![make_record("1", "Lunch", dec!(5), "Food", "2024-01-01")];
    let view = build_view(&records, &query("x*"), &Settings::default());
    assert_eq!(view.rows.len(), 1);
    assert!(view.rows[0].description.spans.is_empty());
}

#[test]
fn test_segments_cover_text() {
    let h = Highlighted {
        text: "Bus pass".into(),
        spans: vec![4..8],
    };
    assert_eq!(h.segments(), vec![("Bus ", false), ("pass", true)]);

    let h = Highlighted {
        text: "abc".into(),
        spans: vec![],
    };
    assert_eq!(h.segments(), vec![("abc", false)]);

    let h = Highlighted {
        text: "aXa".into(),
        spans: vec![0..1, 2..3],
    };
    assert_eq!(h.segments(), vec![("a", true), ("X", false), ("a", true)]);
}
