#![allow(clippy::unwrap_used)]

use super::*;

fn schema_version(db: &Database) -> i32 {
    db.conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .unwrap()
}

// ── Schema ────────────────────────────────────────────────────

#[test]
fn test_fresh_database_at_current_version() {
    let db = Database::open_in_memory().unwrap();
    assert_eq!(schema_version(&db), schema::CURRENT_VERSION);
}

#[test]
fn test_reopen_keeps_data_and_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fintrack.db");
    {
        let mut db = Database::open(&path).unwrap();
        db.set("cap", "500").unwrap();
    }
    let db = Database::open(&path).unwrap();
    assert_eq!(schema_version(&db), schema::CURRENT_VERSION);
    assert_eq!(db.get("cap").unwrap().as_deref(), Some("500"));

    let rows: i64 = db
        .conn
        .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

// ── Key/value ─────────────────────────────────────────────────

#[test]
fn test_get_missing_key() {
    let db = Database::open_in_memory().unwrap();
    assert!(db.get("records").unwrap().is_none());
}

#[test]
fn test_set_then_get() {
    let mut db = Database::open_in_memory().unwrap();
    db.set("currency", "USD").unwrap();
    assert_eq!(db.get("currency").unwrap().as_deref(), Some("USD"));
}

#[test]
fn test_set_overwrites() {
    let mut db = Database::open_in_memory().unwrap();
    db.set("records", "[]").unwrap();
    db.set("records", r#"[{"id":"a"}]"#).unwrap();
    assert_eq!(
        db.get("records").unwrap().as_deref(),
        Some(r#"[{"id":"a"}]"#)
    );
    let count: i64 = db
        .conn
        .query_row("SELECT COUNT(*) FROM kv_store", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn test_set_all_writes_every_key() {
    let mut db = Database::open_in_memory().unwrap();
    db.set_all(&[
        ("cap", "100".to_string()),
        ("currency", "EUR".to_string()),
        ("rates", "{}".to_string()),
    ])
    .unwrap();
    assert_eq!(db.get("cap").unwrap().as_deref(), Some("100"));
    assert_eq!(db.get("currency").unwrap().as_deref(), Some("EUR"));
    assert_eq!(db.get("rates").unwrap().as_deref(), Some("{}"));
}

#[test]
fn test_values_are_opaque_text() {
    let mut db = Database::open_in_memory().unwrap();
    let blob = "line one\nline \"two\" \u{1F4B8}";
    db.set("records", blob).unwrap();
    assert_eq!(db.get("records").unwrap().as_deref(), Some(blob));
}
