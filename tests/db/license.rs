//! License registry tests

#[path = "../common/mod.rs"]
mod common;

use common::*;

#[test]
fn test_create_license_applies_defaults() {
    let conn = setup_test_db();
    let license = queries::create_license(
        &conn,
        &CreateLicense {
            license_key: "KEY-DEFAULTS".into(),
            owner: "Alice".into(),
            email: "alice@example.com".into(),
            ..Default::default()
        },
    )
    .expect("create should succeed");

    assert!(license.id > 0, "license should get a generated id");
    assert_eq!(license.max_activations, 1, "ceiling should default to 1");
    assert!(license.is_active, "new licenses should default to active");
    assert_eq!(license.expires_on, None, "no expiry means never expires");
    assert!(license.created_at > 0, "created_at should be set");
}

#[test]
fn test_expiry_date_round_trips_as_calendar_date() {
    let conn = setup_test_db();
    let created = create_test_license(&conn, "KEY-DATE", 2, Some(date(2031, 2, 28)));

    let stored: String = conn
        .query_row(
            "SELECT expires_on FROM licenses WHERE id = ?1",
            [created.id],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(stored, "2031-02-28", "expiry should be stored as YYYY-MM-DD");

    let fetched = queries::get_license_by_key(&conn, "KEY-DATE")
        .unwrap()
        .expect("license should exist");
    assert_eq!(fetched.expires_on, Some(date(2031, 2, 28)));
    assert_eq!(fetched.max_activations, 2);
}

#[test]
fn test_duplicate_key_rejected_and_original_unchanged() {
    let conn = setup_test_db();
    let original = create_test_license(&conn, "KEY-DUP", 3, None);

    let result = queries::create_license(
        &conn,
        &CreateLicense {
            license_key: "KEY-DUP".into(),
            owner: "Impostor".into(),
            email: "impostor@example.com".into(),
            max_activations: Some(99),
            ..Default::default()
        },
    );

    assert!(
        matches!(result, Err(AppError::DuplicateKey(ref key)) if key == "KEY-DUP"),
        "second insert with the same key should be DuplicateKey, got {:?}",
        result
    );

    let stored = queries::get_license_by_key(&conn, "KEY-DUP")
        .unwrap()
        .expect("original should still exist");
    assert_eq!(stored.id, original.id);
    assert_eq!(stored.owner, original.owner, "owner must not be overwritten");
    assert_eq!(stored.max_activations, 3, "ceiling must not be overwritten");
}

#[test]
fn test_get_license_by_unknown_key_returns_none() {
    let conn = setup_test_db();
    create_test_license(&conn, "KEY-KNOWN", 1, None);

    assert!(queries::get_license_by_key(&conn, "KEY-UNKNOWN").unwrap().is_none());
}

#[test]
fn test_license_keys_are_case_sensitive() {
    let conn = setup_test_db();
    create_test_license(&conn, "KEY-CASE", 1, None);

    assert!(
        queries::get_license_by_key(&conn, "key-case").unwrap().is_none(),
        "lookup should be an exact match"
    );
}

#[test]
fn test_zero_ceiling_rejected_by_schema() {
    let conn = setup_test_db();
    let result = queries::create_license(
        &conn,
        &CreateLicense {
            license_key: "KEY-ZERO".into(),
            owner: "o".into(),
            email: "e".into(),
            max_activations: Some(0),
            ..Default::default()
        },
    );
    assert!(
        matches!(result, Err(AppError::Internal(_))),
        "CHECK constraint should refuse a zero ceiling"
    );
}

#[test]
fn test_seed_demo_licenses_is_idempotent() {
    let conn = setup_test_db();

    let first = queries::seed_demo_licenses(&conn).unwrap();
    assert_eq!(first, 3, "three demo licenses should be inserted");

    let second = queries::seed_demo_licenses(&conn).unwrap();
    assert_eq!(second, 0, "reseeding should not insert duplicates");

    let prod = queries::get_license_by_key(&conn, "PROD-9876-5432-ZYXW")
        .unwrap()
        .expect("premium demo license should exist");
    assert_eq!(prod.max_activations, 3);

    let expired = queries::get_license_by_key(&conn, "EXPIRED-LITE-LICENSE")
        .unwrap()
        .expect("expired demo license should exist");
    assert!(expired.is_expired_on(test_today()));
}
