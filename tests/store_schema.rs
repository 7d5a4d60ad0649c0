use event_planner::db::{
    ensure_schema, fetch_venues, insert_venue, open_store, open_store_in_memory, table_exists,
    ReferencePolicy, StoreError,
};
use event_planner::NewVenue;

fn main_hall() -> NewVenue {
    NewVenue {
        name: "Main Hall".to_string(),
        capacity: 200,
        facilities: "Projector, Wifi".to_string(),
        pricing: "$500/day".to_string(),
        availability: true,
    }
}

#[test]
fn ensure_schema_creates_all_tables() {
    let conn = open_store_in_memory(ReferencePolicy::Permissive).unwrap();
    ensure_schema(&conn).unwrap();

    for table in ["Events", "Venues", "Tasks"] {
        assert!(table_exists(&conn, table).unwrap(), "{table} missing");
    }
}

#[test]
fn ensure_schema_twice_keeps_rows_and_tables() {
    let conn = open_store_in_memory(ReferencePolicy::Permissive).unwrap();
    ensure_schema(&conn).unwrap();
    insert_venue(&conn, &main_hall()).unwrap();

    ensure_schema(&conn).unwrap();

    let tables: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'
             AND name IN ('Events', 'Venues', 'Tasks')",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(tables, 3);
    assert_eq!(fetch_venues(&conn).unwrap().len(), 1);
}

#[test]
fn reopening_a_file_store_keeps_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("event_planner.db");

    let conn = open_store(&path, ReferencePolicy::Permissive).unwrap();
    ensure_schema(&conn).unwrap();
    let id = insert_venue(&conn, &main_hall()).unwrap();
    drop(conn);

    let conn = open_store(&path, ReferencePolicy::Permissive).unwrap();
    ensure_schema(&conn).unwrap();
    let venues = fetch_venues(&conn).unwrap();
    assert_eq!(venues.len(), 1);
    assert_eq!(venues[0].id, id);
}

#[test]
fn open_store_fails_when_parent_is_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"plain file").unwrap();

    let err = open_store(blocker.join("event_planner.db"), ReferencePolicy::Permissive)
        .unwrap_err();
    assert!(matches!(err, StoreError::Connection { .. }), "{err:?}");
}

#[test]
fn open_store_rejects_a_file_that_is_not_a_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("garbage.db");
    std::fs::write(&path, vec![b'x'; 4096]).unwrap();

    let err = open_store(&path, ReferencePolicy::Permissive).unwrap_err();
    assert!(matches!(err, StoreError::Connection { .. }), "{err:?}");
}

#[test]
fn writes_before_schema_fail_as_write_errors() {
    let conn = open_store_in_memory(ReferencePolicy::Permissive).unwrap();
    let err = insert_venue(&conn, &main_hall()).unwrap_err();
    assert!(matches!(err, StoreError::Write { .. }));
    assert_eq!(err.to_string(), "failed to insert venue");
}

#[test]
fn ensure_schema_on_a_read_only_store_fails_before_any_table_exists() {
    let conn = open_store_in_memory(ReferencePolicy::Permissive).unwrap();
    conn.execute_batch("PRAGMA query_only = ON;").unwrap();

    let err = ensure_schema(&conn).unwrap_err();
    assert!(
        matches!(err, StoreError::Schema { table: "Events", .. }),
        "{err:?}"
    );
    assert_eq!(err.to_string(), "failed to create Events table");

    for table in ["Events", "Venues", "Tasks"] {
        assert!(!table_exists(&conn, table).unwrap(), "{table} should not exist");
    }
}
