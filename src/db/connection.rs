use std::fs;
use std::path::Path;
use std::time::Instant;

use log::{error, info, warn};
use rusqlite::Connection;

use super::error::{StoreError, StoreResult};

/// Whether the declared foreign keys (`Tasks.event_id -> Events.id`,
/// `Events.venue_id -> Venues.id`) are checked on write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReferencePolicy {
    /// Keys are declared but SQLite does not check them, so orphan references
    /// are stored as given.
    #[default]
    Permissive,
    /// `PRAGMA foreign_keys = ON`; writes with dangling references fail.
    Enforced,
}

impl ReferencePolicy {
    pub fn is_enforced(self) -> bool {
        matches!(self, ReferencePolicy::Enforced)
    }
}

/// DDL for every table, in creation order. `Events` references `Venues`
/// before it exists; SQLite resolves foreign keys lazily so that is fine.
///
/// Columns are nullable to stay compatible with existing files. The writers
/// never store NULL. The reads map NULL text to `""` and NULL flags to
/// `false`, but `event_date`, `deadline`, `capacity` and `Tasks.event_id` must
/// be non-NULL for a row to be readable.
const SCHEMA: &[(&str, &str)] = &[
    (
        "Events",
        "CREATE TABLE IF NOT EXISTS Events (
            id INTEGER PRIMARY KEY,
            event_name TEXT,
            event_date DATE,
            event_time TIME,
            venue_id INTEGER,
            agenda TEXT,
            goals TEXT,
            collaborators TEXT,
            FOREIGN KEY(venue_id) REFERENCES Venues(id)
        )",
    ),
    (
        "Venues",
        "CREATE TABLE IF NOT EXISTS Venues (
            id INTEGER PRIMARY KEY,
            name TEXT,
            capacity INTEGER,
            facilities TEXT,
            pricing TEXT,
            availability BOOLEAN
        )",
    ),
    (
        "Tasks",
        "CREATE TABLE IF NOT EXISTS Tasks (
            id INTEGER PRIMARY KEY,
            event_id INTEGER,
            task_name TEXT,
            deadline DATE,
            responsibility TEXT,
            completed BOOLEAN,
            FOREIGN KEY(event_id) REFERENCES Events(id)
        )",
    ),
];

/// Open (creating if absent) the store file at `path` and apply the
/// reference policy. Missing parent directories are created first.
///
/// The file header is read before returning, so an unreadable or corrupted
/// file is reported here as [`StoreError::Connection`] rather than on the
/// first write.
pub fn open_store(path: impl AsRef<Path>, policy: ReferencePolicy) -> StoreResult<Connection> {
    let path = path.as_ref();
    let started_at = Instant::now();
    info!("event=store_open module=db status=start mode=file");

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        if let Err(err) = fs::create_dir_all(parent) {
            warn!(
                "event=store_open module=db status=warn step=create_parent error={}",
                err
            );
        }
    }

    let connection_error = |source| StoreError::Connection {
        path: path.display().to_string(),
        source,
    };

    let result = Connection::open(path)
        .and_then(|conn| configure(conn, policy))
        .map_err(connection_error);
    log_open_outcome("file", started_at, &result);
    result
}

/// In-memory variant of [`open_store`]. The data lives as long as the
/// returned connection.
pub fn open_store_in_memory(policy: ReferencePolicy) -> StoreResult<Connection> {
    let started_at = Instant::now();
    info!("event=store_open module=db status=start mode=memory");

    let result = Connection::open_in_memory()
        .and_then(|conn| configure(conn, policy))
        .map_err(|source| StoreError::Connection {
            path: ":memory:".to_string(),
            source,
        });
    log_open_outcome("memory", started_at, &result);
    result
}

/// Create the `Events`, `Venues`, and `Tasks` tables when missing. Existing
/// tables and rows are left untouched, so this runs on every startup.
pub fn ensure_schema(conn: &Connection) -> StoreResult<()> {
    for &(table, ddl) in SCHEMA {
        conn.execute(ddl, []).map_err(StoreError::schema(table))?;
    }
    info!(
        "event=ensure_schema module=db status=ok tables={}",
        SCHEMA.len()
    );
    Ok(())
}

/// Report whether a table named `name` exists in the store.
pub fn table_exists(conn: &Connection, name: &str) -> StoreResult<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
        [name],
        |row| row.get(0),
    )
    .map_err(StoreError::read("sqlite_master"))
}

fn configure(conn: Connection, policy: ReferencePolicy) -> rusqlite::Result<Connection> {
    // Forces SQLite to read the header.
    conn.query_row("SELECT COUNT(*) FROM sqlite_master", [], |row| {
        row.get::<_, i64>(0)
    })?;
    if policy.is_enforced() {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    } else {
        conn.execute_batch("PRAGMA foreign_keys = OFF;")?;
    }
    Ok(conn)
}

fn log_open_outcome(mode: &str, started_at: Instant, result: &StoreResult<Connection>) {
    let duration_ms = started_at.elapsed().as_millis();
    match result {
        Ok(_) => info!(
            "event=store_open module=db status=ok mode={} duration_ms={}",
            mode, duration_ms
        ),
        Err(err) => error!(
            "event=store_open module=db status=error mode={} duration_ms={} error={}",
            mode,
            duration_ms,
            std::error::Error::source(err)
                .map(|cause| cause.to_string())
                .unwrap_or_else(|| err.to_string())
        ),
    }
}
