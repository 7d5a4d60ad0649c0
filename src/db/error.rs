use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failures surfaced by the persistence layer. Each variant keeps the
/// underlying SQLite error as its source so callers can walk the chain.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database file could not be created or opened.
    #[error("failed to open store at {path}")]
    Connection {
        path: String,
        #[source]
        source: rusqlite::Error,
    },

    /// Schema setup failed. Nothing else should run against the store.
    #[error("failed to create {table} table")]
    Schema {
        table: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    /// An insert or update was rejected.
    #[error("failed to {operation}")]
    Write {
        operation: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    /// A full-table scan failed.
    #[error("failed to load {table}")]
    Read {
        table: &'static str,
        #[source]
        source: rusqlite::Error,
    },
}

impl StoreError {
    pub(crate) fn write(operation: &'static str) -> impl FnOnce(rusqlite::Error) -> Self {
        move |source| StoreError::Write { operation, source }
    }

    pub(crate) fn read(table: &'static str) -> impl FnOnce(rusqlite::Error) -> Self {
        move |source| StoreError::Read { table, source }
    }

    pub(crate) fn schema(table: &'static str) -> impl FnOnce(rusqlite::Error) -> Self {
        move |source| StoreError::Schema { table, source }
    }

    /// True when SQLite rejected the statement because of a constraint,
    /// which includes foreign keys under the enforced policy.
    pub fn is_constraint_violation(&self) -> bool {
        let source = match self {
            StoreError::Connection { source, .. }
            | StoreError::Schema { source, .. }
            | StoreError::Write { source, .. }
            | StoreError::Read { source, .. } => source,
        };
        matches!(
            source.sqlite_error_code(),
            Some(rusqlite::ErrorCode::ConstraintViolation)
        )
    }
}
