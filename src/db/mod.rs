//! Persistence layer over a single SQLite file, split per table. Every writer
//! runs one statement in autocommit mode, so a returned id means the row is
//! already committed.

mod connection;
mod error;
mod events;
mod tasks;
mod venues;

pub use connection::{
    ensure_schema, open_store, open_store_in_memory, table_exists, ReferencePolicy,
};
pub use error::{StoreError, StoreResult};
pub use events::{fetch_events, insert_event};
pub use tasks::{fetch_tasks, insert_task, update_task_status};
pub use venues::{fetch_venues, insert_venue};
