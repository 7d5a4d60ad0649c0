//! Event planner: record events, venues, and tasks in a local SQLite file and
//! browse them in a terminal UI.
//!
//! The persistence layer in [`db`] is usable on its own; the binary wires it
//! to [`config`], [`logging`], and the [`ui`].

pub mod config;
pub mod db;
pub mod logging;
pub mod models;
pub mod ui;

pub use config::{Cli, Config};
pub use db::{
    ensure_schema, fetch_events, fetch_tasks, fetch_venues, insert_event, insert_task,
    insert_venue, open_store, open_store_in_memory, update_task_status, ReferencePolicy,
    StoreError, StoreResult,
};
pub use models::{
    format_event_time, Event, NewEvent, NewTask, NewVenue, Task, TaskStatus, Venue,
};
pub use ui::{run_app, App};
