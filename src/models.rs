//! Domain models that mirror the SQLite schema. Row types (`Event`, `Venue`,
//! `Task`) are what the full-table reads hand back; the `New*` payloads are
//! what the record writers accept. They stay plain data holders so the UI can
//! re-read them on every display cycle without caring about ownership.

use std::fmt;

use chrono::{NaiveDate, NaiveTime};

/// Textual layout used for `Events.event_time`. Existing stores depend on this
/// exact shape, so every writer goes through [`format_event_time`].
pub const EVENT_TIME_FORMAT: &str = "%H:%M:%S";

/// Serialize a time-of-day as zero-padded 24-hour `HH:MM:SS`. Fractional
/// seconds are dropped.
pub fn format_event_time(time: NaiveTime) -> String {
    time.format(EVENT_TIME_FORMAT).to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One row of the `Events` table as read back from the store.
pub struct Event {
    pub id: i64,
    pub name: String,
    pub date: NaiveDate,
    /// Stored text, already in `HH:MM:SS` form.
    pub time: String,
    /// Logical reference to `Venues.id`. Only checked when the connection was
    /// opened with [`crate::db::ReferencePolicy::Enforced`].
    pub venue_id: Option<i64>,
    pub agenda: String,
    pub goals: String,
    /// Free-form list kept as a single string, e.g. `"Alice, Bob"`.
    pub collaborators: String,
}

impl fmt::Display for Event {
    /// `Name (date)` is what the task form shows when picking an event.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.date)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Field values for a new event. Text fields are stored verbatim.
pub struct NewEvent {
    pub name: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub venue_id: Option<i64>,
    pub agenda: String,
    pub goals: String,
    pub collaborators: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One row of the `Venues` table.
pub struct Venue {
    pub id: i64,
    pub name: String,
    pub capacity: i64,
    pub facilities: String,
    pub pricing: String,
    pub availability: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Field values for a new venue. Capacity is not re-validated here; the input
/// layer enforces the minimum of one.
pub struct NewVenue {
    pub name: String,
    pub capacity: i64,
    pub facilities: String,
    pub pricing: String,
    pub availability: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One row of the `Tasks` table.
pub struct Task {
    pub id: i64,
    pub event_id: i64,
    pub name: String,
    pub deadline: NaiveDate,
    pub responsibility: String,
    pub completed: bool,
}

impl Task {
    pub fn status(&self) -> TaskStatus {
        TaskStatus::from_completed(self.completed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Field values for a new task.
pub struct NewTask {
    pub event_id: i64,
    pub name: String,
    pub deadline: NaiveDate,
    pub responsibility: String,
    pub completed: bool,
}

impl NewTask {
    /// Build a task in the `Pending` state, which is how every task created
    /// from the UI starts out.
    pub fn pending(
        event_id: i64,
        name: impl Into<String>,
        deadline: NaiveDate,
        responsibility: impl Into<String>,
    ) -> Self {
        Self {
            event_id,
            name: name.into(),
            deadline,
            responsibility: responsibility.into(),
            completed: false,
        }
    }
}

/// The two states a task moves between. There is no terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    Completed,
}

impl TaskStatus {
    pub fn from_completed(completed: bool) -> Self {
        if completed {
            TaskStatus::Completed
        } else {
            TaskStatus::Pending
        }
    }

    pub fn is_completed(self) -> bool {
        matches!(self, TaskStatus::Completed)
    }

    pub fn toggled(self) -> Self {
        match self {
            TaskStatus::Pending => TaskStatus::Completed,
            TaskStatus::Completed => TaskStatus::Pending,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "Pending"),
            TaskStatus::Completed => write!(f, "Completed"),
        }
    }
}
