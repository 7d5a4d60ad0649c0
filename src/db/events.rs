use log::{debug, error};
use rusqlite::{params, Connection};

use super::error::{StoreError, StoreResult};
use crate::models::{format_event_time, Event, NewEvent};

/// Append one event and return its store-assigned id. The time is written in
/// `HH:MM:SS` form; every other field is stored exactly as given.
pub fn insert_event(conn: &Connection, event: &NewEvent) -> StoreResult<i64> {
    conn.execute(
        "INSERT INTO Events (event_name, event_date, event_time, venue_id, agenda, goals, collaborators)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            event.name,
            event.date,
            format_event_time(event.time),
            event.venue_id,
            event.agenda,
            event.goals,
            event.collaborators,
        ],
    )
    .map_err(|err| {
        error!("event=insert_event module=db status=error error={}", err);
        StoreError::write("insert event")(err)
    })?;

    let id = conn.last_insert_rowid();
    debug!("event=insert_event module=db status=ok id={}", id);
    Ok(id)
}

/// Every event in storage order. NULL text columns read back as empty strings.
pub fn fetch_events(conn: &Connection) -> StoreResult<Vec<Event>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, COALESCE(event_name, ''), event_date, COALESCE(event_time, ''), venue_id,
                    COALESCE(agenda, ''), COALESCE(goals, ''), COALESCE(collaborators, '')
             FROM Events",
        )
        .map_err(StoreError::read("Events"))?;

    let events = stmt
        .query_map([], |row| {
            Ok(Event {
                id: row.get(0)?,
                name: row.get(1)?,
                date: row.get(2)?,
                time: row.get(3)?,
                venue_id: row.get(4)?,
                agenda: row.get(5)?,
                goals: row.get(6)?,
                collaborators: row.get(7)?,
            })
        })
        .map_err(StoreError::read("Events"))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(StoreError::read("Events"))?;

    Ok(events)
}
