use log::{debug, error};
use rusqlite::{params, Connection};

use super::error::{StoreError, StoreResult};
use crate::models::{NewVenue, Venue};

/// Append one venue and return its id. Capacity is written as given.
pub fn insert_venue(conn: &Connection, venue: &NewVenue) -> StoreResult<i64> {
    conn.execute(
        "INSERT INTO Venues (name, capacity, facilities, pricing, availability)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            venue.name,
            venue.capacity,
            venue.facilities,
            venue.pricing,
            venue.availability,
        ],
    )
    .map_err(|err| {
        error!("event=insert_venue module=db status=error error={}", err);
        StoreError::write("insert venue")(err)
    })?;

    let id = conn.last_insert_rowid();
    debug!("event=insert_venue module=db status=ok id={}", id);
    Ok(id)
}

/// Every venue in storage order. NULL text reads as empty, NULL availability
/// as `false`.
pub fn fetch_venues(conn: &Connection) -> StoreResult<Vec<Venue>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, COALESCE(name, ''), capacity, COALESCE(facilities, ''),
                    COALESCE(pricing, ''), COALESCE(availability, 0)
             FROM Venues",
        )
        .map_err(StoreError::read("Venues"))?;

    let venues = stmt
        .query_map([], |row| {
            Ok(Venue {
                id: row.get(0)?,
                name: row.get(1)?,
                capacity: row.get(2)?,
                facilities: row.get(3)?,
                pricing: row.get(4)?,
                availability: row.get(5)?,
            })
        })
        .map_err(StoreError::read("Venues"))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(StoreError::read("Venues"))?;

    Ok(venues)
}
