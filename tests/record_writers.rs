use chrono::{NaiveDate, NaiveTime};
use event_planner::db::{
    ensure_schema, fetch_events, fetch_tasks, fetch_venues, insert_event, insert_task,
    insert_venue, open_store_in_memory, update_task_status, ReferencePolicy, StoreError,
};
use event_planner::{NewEvent, NewTask, NewVenue, TaskStatus};
use rusqlite::Connection;

fn store(policy: ReferencePolicy) -> Connection {
    let conn = open_store_in_memory(policy).unwrap();
    ensure_schema(&conn).unwrap();
    conn
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn kickoff(venue_id: Option<i64>) -> NewEvent {
    NewEvent {
        name: "Kickoff".to_string(),
        date: date(2024, 5, 1),
        time: NaiveTime::from_hms_opt(14, 5, 0).unwrap(),
        venue_id,
        agenda: "Intro; Demo".to_string(),
        goals: "Align team".to_string(),
        collaborators: "Alice, Bob".to_string(),
    }
}

fn venue(name: &str, capacity: i64, availability: bool) -> NewVenue {
    NewVenue {
        name: name.to_string(),
        capacity,
        facilities: "Projector, Wifi".to_string(),
        pricing: "$500/day".to_string(),
        availability,
    }
}

#[test]
fn event_time_is_stored_as_hh_mm_ss_text() {
    let conn = store(ReferencePolicy::Permissive);
    let id = insert_event(&conn, &kickoff(Some(1))).unwrap();

    let raw: String = conn
        .query_row("SELECT event_time FROM Events WHERE id = ?1", [id], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(raw, "14:05:00");
}

#[test]
fn event_round_trips_other_fields_verbatim() {
    let conn = store(ReferencePolicy::Permissive);
    let mut event = kickoff(Some(1));
    event.name = "  padded name ".to_string();
    event.goals = String::new();
    event.time = NaiveTime::from_hms_milli_opt(9, 7, 3, 400).unwrap();
    let id = insert_event(&conn, &event).unwrap();

    let events = fetch_events(&conn).unwrap();
    assert_eq!(events.len(), 1);
    let stored = &events[0];
    assert_eq!(stored.id, id);
    assert_eq!(stored.name, "  padded name ");
    assert_eq!(stored.date, date(2024, 5, 1));
    assert_eq!(stored.time, "09:07:03");
    assert_eq!(stored.venue_id, Some(1));
    assert_eq!(stored.agenda, "Intro; Demo");
    assert_eq!(stored.goals, "");
    assert_eq!(stored.collaborators, "Alice, Bob");
}

#[test]
fn event_without_venue_stores_null() {
    let conn = store(ReferencePolicy::Enforced);
    insert_event(&conn, &kickoff(None)).unwrap();
    assert_eq!(fetch_events(&conn).unwrap()[0].venue_id, None);
}

#[test]
fn venue_example_reads_back_exactly() {
    let conn = store(ReferencePolicy::Permissive);
    insert_venue(&conn, &venue("Main Hall", 200, true)).unwrap();

    let venues = fetch_venues(&conn).unwrap();
    assert_eq!(venues.len(), 1);
    let hall = &venues[0];
    assert_eq!(hall.name, "Main Hall");
    assert_eq!(hall.capacity, 200);
    assert_eq!(hall.facilities, "Projector, Wifi");
    assert_eq!(hall.pricing, "$500/day");
    assert!(hall.availability);
}

#[test]
fn venue_capacity_is_not_truncated_or_revalidated() {
    let conn = store(ReferencePolicy::Permissive);
    insert_venue(&conn, &venue("Stadium", 5_000_000_000, false)).unwrap();
    insert_venue(&conn, &venue("Closet", 0, true)).unwrap();

    let venues = fetch_venues(&conn).unwrap();
    assert_eq!(venues[0].capacity, 5_000_000_000);
    assert!(!venues[0].availability);
    assert_eq!(venues[1].capacity, 0);
    assert!(venues[1].availability);
}

#[test]
fn ids_are_fresh_and_reads_follow_insertion_order() {
    let conn = store(ReferencePolicy::Permissive);
    let first = insert_venue(&conn, &venue("A", 1, true)).unwrap();
    let second = insert_venue(&conn, &venue("B", 2, true)).unwrap();
    let third = insert_venue(&conn, &venue("C", 3, true)).unwrap();
    assert!(first < second && second < third);

    let names: Vec<String> = fetch_venues(&conn)
        .unwrap()
        .into_iter()
        .map(|v| v.name)
        .collect();
    assert_eq!(names, ["A", "B", "C"]);
}

#[test]
fn task_status_is_overwritten_not_merged() {
    let conn = store(ReferencePolicy::Permissive);
    let event_id = insert_event(&conn, &kickoff(None)).unwrap();
    let task = NewTask::pending(event_id, "Book caterer", date(2024, 4, 20), "Alice");
    let id = insert_task(&conn, &task).unwrap();
    assert_eq!(fetch_tasks(&conn).unwrap()[0].status(), TaskStatus::Pending);

    assert_eq!(update_task_status(&conn, id, true).unwrap(), 1);
    assert!(fetch_tasks(&conn).unwrap()[0].completed);

    update_task_status(&conn, id, false).unwrap();
    let tasks = fetch_tasks(&conn).unwrap();
    assert!(!tasks[0].completed);
    assert_eq!(tasks[0].deadline, date(2024, 4, 20));
    assert_eq!(tasks[0].responsibility, "Alice");
}

#[test]
fn insert_task_stores_completed_flag_as_given() {
    let conn = store(ReferencePolicy::Permissive);
    let mut task = NewTask::pending(1, "Already done", date(2024, 4, 1), "Bob");
    task.completed = true;
    insert_task(&conn, &task).unwrap();
    assert_eq!(fetch_tasks(&conn).unwrap()[0].status(), TaskStatus::Completed);
}

#[test]
fn updating_a_missing_task_is_a_silent_noop() {
    let conn = store(ReferencePolicy::Permissive);
    let id = insert_task(
        &conn,
        &NewTask::pending(1, "Keep me", date(2024, 4, 1), "Bob"),
    )
    .unwrap();

    assert_eq!(update_task_status(&conn, id + 100, true).unwrap(), 0);

    let tasks = fetch_tasks(&conn).unwrap();
    assert_eq!(tasks.len(), 1);
    assert!(!tasks[0].completed);
}

#[test]
fn permissive_policy_accepts_orphan_references() {
    let conn = store(ReferencePolicy::Permissive);
    insert_event(&conn, &kickoff(Some(42))).unwrap();
    insert_task(&conn, &NewTask::pending(99, "Orphan", date(2024, 4, 1), "Eve")).unwrap();

    assert_eq!(fetch_events(&conn).unwrap()[0].venue_id, Some(42));
    assert_eq!(fetch_tasks(&conn).unwrap()[0].event_id, 99);
}

#[test]
fn enforced_policy_rejects_orphan_references() {
    let conn = store(ReferencePolicy::Enforced);

    let err = insert_event(&conn, &kickoff(Some(42))).unwrap_err();
    assert!(matches!(err, StoreError::Write { .. }));
    assert!(err.is_constraint_violation());

    let err = insert_task(&conn, &NewTask::pending(99, "Orphan", date(2024, 4, 1), "Eve"))
        .unwrap_err();
    assert!(err.is_constraint_violation());

    assert!(fetch_events(&conn).unwrap().is_empty());
    assert!(fetch_tasks(&conn).unwrap().is_empty());
}

#[test]
fn enforced_policy_accepts_valid_references() {
    let conn = store(ReferencePolicy::Enforced);
    let venue_id = insert_venue(&conn, &venue("Main Hall", 200, true)).unwrap();
    let event_id = insert_event(&conn, &kickoff(Some(venue_id))).unwrap();
    insert_task(
        &conn,
        &NewTask::pending(event_id, "Book caterer", date(2024, 4, 20), "Alice"),
    )
    .unwrap();

    assert_eq!(fetch_tasks(&conn).unwrap()[0].event_id, event_id);
}

#[test]
fn null_text_and_flags_read_back_as_empty_and_false() {
    let conn = store(ReferencePolicy::Permissive);
    conn.execute_batch(
        "INSERT INTO Events (event_date) VALUES ('2024-05-01');
         INSERT INTO Venues (capacity) VALUES (10);
         INSERT INTO Tasks (event_id, deadline) VALUES (1, '2024-04-20');",
    )
    .unwrap();

    let event = &fetch_events(&conn).unwrap()[0];
    assert_eq!(event.name, "");
    assert_eq!(event.time, "");
    assert_eq!(event.venue_id, None);
    assert_eq!(event.collaborators, "");

    let venue = &fetch_venues(&conn).unwrap()[0];
    assert_eq!(venue.name, "");
    assert_eq!(venue.capacity, 10);
    assert!(!venue.availability);

    let task = &fetch_tasks(&conn).unwrap()[0];
    assert_eq!(task.name, "");
    assert_eq!(task.responsibility, "");
    assert_eq!(task.status(), TaskStatus::Pending);
}
