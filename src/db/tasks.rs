use log::{debug, error};
use rusqlite::{params, Connection};

use super::error::{StoreError, StoreResult};
use crate::models::{NewTask, Task};

/// Append one task and return its id. `completed` is stored as passed; the UI
/// always creates tasks pending.
pub fn insert_task(conn: &Connection, task: &NewTask) -> StoreResult<i64> {
    conn.execute(
        "INSERT INTO Tasks (event_id, task_name, deadline, responsibility, completed)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            task.event_id,
            task.name,
            task.deadline,
            task.responsibility,
            task.completed,
        ],
    )
    .map_err(|err| {
        error!("event=insert_task module=db status=error error={}", err);
        StoreError::write("insert task")(err)
    })?;

    let id = conn.last_insert_rowid();
    debug!("event=insert_task module=db status=ok id={}", id);
    Ok(id)
}

/// Overwrite the `completed` flag of one task. An unknown id touches no rows
/// and still succeeds; the number of rows changed is returned for callers
/// that care.
pub fn update_task_status(conn: &Connection, task_id: i64, completed: bool) -> StoreResult<usize> {
    let updated = conn
        .execute(
            "UPDATE Tasks SET completed = ?1 WHERE id = ?2",
            params![completed, task_id],
        )
        .map_err(|err| {
            error!(
                "event=update_task_status module=db status=error id={} error={}",
                task_id, err
            );
            StoreError::write("update task status")(err)
        })?;

    debug!(
        "event=update_task_status module=db status=ok id={} completed={} rows={}",
        task_id, completed, updated
    );
    Ok(updated)
}

/// Every task in storage order. NULL text reads as empty, NULL `completed` as
/// pending.
pub fn fetch_tasks(conn: &Connection) -> StoreResult<Vec<Task>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, event_id, COALESCE(task_name, ''), deadline,
                    COALESCE(responsibility, ''), COALESCE(completed, 0)
             FROM Tasks",
        )
        .map_err(StoreError::read("Tasks"))?;

    let tasks = stmt
        .query_map([], |row| {
            Ok(Task {
                id: row.get(0)?,
                event_id: row.get(1)?,
                name: row.get(2)?,
                deadline: row.get(3)?,
                responsibility: row.get(4)?,
                completed: row.get(5)?,
            })
        })
        .map_err(StoreError::read("Tasks"))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(StoreError::read("Tasks"))?;

    Ok(tasks)
}
