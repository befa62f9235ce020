use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::internal_error::{InternalError, InternalResult};

use super::data::*;

const TASK_COLUMNS: &str = "id, title, description, status, priority, task_type, week_days, \
                            monthly_date, end_date, last_completed, completed_at, created_at";

pub fn get_task_from_row(row: &Row) -> rusqlite::Result<Task> {
    let task_type: String = row.get(5)?;
    let recurrence = Recurrence::from_columns(&task_type, row.get(6)?, row.get(7)?, row.get(8)?)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?;

    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        status: row.get(3)?,
        priority: row.get(4)?,
        recurrence,
        last_completed: row.get(9)?,
        completed_at: row.get(10)?,
        created_at: row.get(11)?,
    })
}

/// Checks a submitted form and returns it with the title trimmed and the
/// weekday set normalized.
pub fn validate_task_form(form: TaskForm) -> InternalResult<TaskForm> {
    let title = form.title.trim().to_string();
    if title.is_empty() {
        return Err(InternalError::validation("Title is required"));
    }

    if let Recurrence::Monthly { day } = form.recurrence {
        if !(1..=31).contains(&day) {
            return Err(InternalError::validation(
                "Day of month must be between 1 and 31",
            ));
        }
    }

    Ok(TaskForm {
        title,
        recurrence: form.recurrence.normalized(),
        ..form
    })
}

pub fn add_task_to_db(
    form: TaskForm,
    created_at: NaiveDateTime,
    db_connection: &Connection,
) -> InternalResult<AddTaskResult> {
    let form = validate_task_form(form)?;
    let (task_type, week_days, monthly_date, end_date) = form.recurrence.to_columns();

    db_connection.execute(
        "INSERT INTO tasks
            (title, description, status, priority, task_type, week_days, monthly_date,
             end_date, last_completed, completed_at, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, NULL, NULL, ?9)",
        params![
            form.title,
            form.description,
            TaskStatus::Pending,
            form.priority,
            task_type,
            week_days,
            monthly_date,
            end_date,
            created_at
        ],
    )?;

    Ok(AddTaskResult {
        task_id: db_connection.last_insert_rowid(),
    })
}

/// All tasks, newest first.
pub fn get_all_tasks_from_db(db_connection: &Connection) -> InternalResult<Vec<Task>> {
    let mut statement = db_connection.prepare(&format!(
        "SELECT {} FROM tasks ORDER BY created_at DESC, id DESC",
        TASK_COLUMNS
    ))?;

    let rows = statement.query_map(params![], get_task_from_row)?;

    let mut tasks = vec![];
    for row_result in rows {
        tasks.push(row_result?);
    }

    Ok(tasks)
}

pub fn get_task_from_db(task_id: TaskID, db_connection: &Connection) -> InternalResult<Task> {
    db_connection
        .query_row(
            &format!("SELECT {} FROM tasks WHERE id = (?1)", TASK_COLUMNS),
            params![task_id],
            get_task_from_row,
        )
        .optional()?
        .ok_or_else(|| InternalError::NotFound(format!("Task {}", task_id)))
}

/// Replaces the editable fields. Status and completion dates are kept.
pub fn edit_task_in_db(
    task_id: TaskID,
    form: TaskForm,
    db_connection: &Connection,
) -> InternalResult<()> {
    let form = validate_task_form(form)?;
    let (task_type, week_days, monthly_date, end_date) = form.recurrence.to_columns();

    let changed = db_connection.execute(
        "UPDATE tasks
         SET title = (?1), description = (?2), priority = (?3),
             task_type = (?4), week_days = (?5), monthly_date = (?6), end_date = (?7)
         WHERE id = (?8)",
        params![
            form.title,
            form.description,
            form.priority,
            task_type,
            week_days,
            monthly_date,
            end_date,
            task_id
        ],
    )?;
    ensure_changed(changed, task_id)
}

/// Writes `status`; both completion dates are set to `completed_on`, so
/// passing `None` clears them.
pub fn set_task_status_in_db(
    task_id: TaskID,
    status: TaskStatus,
    completed_on: Option<NaiveDate>,
    db_connection: &Connection,
) -> InternalResult<()> {
    let changed = db_connection.execute(
        "UPDATE tasks SET status = (?1), last_completed = (?2), completed_at = (?2) WHERE id = (?3)",
        params![status, completed_on, task_id],
    )?;
    ensure_changed(changed, task_id)
}

pub fn toggle_task_status_in_db(
    task_id: TaskID,
    today: NaiveDate,
    db_connection: &Connection,
) -> InternalResult<TaskStatus> {
    let task = get_task_from_db(task_id, db_connection)?;

    let status = task.status.toggled();
    let completed_on = match status {
        TaskStatus::Completed => Some(today),
        TaskStatus::Pending => None,
    };
    set_task_status_in_db(task_id, status, completed_on, db_connection)?;

    Ok(status)
}

pub fn reset_task_in_db(task_id: TaskID, db_connection: &Connection) -> InternalResult<()> {
    let task = get_task_from_db(task_id, db_connection)?;
    if !task.recurrence.is_recurring() {
        return Err(InternalError::validation(
            "Only recurring tasks can be reset",
        ));
    }

    set_task_status_in_db(task_id, TaskStatus::Pending, None, db_connection)
}

pub fn delete_task_from_db(task_id: TaskID, db_connection: &Connection) -> InternalResult<()> {
    let changed = db_connection.execute("DELETE FROM tasks WHERE id = (?1)", params![task_id])?;
    ensure_changed(changed, task_id)
}

fn ensure_changed(changed: usize, task_id: TaskID) -> InternalResult<()> {
    if changed == 0 {
        return Err(InternalError::NotFound(format!("Task {}", task_id)));
    }
    Ok(())
}
