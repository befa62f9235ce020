use chrono::{Local, NaiveDate, NaiveDateTime};
use rusqlite::types::{FromSqlError, FromSqlResult, ValueRef};
use rusqlite::{params, Connection};
use thiserror::Error;

use std::path::Path;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use crate::internal_error::InternalResult;

pub type DBConnection = Arc<Mutex<Connection>>;

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

pub fn open_database(path: impl AsRef<Path>) -> InternalResult<DBConnection> {
    let connection = Connection::open(path)?;
    create_tables(&connection)?;

    Ok(Arc::new(Mutex::new(connection)))
}

pub fn create_tables(connection: &Connection) -> InternalResult<()> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS tasks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            status TEXT NOT NULL DEFAULT 'Pending',
            priority TEXT NOT NULL DEFAULT 'Medium',
            task_type TEXT NOT NULL DEFAULT 'One-time',
            week_days TEXT,
            monthly_date INTEGER,
            end_date TEXT,
            last_completed TEXT,
            completed_at TEXT,
            created_at TEXT NOT NULL
        )",
        params![],
    )?;
    connection.execute(
        "CREATE TABLE IF NOT EXISTS goals (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            period TEXT NOT NULL DEFAULT 'Weekly',
            target_count INTEGER NOT NULL,
            start_date TEXT NOT NULL,
            end_date TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
        params![],
    )?;
    connection.execute(
        "CREATE TABLE IF NOT EXISTS notification_settings (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_phone TEXT NOT NULL DEFAULT '',
            send_daily INTEGER NOT NULL DEFAULT 1,
            daily_time TEXT NOT NULL DEFAULT '08:00:00',
            send_evening INTEGER NOT NULL DEFAULT 1,
            evening_time TEXT NOT NULL DEFAULT '19:00:00',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        params![],
    )?;

    Ok(())
}

#[cfg(test)]
pub fn open_in_memory() -> Connection {
    let connection = Connection::open_in_memory().unwrap();
    create_tables(&connection).unwrap();
    connection
}

#[derive(Debug, Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Reads a TEXT column into one of the string-backed enums.
pub fn text_enum_from_sql<T>(value: ValueRef<'_>) -> FromSqlResult<T>
where
    T: FromStr<Err = UnknownVariant>,
{
    value
        .as_str()?
        .parse()
        .map_err(|e| FromSqlError::Other(Box::new(e)))
}
