use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::internal_error::InternalResult;

use super::data::*;

const SETTINGS_COLUMNS: &str = "id, user_phone, send_daily, daily_time, send_evening, \
                                evening_time, created_at, updated_at";

fn get_settings_from_row(row: &Row) -> rusqlite::Result<NotificationSettings> {
    Ok(NotificationSettings {
        id: row.get(0)?,
        phone_number: row.get(1)?,
        send_daily: row.get(2)?,
        daily_time: row.get(3)?,
        send_evening: row.get(4)?,
        evening_time: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

fn find_settings(db_connection: &Connection) -> InternalResult<Option<NotificationSettings>> {
    let settings = db_connection
        .query_row(
            &format!(
                "SELECT {} FROM notification_settings ORDER BY id LIMIT 1",
                SETTINGS_COLUMNS
            ),
            params![],
            get_settings_from_row,
        )
        .optional()?;

    Ok(settings)
}

/// Returns the settings row, creating it with the column defaults
/// (daily 08:00 and evening 19:00, both enabled) on first access.
pub fn get_notification_settings_from_db(
    default_phone: &str,
    now: NaiveDateTime,
    db_connection: &Connection,
) -> InternalResult<NotificationSettings> {
    if let Some(settings) = find_settings(db_connection)? {
        return Ok(settings);
    }

    db_connection.execute(
        "INSERT INTO notification_settings (user_phone, created_at, updated_at)
         VALUES (?1, ?2, ?2)",
        params![default_phone, now],
    )?;

    get_notification_settings_from_db(default_phone, now, db_connection)
}

pub fn save_notification_settings_in_db(
    request: &SaveSettingsRequest,
    now: NaiveDateTime,
    db_connection: &Connection,
) -> InternalResult<NotificationSettings> {
    let phone_number = request.phone_number.trim();

    match find_settings(db_connection)? {
        Some(existing) => {
            db_connection.execute(
                "UPDATE notification_settings
                 SET user_phone = (?1), send_daily = (?2), daily_time = (?3),
                     send_evening = (?4), evening_time = (?5), updated_at = (?6)
                 WHERE id = (?7)",
                params![
                    phone_number,
                    request.send_daily,
                    request.daily_time,
                    request.send_evening,
                    request.evening_time,
                    now,
                    existing.id
                ],
            )?;
        }
        None => {
            db_connection.execute(
                "INSERT INTO notification_settings
                    (user_phone, send_daily, daily_time, send_evening, evening_time,
                     created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
                params![
                    phone_number,
                    request.send_daily,
                    request.daily_time,
                    request.send_evening,
                    request.evening_time,
                    now
                ],
            )?;
        }
    }

    get_notification_settings_from_db(phone_number, now, db_connection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::open_in_memory;
    use crate::tasks::recurrence::tests::date;
    use chrono::NaiveTime;

    fn now() -> NaiveDateTime {
        date(2025, 4, 22).and_hms_opt(10, 30, 0).unwrap()
    }

    #[test]
    fn first_read_creates_defaults() {
        let db = open_in_memory();

        let settings = get_notification_settings_from_db("+15550001111", now(), &db).unwrap();

        assert_eq!(settings.phone_number, "+15550001111");
        assert!(settings.send_daily);
        assert_eq!(settings.daily_time, NaiveTime::from_hms_opt(8, 0, 0).unwrap());
        assert!(settings.send_evening);
        assert_eq!(settings.evening_time, NaiveTime::from_hms_opt(19, 0, 0).unwrap());

        let again = get_notification_settings_from_db("+19998887777", now(), &db).unwrap();
        assert_eq!(again, settings);
    }

    #[test]
    fn saving_updates_the_singleton_in_place() {
        let db = open_in_memory();
        let created = get_notification_settings_from_db("", now(), &db).unwrap();

        let request = SaveSettingsRequest {
            phone_number: " +447700900123 ".to_string(),
            send_daily: false,
            daily_time: NaiveTime::from_hms_opt(7, 15, 0).unwrap(),
            send_evening: true,
            evening_time: NaiveTime::from_hms_opt(20, 45, 0).unwrap(),
        };
        let later = now() + chrono::Duration::minutes(5);
        let saved = save_notification_settings_in_db(&request, later, &db).unwrap();

        assert_eq!(saved.id, created.id);
        assert_eq!(saved.phone_number, "+447700900123");
        assert!(!saved.send_daily);
        assert_eq!(saved.daily_time, request.daily_time);
        assert_eq!(saved.evening_time, request.evening_time);
        assert_eq!(saved.created_at, now());
        assert_eq!(saved.updated_at, later);

        let rows: i64 = db
            .query_row("SELECT COUNT(*) FROM notification_settings", params![], |r| {
                r.get(0)
            })
            .unwrap();
        assert_eq!(rows, 1);
    }
}
