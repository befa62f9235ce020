use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::internal_error::{InternalError, InternalResult};
use crate::tasks::data::TaskStatus;

use super::data::*;

/// Weekly: Monday through Sunday of the week containing `date`.
/// Monthly: first through last day of the calendar month.
pub fn period_window(period: GoalPeriod, date: NaiveDate) -> PeriodWindow {
    match period {
        GoalPeriod::Weekly => {
            let start = date - Duration::days(i64::from(date.weekday().num_days_from_monday()));
            PeriodWindow {
                start,
                end: start + Duration::days(6),
            }
        }
        GoalPeriod::Monthly => {
            let start = date - Duration::days(i64::from(date.day0()));
            let mut end = start + Duration::days(27);
            while (end + Duration::days(1)).month() == start.month() {
                end = end + Duration::days(1);
            }
            PeriodWindow { start, end }
        }
    }
}

/// Share of the target reached, clamped to `[0, 1]`.
pub fn goal_progress(completed: u32, target: u32) -> f64 {
    if target == 0 {
        return 0.0;
    }
    (f64::from(completed) / f64::from(target)).min(1.0)
}

pub fn goal_standing(progress: f64) -> GoalStanding {
    if progress >= 1.0 {
        GoalStanding::Achieved
    } else if progress >= 0.5 {
        GoalStanding::OnTrack
    } else {
        GoalStanding::Behind
    }
}

fn get_goal_from_row(row: &Row) -> rusqlite::Result<Goal> {
    Ok(Goal {
        id: row.get(0)?,
        period: row.get(1)?,
        target_count: row.get(2)?,
        start_date: row.get(3)?,
        end_date: row.get(4)?,
        created_at: row.get(5)?,
    })
}

pub fn get_goal_for_window_from_db(
    period: GoalPeriod,
    window: PeriodWindow,
    db_connection: &Connection,
) -> InternalResult<Option<Goal>> {
    let goal = db_connection
        .query_row(
            "SELECT id, period, target_count, start_date, end_date, created_at FROM goals
             WHERE period = (?1) AND start_date = (?2) AND end_date = (?3)",
            params![period, window.start, window.end],
            get_goal_from_row,
        )
        .optional()?;

    Ok(goal)
}

pub fn get_current_goal_from_db(
    period: GoalPeriod,
    today: NaiveDate,
    db_connection: &Connection,
) -> InternalResult<Option<Goal>> {
    get_goal_for_window_from_db(period, period_window(period, today), db_connection)
}

/// Creates the goal for the current window, or updates its target if one
/// already exists.
pub fn save_goal_in_db(
    period: GoalPeriod,
    target_count: u32,
    today: NaiveDate,
    created_at: NaiveDateTime,
    db_connection: &Connection,
) -> InternalResult<Goal> {
    if !(1..=MAX_TARGET).contains(&target_count) {
        return Err(InternalError::validation(format!(
            "Target must be between 1 and {}",
            MAX_TARGET
        )));
    }

    let window = period_window(period, today);
    match get_goal_for_window_from_db(period, window, db_connection)? {
        Some(existing) => {
            db_connection.execute(
                "UPDATE goals SET target_count = (?1) WHERE id = (?2)",
                params![target_count, existing.id],
            )?;
        }
        None => {
            db_connection.execute(
                "INSERT INTO goals (period, target_count, start_date, end_date, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![period, target_count, window.start, window.end, created_at],
            )?;
        }
    }

    get_goal_for_window_from_db(period, window, db_connection)?
        .ok_or_else(|| InternalError::from("Goal missing after save"))
}

/// Completed tasks whose completion date falls inside `window`.
pub fn get_completed_count_from_db(
    window: PeriodWindow,
    db_connection: &Connection,
) -> InternalResult<u32> {
    let count: u32 = db_connection.query_row(
        "SELECT COUNT(*) FROM tasks WHERE status = (?1) AND completed_at BETWEEN (?2) AND (?3)",
        params![TaskStatus::Completed, window.start, window.end],
        |row| row.get(0),
    )?;

    Ok(count)
}

pub fn get_goal_view(
    period: GoalPeriod,
    today: NaiveDate,
    motivation: &str,
    db_connection: &Connection,
) -> InternalResult<GoalView> {
    let window = period_window(period, today);
    let goal = get_goal_for_window_from_db(period, window, db_connection)?;
    let completed = get_completed_count_from_db(window, db_connection)?;

    let (progress, standing, message) = match &goal {
        Some(goal) => {
            let progress = goal_progress(completed, goal.target_count);
            let standing = goal_standing(progress);
            let message = match standing {
                GoalStanding::Achieved => "🎉 Goal achieved! Great job!".to_string(),
                GoalStanding::OnTrack => "👍 You're making good progress!".to_string(),
                GoalStanding::Behind => motivation.to_string(),
            };
            (progress, Some(standing), message)
        }
        None => (0.0, None, "No goal set for this period yet.".to_string()),
    };

    Ok(GoalView {
        period,
        window,
        suggested_target: goal.as_ref().map_or(DEFAULT_TARGET, |g| g.target_count),
        goal,
        completed,
        progress,
        standing,
        message,
    })
}
