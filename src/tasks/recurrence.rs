//! Due-date rules for one-time and recurring tasks.
//!
//! Everything here is recomputed from a task's recurrence fields and a
//! reference date. No occurrences are stored.

use chrono::{Datelike, NaiveDate};

use super::data::{Recurrence, Task};

impl Recurrence {
    /// Whether a task with this recurrence falls on `date`.
    ///
    /// A monthly day that does not exist in the month (the 31st in April)
    /// never matches; the day is not moved to the end of the month.
    pub fn occurs_on(&self, date: NaiveDate) -> bool {
        match self {
            Recurrence::OneTime { due_date } => *due_date == Some(date),
            Recurrence::Daily => true,
            Recurrence::Weekly { days } => days.contains(&date.weekday()),
            Recurrence::Monthly { day } => date.day() == *day,
        }
    }
}

pub fn is_active_on(task: &Task, date: NaiveDate) -> bool {
    task.recurrence.occurs_on(date)
}

/// Pending one-time tasks past their due date, and pending recurring tasks
/// that were not completed on `today`.
pub fn is_overdue(task: &Task, today: NaiveDate) -> bool {
    if !task.is_pending() {
        return false;
    }

    match task.recurrence {
        Recurrence::OneTime { due_date } => due_date.map_or(false, |due| due < today),
        _ => task.last_completed != Some(today),
    }
}

pub fn active_tasks(tasks: &[Task], date: NaiveDate) -> Vec<&Task> {
    tasks.iter().filter(|t| is_active_on(t, date)).collect()
}
