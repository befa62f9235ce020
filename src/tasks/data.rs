use chrono::{NaiveDate, NaiveDateTime, Weekday};
use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

use std::str::FromStr;

use crate::data::{text_enum_from_sql, UnknownVariant};

pub type TaskID = i64;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    Completed,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::Completed => "Completed",
        }
    }

    pub fn toggled(self) -> TaskStatus {
        match self {
            TaskStatus::Pending => TaskStatus::Completed,
            TaskStatus::Completed => TaskStatus::Pending,
        }
    }
}

impl FromStr for TaskStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(TaskStatus::Pending),
            "Completed" => Ok(TaskStatus::Completed),
            other => Err(UnknownVariant {
                kind: "status",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL_DESCENDING: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }

    /// Sort key, most urgent first.
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Priority::High => "red",
            Priority::Medium => "orange",
            Priority::Low => "blue",
        }
    }
}

impl FromStr for Priority {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Low" => Ok(Priority::Low),
            "Medium" => Ok(Priority::Medium),
            "High" => Ok(Priority::High),
            other => Err(UnknownVariant {
                kind: "priority",
                value: other.to_string(),
            }),
        }
    }
}

impl ToSql for TaskStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TaskStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        text_enum_from_sql(value)
    }
}

impl ToSql for Priority {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Priority {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        text_enum_from_sql(value)
    }
}

/// How a task repeats. Each kind carries only the fields that apply to it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind")]
pub enum Recurrence {
    #[serde(rename = "One-time")]
    OneTime { due_date: Option<NaiveDate> },
    Daily,
    Weekly { days: Vec<Weekday> },
    Monthly { day: u32 },
}

/// Column values for `task_type`, `week_days`, `monthly_date`, `end_date`.
pub type RecurrenceColumns = (&'static str, Option<String>, Option<u32>, Option<NaiveDate>);

impl Recurrence {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Recurrence::OneTime { .. } => "One-time",
            Recurrence::Daily => "Daily",
            Recurrence::Weekly { .. } => "Weekly",
            Recurrence::Monthly { .. } => "Monthly",
        }
    }

    pub fn is_recurring(&self) -> bool {
        !matches!(self, Recurrence::OneTime { .. })
    }

    pub fn due_date(&self) -> Option<NaiveDate> {
        match self {
            Recurrence::OneTime { due_date } => *due_date,
            _ => None,
        }
    }

    /// Weekdays in Monday-first order without duplicates.
    pub fn normalized(self) -> Recurrence {
        match self {
            Recurrence::Weekly { mut days } => {
                days.sort_by_key(|d| d.num_days_from_monday());
                days.dedup();
                Recurrence::Weekly { days }
            }
            other => other,
        }
    }

    pub fn to_columns(&self) -> RecurrenceColumns {
        match self {
            Recurrence::OneTime { due_date } => (self.kind_name(), None, None, *due_date),
            Recurrence::Daily => (self.kind_name(), None, None, None),
            Recurrence::Weekly { days } => {
                let names: Vec<&str> = days.iter().map(|d| weekday_name(*d)).collect();
                (self.kind_name(), Some(names.join(",")), None, None)
            }
            Recurrence::Monthly { day } => (self.kind_name(), None, Some(*day), None),
        }
    }

    pub fn from_columns(
        task_type: &str,
        week_days: Option<String>,
        monthly_date: Option<u32>,
        end_date: Option<NaiveDate>,
    ) -> Result<Recurrence, UnknownVariant> {
        match task_type {
            "One-time" => Ok(Recurrence::OneTime { due_date: end_date }),
            "Daily" => Ok(Recurrence::Daily),
            "Weekly" => {
                let mut days = vec![];
                for name in week_days.unwrap_or_default().split(',') {
                    let name = name.trim();
                    if name.is_empty() {
                        continue;
                    }
                    let day = Weekday::from_str(name).map_err(|_| UnknownVariant {
                        kind: "weekday",
                        value: name.to_string(),
                    })?;
                    days.push(day);
                }
                Ok(Recurrence::Weekly { days }.normalized())
            }
            "Monthly" => match monthly_date {
                Some(day) => Ok(Recurrence::Monthly { day }),
                None => Err(UnknownVariant {
                    kind: "monthly date",
                    value: "NULL".to_string(),
                }),
            },
            other => Err(UnknownVariant {
                kind: "task type",
                value: other.to_string(),
            }),
        }
    }
}

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Task {
    pub id: TaskID,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: Priority,
    pub recurrence: Recurrence,
    pub last_completed: Option<NaiveDate>,
    pub completed_at: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
}

impl Task {
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    pub fn is_pending(&self) -> bool {
        self.status == TaskStatus::Pending
    }
}

/// User-editable fields of a task, as submitted by the add and edit forms.
#[derive(Deserialize, Debug, Clone)]
pub struct TaskForm {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    pub recurrence: Recurrence,
}

#[derive(Serialize, Debug)]
pub struct AddTaskResult {
    pub task_id: TaskID,
}

#[derive(Deserialize, Debug)]
pub struct EditTaskRequest {
    pub task_id: TaskID,
    pub task: TaskForm,
}

#[derive(Deserialize, Debug)]
pub struct TaskIdRequest {
    pub task_id: TaskID,
}

#[derive(Serialize, Debug)]
pub struct ToggleStatusResult {
    pub status: TaskStatus,
}
