use chrono::NaiveDate;
use rocket::FromFormField;
use serde::Serialize;

use crate::goals::data::PeriodWindow;
use crate::tasks::data::{Priority, Task, TaskID};

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityCount {
    pub priority: Priority,
    pub completed: usize,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct WeekProgress {
    pub window: PeriodWindow,
    pub completed: usize,
    pub total: usize,
    pub ratio: f64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub today: NaiveDate,
    pub completed: usize,
    pub pending: usize,
    pub overdue: usize,
    pub completed_by_priority: Vec<PriorityCount>,
    pub this_week: WeekProgress,
}

#[derive(FromFormField, Serialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Completed,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ListRow {
    pub task: Task,
    pub overdue: bool,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ListView {
    pub search: Option<String>,
    pub status: StatusFilter,
    pub rows: Vec<ListRow>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CalendarEntry {
    pub task_id: TaskID,
    pub title: String,
    pub priority: Priority,
    pub color: &'static str,
    pub completed: bool,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub label: String,
    pub is_today: bool,
    pub entries: Vec<CalendarEntry>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CalendarView {
    pub weeks: Vec<Vec<CalendarDay>>,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeatmapCell {
    pub date: NaiveDate,
    pub count: u32,
    /// 0 = Monday.
    pub weekday: u32,
    /// Column index; columns are Sunday-started weeks.
    pub week: u32,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct HeatmapView {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub max_count: u32,
    pub row_labels: [&'static str; 7],
    /// `grid[weekday][week]`; cells outside the range stay zero.
    pub grid: Vec<Vec<u32>>,
    pub cells: Vec<HeatmapCell>,
}
