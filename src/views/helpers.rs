use chrono::{Datelike, Duration, NaiveDate};

use std::collections::HashMap;

use crate::goals::data::GoalPeriod;
use crate::goals::helpers::period_window;
use crate::tasks::data::{Priority, Recurrence, Task};
use crate::tasks::recurrence::{is_active_on, is_overdue};

use super::data::*;

pub const CALENDAR_DAYS: i64 = 15;
pub const HEATMAP_DAYS_BACK: i64 = 90;
const WEEKDAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

pub fn dashboard_view(tasks: &[Task], today: NaiveDate) -> DashboardView {
    let completed = tasks.iter().filter(|t| t.is_completed()).count();
    let pending = tasks.iter().filter(|t| t.is_pending()).count();
    let overdue = tasks.iter().filter(|t| is_overdue(t, today)).count();

    let completed_by_priority = Priority::ALL_DESCENDING
        .iter()
        .map(|priority| PriorityCount {
            priority: *priority,
            completed: tasks
                .iter()
                .filter(|t| t.is_completed() && t.priority == *priority)
                .count(),
        })
        .collect();

    let window = period_window(GoalPeriod::Weekly, today);
    let week_tasks: Vec<&Task> = tasks
        .iter()
        .filter(|t| match t.recurrence {
            Recurrence::OneTime { due_date } => due_date.map_or(false, |d| window.contains(d)),
            _ => true,
        })
        .collect();
    let week_completed = week_tasks.iter().filter(|t| t.is_completed()).count();
    let ratio = if week_tasks.is_empty() {
        0.0
    } else {
        week_completed as f64 / week_tasks.len() as f64
    };

    DashboardView {
        today,
        completed,
        pending,
        overdue,
        completed_by_priority,
        this_week: WeekProgress {
            window,
            completed: week_completed,
            total: week_tasks.len(),
            ratio,
        },
    }
}

/// Filtered by title substring (case-insensitive) and status, then sorted
/// pending first, by priority, then title.
pub fn list_view(
    tasks: &[Task],
    today: NaiveDate,
    search: Option<String>,
    status: StatusFilter,
) -> ListView {
    let search = search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    let needle = search.as_ref().map(|s| s.to_lowercase());

    let mut rows: Vec<ListRow> = tasks
        .iter()
        .filter(|t| match &needle {
            Some(needle) => t.title.to_lowercase().contains(needle.as_str()),
            None => true,
        })
        .filter(|t| match status {
            StatusFilter::All => true,
            StatusFilter::Pending => t.is_pending(),
            StatusFilter::Completed => t.is_completed(),
        })
        .map(|t| ListRow {
            task: t.clone(),
            overdue: is_overdue(t, today),
        })
        .collect();

    rows.sort_by(|a, b| {
        (a.task.is_completed(), a.task.priority.rank(), &a.task.title).cmp(&(
            b.task.is_completed(),
            b.task.priority.rank(),
            &b.task.title,
        ))
    });

    ListView {
        search,
        status,
        rows,
    }
}

/// Fifteen days from `today`, in rows of seven.
pub fn calendar_view(tasks: &[Task], today: NaiveDate) -> CalendarView {
    let days: Vec<CalendarDay> = (0..CALENDAR_DAYS)
        .map(|offset| {
            let date = today + Duration::days(offset);
            CalendarDay {
                date,
                label: date.format("%a %d").to_string(),
                is_today: date == today,
                entries: tasks
                    .iter()
                    .filter(|t| is_active_on(t, date))
                    .map(|t| CalendarEntry {
                        task_id: t.id,
                        title: t.title.clone(),
                        priority: t.priority,
                        color: t.priority.color(),
                        completed: t.is_completed(),
                    })
                    .collect(),
            }
        })
        .collect();

    CalendarView {
        weeks: days.chunks(7).map(|week| week.to_vec()).collect(),
    }
}

/// Completed-task counts per day for the last 90 days and today.
pub fn heatmap_view(tasks: &[Task], today: NaiveDate) -> HeatmapView {
    let start = today - Duration::days(HEATMAP_DAYS_BACK);

    let mut counts: HashMap<NaiveDate, u32> = HashMap::new();
    for task in tasks.iter().filter(|t| t.is_completed()) {
        if let Some(completed_at) = task.completed_at {
            *counts.entry(completed_at).or_insert(0) += 1;
        }
    }

    let first_column =
        start - Duration::days(i64::from(start.weekday().num_days_from_sunday()));

    let mut cells = vec![];
    let mut date = start;
    while date <= today {
        cells.push(HeatmapCell {
            date,
            count: counts.get(&date).copied().unwrap_or(0),
            weekday: date.weekday().num_days_from_monday(),
            week: ((date - first_column).num_days() / 7) as u32,
        });
        date = date + Duration::days(1);
    }

    let columns = cells.last().map_or(0, |c| c.week as usize + 1);
    let mut grid = vec![vec![0; columns]; 7];
    for cell in &cells {
        grid[cell.weekday as usize][cell.week as usize] = cell.count;
    }

    HeatmapView {
        start,
        end: today,
        max_count: cells.iter().map(|c| c.count).max().unwrap_or(0),
        row_labels: WEEKDAY_LABELS,
        grid,
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::data::TaskStatus;
    use crate::tasks::recurrence::tests::{date, task};
    use chrono::Weekday;

    fn make(id: i64, title: &str, priority: Priority, recurrence: Recurrence) -> Task {
        let mut t = task(recurrence);
        t.id = id;
        t.title = title.to_string();
        t.priority = priority;
        t
    }

    fn complete(mut t: Task, on: NaiveDate) -> Task {
        t.status = TaskStatus::Completed;
        t.last_completed = Some(on);
        t.completed_at = Some(on);
        t
    }

    #[test]
    fn dashboard_counts() {
        // 2025-04-24 is a Thursday; the week runs 04-21..=04-27.
        let today = date(2025, 4, 24);
        let tasks = vec![
            make(
                1,
                "Late report",
                Priority::High,
                Recurrence::OneTime {
                    due_date: Some(date(2025, 4, 22)),
                },
            ),
            complete(
                make(2, "Gym", Priority::High, Recurrence::Daily),
                today,
            ),
            complete(
                make(
                    3,
                    "Next month",
                    Priority::Low,
                    Recurrence::OneTime {
                        due_date: Some(date(2025, 5, 20)),
                    },
                ),
                today,
            ),
            make(4, "Rent", Priority::Medium, Recurrence::Monthly { day: 1 }),
        ];

        let view = dashboard_view(&tasks, today);

        assert_eq!(view.completed, 2);
        assert_eq!(view.pending, 2);
        assert_eq!(view.overdue, 2);
        assert_eq!(
            view.completed_by_priority,
            vec![
                PriorityCount {
                    priority: Priority::High,
                    completed: 1
                },
                PriorityCount {
                    priority: Priority::Medium,
                    completed: 0
                },
                PriorityCount {
                    priority: Priority::Low,
                    completed: 1
                },
            ]
        );
        assert_eq!(view.this_week.total, 3);
        assert_eq!(view.this_week.completed, 1);
    }

    #[test]
    fn list_is_filtered_and_sorted() {
        let today = date(2025, 4, 24);
        let tasks = vec![
            make(1, "b low", Priority::Low, Recurrence::Daily),
            complete(make(2, "a high done", Priority::High, Recurrence::Daily), today),
            make(3, "c high", Priority::High, Recurrence::Daily),
            make(4, "a high", Priority::High, Recurrence::Daily),
            make(5, "Shopping", Priority::Medium, Recurrence::Daily),
        ];

        let view = list_view(&tasks, today, None, StatusFilter::All);
        let ids: Vec<i64> = view.rows.iter().map(|r| r.task.id).collect();
        assert_eq!(ids, vec![4, 3, 5, 1, 2]);

        let view = list_view(&tasks, today, Some(" HIGH ".to_string()), StatusFilter::Pending);
        let ids: Vec<i64> = view.rows.iter().map(|r| r.task.id).collect();
        assert_eq!(ids, vec![4, 3]);
        assert_eq!(view.search.as_deref(), Some("HIGH"));

        let view = list_view(&tasks, today, Some(String::new()), StatusFilter::Completed);
        assert_eq!(view.search, None);
        assert_eq!(view.rows.len(), 1);
        assert!(!view.rows[0].overdue);
    }

    #[test]
    fn calendar_spans_fifteen_days_in_weeks_of_seven() {
        let today = date(2025, 4, 24);
        let tasks = vec![
            make(
                1,
                "Mondays",
                Priority::Low,
                Recurrence::Weekly {
                    days: vec![Weekday::Mon],
                },
            ),
            make(
                2,
                "Due",
                Priority::High,
                Recurrence::OneTime {
                    due_date: Some(date(2025, 4, 30)),
                },
            ),
            make(3, "First", Priority::Medium, Recurrence::Monthly { day: 1 }),
        ];

        let view = calendar_view(&tasks, today);

        let sizes: Vec<usize> = view.weeks.iter().map(|w| w.len()).collect();
        assert_eq!(sizes, vec![7, 7, 1]);

        let days: Vec<&CalendarDay> = view.weeks.iter().flatten().collect();
        assert!(days[0].is_today);
        assert_eq!(days[0].label, "Thu 24");
        assert_eq!(days[14].date, date(2025, 5, 8));

        let titles_on = |d: NaiveDate| -> Vec<String> {
            days.iter()
                .find(|day| day.date == d)
                .unwrap()
                .entries
                .iter()
                .map(|e| e.title.clone())
                .collect()
        };
        assert_eq!(titles_on(date(2025, 4, 28)), vec!["Mondays"]);
        assert_eq!(titles_on(date(2025, 4, 30)), vec!["Due"]);
        assert_eq!(titles_on(date(2025, 5, 1)), vec!["First"]);
        assert!(titles_on(date(2025, 4, 25)).is_empty());

        let due = &days[6].entries[0];
        assert_eq!(due.color, "red");
    }

    #[test]
    fn heatmap_covers_ninety_one_days() {
        let today = date(2025, 4, 24);
        let tasks = vec![
            complete(make(1, "a", Priority::Low, Recurrence::Daily), today),
            complete(make(2, "b", Priority::Low, Recurrence::Daily), today),
            complete(
                make(3, "c", Priority::Low, Recurrence::Daily),
                date(2025, 4, 20),
            ),
            complete(
                make(4, "too old", Priority::Low, Recurrence::Daily),
                date(2025, 1, 1),
            ),
            make(5, "pending", Priority::Low, Recurrence::Daily),
        ];

        let view = heatmap_view(&tasks, today);

        assert_eq!(view.cells.len(), 91);
        assert_eq!(view.start, date(2025, 1, 24));
        assert_eq!(view.max_count, 2);
        assert_eq!(view.cells.iter().map(|c| c.count).sum::<u32>(), 3);

        let last = view.cells.last().unwrap();
        assert_eq!(last.count, 2);
        // Thursday row.
        assert_eq!(last.weekday, 3);
        assert_eq!(view.grid[3][last.week as usize], 2);

        // 2025-04-20 is a Sunday, so it opens the final column.
        let sunday = view.cells.iter().find(|c| c.date == date(2025, 4, 20)).unwrap();
        assert_eq!(sunday.week, last.week);
        assert_eq!(view.grid.len(), 7);
        assert_eq!(view.grid[0].len(), last.week as usize + 1);
    }
}
