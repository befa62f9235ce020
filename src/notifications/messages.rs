use chrono::NaiveDate;
use rand::seq::SliceRandom;

use crate::tasks::data::Task;

pub const TEST_MESSAGE: &str = "This is a test notification from your To-Do App!";

/// Longest task list included in a single message.
const MAX_LISTED_TASKS: usize = 5;
const MAX_DESCRIPTION_CHARS: usize = 100;

const MOTIVATION_QUOTES: [&str; 10] = [
    "Small progress is still progress!",
    "Your future self will thank you for what you do today.",
    "The secret of getting ahead is getting started.",
    "Focus on progress, not perfection.",
    "Each task completed is a step forward.",
    "Discipline is choosing between what you want now and what you want most.",
    "The only way to do great work is to love what you do.",
    "Your productivity determines your impact.",
    "The best way to predict the future is to create it.",
    "Success is the sum of small efforts repeated day in and day out.",
];

pub fn motivation_quote() -> &'static str {
    MOTIVATION_QUOTES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(MOTIVATION_QUOTES[0])
}

/// `+` followed by the country code and number, digits only.
pub fn is_valid_e164(phone: &str) -> bool {
    match phone.strip_prefix('+') {
        Some(digits) => !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()),
        None => false,
    }
}

fn long_date(date: NaiveDate) -> String {
    date.format("%A, %B %d").to_string()
}

fn push_task_list(message: &mut String, tasks: &[&Task]) {
    for (i, task) in tasks.iter().enumerate() {
        if i == MAX_LISTED_TASKS {
            message.push_str(&format!("...and {} more\n", tasks.len() - MAX_LISTED_TASKS));
            break;
        }
        message.push_str(&format!(
            "{}. {} ({})\n",
            i + 1,
            task.title,
            task.priority.as_str()
        ));
    }
}

/// Morning message for the tasks active on `today`, whatever their status.
pub fn daily_summary_message(tasks_today: &[&Task], today: NaiveDate, quote: &str) -> String {
    if tasks_today.is_empty() {
        return format!(
            "Good morning! You have no tasks scheduled for today ({}).",
            long_date(today)
        );
    }

    let pending: Vec<&Task> = tasks_today.iter().copied().filter(|t| t.is_pending()).collect();
    let completed = tasks_today.iter().filter(|t| t.is_completed()).count();

    let mut message = format!("Daily Summary for {}:\n\n", long_date(today));

    message.push_str(&format!("📝 PENDING: {} tasks\n", pending.len()));
    push_task_list(&mut message, &pending);

    message.push_str(&format!("\n✓ COMPLETED: {} tasks\n", completed));

    if !pending.is_empty() {
        message.push('\n');
        message.push_str(quote);
    }

    message
}

/// Evening nudge for tasks still pending today. `None` when there is nothing
/// left to do.
pub fn evening_reminder_message(pending_today: &[&Task], quote: &str) -> Option<String> {
    if pending_today.is_empty() {
        return None;
    }

    let mut message = format!(
        "Evening Reminder: You have {} pending tasks for today:\n\n",
        pending_today.len()
    );
    push_task_list(&mut message, pending_today);
    message.push('\n');
    message.push_str(quote);

    Some(message)
}

pub fn task_reminder_message(task: &Task) -> String {
    let mut message = format!(
        "REMINDER: {}\nPriority: {}\n",
        task.title,
        task.priority.as_str()
    );

    if !task.description.is_empty() {
        let details: String = task.description.chars().take(MAX_DESCRIPTION_CHARS).collect();
        message.push_str(&format!("Details: {}", details));
        if task.description.chars().count() > MAX_DESCRIPTION_CHARS {
            message.push_str("...");
        }
    }

    message
}
