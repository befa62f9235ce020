use chrono::NaiveDate;
use tracing::{info, warn};

use crate::data::{now, DBConnection};
use crate::internal_error::InternalResult;
use crate::tasks::data::{Task, TaskID};
use crate::tasks::helpers::{get_all_tasks_from_db, get_task_from_db};
use crate::tasks::recurrence::active_tasks;

use super::data::{NotificationSettings, SendOutcome};
use super::helpers::get_notification_settings_from_db;
use super::messages::*;
use super::sms::{SharedSender, SmsSender};

/// Builds messages from the current task state and hands them to the SMS
/// sender. Shared by the API handlers and the background scheduler.
#[derive(Clone)]
pub struct Notifier {
    db_connection: DBConnection,
    sender: SharedSender,
    default_phone: String,
}

impl Notifier {
    pub fn new(db_connection: DBConnection, sender: SharedSender, default_phone: String) -> Self {
        Self {
            db_connection,
            sender,
            default_phone,
        }
    }

    pub fn settings(&self) -> InternalResult<NotificationSettings> {
        let db_connection = self.db_connection.lock()?;
        get_notification_settings_from_db(&self.default_phone, now(), &db_connection)
    }

    fn recipient_and_tasks(&self) -> InternalResult<(String, Vec<Task>)> {
        let db_connection = self.db_connection.lock()?;
        let settings =
            get_notification_settings_from_db(&self.default_phone, now(), &db_connection)?;
        let tasks = get_all_tasks_from_db(&db_connection)?;

        Ok((settings.phone_number, tasks))
    }

    /// Validates the recipient and sends. Provider failures are logged and
    /// returned as an unsuccessful outcome; nothing is retried.
    pub async fn send_sms(&self, to: &str, body: &str) -> SendOutcome {
        if !is_valid_e164(to) {
            warn!(to, "refusing to send to invalid phone number");
            return SendOutcome::failed(
                "Invalid phone number format. Must start with + followed by country code and \
                 number (no spaces or special characters).",
            );
        }

        match self.sender.send(body, to).await {
            Ok(message_id) => {
                info!(%message_id, "sms sent");
                SendOutcome::sent(message_id)
            }
            Err(e) => {
                warn!(error = %e, "error sending sms");
                SendOutcome::failed(e.to_string())
            }
        }
    }

    pub async fn send_test(&self) -> InternalResult<SendOutcome> {
        let to = self.settings()?.phone_number;
        Ok(self.send_sms(&to, TEST_MESSAGE).await)
    }

    pub async fn send_daily_summary(&self, today: NaiveDate) -> InternalResult<SendOutcome> {
        let (to, tasks) = self.recipient_and_tasks()?;
        let message = daily_summary_message(&active_tasks(&tasks, today), today, motivation_quote());

        Ok(self.send_sms(&to, &message).await)
    }

    pub async fn send_evening_reminder(&self, today: NaiveDate) -> InternalResult<SendOutcome> {
        let (to, tasks) = self.recipient_and_tasks()?;
        let pending: Vec<&Task> = active_tasks(&tasks, today)
            .into_iter()
            .filter(|t| t.is_pending())
            .collect();

        match evening_reminder_message(&pending, motivation_quote()) {
            Some(message) => Ok(self.send_sms(&to, &message).await),
            None => Ok(SendOutcome::sent("No pending tasks")),
        }
    }

    pub async fn send_task_reminder(&self, task_id: TaskID) -> InternalResult<SendOutcome> {
        let (to, message) = {
            let db_connection = self.db_connection.lock()?;
            let settings =
                get_notification_settings_from_db(&self.default_phone, now(), &db_connection)?;
            let task = get_task_from_db(task_id, &db_connection)?;
            (settings.phone_number, task_reminder_message(&task))
        };

        Ok(self.send_sms(&to, &message).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::open_in_memory;
    use crate::internal_error::InternalError;
    use crate::notifications::sms::tests::RecordingSender;
    use crate::tasks::data::Recurrence;
    use crate::tasks::helpers::tests::insert;
    use crate::tasks::helpers::toggle_task_status_in_db;
    use crate::tasks::recurrence::tests::date;
    use chrono::Weekday;
    use std::sync::{Arc, Mutex};

    fn notifier_with(sender: Arc<RecordingSender>) -> (Notifier, DBConnection) {
        let db = Arc::new(Mutex::new(open_in_memory()));
        let notifier = Notifier::new(db.clone(), sender, "+15550001111".to_string());
        (notifier, db)
    }

    #[rocket::async_test]
    async fn daily_summary_includes_only_tasks_active_today() {
        let sender = Arc::new(RecordingSender::default());
        let (notifier, db) = notifier_with(sender.clone());
        let today = date(2025, 4, 22);
        {
            let db = db.lock().unwrap();
            insert(&db, "Daily standup", Recurrence::Daily);
            insert(
                &db,
                "Tuesday class",
                Recurrence::Weekly {
                    days: vec![Weekday::Tue],
                },
            );
            insert(
                &db,
                "Friday review",
                Recurrence::Weekly {
                    days: vec![Weekday::Fri],
                },
            );
            insert(&db, "Rent", Recurrence::Monthly { day: 1 });
        }

        let outcome = notifier.send_daily_summary(today).await.unwrap();

        assert_eq!(outcome, SendOutcome::sent("SM0001"));
        let messages = sender.messages();
        assert_eq!(messages.len(), 1);
        let (to, body) = &messages[0];
        assert_eq!(to, "+15550001111");
        assert!(body.contains("📝 PENDING: 2 tasks"));
        assert!(body.contains("Daily standup"));
        assert!(body.contains("Tuesday class"));
        assert!(!body.contains("Friday review"));
        assert!(!body.contains("Rent"));
    }

    #[rocket::async_test]
    async fn evening_reminder_is_skipped_when_everything_is_done() {
        let sender = Arc::new(RecordingSender::default());
        let (notifier, db) = notifier_with(sender.clone());
        let today = date(2025, 4, 22);
        {
            let db = db.lock().unwrap();
            let id = insert(&db, "Daily standup", Recurrence::Daily);
            toggle_task_status_in_db(id, today, &db).unwrap();
        }

        let outcome = notifier.send_evening_reminder(today).await.unwrap();

        assert_eq!(outcome, SendOutcome::sent("No pending tasks"));
        assert!(sender.messages().is_empty());
    }

    #[rocket::async_test]
    async fn invalid_phone_is_reported_without_sending() {
        let sender = Arc::new(RecordingSender::default());
        let db = Arc::new(Mutex::new(open_in_memory()));
        let notifier = Notifier::new(db, sender.clone(), "555-1234".to_string());

        let outcome = notifier.send_test().await.unwrap();

        assert!(!outcome.success);
        assert!(outcome.detail.starts_with("Invalid phone number format"));
        assert!(sender.messages().is_empty());
    }

    #[rocket::async_test]
    async fn provider_failure_becomes_failed_outcome() {
        let sender = Arc::new(RecordingSender::failing("queue overflow"));
        let (notifier, _db) = notifier_with(sender);

        let outcome = notifier.send_test().await.unwrap();

        assert!(!outcome.success);
        assert!(outcome.detail.contains("queue overflow"));
    }

    #[rocket::async_test]
    async fn reminder_for_missing_task_is_not_found() {
        let sender = Arc::new(RecordingSender::default());
        let (notifier, _db) = notifier_with(sender);

        let result = notifier.send_task_reminder(42).await;

        assert!(matches!(result, Err(InternalError::NotFound(_))));
    }
}
