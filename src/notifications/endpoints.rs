use rocket::serde::json::Json;
use rocket::{get, post, State};
use tracing::info;

use crate::data::{now, today, DBConnection};
use crate::internal_error::InternalResult;
use crate::tasks::data::TaskIdRequest;

use super::data::*;
use super::dispatch::Notifier;
use super::helpers::*;

#[get("/get_notification_settings")]
pub fn get_notification_settings(
    notifier: &State<Notifier>,
) -> InternalResult<Json<NotificationSettings>> {
    notifier.settings().map(Json)
}

#[post(
    "/set_notification_settings",
    format = "json",
    data = "<save_settings_request>"
)]
pub fn set_notification_settings(
    save_settings_request: Json<SaveSettingsRequest>,
    db_connection: &State<DBConnection>,
) -> InternalResult<Json<NotificationSettings>> {
    let db_connection = db_connection.lock()?;

    let settings = save_notification_settings_in_db(&save_settings_request, now(), &db_connection)?;
    info!(
        send_daily = settings.send_daily,
        daily_time = %settings.daily_time,
        send_evening = settings.send_evening,
        evening_time = %settings.evening_time,
        "notification settings saved"
    );

    Ok(Json(settings))
}

#[post("/send_test_notification")]
pub async fn send_test_notification(notifier: &State<Notifier>) -> InternalResult<Json<SendOutcome>> {
    notifier.send_test().await.map(Json)
}

#[post("/send_daily_summary")]
pub async fn send_daily_summary(notifier: &State<Notifier>) -> InternalResult<Json<SendOutcome>> {
    notifier.send_daily_summary(today()).await.map(Json)
}

#[post("/send_evening_reminder")]
pub async fn send_evening_reminder(
    notifier: &State<Notifier>,
) -> InternalResult<Json<SendOutcome>> {
    notifier.send_evening_reminder(today()).await.map(Json)
}

#[post("/send_task_reminder", format = "json", data = "<reminder_request>")]
pub async fn send_task_reminder(
    reminder_request: Json<TaskIdRequest>,
    notifier: &State<Notifier>,
) -> InternalResult<Json<SendOutcome>> {
    notifier
        .send_task_reminder(reminder_request.task_id)
        .await
        .map(Json)
}
