use std::error::Error;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod data;
mod goals;
mod internal_error;
mod notifications;
mod tasks;
mod views;

use config::Config;
use data::{open_database, DBConnection};
use notifications::dispatch::Notifier;
use notifications::sms::sender_from_config;
use notifications::{endpoints as notification_endpoints, scheduler};

#[macro_use]
extern crate rocket;

use rocket::fs::FileServer;
use rocket::{Build, Rocket};

pub fn build_rocket(db_connection: DBConnection, notifier: Notifier) -> Rocket<Build> {
    rocket::build()
        .manage(db_connection)
        .manage(notifier)
        .mount(
            "/api",
            routes![
                tasks::endpoints::get_tasks,
                tasks::endpoints::add_task,
                tasks::endpoints::edit_task,
                tasks::endpoints::toggle_task_status,
                tasks::endpoints::reset_task,
                tasks::endpoints::delete_task,
                views::endpoints::dashboard,
                views::endpoints::get_list_view,
                views::endpoints::get_calendar_view,
                views::endpoints::get_heatmap_view,
                goals::endpoints::get_goal,
                goals::endpoints::set_goal,
                notification_endpoints::get_notification_settings,
                notification_endpoints::set_notification_settings,
                notification_endpoints::send_test_notification,
                notification_endpoints::send_daily_summary,
                notification_endpoints::send_evening_reminder,
                notification_endpoints::send_task_reminder,
            ],
        )
        .mount(
            "/",
            FileServer::from(concat!(env!("CARGO_MANIFEST_DIR"), "/web")).rank(15),
        )
}

#[rocket::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    info!(
        database = %config.database_path.display(),
        scheduler = config.scheduler_enabled,
        "starting rtodo"
    );
    if config.messaging.is_none() {
        warn!("Twilio credentials are not set; SMS notifications will fail");
    }

    let connection = open_database(&config.database_path)?;
    let notifier = Notifier::new(
        connection.clone(),
        sender_from_config(&config),
        config.default_phone.clone(),
    );

    if config.scheduler_enabled {
        scheduler::start(notifier.clone());
        info!("notification scheduler started");
    }

    build_rocket(connection, notifier).launch().await?;

    Ok(())
}
