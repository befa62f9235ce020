use rocket::get;
use rocket::serde::json::Json;
use rocket::State;

use crate::data::{today, DBConnection};
use crate::internal_error::InternalResult;
use crate::tasks::data::Task;
use crate::tasks::helpers::get_all_tasks_from_db;

use super::data::*;
use super::helpers::*;

fn load_tasks(db_connection: &DBConnection) -> InternalResult<Vec<Task>> {
    let db_connection = db_connection.lock()?;
    get_all_tasks_from_db(&db_connection)
}

#[get("/dashboard")]
pub fn dashboard(db_connection: &State<DBConnection>) -> InternalResult<Json<DashboardView>> {
    let tasks = load_tasks(db_connection)?;

    Ok(Json(dashboard_view(&tasks, today())))
}

#[get("/list_view?<search>&<status>")]
pub fn get_list_view(
    search: Option<String>,
    status: Option<StatusFilter>,
    db_connection: &State<DBConnection>,
) -> InternalResult<Json<ListView>> {
    let tasks = load_tasks(db_connection)?;

    Ok(Json(list_view(
        &tasks,
        today(),
        search,
        status.unwrap_or_default(),
    )))
}

#[get("/calendar_view")]
pub fn get_calendar_view(
    db_connection: &State<DBConnection>,
) -> InternalResult<Json<CalendarView>> {
    let tasks = load_tasks(db_connection)?;

    Ok(Json(calendar_view(&tasks, today())))
}

#[get("/heatmap_view")]
pub fn get_heatmap_view(db_connection: &State<DBConnection>) -> InternalResult<Json<HeatmapView>> {
    let tasks = load_tasks(db_connection)?;

    Ok(Json(heatmap_view(&tasks, today())))
}
