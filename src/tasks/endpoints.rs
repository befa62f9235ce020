use rocket::serde::json::Json;
use rocket::{get, post, State};
use tracing::info;

use crate::data::{now, today, DBConnection};
use crate::internal_error::InternalResult;

use super::data::*;
use super::helpers::*;

#[get("/get_tasks")]
pub fn get_tasks(db_connection: &State<DBConnection>) -> InternalResult<Json<Vec<Task>>> {
    let db_connection = db_connection.lock()?;

    let tasks = get_all_tasks_from_db(&db_connection)?;

    Ok(Json(tasks))
}

#[post("/add_task", format = "json", data = "<task>")]
pub fn add_task(
    task: Json<TaskForm>,
    db_connection: &State<DBConnection>,
) -> InternalResult<Json<AddTaskResult>> {
    let db_connection = db_connection.lock()?;

    let result = add_task_to_db(task.into_inner(), now(), &db_connection)?;
    info!(task_id = result.task_id, "task added");

    Ok(Json(result))
}

#[post("/edit_task", format = "json", data = "<edit_task_request>")]
pub fn edit_task(
    edit_task_request: Json<EditTaskRequest>,
    db_connection: &State<DBConnection>,
) -> InternalResult<()> {
    let db_connection = db_connection.lock()?;

    let request = edit_task_request.into_inner();
    edit_task_in_db(request.task_id, request.task, &db_connection)?;

    Ok(())
}

#[post("/toggle_task_status", format = "json", data = "<toggle_request>")]
pub fn toggle_task_status(
    toggle_request: Json<TaskIdRequest>,
    db_connection: &State<DBConnection>,
) -> InternalResult<Json<ToggleStatusResult>> {
    let db_connection = db_connection.lock()?;

    let status = toggle_task_status_in_db(toggle_request.task_id, today(), &db_connection)?;

    Ok(Json(ToggleStatusResult { status }))
}

#[post("/reset_task", format = "json", data = "<reset_request>")]
pub fn reset_task(
    reset_request: Json<TaskIdRequest>,
    db_connection: &State<DBConnection>,
) -> InternalResult<()> {
    let db_connection = db_connection.lock()?;

    reset_task_in_db(reset_request.task_id, &db_connection)
}

#[post("/delete_task", format = "json", data = "<delete_request>")]
pub fn delete_task(
    delete_request: Json<TaskIdRequest>,
    db_connection: &State<DBConnection>,
) -> InternalResult<()> {
    let db_connection = db_connection.lock()?;

    delete_task_from_db(delete_request.task_id, &db_connection)?;
    info!(task_id = delete_request.task_id, "task deleted");

    Ok(())
}
