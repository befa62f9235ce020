use rocket::serde::json::Json;
use rocket::{get, post, State};
use tracing::info;

use crate::data::{now, today, DBConnection};
use crate::internal_error::InternalResult;
use crate::notifications::messages::motivation_quote;

use super::data::*;
use super::helpers::*;

#[get("/get_goal/<period>")]
pub fn get_goal(
    period: GoalPeriod,
    db_connection: &State<DBConnection>,
) -> InternalResult<Json<GoalView>> {
    let db_connection = db_connection.lock()?;

    let view = get_goal_view(period, today(), motivation_quote(), &db_connection)?;

    Ok(Json(view))
}

#[post("/set_goal", format = "json", data = "<set_goal_request>")]
pub fn set_goal(
    set_goal_request: Json<SetGoalRequest>,
    db_connection: &State<DBConnection>,
) -> InternalResult<Json<Goal>> {
    let db_connection = db_connection.lock()?;

    let goal = save_goal_in_db(
        set_goal_request.period,
        set_goal_request.target_count,
        today(),
        now(),
        &db_connection,
    )?;
    info!(
        period = goal.period.as_str(),
        target = goal.target_count,
        "goal saved"
    );

    Ok(Json(goal))
}
