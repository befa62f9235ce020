use chrono::{NaiveDate, NaiveDateTime};
use rocket::request::FromParam;
use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

use std::str::FromStr;

use crate::data::{text_enum_from_sql, UnknownVariant};

pub type GoalID = i64;

/// Suggested target when no goal exists for the current window.
pub const DEFAULT_TARGET: u32 = 5;
pub const MAX_TARGET: u32 = 100;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalPeriod {
    Weekly,
    Monthly,
}

impl GoalPeriod {
    pub fn as_str(self) -> &'static str {
        match self {
            GoalPeriod::Weekly => "Weekly",
            GoalPeriod::Monthly => "Monthly",
        }
    }
}

impl FromStr for GoalPeriod {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Weekly" => Ok(GoalPeriod::Weekly),
            "Monthly" => Ok(GoalPeriod::Monthly),
            other => Err(UnknownVariant {
                kind: "goal period",
                value: other.to_string(),
            }),
        }
    }
}

impl<'a> FromParam<'a> for GoalPeriod {
    type Error = UnknownVariant;

    fn from_param(param: &'a str) -> Result<Self, Self::Error> {
        match param.to_ascii_lowercase().as_str() {
            "weekly" => Ok(GoalPeriod::Weekly),
            "monthly" => Ok(GoalPeriod::Monthly),
            _ => Err(UnknownVariant {
                kind: "goal period",
                value: param.to_string(),
            }),
        }
    }
}

impl ToSql for GoalPeriod {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for GoalPeriod {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        text_enum_from_sql(value)
    }
}

/// Inclusive date range a goal applies to.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl PeriodWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Goal {
    pub id: GoalID,
    pub period: GoalPeriod,
    pub target_count: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: NaiveDateTime,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalStanding {
    Achieved,
    OnTrack,
    Behind,
}

#[derive(Deserialize, Debug)]
pub struct SetGoalRequest {
    pub period: GoalPeriod,
    pub target_count: u32,
}

#[derive(Serialize, Debug)]
pub struct GoalView {
    pub period: GoalPeriod,
    pub window: PeriodWindow,
    pub goal: Option<Goal>,
    pub suggested_target: u32,
    pub completed: u32,
    pub progress: f64,
    pub standing: Option<GoalStanding>,
    pub message: String,
}
