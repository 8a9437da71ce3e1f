use axum::{Json, extract::Query};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use signage_core::{
    grid,
    models::{
        schedule::{GridDay, WeekGridResponse},
        time::{DayOfWeek, TimeOfDay},
    },
};

use crate::middleware::error_handling::AppError;

const DEFAULT_STEP_MINUTES: u16 = 30;

#[derive(Debug, Deserialize)]
pub struct WeekGridQuery {
    pub date: Option<NaiveDate>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub step: Option<u16>,
}

fn parse_bound(value: Option<&str>, default: TimeOfDay) -> Result<TimeOfDay, AppError> {
    match value {
        Some(value) => Ok(value.parse()?),
        None => Ok(default),
    }
}

/// Dated columns and slot rows of the week containing `date`.
#[axum::debug_handler]
pub async fn get_week_grid(
    Query(query): Query<WeekGridQuery>,
) -> Result<Json<WeekGridResponse>, AppError> {
    let date = query.date.unwrap_or_else(|| Local::now().date_naive());
    let start = parse_bound(query.start.as_deref(), TimeOfDay::MIDNIGHT)?;
    let end = parse_bound(query.end.as_deref(), TimeOfDay::END_OF_DAY)?;
    let slots = grid::generate_slots(start, end, query.step.unwrap_or(DEFAULT_STEP_MINUTES))?;

    let days = DayOfWeek::ALL
        .iter()
        .zip(grid::week_of(date))
        .map(|(day, date)| GridDay { day: *day, date })
        .collect();

    Ok(Json(WeekGridResponse { days, slots }))
}
