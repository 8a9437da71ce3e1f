use axum::http::StatusCode;
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use signage_core::models::{schedule::WeekGridResponse, time::DayOfWeek};

use crate::test_utils::TestContext;

#[tokio::test]
async fn test_week_grid_is_monday_anchored() {
    let server = TestContext::new().server();

    let grid = server
        .get("/api/grid/week")
        .add_query_param("date", "2024-03-07")
        .add_query_param("start", "09:00")
        .add_query_param("end", "10:00")
        .add_query_param("step", "30")
        .await
        .json::<WeekGridResponse>();

    assert_eq!(grid.days.len(), 7);
    assert_eq!(grid.days[0].day, DayOfWeek::Monday);
    assert_eq!(grid.days[0].date, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
    assert_eq!(grid.days[6].day, DayOfWeek::Sunday);
    assert_eq!(grid.days[6].date, NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
    let slots: Vec<String> = grid.slots.iter().map(ToString::to_string).collect();
    assert_eq!(slots, vec!["09:00", "09:30", "10:00"]);
}

#[tokio::test]
async fn test_week_grid_defaults_cover_the_whole_day() {
    let server = TestContext::new().server();

    let grid = server
        .get("/api/grid/week")
        .add_query_param("date", "2024-03-04")
        .await
        .json::<WeekGridResponse>();

    assert_eq!(grid.slots.len(), 48);
    assert_eq!(grid.slots[0].to_string(), "00:00");
    assert_eq!(grid.slots[47].to_string(), "23:30");
}

#[tokio::test]
async fn test_week_grid_rejects_zero_step() {
    let server = TestContext::new().server();

    let response = server
        .get("/api/grid/week")
        .add_query_param("step", "0")
        .expect_failure()
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_week_grid_rejects_malformed_bound() {
    let server = TestContext::new().server();

    let response = server
        .get("/api/grid/week")
        .add_query_param("start", "nine")
        .expect_failure()
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}
