use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use signage_core::models::{program::EffectiveProgram, time::DayOfWeek};

use crate::test_utils::{TestContext, advertisement_block, playlist_block};

#[test_log::test(tokio::test)]
async fn test_program_resolves_overlaps_for_date() {
    let ctx = TestContext::with_blocks(vec![
        playlist_block("lobby", DayOfWeek::Monday, "09:00", "11:00"),
        advertisement_block("lobby", DayOfWeek::Monday, "10:00", "10:04"),
        playlist_block("lobby", DayOfWeek::Tuesday, "09:00", "11:00"),
    ])
    .await;
    let server = ctx.server();

    let response = server
        .get("/api/screens/lobby/program")
        .add_query_param("date", "2024-03-04")
        .await;

    response.assert_status_ok();
    let program = response.json::<EffectiveProgram>();
    assert_eq!(program.day_of_week, DayOfWeek::Monday);
    let spans: Vec<(String, String)> = program
        .intervals
        .iter()
        .map(|interval| (interval.start.to_string(), interval.end.to_string()))
        .collect();
    assert_eq!(
        spans,
        vec![
            ("09:00".to_string(), "09:59".to_string()),
            ("10:00".to_string(), "10:04".to_string()),
            ("10:05".to_string(), "11:00".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_program_reports_equal_priority_conflicts() {
    let ctx = TestContext::with_blocks(vec![
        playlist_block("lobby", DayOfWeek::Wednesday, "09:00", "11:00"),
        playlist_block("lobby", DayOfWeek::Wednesday, "10:00", "12:00"),
    ])
    .await;
    let server = ctx.server();

    let program = server
        .get("/api/screens/lobby/program")
        .add_query_param("date", "2024-03-06")
        .await
        .json::<EffectiveProgram>();

    assert_eq!(program.warnings.len(), 1);
    assert_eq!(program.warnings[0].overlap_start.to_string(), "10:00");
    assert_eq!(program.warnings[0].overlap_end.to_string(), "11:00");
}

#[tokio::test]
async fn test_program_for_unscheduled_screen_is_empty() {
    let server = TestContext::new().server();

    let program = server
        .get("/api/screens/ghost/program")
        .await
        .json::<EffectiveProgram>();

    assert_eq!(program.screen_id.as_str(), "ghost");
    assert!(program.is_empty());
}

#[tokio::test]
async fn test_program_rejects_malformed_date() {
    let server = TestContext::new().server();

    let response = server
        .get("/api/screens/lobby/program")
        .add_query_param("date", "04/03/2024")
        .expect_failure()
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}
