use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use signage_core::models::{
    block::ScreenId,
    schedule::{GetScheduleResponse, PutScheduleRequest, PutScheduleResponse, ScheduleScope},
    time::DayOfWeek,
};

use crate::test_utils::{TestContext, advertisement_block, playlist_block};

#[test_log::test(tokio::test)]
async fn test_get_schedule_returns_blocks_of_requested_screens() {
    let lobby = playlist_block("lobby", DayOfWeek::Monday, "09:00", "12:00");
    let cafe = advertisement_block("cafe", DayOfWeek::Friday, "12:00", "12:05");
    let other = playlist_block("garage", DayOfWeek::Monday, "09:00", "12:00");
    let ctx = TestContext::with_blocks(vec![lobby.clone(), cafe.clone(), other]).await;
    let server = ctx.server();

    let response = server
        .get("/api/schedules")
        .add_query_param("screens", "lobby, cafe")
        .await;

    response.assert_status_ok();
    let body = response.json::<GetScheduleResponse>();
    assert_eq!(body.blocks, vec![lobby, cafe]);
}

#[tokio::test]
async fn test_get_schedule_for_unknown_screen_is_empty() {
    let server = TestContext::new().server();

    let body = server
        .get("/api/schedules")
        .add_query_param("screens", "nowhere")
        .await
        .json::<GetScheduleResponse>();

    assert!(body.blocks.is_empty());
}

#[tokio::test]
async fn test_get_schedule_requires_a_screen() {
    let server = TestContext::new().server();

    let response = server
        .get("/api/schedules")
        .add_query_param("screens", " , ")
        .expect_failure()
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["error"].as_str().unwrap().contains("screen"));
}

#[tokio::test]
async fn test_get_schedule_accepts_organization_and_branch() {
    let ctx =
        TestContext::with_blocks(vec![playlist_block("lobby", DayOfWeek::Sunday, "10:00", "11:00")])
            .await;
    let server = ctx.server();

    let body = server
        .get("/api/schedules")
        .add_query_param("screens", "lobby")
        .add_query_param("organization", "67e55044-10b1-426f-9247-bb680e5fe0c8")
        .add_query_param("branch", "936da01f-9abd-4d9d-80c7-02af85c822a8")
        .await
        .json::<GetScheduleResponse>();

    assert_eq!(body.blocks.len(), 1);
}

#[test_log::test(tokio::test)]
async fn test_put_schedule_replaces_scope_and_keeps_other_screens() {
    let ctx = TestContext::with_blocks(vec![
        playlist_block("lobby", DayOfWeek::Monday, "08:00", "09:00"),
        playlist_block("garage", DayOfWeek::Monday, "08:00", "09:00"),
    ])
    .await;
    let server = ctx.server();
    let replacement = playlist_block("lobby", DayOfWeek::Tuesday, "14:00", "15:30");

    let response = server
        .put("/api/schedules")
        .json(&PutScheduleRequest {
            scope: ScheduleScope::for_screens(["lobby", "cafe"]),
            blocks: vec![replacement.clone()],
        })
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<PutScheduleResponse>().saved, 1);
    assert_eq!(
        ctx.state
            .repository
            .blocks_for_screen(&ScreenId::from("lobby"))
            .await,
        vec![replacement]
    );
    assert_eq!(
        ctx.state
            .repository
            .blocks_for_screen(&ScreenId::from("garage"))
            .await
            .len(),
        1
    );
}

#[tokio::test]
async fn test_put_empty_schedule_clears_scope() {
    let ctx =
        TestContext::with_blocks(vec![playlist_block("lobby", DayOfWeek::Monday, "08:00", "09:00")])
            .await;
    let server = ctx.server();

    let response = server
        .put("/api/schedules")
        .json(&json!({ "scope": { "screenIds": ["lobby"] }, "blocks": [] }))
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["saved"], 0);
    assert!(body["updatedAt"].is_string());
    assert!(
        ctx.state
            .repository
            .blocks_for_screen(&ScreenId::from("lobby"))
            .await
            .is_empty()
    );
}

#[tokio::test]
async fn test_put_schedule_rejects_invalid_block_atomically() {
    let original = playlist_block("lobby", DayOfWeek::Monday, "08:00", "09:00");
    let ctx = TestContext::with_blocks(vec![original.clone()]).await;
    let server = ctx.server();
    let mut inverted = playlist_block("lobby", DayOfWeek::Monday, "10:00", "11:00");
    std::mem::swap(&mut inverted.start_time, &mut inverted.end_time);

    let response = server
        .put("/api/schedules")
        .json(&PutScheduleRequest {
            scope: ScheduleScope::for_screens(["lobby"]),
            blocks: vec![
                playlist_block("lobby", DayOfWeek::Tuesday, "10:00", "11:00"),
                inverted,
            ],
        })
        .expect_failure()
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        ctx.state
            .repository
            .blocks_for_screen(&ScreenId::from("lobby"))
            .await,
        vec![original]
    );
}

#[tokio::test]
async fn test_put_schedule_rejects_block_outside_scope() {
    let server = TestContext::new().server();

    let response = server
        .put("/api/schedules")
        .json(&PutScheduleRequest {
            scope: ScheduleScope::for_screens(["lobby"]),
            blocks: vec![playlist_block("cafe", DayOfWeek::Monday, "08:00", "09:00")],
        })
        .expect_failure()
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(
        response.json::<Value>()["error"]
            .as_str()
            .unwrap()
            .contains("cafe")
    );
}

#[tokio::test]
async fn test_put_schedule_rejects_out_of_range_priority() {
    let server = TestContext::new().server();
    let mut block = serde_json::to_value(playlist_block("lobby", DayOfWeek::Monday, "08:00", "09:00"))
        .unwrap();
    block["priority"] = json!(11);

    let response = server
        .put("/api/schedules")
        .json(&json!({ "scope": { "screenIds": ["lobby"] }, "blocks": [block] }))
        .expect_failure()
        .await;

    assert!(response.status_code().is_client_error());
}
