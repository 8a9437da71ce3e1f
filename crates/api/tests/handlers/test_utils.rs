use std::sync::Arc;

use axum_test::TestServer;
use signage_api::{ApiState, build_router, repository::ScheduleRepository};
use signage_core::models::{
    block::{AdvertisementShowMode, BlockType, Priority, ScheduledBlock, ScreenId, ShowMode},
    schedule::ScheduleScope,
    time::DayOfWeek,
};

pub struct TestContext {
    pub state: Arc<ApiState>,
}

impl TestContext {
    pub fn new() -> Self {
        Self {
            state: Arc::new(ApiState::new(ScheduleRepository::new())),
        }
    }

    /// Context whose repository already holds `blocks`.
    pub async fn with_blocks(blocks: Vec<ScheduledBlock>) -> Self {
        let ctx = Self::new();
        let mut scope = ScheduleScope::default();
        for block in &blocks {
            if !scope.contains(&block.screen_id) {
                scope.screen_ids.push(block.screen_id.clone());
            }
        }
        ctx.state.repository.replace_scope(&scope, blocks).await;
        ctx
    }

    pub fn server(&self) -> TestServer {
        TestServer::new(build_router(self.state.clone())).unwrap()
    }
}

pub fn playlist_block(screen: &str, day: DayOfWeek, start: &str, end: &str) -> ScheduledBlock {
    ScheduledBlock {
        screen_id: ScreenId::from(screen),
        day_of_week: day,
        start_date: None,
        end_date: None,
        start_time: start.parse().unwrap(),
        end_time: end.parse().unwrap(),
        playlist_id: Some(format!("{screen}-playlist")),
        priority: Priority::new(5).unwrap(),
        block_type: BlockType::Playlist,
        is_recurring: true,
        show_mode: Some(ShowMode::Cycle),
        advertisement_show_mode: None,
    }
}

pub fn advertisement_block(screen: &str, day: DayOfWeek, start: &str, end: &str) -> ScheduledBlock {
    ScheduledBlock {
        playlist_id: None,
        block_type: BlockType::Advertisement,
        show_mode: None,
        advertisement_show_mode: Some(AdvertisementShowMode::Specific),
        ..playlist_block(screen, day, start, end)
    }
}
