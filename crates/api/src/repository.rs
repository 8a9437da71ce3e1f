//! # Schedule Repository
//!
//! In-memory block storage behind the HTTP surface, keyed by screen. It
//! also implements [`ScheduleService`] so the store can talk to it
//! in-process without going over HTTP.

use std::collections::BTreeMap;

use async_trait::async_trait;
use signage_core::{
    models::{
        block::{ScheduledBlock, ScreenId},
        schedule::ScheduleScope,
    },
    service::ScheduleService,
};
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Default)]
pub struct ScheduleRepository {
    blocks: RwLock<BTreeMap<ScreenId, Vec<ScheduledBlock>>>,
}

impl ScheduleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocks of every screen in `scope`, in scope order.
    pub async fn blocks_for_scope(&self, scope: &ScheduleScope) -> Vec<ScheduledBlock> {
        let blocks = self.blocks.read().await;
        scope
            .screen_ids
            .iter()
            .filter_map(|screen_id| blocks.get(screen_id))
            .flatten()
            .cloned()
            .collect()
    }

    pub async fn blocks_for_screen(&self, screen_id: &ScreenId) -> Vec<ScheduledBlock> {
        self.blocks
            .read()
            .await
            .get(screen_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Replaces the blocks of every screen in `scope`. Screens in scope
    /// without any block in `blocks` end up empty. Returns the number of
    /// blocks stored.
    pub async fn replace_scope(&self, scope: &ScheduleScope, blocks: Vec<ScheduledBlock>) -> usize {
        let mut stored = self.blocks.write().await;
        for screen_id in &scope.screen_ids {
            stored.remove(screen_id);
        }

        let count = blocks.len();
        for block in blocks {
            stored.entry(block.screen_id.clone()).or_default().push(block);
        }
        debug!(
            "Stored {} block(s) for {} screen(s)",
            count,
            scope.screen_ids.len()
        );

        count
    }
}

#[async_trait]
impl ScheduleService for ScheduleRepository {
    async fn get_schedule(&self, scope: &ScheduleScope) -> eyre::Result<Vec<ScheduledBlock>> {
        Ok(self.blocks_for_scope(scope).await)
    }

    async fn put_schedule(
        &self,
        scope: &ScheduleScope,
        blocks: Vec<ScheduledBlock>,
    ) -> eyre::Result<()> {
        self.replace_scope(scope, blocks).await;
        Ok(())
    }
}
