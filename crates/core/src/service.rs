use async_trait::async_trait;
use eyre::Result;

use crate::models::block::ScheduledBlock;
use crate::models::schedule::ScheduleScope;

/// The remote schedule service: source of truth on load, write target on
/// save.
#[async_trait]
pub trait ScheduleService: Send + Sync {
    /// The canonical block set for every screen in `scope`.
    async fn get_schedule(&self, scope: &ScheduleScope) -> Result<Vec<ScheduledBlock>>;

    /// Replaces the blocks of every screen in `scope` with `blocks`.
    async fn put_schedule(&self, scope: &ScheduleScope, blocks: Vec<ScheduledBlock>) -> Result<()>;
}
