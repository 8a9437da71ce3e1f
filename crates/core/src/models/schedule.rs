use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::block::{ScheduledBlock, ScreenId};
use crate::models::time::{DayOfWeek, TimeOfDay};

/// The editing scope supplied by the screen directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleScope {
    pub organization_id: Option<Uuid>,
    pub branch_id: Option<Uuid>,
    pub screen_ids: Vec<ScreenId>,
}

impl ScheduleScope {
    pub fn for_screens<I, S>(screens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ScreenId>,
    {
        Self {
            organization_id: None,
            branch_id: None,
            screen_ids: screens.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, screen_id: &ScreenId) -> bool {
        self.screen_ids.contains(screen_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetScheduleResponse {
    pub blocks: Vec<ScheduledBlock>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PutScheduleRequest {
    pub scope: ScheduleScope,
    pub blocks: Vec<ScheduledBlock>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PutScheduleResponse {
    pub saved: usize,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridDay {
    pub day: DayOfWeek,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekGridResponse {
    pub days: Vec<GridDay>,
    pub slots: Vec<TimeOfDay>,
}
