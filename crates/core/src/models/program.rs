use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::block::{ScheduledBlock, ScreenId};
use crate::models::time::{DayOfWeek, TimeOfDay};

/// A contiguous run of minutes owned by a single block, inclusive on both
/// ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramInterval {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    pub source: ScheduledBlock,
}

/// A block lost minutes to a same-plane block of equal priority. The
/// overlap spans the minutes `winner` actually took from `loser`; minutes
/// both lost to a higher-priority block are not reported. Resolution is
/// deterministic, so this is informational only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictWarning {
    pub winner: ScheduledBlock,
    pub loser: ScheduledBlock,
    pub overlap_start: TimeOfDay,
    pub overlap_end: TimeOfDay,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveProgram {
    pub screen_id: ScreenId,
    pub date: NaiveDate,
    pub day_of_week: DayOfWeek,
    pub intervals: Vec<ProgramInterval>,
    #[serde(default)]
    pub warnings: Vec<ConflictWarning>,
}

impl EffectiveProgram {
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// The interval playing at `time`, if any.
    pub fn at(&self, time: TimeOfDay) -> Option<&ProgramInterval> {
        self.intervals
            .iter()
            .find(|interval| interval.start <= time && time <= interval.end)
    }
}
