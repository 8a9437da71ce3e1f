use std::fmt;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::{ScheduleError, ScheduleResult};
use crate::models::time::{DayOfWeek, TimeOfDay};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScreenId(pub String);

impl ScreenId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ScreenId {
    fn from(value: &str) -> Self {
        ScreenId(value.to_string())
    }
}

impl From<String> for ScreenId {
    fn from(value: String) -> Self {
        ScreenId(value)
    }
}

/// Block precedence, `1..=10`; higher wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Priority(u8);

impl Priority {
    pub const MIN: Priority = Priority(1);
    pub const MAX: Priority = Priority(10);

    pub fn new(value: u8) -> ScheduleResult<Self> {
        if !(Self::MIN.0..=Self::MAX.0).contains(&value) {
            return Err(ScheduleError::validation(format!(
                "Priority {} is outside {}-{}",
                value,
                Self::MIN.0,
                Self::MAX.0
            )));
        }
        Ok(Priority(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::MIN
    }
}

impl TryFrom<u8> for Priority {
    type Error = ScheduleError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Priority::new(value)
    }
}

impl From<Priority> for u8 {
    fn from(value: Priority) -> Self {
        value.0
    }
}

/// Content plane of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockType {
    #[default]
    Playlist,
    Advertisement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShowMode {
    /// Single pass through the playlist.
    #[default]
    Once,
    /// Loop until the slot ends.
    Cycle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdvertisementShowMode {
    #[default]
    Minutes,
    Hours,
    Specific,
}

/// One recurring or dated assignment of content to a screen.
///
/// Serialized as the flat record exchanged with the remote schedule
/// service. Fields are public; anything entering a working set or the
/// service goes through [`ScheduledBlock::validate`] first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledBlock {
    pub screen_id: ScreenId,
    pub day_of_week: DayOfWeek,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub playlist_id: Option<String>,
    pub priority: Priority,
    #[serde(rename = "type")]
    pub block_type: BlockType,
    pub is_recurring: bool,
    pub show_mode: Option<ShowMode>,
    pub advertisement_show_mode: Option<AdvertisementShowMode>,
}

impl ScheduledBlock {
    pub fn validate(&self) -> ScheduleResult<()> {
        if self.start_time > self.end_time {
            return Err(ScheduleError::validation(format!(
                "Block on screen {} starts at {} after it ends at {}",
                self.screen_id, self.start_time, self.end_time
            )));
        }

        if self.block_type == BlockType::Playlist
            && self.playlist_id.as_deref().is_none_or(|id| id.trim().is_empty())
        {
            return Err(ScheduleError::validation(format!(
                "Playlist block on screen {} has no playlist",
                self.screen_id
            )));
        }

        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(ScheduleError::validation(format!(
                    "Block on screen {} has start date {} after end date {}",
                    self.screen_id, start, end
                )));
            }
        }

        if !self.is_recurring && self.start_date.is_none() {
            return Err(ScheduleError::validation(format!(
                "One-off block on screen {} needs a start date",
                self.screen_id
            )));
        }

        Ok(())
    }

    /// Advertisements always compete at maximal priority.
    pub fn effective_priority(&self) -> Priority {
        match self.block_type {
            BlockType::Advertisement => Priority::MAX,
            BlockType::Playlist => self.priority,
        }
    }

    pub fn start_minute(&self) -> u16 {
        self.start_time.minutes()
    }

    pub fn end_minute(&self) -> u16 {
        self.end_time.minutes()
    }

    pub fn applies_on(&self, date: NaiveDate) -> bool {
        if DayOfWeek::of(date) != self.day_of_week {
            return false;
        }

        // A one-off block without an end date covers the week it starts in.
        let end_date = if self.is_recurring {
            self.end_date
        } else {
            self.end_date
                .or_else(|| self.start_date.map(|start| start + Duration::days(6)))
        };

        self.start_date.is_none_or(|start| start <= date)
            && end_date.is_none_or(|end| date <= end)
    }

    /// Inclusive on both ends: a block ending at `10:00` overlaps one
    /// starting at `10:00`.
    pub fn overlaps(&self, other: &ScheduledBlock) -> bool {
        self.start_minute() <= other.end_minute() && other.start_minute() <= self.end_minute()
    }
}

/// Settings-panel values applied to the next assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftBlockTemplate {
    pub priority: Priority,
    #[serde(rename = "type")]
    pub block_type: BlockType,
    pub show_mode: ShowMode,
    pub advertisement_show_mode: AdvertisementShowMode,
    pub playlist_id: Option<String>,
    pub is_recurring: bool,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl Default for DraftBlockTemplate {
    fn default() -> Self {
        Self {
            priority: Priority::default(),
            block_type: BlockType::default(),
            show_mode: ShowMode::default(),
            advertisement_show_mode: AdvertisementShowMode::default(),
            playlist_id: None,
            is_recurring: true,
            start_date: None,
            end_date: None,
        }
    }
}

impl DraftBlockTemplate {
    /// Builds a validated block from the template. Pure: the template is
    /// left untouched.
    pub fn assign(
        &self,
        screen_id: ScreenId,
        day_of_week: DayOfWeek,
        start_time: TimeOfDay,
        end_time: TimeOfDay,
    ) -> ScheduleResult<ScheduledBlock> {
        let (playlist_id, show_mode, advertisement_show_mode) = match self.block_type {
            BlockType::Playlist => (self.playlist_id.clone(), Some(self.show_mode), None),
            BlockType::Advertisement => (None, None, Some(self.advertisement_show_mode)),
        };

        let block = ScheduledBlock {
            screen_id,
            day_of_week,
            start_date: self.start_date,
            end_date: self.end_date,
            start_time,
            end_time,
            playlist_id,
            priority: self.priority,
            block_type: self.block_type,
            is_recurring: self.is_recurring,
            show_mode,
            advertisement_show_mode,
        };
        block.validate()?;

        Ok(block)
    }
}
