//! # Time Grid
//!
//! Pure helpers for the weekly grid: Monday-anchored weeks, day labels,
//! lenient time formatting and the slot rows used to draw the editor.
//! Nothing here touches shared state, so every function is safe to call
//! from any thread.

use chrono::{Datelike, Duration, NaiveDate};

use crate::errors::{ScheduleError, ScheduleResult};
use crate::models::time::{DayOfWeek, TimeOfDay};

/// The seven dates of the Monday-first week containing `date`.
pub fn week_of(date: NaiveDate) -> [NaiveDate; 7] {
    let monday = date - Duration::days(date.weekday().num_days_from_monday() as i64);
    std::array::from_fn(|offset| monday + Duration::days(offset as i64))
}

/// Date in `week` for a day label such as `"Wed"` or `"wednesday"`.
///
/// Unknown labels resolve to Monday so a bad label never breaks rendering.
pub fn day_label_to_date(label: &str, week: &[NaiveDate; 7]) -> NaiveDate {
    let day = DayOfWeek::from_label(label).unwrap_or(DayOfWeek::Monday);
    week[day.index()]
}

fn lenient_component(part: Option<&str>) -> Option<u8> {
    match part.map(str::trim) {
        None | Some("") => Some(0),
        Some(part) => part.parse().ok(),
    }
}

/// Formats loose user input (`"9:5"`, `"14"`) as a `TimeOfDay`.
///
/// Anything unparsable or out of range becomes `00:00`. Use
/// `str::parse::<TimeOfDay>` when the input must be validated.
pub fn normalize_time(input: &str) -> TimeOfDay {
    let mut parts = input.trim().split(':');
    let hour = lenient_component(parts.next());
    let minute = lenient_component(parts.next());

    match (hour, minute) {
        (Some(hour), Some(minute)) => {
            TimeOfDay::new(hour, minute).unwrap_or(TimeOfDay::MIDNIGHT)
        }
        _ => TimeOfDay::MIDNIGHT,
    }
}

/// Every `step_minutes` from `start` through `end`, both inclusive.
pub fn generate_slots(
    start: TimeOfDay,
    end: TimeOfDay,
    step_minutes: u16,
) -> ScheduleResult<Vec<TimeOfDay>> {
    if step_minutes == 0 {
        return Err(ScheduleError::Validation(
            "Slot step must be at least one minute".to_string(),
        ));
    }

    (start.minutes()..=end.minutes())
        .step_by(step_minutes as usize)
        .map(TimeOfDay::from_minutes)
        .collect()
}

pub fn to_minutes(time: TimeOfDay) -> u16 {
    time.minutes()
}
