use chrono::{Datelike, Duration, NaiveDate, Weekday};
use pretty_assertions::assert_eq;
use rstest::rstest;
use signage_core::{
    errors::ScheduleError,
    grid::{day_label_to_date, generate_slots, normalize_time, to_minutes, week_of},
    models::time::TimeOfDay,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn time(s: &str) -> TimeOfDay {
    s.parse().unwrap()
}

fn labels(slots: &[TimeOfDay]) -> Vec<String> {
    slots.iter().map(ToString::to_string).collect()
}

#[rstest]
#[case(date(2024, 3, 4))] // Monday
#[case(date(2024, 3, 6))]
#[case(date(2024, 3, 10))] // Sunday
#[case(date(2024, 12, 31))] // week spans the new year
#[case(date(2024, 2, 29))]
fn test_week_of_is_monday_anchored(#[case] day: NaiveDate) {
    let week = week_of(day);

    assert_eq!(week[0].weekday(), Weekday::Mon);
    assert_eq!(week[6].weekday(), Weekday::Sun);
    assert!(week[0] <= day && day <= week[6]);
    for pair in week.windows(2) {
        assert_eq!(pair[1] - pair[0], Duration::days(1));
    }
}

#[test]
fn test_week_of_is_idempotent() {
    let week = week_of(date(2024, 7, 18));

    for day in week {
        assert_eq!(week_of(day), week);
    }
}

#[test]
fn test_week_of_sunday_belongs_to_previous_monday() {
    let week = week_of(date(2024, 3, 10));

    assert_eq!(week[0], date(2024, 3, 4));
}

#[rstest]
#[case("Mon", date(2024, 3, 4))]
#[case("wed", date(2024, 3, 6))]
#[case("Friday", date(2024, 3, 8))]
#[case("SUN", date(2024, 3, 10))]
#[case("Funday", date(2024, 3, 4))]
#[case("", date(2024, 3, 4))]
fn test_day_label_to_date(#[case] label: &str, #[case] expected: NaiveDate) {
    let week = week_of(date(2024, 3, 7));

    assert_eq!(day_label_to_date(label, &week), expected);
}

#[rstest]
#[case("9:5", "09:05")]
#[case("09:30", "09:30")]
#[case("14", "14:00")]
#[case(":45", "00:45")]
#[case("", "00:00")]
#[case("ab:cd", "00:00")]
#[case("25:00", "00:00")]
#[case("12:75", "00:00")]
#[case(" 7:00 ", "07:00")]
fn test_normalize_time(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(normalize_time(input).to_string(), expected);
}

#[test]
fn test_generate_slots_half_hour() {
    let slots = generate_slots(time("09:00"), time("10:00"), 30).unwrap();

    assert_eq!(labels(&slots), vec!["09:00", "09:30", "10:00"]);
}

#[test]
fn test_generate_slots_single_point() {
    let slots = generate_slots(time("09:00"), time("09:00"), 15).unwrap();

    assert_eq!(labels(&slots), vec!["09:00"]);
}

#[test]
fn test_generate_slots_rolls_hours_and_stops_before_overshoot() {
    let slots = generate_slots(time("09:40"), time("10:30"), 25).unwrap();

    assert_eq!(labels(&slots), vec!["09:40", "10:05", "10:30"]);

    let slots = generate_slots(time("23:00"), time("23:59"), 45).unwrap();
    assert_eq!(labels(&slots), vec!["23:00", "23:45"]);
}

#[test]
fn test_generate_slots_whole_day() {
    let slots = generate_slots(TimeOfDay::MIDNIGHT, TimeOfDay::END_OF_DAY, 30).unwrap();

    assert_eq!(slots.len(), 48);
    assert_eq!(slots.first(), Some(&TimeOfDay::MIDNIGHT));
    assert_eq!(slots.last().map(ToString::to_string), Some("23:30".to_string()));
}

#[test]
fn test_generate_slots_empty_when_start_after_end() {
    let slots = generate_slots(time("10:00"), time("09:00"), 15).unwrap();

    assert!(slots.is_empty());
}

#[test]
fn test_generate_slots_rejects_zero_step() {
    let result = generate_slots(time("09:00"), time("10:00"), 0);

    assert!(matches!(result, Err(ScheduleError::Validation(_))));
}

#[rstest]
#[case("00:00", 0)]
#[case("01:30", 90)]
#[case("23:59", 1439)]
fn test_to_minutes(#[case] input: &str, #[case] expected: u16) {
    assert_eq!(to_minutes(time(input)), expected);
}
