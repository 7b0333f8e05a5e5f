use chrono::{DateTime, TimeZone, Utc};
use tempo_core::TemporalParser;

/// Monday, 2025-06-02 09:00 UTC.
fn monday_morning() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap()
}

fn utc_parser() -> TemporalParser {
    TemporalParser::new("UTC", Some(monday_morning())).unwrap()
}

#[test]
fn next_friday_with_clock_and_duration() {
    let ranges = utc_parser().resolve("team dinner next friday at 2pm for 2 hours");

    assert_eq!(ranges.len(), 1);
    assert_eq!(ranges[0].start, Utc.with_ymd_and_hms(2025, 6, 6, 14, 0, 0).unwrap());
    assert_eq!(ranges[0].end, Utc.with_ymd_and_hms(2025, 6, 6, 16, 0, 0).unwrap());
}

#[test]
fn multi_day_span_yields_one_range_per_day() {
    let ranges = utc_parser().resolve("study wednesday and thursday evening");

    assert_eq!(ranges.len(), 2);
    assert_eq!(ranges[0].start, Utc.with_ymd_and_hms(2025, 6, 4, 18, 0, 0).unwrap());
    assert_eq!(ranges[1].start, Utc.with_ymd_and_hms(2025, 6, 5, 18, 0, 0).unwrap());
    for range in &ranges {
        assert_eq!(range.duration(), chrono::Duration::hours(1));
    }
}

#[test]
fn tonight_forces_daytime_clock_into_the_evening() {
    let ranges = utc_parser().resolve("call mom tonight at 5pm");

    assert_eq!(ranges.len(), 1);
    assert_eq!(ranges[0].start, Utc.with_ymd_and_hms(2025, 6, 2, 20, 0, 0).unwrap());
}

#[test]
fn tonight_keeps_an_evening_clock() {
    let ranges = utc_parser().resolve("movie tonight at 9pm");

    assert_eq!(ranges.len(), 1);
    assert_eq!(ranges[0].start, Utc.with_ymd_and_hms(2025, 6, 2, 21, 0, 0).unwrap());
}

#[test]
fn bare_clock_in_the_past_rolls_to_tomorrow() {
    // Reference is 09:00, so 8am today is already gone.
    let ranges = utc_parser().resolve("standup at 8am");

    assert_eq!(ranges.len(), 1);
    assert_eq!(ranges[0].start, Utc.with_ymd_and_hms(2025, 6, 3, 8, 0, 0).unwrap());
}

#[test]
fn bare_clock_later_today_stays_today() {
    let ranges = utc_parser().resolve("standup at 11am");

    assert_eq!(ranges.len(), 1);
    assert_eq!(ranges[0].start, Utc.with_ymd_and_hms(2025, 6, 2, 11, 0, 0).unwrap());
}

#[test]
fn weekday_arithmetic_happens_in_the_user_timezone() {
    // 09:00 UTC is 05:00 in New York; tomorrow 9am local is 13:00 UTC.
    let parser = TemporalParser::new("America/New_York", Some(monday_morning())).unwrap();
    let ranges = parser.resolve("dentist tomorrow at 9am");

    assert_eq!(ranges.len(), 1);
    assert_eq!(ranges[0].start, Utc.with_ymd_and_hms(2025, 6, 3, 13, 0, 0).unwrap());
}

#[test]
fn in_n_days_and_weeks_offsets() {
    let parser = utc_parser();

    let days = parser.resolve("review in 3 days");
    assert_eq!(days.len(), 1);
    assert_eq!(days[0].start, Utc.with_ymd_and_hms(2025, 6, 5, 14, 0, 0).unwrap());

    let weeks = parser.resolve("checkup in 2 weeks");
    assert_eq!(weeks.len(), 1);
    assert_eq!(weeks[0].start, Utc.with_ymd_and_hms(2025, 6, 16, 14, 0, 0).unwrap());
}

#[test]
fn resolution_is_deterministic_for_a_fixed_reference() {
    let parser = utc_parser();
    let first = parser.resolve("gym tomorrow morning for 90 minutes");
    let second = parser.resolve("gym tomorrow morning for 90 minutes");
    assert_eq!(first, second);
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].duration(), chrono::Duration::minutes(90));
}

#[test]
fn text_without_temporal_content_resolves_to_nothing() {
    assert!(utc_parser().resolve("water the plants").is_empty());
    assert!(utc_parser().resolve("").is_empty());
}

#[test]
fn unknown_timezone_is_rejected() {
    assert!(TemporalParser::new("Mars/Olympus", None).is_err());
}
