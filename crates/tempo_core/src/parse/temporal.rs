//! Temporal expression resolver.
//!
//! # Responsibility
//! - Turn phrases like "next friday evening" or "wednesday and thursday
//!   evening" into absolute start/end pairs in the user's timezone.
//!
//! # Invariants
//! - Pattern classes are evaluated in strict priority order; resolution
//!   stops at the first matching class.
//! - Duration extraction is independent of day matching and always applied.
//! - Returned instants are never timezone-naive; output is chronological.
//! - No match is a normal empty result the caller must check, not an error.

use crate::model::time_range::TimeRange;
use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Weekday vocabulary, longest spellings first so abbreviations cannot
/// shadow full names.
const WEEKDAY_PATTERN: &str = "monday|tuesday|tues|wednesday|thursday|thurs|thur|friday|saturday|sunday|mon|tue|wed|thu|fri|sat|sun";

static NOW_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(right now|currently|now)\b").expect("valid now regex"));
static TODAY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\btoday\b").expect("valid today regex"));
static TONIGHT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\btonight\b").expect("valid tonight regex"));
static TOMORROW_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\btomorrow\b").expect("valid tomorrow regex"));
static NEXT_WEEKDAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"\bnext\s+({WEEKDAY_PATTERN})\b")).expect("valid next-weekday regex")
});
static THIS_WEEKDAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"\bthis\s+({WEEKDAY_PATTERN})\b")).expect("valid this-weekday regex")
});
static MULTI_DAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"\b({WEEKDAY_PATTERN})\s+and\s+({WEEKDAY_PATTERN})\b"
    ))
    .expect("valid multi-day regex")
});
static BARE_WEEKDAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"\b({WEEKDAY_PATTERN})\b")).expect("valid bare-weekday regex")
});
static IN_DAYS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bin\s+(\d+)\s+days?\b").expect("valid in-days regex"));
static IN_WEEKS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bin\s+(\d+)\s+weeks?\b").expect("valid in-weeks regex"));
static NEXT_WEEK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bnext\s+week\b").expect("valid next-week regex"));
static AT_CLOCK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bat\s+(\d{1,2})(?::(\d{2}))?\s*(am|pm)\b").expect("valid at-clock regex")
});
static CLOCK_MERIDIEM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:at\s+)?(\d{1,2})(?::(\d{2}))?\s*(am|pm)\b").expect("valid clock regex")
});
static CLOCK_24H_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2}):(\d{2})\b").expect("valid 24h clock regex"));
static HOURS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:for\s+)?(\d+(?:\.\d+)?)\s*(?:hours?|hrs?)\b").expect("valid hours regex")
});
static MINUTES_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:for\s+)?(\d+)\s*(?:minutes?|mins?)\b").expect("valid minutes regex")
});

/// Word-level day parts mapped to fixed local hours.
const TIME_OF_DAY_WORDS: [(&str, u32); 4] =
    [("morning", 9), ("afternoon", 14), ("evening", 18), ("night", 20)];

const DEFAULT_HOUR: u32 = 14;
const EVENING_CUTOFF_HOUR: u32 = 18;
const TONIGHT_HOUR: u32 = 20;

/// Resolver construction failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemporalParserError {
    /// Timezone id is not a known IANA identifier.
    UnknownTimezone(String),
}

impl Display for TemporalParserError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownTimezone(id) => write!(f, "unknown timezone id: `{id}`"),
        }
    }
}

impl Error for TemporalParserError {}

/// Parser for natural-language temporal expressions.
///
/// Handles relative days (tomorrow, next friday), multi-day ranges
/// (wednesday and thursday evening), relative offsets (in 2 weeks) and bare
/// clock times, always relative to a fixed reference instant in the user's
/// timezone.
#[derive(Debug, Clone)]
pub struct TemporalParser {
    tz: Tz,
    reference: DateTime<Tz>,
}

impl TemporalParser {
    /// Creates a resolver for one user timezone.
    ///
    /// `reference` defaults to the current instant; it is converted into the
    /// user's timezone before any wall-clock arithmetic happens.
    pub fn new(
        timezone_id: &str,
        reference: Option<DateTime<Utc>>,
    ) -> Result<Self, TemporalParserError> {
        let tz: Tz = timezone_id
            .parse()
            .map_err(|_| TemporalParserError::UnknownTimezone(timezone_id.to_string()))?;
        let reference = reference.unwrap_or_else(Utc::now).with_timezone(&tz);
        Ok(Self { tz, reference })
    }

    /// The reference instant, in the user's timezone.
    pub fn reference(&self) -> DateTime<Tz> {
        self.reference
    }

    /// Resolves temporal expressions in `text` into time ranges.
    ///
    /// Pattern classes are tried in strict order and the first match wins.
    /// Returns an empty vector when nothing matches; callers must treat this
    /// as "insufficient temporal information", not as a failure.
    pub fn resolve(&self, text: &str) -> Vec<TimeRange> {
        let text = text.to_lowercase();
        let duration = extract_duration(&text);

        if NOW_RE.is_match(&text) {
            return vec![self.range_from(self.reference, duration)];
        }

        if TODAY_RE.is_match(&text) {
            return self.single(self.today_at(&text), duration);
        }

        if TONIGHT_RE.is_match(&text) {
            let Some(mut start) = self.today_at(&text) else {
                return Vec::new();
            };
            if start.hour() < EVENING_CUTOFF_HOUR {
                match self.at_time(start.date_naive(), TONIGHT_HOUR, 0) {
                    Some(evening) => start = evening,
                    None => return Vec::new(),
                }
            }
            return vec![self.range_from(start, duration)];
        }

        if TOMORROW_RE.is_match(&text) {
            return self.single(self.day_ahead_at(1, &text), duration);
        }

        if let Some(caps) = NEXT_WEEKDAY_RE.captures(&text) {
            return self.single(self.next_weekday_at(&caps[1], &text), duration);
        }

        if let Some(caps) = THIS_WEEKDAY_RE.captures(&text) {
            return self.single(self.this_weekday_at(&caps[1], &text), duration);
        }

        if let Some(caps) = MULTI_DAY_RE.captures(&text) {
            return self.multi_day_range(&caps[1], &caps[2], &text, duration);
        }

        // A bare weekday with no qualifier means its next occurrence.
        if let Some(caps) = BARE_WEEKDAY_RE.captures(&text) {
            return self.single(self.next_weekday_at(&caps[1], &text), duration);
        }

        if let Some(days) = captured_number(&IN_DAYS_RE, &text) {
            return self.single(self.day_ahead_at(days, &text), duration);
        }

        if let Some(weeks) = captured_number(&IN_WEEKS_RE, &text) {
            return self.single(self.day_ahead_at(weeks * 7, &text), duration);
        }

        if NEXT_WEEK_RE.is_match(&text) {
            return self.single(self.day_ahead_at(7, &text), duration);
        }

        // Bare clock time with meridiem and no day qualifier: assume today,
        // roll to tomorrow when the time has already passed.
        if AT_CLOCK_RE.is_match(&text) {
            let Some(start) = self.today_at(&text) else {
                return Vec::new();
            };
            if start < self.reference {
                return self.single(self.day_ahead_at(1, &text), duration);
            }
            return vec![self.range_from(start, duration)];
        }

        Vec::new()
    }

    fn single(&self, start: Option<DateTime<Tz>>, duration: Duration) -> Vec<TimeRange> {
        match start {
            Some(start) => vec![self.range_from(start, duration)],
            None => Vec::new(),
        }
    }

    fn range_from(&self, start: DateTime<Tz>, duration: Duration) -> TimeRange {
        TimeRange::new(
            start.with_timezone(&Utc),
            (start + duration).with_timezone(&Utc),
        )
    }

    /// Localizes a wall-clock time on `date` in the user's timezone.
    ///
    /// Returns `None` for times that do not exist locally (DST gaps); such
    /// expressions resolve to nothing rather than a wrong instant.
    fn at_time(&self, date: NaiveDate, hour: u32, minute: u32) -> Option<DateTime<Tz>> {
        let naive = date.and_hms_opt(hour, minute, 0)?;
        self.tz.from_local_datetime(&naive).earliest()
    }

    fn today_at(&self, text: &str) -> Option<DateTime<Tz>> {
        let (hour, minute) = extract_time_of_day(text);
        self.at_time(self.reference.date_naive(), hour, minute)
    }

    fn day_ahead_at(&self, days: i64, text: &str) -> Option<DateTime<Tz>> {
        let (hour, minute) = extract_time_of_day(text);
        self.at_time(self.reference.date_naive() + Duration::days(days), hour, minute)
    }

    /// Next occurrence strictly after today; a target equal to today's
    /// weekday lands seven days out.
    fn next_weekday_at(&self, weekday: &str, text: &str) -> Option<DateTime<Tz>> {
        let target = weekday_index(weekday)?;
        self.day_ahead_at(self.days_until(target, false), text)
    }

    /// Occurrence within the current week; already-passed days roll to next
    /// week, today counts as this week.
    fn this_weekday_at(&self, weekday: &str, text: &str) -> Option<DateTime<Tz>> {
        let target = weekday_index(weekday)?;
        self.day_ahead_at(self.days_until(target, true), text)
    }

    fn days_until(&self, target_weekday: u32, today_counts: bool) -> i64 {
        let current = i64::from(self.reference.weekday().num_days_from_monday());
        let mut ahead = i64::from(target_weekday) - current;
        let rolls = if today_counts { ahead < 0 } else { ahead <= 0 };
        if rolls {
            ahead += 7;
        }
        ahead
    }

    /// One entry per calendar day from the first weekday through the second,
    /// inclusive. Identical weekdays collapse to a single entry; a second
    /// occurrence that would land on or before the first is pushed a week.
    fn multi_day_range(
        &self,
        first_weekday: &str,
        second_weekday: &str,
        text: &str,
        duration: Duration,
    ) -> Vec<TimeRange> {
        let (Some(first), Some(second)) =
            (weekday_index(first_weekday), weekday_index(second_weekday))
        else {
            return Vec::new();
        };
        let (hour, minute) = extract_time_of_day(text);

        let first_date = self.reference.date_naive() + Duration::days(self.days_until(first, false));
        if first == second {
            return self.single(self.at_time(first_date, hour, minute), duration);
        }

        let mut second_date =
            self.reference.date_naive() + Duration::days(self.days_until(second, false));
        if second_date <= first_date {
            second_date += Duration::days(7);
        }

        let mut results = Vec::new();
        let mut day = first_date;
        while day <= second_date {
            if let Some(start) = self.at_time(day, hour, minute) {
                results.push(self.range_from(start, duration));
            }
            day += Duration::days(1);
        }

        results
    }
}

/// Resolves `text` against `timezone_id` in one call.
///
/// Convenience wrapper for callers that do not reuse the parser.
pub fn resolve(
    text: &str,
    timezone_id: &str,
    reference: Option<DateTime<Utc>>,
) -> Result<Vec<TimeRange>, TemporalParserError> {
    Ok(TemporalParser::new(timezone_id, reference)?.resolve(text))
}

/// Extracts an explicit duration; hours beat minutes, default is one hour.
fn extract_duration(text: &str) -> Duration {
    if let Some(caps) = HOURS_RE.captures(text) {
        if let Ok(hours) = caps[1].parse::<f64>() {
            return Duration::minutes((hours * 60.0).round() as i64);
        }
    }

    if let Some(caps) = MINUTES_RE.captures(text) {
        if let Ok(minutes) = caps[1].parse::<i64>() {
            return Duration::minutes(minutes);
        }
    }

    Duration::hours(1)
}

/// Extracts a wall-clock time of day as `(hour, minute)`.
///
/// Preference order: explicit clock with meridiem, 24-hour colon notation,
/// day-part words, then the 14:00 default.
fn extract_time_of_day(text: &str) -> (u32, u32) {
    if let Some(caps) = CLOCK_MERIDIEM_RE.captures(text) {
        if let Some(clock) = meridiem_clock(&caps) {
            return clock;
        }
    }

    if let Some(caps) = CLOCK_24H_RE.captures(text) {
        let hour = caps[1].parse::<u32>().ok();
        let minute = caps[2].parse::<u32>().ok();
        if let (Some(hour @ 0..=23), Some(minute @ 0..=59)) = (hour, minute) {
            return (hour, minute);
        }
    }

    for (word, hour) in TIME_OF_DAY_WORDS {
        if text.contains(word) {
            return (hour, 0);
        }
    }

    (DEFAULT_HOUR, 0)
}

fn meridiem_clock(caps: &regex::Captures<'_>) -> Option<(u32, u32)> {
    let mut hour: u32 = caps[1].parse().ok()?;
    let minute: u32 = match caps.get(2) {
        Some(m) => m.as_str().parse().ok()?,
        None => 0,
    };
    if hour > 12 || minute > 59 {
        return None;
    }

    match &caps[3] {
        "pm" if hour != 12 => hour += 12,
        "am" if hour == 12 => hour = 0,
        _ => {}
    }

    Some((hour, minute))
}

fn captured_number(re: &Regex, text: &str) -> Option<i64> {
    re.captures(text).and_then(|caps| caps[1].parse().ok())
}

fn weekday_index(name: &str) -> Option<u32> {
    match name {
        "monday" | "mon" => Some(0),
        "tuesday" | "tues" | "tue" => Some(1),
        "wednesday" | "wed" => Some(2),
        "thursday" | "thurs" | "thur" | "thu" => Some(3),
        "friday" | "fri" => Some(4),
        "saturday" | "sat" => Some(5),
        "sunday" | "sun" => Some(6),
        _ => None,
    }
}
