//! Free-slot discovery inside a search window.

use crate::model::event::Event;
use crate::model::time_range::TimeRange;
use chrono::Duration;

/// Finds gaps of at least `min_duration` inside `window`, given busy events.
///
/// Busy events outside the window are ignored. Gaps are returned in
/// chronological order; that ordering is the tie-break used by conflict
/// resolution, where the earliest sufficiently large gap always wins.
pub fn find_free_slots(window: TimeRange, min_duration: Duration, busy: &[Event]) -> Vec<TimeRange> {
    let mut in_window: Vec<&Event> = busy
        .iter()
        .filter(|event| event.start < window.end && event.end > window.start)
        .collect();
    in_window.sort_by_key(|event| event.start);

    let mut slots = Vec::new();
    let mut cursor = window.start;

    for event in in_window {
        if cursor < event.start && event.start - cursor >= min_duration {
            slots.push(TimeRange::new(cursor, event.start));
        }
        if event.end > cursor {
            cursor = event.end;
        }
    }

    if cursor < window.end && window.end - cursor >= min_duration {
        slots.push(TimeRange::new(cursor, window.end));
    }

    slots
}
