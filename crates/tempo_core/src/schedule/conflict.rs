//! Pairwise conflict detection over event sets.

use crate::model::event::Event;

/// Half-open overlap check between two events.
///
/// Events that merely touch (`a.end == b.start`) do not conflict.
pub fn events_overlap(a: &Event, b: &Event) -> bool {
    a.start < b.end && b.start < a.end
}

/// Finds all pairwise overlaps, including nested and contained ranges.
///
/// Events are compared in start order; the inner scan stops as soon as a
/// later event starts at or after the current event's end, since no event
/// beyond that point can overlap it.
pub fn detect_conflicts(events: &[Event]) -> Vec<(Event, Event)> {
    let mut sorted: Vec<&Event> = events.iter().collect();
    sorted.sort_by_key(|event| event.start);

    let mut conflicts = Vec::new();
    for i in 0..sorted.len() {
        for later in &sorted[i + 1..] {
            if later.start >= sorted[i].end {
                break;
            }
            if events_overlap(sorted[i], later) {
                conflicts.push(((*sorted[i]).clone(), (*later).clone()));
            }
        }
    }

    conflicts
}

#[cfg(test)]
mod tests {
    use super::{detect_conflicts, events_overlap};
    use crate::model::event::Event;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn event(start_hour: u32, end_hour: u32) -> Event {
        Event::new(
            Uuid::new_v4(),
            "block",
            "Social",
            Utc.with_ymd_and_hms(2025, 6, 2, start_hour, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 6, 2, end_hour, 0, 0).unwrap(),
        )
    }

    #[test]
    fn touching_events_do_not_overlap() {
        let a = event(9, 10);
        let b = event(10, 11);
        assert!(!events_overlap(&a, &b));
        assert!(detect_conflicts(&[a, b]).is_empty());
    }

    #[test]
    fn nested_ranges_are_reported_for_every_pair() {
        let outer = event(10, 14);
        let first = event(11, 12);
        let second = event(11, 13);
        let after = event(14, 15);

        let conflicts = detect_conflicts(&[
            outer.clone(),
            first.clone(),
            second.clone(),
            after.clone(),
        ]);

        let ids: Vec<(Uuid, Uuid)> = conflicts.iter().map(|(a, b)| (a.uuid, b.uuid)).collect();
        assert_eq!(conflicts.len(), 3);
        assert!(ids.contains(&(outer.uuid, first.uuid)));
        assert!(ids.contains(&(outer.uuid, second.uuid)));
        assert!(ids.contains(&(first.uuid, second.uuid)));
    }
}
