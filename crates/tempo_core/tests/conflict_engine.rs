use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::HashSet;
use tempo_core::model::category::PriorityTable;
use tempo_core::{detect_conflicts, find_free_slots, resolve_conflicts, Event, Placement, TimeRange};
use uuid::Uuid;

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, day, hour, 0, 0).unwrap()
}

fn event(owner: Uuid, title: &str, category: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Event {
    Event::new(owner, title, category, start, end)
}

#[test]
fn touching_events_do_not_conflict() {
    let owner = Uuid::new_v4();
    let first = event(owner, "a", "Social", at(2, 9), at(2, 10));
    let second = event(owner, "b", "Social", at(2, 10), at(2, 11));

    assert!(detect_conflicts(&[first, second]).is_empty());
}

#[test]
fn nested_and_overlapping_events_conflict_pairwise() {
    let owner = Uuid::new_v4();
    let outer = event(owner, "outer", "Social", at(2, 10), at(2, 14));
    let inner_a = event(owner, "inner a", "Social", at(2, 11), at(2, 12));
    let inner_b = event(owner, "inner b", "Social", at(2, 11), at(2, 13));
    let after = event(owner, "after", "Social", at(2, 14), at(2, 15));

    let conflicts = detect_conflicts(&[outer.clone(), inner_a.clone(), inner_b.clone(), after]);
    assert_eq!(conflicts.len(), 3);

    let pairs: HashSet<(Uuid, Uuid)> = conflicts
        .iter()
        .map(|(a, b)| (a.uuid, b.uuid))
        .collect();
    assert!(pairs.contains(&(outer.uuid, inner_a.uuid)));
    assert!(pairs.contains(&(outer.uuid, inner_b.uuid)));
    assert!(pairs.contains(&(inner_a.uuid, inner_b.uuid)));
}

#[test]
fn free_slots_respect_minimum_duration_and_busy_times() {
    let owner = Uuid::new_v4();
    let window = TimeRange::new(at(2, 8), at(2, 18));
    let busy = vec![
        event(owner, "a", "Social", at(2, 9), at(2, 10)),
        event(owner, "b", "Social", at(2, 10), at(2, 12)),
        event(owner, "c", "Social", at(2, 15), at(2, 16)),
    ];

    let slots = find_free_slots(window, Duration::hours(2), &busy);
    assert_eq!(slots.len(), 2);
    assert_eq!(slots[0], TimeRange::new(at(2, 12), at(2, 15)));
    assert_eq!(slots[1], TimeRange::new(at(2, 16), at(2, 18)));

    for slot in &slots {
        assert!(slot.duration() >= Duration::hours(2));
        for event in &busy {
            assert!(!slot.overlaps(&event.time_range()));
        }
    }
}

#[test]
fn lower_priority_flexible_event_moves_to_the_next_free_slot() {
    let owner = Uuid::new_v4();
    let mut exam = event(owner, "algebra exam", "Exam", at(6, 9), at(6, 12));
    exam.flexible = false;
    let study = event(owner, "algebra review", "Study", at(5, 18), at(5, 20));
    let gaming = event(owner, "ranked matches", "Gaming", at(5, 18), at(5, 20));

    let resolution = resolve_conflicts(
        &[exam.clone(), study.clone(), gaming.clone()],
        &PriorityTable::default(),
    );

    assert_eq!(resolution.len(), 3);
    assert!(!resolution.has_unresolved());

    let placed_gaming = resolution
        .events
        .iter()
        .find(|placed| placed.event.uuid == gaming.uuid)
        .unwrap();
    assert_eq!(placed_gaming.placement, Placement::Moved);
    assert_eq!(placed_gaming.event.start, at(5, 20));
    assert_eq!(placed_gaming.event.end, at(5, 22));

    // Higher-priority events keep their original times.
    for placed in &resolution.events {
        if placed.event.uuid != gaming.uuid {
            assert_eq!(placed.placement, Placement::Unchanged);
        }
    }
}

#[test]
fn resolution_preserves_count_duration_and_category() {
    let owner = Uuid::new_v4();
    let events = vec![
        event(owner, "study", "Study", at(2, 10), at(2, 12)),
        event(owner, "gym", "Gym", at(2, 10), at(2, 11)),
        event(owner, "coffee", "Social", at(2, 11), at(2, 12)),
    ];

    let resolution = resolve_conflicts(&events, &PriorityTable::default());
    assert_eq!(resolution.len(), events.len());

    for original in &events {
        let placed = resolution
            .events
            .iter()
            .find(|placed| placed.event.uuid == original.uuid)
            .unwrap();
        assert_eq!(placed.event.duration(), original.duration());
        assert_eq!(placed.event.category, original.category);
    }
}

#[test]
fn non_flexible_event_is_left_unresolved_but_still_blocks() {
    let owner = Uuid::new_v4();
    let mut exam = event(owner, "exam", "Exam", at(2, 10), at(2, 12));
    exam.flexible = false;
    let mut fixed_gym = event(owner, "team training", "Gym", at(2, 10), at(2, 11));
    fixed_gym.flexible = false;
    let social = event(owner, "brunch", "Social", at(2, 10), at(2, 11));

    let resolution = resolve_conflicts(
        &[exam.clone(), fixed_gym.clone(), social.clone()],
        &PriorityTable::default(),
    );

    let placed_gym = resolution
        .events
        .iter()
        .find(|placed| placed.event.uuid == fixed_gym.uuid)
        .unwrap();
    assert_eq!(placed_gym.placement, Placement::Unresolved);
    assert_eq!(placed_gym.event.start, fixed_gym.start);

    // The flexible social event must dodge both immovable events.
    let placed_social = resolution
        .events
        .iter()
        .find(|placed| placed.event.uuid == social.uuid)
        .unwrap();
    assert_eq!(placed_social.placement, Placement::Moved);
    assert!(placed_social.event.start >= at(2, 12));
}

#[test]
fn flexible_event_with_no_slot_in_the_horizon_stays_put_unresolved() {
    let owner = Uuid::new_v4();
    // An immovable block covering well past the 30-day search horizon.
    let mut marathon = Event::new(
        owner,
        "exam season",
        "Exam",
        Utc.with_ymd_and_hms(2025, 6, 2, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2025, 7, 10, 0, 0, 0).unwrap(),
    );
    marathon.flexible = false;
    let gaming = event(owner, "ranked matches", "Gaming", at(2, 18), at(2, 20));

    let resolution = resolve_conflicts(
        &[marathon.clone(), gaming.clone()],
        &PriorityTable::default(),
    );

    assert_eq!(resolution.len(), 2);
    assert!(resolution.has_unresolved());

    let placed_gaming = resolution
        .events
        .iter()
        .find(|placed| placed.event.uuid == gaming.uuid)
        .unwrap();
    assert_eq!(placed_gaming.placement, Placement::Unresolved);
    assert_eq!(placed_gaming.event.start, gaming.start);
    assert_eq!(placed_gaming.event.end, gaming.end);

    let placed_marathon = resolution
        .events
        .iter()
        .find(|placed| placed.event.uuid == marathon.uuid)
        .unwrap();
    assert_eq!(placed_marathon.placement, Placement::Unchanged);
}

#[test]
fn unknown_category_sorts_below_every_known_one() {
    let owner = Uuid::new_v4();
    let study = event(owner, "study", "Study", at(2, 10), at(2, 12));
    let mystery = event(owner, "errand", "Errand", at(2, 10), at(2, 12));

    let resolution = resolve_conflicts(&[mystery.clone(), study.clone()], &PriorityTable::default());

    let placed_study = resolution
        .events
        .iter()
        .find(|placed| placed.event.uuid == study.uuid)
        .unwrap();
    assert_eq!(placed_study.placement, Placement::Unchanged);

    let placed_mystery = resolution
        .events
        .iter()
        .find(|placed| placed.event.uuid == mystery.uuid)
        .unwrap();
    assert_eq!(placed_mystery.placement, Placement::Moved);
}
