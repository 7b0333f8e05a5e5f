//! Priority-based conflict resolution.
//!
//! # Responsibility
//! - Turn a possibly-conflicting event set into a placed event set under the
//!   category priority hierarchy.
//!
//! # Invariants
//! - Output length always equals input length; resolution never creates or
//!   destroys events.
//! - Duration and category are never altered; only start/end may move.
//! - Non-flexible events are never moved, though they may be left in
//!   conflict and still block lower-priority events.
//!
//! The algorithm is a greedy heuristic (priority sort plus earliest
//! first-fit), not an optimal packer. The tie-break order `(-priority,
//! start)` is deterministic and load-bearing for callers.

use crate::model::category::PriorityTable;
use crate::model::event::{Event, EventId};
use crate::model::time_range::TimeRange;
use crate::schedule::conflict::events_overlap;
use crate::schedule::slots::find_free_slots;
use chrono::Duration;
use log::warn;

/// How far forward a displaced event may be pushed.
pub const RESCHEDULE_HORIZON_DAYS: i64 = 30;

/// How one event came out of a resolution pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Kept its original time; no conflict with any finalized event.
    Unchanged,
    /// Moved to the earliest free slot of identical duration.
    Moved,
    /// Still conflicting: either non-flexible, or no free slot existed
    /// within the search horizon. Requires the caller's attention.
    Unresolved,
}

/// One event with its resolution outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEvent {
    pub event: Event,
    pub placement: Placement,
}

/// Result of one resolution pass, in `(-priority, start)` walk order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    pub events: Vec<ResolvedEvent>,
}

impl Resolution {
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drops placement detail and keeps the placed events.
    pub fn into_events(self) -> Vec<Event> {
        self.events.into_iter().map(|placed| placed.event).collect()
    }

    pub fn iter_events(&self) -> impl Iterator<Item = &Event> {
        self.events.iter().map(|placed| &placed.event)
    }

    /// Events left at a still-conflicting time.
    pub fn unresolved(&self) -> impl Iterator<Item = &Event> {
        self.events
            .iter()
            .filter(|placed| placed.placement == Placement::Unresolved)
            .map(|placed| &placed.event)
    }

    pub fn has_unresolved(&self) -> bool {
        self.events
            .iter()
            .any(|placed| placed.placement == Placement::Unresolved)
    }

    /// Ids of events whose start/end changed during resolution.
    pub fn moved_ids(&self) -> Vec<EventId> {
        self.events
            .iter()
            .filter(|placed| placed.placement == Placement::Moved)
            .map(|placed| placed.event.uuid)
            .collect()
    }
}

/// Resolves conflicts in `events` under the given priority hierarchy.
///
/// Pure with respect to its input; the caller decides whether to persist
/// the outcome. Pass order: sort by `(-priority, start)` (stable, so input
/// order breaks exact ties), finalize each event unless it overlaps an
/// already-finalized one. Conflicting flexible events are deferred and then
/// first-fit into the earliest free slot of the same duration, searched
/// forward from their original start across a bounded horizon against the
/// finalized set. A deferred event with no slot inside the horizon keeps
/// its original time and is reported as [`Placement::Unresolved`].
pub fn resolve_conflicts(events: &[Event], priorities: &PriorityTable) -> Resolution {
    if events.is_empty() {
        return Resolution::default();
    }

    for event in events {
        if !priorities.contains(&event.category) {
            warn!(
                "event=resolve_conflicts module=schedule status=unknown_category category={} event_id={}",
                event.category, event.uuid
            );
        }
    }

    let mut sorted: Vec<Event> = events.to_vec();
    sorted.sort_by_key(|event| {
        (
            std::cmp::Reverse(priorities.priority_of(&event.category)),
            event.start,
        )
    });

    let mut finalized: Vec<ResolvedEvent> = Vec::new();
    // Mirror of the finalized events, used as the busy list for slot search.
    let mut busy: Vec<Event> = Vec::new();
    let mut deferred: Vec<Event> = Vec::new();

    for event in sorted {
        let conflicting = busy.iter().any(|placed| events_overlap(&event, placed));
        if !conflicting {
            busy.push(event.clone());
            finalized.push(ResolvedEvent {
                event,
                placement: Placement::Unchanged,
            });
        } else if event.flexible {
            deferred.push(event);
        } else {
            // Never moved, but still occupies its slot and blocks others.
            busy.push(event.clone());
            finalized.push(ResolvedEvent {
                event,
                placement: Placement::Unresolved,
            });
        }
    }

    for mut event in deferred {
        let duration = event.duration();
        let horizon = TimeRange::new(
            event.start,
            event.start + Duration::days(RESCHEDULE_HORIZON_DAYS),
        );

        let slots = find_free_slots(horizon, duration, &busy);
        let placement = match slots.first() {
            Some(slot) => {
                event.start = slot.start;
                event.end = slot.start + duration;
                Placement::Moved
            }
            None => Placement::Unresolved,
        };

        busy.push(event.clone());
        finalized.push(ResolvedEvent { event, placement });
    }

    Resolution { events: finalized }
}

#[cfg(test)]
mod tests {
    use super::{resolve_conflicts, Placement};
    use crate::model::category::PriorityTable;
    use crate::model::event::Event;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    #[test]
    fn empty_input_resolves_to_empty_output() {
        let resolution = resolve_conflicts(&[], &PriorityTable::default());
        assert!(resolution.is_empty());
        assert!(!resolution.has_unresolved());
    }

    #[test]
    fn disjoint_events_are_all_unchanged() {
        let owner = Uuid::new_v4();
        let events: Vec<Event> = (0u32..3)
            .map(|i| {
                Event::new(
                    owner,
                    format!("event {i}"),
                    "Social",
                    Utc.with_ymd_and_hms(2025, 6, 2, 8 + 2 * i, 0, 0).unwrap(),
                    Utc.with_ymd_and_hms(2025, 6, 2, 9 + 2 * i, 0, 0).unwrap(),
                )
            })
            .collect();

        let resolution = resolve_conflicts(&events, &PriorityTable::default());
        assert_eq!(resolution.len(), 3);
        assert!(resolution
            .events
            .iter()
            .all(|placed| placed.placement == Placement::Unchanged));
    }
}
