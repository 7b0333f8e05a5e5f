//! Event domain model.
//!
//! # Responsibility
//! - Define the calendar event record shared by parser, engine and storage.
//! - Validate temporal ordering before anything reaches persistence.
//!
//! # Invariants
//! - `end > start` always; construction that violates this must be rejected
//!   by `validate()` before any write.
//! - `flexible == false` marks an event the resolution pass may never move.

use crate::model::time_range::TimeRange;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a persisted event.
pub type EventId = Uuid;

/// Stable identifier for the owning user.
///
/// The core never interprets this beyond partitioning: all mutating
/// operations are scoped to a single owner.
pub type UserId = Uuid;

/// Validation failures raised before an event may be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventValidationError {
    /// `end` is not strictly after `start`.
    EndNotAfterStart {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    /// Title is empty or whitespace-only.
    BlankTitle,
}

impl Display for EventValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EndNotAfterStart { start, end } => {
                write!(f, "event end {end} must be after start {start}")
            }
            Self::BlankTitle => write!(f, "event title must not be blank"),
        }
    }
}

impl Error for EventValidationError {}

/// Calendar event with scheduling metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Stable global ID used for linking, audit references and sync mapping.
    pub uuid: EventId,
    /// Owning user; mutating operations are partitioned by this value.
    pub owner: UserId,
    pub title: String,
    pub description: String,
    /// Category name resolved against a `PriorityTable` by the engine.
    pub category: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Whether the resolution pass may move this event in time.
    pub flexible: bool,
    pub completed: bool,
    /// Identifier on the external calendar, when the event has been synced.
    pub external_ref: Option<String>,
}

impl Event {
    /// Creates a new flexible, uncompleted event with a generated ID.
    pub fn new(
        owner: UserId,
        title: impl Into<String>,
        category: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            owner,
            title: title.into(),
            description: String::new(),
            category: category.into(),
            start,
            end,
            flexible: true,
            completed: false,
            external_ref: None,
        }
    }

    /// Checks the temporal and content invariants.
    ///
    /// Write paths must call this before any SQL mutation.
    pub fn validate(&self) -> Result<(), EventValidationError> {
        if self.end <= self.start {
            return Err(EventValidationError::EndNotAfterStart {
                start: self.start,
                end: self.end,
            });
        }
        if self.title.trim().is_empty() {
            return Err(EventValidationError::BlankTitle);
        }
        Ok(())
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Returns the occupied time range.
    pub fn time_range(&self) -> TimeRange {
        TimeRange::new(self.start, self.end)
    }
}
