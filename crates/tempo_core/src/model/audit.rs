//! Audit record for scheduling operations.
//!
//! # Invariants
//! - Records are write-once and append-only.
//! - A record is created in the same atomic unit as the mutation it
//!   describes; a rolled-back unit leaves no record behind.

use crate::model::event::{EventId, UserId};
use serde::{Deserialize, Serialize};

/// Action tag describing what a scheduling operation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    Optimize,
    BulkUpdate,
    BulkDelete,
}

impl AuditAction {
    /// Storage tag, stable across releases.
    pub fn as_db_str(self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Optimize => "OPTIMIZE",
            Self::BulkUpdate => "BULK_UPDATE",
            Self::BulkDelete => "BULK_DELETE",
        }
    }

    pub fn parse_db_str(value: &str) -> Option<Self> {
        match value {
            "CREATE" => Some(Self::Create),
            "UPDATE" => Some(Self::Update),
            "DELETE" => Some(Self::Delete),
            "OPTIMIZE" => Some(Self::Optimize),
            "BULK_UPDATE" => Some(Self::BulkUpdate),
            "BULK_DELETE" => Some(Self::BulkDelete),
            _ => None,
        }
    }
}

/// One persisted audit entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub owner: UserId,
    pub action: AuditAction,
    /// Referenced event, when the action concerns exactly one.
    pub event: Option<EventId>,
    /// Structured operation detail (ids, counts, window bounds).
    pub details: serde_json::Value,
    /// Unix epoch milliseconds, assigned by storage at insert time.
    pub recorded_at_ms: i64,
}

#[cfg(test)]
mod tests {
    use super::AuditAction;

    #[test]
    fn db_tags_round_trip() {
        for action in [
            AuditAction::Create,
            AuditAction::Update,
            AuditAction::Delete,
            AuditAction::Optimize,
            AuditAction::BulkUpdate,
            AuditAction::BulkDelete,
        ] {
            assert_eq!(AuditAction::parse_db_str(action.as_db_str()), Some(action));
        }
        assert_eq!(AuditAction::parse_db_str("RESCHEDULE"), None);
    }
}
