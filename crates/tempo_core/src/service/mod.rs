//! Scheduling orchestration services.
//!
//! # Responsibility
//! - Wrap the pure scheduling algorithms with owner-scoped atomic
//!   persistence and audit records.
//! - Expose the post-commit seam external collaborators (calendar sync)
//!   subscribe to.
//!
//! # Invariants
//! - Every mutating entry point is one all-or-nothing transaction producing
//!   exactly one audit record.
//! - Observers run strictly after commit; no external call ever happens
//!   inside a transaction.

use crate::model::event::{EventId, UserId};

pub mod scheduling_service;

/// Post-commit notification hook.
///
/// Implemented by external collaborators (e.g. the remote calendar sync
/// wrapper) that need to react to committed schedule changes. The core
/// calls this outside any transaction, so observer latency never extends a
/// lock.
pub trait CommitObserver {
    /// Called once per committed scheduling operation with the ids of the
    /// events that were created, moved, updated or deleted.
    fn schedule_committed(&self, owner: UserId, changed_events: &[EventId]);
}
