//! Core scheduling logic for Tempo.
//! This crate is the single source of truth for scheduling invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod parse;
pub mod repo;
pub mod schedule;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::category::{Category, PriorityTable};
pub use model::event::{Event, EventId, EventValidationError, UserId};
pub use model::time_range::TimeRange;
pub use parse::temporal::{TemporalParser, TemporalParserError};
pub use repo::event_repo::{
    EventRepository, EventWindowQuery, RepoError, RepoResult, SqliteEventRepository,
};
pub use schedule::conflict::detect_conflicts;
pub use schedule::resolve::{resolve_conflicts, Placement, ResolvedEvent, Resolution};
pub use schedule::slots::find_free_slots;
pub use service::scheduling_service::{SchedulingService, ServiceError, ServiceResult};
pub use service::CommitObserver;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
