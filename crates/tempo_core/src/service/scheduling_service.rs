//! Priority scheduling engine over persisted events.
//!
//! # Responsibility
//! - Orchestrate conflict detection, resolution and free-slot search
//!   against one owner's persisted schedule.
//! - Execute every multi-record mutation as a single atomic unit with an
//!   audit record in the same transaction.
//!
//! # Invariants
//! - The priority hierarchy is an injected value, never global state.
//! - A failed unit rolls back completely: no partial event moves, no
//!   orphan audit record; the triggering error is re-raised.
//! - Observers are notified only after a successful commit.

use crate::model::audit::AuditAction;
use crate::model::category::PriorityTable;
use crate::model::event::{Event, EventId, UserId};
use crate::model::time_range::TimeRange;
use crate::repo::audit_repo;
use crate::repo::event_repo::{
    EventRepository, EventWindowQuery, RepoError, RepoResult, SqliteEventRepository,
};
use crate::schedule::resolve::{resolve_conflicts, Resolution};
use crate::schedule::study_plan::{build_study_sessions, StudyPlanOptions};
use log::info;
use rusqlite::{Connection, TransactionBehavior};
use serde_json::json;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Category assigned to generated study sessions.
const STUDY_CATEGORY: &str = "Study";

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors raised by scheduling service entry points.
#[derive(Debug)]
pub enum ServiceError {
    Repo(RepoError),
    /// An event passed to a bulk operation belongs to a different owner.
    ForeignEvent(EventId),
    /// Study-session generation was asked for zero sessions.
    InvalidSessionCount(u32),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::ForeignEvent(id) => write!(f, "event {id} belongs to a different owner"),
            Self::InvalidSessionCount(count) => {
                write!(f, "invalid study session count: {count}")
            }
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::ForeignEvent(_) => None,
            Self::InvalidSessionCount(_) => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<rusqlite::Error> for ServiceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Repo(RepoError::from(value))
    }
}

/// Owner-scoped scheduling engine.
///
/// Holds the connection for the duration of a request; all mutating methods
/// open one immediate transaction over it, giving serializable semantics
/// per owner.
pub struct SchedulingService<'conn> {
    conn: &'conn mut Connection,
    owner: UserId,
    priorities: PriorityTable,
    observers: Vec<Box<dyn super::CommitObserver>>,
}

impl<'conn> SchedulingService<'conn> {
    /// Creates an engine for one owner with an injected priority hierarchy.
    pub fn new(conn: &'conn mut Connection, owner: UserId, priorities: PriorityTable) -> Self {
        Self {
            conn,
            owner,
            priorities,
            observers: Vec::new(),
        }
    }

    /// Registers a post-commit observer.
    pub fn add_observer(&mut self, observer: Box<dyn super::CommitObserver>) {
        self.observers.push(observer);
    }

    pub fn owner(&self) -> UserId {
        self.owner
    }

    /// Read-only view of the owner's events intersecting a window.
    pub fn events_in(&self, window: TimeRange) -> RepoResult<Vec<Event>> {
        SqliteEventRepository::new(&*self.conn)
            .list_events(&EventWindowQuery::intersecting(self.owner, window))
    }

    /// Resolves all conflicts among the owner's events inside `window` and
    /// persists the outcome atomically.
    ///
    /// Returns the full resolution, including events left `Unresolved`;
    /// callers must inspect those rather than assume success. An empty
    /// window performs no writes and produces no audit record.
    pub fn optimize(&mut self, window: TimeRange) -> ServiceResult<Resolution> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let events = SqliteEventRepository::new(&tx)
            .list_events(&EventWindowQuery::intersecting(self.owner, window))?;
        if events.is_empty() {
            return Ok(Resolution::default());
        }

        let resolution = resolve_conflicts(&events, &self.priorities);

        {
            let repo = SqliteEventRepository::new(&tx);
            for placed in &resolution.events {
                repo.update_event(&placed.event)?;
            }
        }

        let event_ids: Vec<String> = resolution
            .iter_events()
            .map(|event| event.uuid.to_string())
            .collect();
        let unresolved_ids: Vec<String> = resolution
            .unresolved()
            .map(|event| event.uuid.to_string())
            .collect();
        audit_repo::append(
            &tx,
            self.owner,
            AuditAction::Optimize,
            None,
            &json!({
                "window_start": window.start.to_rfc3339(),
                "window_end": window.end.to_rfc3339(),
                "num_events": resolution.len(),
                "event_ids": event_ids,
                "unresolved_ids": unresolved_ids,
            }),
        )?;

        tx.commit()?;
        info!(
            "event=optimize module=service status=ok owner={} num_events={} num_moved={} num_unresolved={}",
            self.owner,
            resolution.len(),
            resolution.moved_ids().len(),
            resolution.unresolved().count()
        );

        self.notify(&resolution.moved_ids());
        Ok(resolution)
    }

    /// Creates preparatory study sessions ahead of an exam and reconciles
    /// them with the surrounding schedule in one atomic pass.
    ///
    /// Returns the sessions at their final, post-resolution times.
    ///
    /// The resolution window spans the sessions only, not the exam; a
    /// displaced event searching past the window edge can land over the exam
    /// slot. A follow-up `optimize` over the wider window clears that up.
    pub fn create_exam_study_sessions(
        &mut self,
        exam: &Event,
        options: StudyPlanOptions,
    ) -> ServiceResult<Vec<Event>> {
        if options.sessions == 0 {
            return Err(ServiceError::InvalidSessionCount(options.sessions));
        }

        let sessions = build_study_sessions(exam, &options, STUDY_CATEGORY);
        let (Some(first), Some(last)) = (sessions.first(), sessions.last()) else {
            return Ok(Vec::new());
        };
        let window = TimeRange::new(first.start, last.end);
        let session_ids: HashSet<EventId> = sessions.iter().map(|s| s.uuid).collect();

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        {
            let repo = SqliteEventRepository::new(&tx);
            for session in &sessions {
                repo.create_event(session)?;
            }
        }

        let affected = SqliteEventRepository::new(&tx)
            .list_events(&EventWindowQuery::intersecting(self.owner, window))?;
        let resolution = resolve_conflicts(&affected, &self.priorities);

        {
            let repo = SqliteEventRepository::new(&tx);
            for placed in &resolution.events {
                repo.update_event(&placed.event)?;
            }
        }

        audit_repo::append(
            &tx,
            self.owner,
            AuditAction::Create,
            Some(exam.uuid),
            &json!({
                "action_type": "exam_study_sessions",
                "exam_title": exam.title,
                "num_sessions": sessions.len(),
                "session_ids": sessions.iter().map(|s| s.uuid.to_string()).collect::<Vec<_>>(),
            }),
        )?;

        tx.commit()?;
        info!(
            "event=create_study_sessions module=service status=ok owner={} exam_id={} num_sessions={}",
            self.owner,
            exam.uuid,
            sessions.len()
        );

        let mut changed: Vec<EventId> = session_ids.iter().copied().collect();
        changed.extend(resolution.moved_ids());
        changed.sort();
        changed.dedup();
        self.notify(&changed);

        let mut final_sessions: Vec<Event> = resolution
            .events
            .into_iter()
            .map(|placed| placed.event)
            .filter(|event| session_ids.contains(&event.uuid))
            .collect();
        final_sessions.sort_by_key(|event| event.start);
        Ok(final_sessions)
    }

    /// Updates multiple events in one all-or-nothing unit.
    pub fn bulk_update(&mut self, events: &[Event], operation_name: &str) -> ServiceResult<()> {
        if events.is_empty() {
            return Ok(());
        }

        for event in events {
            if event.owner != self.owner {
                return Err(ServiceError::ForeignEvent(event.uuid));
            }
        }

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        {
            let repo = SqliteEventRepository::new(&tx);
            for event in events {
                repo.update_event(event)?;
            }
        }

        audit_repo::append(
            &tx,
            self.owner,
            AuditAction::BulkUpdate,
            None,
            &json!({
                "operation": operation_name,
                "num_events": events.len(),
                "event_ids": events.iter().map(|e| e.uuid.to_string()).collect::<Vec<_>>(),
            }),
        )?;

        tx.commit()?;
        info!(
            "event=bulk_update module=service status=ok owner={} operation={} num_events={}",
            self.owner,
            operation_name,
            events.len()
        );

        let changed: Vec<EventId> = events.iter().map(|e| e.uuid).collect();
        self.notify(&changed);
        Ok(())
    }

    /// Deletes multiple events in one all-or-nothing unit.
    ///
    /// Ids that do not exist, or belong to a different owner, are skipped;
    /// the returned count reflects actual deletions.
    pub fn bulk_delete(
        &mut self,
        event_ids: &[EventId],
        operation_name: &str,
    ) -> ServiceResult<usize> {
        if event_ids.is_empty() {
            return Ok(0);
        }

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let mut deleted_ids: Vec<EventId> = Vec::new();
        let mut deleted_details: Vec<serde_json::Value> = Vec::new();
        {
            let repo = SqliteEventRepository::new(&tx);
            for id in event_ids {
                let Some(event) = repo.get_event(*id)? else {
                    continue;
                };
                if event.owner != self.owner {
                    continue;
                }

                repo.delete_event(*id)?;
                deleted_ids.push(*id);
                deleted_details.push(json!({
                    "id": event.uuid.to_string(),
                    "title": event.title,
                    "start": event.start.to_rfc3339(),
                    "end": event.end.to_rfc3339(),
                }));
            }
        }

        audit_repo::append(
            &tx,
            self.owner,
            AuditAction::BulkDelete,
            None,
            &json!({
                "operation": operation_name,
                "num_events": deleted_ids.len(),
                "deleted_events": deleted_details,
            }),
        )?;

        tx.commit()?;
        info!(
            "event=bulk_delete module=service status=ok owner={} operation={} num_deleted={}",
            self.owner,
            operation_name,
            deleted_ids.len()
        );

        let count = deleted_ids.len();
        self.notify(&deleted_ids);
        Ok(count)
    }

    fn notify(&self, changed: &[EventId]) {
        if changed.is_empty() {
            return;
        }
        for observer in &self.observers {
            observer.schedule_committed(self.owner, changed);
        }
    }
}
