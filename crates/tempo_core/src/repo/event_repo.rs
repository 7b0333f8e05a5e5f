//! Event repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over the `events` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths must call `Event::validate()` before SQL mutations.
//! - Read paths must reject invalid persisted state instead of masking it.
//! - Instants are stored as Unix epoch milliseconds.

use crate::db::DbError;
use crate::model::event::{Event, EventId, EventValidationError, UserId};
use crate::model::time_range::TimeRange;
use chrono::{DateTime, TimeZone, Utc};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const EVENT_SELECT_SQL: &str = "SELECT
    uuid,
    owner,
    title,
    description,
    category,
    start_ms,
    end_ms,
    is_flexible,
    is_completed,
    external_ref
FROM events";

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for scheduling persistence operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(EventValidationError),
    Db(DbError),
    NotFound(EventId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "event not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted event data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<EventValidationError> for RepoError {
    fn from(value: EventValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Query options for listing one owner's events.
#[derive(Debug, Clone)]
pub struct EventWindowQuery {
    pub owner: UserId,
    /// When set, only events intersecting this window are returned.
    pub window: Option<TimeRange>,
    /// Optional exact category filter.
    pub category: Option<String>,
    pub include_completed: bool,
}

impl EventWindowQuery {
    /// All events for one owner, completed included.
    pub fn for_owner(owner: UserId) -> Self {
        Self {
            owner,
            window: None,
            category: None,
            include_completed: true,
        }
    }

    /// Events for one owner intersecting `window`.
    pub fn intersecting(owner: UserId, window: TimeRange) -> Self {
        Self {
            owner,
            window: Some(window),
            category: None,
            include_completed: true,
        }
    }
}

/// Repository interface for event CRUD operations.
pub trait EventRepository {
    fn create_event(&self, event: &Event) -> RepoResult<EventId>;
    fn update_event(&self, event: &Event) -> RepoResult<()>;
    fn get_event(&self, id: EventId) -> RepoResult<Option<Event>>;
    fn list_events(&self, query: &EventWindowQuery) -> RepoResult<Vec<Event>>;
    fn delete_event(&self, id: EventId) -> RepoResult<()>;
}

/// SQLite-backed event repository.
///
/// Works over any `&Connection`, including a `Transaction` held by the
/// service layer; the repository itself never opens transactions.
pub struct SqliteEventRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEventRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl EventRepository for SqliteEventRepository<'_> {
    fn create_event(&self, event: &Event) -> RepoResult<EventId> {
        event.validate()?;

        self.conn.execute(
            "INSERT INTO events (
                uuid,
                owner,
                title,
                description,
                category,
                start_ms,
                end_ms,
                is_flexible,
                is_completed,
                external_ref
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);",
            params![
                event.uuid.to_string(),
                event.owner.to_string(),
                event.title.as_str(),
                event.description.as_str(),
                event.category.as_str(),
                event.start.timestamp_millis(),
                event.end.timestamp_millis(),
                bool_to_int(event.flexible),
                bool_to_int(event.completed),
                event.external_ref.as_deref(),
            ],
        )?;

        Ok(event.uuid)
    }

    fn update_event(&self, event: &Event) -> RepoResult<()> {
        event.validate()?;

        let changed = self.conn.execute(
            "UPDATE events
             SET
                owner = ?1,
                title = ?2,
                description = ?3,
                category = ?4,
                start_ms = ?5,
                end_ms = ?6,
                is_flexible = ?7,
                is_completed = ?8,
                external_ref = ?9,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?10;",
            params![
                event.owner.to_string(),
                event.title.as_str(),
                event.description.as_str(),
                event.category.as_str(),
                event.start.timestamp_millis(),
                event.end.timestamp_millis(),
                bool_to_int(event.flexible),
                bool_to_int(event.completed),
                event.external_ref.as_deref(),
                event.uuid.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(event.uuid));
        }

        Ok(())
    }

    fn get_event(&self, id: EventId) -> RepoResult<Option<Event>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EVENT_SELECT_SQL} WHERE uuid = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_event_row(row)?));
        }

        Ok(None)
    }

    fn list_events(&self, query: &EventWindowQuery) -> RepoResult<Vec<Event>> {
        let mut sql = format!("{EVENT_SELECT_SQL} WHERE owner = ?");
        let mut bind_values: Vec<Value> = vec![Value::Text(query.owner.to_string())];

        if let Some(window) = query.window {
            // Intersection filter: event.start < window.end AND event.end > window.start.
            sql.push_str(" AND start_ms < ? AND end_ms > ?");
            bind_values.push(Value::Integer(window.end.timestamp_millis()));
            bind_values.push(Value::Integer(window.start.timestamp_millis()));
        }

        if let Some(category) = query.category.as_deref() {
            sql.push_str(" AND category = ?");
            bind_values.push(Value::Text(category.to_string()));
        }

        if !query.include_completed {
            sql.push_str(" AND is_completed = 0");
        }

        sql.push_str(" ORDER BY start_ms ASC, uuid ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut events = Vec::new();

        while let Some(row) = rows.next()? {
            events.push(parse_event_row(row)?);
        }

        Ok(events)
    }

    fn delete_event(&self, id: EventId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM events WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn parse_event_row(row: &Row<'_>) -> RepoResult<Event> {
    let uuid = parse_uuid_column(row, "uuid")?;
    let owner = parse_uuid_column(row, "owner")?;
    let start = parse_instant_column(row, "start_ms")?;
    let end = parse_instant_column(row, "end_ms")?;

    let event = Event {
        uuid,
        owner,
        title: row.get("title")?,
        description: row.get("description")?,
        category: row.get("category")?,
        start,
        end,
        flexible: int_to_bool(row, "is_flexible")?,
        completed: int_to_bool(row, "is_completed")?,
        external_ref: row.get("external_ref")?,
    };
    event.validate()?;
    Ok(event)
}

fn parse_uuid_column(row: &Row<'_>, column: &str) -> RepoResult<Uuid> {
    let text: String = row.get(column)?;
    Uuid::parse_str(&text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{text}` in events.{column}"))
    })
}

fn parse_instant_column(row: &Row<'_>, column: &str) -> RepoResult<DateTime<Utc>> {
    let millis: i64 = row.get(column)?;
    Utc.timestamp_millis_opt(millis).single().ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid epoch millis value `{millis}` in events.{column}"
        ))
    })
}

fn int_to_bool(row: &Row<'_>, column: &str) -> RepoResult<bool> {
    match row.get::<_, i64>(column)? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid boolean value `{other}` in events.{column}"
        ))),
    }
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
