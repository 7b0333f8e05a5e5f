//! Append-only persistence for scheduling audit records.
//!
//! # Invariants
//! - Records are insert-only; there is no update or delete API.
//! - `append` is called inside the same transaction as the event mutations
//!   it describes, so a rollback leaves no orphan record.

use crate::model::audit::{AuditAction, AuditRecord};
use crate::model::event::{EventId, UserId};
use crate::repo::event_repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

/// Appends one audit record describing a scheduling operation.
pub fn append(
    conn: &Connection,
    owner: UserId,
    action: AuditAction,
    event: Option<EventId>,
    details: &serde_json::Value,
) -> RepoResult<()> {
    conn.execute(
        "INSERT INTO scheduling_audit (owner, action, event_uuid, details)
         VALUES (?1, ?2, ?3, ?4);",
        params![
            owner.to_string(),
            action.as_db_str(),
            event.map(|id| id.to_string()),
            details.to_string(),
        ],
    )?;

    Ok(())
}

/// Lists one owner's audit records, newest first.
pub fn list_for_owner(conn: &Connection, owner: UserId) -> RepoResult<Vec<AuditRecord>> {
    let mut stmt = conn.prepare(
        "SELECT owner, action, event_uuid, details, recorded_at
         FROM scheduling_audit
         WHERE owner = ?1
         ORDER BY recorded_at DESC, id DESC;",
    )?;

    let mut rows = stmt.query([owner.to_string()])?;
    let mut records = Vec::new();
    while let Some(row) = rows.next()? {
        records.push(parse_audit_row(row)?);
    }

    Ok(records)
}

fn parse_audit_row(row: &Row<'_>) -> RepoResult<AuditRecord> {
    let owner_text: String = row.get("owner")?;
    let owner = Uuid::parse_str(&owner_text).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid uuid value `{owner_text}` in scheduling_audit.owner"
        ))
    })?;

    let action_text: String = row.get("action")?;
    let action = AuditAction::parse_db_str(&action_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid action tag `{action_text}` in scheduling_audit.action"
        ))
    })?;

    let event = match row.get::<_, Option<String>>("event_uuid")? {
        Some(text) => Some(Uuid::parse_str(&text).map_err(|_| {
            RepoError::InvalidData(format!(
                "invalid uuid value `{text}` in scheduling_audit.event_uuid"
            ))
        })?),
        None => None,
    };

    let details_text: String = row.get("details")?;
    let details = serde_json::from_str(&details_text).map_err(|err| {
        RepoError::InvalidData(format!(
            "invalid JSON in scheduling_audit.details: {err}"
        ))
    })?;

    Ok(AuditRecord {
        owner,
        action,
        event,
        details,
        recorded_at_ms: row.get("recorded_at")?,
    })
}
