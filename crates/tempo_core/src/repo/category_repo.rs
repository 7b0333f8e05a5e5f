//! Category lookup over the seeded `categories` table.
//!
//! Categories are reference data: written once by migration, read by the
//! engine's collaborators. There is deliberately no mutation API here.

use crate::model::category::{Category, PriorityTable};
use crate::repo::event_repo::{RepoError, RepoResult};
use rusqlite::Connection;

/// Looks up one category by exact name.
pub fn get_category(conn: &Connection, name: &str) -> RepoResult<Option<Category>> {
    let mut stmt = conn.prepare(
        "SELECT name, priority, color, description
         FROM categories
         WHERE name = ?1;",
    )?;

    let mut rows = stmt.query([name])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(Category {
            name: row.get("name")?,
            priority: row.get("priority")?,
            color: row.get("color")?,
            description: row.get("description")?,
        }));
    }

    Ok(None)
}

/// Lists all categories, highest priority first.
pub fn list_categories(conn: &Connection) -> RepoResult<Vec<Category>> {
    let mut stmt = conn.prepare(
        "SELECT name, priority, color, description
         FROM categories
         ORDER BY priority DESC;",
    )?;

    let mut rows = stmt.query([])?;
    let mut categories = Vec::new();
    while let Some(row) = rows.next()? {
        categories.push(Category {
            name: row.get("name")?,
            priority: row.get("priority")?,
            color: row.get("color")?,
            description: row.get("description")?,
        });
    }

    Ok(categories)
}

/// Builds the engine's injected priority table from persisted categories.
///
/// Fails when the table is empty, which indicates migrations did not run.
pub fn load_priority_table(conn: &Connection) -> RepoResult<PriorityTable> {
    let categories = list_categories(conn)?;
    if categories.is_empty() {
        return Err(RepoError::InvalidData(
            "categories table is empty; schema not seeded".to_string(),
        ));
    }
    Ok(categories.into_iter().collect())
}
