//! Event categories and the priority hierarchy.
//!
//! # Responsibility
//! - Define the category record and the ordered name-to-priority mapping.
//! - Keep the hierarchy an explicit value injected into the engine, not
//!   module-level state, so tests can substitute alternate hierarchies.
//!
//! # Invariants
//! - Priority values form a total order; higher wins a scheduling conflict.
//! - The default hierarchy is Exam=5 > Study=4 > Gym=3 > Social=2 > Gaming=1.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Priority assigned to category names the table does not know.
pub const UNKNOWN_CATEGORY_PRIORITY: i32 = 0;

/// Event category with display attributes.
///
/// Created once at setup (seeded by migration); immutable in normal
/// operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    /// Higher values win conflicts.
    pub priority: i32,
    /// Hex color code for display.
    pub color: String,
    pub description: String,
}

/// Ordered mapping from category name to priority.
///
/// The engine consumes this read-only; it is never mutated during a
/// resolution pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityTable {
    entries: BTreeMap<String, i32>,
}

impl PriorityTable {
    pub fn new(entries: impl IntoIterator<Item = (String, i32)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Priority for a category name; unknown names fall back to
    /// [`UNKNOWN_CATEGORY_PRIORITY`].
    pub fn priority_of(&self, category: &str) -> i32 {
        self.entries
            .get(category)
            .copied()
            .unwrap_or(UNKNOWN_CATEGORY_PRIORITY)
    }

    pub fn contains(&self, category: &str) -> bool {
        self.entries.contains_key(category)
    }

    /// Category names sorted by priority, highest first.
    pub fn names_by_priority(&self) -> Vec<&str> {
        let mut names: Vec<(&str, i32)> = self
            .entries
            .iter()
            .map(|(name, priority)| (name.as_str(), *priority))
            .collect();
        names.sort_by_key(|(_, priority)| std::cmp::Reverse(*priority));
        names.into_iter().map(|(name, _)| name).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for PriorityTable {
    /// The fixed domain hierarchy.
    fn default() -> Self {
        Self::new(
            default_categories()
                .into_iter()
                .map(|category| (category.name, category.priority)),
        )
    }
}

impl FromIterator<Category> for PriorityTable {
    fn from_iter<I: IntoIterator<Item = Category>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|category| (category.name, category.priority)),
        )
    }
}

/// The five seeded categories with their display attributes.
pub fn default_categories() -> Vec<Category> {
    [
        ("Exam", 5, "#FF0000", "Exams and tests"),
        ("Study", 4, "#FFA500", "Study sessions"),
        ("Gym", 3, "#00FF00", "Gym and fitness activities"),
        ("Social", 2, "#0000FF", "Social events and gatherings"),
        ("Gaming", 1, "#800080", "Gaming and entertainment"),
    ]
    .into_iter()
    .map(|(name, priority, color, description)| Category {
        name: name.to_string(),
        priority,
        color: color.to_string(),
        description: description.to_string(),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::{PriorityTable, UNKNOWN_CATEGORY_PRIORITY};

    #[test]
    fn default_table_follows_fixed_hierarchy() {
        let table = PriorityTable::default();
        assert_eq!(table.priority_of("Exam"), 5);
        assert_eq!(table.priority_of("Study"), 4);
        assert_eq!(table.priority_of("Gym"), 3);
        assert_eq!(table.priority_of("Social"), 2);
        assert_eq!(table.priority_of("Gaming"), 1);
        assert_eq!(
            table.names_by_priority(),
            vec!["Exam", "Study", "Gym", "Social", "Gaming"]
        );
    }

    #[test]
    fn unknown_category_gets_floor_priority() {
        let table = PriorityTable::default();
        assert_eq!(table.priority_of("Chores"), UNKNOWN_CATEGORY_PRIORITY);
        assert!(!table.contains("Chores"));
    }

    #[test]
    fn alternate_hierarchy_can_be_injected() {
        let table = PriorityTable::new([("Work".to_string(), 9), ("Rest".to_string(), 1)]);
        assert_eq!(table.priority_of("Work"), 9);
        assert_eq!(table.names_by_priority(), vec!["Work", "Rest"]);
    }
}
