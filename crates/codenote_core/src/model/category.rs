//! Category record.
//!
//! # Invariants
//! - `name` is never blank once persisted.
//! - `parent_id` chains never loop; enforced by the store on move.

use crate::model::timestamp::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type CategoryId = Uuid;

/// Name of the category seeded when storage holds no categories.
pub const DEFAULT_CATEGORY_NAME: &str = "General";

/// Fallback name used when a caller adds a category without naming it.
pub const NEW_CATEGORY_NAME: &str = "New Category";

/// Named grouping node; may nest under another category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    /// `None` means top-level.
    pub parent_id: Option<CategoryId>,
    /// Sibling order key; ties are broken by `name`.
    pub sort_order: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Category {
    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Sibling ordering used by listings and the tree: `sort_order`, then
    /// name with ASCII case folded (SQLite `NOCASE`), then exact name.
    pub fn sibling_cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.sort_order
            .cmp(&other.sort_order)
            .then_with(|| {
                self.name
                    .to_ascii_lowercase()
                    .cmp(&other.name.to_ascii_lowercase())
            })
            .then_with(|| self.name.cmp(&other.name))
            .then_with(|| self.id.cmp(&other.id))
    }
}

/// Trims a user-supplied name, returning `None` when nothing is left.
pub fn normalize_name(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
