//! Category repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist category rows and their placement (`parent_id`, `sort_order`).
//! - Keep sibling ordering rules inside the repository boundary.
//!
//! # Invariants
//! - Listing order is `sort_order`, then name case-insensitively (ASCII,
//!   like `COLLATE NOCASE`), then id.
//! - Deleting a row relies on `ON DELETE CASCADE` to remove descendant
//!   categories and every document they hold.

use super::{parse_timestamp, parse_uuid, RepoResult};
use crate::model::category::{Category, CategoryId};
use crate::model::timestamp;
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const CATEGORY_SELECT_SQL: &str = "SELECT
    id,
    name,
    parent_id,
    sort_order,
    created_at,
    updated_at
FROM categories";

const SIBLING_ORDER_SQL: &str = "ORDER BY sort_order ASC, name COLLATE NOCASE ASC, name ASC, id ASC";

/// Rows removed by one cascading category delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeCounts {
    pub categories: usize,
    pub documents: usize,
}

/// Repository interface for category persistence.
pub trait CategoryRepository {
    /// Inserts one category with an explicit sort order.
    fn insert_category(
        &self,
        name: &str,
        parent_id: Option<CategoryId>,
        sort_order: i64,
    ) -> RepoResult<Category>;
    /// Loads one category by id.
    fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>>;
    /// Lists every category in sibling order.
    fn list_categories(&self) -> RepoResult<Vec<Category>>;
    /// Lists direct children of `parent_id` (`None` = top level).
    fn list_children(&self, parent_id: Option<CategoryId>) -> RepoResult<Vec<Category>>;
    /// Counts all categories.
    fn count_categories(&self) -> RepoResult<u64>;
    /// Returns the order key that appends after existing siblings.
    fn next_sort_order(&self, parent_id: Option<CategoryId>) -> RepoResult<i64>;
    /// Renames one category. Returns `false` when no row matched.
    fn rename_category(&self, id: CategoryId, name: &str) -> RepoResult<bool>;
    /// Re-parents one category. Returns `false` when no row matched.
    fn set_parent(&self, id: CategoryId, parent_id: Option<CategoryId>) -> RepoResult<bool>;
    /// Rewrites one sort order key. Returns `false` when no row matched.
    fn set_sort_order(&self, id: CategoryId, sort_order: i64) -> RepoResult<bool>;
    /// Counts the rows a cascading delete of `id` would remove.
    fn cascade_counts(&self, id: CategoryId) -> RepoResult<CascadeCounts>;
    /// Deletes one category (and, via FK cascade, its subtree).
    fn delete_category(&self, id: CategoryId) -> RepoResult<bool>;
}

/// SQLite-backed category repository.
pub struct SqliteCategoryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCategoryRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl CategoryRepository for SqliteCategoryRepository<'_> {
    fn insert_category(
        &self,
        name: &str,
        parent_id: Option<CategoryId>,
        sort_order: i64,
    ) -> RepoResult<Category> {
        let now = timestamp::now();
        let category = Category {
            id: Uuid::new_v4(),
            name: name.to_string(),
            parent_id,
            sort_order,
            created_at: now,
            updated_at: now,
        };
        let stamp = timestamp::format(&now);
        self.conn.execute(
            "INSERT INTO categories (
                id,
                name,
                parent_id,
                sort_order,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?5);",
            params![
                category.id.to_string(),
                category.name.as_str(),
                parent_id.map(|value| value.to_string()),
                sort_order,
                stamp,
            ],
        )?;
        Ok(category)
    }

    fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CATEGORY_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_category_row(row)?));
        }
        Ok(None)
    }

    fn list_categories(&self) -> RepoResult<Vec<Category>> {
        let mut stmt = self.conn.prepare(&format!(
            "{CATEGORY_SELECT_SQL} {SIBLING_ORDER_SQL};"
        ))?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_category_row(row)?);
        }
        Ok(items)
    }

    fn list_children(&self, parent_id: Option<CategoryId>) -> RepoResult<Vec<Category>> {
        let mut stmt = self.conn.prepare(&format!(
            "{CATEGORY_SELECT_SQL}
             WHERE parent_id IS ?1
             {SIBLING_ORDER_SQL};"
        ))?;
        let mut rows = stmt.query([parent_id.map(|value| value.to_string())])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_category_row(row)?);
        }
        Ok(items)
    }

    fn count_categories(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM categories;", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }

    fn next_sort_order(&self, parent_id: Option<CategoryId>) -> RepoResult<i64> {
        let next = self.conn.query_row(
            "SELECT COALESCE(MAX(sort_order), -1) + 1
             FROM categories
             WHERE parent_id IS ?1;",
            [parent_id.map(|value| value.to_string())],
            |row| row.get(0),
        )?;
        Ok(next)
    }

    fn rename_category(&self, id: CategoryId, name: &str) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "UPDATE categories
             SET name = ?2,
                 updated_at = ?3
             WHERE id = ?1;",
            params![id.to_string(), name, timestamp::format(&timestamp::now())],
        )?;
        Ok(changed > 0)
    }

    fn set_parent(&self, id: CategoryId, parent_id: Option<CategoryId>) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "UPDATE categories
             SET parent_id = ?2,
                 updated_at = ?3
             WHERE id = ?1;",
            params![
                id.to_string(),
                parent_id.map(|value| value.to_string()),
                timestamp::format(&timestamp::now()),
            ],
        )?;
        Ok(changed > 0)
    }

    fn set_sort_order(&self, id: CategoryId, sort_order: i64) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "UPDATE categories SET sort_order = ?2 WHERE id = ?1;",
            params![id.to_string(), sort_order],
        )?;
        Ok(changed > 0)
    }

    fn cascade_counts(&self, id: CategoryId) -> RepoResult<CascadeCounts> {
        let (categories, documents): (i64, i64) = self.conn.query_row(
            "WITH RECURSIVE subtree(id) AS (
                SELECT id FROM categories WHERE id = ?1
                UNION
                SELECT child.id
                FROM categories child
                INNER JOIN subtree parent ON child.parent_id = parent.id
            )
            SELECT
                (SELECT COUNT(*) FROM subtree),
                (SELECT COUNT(*) FROM documents
                 WHERE category_id IN (SELECT id FROM subtree));",
            [id.to_string()],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Ok(CascadeCounts {
            categories: categories.max(0) as usize,
            documents: documents.max(0) as usize,
        })
    }

    fn delete_category(&self, id: CategoryId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM categories WHERE id = ?1;", [id.to_string()])?;
        Ok(changed > 0)
    }
}

fn parse_category_row(row: &Row<'_>) -> RepoResult<Category> {
    let id_text: String = row.get("id")?;
    let parent_id = row
        .get::<_, Option<String>>("parent_id")?
        .map(|value| parse_uuid(&value, "categories.parent_id"))
        .transpose()?;
    let created_at: String = row.get("created_at")?;
    let updated_at: String = row.get("updated_at")?;

    Ok(Category {
        id: parse_uuid(&id_text, "categories.id")?,
        name: row.get("name")?,
        parent_id,
        sort_order: row.get("sort_order")?,
        created_at: parse_timestamp(&created_at, "categories.created_at")?,
        updated_at: parse_timestamp(&updated_at, "categories.updated_at")?,
    })
}
