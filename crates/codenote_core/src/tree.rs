//! Category tree projection.
//!
//! # Responsibility
//! - Rebuild the nested category/document hierarchy from flat storage.
//! - Apply an optional text filter and prune categories with nothing to show.
//!
//! # Invariants
//! - Siblings keep storage order: categories by `(sort_order, name)`,
//!   documents by title.
//! - Under a filter, a category survives only if it has a matching document
//!   or a surviving child; ancestors of matches always survive.
//! - Every category is visited at most once, so corrupt `parent_id` loops
//!   cannot recurse forever.
//! - Categories whose parent row no longer exists are shown at the top level.
//!   A `parent_id` loop is shown at the top level too, rooted at its first
//!   member in sibling order.

use crate::model::category::{Category, CategoryId};
use crate::model::document::{Document, DocumentId, TextFilter};
use crate::service::store::{NoteStorage, StoreResult};
use log::{debug, warn};
use std::collections::{HashMap, HashSet};
use std::time::Instant;

/// One category with its visible documents and child categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub category: Category,
    pub documents: Vec<Document>,
    pub children: Vec<TreeNode>,
    /// UI expansion state; every freshly built node is expanded.
    pub expanded: bool,
}

impl TreeNode {
    fn document_count(&self) -> usize {
        self.documents.len()
            + self
                .children
                .iter()
                .map(TreeNode::document_count)
                .sum::<usize>()
    }

    fn find(&self, id: CategoryId) -> Option<&TreeNode> {
        if self.category.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    fn find_mut(&mut self, id: CategoryId) -> Option<&mut TreeNode> {
        if self.category.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(id))
    }

    fn push_rows<'a>(&'a self, depth: usize, rows: &mut Vec<TreeRow<'a>>) {
        rows.push(TreeRow {
            depth,
            item: TreeItem::Category(&self.category),
        });
        if !self.expanded {
            return;
        }
        for child in &self.children {
            child.push_rows(depth + 1, rows);
        }
        rows.extend(self.documents.iter().map(|document| TreeRow {
            depth: depth + 1,
            item: TreeItem::Document(document),
        }));
    }
}

/// Payload of one visible tree row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeItem<'a> {
    Category(&'a Category),
    Document(&'a Document),
}

impl TreeItem<'_> {
    pub fn label(&self) -> &str {
        match self {
            Self::Category(category) => &category.name,
            Self::Document(document) => &document.title,
        }
    }
}

/// Flattened, depth-annotated row for drawing the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeRow<'a> {
    pub depth: usize,
    pub item: TreeItem<'a>,
}

/// Result of one projection pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryTree {
    pub roots: Vec<TreeNode>,
    /// Normalized filter the tree was built with, if any.
    pub filter: Option<String>,
}

impl CategoryTree {
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Number of documents visible anywhere in the tree.
    pub fn document_count(&self) -> usize {
        self.roots.iter().map(TreeNode::document_count).sum()
    }

    pub fn find_category(&self, id: CategoryId) -> Option<&TreeNode> {
        self.roots.iter().find_map(|root| root.find(id))
    }

    pub fn contains_document(&self, id: DocumentId) -> bool {
        self.rows()
            .iter()
            .any(|row| matches!(row.item, TreeItem::Document(document) if document.id == id))
    }

    /// Toggles one node's expansion. Returns `false` when it is not visible.
    pub fn set_expanded(&mut self, id: CategoryId, expanded: bool) -> bool {
        match self.roots.iter_mut().find_map(|root| root.find_mut(id)) {
            Some(node) => {
                node.expanded = expanded;
                true
            }
            None => false,
        }
    }

    /// Depth-first rows: a category, its child categories, then its documents.
    /// Collapsed nodes contribute only their own row.
    pub fn rows(&self) -> Vec<TreeRow<'_>> {
        let mut rows = Vec::new();
        for root in &self.roots {
            root.push_rows(0, &mut rows);
        }
        rows
    }
}

/// Builds the category tree, optionally filtered.
///
/// A blank `filter` is treated as no filter. The whole tree is rebuilt from
/// storage on every call.
pub fn build_tree(storage: &impl NoteStorage, filter: Option<&str>) -> StoreResult<CategoryTree> {
    let started_at = Instant::now();
    let filter = filter.and_then(TextFilter::new);
    let categories = storage.list_categories()?;
    let total = categories.len();

    let known: HashSet<CategoryId> = categories.iter().map(|category| category.id).collect();
    let mut children: HashMap<Option<CategoryId>, Vec<Category>> = HashMap::new();
    for category in categories {
        let slot = category.parent_id.filter(|parent| known.contains(parent));
        children.entry(slot).or_default().push(category);
    }

    let mut builder = TreeBuilder {
        storage,
        filter: filter.as_ref(),
        children,
        visited: HashSet::new(),
    };
    let mut roots = builder.build_level(None)?;

    if builder.visited.len() < total {
        let promoted = builder.promote_loops(&mut roots)?;
        warn!("event=tree_build module=tree status=cycle promoted_loops={promoted}");
    }
    debug!(
        "event=tree_build module=tree status=ok filtered={} roots={} duration_ms={}",
        filter.is_some(),
        roots.len(),
        started_at.elapsed().as_millis()
    );

    Ok(CategoryTree {
        roots,
        filter: filter.map(|value| value.as_str().to_string()),
    })
}

struct TreeBuilder<'a, S> {
    storage: &'a S,
    filter: Option<&'a TextFilter>,
    children: HashMap<Option<CategoryId>, Vec<Category>>,
    visited: HashSet<CategoryId>,
}

impl<S: NoteStorage> TreeBuilder<'_, S> {
    fn build_level(&mut self, parent: Option<CategoryId>) -> StoreResult<Vec<TreeNode>> {
        let level = self.children.remove(&parent).unwrap_or_default();
        let mut nodes = Vec::with_capacity(level.len());
        for category in level {
            if let Some(node) = self.build_node(category)? {
                nodes.push(node);
            }
        }
        Ok(nodes)
    }

    /// Roots every `parent_id` loop at its first member in sibling order.
    ///
    /// Returns how many loops were promoted.
    fn promote_loops(&mut self, roots: &mut Vec<TreeNode>) -> StoreResult<usize> {
        let mut stranded = self
            .children
            .values()
            .flatten()
            .cloned()
            .collect::<Vec<_>>();
        stranded.sort_by(Category::sibling_cmp);
        let by_id: HashMap<CategoryId, &Category> = stranded
            .iter()
            .map(|category| (category.id, category))
            .collect();

        let mut promoted = 0;
        for category in &stranded {
            if self.visited.contains(&category.id) {
                continue;
            }
            let Some(head) = loop_head(category, &by_id) else {
                continue;
            };
            promoted += 1;
            if let Some(node) = self.build_node(head.clone())? {
                roots.push(node);
            }
        }
        Ok(promoted)
    }

    fn build_node(&mut self, category: Category) -> StoreResult<Option<TreeNode>> {
        if !self.visited.insert(category.id) {
            return Ok(None);
        }

        let mut documents = self.storage.list_documents_by_category(category.id)?;
        if let Some(filter) = self.filter {
            documents.retain(|document| document.matches(filter));
        }
        let children = self.build_level(Some(category.id))?;

        if self.filter.is_some() && documents.is_empty() && children.is_empty() {
            return Ok(None);
        }

        Ok(Some(TreeNode {
            category,
            documents,
            children,
            expanded: true,
        }))
    }
}

/// Follows parents from `start` until an id repeats and returns the loop
/// member that sorts first among its siblings.
fn loop_head<'a>(
    start: &'a Category,
    by_id: &HashMap<CategoryId, &'a Category>,
) -> Option<&'a Category> {
    let mut path: Vec<&Category> = Vec::new();
    let mut cursor = Some(start);
    while let Some(current) = cursor {
        if let Some(index) = path.iter().position(|seen| seen.id == current.id) {
            return path[index..]
                .iter()
                .copied()
                .min_by(|left, right| left.sibling_cmp(right));
        }
        path.push(current);
        cursor = current
            .parent_id
            .and_then(|parent| by_id.get(&parent).copied());
    }
    None
}
