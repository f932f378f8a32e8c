//! Storage engine: category/document CRUD, search and cascade rules.
//!
//! # Responsibility
//! - Own the single SQLite connection for the application lifetime.
//! - Apply defaults ("New Category", "Untitled", Plain) and reject blank
//!   names before anything reaches the repositories.
//! - Keep the category set non-empty by seeding "General".
//!
//! # Invariants
//! - Deleting a category removes its whole subtree (descendant categories and
//!   their documents) in one immediate transaction.
//! - A move never makes a category its own ancestor.
//! - Errors are returned to the caller; nothing is retried or swallowed.

use crate::db::{open_db, open_db_in_memory, DbError};
use crate::model::category::{
    normalize_name, Category, CategoryId, DEFAULT_CATEGORY_NAME, NEW_CATEGORY_NAME,
};
use crate::model::document::{Document, DocumentId, NewDocument, TextFilter, UNTITLED_DOCUMENT};
use crate::repo::category_repo::{CascadeCounts, CategoryRepository, SqliteCategoryRepository};
use crate::repo::document_repo::{DocumentRepository, SqliteDocumentRepository};
use crate::repo::RepoError;
use log::{debug, error, info};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::time::Instant;

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by the storage engine.
#[derive(Debug)]
pub enum StoreError {
    /// Category name is blank after trim.
    InvalidName,
    /// Target category does not exist (stale reference).
    CategoryNotFound(CategoryId),
    /// Requested parent category does not exist.
    ParentNotFound(CategoryId),
    /// Target document does not exist (stale reference).
    DocumentNotFound(DocumentId),
    /// Move would place a category under itself or one of its descendants.
    CycleDetected {
        category_id: CategoryId,
        parent_id: CategoryId,
    },
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl StoreError {
    /// Whether the error means "the record is gone"; callers should refresh
    /// their view rather than report a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::CategoryNotFound(_) | Self::ParentNotFound(_) | Self::DocumentNotFound(_)
        )
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName => write!(f, "category name must not be blank"),
            Self::CategoryNotFound(id) => write!(f, "category not found: {id}"),
            Self::ParentNotFound(id) => write!(f, "parent category not found: {id}"),
            Self::DocumentNotFound(id) => write!(f, "document not found: {id}"),
            Self::CycleDetected {
                category_id,
                parent_id,
            } => write!(
                f,
                "move would create cycle: category {category_id} under {parent_id}"
            ),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Repo(RepoError::Db(value))
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Repo(RepoError::from(value))
    }
}

/// Storage operations consumed by the tree projection, the document session
/// and the import adapter.
pub trait NoteStorage {
    /// All categories ordered by `(sort_order, name)`.
    fn list_categories(&self) -> StoreResult<Vec<Category>>;
    /// One category by id.
    fn get_category(&self, id: CategoryId) -> StoreResult<Option<Category>>;
    /// Adds a category; `None` name falls back to "New Category".
    fn add_category(
        &self,
        name: Option<&str>,
        parent_id: Option<CategoryId>,
    ) -> StoreResult<Category>;
    /// Renames a category. Returns `false` (no-op) when the id is unknown.
    fn rename_category(&self, id: CategoryId, name: &str) -> StoreResult<bool>;
    /// Re-parents and/or reorders a category among its new siblings.
    ///
    /// `position` is a zero-based sibling index; `None` appends.
    fn move_category(
        &self,
        id: CategoryId,
        parent_id: Option<CategoryId>,
        position: Option<usize>,
    ) -> StoreResult<()>;
    /// Deletes a category subtree with its documents.
    ///
    /// Returns `None` when the id is unknown.
    fn delete_category(&self, id: CategoryId) -> StoreResult<Option<CascadeCounts>>;
    /// Documents of one category ordered by title.
    fn list_documents_by_category(&self, category_id: CategoryId) -> StoreResult<Vec<Document>>;
    /// Every document ordered by title.
    fn list_documents(&self) -> StoreResult<Vec<Document>>;
    /// One document by id; `None` means deleted or never existed.
    fn get_document(&self, id: DocumentId) -> StoreResult<Option<Document>>;
    /// Adds a document to an existing category.
    fn add_document(&self, request: NewDocument) -> StoreResult<Document>;
    /// Overwrites title/content/language and refreshes `updated_at`.
    fn save_document(&self, document: &Document) -> StoreResult<Document>;
    /// Moves a document into another category. Returns `false` when the
    /// document is unknown.
    fn move_document(&self, id: DocumentId, category_id: CategoryId) -> StoreResult<bool>;
    /// Deletes one document. Returns `false` when the id is unknown.
    fn delete_document(&self, id: DocumentId) -> StoreResult<bool>;
    /// Case-insensitive substring search over title and content, most
    /// recently updated first. Blank queries return nothing.
    fn search_documents(&self, query: &str) -> StoreResult<Vec<Document>>;
}

/// SQLite-backed storage engine.
///
/// Constructed once at startup and passed by reference to every consumer.
pub struct NoteStore {
    conn: Connection,
}

impl NoteStore {
    /// Opens the database file, migrates it and seeds the default category.
    ///
    /// Failure here is fatal for the application.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let store = Self {
            conn: open_db(path)?,
        };
        store.initialize()?;
        Ok(store)
    }

    /// Opens a throwaway in-memory store, migrated and seeded.
    pub fn open_in_memory() -> StoreResult<Self> {
        let store = Self {
            conn: open_db_in_memory()?,
        };
        store.initialize()?;
        Ok(store)
    }

    /// Seeds "General" (sort order 0) when no category exists.
    ///
    /// Idempotent; returns the seeded category when one was created.
    pub fn initialize(&self) -> StoreResult<Option<Category>> {
        let started_at = Instant::now();
        let tx = self.begin()?;
        let seeded = ensure_default_category(&SqliteCategoryRepository::new(&tx))?;
        tx.commit()?;
        info!(
            "event=store_init module=store status=ok seeded={} duration_ms={}",
            seeded.is_some(),
            started_at.elapsed().as_millis()
        );
        Ok(seeded)
    }

    /// Borrows the underlying connection, e.g. for diagnostics.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn begin(&self) -> StoreResult<Transaction<'_>> {
        Ok(Transaction::new_unchecked(
            &self.conn,
            TransactionBehavior::Immediate,
        )?)
    }

    fn categories(&self) -> SqliteCategoryRepository<'_> {
        SqliteCategoryRepository::new(&self.conn)
    }

    fn documents(&self) -> SqliteDocumentRepository<'_> {
        SqliteDocumentRepository::new(&self.conn)
    }

    fn ensure_category(&self, id: CategoryId) -> StoreResult<Category> {
        self.categories()
            .get_category(id)?
            .ok_or(StoreError::CategoryNotFound(id))
    }

    fn would_create_cycle(&self, id: CategoryId, parent_id: CategoryId) -> StoreResult<bool> {
        let repo = self.categories();
        let mut visited = HashSet::new();
        let mut cursor = Some(parent_id);
        while let Some(current) = cursor {
            if current == id || !visited.insert(current) {
                return Ok(true);
            }
            let node = repo
                .get_category(current)?
                .ok_or(StoreError::ParentNotFound(current))?;
            cursor = node.parent_id;
        }
        Ok(false)
    }
}

impl NoteStorage for NoteStore {
    fn list_categories(&self) -> StoreResult<Vec<Category>> {
        Ok(self.categories().list_categories()?)
    }

    fn get_category(&self, id: CategoryId) -> StoreResult<Option<Category>> {
        Ok(self.categories().get_category(id)?)
    }

    fn add_category(
        &self,
        name: Option<&str>,
        parent_id: Option<CategoryId>,
    ) -> StoreResult<Category> {
        let name = match name {
            Some(value) => normalize_name(value).ok_or(StoreError::InvalidName)?,
            None => NEW_CATEGORY_NAME.to_string(),
        };

        let tx = self.begin()?;
        let repo = SqliteCategoryRepository::new(&tx);
        if let Some(parent_id) = parent_id {
            if repo.get_category(parent_id)?.is_none() {
                return Err(StoreError::ParentNotFound(parent_id));
            }
        }
        let sort_order = repo.next_sort_order(parent_id)?;
        let category = repo.insert_category(&name, parent_id, sort_order)?;
        tx.commit()?;

        info!(
            "event=category_add module=store status=ok category_id={} has_parent={}",
            category.id,
            parent_id.is_some()
        );
        Ok(category)
    }

    fn rename_category(&self, id: CategoryId, name: &str) -> StoreResult<bool> {
        let name = normalize_name(name).ok_or(StoreError::InvalidName)?;
        let renamed = self.categories().rename_category(id, &name)?;
        if renamed {
            info!("event=category_rename module=store status=ok category_id={id}");
        } else {
            debug!("event=category_rename module=store status=noop category_id={id}");
        }
        Ok(renamed)
    }

    fn move_category(
        &self,
        id: CategoryId,
        parent_id: Option<CategoryId>,
        position: Option<usize>,
    ) -> StoreResult<()> {
        let category = self.ensure_category(id)?;
        if let Some(parent_id) = parent_id {
            if parent_id == id || self.would_create_cycle(id, parent_id)? {
                return Err(StoreError::CycleDetected {
                    category_id: id,
                    parent_id,
                });
            }
        }

        let tx = self.begin()?;
        let repo = SqliteCategoryRepository::new(&tx);
        if category.parent_id != parent_id {
            repo.set_parent(id, parent_id)?;
        }

        let mut sibling_ids = repo
            .list_children(parent_id)?
            .into_iter()
            .map(|sibling| sibling.id)
            .filter(|sibling_id| *sibling_id != id)
            .collect::<Vec<_>>();
        let index = position
            .unwrap_or(sibling_ids.len())
            .min(sibling_ids.len());
        sibling_ids.insert(index, id);
        for (order, sibling_id) in sibling_ids.into_iter().enumerate() {
            repo.set_sort_order(sibling_id, order as i64)?;
        }
        tx.commit()?;

        info!(
            "event=category_move module=store status=ok category_id={id} has_parent={} position={index}",
            parent_id.is_some()
        );
        Ok(())
    }

    fn delete_category(&self, id: CategoryId) -> StoreResult<Option<CascadeCounts>> {
        let started_at = Instant::now();
        let tx = self.begin()?;
        let repo = SqliteCategoryRepository::new(&tx);

        let counts = repo.cascade_counts(id)?;
        if counts.categories == 0 {
            debug!("event=category_delete module=store status=noop category_id={id}");
            return Ok(None);
        }

        if let Err(err) = repo.delete_category(id) {
            error!("event=category_delete module=store status=error category_id={id} error={err}");
            return Err(err.into());
        }
        let reseeded = ensure_default_category(&repo)?;
        tx.commit()?;

        info!(
            "event=category_delete module=store status=ok category_id={id} categories={} documents={} reseeded={} duration_ms={}",
            counts.categories,
            counts.documents,
            reseeded.is_some(),
            started_at.elapsed().as_millis()
        );
        Ok(Some(counts))
    }

    fn list_documents_by_category(&self, category_id: CategoryId) -> StoreResult<Vec<Document>> {
        Ok(self.documents().list_by_category(category_id)?)
    }

    fn list_documents(&self) -> StoreResult<Vec<Document>> {
        Ok(self.documents().list_all()?)
    }

    fn get_document(&self, id: DocumentId) -> StoreResult<Option<Document>> {
        Ok(self.documents().get_document(id)?)
    }

    fn add_document(&self, request: NewDocument) -> StoreResult<Document> {
        self.ensure_category(request.category_id)?;
        let document = self.documents().insert_document(&request)?;
        info!(
            "event=document_add module=store status=ok document_id={} category_id={} language={}",
            document.id, document.category_id, document.syntax_language
        );
        Ok(document)
    }

    fn save_document(&self, document: &Document) -> StoreResult<Document> {
        let mut normalized = document.clone();
        if normalized.title.trim().is_empty() {
            normalized.title = UNTITLED_DOCUMENT.to_string();
        }

        match self.documents().update_document(&normalized) {
            Ok(saved) => {
                debug!(
                    "event=document_save module=store status=ok document_id={} content_len={}",
                    saved.id,
                    saved.content.len()
                );
                Ok(saved)
            }
            Err(RepoError::NotFound(id)) => Err(StoreError::DocumentNotFound(id)),
            Err(err) => {
                error!(
                    "event=document_save module=store status=error document_id={} error={err}",
                    document.id
                );
                Err(err.into())
            }
        }
    }

    fn move_document(&self, id: DocumentId, category_id: CategoryId) -> StoreResult<bool> {
        self.ensure_category(category_id)?;
        let moved = self.documents().set_category(id, category_id)?;
        if moved {
            info!(
                "event=document_move module=store status=ok document_id={id} category_id={category_id}"
            );
        }
        Ok(moved)
    }

    fn delete_document(&self, id: DocumentId) -> StoreResult<bool> {
        let deleted = self.documents().delete_document(id)?;
        if deleted {
            info!("event=document_delete module=store status=ok document_id={id}");
        } else {
            debug!("event=document_delete module=store status=noop document_id={id}");
        }
        Ok(deleted)
    }

    fn search_documents(&self, query: &str) -> StoreResult<Vec<Document>> {
        let Some(filter) = TextFilter::new(query) else {
            return Ok(Vec::new());
        };
        let hits = self.documents().search(&filter)?;
        debug!(
            "event=document_search module=store status=ok hits={}",
            hits.len()
        );
        Ok(hits)
    }
}

fn ensure_default_category(repo: &impl CategoryRepository) -> StoreResult<Option<Category>> {
    if repo.count_categories()? > 0 {
        return Ok(None);
    }
    let category = repo.insert_category(DEFAULT_CATEGORY_NAME, None, 0)?;
    info!(
        "event=category_seed module=store status=ok category_id={}",
        category.id
    );
    Ok(Some(category))
}
