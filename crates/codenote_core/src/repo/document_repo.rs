//! Document repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist document rows and answer per-category and search listings.
//!
//! # Invariants
//! - Per-category listing order is title (case-insensitive), then id.
//! - Search order is `updated_at DESC`; matching uses [`TextFilter`] so it
//!   agrees with tree filtering.
//! - `update_document` is a full overwrite of title/content/language and
//!   always refreshes `updated_at`.

use super::{parse_timestamp, parse_uuid, RepoError, RepoResult};
use crate::model::category::CategoryId;
use crate::model::document::{Document, DocumentId, NewDocument, TextFilter};
use crate::model::syntax::SyntaxLanguage;
use crate::model::timestamp;
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const DOCUMENT_SELECT_SQL: &str = "SELECT
    id,
    category_id,
    title,
    content,
    syntax_language,
    created_at,
    updated_at
FROM documents";

const TITLE_ORDER_SQL: &str = "ORDER BY title COLLATE NOCASE ASC, title ASC, id ASC";

/// Repository interface for document persistence.
pub trait DocumentRepository {
    /// Inserts one document; `request` defaults must already be applied by
    /// the caller except for the title, which falls back to "Untitled".
    fn insert_document(&self, request: &NewDocument) -> RepoResult<Document>;
    /// Loads one document by id.
    fn get_document(&self, id: DocumentId) -> RepoResult<Option<Document>>;
    /// Lists documents of one category ordered by title.
    fn list_by_category(&self, category_id: CategoryId) -> RepoResult<Vec<Document>>;
    /// Lists all documents ordered by title.
    fn list_all(&self) -> RepoResult<Vec<Document>>;
    /// Returns documents matching `filter`, most recently updated first.
    fn search(&self, filter: &TextFilter) -> RepoResult<Vec<Document>>;
    /// Overwrites title/content/language and refreshes `updated_at`.
    ///
    /// Returns the row as persisted. Fails with `NotFound` when absent.
    fn update_document(&self, document: &Document) -> RepoResult<Document>;
    /// Moves one document to another category. Returns `false` when absent.
    fn set_category(&self, id: DocumentId, category_id: CategoryId) -> RepoResult<bool>;
    /// Deletes one document. Returns `false` when absent.
    fn delete_document(&self, id: DocumentId) -> RepoResult<bool>;
}

/// SQLite-backed document repository.
pub struct SqliteDocumentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDocumentRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn query_documents(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> RepoResult<Vec<Document>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_document_row(row)?);
        }
        Ok(items)
    }
}

impl DocumentRepository for SqliteDocumentRepository<'_> {
    fn insert_document(&self, request: &NewDocument) -> RepoResult<Document> {
        let now = timestamp::now();
        let document = Document {
            id: Uuid::new_v4(),
            category_id: request.category_id,
            title: request.effective_title(),
            content: request.content.clone(),
            syntax_language: request.syntax_language,
            created_at: now,
            updated_at: now,
        };
        self.conn.execute(
            "INSERT INTO documents (
                id,
                category_id,
                title,
                content,
                syntax_language,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6);",
            params![
                document.id.to_string(),
                document.category_id.to_string(),
                document.title.as_str(),
                document.content.as_str(),
                document.syntax_language.as_str(),
                timestamp::format(&now),
            ],
        )?;
        Ok(document)
    }

    fn get_document(&self, id: DocumentId) -> RepoResult<Option<Document>> {
        let mut items =
            self.query_documents(&format!("{DOCUMENT_SELECT_SQL} WHERE id = ?1;"), [id.to_string()])?;
        Ok(items.pop())
    }

    fn list_by_category(&self, category_id: CategoryId) -> RepoResult<Vec<Document>> {
        self.query_documents(
            &format!("{DOCUMENT_SELECT_SQL} WHERE category_id = ?1 {TITLE_ORDER_SQL};"),
            [category_id.to_string()],
        )
    }

    fn list_all(&self) -> RepoResult<Vec<Document>> {
        self.query_documents(&format!("{DOCUMENT_SELECT_SQL} {TITLE_ORDER_SQL};"), [])
    }

    fn search(&self, filter: &TextFilter) -> RepoResult<Vec<Document>> {
        // SQLite's LIKE only folds ASCII case, so matching happens here.
        let recent = self.query_documents(
            &format!("{DOCUMENT_SELECT_SQL} ORDER BY updated_at DESC, title ASC, id ASC;"),
            [],
        )?;
        Ok(recent
            .into_iter()
            .filter(|document| document.matches(filter))
            .collect())
    }

    fn update_document(&self, document: &Document) -> RepoResult<Document> {
        let now = timestamp::now();
        let changed = self.conn.execute(
            "UPDATE documents
             SET title = ?2,
                 content = ?3,
                 syntax_language = ?4,
                 updated_at = ?5
             WHERE id = ?1;",
            params![
                document.id.to_string(),
                document.title.as_str(),
                document.content.as_str(),
                document.syntax_language.as_str(),
                timestamp::format(&now),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(document.id));
        }
        self.get_document(document.id)?
            .ok_or(RepoError::NotFound(document.id))
    }

    fn set_category(&self, id: DocumentId, category_id: CategoryId) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "UPDATE documents
             SET category_id = ?2,
                 updated_at = ?3
             WHERE id = ?1;",
            params![
                id.to_string(),
                category_id.to_string(),
                timestamp::format(&timestamp::now()),
            ],
        )?;
        Ok(changed > 0)
    }

    fn delete_document(&self, id: DocumentId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM documents WHERE id = ?1;", [id.to_string()])?;
        Ok(changed > 0)
    }
}

fn parse_document_row(row: &Row<'_>) -> RepoResult<Document> {
    let id_text: String = row.get("id")?;
    let category_text: String = row.get("category_id")?;
    let language_text: String = row.get("syntax_language")?;
    let syntax_language = language_text
        .parse::<SyntaxLanguage>()
        .map_err(|err| RepoError::InvalidData(format!("{err} in documents.syntax_language")))?;
    let created_at: String = row.get("created_at")?;
    let updated_at: String = row.get("updated_at")?;

    Ok(Document {
        id: parse_uuid(&id_text, "documents.id")?,
        category_id: parse_uuid(&category_text, "documents.category_id")?,
        title: row.get("title")?,
        content: row.get("content")?,
        syntax_language,
        created_at: parse_timestamp(&created_at, "documents.created_at")?,
        updated_at: parse_timestamp(&updated_at, "documents.updated_at")?,
    })
}
