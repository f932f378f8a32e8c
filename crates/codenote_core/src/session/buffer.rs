//! One loaded document plus its in-memory edits.

use super::{SessionError, SessionResult};
use crate::model::document::{Document, DocumentId};
use crate::model::syntax::SyntaxLanguage;
use crate::service::store::NoteStorage;

/// Editable copy of a persisted document.
///
/// `document` mirrors the last persisted state plus pending metadata edits;
/// `text` is the editor buffer that replaces `content` on save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditBuffer {
    document: Document,
    text: String,
    dirty: bool,
}

impl EditBuffer {
    /// Reads the document fresh from storage.
    pub(crate) fn load(storage: &impl NoteStorage, id: DocumentId) -> SessionResult<Self> {
        let document = storage
            .get_document(id)?
            .ok_or(SessionError::DocumentNotFound(id))?;
        Ok(Self {
            text: document.content.clone(),
            document,
            dirty: false,
        })
    }

    pub fn id(&self) -> DocumentId {
        self.document.id
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether there are edits not yet persisted.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text != self.text {
            self.text = text;
            self.dirty = true;
        }
    }

    pub(crate) fn set_title(&mut self, title: impl Into<String>) {
        let title = title.into();
        if title != self.document.title {
            self.document.title = title;
            self.dirty = true;
        }
    }

    pub(crate) fn set_syntax_language(&mut self, language: SyntaxLanguage) {
        if language != self.document.syntax_language {
            self.document.syntax_language = language;
            self.dirty = true;
        }
    }

    /// Copies the buffer into `content` and persists the document.
    ///
    /// The in-memory copy is only replaced after storage accepted the write.
    pub(crate) fn persist(&mut self, storage: &impl NoteStorage) -> SessionResult<()> {
        let mut pending = self.document.clone();
        pending.content = self.text.clone();
        let saved = storage.save_document(&pending)?;
        self.text = saved.content.clone();
        self.document = saved;
        self.dirty = false;
        Ok(())
    }
}
