//! Single-document session: Closed or Open with exactly one buffer.

use super::autosave::AutosaveTimer;
use super::buffer::EditBuffer;
use super::{SessionError, SessionResult};
use crate::model::document::{Document, DocumentId};
use crate::model::syntax::SyntaxLanguage;
use crate::service::store::NoteStorage;
use log::{debug, info, warn};
use std::time::{Duration, Instant};

/// Tracks the one document currently being edited.
#[derive(Debug, Default)]
pub struct DocumentSession {
    current: Option<EditBuffer>,
    autosave: AutosaveTimer,
}

impl DocumentSession {
    pub fn new(autosave_interval: Duration) -> Self {
        Self {
            current: None,
            autosave: AutosaveTimer::new(autosave_interval),
        }
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub fn current_document_id(&self) -> Option<DocumentId> {
        self.current.as_ref().map(EditBuffer::id)
    }

    /// Document as last persisted, with any pending title/language edits.
    pub fn current_document(&self) -> Option<&Document> {
        self.current.as_ref().map(EditBuffer::document)
    }

    pub fn buffer(&self) -> Option<&str> {
        self.current.as_ref().map(EditBuffer::text)
    }

    pub fn is_dirty(&self) -> bool {
        self.current.as_ref().is_some_and(EditBuffer::is_dirty)
    }

    /// Replaces the editor buffer of the open document.
    pub fn set_buffer(&mut self, text: impl Into<String>) -> SessionResult<()> {
        self.current_mut()?.set_text(text);
        Ok(())
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> SessionResult<()> {
        self.current_mut()?.set_title(title);
        Ok(())
    }

    pub fn set_syntax_language(&mut self, language: SyntaxLanguage) -> SessionResult<()> {
        self.current_mut()?.set_syntax_language(language);
        Ok(())
    }

    /// Opens `id`, saving the previously open document first.
    ///
    /// Opening the document that is already open is a no-op. If the previous
    /// document cannot be saved, it stays open and the error is returned;
    /// a previous document that no longer exists in storage is dropped
    /// instead. If `id` does not exist, the previous document (now saved)
    /// stays open.
    pub fn open_document(
        &mut self,
        storage: &impl NoteStorage,
        id: DocumentId,
    ) -> SessionResult<&Document> {
        if self.current_document_id() != Some(id) {
            if let Some(previous) = self.current_document_id() {
                if self.persist_or_drop_stale(storage)? {
                    debug!(
                        "event=session_switch module=session status=saved document_id={previous}"
                    );
                }
            }
            let loaded = EditBuffer::load(storage, id)?;
            self.current = Some(loaded);
            info!("event=session_open module=session status=ok document_id={id}");
        }
        Ok(self.current_mut()?.document())
    }

    /// Persists the buffer of the open document.
    ///
    /// Returns `false` when nothing was persisted: no document is open, or
    /// the open document was deleted from storage and the session is now
    /// Closed.
    pub fn save(&mut self, storage: &impl NoteStorage) -> SessionResult<bool> {
        let saved = self.persist_or_drop_stale(storage)?;
        if let Some(id) = self.current_document_id().filter(|_| saved) {
            debug!("event=session_save module=session status=ok document_id={id}");
        }
        Ok(saved)
    }

    /// Saves and closes the open document, returning its id.
    ///
    /// Returns `None` when nothing was open or the open document had already
    /// been deleted from storage.
    pub fn close(&mut self, storage: &impl NoteStorage) -> SessionResult<Option<DocumentId>> {
        if !self.save(storage)? {
            return Ok(None);
        }
        let closed = self.current.take().map(|buffer| buffer.id());
        info!(
            "event=session_close module=session status=ok document_id={}",
            closed.map(|id| id.to_string()).unwrap_or_default()
        );
        Ok(closed)
    }

    /// Drops the open buffer without saving; used once the document is known
    /// to be gone from storage.
    pub fn discard(&mut self) -> Option<EditBuffer> {
        let discarded = self.current.take();
        if let Some(buffer) = &discarded {
            warn!(
                "event=session_discard module=session status=ok document_id={} dirty={}",
                buffer.id(),
                buffer.is_dirty()
            );
        }
        discarded
    }

    /// Silent save when the autosave interval has elapsed.
    ///
    /// Returns `true` when a save happened.
    pub fn autosave_tick(
        &mut self,
        storage: &impl NoteStorage,
        now: Instant,
    ) -> SessionResult<bool> {
        if !self.autosave.poll(now) {
            return Ok(false);
        }
        self.save(storage)
    }

    /// Final silent save before teardown. Leaves the session Closed.
    pub fn shutdown(&mut self, storage: &impl NoteStorage) -> SessionResult<()> {
        self.close(storage)?;
        info!("event=session_shutdown module=session status=ok");
        Ok(())
    }

    /// Persists the open buffer; a buffer whose document is gone from
    /// storage is dropped and the session becomes Closed.
    ///
    /// Returns whether a buffer was persisted.
    fn persist_or_drop_stale(&mut self, storage: &impl NoteStorage) -> SessionResult<bool> {
        let Some(current) = self.current.as_mut() else {
            return Ok(false);
        };
        match current.persist(storage) {
            Ok(()) => Ok(true),
            Err(SessionError::DocumentNotFound(id)) if id == current.id() => {
                warn!(
                    "event=session_stale module=session status=dropped document_id={id} dirty={}",
                    current.is_dirty()
                );
                self.current = None;
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    fn current_mut(&mut self) -> SessionResult<&mut EditBuffer> {
        self.current.as_mut().ok_or(SessionError::NotOpen)
    }
}
