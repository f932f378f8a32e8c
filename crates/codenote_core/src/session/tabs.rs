//! Multi-tab session: several buffers, one active.
//!
//! Each tab follows the same save-before-discard rule as the single-document
//! session. Leaving a tab (activating another or opening a new one) persists
//! the tab being left. A tab whose document was deleted from storage is
//! dropped when it is next persisted.

use super::autosave::AutosaveTimer;
use super::buffer::EditBuffer;
use super::{SessionError, SessionResult};
use crate::model::document::{Document, DocumentId};
use crate::service::store::NoteStorage;
use log::{debug, info, warn};
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
pub struct TabSession {
    tabs: Vec<EditBuffer>,
    active: Option<usize>,
    autosave: AutosaveTimer,
}

impl TabSession {
    pub fn new(autosave_interval: Duration) -> Self {
        Self {
            tabs: Vec::new(),
            active: None,
            autosave: AutosaveTimer::new(autosave_interval),
        }
    }

    /// Open tabs in display order.
    pub fn tabs(&self) -> &[EditBuffer] {
        &self.tabs
    }

    pub fn is_open(&self, id: DocumentId) -> bool {
        self.position(id).is_some()
    }

    pub fn active(&self) -> Option<&EditBuffer> {
        self.active.and_then(|index| self.tabs.get(index))
    }

    pub fn active_document_id(&self) -> Option<DocumentId> {
        self.active().map(EditBuffer::id)
    }

    /// Replaces the buffer of the active tab.
    pub fn set_active_buffer(&mut self, text: impl Into<String>) -> SessionResult<()> {
        let index = self.active.ok_or(SessionError::NotOpen)?;
        self.tabs[index].set_text(text);
        Ok(())
    }

    /// Opens `id` in a new tab, or activates its existing tab.
    ///
    /// The previously active tab is persisted first; if that fails nothing
    /// changes. A tab whose document was deleted from storage is dropped
    /// instead of blocking the switch.
    pub fn open_tab(
        &mut self,
        storage: &impl NoteStorage,
        id: DocumentId,
    ) -> SessionResult<&Document> {
        if self.is_open(id) {
            let index = self.switch_to(storage, id)?;
            return Ok(self.tabs[index].document());
        }

        self.persist_active(storage)?;
        let loaded = EditBuffer::load(storage, id)?;
        self.tabs.push(loaded);
        let index = self.tabs.len() - 1;
        self.active = Some(index);
        info!(
            "event=tab_open module=session status=ok document_id={id} tabs={}",
            self.tabs.len()
        );
        Ok(self.tabs[index].document())
    }

    /// Activates an already open tab.
    pub fn activate(&mut self, storage: &impl NoteStorage, id: DocumentId) -> SessionResult<()> {
        if !self.is_open(id) {
            return Err(SessionError::DocumentNotFound(id));
        }
        self.switch_to(storage, id).map(|_| ())
    }

    /// Saves and closes one tab. Returns `false` when `id` has no tab.
    ///
    /// Closing the active tab activates its right neighbour, or the left one
    /// when it was last. A tab whose document is already gone from storage
    /// closes without saving.
    pub fn close_tab(&mut self, storage: &impl NoteStorage, id: DocumentId) -> SessionResult<bool> {
        let Some(index) = self.position(id) else {
            return Ok(false);
        };
        if self.persist_tab(storage, index)? {
            self.remove_tab(index);
        }
        info!(
            "event=tab_close module=session status=ok document_id={id} tabs={}",
            self.tabs.len()
        );
        Ok(true)
    }

    /// Persists the active tab. Returns `false` when nothing was persisted.
    pub fn save_active(&mut self, storage: &impl NoteStorage) -> SessionResult<bool> {
        self.persist_active(storage)
    }

    /// Persists every tab, stopping at the first failure. Tabs whose
    /// documents were deleted from storage are dropped along the way.
    ///
    /// Returns the number of tabs saved.
    pub fn save_all(&mut self, storage: &impl NoteStorage) -> SessionResult<usize> {
        let mut saved = 0;
        let mut index = 0;
        while index < self.tabs.len() {
            if self.persist_tab(storage, index)? {
                saved += 1;
                index += 1;
            }
        }
        debug!("event=tab_save_all module=session status=ok saved={saved}");
        Ok(saved)
    }

    /// Silent save of every tab when the autosave interval has elapsed.
    pub fn autosave_tick(
        &mut self,
        storage: &impl NoteStorage,
        now: Instant,
    ) -> SessionResult<bool> {
        if !self.autosave.poll(now) || self.tabs.is_empty() {
            return Ok(false);
        }
        self.save_all(storage)?;
        Ok(true)
    }

    /// Saves all tabs and closes them.
    pub fn shutdown(&mut self, storage: &impl NoteStorage) -> SessionResult<()> {
        self.save_all(storage)?;
        self.tabs.clear();
        self.active = None;
        info!("event=session_shutdown module=session status=ok mode=tabs");
        Ok(())
    }

    fn position(&self, id: DocumentId) -> Option<usize> {
        self.tabs.iter().position(|tab| tab.id() == id)
    }

    /// Persists the active tab, then activates the tab of `id` and returns
    /// its index.
    fn switch_to(&mut self, storage: &impl NoteStorage, id: DocumentId) -> SessionResult<usize> {
        if self.active_document_id() != Some(id) {
            self.persist_active(storage)?;
        }
        let index = self
            .position(id)
            .ok_or(SessionError::DocumentNotFound(id))?;
        self.active = Some(index);
        Ok(index)
    }

    fn persist_active(&mut self, storage: &impl NoteStorage) -> SessionResult<bool> {
        match self.active {
            Some(index) => self.persist_tab(storage, index),
            None => Ok(false),
        }
    }

    /// Persists one tab; a tab whose document is gone from storage is
    /// removed. Returns whether the tab was persisted.
    fn persist_tab(&mut self, storage: &impl NoteStorage, index: usize) -> SessionResult<bool> {
        let tab = &mut self.tabs[index];
        match tab.persist(storage) {
            Ok(()) => Ok(true),
            Err(SessionError::DocumentNotFound(id)) if id == tab.id() => {
                warn!(
                    "event=session_stale module=session status=dropped mode=tabs document_id={id} dirty={}",
                    tab.is_dirty()
                );
                self.remove_tab(index);
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    fn remove_tab(&mut self, index: usize) {
        self.tabs.remove(index);
        self.active = match self.active {
            _ if self.tabs.is_empty() => None,
            Some(active) if active > index => Some(active - 1),
            Some(active) if active == index => Some(index.min(self.tabs.len() - 1)),
            other => other,
        };
    }
}
