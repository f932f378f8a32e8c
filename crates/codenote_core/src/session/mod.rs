//! Edit-buffer lifecycle bound to persisted documents.
//!
//! # Responsibility
//! - Track which document(s) are being edited and hold their buffers.
//! - Persist buffers on manual save, autosave ticks, switches, closes and
//!   shutdown.
//!
//! # Invariants
//! - A buffer is never dropped before it has been persisted; if the save
//!   fails, the switch/close is aborted and the buffer stays open.
//! - A buffer whose document no longer exists in storage is stale: it is
//!   dropped with a warning instead of blocking the session.
//! - Opening always re-reads the document from storage.
//! - All saves are synchronous and run on the caller's thread, so an autosave
//!   can never overlap a manual save.

use crate::model::document::DocumentId;
use crate::service::store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod autosave;
mod buffer;
mod single;
mod tabs;

pub use autosave::{AutosaveTimer, DEFAULT_AUTOSAVE_INTERVAL};
pub use buffer::EditBuffer;
pub use single::DocumentSession;
pub use tabs::TabSession;

pub type SessionResult<T> = Result<T, SessionError>;

/// Errors from session operations.
#[derive(Debug)]
pub enum SessionError {
    /// The operation needs an open document and none is open.
    NotOpen,
    /// The requested document does not exist (deleted or stale id).
    DocumentNotFound(DocumentId),
    /// Storage failure while loading or persisting.
    Store(StoreError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotOpen => write!(f, "no document is open"),
            Self::DocumentNotFound(id) => write!(f, "document not found: {id}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::NotOpen | Self::DocumentNotFound(_) => None,
        }
    }
}

impl From<StoreError> for SessionError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::DocumentNotFound(id) => Self::DocumentNotFound(id),
            other => Self::Store(other),
        }
    }
}
