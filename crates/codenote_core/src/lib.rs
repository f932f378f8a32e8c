//! Core domain logic for codenote.
//! This crate is the single source of truth for the category tree, its
//! documents, and the rules for persisting edits.

pub mod config;
pub mod db;
pub mod import;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod session;
pub mod tree;

pub use config::{ConfigError, CoreConfig};
pub use import::{
    export_document, extension_for, import_file, import_text, syntax_for_extension, ImportError,
    ImportResult,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingStatus};
pub use model::{
    Category, CategoryId, Document, DocumentId, NewDocument, SyntaxLanguage, TextFilter,
    Timestamp,
};
pub use repo::category_repo::CascadeCounts;
pub use repo::{RepoError, RepoResult};
pub use service::store::{NoteStorage, NoteStore, StoreError, StoreResult};
pub use session::{
    AutosaveTimer, DocumentSession, EditBuffer, SessionError, SessionResult, TabSession,
};
pub use tree::{build_tree, CategoryTree, TreeItem, TreeNode, TreeRow};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
