//! Domain model for the category tree and its documents.
//!
//! # Responsibility
//! - Define the two persisted record types: [`Category`] and [`Document`].
//! - Define the closed set of syntax-highlighting languages.
//! - Own timestamp encoding shared by every repository.
//!
//! # Invariants
//! - Every record is identified by a stable UUID generated at creation.
//! - A document belongs to exactly one category.

pub mod category;
pub mod document;
pub mod syntax;
pub mod timestamp;

pub use category::{Category, CategoryId, DEFAULT_CATEGORY_NAME, NEW_CATEGORY_NAME};
pub use document::{Document, DocumentId, NewDocument, TextFilter, UNTITLED_DOCUMENT};
pub use syntax::{SyntaxLanguage, UnknownSyntaxLanguage};
pub use timestamp::Timestamp;
