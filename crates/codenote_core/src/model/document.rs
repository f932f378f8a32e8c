//! Document record and the text filter shared by search and the tree.
//!
//! # Invariants
//! - `category_id` always references an existing category.
//! - Filter matching is a case-insensitive substring test over title and
//!   content, identical for `search_documents` and tree filtering.

use crate::model::category::CategoryId;
use crate::model::syntax::SyntaxLanguage;
use crate::model::timestamp::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type DocumentId = Uuid;

/// Title given to documents created without one.
pub const UNTITLED_DOCUMENT: &str = "Untitled";

/// A titled unit of text belonging to one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub category_id: CategoryId,
    pub title: String,
    pub content: String,
    pub syntax_language: SyntaxLanguage,
    pub created_at: Timestamp,
    /// Refreshed by every save.
    pub updated_at: Timestamp,
}

impl Document {
    pub fn matches(&self, filter: &TextFilter) -> bool {
        filter.matches(&self.title) || filter.matches(&self.content)
    }
}

/// Insert request for a new document.
///
/// Omitted fields take the documented defaults: title `"Untitled"`, empty
/// content, [`SyntaxLanguage::Plain`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDocument {
    pub category_id: CategoryId,
    pub title: Option<String>,
    pub content: String,
    pub syntax_language: SyntaxLanguage,
}

impl NewDocument {
    pub fn new(category_id: CategoryId) -> Self {
        Self {
            category_id,
            title: None,
            content: String::new(),
            syntax_language: SyntaxLanguage::Plain,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn language(mut self, language: SyntaxLanguage) -> Self {
        self.syntax_language = language;
        self
    }

    /// Title after defaulting blank/missing values.
    pub fn effective_title(&self) -> String {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(UNTITLED_DOCUMENT)
            .to_string()
    }
}

/// Normalized case-insensitive substring filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFilter {
    needle: String,
}

impl TextFilter {
    /// Builds a filter; blank input means "no filter" and yields `None`.
    ///
    /// Surrounding whitespace is part of the needle.
    pub fn new(raw: &str) -> Option<Self> {
        if raw.trim().is_empty() {
            return None;
        }
        Some(Self {
            needle: raw.to_lowercase(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.needle
    }

    pub fn matches(&self, haystack: &str) -> bool {
        haystack.to_lowercase().contains(&self.needle)
    }
}

#[cfg(test)]
mod tests {
    use super::{NewDocument, TextFilter};
    use crate::model::SyntaxLanguage;
    use uuid::Uuid;

    #[test]
    fn new_document_defaults() {
        let request = NewDocument::new(Uuid::new_v4());
        assert_eq!(request.effective_title(), "Untitled");
        assert_eq!(request.content, "");
        assert_eq!(request.syntax_language, SyntaxLanguage::Plain);
    }

    #[test]
    fn blank_title_falls_back_to_untitled() {
        let request = NewDocument::new(Uuid::new_v4()).title("   ");
        assert_eq!(request.effective_title(), "Untitled");
    }

    #[test]
    fn filter_is_case_insensitive_and_unicode_aware() {
        let filter = TextFilter::new("ÄPFEL").unwrap();
        assert!(filter.matches("grüne äpfel"));
        assert!(!filter.matches("birnen"));
    }

    #[test]
    fn filter_keeps_surrounding_whitespace() {
        let filter = TextFilter::new(" bar").unwrap();
        assert!(!filter.matches("foobar"));
        assert!(filter.matches("foo bar"));
    }

    #[test]
    fn blank_filter_is_none() {
        assert!(TextFilter::new("  ").is_none());
    }
}
