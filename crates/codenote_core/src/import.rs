//! File import/export adapter.
//!
//! # Responsibility
//! - Map file extensions to [`SyntaxLanguage`] and back.
//! - Turn a file (or raw text plus a file name) into a new document.
//! - Write a document out as a plain file named after its title.
//!
//! # Invariants
//! - Extension matching ignores case and a leading dot.
//! - Unknown extensions import as [`SyntaxLanguage::Plain`].

use crate::model::category::CategoryId;
use crate::model::document::{Document, NewDocument, UNTITLED_DOCUMENT};
use crate::model::syntax::SyntaxLanguage;
use crate::service::store::{NoteStorage, StoreError};
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

static UNSAFE_FILE_CHARS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[<>:"/\\|?*\x00-\x1F]+"#).expect("valid file name regex"));

pub type ImportResult<T> = Result<T, ImportError>;

#[derive(Debug)]
pub enum ImportError {
    /// Reading or writing a file failed (includes non-UTF-8 input).
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Store(StoreError),
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot access `{}`: {source}", path.display()),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<StoreError> for ImportError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Maps a file extension (with or without the dot) to a language.
pub fn syntax_for_extension(extension: &str) -> SyntaxLanguage {
    let normalized = extension.trim().trim_start_matches('.').to_ascii_lowercase();
    match normalized.as_str() {
        "cs" => SyntaxLanguage::CSharp,
        "xml" | "xaml" | "config" => SyntaxLanguage::Xml,
        "html" | "htm" => SyntaxLanguage::Html,
        "js" => SyntaxLanguage::JavaScript,
        "css" => SyntaxLanguage::Css,
        "json" => SyntaxLanguage::Json,
        "sql" => SyntaxLanguage::Sql,
        "py" => SyntaxLanguage::Python,
        "java" => SyntaxLanguage::Java,
        "cpp" | "cc" | "cxx" | "c" | "h" | "hpp" => SyntaxLanguage::Cpp,
        "php" => SyntaxLanguage::Php,
        "md" | "markdown" => SyntaxLanguage::MarkDown,
        _ => SyntaxLanguage::Plain,
    }
}

/// Preferred extension when exporting a document of `language`.
pub fn extension_for(language: SyntaxLanguage) -> &'static str {
    match language {
        SyntaxLanguage::Plain => "txt",
        SyntaxLanguage::CSharp => "cs",
        SyntaxLanguage::Xml => "xml",
        SyntaxLanguage::Html => "html",
        SyntaxLanguage::JavaScript => "js",
        SyntaxLanguage::Css => "css",
        SyntaxLanguage::Json => "json",
        SyntaxLanguage::Sql => "sql",
        SyntaxLanguage::Python => "py",
        SyntaxLanguage::Java => "java",
        SyntaxLanguage::Cpp => "cpp",
        SyntaxLanguage::Php => "php",
        SyntaxLanguage::MarkDown => "md",
    }
}

/// Creates a document from already-read text.
///
/// The title is the file stem of `file_name`; the language comes from its
/// extension.
pub fn import_text(
    storage: &impl NoteStorage,
    category_id: CategoryId,
    file_name: &str,
    text: impl Into<String>,
) -> Result<Document, StoreError> {
    let path = Path::new(file_name);
    let title = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(UNTITLED_DOCUMENT);
    let language = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(syntax_for_extension)
        .unwrap_or_default();

    let document = storage.add_document(
        NewDocument::new(category_id)
            .title(title)
            .content(text)
            .language(language),
    )?;
    info!(
        "event=document_import module=import status=ok document_id={} language={}",
        document.id, document.syntax_language
    );
    Ok(document)
}

/// Reads a UTF-8 file and imports it into `category_id`.
pub fn import_file(
    storage: &impl NoteStorage,
    category_id: CategoryId,
    path: impl AsRef<Path>,
) -> ImportResult<Document> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(import_text(storage, category_id, &file_name, text)?)
}

/// Writes `document` into `dir` as `<title>.<ext>` and returns the path.
///
/// Characters that are invalid in file names are replaced with `_`; an
/// existing file with the same name is overwritten.
pub fn export_document(document: &Document, dir: impl AsRef<Path>) -> ImportResult<PathBuf> {
    let stem = file_stem_for(&document.title);
    let path = dir
        .as_ref()
        .join(format!("{stem}.{}", extension_for(document.syntax_language)));
    std::fs::write(&path, &document.content).map_err(|source| ImportError::Io {
        path: path.clone(),
        source,
    })?;
    info!(
        "event=document_export module=import status=ok document_id={}",
        document.id
    );
    Ok(path)
}

fn file_stem_for(title: &str) -> String {
    let cleaned = UNSAFE_FILE_CHARS_RE.replace_all(title.trim(), "_");
    let cleaned = cleaned.trim_matches(|c: char| c == '.' || c.is_whitespace());
    if cleaned.is_empty() {
        UNTITLED_DOCUMENT.to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{extension_for, file_stem_for, syntax_for_extension};
    use crate::model::SyntaxLanguage;

    #[test]
    fn extension_mapping_ignores_case_and_dot() {
        assert_eq!(syntax_for_extension(".CS"), SyntaxLanguage::CSharp);
        assert_eq!(syntax_for_extension("Md"), SyntaxLanguage::MarkDown);
        assert_eq!(syntax_for_extension("hpp"), SyntaxLanguage::Cpp);
        assert_eq!(syntax_for_extension("htm"), SyntaxLanguage::Html);
    }

    #[test]
    fn unknown_extensions_are_plain() {
        assert_eq!(syntax_for_extension("txt"), SyntaxLanguage::Plain);
        assert_eq!(syntax_for_extension(""), SyntaxLanguage::Plain);
        assert_eq!(syntax_for_extension("rs"), SyntaxLanguage::Plain);
    }

    #[test]
    fn export_extension_maps_back_to_same_language() {
        for language in SyntaxLanguage::ALL {
            assert_eq!(syntax_for_extension(extension_for(language)), language);
        }
    }

    #[test]
    fn file_stem_replaces_unsafe_characters() {
        assert_eq!(file_stem_for("a/b:c?"), "a_b_c_");
        assert_eq!(file_stem_for(" ... "), "Untitled");
    }
}
