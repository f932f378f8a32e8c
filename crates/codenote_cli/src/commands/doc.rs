//! Document command handlers
//!
//! Edits go through a [`DocumentSession`] so the buffer is persisted by the
//! same path the interactive front ends use.

use anyhow::{anyhow, bail, Context, Result};
use codenote_core::{
    export_document, extension_for, import_file, CoreConfig, DocumentSession, NewDocument,
    NoteStorage, SyntaxLanguage,
};
use std::path::{Path, PathBuf};

use super::{resolve_category, resolve_document};
use crate::editor::edit_text;
use crate::output::Output;

pub fn list(store: &impl NoteStorage, category: Option<String>, output: &Output) -> Result<()> {
    let documents = match category {
        Some(id) => store.list_documents_by_category(resolve_category(store, &id)?)?,
        None => store.list_documents()?,
    };
    output.print_documents(&documents);
    Ok(())
}

pub fn create(
    store: &impl NoteStorage,
    category: &str,
    title: Option<String>,
    language: Option<String>,
    content: Option<String>,
    output: &Output,
) -> Result<()> {
    let mut request = NewDocument::new(resolve_category(store, category)?);
    if let Some(title) = title {
        request = request.title(title);
    }
    if let Some(language) = language {
        request = request.language(parse_language(&language)?);
    }
    if let Some(content) = content {
        request = request.content(content);
    }

    let document = store.add_document(request)?;
    output.success(&format!("Created document: {}", document.id));
    output.print_document(&document);
    Ok(())
}

pub fn show(store: &impl NoteStorage, id: &str, output: &Output) -> Result<()> {
    let id = resolve_document(store, id)?;
    let document = store
        .get_document(id)?
        .ok_or_else(|| anyhow!("document not found: {id}"))?;
    output.print_document(&document);
    Ok(())
}

pub fn edit(store: &impl NoteStorage, config: &CoreConfig, id: &str, output: &Output) -> Result<()> {
    let id = resolve_document(store, id)?;
    let mut session = DocumentSession::new(config.autosave_interval());
    let document = session.open_document(store, id)?;
    let extension = extension_for(document.syntax_language);
    let original = document.content.clone();

    let edited = edit_text(&original, extension)?;
    if edited == original {
        output.success("No changes.");
        return Ok(());
    }

    session.set_buffer(edited)?;
    session.shutdown(store)?;
    output.success(&format!("Saved document {id}"));
    Ok(())
}

pub fn set_title(
    store: &impl NoteStorage,
    config: &CoreConfig,
    id: &str,
    title: String,
    output: &Output,
) -> Result<()> {
    let id = resolve_document(store, id)?;
    let mut session = DocumentSession::new(config.autosave_interval());
    session.open_document(store, id)?;
    session.set_title(title)?;
    session.shutdown(store)?;
    output.success(&format!("Retitled document {id}"));
    Ok(())
}

pub fn set_language(
    store: &impl NoteStorage,
    config: &CoreConfig,
    id: &str,
    language: &str,
    output: &Output,
) -> Result<()> {
    let language = parse_language(language)?;
    let id = resolve_document(store, id)?;
    let mut session = DocumentSession::new(config.autosave_interval());
    session.open_document(store, id)?;
    session.set_syntax_language(language)?;
    session.shutdown(store)?;
    output.success(&format!("Document {id} is now {language}"));
    Ok(())
}

pub fn move_to(store: &impl NoteStorage, id: &str, category: &str, output: &Output) -> Result<()> {
    let id = resolve_document(store, id)?;
    let category_id = resolve_category(store, category)?;
    if !store.move_document(id, category_id)? {
        bail!("document not found: {id}");
    }
    output.success(&format!("Moved document {id}"));
    Ok(())
}

pub fn delete(store: &impl NoteStorage, id: &str, output: &Output) -> Result<()> {
    let id = resolve_document(store, id)?;
    if !store.delete_document(id)? {
        bail!("document not found: {id}");
    }
    output.success(&format!("Deleted document {id}"));
    Ok(())
}

pub fn search(store: &impl NoteStorage, query: &str, output: &Output) -> Result<()> {
    output.print_documents(&store.search_documents(query)?);
    Ok(())
}

pub fn import(
    store: &impl NoteStorage,
    category: &str,
    paths: &[PathBuf],
    output: &Output,
) -> Result<()> {
    let category_id = resolve_category(store, category)?;
    let mut imported = Vec::with_capacity(paths.len());
    for path in paths {
        let document = import_file(store, category_id, path)
            .with_context(|| format!("failed to import {}", path.display()))?;
        output.success(&format!(
            "Imported {} as {} [{}]",
            path.display(),
            document.id,
            document.syntax_language
        ));
        imported.push(document);
    }
    if !output.is_human() {
        output.print_documents(&imported);
    }
    Ok(())
}

pub fn export(store: &impl NoteStorage, id: &str, dir: &Path, output: &Output) -> Result<()> {
    let id = resolve_document(store, id)?;
    let document = store
        .get_document(id)?
        .ok_or_else(|| anyhow!("document not found: {id}"))?;
    let path = export_document(&document, dir)?;
    output.success(&format!("Exported to {}", path.display()));
    Ok(())
}

fn parse_language(value: &str) -> Result<SyntaxLanguage> {
    value.parse::<SyntaxLanguage>().map_err(|err| {
        let known = SyntaxLanguage::ALL
            .iter()
            .map(|language| language.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        anyhow!("{err}; expected one of: {known}")
    })
}
