//! Category command handlers

use anyhow::{bail, Result};
use codenote_core::NoteStorage;

use super::resolve_category;
use crate::output::Output;

pub fn list(store: &impl NoteStorage, output: &Output) -> Result<()> {
    output.print_categories(&store.list_categories()?);
    Ok(())
}

pub fn add(
    store: &impl NoteStorage,
    name: Option<String>,
    parent: Option<String>,
    output: &Output,
) -> Result<()> {
    let parent_id = parent
        .map(|id| resolve_category(store, &id))
        .transpose()?;
    let category = store.add_category(name.as_deref(), parent_id)?;
    output.success(&format!("Created category: {}", category.id));
    output.print_category(&category);
    Ok(())
}

pub fn rename(store: &impl NoteStorage, id: &str, name: &str, output: &Output) -> Result<()> {
    let id = resolve_category(store, id)?;
    if !store.rename_category(id, name)? {
        bail!("category not found: {id}");
    }
    output.success(&format!("Renamed category {id}"));
    Ok(())
}

pub fn move_to(
    store: &impl NoteStorage,
    id: &str,
    parent: Option<String>,
    position: Option<usize>,
    output: &Output,
) -> Result<()> {
    let id = resolve_category(store, id)?;
    let parent_id = parent
        .map(|parent| resolve_category(store, &parent))
        .transpose()?;
    store.move_category(id, parent_id, position)?;
    output.success(&format!("Moved category {id}"));
    Ok(())
}

pub fn delete(store: &impl NoteStorage, id: &str, output: &Output) -> Result<()> {
    let id = resolve_category(store, id)?;
    match store.delete_category(id)? {
        Some(counts) => output.success(&format!(
            "Deleted {} categor{} and {} document{}",
            counts.categories,
            if counts.categories == 1 { "y" } else { "ies" },
            counts.documents,
            if counts.documents == 1 { "" } else { "s" }
        )),
        None => bail!("category not found: {id}"),
    }
    Ok(())
}
